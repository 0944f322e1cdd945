//! In-process backend backed by a locked hash map.
//!
//! Honours the full [`Datastore`] contract, including soft removal, which
//! makes it suitable for local runs and end-to-end tests. Data does not
//! survive a restart.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::{Database, Datastore, Person, PersonStore, StoreError, StoreResult};
use crate::context::Context;

/// In-memory database. Clones share the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryDb {
    people: Arc<MemoryPersonStore>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Database for MemoryDb {
    fn person(&self) -> PersonStore {
        self.people.clone()
    }
}

#[derive(Debug, Default)]
pub struct MemoryPersonStore {
    rows: RwLock<HashMap<Uuid, Person>>,
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::backend("person table lock poisoned")
}

fn check(ctx: &Context) -> StoreResult<()> {
    if ctx.is_cancelled() {
        return Err(StoreError::Cancelled);
    }
    Ok(())
}

#[async_trait]
impl Datastore<Person, Uuid> for MemoryPersonStore {
    async fn get(&self, ctx: &Context, id: Uuid) -> StoreResult<Person> {
        check(ctx)?;
        let rows = self.rows.read().map_err(poisoned)?;
        rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn insert(&self, ctx: &Context, mut item: Person) -> StoreResult<Person> {
        check(ctx)?;
        let mut rows = self.rows.write().map_err(poisoned)?;
        let mut id = Uuid::new_v4();
        while id.is_nil() || rows.contains_key(&id) {
            id = Uuid::new_v4();
        }
        item.id = id;
        item.removed = Some(item.removed.unwrap_or(false));
        rows.insert(id, item.clone());
        Ok(item)
    }

    async fn remove(&self, ctx: &Context, id: Uuid) -> StoreResult<Person> {
        check(ctx)?;
        let mut rows = self.rows.write().map_err(poisoned)?;
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        let before = row.clone();
        row.removed = Some(true);
        Ok(before)
    }

    async fn update(&self, ctx: &Context, mut item: Person) -> StoreResult<Person> {
        check(ctx)?;
        let mut rows = self.rows.write().map_err(poisoned)?;
        let row = rows.get_mut(&item.id).ok_or(StoreError::NotFound)?;
        // an unset flag leaves the stored one alone
        if item.removed.is_none() {
            item.removed = row.removed;
        }
        *row = item.clone();
        Ok(item)
    }
}
