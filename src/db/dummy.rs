//! Placeholder backend that returns canned data.
//!
//! Useful for wiring the service together before a real database exists.
//! Nothing is stored: reads always answer with the same person.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{Database, Datastore, Person, PersonStore, StoreResult};
use crate::context::Context;

#[derive(Clone, Copy, Debug, Default)]
pub struct DummyDb;

impl DummyDb {
    pub fn new() -> Self {
        Self
    }
}

impl Database for DummyDb {
    fn person(&self) -> PersonStore {
        Arc::new(DummyPersonStore)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct DummyPersonStore;

fn canned(id: Uuid, removed: bool) -> Person {
    Person {
        id,
        first_name: "Testy".to_owned(),
        last_name: "McTesterson".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1),
        removed: Some(removed),
    }
}

#[async_trait]
impl Datastore<Person, Uuid> for DummyPersonStore {
    async fn get(&self, _ctx: &Context, id: Uuid) -> StoreResult<Person> {
        Ok(canned(id, false))
    }

    async fn insert(&self, _ctx: &Context, mut item: Person) -> StoreResult<Person> {
        item.id = Uuid::new_v4();
        Ok(item)
    }

    async fn remove(&self, _ctx: &Context, id: Uuid) -> StoreResult<Person> {
        Ok(canned(id, true))
    }

    async fn update(&self, _ctx: &Context, item: Person) -> StoreResult<Person> {
        Ok(item)
    }
}
