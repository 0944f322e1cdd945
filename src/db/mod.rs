//! Database-agnostic persistence contract.
//!
//! Handlers talk to storage only through [`Datastore`], generic over the
//! entity and its identifier type. Swapping the storage backend means writing
//! a new [`Database`] implementation and choosing it in `main`; nothing above
//! this module changes.

mod person;

pub mod dummy;
pub mod memory;

use std::error::Error as StdError;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::context::Context;

pub use person::Person;

/// Nullable boolean carried across layer boundaries.
///
/// `None` means "unset" and is distinct from an explicit `Some(false)`.
pub type NullBool = Option<bool>;

/// Errors a datastore reports.
///
/// Only [`StoreError::NotFound`] is meaningful to callers; everything else is
/// an internal failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("db query yielded no results")]
    NotFound,
    #[error("operation cancelled")]
    Cancelled,
    #[error("datastore failure: {0}")]
    Backend(Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    /// Wraps any backend error.
    pub fn backend(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key types a datastore can index entities by.
pub trait Identifier: Copy + Eq + std::hash::Hash + Debug + Display + Send + Sync + 'static {}

impl Identifier for i64 {}
impl Identifier for Uuid {}

/// A record stored in a [`Datastore`].
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: Identifier;

    fn id(&self) -> Self::Id;
}

/// Basic interactions for one kind of stored entity.
///
/// Every operation receives the caller's [`Context`] unchanged so backends can
/// observe cancellation.
#[async_trait]
pub trait Datastore<T, I>: Send + Sync
where
    T: Entity<Id = I>,
    I: Identifier,
{
    /// Fetches the entity identified by `id`.
    async fn get(&self, ctx: &Context, id: I) -> StoreResult<T>;

    /// Stores `item` under a newly assigned identifier and returns it with
    /// that identifier attached. Any identifier already on `item` is ignored.
    async fn insert(&self, ctx: &Context, item: T) -> StoreResult<T>;

    /// Marks the entity as removed and returns it as it was before removal.
    /// The record itself must not be deleted.
    async fn remove(&self, ctx: &Context, id: I) -> StoreResult<T>;

    /// Replaces the entity whose identifier `item` carries and returns the
    /// persisted state.
    async fn update(&self, ctx: &Context, item: T) -> StoreResult<T>;
}

/// Shared handle to a person datastore.
pub type PersonStore = Arc<dyn Datastore<Person, Uuid>>;

/// A storage backend: one datastore per entity kind.
pub trait Database: Send + Sync {
    fn person(&self) -> PersonStore;
}
