//! Generic repository trait for the external record store.

use async_trait::async_trait;

use crate::result::AppResult;

/// CRUD operations every record collaborator exposes.
///
/// Entity-specific lookups are added by extension traits next to the
/// concrete entity.
#[async_trait]
pub trait Repository<Entity, NewEntity, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
    NewEntity: Send + Sync + 'static,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: Id) -> AppResult<Option<Entity>>;

    /// Persist a new entity and return it with its assigned key.
    async fn create(&self, entity: NewEntity) -> AppResult<Entity>;

    /// Update an existing entity and return the stored version.
    async fn update(&self, entity: &Entity) -> AppResult<Entity>;

    /// Delete an entity by its primary key. Returns `true` if deleted.
    async fn delete(&self, id: Id) -> AppResult<bool>;
}
