//! Generic repository trait for database access.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::pagination::{PageRequest, PageResponse};

/// Generic CRUD repository trait.
///
/// `Create` is the insert payload and `Patch` the typed partial update;
/// every field a client may change is enumerated on the patch type.
/// Entity-specific queries live on the store traits that extend this one.
#[async_trait]
pub trait Repository<Entity, Create, Patch>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
    Create: Send + Sync + 'static,
    Patch: Send + Sync + 'static,
{
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Entity>>;

    /// Find all entities with pagination, newest first.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Entity>>;

    /// Create a new entity and return it.
    async fn create(&self, data: &Create) -> AppResult<Entity>;

    /// Apply a partial update. Returns `None` when the entity does not exist.
    async fn update(&self, id: Uuid, patch: &Patch) -> AppResult<Option<Entity>>;

    /// Delete an entity by its primary key. Returns `true` if deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
