use async_trait::async_trait;

use crate::domain::{Blog, BlogFilter, BlogPatch, NewBlog, Page};
use crate::error::RepoError;

/// Blog persistence - a single collection keyed by document id.
///
/// Ids the backend cannot interpret are reported as absent, never as errors.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Find blogs matching `filter`, applying skip/limit as given.
    async fn find(&self, filter: &BlogFilter, page: Page) -> Result<Vec<Blog>, RepoError>;

    /// Insert a new blog and return it with its assigned id.
    async fn insert(&self, blog: NewBlog) -> Result<Blog, RepoError>;

    /// Apply a partial update. Returns the updated blog, or `None` if the id is unknown.
    async fn update_by_id(&self, id: &str, patch: BlogPatch) -> Result<Option<Blog>, RepoError>;

    /// Delete a blog. Returns the removed blog, or `None` if the id is unknown.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Blog>, RepoError>;
}
