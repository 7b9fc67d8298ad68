//! In-memory blog repository - used when no database is configured and in tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Blog, BlogFilter, BlogPatch, NewBlog, Page};
use blog_core::error::RepoError;
use blog_core::ports::BlogRepository;

/// Insertion-ordered blog store behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryBlogRepository {
    store: RwLock<Vec<Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryBlogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find(&self, filter: &BlogFilter, page: Page) -> Result<Vec<Blog>, RepoError> {
        let store = self.store.read().await;
        let limit = page
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);
        let skip = usize::try_from(page.skip).unwrap_or(usize::MAX);

        let mut matched = Vec::new();
        for blog in store.iter() {
            let document =
                serde_json::to_value(blog).map_err(|e| RepoError::Serialization(e.to_string()))?;
            if filter.matches(&document) {
                matched.push(blog.clone());
            }
        }

        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn insert(&self, blog: NewBlog) -> Result<Blog, RepoError> {
        let blog = blog.with_id(Uuid::new_v4().simple().to_string());
        self.store.write().await.push(blog.clone());
        tracing::debug!(blog_id = %blog.id, "Inserted blog in memory");
        Ok(blog)
    }

    async fn update_by_id(&self, id: &str, patch: BlogPatch) -> Result<Option<Blog>, RepoError> {
        let mut store = self.store.write().await;
        let Some(blog) = store.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        blog.apply(&patch);
        Ok(Some(blog.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Blog>, RepoError> {
        let mut store = self.store.write().await;
        let removed = store
            .iter()
            .position(|b| b.id == id)
            .map(|idx| store.remove(idx));
        Ok(removed)
    }
}
