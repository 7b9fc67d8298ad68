//! MongoDB blog repository.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use mongodb::error::ErrorKind;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use blog_core::domain::{Blog, BlogFilter, BlogPatch, DEFAULT_PHOTO, NewBlog, Page};
use blog_core::error::RepoError;
use blog_core::ports::BlogRepository;

/// Stored shape of a blog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BlogDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    title: String,
    content: String,
    #[serde(default = "default_photo")]
    photo: String,
}

fn default_photo() -> String {
    DEFAULT_PHOTO.to_string()
}

impl From<NewBlog> for BlogDocument {
    fn from(blog: NewBlog) -> Self {
        Self {
            id: None,
            title: blog.title,
            content: blog.content,
            photo: blog.photo,
        }
    }
}

impl TryFrom<BlogDocument> for Blog {
    type Error = RepoError;

    fn try_from(doc: BlogDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| RepoError::Serialization("document without _id".to_string()))?;
        Ok(Blog {
            id: id.to_hex(),
            title: doc.title,
            content: doc.content,
            photo: doc.photo,
        })
    }
}

/// Blog repository over a single MongoDB collection.
pub struct MongoBlogRepository {
    collection: Collection<BlogDocument>,
}

impl MongoBlogRepository {
    pub fn new(database: &Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }
}

fn map_mongo_err(err: mongodb::error::Error) -> RepoError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            RepoError::Connection(err.to_string())
        }
        _ => RepoError::Query(err.to_string()),
    }
}

/// Translate a list filter into a query document. `id` is renamed to `_id` and
/// hex strings under `_id` become ObjectIds.
fn filter_document(filter: &BlogFilter) -> Result<Document, RepoError> {
    let mut query = Document::new();
    for (key, value) in filter.fields() {
        let key = if key == "id" { "_id" } else { key.as_str() };
        let value = bson::to_bson(value).map_err(|e| RepoError::Serialization(e.to_string()))?;
        let value = match (key, value) {
            ("_id", Bson::String(hex)) => match ObjectId::parse_str(&hex) {
                Ok(oid) => Bson::ObjectId(oid),
                Err(_) => Bson::String(hex),
            },
            (_, value) => value,
        };
        query.insert(key, value);
    }
    Ok(query)
}

/// `$set` payload holding only the fields present in the patch.
fn set_document(patch: BlogPatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = patch.title {
        set.insert("title", title);
    }
    if let Some(content) = patch.content {
        set.insert("content", content);
    }
    if let Some(photo) = patch.photo {
        set.insert("photo", photo);
    }
    set
}

#[async_trait]
impl BlogRepository for MongoBlogRepository {
    async fn find(&self, filter: &BlogFilter, page: Page) -> Result<Vec<Blog>, RepoError> {
        let query = filter_document(filter)?;
        tracing::debug!(filter = %query, skip = page.skip, limit = ?page.limit, "Finding blogs");

        let mut action = self.collection.find(query).skip(page.skip);
        if let Some(limit) = page.limit {
            action = action.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        let docs: Vec<BlogDocument> = action
            .await
            .map_err(map_mongo_err)?
            .try_collect()
            .await
            .map_err(map_mongo_err)?;

        docs.into_iter().map(Blog::try_from).collect()
    }

    async fn insert(&self, blog: NewBlog) -> Result<Blog, RepoError> {
        let mut doc = BlogDocument::from(blog);
        let result = self.collection.insert_one(&doc).await.map_err(map_mongo_err)?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            RepoError::Serialization(format!("unexpected inserted id {}", result.inserted_id))
        })?;
        doc.id = Some(id);
        tracing::debug!(blog_id = %id, "Inserted blog");
        Blog::try_from(doc)
    }

    async fn update_by_id(&self, id: &str, patch: BlogPatch) -> Result<Option<Blog>, RepoError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        // `$set: {}` is rejected by the server
        let updated = if patch.is_empty() {
            self.collection
                .find_one(doc! { "_id": oid })
                .await
                .map_err(map_mongo_err)?
        } else {
            self.collection
                .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set_document(patch) })
                .return_document(ReturnDocument::After)
                .await
                .map_err(map_mongo_err)?
        };

        updated.map(Blog::try_from).transpose()
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Blog>, RepoError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        self.collection
            .find_one_and_delete(doc! { "_id": oid })
            .await
            .map_err(map_mongo_err)?
            .map(Blog::try_from)
            .transpose()
    }
}
