//! Persistence seam for the catalog.

mod memory;
mod mongo;

pub use memory::MemoryBookStore;
pub use mongo::MongoBookStore;

use std::sync::Arc;

use async_trait::async_trait;

use bookstore_db::Backend;
use bookstore_kernel::settings::DatabaseSettings;

use super::models::{Book, BookId, BookSummary, FieldUpdate, NewBook};
use super::validation::SearchCriteria;

/// A collection of book documents.
///
/// Every method is a single round trip; implementations provide
/// single-document atomicity and nothing more.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Title and quantity of every book.
    async fn list_summaries(&self) -> anyhow::Result<Vec<BookSummary>>;

    /// Books matching all conditions. Callers never pass empty criteria.
    async fn search(&self, criteria: &SearchCriteria) -> anyhow::Result<Vec<Book>>;

    async fn find(&self, id: &BookId) -> anyhow::Result<Option<Book>>;

    async fn insert(&self, book: NewBook) -> anyhow::Result<BookId>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: &BookId) -> anyhow::Result<bool>;

    /// Set one field; returns whether a record matched `id`.
    async fn update_field(&self, id: &BookId, update: &FieldUpdate) -> anyhow::Result<bool>;

    async fn ping(&self) -> anyhow::Result<()>;
}

/// Build the store selected by `database.uri`.
pub async fn connect(uri: &str, settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn BookStore>> {
    match Backend::from_uri(uri)? {
        Backend::Memory => {
            tracing::warn!("using in-memory book store; data is lost on restart");
            Ok(Arc::new(MemoryBookStore::new()))
        }
        Backend::Mongo { uri } => {
            let database = bookstore_db::connect(&uri, settings).await?;
            Ok(Arc::new(MongoBookStore::new(database, &settings.collection)))
        }
    }
}
