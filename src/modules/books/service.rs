//! Catalog operations: validation followed by one store call.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use super::{
    models::{Book, BookId, BookSummary, EditableField, InvalidBookId},
    store::BookStore,
    validation::{self, AddBookInput, SearchCriteria, SearchParams, ValidationError},
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidId(#[from] InvalidBookId),

    #[error("book {0} not found")]
    NotFound(BookId),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// The catalog service; cheap to clone, shares one store handle.
#[derive(Clone)]
pub struct BookCatalog {
    store: Arc<dyn BookStore>,
}

impl BookCatalog {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn inventory(&self) -> Result<Vec<BookSummary>, CatalogError> {
        Ok(self.store.list_summaries().await?)
    }

    /// Search with the given parameters. No parameters means no results.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Book>, CatalogError> {
        let criteria = SearchCriteria::from_params(params)?;
        if criteria.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.search(&criteria).await?)
    }

    pub async fn detail(&self, raw_id: &str) -> Result<Book, CatalogError> {
        let id: BookId = raw_id.parse()?;
        self.store
            .find(&id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    pub async fn add(&self, input: &AddBookInput) -> Result<BookId, CatalogError> {
        let book = validation::validate_new_book(input, Utc::now())?;
        let title = book.title.clone();
        let id = self.store.insert(book).await?;
        tracing::info!(book_id = %id, %title, "book added");
        Ok(id)
    }

    /// Remove a book; unknown ids are a no-op. Returns whether one was removed.
    pub async fn delete(&self, raw_id: &str) -> Result<bool, CatalogError> {
        let id: BookId = raw_id.parse()?;
        let removed = self.store.delete(&id).await?;
        tracing::info!(book_id = %id, removed, "book delete requested");
        Ok(removed)
    }

    /// Validate and apply a single-field edit.
    pub async fn edit(
        &self,
        raw_id: &str,
        field: EditableField,
        raw_value: Option<&str>,
    ) -> Result<BookId, CatalogError> {
        let update = validation::validate_field(field, raw_value)?;
        let id: BookId = raw_id.parse()?;

        if !self.store.update_field(&id, &update).await? {
            return Err(CatalogError::NotFound(id));
        }

        tracing::info!(book_id = %id, %field, "book field updated");
        Ok(id)
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.store.ping().await
    }
}
