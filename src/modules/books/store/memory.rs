use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::modules::books::{
    models::{Book, BookId, BookSummary, FieldUpdate, NewBook},
    validation::SearchCriteria,
};

/// In-process store keyed by id; ids are time-ordered so iteration follows
/// insertion order.
#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<BTreeMap<BookId, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list_summaries(&self) -> anyhow::Result<Vec<BookSummary>> {
        let books = self.books.read().await;
        Ok(books.values().map(Book::summary).collect())
    }

    async fn search(&self, criteria: &SearchCriteria) -> anyhow::Result<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|book| criteria.matches(book))
            .cloned()
            .collect())
    }

    async fn find(&self, id: &BookId) -> anyhow::Result<Option<Book>> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn insert(&self, book: NewBook) -> anyhow::Result<BookId> {
        let id = BookId::generate();
        self.books.write().await.insert(id, Book::from_new(id, book));
        Ok(id)
    }

    async fn delete(&self, id: &BookId) -> anyhow::Result<bool> {
        Ok(self.books.write().await.remove(id).is_some())
    }

    async fn update_field(&self, id: &BookId, update: &FieldUpdate) -> anyhow::Result<bool> {
        let mut books = self.books.write().await;
        match books.get_mut(id) {
            Some(book) => {
                book.apply(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
