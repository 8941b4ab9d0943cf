use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use super::BookStore;
use crate::modules::books::{
    models::{Book, BookId, BookSummary, FieldUpdate, NewBook},
    validation::SearchCriteria,
};

/// Store backed by a MongoDB collection.
pub struct MongoBookStore {
    database: Database,
    books: Collection<BookDocument>,
}

impl MongoBookStore {
    pub fn new(database: Database, collection: &str) -> Self {
        let books = database.collection::<BookDocument>(collection);
        Self { database, books }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    author: String,
    genre: String,
    price: f64,
    quantity: i64,
    date_added: bson::DateTime,
}

#[derive(Debug, Deserialize)]
struct SummaryDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    quantity: i64,
}

impl TryFrom<BookDocument> for Book {
    type Error = anyhow::Error;

    fn try_from(document: BookDocument) -> anyhow::Result<Self> {
        Ok(Book {
            id: BookId::from(document.id),
            title: document.title,
            author: document.author,
            genre: document.genre,
            price: document.price,
            quantity: document.quantity,
            date_added: from_bson_datetime(document.date_added)?,
        })
    }
}

/// BSON dates carry millisecond precision.
fn to_bson_datetime(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_datetime(at: bson::DateTime) -> anyhow::Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(at.timestamp_millis())
        .single()
        .with_context(|| format!("date_added {} is out of range", at.timestamp_millis()))
}

/// Translate criteria into a query document; conditions are ANDed.
fn search_filter(criteria: &SearchCriteria) -> Document {
    let mut filter = Document::new();

    for (field, needle) in [
        ("title", &criteria.title),
        ("author", &criteria.author),
        ("genre", &criteria.genre),
    ] {
        if let Some(needle) = needle {
            filter.insert(
                field,
                doc! { "$regex": regex::escape(needle), "$options": "i" },
            );
        }
    }

    if let Some((start, end)) = criteria.added_window() {
        filter.insert(
            "date_added",
            doc! { "$gte": to_bson_datetime(start), "$lt": to_bson_datetime(end) },
        );
    }

    if let Some(max_price) = criteria.max_price {
        filter.insert("price", doc! { "$lte": max_price });
    }

    filter
}

fn set_document(update: &FieldUpdate) -> Document {
    let value = match update {
        FieldUpdate::Title(text) | FieldUpdate::Author(text) | FieldUpdate::Genre(text) => {
            Bson::String(text.clone())
        }
        FieldUpdate::Price(price) => Bson::Double(*price),
        FieldUpdate::Quantity(quantity) => Bson::Int64(*quantity),
    };

    let mut set = Document::new();
    set.insert(update.field().name(), value);
    doc! { "$set": set }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn list_summaries(&self) -> anyhow::Result<Vec<BookSummary>> {
        let cursor = self
            .books
            .clone_with_type::<SummaryDocument>()
            .find(doc! {})
            .projection(doc! { "title": 1, "quantity": 1 })
            .await
            .context("failed to list books")?;

        let documents: Vec<SummaryDocument> = cursor
            .try_collect()
            .await
            .context("failed to read book summaries")?;

        Ok(documents
            .into_iter()
            .map(|document| BookSummary {
                id: BookId::from(document.id),
                title: document.title,
                quantity: document.quantity,
            })
            .collect())
    }

    async fn search(&self, criteria: &SearchCriteria) -> anyhow::Result<Vec<Book>> {
        let filter = search_filter(criteria);
        tracing::debug!(?filter, "searching books");

        let documents: Vec<BookDocument> = self
            .books
            .find(filter)
            .await
            .context("failed to search books")?
            .try_collect()
            .await
            .context("failed to read search results")?;

        documents.into_iter().map(Book::try_from).collect()
    }

    async fn find(&self, id: &BookId) -> anyhow::Result<Option<Book>> {
        self.books
            .find_one(doc! { "_id": id.object_id() })
            .await
            .with_context(|| format!("failed to load book {id}"))?
            .map(Book::try_from)
            .transpose()
    }

    async fn insert(&self, book: NewBook) -> anyhow::Result<BookId> {
        let id = BookId::generate();
        let document = BookDocument {
            id: id.object_id(),
            title: book.title,
            author: book.author,
            genre: book.genre,
            price: book.price,
            quantity: book.quantity,
            date_added: to_bson_datetime(book.date_added),
        };

        let result = self
            .books
            .insert_one(&document)
            .await
            .context("failed to insert book")?;

        result
            .inserted_id
            .as_object_id()
            .map(BookId::from)
            .ok_or_else(|| anyhow!("insert returned non-ObjectId id {}", result.inserted_id))
    }

    async fn delete(&self, id: &BookId) -> anyhow::Result<bool> {
        let result = self
            .books
            .delete_one(doc! { "_id": id.object_id() })
            .await
            .with_context(|| format!("failed to delete book {id}"))?;
        Ok(result.deleted_count > 0)
    }

    async fn update_field(&self, id: &BookId, update: &FieldUpdate) -> anyhow::Result<bool> {
        let result = self
            .books
            .update_one(doc! { "_id": id.object_id() }, set_document(update))
            .await
            .with_context(|| format!("failed to update {} of book {id}", update.field()))?;
        Ok(result.matched_count > 0)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        bookstore_db::ping(&self.database).await
    }
}
