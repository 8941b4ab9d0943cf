use std::{fmt, str::FromStr};

use mongodb::bson::oid::ObjectId;
use serde::{Serialize, Serializer};
use chrono::{DateTime, Utc};

/// Store-assigned identifier of a book, rendered as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(ObjectId);

impl BookId {
    /// Allocate a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for BookId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

/// The raw identifier was not a well-formed object id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid book id")]
pub struct InvalidBookId(pub String);

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidBookId(raw.to_string()))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A book record as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
    pub quantity: i64,
    /// Creation time in UTC; never modified after insert
    pub date_added: DateTime<Utc>,
}

impl Book {
    pub fn from_new(id: BookId, book: NewBook) -> Self {
        Self {
            id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            price: book.price,
            quantity: book.quantity,
            date_added: book.date_added,
        }
    }

    /// Apply a single-field edit. `id` and `date_added` are never touched.
    pub fn apply(&mut self, update: &FieldUpdate) {
        match update {
            FieldUpdate::Title(title) => self.title = title.clone(),
            FieldUpdate::Author(author) => self.author = author.clone(),
            FieldUpdate::Genre(genre) => self.genre = genre.clone(),
            FieldUpdate::Price(price) => self.price = *price,
            FieldUpdate::Quantity(quantity) => self.quantity = *quantity,
        }
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            quantity: self.quantity,
        }
    }
}

/// Reduced projection used by the inventory listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub quantity: i64,
}

/// A validated book that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
    pub quantity: i64,
    pub date_added: DateTime<Utc>,
}

/// Fields that can be edited one at a time after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditableField {
    Title,
    Author,
    Genre,
    Price,
    Quantity,
}

impl EditableField {
    pub const ALL: [EditableField; 5] = [
        EditableField::Price,
        EditableField::Quantity,
        EditableField::Title,
        EditableField::Author,
        EditableField::Genre,
    ];

    /// Form key and document field name.
    pub fn name(self) -> &'static str {
        match self {
            EditableField::Title => "title",
            EditableField::Author => "author",
            EditableField::Genre => "genre",
            EditableField::Price => "price",
            EditableField::Quantity => "quantity",
        }
    }

    /// Capitalized name used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            EditableField::Title => "Title",
            EditableField::Author => "Author",
            EditableField::Genre => "Genre",
            EditableField::Price => "Price",
            EditableField::Quantity => "Quantity",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, EditableField::Price | EditableField::Quantity)
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated new value for exactly one editable field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Title(String),
    Author(String),
    Genre(String),
    Price(f64),
    Quantity(i64),
}

impl FieldUpdate {
    pub fn field(&self) -> EditableField {
        match self {
            FieldUpdate::Title(_) => EditableField::Title,
            FieldUpdate::Author(_) => EditableField::Author,
            FieldUpdate::Genre(_) => EditableField::Genre,
            FieldUpdate::Price(_) => EditableField::Price,
            FieldUpdate::Quantity(_) => EditableField::Quantity,
        }
    }
}
