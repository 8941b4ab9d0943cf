//! View models rendered by the route handlers.

use serde::Serialize;

use super::models::{Book, BookSummary, EditableField};

#[derive(Debug, Serialize)]
pub struct Link {
    pub method: &'static str,
    pub href: String,
    pub description: &'static str,
}

impl Link {
    fn new(method: &'static str, href: impl Into<String>, description: &'static str) -> Self {
        Self {
            method,
            href: href.into(),
            description,
        }
    }
}

/// Landing page: the actions available from the home screen.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub title: &'static str,
    pub links: Vec<Link>,
}

impl HomeView {
    pub fn new() -> Self {
        Self {
            title: "Bookstore inventory",
            links: vec![
                Link::new("GET", "/show_inventory", "List every book with its stock"),
                Link::new(
                    "GET",
                    "/search?title=&author=&genre=&date_added=&price=",
                    "Search the catalog",
                ),
                Link::new("POST", "/add", "Add a book"),
            ],
        }
    }
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryView {
    pub count: usize,
    pub books: Vec<BookSummary>,
}

impl From<Vec<BookSummary>> for InventoryView {
    fn from(books: Vec<BookSummary>) -> Self {
        Self {
            count: books.len(),
            books,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub count: usize,
    pub books: Vec<Book>,
}

impl From<Vec<Book>> for SearchView {
    fn from(books: Vec<Book>) -> Self {
        Self {
            count: books.len(),
            books,
        }
    }
}

/// A single book plus the edit and delete actions for it.
#[derive(Debug, Serialize)]
pub struct BookDetailView {
    pub book: Book,
    pub actions: Vec<Link>,
}

impl From<Book> for BookDetailView {
    fn from(book: Book) -> Self {
        let mut actions: Vec<Link> = EditableField::ALL
            .iter()
            .map(|field| {
                Link::new(
                    "POST",
                    format!("/edit_{}/{}", field.name(), book.id),
                    "Edit one field",
                )
            })
            .collect();
        actions.push(Link::new("POST", format!("/delete/{}", book.id), "Delete this book"));

        Self { book, actions }
    }
}
