pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod validation;
pub mod views;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use models::EditableField;
use service::BookCatalog;
use store::BookStore;

/// Books module: the catalog routes over an injected store
pub struct BooksModule {
    catalog: BookCatalog,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            catalog: BookCatalog::new(store),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            collection = %ctx.settings.database.collection,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let id_param = json!({
            "name": "id", "in": "path", "required": true,
            "schema": { "type": "string", "pattern": "^[0-9a-f]{24}$" }
        });
        let redirect = |to: &str| json!({ "description": format!("Redirect to {to}") });

        let mut paths = json!({
            "/home": {
                "get": {
                    "summary": "Home view",
                    "tags": ["Books"],
                    "responses": { "200": { "description": "Available actions" } }
                }
            },
            "/search": {
                "get": {
                    "summary": "Search books; no parameters yields no results",
                    "tags": ["Books"],
                    "parameters": [
                        { "name": "title", "in": "query", "schema": { "type": "string" } },
                        { "name": "author", "in": "query", "schema": { "type": "string" } },
                        { "name": "genre", "in": "query", "schema": { "type": "string" } },
                        { "name": "date_added", "in": "query", "schema": { "type": "string", "format": "date" } },
                        { "name": "price", "in": "query", "schema": { "type": "number" } }
                    ],
                    "responses": {
                        "200": {
                            "description": "Matching books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "count": { "type": "integer" },
                                            "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                                        }
                                    }
                                }
                            }
                        },
                        "400": error("Invalid date or price format")
                    }
                }
            },
            "/add": {
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "content": {
                            "application/x-www-form-urlencoded": {
                                "schema": { "$ref": "#/components/schemas/AddBookForm" }
                            }
                        }
                    },
                    "responses": {
                        "303": redirect("/home"),
                        "400": error("Missing or invalid fields")
                    }
                }
            },
            "/delete/{id}": {
                "post": {
                    "summary": "Delete a book; unknown ids are ignored",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "303": redirect("/home"),
                        "404": error("Malformed id")
                    }
                }
            },
            "/show_inventory": {
                "get": {
                    "summary": "Title and quantity of every book",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "Inventory",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "count": { "type": "integer" },
                                            "books": { "type": "array", "items": { "$ref": "#/components/schemas/BookSummary" } }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/book_detail/{id}": {
                "get": {
                    "summary": "Book detail",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": { "description": "The book and its actions" },
                        "404": error("Unknown or malformed id")
                    }
                }
            }
        });

        for field in EditableField::ALL {
            let schema = if field.is_numeric() {
                json!({ "type": "number", "exclusiveMinimum": 0 })
            } else {
                json!({ "type": "string", "minLength": 1 })
            };
            paths[format!("/edit_{}/{{id}}", field.name())] = json!({
                "post": {
                    "summary": format!("Edit the {field} of a book"),
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "requestBody": {
                        "content": {
                            "application/x-www-form-urlencoded": {
                                "schema": {
                                    "type": "object",
                                    "properties": { field.name(): schema },
                                    "required": [field.name()]
                                }
                            }
                        }
                    },
                    "responses": {
                        "303": redirect("/book_detail/{id}"),
                        "400": error("Invalid value"),
                        "404": error("Unknown or malformed id")
                    }
                }
            });
        }

        Some(json!({
            "paths": paths,
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Store-assigned identifier" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "price": { "type": "number", "exclusiveMinimum": 0 },
                            "quantity": { "type": "integer", "minimum": 1 },
                            "date_added": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "author", "genre", "price", "quantity", "date_added"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "quantity": { "type": "integer" }
                        },
                        "required": ["id", "title", "quantity"]
                    },
                    "AddBookForm": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "price": { "type": "string" },
                            "quantity": { "type": "string" }
                        },
                        "required": ["title", "author", "genre", "price", "quantity"]
                    }
                }
            }
        }))
    }

    async fn ready(&self) -> anyhow::Result<()> {
        self.catalog.ping().await
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        // Best effort: an unreachable store is logged, not fatal.
        match self.catalog.ping().await {
            Ok(()) => tracing::info!(module = self.name(), "book store reachable"),
            Err(err) => tracing::warn!(
                module = self.name(),
                error = %format!("{err:#}"),
                "book store unreachable at startup"
            ),
        }
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module over the given store
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
