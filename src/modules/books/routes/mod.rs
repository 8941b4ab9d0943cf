//! HTTP routes for the books module.

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query, State,
    },
    response::Redirect,
    routing::{get, post, MethodRouter},
    Form, Json, Router,
};
use bookstore_http::error::AppError;

use super::{
    models::EditableField,
    service::{BookCatalog, CatalogError},
    validation::{AddBookInput, SearchParams},
    views::{BookDetailView, HomeView, InventoryView, SearchView},
};

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(err) => AppError::validation(err.details(), err.to_string()),
            CatalogError::InvalidId(err) => AppError::not_found(err.to_string()),
            CatalogError::NotFound(id) => AppError::not_found(format!("book {id} not found")),
            CatalogError::Store(err) => AppError::Internal(err),
        }
    }
}

/// Build the module router with the catalog injected as state
pub fn router(catalog: BookCatalog) -> Router {
    let mut router = Router::new()
        .route("/home", get(home))
        .route("/search", get(search))
        .route("/add", post(add))
        .route("/delete/{id}", post(delete))
        .route("/show_inventory", get(show_inventory))
        .route("/book_detail/{id}", get(book_detail));

    for field in EditableField::ALL {
        router = router.route(&format!("/edit_{}/{{id}}", field.name()), edit_route(field));
    }

    router.with_state(catalog)
}

async fn home() -> Json<HomeView> {
    Json(HomeView::new())
}

async fn search(
    State(catalog): State<BookCatalog>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchView>, AppError> {
    let Query(params) = query?;
    let books = catalog.search(&params).await?;
    Ok(Json(SearchView::from(books)))
}

async fn add(
    State(catalog): State<BookCatalog>,
    form: Result<Form<AddBookInput>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(input) = form?;
    catalog.add(&input).await?;
    Ok(Redirect::to("/home"))
}

async fn delete(
    State(catalog): State<BookCatalog>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    catalog.delete(&id).await?;
    Ok(Redirect::to("/home"))
}

async fn show_inventory(
    State(catalog): State<BookCatalog>,
) -> Result<Json<InventoryView>, AppError> {
    let books = catalog.inventory().await?;
    Ok(Json(InventoryView::from(books)))
}

async fn book_detail(
    State(catalog): State<BookCatalog>,
    Path(id): Path<String>,
) -> Result<Json<BookDetailView>, AppError> {
    let book = catalog.detail(&id).await?;
    Ok(Json(BookDetailView::from(book)))
}

/// One POST handler per editable field, all sharing the same logic
fn edit_route(field: EditableField) -> MethodRouter<BookCatalog> {
    post(
        move |State(catalog): State<BookCatalog>,
              Path(id): Path<String>,
              form: Result<Form<HashMap<String, String>>, FormRejection>| async move {
            edit_field(catalog, id, field, form).await
        },
    )
}

async fn edit_field(
    catalog: BookCatalog,
    id: String,
    field: EditableField,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let raw = form.get(field.name()).map(String::as_str);
    let id = catalog.edit(&id, field, raw).await?;
    Ok(Redirect::to(&format!("/book_detail/{id}")))
}
