//! Bookstore inventory service
//!
//! Browse, search, add, edit and delete book records kept in a document
//! store, served over HTTP.

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use bookstore_kernel::{InitCtx, ModuleRegistry, Settings};

use modules::books::store::{self, BookStore};

/// Connect the book store selected by the settings
pub async fn connect_store(settings: &Settings) -> anyhow::Result<Arc<dyn BookStore>> {
    store::connect(&settings.database.uri, &settings.database)
        .await
        .context("failed to create book store")
}

/// Build the full application router over an existing store
pub fn build_app(store: Arc<dyn BookStore>, settings: &Settings) -> Router {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    bookstore_http::build_router(Arc::new(registry), settings)
}

/// Run the service until shutdown
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = connect_store(&settings).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    let registry = Arc::new(registry);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookstore_http::start_server(registry.clone(), &settings).await;

    registry.stop_all().await?;
    served
}
