//! MongoDB client factory and backend selection.

use anyhow::Context;
use mongodb::{bson::doc, Client, Database};

use bookstore_kernel::settings::DatabaseSettings;

const MEMORY_SCHEME: &str = "memory://";

/// Storage backend selected by the configured connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// In-process store, nothing is persisted.
    Memory,
    /// MongoDB deployment reachable at the given URI.
    Mongo { uri: String },
}

impl Backend {
    pub fn from_uri(uri: &str) -> anyhow::Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            anyhow::bail!("database uri is empty; set DB_URI");
        }
        if uri.starts_with(MEMORY_SCHEME) {
            return Ok(Backend::Memory);
        }
        if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
            return Ok(Backend::Mongo {
                uri: uri.to_string(),
            });
        }
        anyhow::bail!("unsupported database uri scheme in '{}'", redact(uri))
    }
}

/// Connect to MongoDB and select the configured database.
///
/// The driver connects lazily, so this succeeds even when the server is
/// down; use [`ping`] to probe reachability.
pub async fn connect(uri: &str, settings: &DatabaseSettings) -> anyhow::Result<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .with_context(|| format!("failed to parse MongoDB uri '{}'", redact(uri)))?;

    tracing::info!(
        target: "bookstore_db",
        uri = %redact(uri),
        database = %settings.name,
        "mongodb client created"
    );

    Ok(client.database(&settings.name))
}

/// Round-trip a `ping` command against the deployment.
pub async fn ping(database: &Database) -> anyhow::Result<()> {
    database
        .run_command(doc! { "ping": 1 })
        .await
        .context("mongodb ping failed")?;
    Ok(())
}

/// Strip credentials from a connection string before logging it.
pub fn redact(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &uri[..scheme_end], &uri[at + 1..])
        }
        _ => uri.to_string(),
    }
}
