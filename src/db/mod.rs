//! Document store module.
//!
//! The managed MongoDB instance is the source of truth for all application
//! data; the process holds no cache or secondary index.

mod repository;
pub mod store;

pub use repository::*;
pub use store::*;

use mongodb::bson::doc;
use mongodb::{Client, Database};

/// Connect to the document store and verify the connection.
pub async fn init_database(uri: &str, db_name: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    let db = client.database(db_name);

    // The driver connects lazily; ping so startup fails fast on a bad URI.
    db.run_command(doc! { "ping": 1 }).await?;

    Ok(db)
}
