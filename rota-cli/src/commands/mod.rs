//! CLI command implementations

pub mod pr;
pub mod serve;
pub mod team;
pub mod user;

pub use pr::PrArgs;
pub use serve::ServeArgs;
pub use team::TeamArgs;
pub use user::UserArgs;

use anyhow::Context;
use rota_core::{Config, Database};

/// Open the configured database, running migrations if needed
pub(crate) async fn open_database(config: &Config) -> anyhow::Result<Database> {
    Database::connect(config.database_config())
        .await
        .with_context(|| {
            format!(
                "Failed to open database at {}",
                config.database.path.display()
            )
        })
}
