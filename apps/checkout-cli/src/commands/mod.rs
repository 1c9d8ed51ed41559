//! Subcommand implementations.
//!
//! ```text
//! quote    cart.json     → breakdown           (core only)
//! replay   actions.json  → step/errors/prices  (core only)
//! submit   cart.json     → stored order        (core + db)
//! orders   [--date]      → order list          (db)
//! catalog  [--kind]      → product list        (db)
//! ```

pub mod catalog;
pub mod orders;
pub mod quote;
pub mod replay;
pub mod submit;

use bounce_db::{Database, DbConfig};
use std::path::Path;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Reads a whole input file.
pub(crate) fn read_input(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Opens (creating if needed) the configured database and runs migrations.
pub(crate) async fn open_database(config: &AppConfig) -> CliResult<Database> {
    let path = config.database.resolved_path();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Read {
            path: parent.display().to_string(),
            source,
        })?;
    }

    info!(path = %path.display(), "Opening order database");
    Ok(Database::new(DbConfig::new(path)).await?)
}
