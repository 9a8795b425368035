//! testdeck Common Library
//!
//! Test case catalogs, the precondition dependency resolver, plan runs and
//! the local state store shared by the testdeck console.

pub mod catalog;
pub mod db;
pub mod error;
pub mod plan;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, InMemoryCatalog};
pub use db::Database;
pub use error::{Error, Result};
pub use plan::{build_script_batch, prepare_run, resolve_steps};
pub use resolver::{resolve, Resolution, ResolveMode, Resolver};
pub use types::*;

/// testdeck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default store path
pub fn default_store_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".testdeck")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
