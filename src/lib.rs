pub mod config;
pub mod error;
pub mod db;
pub mod store;
pub mod vocab;
pub mod import;
pub mod index;
pub mod audit;
pub mod seed;

pub use config::Config;
pub use error::{RelimportError, Result};
pub use import::{import_rows, run_import, ImportOptions, ImportSummary, RowOutcome};
