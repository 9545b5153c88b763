//! Rusty Shelf - book metadata and review analytics.
//!
//! Loads a books table and a reviews table, cleans both, flags outliers,
//! scores review sentiment and ranks books, authors and categories.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::{ColumnConfig, PipelineConfig};
pub use data::model::{Row, Table, Value};
pub use error::{PipelineError, ScoringError};
pub use pipeline::Pipeline;
pub use report::Report;
