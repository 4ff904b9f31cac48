pub mod analyzer;
pub mod config;
pub mod distinct;
pub mod error;
pub mod filter;
pub mod finalize;
pub mod path;
pub mod stats;
pub mod types;
pub mod walker;

pub use analyzer::{SchemaAnalyzer, analyze};
pub use config::{OutputTarget, SchemaOptions};
pub use error::AnalyzeError;
pub use finalize::{ResultRow, SchemaReport};
pub use stats::{Aggregation, PathStats, TypeStat};
pub use types::TypeTag;
