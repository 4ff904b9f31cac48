pub mod catalog;
pub mod connection;
pub mod sink;
pub mod source;

pub use catalog::{JsonbColumn, discover_jsonb_columns};
pub use connection::ConnectionPool;
pub use sink::{default_destination, persist_report};
pub use source::JsonbSource;
