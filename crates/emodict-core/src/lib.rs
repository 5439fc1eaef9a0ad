pub mod config;
pub mod dataset;
pub mod db;
pub mod dimensions;
pub mod encoding;
pub mod error;
pub mod ingest;
pub mod schema;
