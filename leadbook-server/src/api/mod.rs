//! HTTP API handlers for leadbook-server

pub mod csv;
pub mod status;

pub use csv::{download_csv, get_csv_data, list_csv_files, upload_csv};
pub use status::{status_routes, BUILD};
