//! HTTP gateway to the hosted receipt backend.
//!
//! The backend is a managed service exposing relational tables through a
//! REST dialect (`/rest/v1/{table}` with filter query pairs) and object
//! storage buckets (`/storage/v1/object/...`). This crate owns transport,
//! auth headers and error mapping; it knows nothing about receipts.
//!
//! # Example
//!
//! ```no_run
//! use receipt_cloud_gateway::Gateway;
//!
//! # async fn example() -> Result<(), receipt_cloud_gateway::GatewayError> {
//! let gateway = Gateway::new("https://project.example.co", "anon-key");
//!
//! #[derive(serde::Deserialize)]
//! struct Row { serial_number: String }
//!
//! let rows: Vec<Row> = gateway
//!     .select("serial_numbers", &[("limit", "5".into())])
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod gateway;
mod storage;
mod tables;

pub use error::GatewayError;
pub use gateway::{Gateway, GatewayConfig, DEFAULT_BUCKET};
pub use storage::ObjectEntry;
