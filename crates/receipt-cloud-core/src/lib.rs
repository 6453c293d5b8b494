//! Core types and pure logic for receipt-cloud.
//!
//! This crate provides the foundational types shared by the gateway and the
//! client SDK:
//!
//! - **Config**: [`AppConfig`], [`MembershipOption`]
//! - **Receipts**: [`SerialRecord`], [`ReceiptRecord`], [`ReceiptStatus`]
//! - **Serial numbers**: parsing and formatting of `YYYY-N-NNNN` serials
//! - **Statistics**: [`ReceiptStatistics`] folded client-side over rows
//! - **Users**: [`User`], [`Role`]
//!
//! No I/O happens here; everything is pure and unit-testable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod receipt;
pub mod serial;
pub mod stats;
pub mod user;

pub use config::{AppConfig, MembershipOption, CONFIG_ID};
pub use receipt::{ReceiptRecord, ReceiptStatus, SerialRecord};
pub use serial::{format_serial, trailing_number, year_prefix, SERIAL_PAD_WIDTH};
pub use stats::{ReceiptStatistics, StatRow};
pub use user::{Role, User};
