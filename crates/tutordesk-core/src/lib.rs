//! # tutordesk-core
//!
//! Core business logic for the tutordesk tutoring administration backend.
//!
//! This crate provides:
//! - Lesson schedule arithmetic (weekday occurrence counting)
//! - Invoice amount and storage-path derivation, plus PDF rendering
//! - Sandboxed hierarchical file storage for generated PDFs
//! - CRUD student record store backed by an embedded document database
//! - Configuration management
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`schedule`] - Counting lesson weekdays within a month
//! - [`invoice`] - Amount derivation, date parsing, and the persistence bridge
//! - [`pdf`] - Plain-text invoice PDF rendering
//! - [`storage`] - Sandboxed file storage confined to a single root
//! - [`students`] - Student profile CRUD over sled
//! - [`config`] - Application configuration loading and saving
//! - [`error`] - Unified error types for the crate

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod invoice;
pub mod pdf;
pub mod schedule;
pub mod storage;
pub mod students;

// Re-export primary types for convenience
pub use config::{DatabaseConfig, ServerConfig, StorageConfig, TutordeskConfig};
pub use error::{Result, TutordeskError};
pub use invoice::{
    format_amount, invoice_amount, store_invoice, InvoiceDate, InvoiceSummary,
};
pub use pdf::render_invoice;
pub use schedule::{count_weekday_occurrences, parse_weekday};
pub use storage::{NodeKind, Storage, StorageNode};
pub use students::{StudentInput, StudentRecord, StudentStore};
