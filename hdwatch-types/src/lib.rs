//! # hdwatch-types
//!
//! Core types for disk health diagnostics. This crate defines the schema
//! that the hdwatch agent publishes to a diagnostics sink: one
//! [`DiagnosticStatus`] per monitored aspect, bundled into a
//! [`DiagnosticArray`] on every publish.
//!
//! ## Features
//!
//! - `serde`: JSON (or any serde format) serialization of every type
//!
//! ## Example
//!
//! ```rust
//! use hdwatch_types::{DiagnosticArray, DiagnosticStatus, Level};
//!
//! let temperature = DiagnosticStatus::builder("robot1 HD Temperature")
//!     .level(Level::Warning)
//!     .message("Warm")
//!     .text("Disk 0 Temp Status", "Warm")
//!     .number("Disk 0 Temp", 52.0)
//!     .build();
//!
//! let message = DiagnosticArray::builder().status(temperature).build();
//!
//! assert_eq!(message.worst_level(), Level::Warning);
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. The version is included in serialized
//! messages so consumers can handle format evolution gracefully.

mod level;
mod message;
mod status;

pub use level::*;
pub use message::*;
pub use status::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the message format.
pub const SCHEMA_VERSION: u32 = 1;
