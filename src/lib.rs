//! omw - Out of my way
//!
//! This library provides the core of the omw time tracking CLI.
//!
//! # Core Concepts
//!
//! - **Entries**: a task description plus the time it was logged
//! - **Modifiers**: a trailing `**` marks a break, `***` marks ignored time
//! - **Reports**: time between consecutive entries, summed per category,
//!   restarting at each new calendar day
//! - **Edit transactions**: hand edits validated before they replace the
//!   timesheet, with a `.bak` copy of the previous content
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `codec`: Task text decoding
//! - `config`: Configuration loading from `~/.omw/config.toml`
//! - `editor`: Edit surfaces (external editor launcher)
//! - `error`: Error types and result aliases
//! - `lock`: Advisory file locking
//! - `output`: CLI success/error envelopes
//! - `render`: Report text/JSON/FullCalendar rendering
//! - `report`: Report window parsing and aggregation
//! - `store`: Timesheet storage
//! - `validate`: Validation and repair of edited timesheets

pub mod cli;
pub mod codec;
pub mod config;
pub mod editor;
pub mod error;
pub mod lock;
pub mod output;
pub mod render;
pub mod report;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
