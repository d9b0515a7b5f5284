//! Report module for rendering SondeHub recovery data as natural language.
//!
//! The upstream API returns loosely typed JSON; this module normalizes each
//! record and renders a bounded report for language model consumption.

pub mod format;
pub mod types;

pub use format::{
    format_api_response, format_recoveries, format_timestamp, FormatError, Report,
    MAX_RENDERED_EVENTS,
};
pub use types::RecoveryEvent;
