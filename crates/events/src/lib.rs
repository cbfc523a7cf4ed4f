//! Wire schemas for the brain's journals.
//!
//! This crate is the single source of truth for everything that crosses a
//! journal file: the command documents the brain ingests and the
//! spike/status/error/hormone records it emits. Both the brain and the
//! coach consume these types, so the contract lives in its own crate.
//!
//! All documents are line-delimited JSON. Command ingestion is tolerant:
//! the payload may sit at the top level or under a `data` object, unknown
//! commands are ignored, and unknown fields never fail a parse.

pub mod command;
pub mod record;

pub use command::{parse_command_line, Command, CommandEnvelope, CommandParseError};
pub use record::{epoch_seconds, iso_timestamp, HormoneLevels, LogRecord, SpikeRecord};
