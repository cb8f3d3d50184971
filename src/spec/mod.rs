//! Per-task drift configuration.
//!
//! A task declares which files count as its spec via a fenced ```skew
//! block embedded in the task description. The block body is TOML and is
//! parsed strictly into a typed [`TaskSpecification`] up front, so the
//! rest of the engine never handles raw untyped data.

mod block;
mod config;

pub use block::{extract_block, parse_spec_block, SpecParseError, FENCE_INFO};
pub use config::{TaskSpecification, SUPPORTED_SCHEMA};
