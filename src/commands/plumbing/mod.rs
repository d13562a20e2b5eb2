//! Plumbing commands (machine-facing output)
//!
//! Plumbing commands print results in a stable, parseable form meant for
//! scripts and editor hosts rather than people.
//!
//! ## Commands
//!
//! - `compute`: Print the wire encoding of a diff as JSON

pub mod compute;
