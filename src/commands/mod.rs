//! Command implementations
//!
//! Commands are organized into two categories:
//!
//! - `plumbing`: Machine-readable output (the wire encoding)
//! - `porcelain`: Human-readable output (colored unified diffs)
//!
//! Both are implemented as methods on `Session` and share the same engine.

pub mod plumbing;
pub mod porcelain;
