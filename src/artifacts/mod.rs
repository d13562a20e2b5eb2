//! Diff data structures and algorithms
//!
//! This module contains the building blocks the orchestrator is made of:
//!
//! - `algorithms`: Alignment algorithms (DP, Myers), their selector and the deadline
//! - `core`: Shared utilities (pager wrapper, output selection)
//! - `heuristics`: Post-processing passes that make raw alignments readable
//! - `mapping`: Result model (range mappings, line range mappings, `LinesDiff`)
//! - `options`: Caller-facing computation options
//! - `ranges`: Offset ranges, line ranges, positions and text ranges
//! - `sequence`: Line and character views of a document
//! - `wire`: Compact serialized result form

pub mod algorithms;
pub mod core;
pub mod heuristics;
pub mod mapping;
pub mod options;
pub mod ranges;
pub mod sequence;
pub mod wire;
