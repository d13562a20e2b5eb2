//! Porcelain commands (user-facing output)
//!
//! Porcelain commands render diffs for people: colored, with context lines and
//! the changed characters highlighted.
//!
//! ## Commands
//!
//! - `diff`: Show the changes between two files

pub mod diff;
