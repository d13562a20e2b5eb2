//! Top-level components a diff run is made of
//!
//! - `computer`: The two-level line/char diff engine
//! - `session`: Command context (working directory, output writer, engine)
//! - `workspace`: Loading documents from disk

pub mod computer;
pub mod session;
pub mod workspace;
