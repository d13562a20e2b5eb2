//! Range primitives
//!
//! - `offset_range`: 0-based half-open ranges over element indices
//! - `line_range`: 1-based half-open ranges over line numbers
//! - `position`: document positions and text ranges

pub mod line_range;
pub mod offset_range;
pub mod position;
