//! Sequences the alignment algorithms run over
//!
//! An algorithm only ever sees integer elements. Two elements are equal for
//! alignment purposes iff their integers are equal.
//!
//! - `line_sequence`: one element per line, keyed by the trimmed line text
//! - `char_sequence`: one element per character of a slice of lines

pub mod char_sequence;
pub mod line_sequence;

pub use char_sequence::CharSequence;
pub use line_sequence::{LineHashes, LineSequence, line_match_weight};

/// Indexable sequence of comparable elements
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element identity at `offset`
    fn element(&self, offset: usize) -> u32;

    /// Score for placing a diff boundary before element `length`
    ///
    /// Higher is better. `None` if the sequence has no notion of boundaries,
    /// in which case diffs are never slid towards a better position.
    fn boundary_score(&self, _length: usize) -> Option<i32> {
        None
    }

    /// Exact equality of the raw elements behind two offsets of this sequence
    fn is_strongly_equal(&self, offset1: usize, offset2: usize) -> bool;
}
