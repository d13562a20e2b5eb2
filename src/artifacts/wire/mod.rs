//! Compact serialized form of a diff result
//!
//! Changes are encoded as positional arrays to keep payloads small:
//!
//! ```json
//! {
//!   "identical": false,
//!   "quitEarly": false,
//!   "changes": [[2, 3, 2, 3, [[2, 1, 2, 2, 2, 1, 2, 2]]]]
//! }
//! ```
//!
//! A change is `[origStart, origEndExclusive, modStart, modEndExclusive]`, with
//! a fifth element listing its inner changes when the block was refined. Each
//! inner change is `[origStartLine, origStartCol, origEndLine, origEndCol,
//! modStartLine, modStartCol, modEndLine, modEndCol]`.

use crate::artifacts::mapping::{LineRangeMapping, LinesDiff, RangeMapping};
use crate::artifacts::ranges::line_range::LineRange;
use crate::artifacts::ranges::position::TextRange;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Wire form of a `LinesDiff`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffWire {
    /// Both documents are exactly equal
    pub identical: bool,
    /// The deadline expired and the result is coarse
    pub quit_early: bool,
    pub changes: Vec<WireChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawChange", into = "RawChange")]
pub struct WireChange {
    pub original_start_line_number: usize,
    pub original_end_line_number_exclusive: usize,
    pub modified_start_line_number: usize,
    pub modified_end_line_number_exclusive: usize,
    pub inner_changes: Option<Vec<WireInnerChange>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireInnerChange(pub [usize; 8]);

/// Positional encoding of a `WireChange`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawChange {
    Refined(usize, usize, usize, usize, Option<Vec<WireInnerChange>>),
    Coarse(usize, usize, usize, usize),
}

impl From<RawChange> for WireChange {
    fn from(raw: RawChange) -> Self {
        let (a, b, c, d, inner_changes) = match raw {
            RawChange::Refined(a, b, c, d, inner) => (a, b, c, d, inner),
            RawChange::Coarse(a, b, c, d) => (a, b, c, d, None),
        };

        Self {
            original_start_line_number: a,
            original_end_line_number_exclusive: b,
            modified_start_line_number: c,
            modified_end_line_number_exclusive: d,
            inner_changes,
        }
    }
}

impl From<WireChange> for RawChange {
    fn from(change: WireChange) -> Self {
        let WireChange {
            original_start_line_number: a,
            original_end_line_number_exclusive: b,
            modified_start_line_number: c,
            modified_end_line_number_exclusive: d,
            inner_changes,
        } = change;

        match inner_changes {
            Some(inner) => RawChange::Refined(a, b, c, d, Some(inner)),
            None => RawChange::Coarse(a, b, c, d),
        }
    }
}

impl From<&RangeMapping> for WireInnerChange {
    fn from(mapping: &RangeMapping) -> Self {
        let [a, b, c, d] = mapping.original_range.to_array();
        let [e, f, g, h] = mapping.modified_range.to_array();

        WireInnerChange([a, b, c, d, e, f, g, h])
    }
}

impl From<&LineRangeMapping> for WireChange {
    fn from(mapping: &LineRangeMapping) -> Self {
        Self {
            original_start_line_number: mapping.original.start_line_number(),
            original_end_line_number_exclusive: mapping.original.end_line_number_exclusive(),
            modified_start_line_number: mapping.modified.start_line_number(),
            modified_end_line_number_exclusive: mapping.modified.end_line_number_exclusive(),
            inner_changes: mapping
                .inner_changes
                .as_ref()
                .map(|inner| inner.iter().map(WireInnerChange::from).collect()),
        }
    }
}

impl DiffWire {
    /// Encode `diff`, computed over `original` and `modified`
    ///
    /// `identical` needs the documents themselves: an empty change list can also
    /// mean that only whitespace differs while whitespace is ignored.
    pub fn from_lines_diff<S: AsRef<str>>(diff: &LinesDiff, original: &[S], modified: &[S]) -> Self {
        let identical = diff.changes.is_empty()
            && original.len() == modified.len()
            && original
                .iter()
                .zip(modified)
                .all(|(a, b)| a.as_ref() == b.as_ref());

        Self {
            identical,
            quit_early: diff.hit_timeout,
            changes: diff.changes.iter().map(WireChange::from).collect(),
        }
    }

    /// Decode back into a `LinesDiff`, rejecting malformed ranges
    pub fn into_lines_diff(self) -> anyhow::Result<LinesDiff> {
        let changes = self
            .changes
            .into_iter()
            .enumerate()
            .map(|(idx, change)| {
                change
                    .into_line_range_mapping()
                    .with_context(|| format!("invalid change #{idx}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(LinesDiff::new(changes, self.quit_early))
    }
}

impl WireChange {
    fn into_line_range_mapping(self) -> anyhow::Result<LineRangeMapping> {
        let original = LineRange::try_new(
            self.original_start_line_number,
            self.original_end_line_number_exclusive,
        )?;
        let modified = LineRange::try_new(
            self.modified_start_line_number,
            self.modified_end_line_number_exclusive,
        )?;

        let inner_changes = self
            .inner_changes
            .map(|inner| {
                inner
                    .into_iter()
                    .map(|WireInnerChange([a, b, c, d, e, f, g, h])| {
                        Ok(RangeMapping::new(
                            TextRange::try_new(a, b, c, d)?,
                            TextRange::try_new(e, f, g, h)?,
                        ))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(LineRangeMapping::new(original, modified, inner_changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn refined_diff() -> LinesDiff {
        LinesDiff::new(
            vec![LineRangeMapping::new(
                LineRange::new(2, 3),
                LineRange::new(2, 3),
                Some(vec![RangeMapping::new(
                    TextRange::new(2, 1, 2, 2),
                    TextRange::new(2, 1, 2, 2),
                )]),
            )],
            false,
        )
    }

    #[test]
    fn test_encodes_positional_changes() {
        let wire = DiffWire::from_lines_diff(&refined_diff(), &["a", "b", "c"], &["a", "x", "c"]);

        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({
                "identical": false,
                "quitEarly": false,
                "changes": [[2, 3, 2, 3, [[2, 1, 2, 2, 2, 1, 2, 2]]]],
            })
        );
    }

    #[test]
    fn test_unrefined_change_has_four_elements() {
        let diff = LinesDiff::new(
            vec![LineRangeMapping::new(LineRange::new(1, 4), LineRange::new(1, 1), None)],
            true,
        );
        let wire = DiffWire::from_lines_diff(&diff, &["a", "b", "c"], &[""]);

        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({ "identical": false, "quitEarly": true, "changes": [[1, 4, 1, 1]] })
        );
    }

    #[test]
    fn test_decodes_back_into_lines_diff() {
        let json = r#"{"identical":false,"quitEarly":false,"changes":[[2,3,2,3,[[2,1,2,2,2,1,2,2]]],[5,5,5,6]]}"#;

        let wire: DiffWire = serde_json::from_str(json).unwrap();
        let diff = wire.into_lines_diff().unwrap();

        assert_eq!(diff.changes.len(), 2);
        assert_eq!(diff.changes[0], refined_diff().changes[0]);
        assert_eq!(diff.changes[1].inner_changes, None);
        assert!(diff.changes[1].original.is_empty());
    }

    #[test]
    fn test_null_inner_changes_decode_as_unrefined() {
        let json = r#"{"identical":false,"quitEarly":false,"changes":[[1,2,1,2,null]]}"#;

        let wire: DiffWire = serde_json::from_str(json).unwrap();

        assert_eq!(wire.changes[0].inner_changes, None);
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let json = r#"{"identical":false,"quitEarly":false,"changes":[[3,2,1,2]]}"#;

        let wire: DiffWire = serde_json::from_str(json).unwrap();
        let err = wire.into_lines_diff().unwrap_err();

        assert!(format!("{err:#}").contains("invalid change #0"));
    }

    #[test]
    fn test_identical_requires_equal_documents() {
        let empty = LinesDiff::default();

        assert!(DiffWire::from_lines_diff(&empty, &["a"], &["a"]).identical);
        assert!(!DiffWire::from_lines_diff(&empty, &["a "], &["a"]).identical);
    }
}
