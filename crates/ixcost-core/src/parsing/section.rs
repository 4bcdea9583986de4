use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Span;

/// Which side of a section could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMarker {
    Start,
    End,
    Both,
}

impl fmt::Display for MissingMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingMarker::Start => write!(f, "start marker"),
            MissingMarker::End => write!(f, "end marker"),
            MissingMarker::Both => write!(f, "start and end markers"),
        }
    }
}

/// The section could not be bounded in this document.
///
/// Expected for documents in an older layout or without the section at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionNotFound {
    pub missing: MissingMarker,
}

/// Locate a section between candidate start and end headings.
///
/// Each list is scanned in priority order and the first marker that occurs
/// anywhere in `text` wins, even when a lower-priority marker appears earlier.
/// The start and end lists are resolved independently, so the returned span may
/// be inverted; callers check [`Span::is_inverted`].
pub fn locate_section<S: AsRef<str>>(
    text: &str,
    start_markers: &[S],
    end_markers: &[S],
) -> Result<Span, SectionNotFound> {
    let start = first_marker_offset(text, start_markers);
    let end = first_marker_offset(text, end_markers);

    match (start, end) {
        (Some(start), Some(end)) => Ok(Span { start, end }),
        (None, Some(_)) => Err(SectionNotFound {
            missing: MissingMarker::Start,
        }),
        (Some(_), None) => Err(SectionNotFound {
            missing: MissingMarker::End,
        }),
        (None, None) => Err(SectionNotFound {
            missing: MissingMarker::Both,
        }),
    }
}

/// Offset of the first marker (in list order) found in `text`.
fn first_marker_offset<S: AsRef<str>>(text: &str, markers: &[S]) -> Option<usize> {
    markers.iter().find_map(|m| {
        let m = m.as_ref();
        if m.is_empty() {
            None
        } else {
            text.find(m)
        }
    })
}
