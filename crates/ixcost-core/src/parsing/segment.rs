use regex::Regex;
use serde::{Deserialize, Serialize};

/// Study-type codes used when a profile does not name its own.
pub const DEFAULT_PREFIXES: &[&str] = &["GEN", "ASGI"];

/// Lexical form of a generator (interconnection request) number.
///
/// `<PREFIX>[ -]<YYYY>-<NN|NNN>[suffix]`, e.g. `GEN-2022-123N` or `ASGI-2023-045`.
/// The prefix comes from an enumerated set of study-type codes and the suffix
/// is an optional revision/status code.
#[derive(Debug, Clone)]
pub struct GeneratorPattern {
    body: String,
    exact: Regex,
    line: Regex,
    inline: Regex,
}

impl GeneratorPattern {
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Result<Self, regex::Error> {
        let alternation = prefixes
            .iter()
            .map(|p| regex::escape(p.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let body = format!(r"(?:{alternation})[ -]\d{{4}}-\d{{2,3}}[A-Za-z0-9]*");

        Ok(GeneratorPattern {
            exact: Regex::new(&format!("^{body}$"))?,
            line: Regex::new(&format!(r"(?m)^[ \t]*({body})[ \t\r]*$"))?,
            inline: Regex::new(&format!(r"\b{body}\b"))?,
            body,
        })
    }

    /// Pattern for the default `GEN`/`ASGI` prefixes.
    pub fn standard() -> Self {
        // The default prefixes are plain letters, so this cannot fail.
        Self::new(DEFAULT_PREFIXES).expect("default generator pattern compiles")
    }

    /// Whether `id` is exactly one generator number.
    pub fn is_match(&self, id: &str) -> bool {
        self.exact.is_match(id)
    }

    /// Regex source matching one generator number, without anchors.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Generator numbers anywhere in `text`, in order.
    pub fn find_inline<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.inline.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Generator numbers standing alone on their own line, in document order.
    pub fn find_markers(&self, text: &str) -> Vec<GeneratorMarker> {
        self.line
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let id = caps.get(1)?;
                Some(GeneratorMarker {
                    generator_id: id.as_str().to_string(),
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect()
    }
}

/// A generator number located in a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorMarker {
    pub generator_id: String,
    pub start: usize,
    pub end: usize,
}

/// How far a generator block extends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockBoundary {
    /// Up to the next sentinel token. Generator numbers inside the block are
    /// treated as layout noise and skipped.
    #[default]
    Sentinel,
    /// Up to the next sentinel or the next generator number, whichever comes first.
    SentinelOrNextGenerator,
}

/// One generator's slice of a section, as byte offsets into the section text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorBlock {
    pub generator_id: String,
    pub start: usize,
    pub end: usize,
}

impl GeneratorBlock {
    pub fn text<'a>(&self, section: &'a str) -> &'a str {
        &section[self.start..self.end]
    }
}

/// A generator number that fell inside an earlier block and got no block of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMarker {
    pub generator_id: String,
    pub offset: usize,
    pub consumed_until: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub blocks: Vec<GeneratorBlock>,
    pub skipped: Vec<SkippedMarker>,
}

/// Partition a section into ordered, non-overlapping generator blocks.
///
/// Each block starts at its generator line and ends at the next `sentinel`
/// found after it (or the section end). The consumed offset is threaded through
/// the fold, so a marker located before the previous block's end is skipped
/// rather than counted twice.
pub fn segment_blocks(
    section: &str,
    pattern: &GeneratorPattern,
    sentinel: &str,
    boundary: BlockBoundary,
) -> Segmentation {
    let markers = pattern.find_markers(section);

    let (_, segmentation) = markers.iter().enumerate().fold(
        (0usize, Segmentation::default()),
        |(cursor, mut acc), (i, marker)| {
            if marker.start < cursor {
                acc.skipped.push(SkippedMarker {
                    generator_id: marker.generator_id.clone(),
                    offset: marker.start,
                    consumed_until: cursor,
                });
                return (cursor, acc);
            }

            let sentinel_end = section[marker.end..]
                .find(sentinel)
                .map(|i| marker.end + i)
                .unwrap_or(section.len());

            let end = match boundary {
                BlockBoundary::Sentinel => sentinel_end,
                BlockBoundary::SentinelOrNextGenerator => markers
                    .get(i + 1)
                    .map(|next| next.start.min(sentinel_end))
                    .unwrap_or(sentinel_end),
            };

            acc.blocks.push(GeneratorBlock {
                generator_id: marker.generator_id.clone(),
                start: marker.start,
                end,
            });
            (end, acc)
        },
    );

    segmentation
}
