//! Boundary-aware text splitting with overlap

use unicode_segmentation::UnicodeSegmentation;

use super::ChunkPlan;

/// A fragment of the source text with its byte range.
///
/// Ranges are half-open `[start, end)` into the original text. Consecutive
/// fragments overlap: fragment N+1 starts before fragment N ends, so the
/// union of ranges covers the text with no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Fragment text
    pub content: String,
    /// Byte offset of the fragment start
    pub start: usize,
    /// Byte offset one past the fragment end
    pub end: usize,
}

/// Splits text into overlapping fragments bounded by a [`ChunkPlan`].
///
/// Break points prefer natural boundaries in descending order: paragraph
/// break, line break, sentence boundary, whitespace, hard character cut.
pub struct TextSplitter {
    plan: ChunkPlan,
}

impl TextSplitter {
    /// Create a splitter for a plan
    pub fn new(plan: ChunkPlan) -> Self {
        Self { plan }
    }

    /// Split text into ordered overlapping fragments.
    ///
    /// Empty text yields no fragments; text within the chunk size yields
    /// exactly one fragment equal to the input. Every fragment is at most
    /// `chunk_size` bytes and starts/ends on UTF-8 character boundaries.
    pub fn split(&self, text: &str) -> Vec<Fragment> {
        if text.is_empty() {
            return Vec::new();
        }
        if text.len() <= self.plan.chunk_size {
            return vec![Fragment {
                content: text.to_string(),
                start: 0,
                end: text.len(),
            }];
        }

        let mut fragments = Vec::new();
        let mut new_start = 0usize;

        loop {
            let start = if fragments.is_empty() {
                0
            } else {
                self.overlap_start(text, new_start)
            };

            let end = if start + self.plan.chunk_size >= text.len() {
                text.len()
            } else {
                let limit = snap_back(text, start + self.plan.chunk_size);
                let mut end = break_point(text, new_start, limit);
                if end <= new_start {
                    end = snap_forward(text, new_start + 1);
                }
                end
            };

            fragments.push(Fragment {
                content: text[start..end].to_string(),
                start,
                end,
            });

            if end >= text.len() {
                break;
            }
            new_start = end;
        }

        fragments
    }

    /// Start of the next fragment: roughly `chunk_overlap` bytes before the
    /// new content, nudged forward to a sentence or word boundary.
    fn overlap_start(&self, text: &str, new_start: usize) -> usize {
        let raw = new_start.saturating_sub(self.plan.chunk_overlap);
        let start = snap_forward(text, raw);
        let window = &text[start..new_start];

        if let Some(pos) = window.find(". ") {
            return start + pos + 2;
        }
        if let Some(pos) = window.find(' ') {
            return start + pos + 1;
        }
        start
    }
}

/// Best break point in `(from, limit]`, preferring natural boundaries
fn break_point(text: &str, from: usize, limit: usize) -> usize {
    let window = &text[from..limit];

    if let Some(idx) = window.rfind("\n\n") {
        return from + idx + 2;
    }
    if let Some(idx) = window.rfind('\n') {
        return from + idx + 1;
    }

    // last sentence boundary strictly inside the window
    let mut cut = 0usize;
    for sentence in window.split_sentence_bounds() {
        let next = cut + sentence.len();
        if next >= window.len() {
            break;
        }
        cut = next;
    }
    if cut > 0 {
        return from + cut;
    }

    if let Some(idx) = window.rfind(char::is_whitespace) {
        let ws_len = window[idx..].chars().next().map_or(1, char::len_utf8);
        return from + idx + ws_len;
    }

    limit
}

/// Largest char boundary at or below `pos`
fn snap_back(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Smallest char boundary at or above `pos`
fn snap_forward(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}
