//! Parallel pristine/working line buffers.
//!
//! The pristine buffer keeps every line exactly as it arrived, byte for byte,
//! and is what gets rendered. The working buffer is what the scanner and
//! matcher read: the text of each line (invalid UTF-8 replaced), with folded
//! lines joined into their first physical line and filtered-out lines
//! emptied. Both buffers always have the same length.

use std::borrow::Cow;

/// Working-buffer marker for a physical line folded into the previous one.
pub const FOLD_PLACEHOLDER: &str = " ";

/// Line terminator used when splitting and rendering.
pub const CRLF: &[u8] = b"\r\n";

/// One position of the line buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord<'a> {
    pub index: usize,
    pub original: &'a [u8],
    pub working: &'a str,
}

/// The two aligned line sequences of one filtering run.
#[derive(Debug, Clone, Default)]
pub struct LineStore {
    original: Vec<Vec<u8>>,
    working: Vec<String>,
    bare_lf: bool,
}

impl LineStore {
    /// Splits calendar data into lines on CRLF.
    ///
    /// If that yields fewer than two lines the data is split on bare LF
    /// instead and the store remembers that the line endings were malformed.
    /// Lines that are not valid UTF-8 are matched on a lossy decoding but
    /// rendered unchanged.
    #[must_use]
    pub fn split(raw: &(impl AsRef<[u8]> + ?Sized)) -> Self {
        let raw = raw.as_ref();
        let mut original = split_crlf(raw);
        let mut bare_lf = false;

        if original.len() < 2 {
            original = raw.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect();
            bare_lf = true;
            tracing::warn!(
                lines = original.len(),
                "No CRLF line endings, splitting on bare LF"
            );
        }

        let working = original
            .iter()
            .enumerate()
            .map(|(index, line)| decode(index, line))
            .collect();
        Self {
            original,
            working,
            bare_lf,
        }
    }

    /// Whether the input had to be split on bare LF.
    #[must_use]
    pub const fn has_bare_lf(&self) -> bool {
        self.bare_lf
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.original.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Working text of line `index`.
    #[must_use]
    pub fn working(&self, index: usize) -> Option<&str> {
        self.working.get(index).map(String::as_str)
    }

    /// Pristine bytes of line `index`.
    #[must_use]
    pub fn original(&self, index: usize) -> Option<&[u8]> {
        self.original.get(index).map(Vec::as_slice)
    }

    /// Iterates over all line positions in order.
    pub fn records(&self) -> impl Iterator<Item = LineRecord<'_>> {
        self.original
            .iter()
            .zip(&self.working)
            .enumerate()
            .map(|(index, (original, working))| LineRecord {
                index,
                original,
                working,
            })
    }

    /// Joins folded continuation lines into their logical line.
    ///
    /// Any line starting with a space or tab continues the previous logical
    /// line: its first byte is stripped and the rest appended to that line's
    /// working text, and its own working slot becomes [`FOLD_PLACEHOLDER`].
    /// Pristine bytes are untouched.
    ///
    /// Returns the number of continuation lines joined.
    pub fn unfold(&mut self) -> usize {
        let mut joined = 0;
        let mut head: Option<usize> = None;

        for (i, line) in self.original.iter().enumerate() {
            match head {
                Some(h) if matches!(line.first(), Some(b' ' | b'\t')) => {
                    let continuation = String::from_utf8_lossy(&line[1..]);
                    self.working[h].push_str(&continuation);
                    FOLD_PLACEHOLDER.clone_into(&mut self.working[i]);
                    joined += 1;
                }
                _ => head = Some(i),
            }
        }

        tracing::debug!(joined, lines = self.original.len(), "Unfolded lines");
        joined
    }

    /// Whether line `index` has been filtered out.
    #[must_use]
    pub fn is_dropped(&self, index: usize) -> bool {
        self.working.get(index).is_some_and(String::is_empty)
    }

    /// Whether line `index` is a fold placeholder.
    #[must_use]
    pub fn is_placeholder(&self, index: usize) -> bool {
        self.working
            .get(index)
            .is_some_and(|line| line == FOLD_PLACEHOLDER)
    }

    /// Filters out line `index`; it will not be rendered.
    pub fn drop_line(&mut self, index: usize) {
        if let Some(line) = self.working.get_mut(index) {
            line.clear();
        }
    }

    /// Inserts `text` into both buffers at `index`, shifting later lines by one.
    ///
    /// Any index a caller holds at or after `index` must be moved by one.
    pub fn insert_at(&mut self, index: usize, text: &str) {
        self.insert_block(index, &[text]);
    }

    /// Inserts a block of lines starting at `index`, keeping their order.
    ///
    /// Returns the number of lines inserted.
    pub fn insert_block<S: AsRef<str>>(&mut self, index: usize, block: &[S]) -> usize {
        let index = index.min(self.len());
        self.original.splice(
            index..index,
            block.iter().map(|line| line.as_ref().as_bytes().to_vec()),
        );
        self.working.splice(
            index..index,
            block.iter().map(|line| line.as_ref().to_string()),
        );
        block.len()
    }

    /// Number of empty or placeholder lines at the end of the buffers.
    #[must_use]
    pub fn trailing_blank_count(&self) -> usize {
        self.working
            .iter()
            .skip(1)
            .rev()
            .take_while(|line| line.is_empty() || *line == FOLD_PLACEHOLDER)
            .count()
    }

    /// Upper bound for component scanning: the buffer length without
    /// trailing blank lines.
    #[must_use]
    pub fn scan_bound(&self) -> usize {
        self.len() - self.trailing_blank_count()
    }

    /// Renders the pristine bytes of every line that was not filtered out,
    /// each terminated by CRLF.
    #[must_use]
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for record in self.records().filter(|r| !r.working.is_empty()) {
            out.extend_from_slice(record.original);
            out.extend_from_slice(CRLF);
        }
        out
    }
}

/// Splits on CRLF pairs only; lone CR or LF bytes stay in the line.
fn split_crlf(raw: &[u8]) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + 1 < raw.len() {
        if raw[i] == b'\r' && raw[i + 1] == b'\n' {
            lines.push(raw[start..i].to_vec());
            i += 2;
            start = i;
        } else {
            i += 1;
        }
    }
    lines.push(raw[start..].to_vec());
    lines
}

fn decode(index: usize, line: &[u8]) -> String {
    match String::from_utf8_lossy(line) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            tracing::warn!(line = index, "Line is not valid UTF-8, matching on replaced text");
            text
        }
    }
}
