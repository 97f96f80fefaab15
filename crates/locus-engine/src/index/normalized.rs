/// Text accumulator that collapses every whitespace run into a single blank
/// and never starts with one.
#[derive(Debug, Clone, Default)]
pub struct NormalizedText {
    content: String,
    suppressed: usize,
}

const BLANK: char = ' ';

fn is_whitespace(c: char) -> bool {
    // U+00A0 is listed explicitly; renderers emit it for &nbsp;
    c.is_whitespace() || c == '\u{a0}'
}

impl NormalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    fn ends_blank(&self) -> bool {
        self.content.is_empty() || self.content.ends_with(BLANK)
    }

    pub fn append(&mut self, text: &str) {
        if self.suppressed > 0 {
            return;
        }
        let mut blank = self.ends_blank();
        for c in text.chars() {
            if is_whitespace(c) {
                if !blank {
                    blank = true;
                    self.content.push(BLANK);
                }
            } else {
                blank = false;
                self.content.push(c);
            }
        }
    }

    pub fn append_blank(&mut self) {
        if self.suppressed == 0 && !self.ends_blank() {
            self.content.push(BLANK);
        }
    }

    /// Ignore appends until the matching [`NormalizedText::resume`].
    pub fn suppress(&mut self) {
        self.suppressed += 1;
    }

    pub fn resume(&mut self) {
        self.suppressed = self.suppressed.saturating_sub(1);
    }

    /// Length in bytes including a trailing blank.
    pub fn raw_len(&self) -> usize {
        self.content.len()
    }

    pub fn raw(&self) -> &str {
        &self.content
    }

    /// Content of `[start, end)` without one leading and one trailing blank.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.content.len());
        if start >= end {
            return "";
        }
        let bytes = self.content.as_bytes();
        let end = if bytes[end - 1] == b' ' { end - 1 } else { end };
        let start = if bytes[start] == b' ' { start + 1 } else { start };
        if start >= end {
            return "";
        }
        &self.content[start..end]
    }

    /// The whole content without its trailing blank.
    pub fn as_str(&self) -> &str {
        self.slice(0, self.content.len())
    }
}
