//! Scanning sinks: read-only consumers of laid-out characters.
//!
//! The text layout engine reports each shown character together with its
//! bounding box in top-left page coordinates. Text extraction, search, and
//! selection are built on top of these events.

use pdfscan_core::BBox;

/// Receives `(character, bounding box)` events in render order.
pub trait TextScanner {
    /// Called once per shown character.
    fn scan_char(&mut self, ch: char, bbox: BBox);
}

impl<F> TextScanner for F
where
    F: FnMut(char, BBox),
{
    fn scan_char(&mut self, ch: char, bbox: BBox) {
        self(ch, bbox)
    }
}

/// A character reported by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScannedChar {
    pub ch: char,
    pub bbox: BBox,
}

/// Collects scanned characters for extraction and search.
#[derive(Debug, Clone, Default)]
pub struct TextCollector {
    chars: Vec<ScannedChar>,
}

impl TextCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chars(&self) -> &[ScannedChar] {
        &self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// The collected characters as a string, in render order.
    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    /// Bounding box of every occurrence of `needle`, as the union of the
    /// boxes of its characters. Occurrences do not overlap.
    pub fn search(&self, needle: &str) -> Vec<BBox> {
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() || needle.len() > self.chars.len() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut i = 0;
        while i + needle.len() <= self.chars.len() {
            let window = &self.chars[i..i + needle.len()];
            if window.iter().zip(&needle).all(|(c, n)| c.ch == *n) {
                let first = window[0].bbox;
                matches.push(window[1..].iter().fold(first, |acc, c| acc.union(&c.bbox)));
                i += needle.len();
            } else {
                i += 1;
            }
        }
        matches
    }
}

impl TextScanner for TextCollector {
    fn scan_char(&mut self, ch: char, bbox: BBox) {
        self.chars.push(ScannedChar { ch, bbox });
    }
}
