//! Lazy rendering of the closed span tree.

use crate::entry::ProfileEntry;

/// Iterator over markdown bullet lines for a span forest, depth-first
/// pre-order, one line per entry.
///
/// Top-level entries are unindented; each nesting level adds two spaces.
/// Durations render as milliseconds truncated to two decimals. Entries are
/// never filtered, however small their duration.
pub struct RenderLines<'a> {
    stack: Vec<(&'a ProfileEntry, usize)>,
}

impl<'a> RenderLines<'a> {
    pub(crate) fn new(roots: &'a [ProfileEntry]) -> Self {
        Self {
            stack: roots.iter().rev().map(|entry| (entry, 1)).collect(),
        }
    }
}

impl<'a> Iterator for RenderLines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let (entry, depth) = self.stack.pop()?;
        for child in entry.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        let indent = "  ".repeat(depth - 1);
        Some(format!(
            "{}- {}: **{:.2}ms**",
            indent,
            entry.name,
            entry.elapsed_ms()
        ))
    }
}
