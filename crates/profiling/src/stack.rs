//! The span stack.
//!
//! `ProfileStack` tracks currently-open spans as a strict LIFO stack on top
//! of a synthetic session root. `enter` pushes a timestamped open span,
//! `exit` closes the innermost one and attaches it to its parent's children.
//! Closing order must mirror opening order; the only enforcement is the
//! underflow check when nothing but the root is open.

use crate::entry::ProfileEntry;
use crate::error::{ProfileError, ProfileResult};
use crate::render::RenderLines;
use std::time::Instant;

/// Name of the synthetic root that holds all top-level spans.
const ROOT_NAME: &str = "session";

/// A span that has been entered but not yet exited.
#[derive(Debug)]
struct OpenSpan {
    name: String,
    start: Instant,
    children: Vec<ProfileEntry>,
}

impl OpenSpan {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            children: Vec::new(),
        }
    }

    fn close(self) -> ProfileEntry {
        ProfileEntry::new(self.name, self.start.elapsed(), self.children)
    }
}

/// A stack of named, timed spans collected into a tree.
///
/// The stack owns its tree; instantiate one per measuring component rather
/// than sharing a global. Lifetime is the owner's lifetime, reset only by
/// [`clear`](ProfileStack::clear).
#[derive(Debug)]
pub struct ProfileStack {
    /// Open spans, innermost last. Index 0 is the session root and is
    /// never popped.
    open: Vec<OpenSpan>,
}

impl Default for ProfileStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStack {
    /// Create a stack containing only the session root.
    pub fn new() -> Self {
        Self {
            open: vec![OpenSpan::new(ROOT_NAME)],
        }
    }

    /// Open a new span named `name` nested under the current innermost span.
    ///
    /// Returns the new nesting depth (1 for a top-level span). Callers may
    /// ignore it.
    pub fn enter(&mut self, name: impl Into<String>) -> usize {
        self.open.push(OpenSpan::new(name));
        self.open.len() - 1
    }

    /// Close the innermost open span and attach it to its parent.
    ///
    /// Returns the closed entry with its measured duration. Fails with
    /// [`ProfileError::StackUnderflow`] when only the session root is open;
    /// an unmatched `exit` is a caller bug and must not be silently dropped.
    pub fn exit(&mut self) -> ProfileResult<ProfileEntry> {
        if self.open.len() <= 1 {
            return Err(ProfileError::StackUnderflow);
        }
        let span = self.open.pop().ok_or(ProfileError::StackUnderflow)?;
        let closed = span.close();

        tracing::trace!(
            target: "profiling",
            name = %closed.name,
            elapsed_ms = closed.elapsed_ms(),
            "span closed"
        );

        if let Some(parent) = self.open.last_mut() {
            parent.children.push(closed.clone());
        }
        Ok(closed)
    }

    /// Number of open spans, excluding the session root.
    pub fn depth(&self) -> usize {
        self.open.len() - 1
    }

    /// True when no span has been closed yet and none is open.
    pub fn is_empty(&self) -> bool {
        self.depth() == 0 && self.roots().is_empty()
    }

    /// Closed top-level spans, in the order they were opened.
    ///
    /// Spans closed inside a still-open ancestor are not reachable from
    /// here until that ancestor exits.
    pub fn roots(&self) -> &[ProfileEntry] {
        self.open
            .first()
            .map(|root| root.children.as_slice())
            .unwrap_or(&[])
    }

    /// Render the closed tree as markdown bullet lines, one per entry, in
    /// depth-first pre-order. Lazy and restartable; does not mutate the tree.
    pub fn render(&self) -> RenderLines<'_> {
        RenderLines::new(self.roots())
    }

    /// Join [`render`](ProfileStack::render) output into a single markdown
    /// block for a notification sink.
    pub fn render_markdown(&self) -> String {
        self.render().collect::<Vec<_>>().join("\n")
    }

    /// Export the closed tree as pretty-printed JSON.
    pub fn to_json(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string_pretty(self.roots())?)
    }

    /// Discard all spans, open and closed, and restart the session root.
    pub fn clear(&mut self) {
        self.open.clear();
        self.open.push(OpenSpan::new(ROOT_NAME));
    }
}

/// RAII guard that exits a span when dropped.
///
/// # Example
///
/// ```rust
/// use profiling::{ProfileStack, ScopeGuard};
///
/// let mut stack = ProfileStack::new();
/// {
///     let _guard = ScopeGuard::enter(&mut stack, "layout");
///     // ... layout code ...
/// } // span exits here
/// assert_eq!(stack.roots().len(), 1);
/// ```
pub struct ScopeGuard<'a> {
    stack: &'a mut ProfileStack,
}

impl<'a> ScopeGuard<'a> {
    /// Enter a span that will exit when the guard drops.
    pub fn enter(stack: &'a mut ProfileStack, name: impl Into<String>) -> Self {
        stack.enter(name);
        Self { stack }
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        // The guard entered exactly one span, so this cannot underflow.
        let _ = self.stack.exit();
    }
}
