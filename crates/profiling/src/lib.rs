//! Hierarchical Span Profiling
//!
//! This crate provides a push/pop span stack for measuring nested operations
//! in the host application. Spans are named, timed with a monotonic clock,
//! and collected into a tree under a synthetic session root. The closed tree
//! can be rendered as markdown bullet lines for a notification sink or
//! exported as JSON.
//!
//! # Example
//!
//! ```rust
//! use profiling::ProfileStack;
//!
//! let mut stack = ProfileStack::new();
//!
//! stack.enter("document_save");
//! stack.enter("serialize");
//! // ... serialize document ...
//! stack.exit().unwrap();
//! stack.enter("write_file");
//! // ... write to disk ...
//! stack.exit().unwrap();
//! stack.exit().unwrap();
//!
//! for line in stack.render() {
//!     println!("{}", line);
//! }
//! ```
//!
//! # Modules
//!
//! - [`entry`] - Closed span tree nodes
//! - [`stack`] - The span stack and RAII scope guard
//! - [`render`] - Lazy markdown-line rendering
//! - [`error`] - Error types

mod entry;
mod error;
mod render;
mod stack;

pub use entry::ProfileEntry;
pub use error::{ProfileError, ProfileResult};
pub use render::RenderLines;
pub use stack::{ProfileStack, ScopeGuard};
