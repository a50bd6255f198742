//! Structural inference over plain document text.
//!
//! ## Data Flow
//!
//! ```text
//! text ──▶ detect ──▶ headers ──▶ sections
//!          (variant)  (per-variant rules)  (partition)
//! ```
//!
//! 1. [`detect`]: classify the text into a [`FormatVariant`] using an
//!    ordered list of detection patterns, unless the caller supplied a hint
//! 2. [`headers`]: run the variant's own rule list over every line
//! 3. [`sections`]: turn consecutive headers into a line partition
//!
//! All three stages are pure functions of their input.

pub mod detect;
pub mod headers;
pub mod sections;

pub use detect::{detect, FormatHint, FormatVariant};
pub use headers::{extract_headers, Header};
pub use sections::{build_sections, Section};
