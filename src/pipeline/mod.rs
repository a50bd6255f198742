//! I/O collaborators that feed documents into the core, or fetch them.
//!
//! The structural core ([`crate::structure`], [`crate::sampling`]) never
//! touches the filesystem or the network. Everything that does lives here:
//!
//! ```text
//! path ──▶ input ──▶ text ──────────────▶ core
//!            └────▶ pdf (pdfium) ──▶ page count + outline ──▶ planner
//! url  ──▶ fetch (reqwest │ curl) ──▶ html ──▶ text ──▶ planner
//! ```
//!
//! 1. [`input`]: path validation, lossy text decoding and PDF sniffing
//! 2. [`pdf`]: page count, outline, metadata and page text via pdfium;
//!    runs in `spawn_blocking` because pdfium is not async-safe
//! 3. [`fetch`]: HTTP with a `curl` fallback, offset and truncation
//! 4. [`html`]: regex HTML-to-text for fetched pages

pub mod fetch;
pub mod html;
pub mod input;
pub mod pdf;
