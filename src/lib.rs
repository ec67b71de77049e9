//! A tolerant loader for Be-Music Source (BMS) rhythm game charts.
//!
//! Be-Music Source, BMS for short, is a line-oriented text format describing
//! song metadata, indexed resource tables (audio samples, images, tempo
//! values, stop durations), and a grid of channel tracks for notes,
//! background events, tempo changes, and bar lengths. This crate turns such
//! a document into two artefacts:
//!
//! - [`model::Bms`], a structured chart: metadata, resource tables, and
//!   per-channel note sequences keyed by `(bar, beat)`.
//! - [`sequence::Sequence`], a linear, absolutely-positioned, type-tagged
//!   event stream derived from a `Bms`, with long-note pairs resolved,
//!   ready for a player to iterate in time order.
//!
//! # Usage
//!
//! ```
//! use bms_loader::prelude::*;
//!
//! let source = "#TITLE foo\n#BPM 130\n#WAV01 a.wav\n#00111:0101\n";
//! let BmsOutput { bms, warnings } = parse_bms(source);
//! let sequence = to_sequence(&bms);
//! println!("Title: {}", bms.metadata.title);
//! println!("Warnings: {warnings:?}");
//! println!("Events: {}", sequence.events.len());
//! ```
//!
//! The loader never fails: malformed input degrades into diagnostics (see
//! [`diagnostics`]) and a best-effort chart, rather than an error.
//!
//! File I/O, audio decoding, playback, and graphics are deliberately out of
//! scope; this crate only covers the parse → normalise → lower pipeline.
//!
//! # Features
//!
//! - `serde` (default off): derives [`serde::Serialize`]/[`serde::Deserialize`]
//!   on every public data type.
//! - `diagnostics` (default on): enables [`diagnostics::emit`], which
//!   renders a warning list as human-readable [`ariadne`] reports. Purely
//!   presentational, it never changes a load's result.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod diagnostics;
pub mod lex;
pub mod model;
pub mod parse;
pub mod sequence;

pub use model::Bms;
pub use parse::{parse_bms, BmsOutput};
pub use sequence::{to_sequence, to_sequence_with_diagnostics};

/// Commonly used types, re-exported for a `use bms_loader::prelude::*;`
/// import.
pub mod prelude {
    pub use crate::command::{Base36Id, PlayerMode};
    pub use crate::diagnostics::{DiagnosticSink, Warning, WarningContent};
    pub use crate::model::{Bms, Metadata, Note, NoteValue, Resources, Tracks};
    pub use crate::parse::{parse_bms, BmsOutput};
    pub use crate::sequence::{to_sequence, to_sequence_with_diagnostics, Event, EventKind, Sequence};
}
