//! Diagnostic collection for tolerant BMS parsing.
//!
//! The loader never fails on malformed input; every recoverable problem is
//! appended here instead and the best-effort interpretation stated by each
//! component is used to keep going. See [`WarningContent`] for the catalogue
//! of situations this crate recognises.

use thiserror::Error;

/// A single recoverable problem observed while loading a chart.
///
/// `line` is `None` for whole-document diagnostics (for example, a metadata
/// field defaulted because it never appeared anywhere in the source).
/// Otherwise it is the 1-based source line the problem was found on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warning {
    /// The 1-based source line the diagnostic refers to, or `None` for a
    /// whole-document diagnostic.
    pub line: Option<usize>,
    /// What went wrong and the conservative interpretation chosen for it.
    pub content: WarningContent,
}

impl Warning {
    /// Builds a warning attached to a specific source line.
    #[must_use]
    pub const fn at(line: usize, content: WarningContent) -> Self {
        Self {
            line: Some(line),
            content,
        }
    }

    /// Builds a whole-document warning, not attached to any single line.
    #[must_use]
    pub const fn whole_document(content: WarningContent) -> Self {
        Self {
            line: None,
            content,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.content),
            None => write!(f, "{}", self.content),
        }
    }
}

/// The catalogue of diagnostics this crate can emit.
///
/// Every variant maps to a message named in the loader's component
/// specifications (command dispatch, channel parsing, normalisation). The
/// message text is bounded: callers that render it verbatim (e.g. into a
/// fixed-size log line) should truncate past 128 bytes, as overlong messages
/// carry no additional information here.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningContent {
    /// `#TAG` with no argument.
    #[error("command requires non-empty arguments, ignoring")]
    EmptyCommandArgument,
    /// An unrecognised `#TAG`.
    #[error("unrecognized command {tag}, ignoring")]
    UnrecognizedCommand {
        /// The tag text as written (tags are matched case-sensitively, so
        /// an unrecognized lowercase tag is stored lowercase here).
        tag: String,
    },
    /// A command argument outside its declared numeric range.
    #[error("invalid value for #{tag}: {value}")]
    InvalidValue {
        /// The command tag the value belongs to.
        tag: String,
        /// The raw argument text.
        value: String,
    },
    /// A single-valued metadata field declared more than once.
    #[error("#{tag} redefined, overwriting previous value")]
    Redefinition {
        /// The command tag that was redefined.
        tag: String,
    },
    /// A metadata field missing at end of load, silently defaulted.
    #[error("{field} did not appear, defaulting to {default}")]
    MissingField {
        /// The field name.
        field: String,
        /// The default value substituted for it.
        default: String,
    },
    /// A channel line whose channel id is not recognised.
    #[error("unknown track {channel:02}")]
    UnknownTrack {
        /// The two-digit decimal channel id.
        channel: u8,
    },
    /// An odd number of payload characters; the trailing one is dropped.
    #[error("extraneous trailing character {ch:?}")]
    ExtraneousTrailingCharacter {
        /// The dropped trailing character.
        ch: char,
    },
    /// A payload pair containing a character outside `[0-9A-Z]`.
    #[error("invalid base-36 index {pair:?}")]
    InvalidBase36Index {
        /// The two raw characters that failed to parse.
        pair: [char; 2],
    },
    /// A channel already declared in this bar; the new notes are merged in.
    #[error("track {channel:02} already defined previously, merging all notes")]
    TrackAlreadyDefined {
        /// The two-digit decimal channel id.
        channel: u8,
    },
    /// `#BBB02:` payload did not round-trip through the k/4 quantisation.
    #[error("inaccurate time signature, treating as {quarters}/4")]
    InaccurateTimeSignature {
        /// The rounded numerator substituted for the raw value.
        quarters: u32,
    },
    /// `#BBB02:` payload outside the admissible signature range.
    #[error("invalid time signature {raw}")]
    InvalidTimeSignature {
        /// The raw payload text.
        raw: String,
    },
    /// `#BBB02:` redeclared for a bar that already has a time signature.
    #[error("time signature for bar {bar:03} redefined, overwriting previous value")]
    TimeSignatureRedefined {
        /// The bar being redefined.
        bar: u16,
    },
    /// More than 64 background lanes would be needed for one bar.
    #[error("too many background tracks in bar {bar:03}, dropping the rest")]
    TooManyBackgroundTracks {
        /// The bar the overflow happened in.
        bar: u16,
    },
    /// An `08` channel note indexes a `tempo` slot that was never defined.
    #[error("tempo index {index} undefined")]
    UndefinedTempoIndex {
        /// The base-36 index that has no `#BPMxx` definition.
        index: u16,
    },
    /// A `09` channel note indexes a `stop` slot that was never defined.
    #[error("stop index {index} undefined")]
    UndefinedStopIndex {
        /// The base-36 index that has no `#STOPxx` definition.
        index: u16,
    },
}

/// Append-only collection of [`Warning`]s produced during a single load.
///
/// A fresh `DiagnosticSink` is created per [`crate::parse_bms`] call; it is
/// never shared across loads, so the "process-wide buffer cleared at the
/// start of each load" behaviour named by the loader's design is obtained
/// for free from ordinary Rust ownership instead of global mutable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticSink {
    warnings: Vec<Warning>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic tied to a specific source line.
    pub fn emit(&mut self, line: usize, content: WarningContent) {
        self.warnings.push(Warning::at(line, content));
    }

    /// Appends a whole-document diagnostic.
    pub fn emit_global(&mut self, content: WarningContent) {
        self.warnings.push(Warning::whole_document(content));
    }

    /// The number of diagnostics collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether no diagnostics have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consumes the sink, returning its diagnostics in emission order.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(feature = "diagnostics")]
mod pretty {
    use super::Warning;
    use ariadne::{Label, Report, ReportKind, Source};

    /// Renders a list of warnings against their originating source text as
    /// human-readable [`ariadne`] reports, one per warning, printed to
    /// stderr.
    ///
    /// This is presentation only: it never reads back into the `Chart` or
    /// `Sequence` produced by a load, so disabling the `diagnostics` feature
    /// (or simply not calling this function) cannot change parsing results.
    pub fn emit(name: &str, source: &str, warnings: &[Warning]) {
        let cache = (name.to_string(), Source::from(source));
        for warning in warnings {
            let offset = warning
                .line
                .and_then(|line| line_start_offset(source, line))
                .unwrap_or(0);
            let report = Report::build(ReportKind::Warning, (name.to_string(), offset..offset))
                .with_message(warning.content.to_string())
                .with_label(Label::new((name.to_string(), offset..offset)).with_message(
                    match warning.line {
                        Some(line) => format!("at line {line}"),
                        None => "in the whole document".to_string(),
                    },
                ))
                .finish();
            let _ = report.print(cache.clone());
        }
    }

    fn line_start_offset(source: &str, line: usize) -> Option<usize> {
        source.split('\n').take(line.saturating_sub(1)).fold(
            Some(0),
            |acc, l| acc.map(|o| o + l.len() + 1),
        )
    }
}

#[cfg(feature = "diagnostics")]
pub use pretty::emit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_collects_in_order() {
        let mut sink = DiagnosticSink::new();
        sink.emit(3, WarningContent::EmptyCommandArgument);
        sink.emit_global(WarningContent::MissingField {
            field: "title".into(),
            default: "(unknown)".into(),
        });
        assert_eq!(sink.len(), 2);
        let warnings = sink.into_warnings();
        assert_eq!(warnings[0].line, Some(3));
        assert_eq!(warnings[1].line, None);
    }

    #[test]
    fn display_formats_line_prefix() {
        let w = Warning::at(10, WarningContent::UnknownTrack { channel: 5 });
        assert_eq!(w.to_string(), "line 10: unknown track 05");
    }
}
