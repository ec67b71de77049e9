//! Top-level load pipeline: scan → dispatch → normalise (§4).

pub mod header;
pub mod normalize;
pub mod notes;

use crate::diagnostics::{DiagnosticSink, Warning};
use crate::lex;
use crate::model::Bms;
use header::HeaderState;
use notes::NotesState;

/// The result of loading one BMS source document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BmsOutput {
    /// The loaded, normalised chart.
    pub bms: Bms,
    /// Every diagnostic collected during the load, in the order they were
    /// observed.
    pub warnings: Vec<Warning>,
}

/// Loads a BMS source document into a [`Bms`] chart plus its diagnostics.
///
/// This never fails: malformed input degrades into diagnostics and a
/// best-effort chart rather than an `Err`. See [`crate::diagnostics`] for
/// the catalogue of situations this can report.
#[must_use]
pub fn parse_bms(source: &str) -> BmsOutput {
    let mut bms = Bms::default();
    let mut sink = DiagnosticSink::new();
    let mut header_state = HeaderState::default();
    let mut notes_state = NotesState::default();

    for line in lex::scan(source) {
        if notes::is_message_line(line.content) {
            notes::parse_message_line(line, &mut notes_state, &mut bms, &mut sink);
        } else {
            header::parse_command_line(line, &mut header_state, &mut bms, &mut sink);
        }
    }

    let lnobj = header_state.lnobj;
    header_state.finalize(&mut bms, &mut sink);
    normalize::normalize(&mut bms, lnobj);

    BmsOutput {
        bms,
        warnings: sink.into_warnings(),
    }
}
