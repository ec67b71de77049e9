//! Channel dispatch (§4.4): interprets `#BBBCC:payload` message lines.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::command::channel::{ChannelKind, MAX_BACKGROUND_LANES};
use crate::command::Base36Id;
use crate::diagnostics::{DiagnosticSink, WarningContent};
use crate::lex::RawLine;
use crate::model::notes::{Note, NoteValue, RawNote};
use crate::model::Bms;

/// Per-bar bookkeeping that spans the whole message-line pass: which
/// `(bar, channel)` pairs have already been declared, and how many
/// background lanes a bar has claimed so far.
#[derive(Debug, Default)]
pub struct NotesState {
    seen_channels: HashSet<(u16, u8)>,
    next_background_lane: HashMap<u16, usize>,
}

/// Whether `content` (the text after `#`) looks like a message line rather
/// than a command: five ASCII digits followed by `:`.
#[must_use]
pub fn is_message_line(content: &str) -> bool {
    let bytes = content.as_bytes();
    bytes.len() > 5 && bytes[..5].iter().all(u8::is_ascii_digit) && bytes[5] == b':'
}

/// Interprets one message line, appending into `bms.tracks`.
pub fn parse_message_line(
    line: RawLine<'_>,
    state: &mut NotesState,
    bms: &mut Bms,
    sink: &mut DiagnosticSink,
) {
    let content = line.content;
    let bar: u16 = content[..3].parse().expect("validated by is_message_line");
    let channel: u8 = content[3..5].parse().expect("validated by is_message_line");
    let payload = &content[6..];

    match ChannelKind::classify(channel) {
        ChannelKind::Background => {
            parse_background(bar, payload, line.line_number, state, bms, sink);
        }
        ChannelKind::TimeSignature => {
            parse_time_signature(bar, payload, line.line_number, bms, sink);
        }
        ChannelKind::UnusedPoorLegacy => {
            sink.emit(line.line_number, WarningContent::UnknownTrack { channel });
        }
        ChannelKind::Unknown => {
            sink.emit(line.line_number, WarningContent::UnknownTrack { channel });
        }
        ChannelKind::Object { index, .. } => {
            warn_on_redeclaration(bar, channel, state, line.line_number, sink);
            let pairs = parse_base36_pairs(payload, line.line_number, sink);
            let track = bms.tracks.object_mut(index);
            for (beat, id) in pairs {
                track.push(Note {
                    bar,
                    beat,
                    value: NoteValue::Regular {
                        index: id,
                        hold: false,
                    },
                });
            }
        }
        other => {
            warn_on_redeclaration(bar, channel, state, line.line_number, sink);
            let pairs = parse_base36_pairs(payload, line.line_number, sink);
            let track = match other {
                ChannelKind::InlineTempo => &mut bms.tracks.tempo,
                ChannelKind::BgaBase => &mut bms.tracks.bga_base,
                ChannelKind::BgaPoor => &mut bms.tracks.bga_poor,
                ChannelKind::BgaLayer => &mut bms.tracks.bga_layer,
                ChannelKind::ExTempo => &mut bms.tracks.ex_tempo,
                ChannelKind::Stop => &mut bms.tracks.stop,
                _ => unreachable!("handled above"),
            };
            for (beat, value) in pairs {
                track.push(RawNote {
                    bar,
                    beat,
                    value: value.value(),
                });
            }
        }
    }
}

fn warn_on_redeclaration(
    bar: u16,
    channel: u8,
    state: &mut NotesState,
    line: usize,
    sink: &mut DiagnosticSink,
) {
    if !state.seen_channels.insert((bar, channel)) {
        sink.emit(line, WarningContent::TrackAlreadyDefined { channel });
    }
}

fn parse_background(
    bar: u16,
    payload: &str,
    line: usize,
    state: &mut NotesState,
    bms: &mut Bms,
    sink: &mut DiagnosticSink,
) {
    let lane = *state.next_background_lane.entry(bar).or_insert(0);
    state.next_background_lane.insert(bar, lane + 1);
    if lane >= MAX_BACKGROUND_LANES {
        sink.emit(line, WarningContent::TooManyBackgroundTracks { bar });
        return;
    }
    while bms.tracks.background.len() <= lane {
        bms.tracks.background.push(Vec::new());
    }
    bms.tracks.background_count = bms.tracks.background_count.max(lane + 1);
    let pairs = parse_base36_pairs(payload, line, sink);
    for (beat, value) in pairs {
        bms.tracks.background[lane].push(RawNote {
            bar,
            beat,
            value: value.value(),
        });
    }
}

fn parse_time_signature(
    bar: u16,
    payload: &str,
    line: usize,
    bms: &mut Bms,
    sink: &mut DiagnosticSink,
) {
    let Some(bar_index) = usize::try_from(bar).ok().filter(|&b| b < bms.tracks.time_sig.len())
    else {
        return;
    };
    let trimmed = payload.trim();
    let raw: Option<f64> = trimmed.parse().ok();
    let Some(raw) = raw.filter(|v| (0.25..=63.75).contains(v)) else {
        sink.emit(
            line,
            WarningContent::InvalidTimeSignature {
                raw: trimmed.to_string(),
            },
        );
        return;
    };
    let quarters = (raw * 4.0).round();
    if (quarters - raw * 4.0).abs() >= 1e-3 {
        sink.emit(
            line,
            WarningContent::InaccurateTimeSignature {
                quarters: quarters as u32,
            },
        );
    }
    if bms.tracks.time_sig[bar_index] != 0 {
        sink.emit(line, WarningContent::TimeSignatureRedefined { bar });
    }
    bms.tracks.time_sig[bar_index] = quarters as u8;
}

/// Splits a message payload into base-36 pairs, skipping whitespace between
/// characters, warning on a dangling trailing character and on pairs
/// containing a character outside `[0-9A-Z]`. Returns `(beat, value)` for
/// every pair whose value is non-zero; a zero pair still advances the beat
/// position for the pairs after it, it just produces no note.
fn parse_base36_pairs(payload: &str, line: usize, sink: &mut DiagnosticSink) -> Vec<(f64, Base36Id)> {
    let mut tuples = payload
        .chars()
        .filter(|c| !c.is_whitespace())
        .tuples::<(char, char)>();
    let pairs: Vec<(char, char)> = (&mut tuples).collect();
    if let Some(trailing) = tuples.into_buffer().next() {
        sink.emit(line, WarningContent::ExtraneousTrailingCharacter { ch: trailing });
    }
    let count = pairs.len();
    if count == 0 {
        return Vec::new();
    }
    let mut notes = Vec::with_capacity(count);
    for (i, (c1, c2)) in pairs.into_iter().enumerate() {
        match Base36Id::try_from([c1, c2]) {
            Ok(id) if !id.is_null() => notes.push((i as f64 / count as f64, id)),
            Ok(_) => {}
            Err(pair) => sink.emit(line, WarningContent::InvalidBase36Index { pair }),
        }
    }
    notes
}
