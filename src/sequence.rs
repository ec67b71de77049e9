//! Chart-to-sequence lowering (§4.6): flattens every channel into one
//! absolutely-positioned, type-tagged event stream.

use crate::command::Base36Id;
use crate::command::channel::object_index_to_unified_channel;
use crate::diagnostics::{DiagnosticSink, Warning, WarningContent};
use crate::model::notes::NoteValue;
use crate::model::Bms;

/// The kind of an [`Event`], ordered as the tie-break for equal `pos`
/// (invariant I5): `Barline < TempoChange < BgaBaseChange < BgaLayerChange
/// < BgaPoorChange < Stop < Note < NoteLong < NoteOff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// The start of a bar.
    Barline,
    /// A tempo change, from either `tempo` (channel 03) or `ex_tempo`
    /// (channel 08).
    TempoChange,
    /// A BGA base layer change.
    BgaBaseChange,
    /// A BGA overlay layer change.
    BgaLayerChange,
    /// A BGA poor (miss) layer change.
    BgaPoorChange,
    /// A stop.
    Stop,
    /// A regular playable or background note.
    Note,
    /// The head of a long note.
    NoteLong,
    /// The release end of a long note.
    NoteOff,
}

/// One entry in a [`Sequence`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Absolute position, in 1/48-of-a-quarter-note (1/192-of-a-whole-note)
    /// units from the start of bar 0.
    pub pos: i64,
    /// The event kind.
    pub kind: EventKind,
    /// Non-positive for background lane `-k`; `11..69` for a playable
    /// channel (both LN dialects unified, see
    /// [`object_index_to_unified_channel`]); `0`/`3`/`4`/`6`/`7`/`8`/`9` for
    /// the fixed channels.
    pub track: i32,
    /// The primary integer payload (bar number, base-36 index, stop/tempo
    /// table value, time-sig numerator), when applicable.
    pub value: Option<i64>,
    /// The secondary integer payload: `time_sig[bar]` for a `Barline`, or
    /// the hold/release duration for `NoteLong`/`NoteOff`.
    pub value_a: Option<i64>,
    /// The real-valued payload, used only by `TempoChange`.
    pub value_f: Option<f64>,
}

/// The flattened, totally ordered view of a [`Bms`] chart (§3, §4.6).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    /// Every event, sorted by `(pos, kind)` ascending (invariant I5).
    pub events: Vec<Event>,
    /// The subsequence of `events` whose kind is [`EventKind::NoteLong`].
    pub long_notes: Vec<Event>,
}

struct BarGeometry {
    bar_start: Vec<i64>,
}

impl BarGeometry {
    fn compute(time_sig: &[u8], max_bar: u16) -> Self {
        let mut bar_start = Vec::with_capacity(max_bar as usize + 2);
        bar_start.push(0i64);
        for bar in 0..=max_bar as usize {
            let prev = bar_start[bar];
            bar_start.push(prev + i64::from(time_sig[bar]));
        }
        Self { bar_start }
    }

    fn pos(&self, bar: u16, beat: f64, time_sig: u8) -> i64 {
        self.bar_start[bar as usize] * 48 + (beat * f64::from(time_sig) * 48.0).floor() as i64
    }
}

/// Lowers a chart into its [`Sequence`], discarding the diagnostics that
/// lowering can produce. Use [`to_sequence_with_diagnostics`] to observe
/// them.
#[must_use]
pub fn to_sequence(bms: &Bms) -> Sequence {
    to_sequence_with_diagnostics(bms).0
}

/// Lowers a chart into its [`Sequence`], returning alongside it any
/// diagnostics produced while doing so: an `ex_tempo` note ([`WarningContent::UndefinedTempoIndex`])
/// or a `stop` note ([`WarningContent::UndefinedStopIndex`]) whose table slot
/// was never defined has its event omitted rather than lowered with a
/// placeholder value.
#[must_use]
pub fn to_sequence_with_diagnostics(bms: &Bms) -> (Sequence, Vec<Warning>) {
    let mut sink = DiagnosticSink::new();
    let geometry = BarGeometry::compute(&bms.tracks.time_sig, bms.max_bar());
    let mut events = Vec::new();

    emit_barlines(bms, &geometry, &mut events);
    emit_tempo(bms, &geometry, &mut events);
    emit_ex_tempo(bms, &geometry, &mut events, &mut sink);
    emit_bga(
        &bms.tracks.bga_base,
        EventKind::BgaBaseChange,
        4,
        bms,
        &geometry,
        &mut events,
    );
    emit_bga(
        &bms.tracks.bga_layer,
        EventKind::BgaLayerChange,
        7,
        bms,
        &geometry,
        &mut events,
    );
    emit_bga(
        &bms.tracks.bga_poor,
        EventKind::BgaPoorChange,
        6,
        bms,
        &geometry,
        &mut events,
    );
    emit_stop(bms, &geometry, &mut events, &mut sink);
    emit_background(bms, &geometry, &mut events);
    emit_object(bms, &geometry, &mut events);

    events.sort_by(|a, b| (a.pos, a.kind).cmp(&(b.pos, b.kind)));
    let long_notes = events
        .iter()
        .copied()
        .filter(|e| e.kind == EventKind::NoteLong)
        .collect();

    (
        Sequence {
            events,
            long_notes,
        },
        sink.into_warnings(),
    )
}

fn emit_barlines(bms: &Bms, geometry: &BarGeometry, events: &mut Vec<Event>) {
    for bar in 0..=bms.max_bar() {
        let time_sig = bms.tracks.time_sig[bar as usize];
        if time_sig == 0 {
            break;
        }
        events.push(Event {
            pos: geometry.pos(bar, 0.0, time_sig),
            kind: EventKind::Barline,
            track: 0,
            value: Some(i64::from(bar)),
            value_a: Some(i64::from(time_sig)),
            value_f: None,
        });
    }
}

fn emit_tempo(bms: &Bms, geometry: &BarGeometry, events: &mut Vec<Event>) {
    for note in &bms.tracks.tempo {
        let time_sig = bms.tracks.time_sig[note.bar as usize];
        events.push(Event {
            pos: geometry.pos(note.bar, note.beat, time_sig),
            kind: EventKind::TempoChange,
            track: 3,
            value: None,
            value_a: None,
            value_f: Some(f64::from(note.value)),
        });
    }
}

fn emit_ex_tempo(
    bms: &Bms,
    geometry: &BarGeometry,
    events: &mut Vec<Event>,
    sink: &mut DiagnosticSink,
) {
    for note in &bms.tracks.ex_tempo {
        let id = Base36Id::from_value(note.value);
        match bms.resources.tempo(id) {
            Some(&bpm) => {
                let time_sig = bms.tracks.time_sig[note.bar as usize];
                events.push(Event {
                    pos: geometry.pos(note.bar, note.beat, time_sig),
                    kind: EventKind::TempoChange,
                    track: 8,
                    value: None,
                    value_a: None,
                    value_f: Some(bpm),
                });
            }
            None => sink.emit_global(WarningContent::UndefinedTempoIndex { index: note.value }),
        }
    }
}

fn emit_bga(
    notes: &[crate::model::notes::RawNote],
    kind: EventKind,
    track: i32,
    bms: &Bms,
    geometry: &BarGeometry,
    events: &mut Vec<Event>,
) {
    for note in notes {
        let time_sig = bms.tracks.time_sig[note.bar as usize];
        events.push(Event {
            pos: geometry.pos(note.bar, note.beat, time_sig),
            kind,
            track,
            value: Some(i64::from(note.value)),
            value_a: None,
            value_f: None,
        });
    }
}

fn emit_stop(bms: &Bms, geometry: &BarGeometry, events: &mut Vec<Event>, sink: &mut DiagnosticSink) {
    for note in &bms.tracks.stop {
        let id = Base36Id::from_value(note.value);
        match bms.resources.stop(id) {
            Some(&duration) => {
                let time_sig = bms.tracks.time_sig[note.bar as usize];
                events.push(Event {
                    pos: geometry.pos(note.bar, note.beat, time_sig),
                    kind: EventKind::Stop,
                    track: 9,
                    value: Some(i64::from(duration)),
                    value_a: None,
                    value_f: None,
                });
            }
            None => sink.emit_global(WarningContent::UndefinedStopIndex { index: note.value }),
        }
    }
}

fn emit_background(bms: &Bms, geometry: &BarGeometry, events: &mut Vec<Event>) {
    for (lane, notes) in bms.tracks.background.iter().enumerate() {
        for note in notes {
            let time_sig = bms.tracks.time_sig[note.bar as usize];
            events.push(Event {
                pos: geometry.pos(note.bar, note.beat, time_sig),
                kind: EventKind::Note,
                track: -(lane as i32),
                value: Some(i64::from(note.value)),
                value_a: None,
                value_f: None,
            });
        }
    }
}

fn emit_object(bms: &Bms, geometry: &BarGeometry, events: &mut Vec<Event>) {
    for (index, notes) in bms.tracks.object.iter().enumerate() {
        let channel = i32::from(object_index_to_unified_channel(index as u8));
        for (i, note) in notes.iter().enumerate() {
            let time_sig = bms.tracks.time_sig[note.bar as usize];
            let pos = geometry.pos(note.bar, note.beat, time_sig);
            match note.value {
                NoteValue::Regular { index: id, hold } if hold => {
                    let next = &notes[i + 1];
                    let next_sig = bms.tracks.time_sig[next.bar as usize];
                    let next_pos = geometry.pos(next.bar, next.beat, next_sig);
                    events.push(Event {
                        pos,
                        kind: EventKind::NoteLong,
                        track: channel,
                        value: Some(i64::from(id.value())),
                        value_a: Some(next_pos - pos),
                        value_f: None,
                    });
                }
                NoteValue::Regular { index: id, .. } => {
                    events.push(Event {
                        pos,
                        kind: EventKind::Note,
                        track: channel,
                        value: Some(i64::from(id.value())),
                        value_a: None,
                        value_f: None,
                    });
                }
                NoteValue::Release => {
                    let prev = &notes[i - 1];
                    let prev_index = match prev.value {
                        NoteValue::Regular { index, .. } => index,
                        NoteValue::Release => unreachable!("a release never follows a release"),
                    };
                    let prev_sig = bms.tracks.time_sig[prev.bar as usize];
                    let prev_pos = geometry.pos(prev.bar, prev.beat, prev_sig);
                    events.push(Event {
                        pos,
                        kind: EventKind::NoteOff,
                        track: channel,
                        value: Some(i64::from(prev_index.value())),
                        value_a: Some(pos - prev_pos),
                        value_f: None,
                    });
                }
            }
        }
    }
}
