//! Channel identity and the two-decimal-digit dispatch table of §4.4.
//!
//! The source format encodes a note's destination as raw integer arithmetic
//! on the channel id (`track - 10`, negative ids for background lanes, and
//! so on). This module decodes that once, here, into [`ChannelKind`] so the
//! rest of the crate never has to re-derive the mapping from a bare `u8`.

/// The long-note dialect a playable channel uses, or [`ChannelKind::Object`]
/// without any LN dialect distinction: both dialects are unified by the
/// normaliser into the same `object` storage, but the dialect decides how a
/// hold/release pair is recognised (see [`crate::model::notes`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LnDialect {
    /// Channels 11..19, 21..29: a hold ends when an `#LNOBJ` marker id is
    /// placed on the same channel.
    Lnobj,
    /// Channels 51..59, 61..69: a hold is two consecutive notes of equal
    /// value (`#LNTYPE 1`).
    PairedChannel,
}

/// What a `#BBBCC:` message line's channel id (`CC`, decimal 0..99) means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// `01`: background audio. A fresh lane is allocated per redeclaration
    /// within the same bar.
    Background,
    /// `02`: time signature for the bar; the payload is a decimal real, not
    /// base-36 pairs.
    TimeSignature,
    /// `03`: inline tempo change, reinterpreted base-36-as-hex per §4.4.
    InlineTempo,
    /// `04`: BGA base layer.
    BgaBase,
    /// `05`: legacy "poor" track, never populated by any player; kept only
    /// to produce the documented diagnostic.
    UnusedPoorLegacy,
    /// `06`: BGA poor (miss) layer.
    BgaPoor,
    /// `07`: BGA overlay layer.
    BgaLayer,
    /// `08`: tempo change via the `#BPMxx` table.
    ExTempo,
    /// `09`: stop via the `#STOPxx` table.
    Stop,
    /// `11..19`, `21..29`, `51..59`, `61..69` (last digit not `0`): playable
    /// notes, `object[channel - 10]`.
    Object {
        /// Index into `Tracks::object`, i.e. `channel - 10`.
        index: u8,
        /// Which long-note dialect applies to this channel.
        dialect: LnDialect,
    },
    /// Any other channel id: accepted syntactically, produces a diagnostic,
    /// and is otherwise ignored.
    Unknown,
}

impl ChannelKind {
    /// Classifies a two-digit decimal channel id per the table in §4.4.
    #[must_use]
    pub fn classify(channel: u8) -> Self {
        match channel {
            1 => Self::Background,
            2 => Self::TimeSignature,
            3 => Self::InlineTempo,
            4 => Self::BgaBase,
            5 => Self::UnusedPoorLegacy,
            6 => Self::BgaPoor,
            7 => Self::BgaLayer,
            8 => Self::ExTempo,
            9 => Self::Stop,
            11..=19 | 21..=29 if channel % 10 != 0 => Self::Object {
                index: channel - 10,
                dialect: LnDialect::Lnobj,
            },
            51..=59 | 61..=69 if channel % 10 != 0 => Self::Object {
                index: channel - 10,
                dialect: LnDialect::PairedChannel,
            },
            _ => Self::Unknown,
        }
    }
}

/// Maps an `object` array index back to the unified playable-channel id
/// reported on [`crate::sequence::Event`] (§4.6): long-note channels
/// `51..69` are folded onto `11..29` so a consumer never has to know which
/// dialect produced a given note.
#[must_use]
pub fn object_index_to_unified_channel(index: u8) -> u8 {
    let channel = index + 10;
    if channel < 50 {
        channel
    } else {
        channel - 40
    }
}

/// Number of slots in `Tracks::object` (covers channel ids `10..70`).
pub const OBJECT_CHANNEL_COUNT: usize = 60;

/// Number of background lanes a single bar may allocate before the "too
/// many background tracks" diagnostic fires and the rest are dropped.
pub const MAX_BACKGROUND_LANES: usize = 64;
