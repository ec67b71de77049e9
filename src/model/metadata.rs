//! Single-valued song metadata and its defaulting rules (§3).

use crate::command::PlayerMode;

/// Song metadata. Every field here has a defaulting rule applied by the
/// normaliser once the whole document has been read; see
/// [`crate::parse::normalize`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// `#PLAYER`. Defaults to [`PlayerMode::Single`].
    pub player_num: PlayerMode,
    /// `#GENRE`. Defaults to `"(unknown)"`, logged when missing.
    pub genre: String,
    /// `#TITLE`. Defaults to `"(unknown)"`, logged when missing.
    pub title: String,
    /// `#ARTIST`. Defaults to `"(unknown)"`, logged when missing.
    pub artist: String,
    /// `#SUBARTIST`. Defaults to `"(unknown)"`, silent.
    pub subartist: String,
    /// `#STAGEFILE`. Defaults to `"(none)"`, silent.
    pub stage_file: String,
    /// `#BANNER`. Defaults to `"(none)"`, silent.
    pub banner: String,
    /// `#BACKBMP`. Defaults to `"(none)"`, silent.
    pub back_bmp: String,
    /// `#BPM`, the initial tempo in beats per minute, in `[1.0, 999.0]`.
    /// Defaults to `130`.
    pub init_tempo: f64,
    /// `#PLAYLEVEL`, in `[1, 999]`. Defaults to `3`.
    pub play_level: u16,
    /// `#RANK`, the judge leniency rank, in `[0, 3]`. Defaults to `3`.
    pub judge_rank: u8,
    /// `#TOTAL`, the gauge total percentage basis, in `[1, 9999]`.
    /// Defaults to `160`.
    pub gauge_total: u16,
    /// `#DIFFICULTY`, in `[1, 5]`. Absent rather than defaulted if it never
    /// appears.
    pub difficulty: Option<u8>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            player_num: PlayerMode::Single,
            genre: "(unknown)".to_string(),
            title: "(unknown)".to_string(),
            artist: "(unknown)".to_string(),
            subartist: "(unknown)".to_string(),
            stage_file: "(none)".to_string(),
            banner: "(none)".to_string(),
            back_bmp: "(none)".to_string(),
            init_tempo: 130.0,
            play_level: 3,
            judge_rank: 3,
            gauge_total: 160,
            difficulty: None,
        }
    }
}
