//! The four 1296-entry (`36²`) index tables keyed by [`Base36Id`] (§3).

use crate::command::Base36Id;

const TABLE_SIZE: usize = 1296;

/// The `wav`, `bmp`, `tempo`, and `stop` index tables, each addressed by a
/// base-36 two-character key.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    /// `#WAVxx`: path to an audio sample.
    wav: Vec<Option<String>>,
    /// `#BMPxx`: path to an image or video.
    bmp: Vec<Option<String>>,
    /// `#BPMxx`: a tempo, in beats per minute.
    tempo: Vec<Option<f64>>,
    /// `#STOPxx`: a stop duration in 1/192-of-a-whole-note units.
    stop: Vec<Option<u32>>,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            wav: vec![None; TABLE_SIZE],
            bmp: vec![None; TABLE_SIZE],
            tempo: vec![None; TABLE_SIZE],
            stop: vec![None; TABLE_SIZE],
        }
    }
}

macro_rules! table_accessors {
    ($get:ident, $get_mut:ident, $set:ident, $field:ident, $t:ty) => {
        #[doc = concat!("Looks up `", stringify!($field), "[id]`.")]
        #[must_use]
        pub fn $get(&self, id: Base36Id) -> Option<&$t> {
            self.$field[id.value() as usize].as_ref()
        }

        #[doc(hidden)]
        fn $get_mut(&mut self, id: Base36Id) -> &mut Option<$t> {
            &mut self.$field[id.value() as usize]
        }

        #[doc = concat!("Sets `", stringify!($field), "[id]`, returning the previous value if any (used to detect redefinition).")]
        pub fn $set(&mut self, id: Base36Id, value: $t) -> Option<$t> {
            self.$get_mut(id).replace(value)
        }
    };
}

impl Resources {
    table_accessors!(wav, wav_mut, set_wav, wav, String);
    table_accessors!(bmp, bmp_mut, set_bmp, bmp, String);
    table_accessors!(tempo, tempo_mut, set_tempo, tempo, f64);
    table_accessors!(stop, stop_mut, set_stop, stop, u32);
}
