//! Definitions of command argument data shared across lexing and parsing.

pub mod channel;

/// A play style of the score.
///
/// `player_num` in a BMS file is `1` for single play, `2` for two-player
/// (couple) play, and `3` for the 9-key "PMS"-style layout this crate calls
/// [`PlayerMode::Nine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerMode {
    /// 1P / single play (`#PLAYER 1`).
    Single,
    /// 2P / couple play (`#PLAYER 2`).
    Two,
    /// 9-key play (`#PLAYER 3`).
    Nine,
}

impl Default for PlayerMode {
    fn default() -> Self {
        Self::Single
    }
}

impl TryFrom<i64> for PlayerMode {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Single),
            2 => Ok(Self::Two),
            3 => Ok(Self::Nine),
            other => Err(other),
        }
    }
}

fn char_to_base36(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' => Some(ch as u8 - b'0'),
        'A'..='Z' => Some(ch as u8 - b'A' + 10),
        _ => None,
    }
}

fn base36_to_char(value: u8) -> char {
    match value {
        0..=9 => (b'0' + value) as char,
        10..=35 => (b'A' + value - 10) as char,
        _ => unreachable!("base-36 digit out of range"),
    }
}

/// A base-36 index, the `"00"`..`"ZZ"` two-character handle used throughout
/// BMS as a resource table key and as a channel payload cell.
///
/// Only the uppercase alphabet `[0-9A-Z]` is accepted: unlike some modern
/// BMS extensions, lowercase letters are not valid in this position and are
/// rejected rather than silently folded.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Base36Id([u8; 2]);

impl std::fmt::Debug for Base36Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Base36Id({}{})", self.0[0] as char, self.0[1] as char)
    }
}

impl std::fmt::Display for Base36Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

impl TryFrom<[char; 2]> for Base36Id {
    type Error = [char; 2];

    fn try_from(value: [char; 2]) -> Result<Self, Self::Error> {
        let Some(a) = char_to_base36(value[0]) else {
            return Err(value);
        };
        let Some(b) = char_to_base36(value[1]) else {
            return Err(value);
        };
        Ok(Self([a, b]))
    }
}

impl TryFrom<&str> for Base36Id {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        let (Some(a), Some(b), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(());
        };
        Self::try_from([a, b]).map_err(|_| ())
    }
}

impl From<Base36Id> for u16 {
    fn from(value: Base36Id) -> Self {
        value.0[0] as u16 * 36 + value.0[1] as u16
    }
}

impl Base36Id {
    /// The `"00"` sentinel, meaning "no event" in a channel payload.
    pub const NULL: Self = Self([0, 0]);

    /// Builds a `Base36Id` directly from its numeric value (`0..=1295`).
    ///
    /// # Panics
    ///
    /// Panics if `value` is greater than `1295`.
    #[must_use]
    pub fn from_value(value: u16) -> Self {
        assert!(value <= 1295, "base-36 index out of range: {value}");
        Self([(value / 36) as u8, (value % 36) as u8])
    }

    /// The numeric value of this id, in `0..=1295`.
    #[must_use]
    pub fn value(self) -> u16 {
        self.into()
    }

    /// Whether this is the `"00"` sentinel.
    #[must_use]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// The two-character textual form, e.g. `"A3"`.
    #[must_use]
    pub fn as_chars(self) -> [char; 2] {
        [base36_to_char(self.0[0]), base36_to_char(self.0[1])]
    }
}
