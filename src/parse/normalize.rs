//! Chart normalisation (§4.5): reinterprets channel `03`, sorts and dedups
//! every channel, resolves long-note holds, and fills in defaulted time
//! signatures.

use crate::command::Base36Id;
use crate::command::channel::LnDialect;
use crate::model::Bms;
use crate::model::notes::{resolve_holds, sort_and_dedup};

fn dialect_for_object_index(index: u8) -> LnDialect {
    if u16::from(index) + 10 < 50 {
        LnDialect::Lnobj
    } else {
        LnDialect::PairedChannel
    }
}

/// Reinterprets channel `03`'s base-36 payload as a hexadecimal byte, per
/// §4.4: `stored = (value / 36) * 16 + (value % 36)`.
fn reinterpret_inline_tempo(bms: &mut Bms) {
    for note in &mut bms.tracks.tempo {
        note.value = (note.value / 36) * 16 + (note.value % 36);
    }
}

fn compute_max_bar(bms: &Bms) -> u16 {
    let mut max_bar = 0u16;
    for (i, &sig) in bms.tracks.time_sig.iter().enumerate() {
        if sig != 0 {
            max_bar = max_bar.max(i as u16);
        }
    }
    for note in &bms.tracks.tempo {
        max_bar = max_bar.max(note.bar);
    }
    for note in &bms.tracks.ex_tempo {
        max_bar = max_bar.max(note.bar);
    }
    for note in &bms.tracks.bga_base {
        max_bar = max_bar.max(note.bar);
    }
    for note in &bms.tracks.bga_layer {
        max_bar = max_bar.max(note.bar);
    }
    for note in &bms.tracks.bga_poor {
        max_bar = max_bar.max(note.bar);
    }
    for note in &bms.tracks.stop {
        max_bar = max_bar.max(note.bar);
    }
    for lane in &bms.tracks.background {
        for note in lane {
            max_bar = max_bar.max(note.bar);
        }
    }
    for channel in &bms.tracks.object {
        for note in channel {
            max_bar = max_bar.max(note.bar);
        }
    }
    max_bar
}

fn fill_time_signatures(bms: &mut Bms, max_bar: u16) {
    for slot in &mut bms.tracks.time_sig[..=max_bar as usize] {
        if *slot == 0 {
            *slot = 4;
        }
    }
}

/// Runs every normalisation step over a chart whose tracks were populated by
/// [`super::notes::parse_message_line`]. `lnobj` is the `#LNOBJ` marker id,
/// if one was declared.
pub fn normalize(bms: &mut Bms, lnobj: Option<Base36Id>) {
    reinterpret_inline_tempo(bms);

    sort_and_dedup(&mut bms.tracks.tempo);
    sort_and_dedup(&mut bms.tracks.ex_tempo);
    sort_and_dedup(&mut bms.tracks.bga_base);
    sort_and_dedup(&mut bms.tracks.bga_layer);
    sort_and_dedup(&mut bms.tracks.bga_poor);
    sort_and_dedup(&mut bms.tracks.stop);
    for lane in &mut bms.tracks.background {
        sort_and_dedup(lane);
    }
    for (index, channel) in bms.tracks.object.iter_mut().enumerate() {
        sort_and_dedup(channel);
        resolve_holds(channel, dialect_for_object_index(index as u8), lnobj);
    }

    let max_bar = compute_max_bar(bms);
    fill_time_signatures(bms, max_bar);
    bms.tracks.max_bar = max_bar;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::notes::{Note, NoteValue, RawNote};

    #[test]
    fn reinterprets_channel_03_as_hex() {
        let mut bms = Bms::default();
        bms.tracks.tempo.push(RawNote {
            bar: 0,
            beat: 0.0,
            value: 36 + 5,
        });
        normalize(&mut bms, None);
        assert_eq!(bms.tracks.tempo[0].value, 16 + 5);
    }

    #[test]
    fn fills_unset_time_signatures_up_to_max_bar() {
        let mut bms = Bms::default();
        bms.tracks.object[1].push(Note {
            bar: 2,
            beat: 0.0,
            value: NoteValue::Regular {
                index: Base36Id::from_value(1),
                hold: false,
            },
        });
        normalize(&mut bms, None);
        assert_eq!(bms.max_bar(), 2);
        assert_eq!(&bms.tracks.time_sig[..3], &[4, 4, 4]);
    }

    #[test]
    fn resolves_holds_per_object_channel_dialect() {
        let mut bms = Bms::default();
        let lnobj = Base36Id::from_value(1295);
        bms.tracks.object[1] = vec![
            Note {
                bar: 0,
                beat: 0.0,
                value: NoteValue::Regular {
                    index: Base36Id::from_value(5),
                    hold: false,
                },
            },
            Note {
                bar: 0,
                beat: 0.5,
                value: NoteValue::Regular {
                    index: lnobj,
                    hold: false,
                },
            },
        ];
        normalize(&mut bms, Some(lnobj));
        assert!(matches!(
            bms.tracks.object[1][0].value,
            NoteValue::Regular { hold: true, .. }
        ));
        assert!(matches!(bms.tracks.object[1][1].value, NoteValue::Release));
    }
}
