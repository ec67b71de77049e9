//! End-to-end scenarios S1-S3 and properties P1, P5, P6, P7.

use bms_loader::prelude::*;

#[test]
fn s1_minimum_chart_defaults_missing_player_num() {
    let BmsOutput { bms, warnings } = parse_bms("#TITLE foo\n#BPM 130\n");
    assert_eq!(bms.metadata.title, "foo");
    assert_eq!(bms.metadata.init_tempo, 130.0);
    assert_eq!(bms.metadata.player_num, PlayerMode::Single);
    assert!(warnings
        .iter()
        .any(|w| matches!(w.content, WarningContent::MissingField { ref field, .. } if field == "PLAYER")));

    let sequence = to_sequence(&bms);
    assert_eq!(sequence.events.first().map(|e| e.kind), Some(EventKind::Barline));
}

#[test]
fn s2_two_notes_four_four() {
    let BmsOutput { bms, .. } = parse_bms("#WAV01 a.wav\n#00011:0101\n");
    assert_eq!(bms.tracks.object[1].len(), 2);
    assert_eq!(bms.tracks.object[1][0].beat, 0.0);
    assert_eq!(bms.tracks.object[1][1].beat, 0.5);

    let sequence = to_sequence(&bms);
    let barline = sequence
        .events
        .iter()
        .find(|e| e.kind == EventKind::Barline)
        .unwrap();
    assert_eq!(barline.pos, 0);
    assert_eq!(barline.value_a, Some(4));

    let notes: Vec<_> = sequence
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Note && e.track == 11)
        .collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].pos, 0);
    assert_eq!(notes[1].pos, 96);
}

#[test]
fn s3_three_quarter_time_signature() {
    let BmsOutput { bms, .. } = parse_bms("#00102:0.75\n#00111:010101\n");
    assert_eq!(bms.tracks.time_sig[1], 3);

    let sequence = to_sequence(&bms);
    let notes: Vec<_> = sequence
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Note && e.track == 11)
        .collect();
    assert_eq!(notes[0].pos, 4 * 48);
    assert_eq!(notes[1].pos, 4 * 48 + 48);
    assert_eq!(notes[2].pos, 4 * 48 + 96);
}

#[test]
fn p1_determinism() {
    let source = "#TITLE foo\n#BPM 130\n#WAV01 a.wav\n#00111:0101\n";
    let a = parse_bms(source);
    let b = parse_bms(source);
    assert_eq!(a.bms, b.bms);
    assert_eq!(a.warnings, b.warnings);
}

#[test]
fn p5_base36_round_trip() {
    for (tag, expected) in [("WAV01", 0u16 * 36 + 1), ("WAVZZ", 35 * 36 + 35)] {
        let source = format!("#{tag} FOO\n");
        let BmsOutput { bms, .. } = parse_bms(&source);
        let id = Base36Id::from_value(expected);
        assert_eq!(bms.resources.wav(id), Some(&"FOO".to_string()));
    }
}

#[test]
fn p6_dedup_idempotence() {
    let once = parse_bms("#WAV01 a.wav\n#00111:0100\n").bms;
    let twice = parse_bms("#WAV01 a.wav\n#00111:0100\n#00111:0100\n").bms;
    assert_eq!(once.tracks.object[1], twice.tracks.object[1]);
}

#[test]
fn p7_time_signature_bounds() {
    let BmsOutput { bms, .. } = parse_bms("#00102:63.75\n#00111:01\n");
    for bar in 0..=bms.max_bar() {
        assert!((1..=255).contains(&bms.tracks.time_sig[bar as usize]));
    }
}
