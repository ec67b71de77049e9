//! Properties P2, P3, P8 and sequence-lowering specifics.

use bms_loader::prelude::*;

fn sample_source() -> &'static str {
    "\
#TITLE Sample
#ARTIST Someone
#BPM 130
#LNOBJ ZZ
#WAV01 a.wav
#WAV02 b.wav
#WAVA3 c.wav

#00002:0.75
#00011:0102
#00102:02
#00111:0304
#00211:010000ZZ
"
}

#[test]
fn p2_events_are_sorted_by_pos_then_kind() {
    let bms = parse_bms(sample_source()).bms;
    let sequence = to_sequence(&bms);
    for pair in sequence.events.windows(2) {
        let [a, b] = pair else { unreachable!() };
        assert!(
            (a.pos, a.kind) <= (b.pos, b.kind),
            "events out of order: {a:?} then {b:?}"
        );
    }
}

#[test]
fn p3_barline_cadence_matches_time_signature() {
    let bms = parse_bms(sample_source()).bms;
    let sequence = to_sequence(&bms);
    let barlines: Vec<_> = sequence
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Barline)
        .collect();
    for pair in barlines.windows(2) {
        let expected_sig = pair[0].value_a.unwrap();
        assert_eq!(pair[1].pos - pair[0].pos, 48 * expected_sig);
    }
}

#[test]
fn p8_warnings_do_not_affect_the_chart_or_sequence() {
    let a = parse_bms(sample_source());
    let b = parse_bms(sample_source());
    assert_eq!(a.bms, b.bms);
    let seq_a = to_sequence(&a.bms);
    let seq_b = to_sequence(&b.bms);
    assert_eq!(seq_a, seq_b);
}

#[test]
fn i6_i7_bar_start_recurrence_holds() {
    let bms = parse_bms(sample_source()).bms;
    let sequence = to_sequence(&bms);
    let barlines: Vec<_> = sequence
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Barline)
        .collect();
    assert_eq!(barlines[0].pos, 0);
    let mut bar_start = 0i64;
    for barline in &barlines {
        assert_eq!(barline.pos, bar_start * 48);
        bar_start += barline.value_a.unwrap();
    }
}

#[test]
fn ex_tempo_resolves_through_the_bpm_table() {
    let BmsOutput { bms, .. } = parse_bms("#BPM01 200.0\n#00008:01\n");
    let sequence = to_sequence(&bms);
    let tempo_change = sequence
        .events
        .iter()
        .find(|e| e.kind == EventKind::TempoChange && e.track == 8);
    assert_eq!(tempo_change.and_then(|e| e.value_f), Some(200.0));
}

#[test]
fn undefined_ex_tempo_index_omits_the_event() {
    let BmsOutput { bms, .. } = parse_bms("#00008:01\n");
    let (sequence, warnings) = to_sequence_with_diagnostics(&bms);
    assert!(sequence
        .events
        .iter()
        .all(|e| e.kind != EventKind::TempoChange));
    assert!(warnings
        .iter()
        .any(|w| matches!(w.content, WarningContent::UndefinedTempoIndex { .. })));
}

#[test]
fn undefined_stop_index_omits_the_event() {
    let BmsOutput { bms, .. } = parse_bms("#00009:01\n");
    let (sequence, warnings) = to_sequence_with_diagnostics(&bms);
    assert!(sequence.events.iter().all(|e| e.kind != EventKind::Stop));
    assert!(warnings
        .iter()
        .any(|w| matches!(w.content, WarningContent::UndefinedStopIndex { .. })));
}
