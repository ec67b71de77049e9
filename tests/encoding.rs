//! BMS files in the wild are overwhelmingly Shift_JIS-encoded; this crate
//! only accepts `&str`, so decoding is the caller's job. This mirrors the
//! recommended `encoding_rs` usage from the crate's top-level docs.

use bms_loader::prelude::*;
use encoding_rs::SHIFT_JIS;

#[test]
fn shift_jis_source_decodes_and_loads() {
    let title = "曲名".as_bytes();
    let (encoded, _, had_errors) = SHIFT_JIS.encode(std::str::from_utf8(title).unwrap());
    assert!(!had_errors);

    let mut bytes = b"#TITLE ".to_vec();
    bytes.extend_from_slice(&encoded);
    bytes.extend_from_slice(b"\n#BPM 150\n");

    let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);
    assert!(!had_errors);

    let BmsOutput { bms, .. } = parse_bms(&decoded);
    assert_eq!(bms.metadata.title, "曲名");
    assert_eq!(bms.metadata.init_tempo, 150.0);
}
