//! Command dispatch (§4.3): interprets `#TAG arg…` declaration lines.

use crate::command::{Base36Id, PlayerMode};
use crate::diagnostics::{DiagnosticSink, WarningContent};
use crate::lex::RawLine;
use crate::model::Bms;

/// Accumulates single-valued metadata fields while commands are being
/// read, so that redefinition and "never appeared" can be told apart
/// before [`HeaderState::finalize`] copies everything into
/// [`crate::model::Metadata`] with its defaults applied.
#[derive(Debug, Default)]
pub struct HeaderState {
    player_num: Option<PlayerMode>,
    genre: Option<String>,
    title: Option<String>,
    artist: Option<String>,
    subartist: Option<String>,
    init_tempo: Option<f64>,
    play_level: Option<u16>,
    judge_rank: Option<u8>,
    gauge_total: Option<u16>,
    difficulty: Option<u8>,
    stage_file: Option<String>,
    banner: Option<String>,
    back_bmp: Option<String>,
    /// `#LNOBJ`: the marker id that ends a hold on the LNOBJ dialect
    /// channels.
    pub lnobj: Option<Base36Id>,
}

impl HeaderState {
    /// Applies every field's defaulting rule (§3) into `metadata`, emitting
    /// the diagnostics spec marks "logged when missing".
    pub fn finalize(self, bms: &mut Bms, sink: &mut DiagnosticSink) {
        let metadata = &mut bms.metadata;
        match self.player_num {
            Some(v) => metadata.player_num = v,
            None => sink.emit_global(WarningContent::MissingField {
                field: "PLAYER".to_string(),
                default: "1".to_string(),
            }),
        }
        match self.genre {
            Some(v) => metadata.genre = v,
            None => sink.emit_global(WarningContent::MissingField {
                field: "GENRE".to_string(),
                default: "(unknown)".to_string(),
            }),
        }
        match self.title {
            Some(v) => metadata.title = v,
            None => sink.emit_global(WarningContent::MissingField {
                field: "TITLE".to_string(),
                default: "(unknown)".to_string(),
            }),
        }
        match self.artist {
            Some(v) => metadata.artist = v,
            None => sink.emit_global(WarningContent::MissingField {
                field: "ARTIST".to_string(),
                default: "(unknown)".to_string(),
            }),
        }
        if let Some(v) = self.subartist {
            metadata.subartist = v;
        }
        if let Some(v) = self.init_tempo {
            metadata.init_tempo = v;
        }
        if let Some(v) = self.play_level {
            metadata.play_level = v;
        }
        if let Some(v) = self.judge_rank {
            metadata.judge_rank = v;
        }
        if let Some(v) = self.gauge_total {
            metadata.gauge_total = v;
        }
        metadata.difficulty = self.difficulty;
        if let Some(v) = self.stage_file {
            metadata.stage_file = v;
        }
        if let Some(v) = self.banner {
            metadata.banner = v;
        }
        if let Some(v) = self.back_bmp {
            metadata.back_bmp = v;
        }
    }
}

fn split_tag_arg(content: &str) -> (&str, &str) {
    match content.find(char::is_whitespace) {
        Some(i) => (&content[..i], content[i..].trim_start()),
        None => (content, ""),
    }
}

fn parse_int_range(arg: &str, min: i64, max: i64) -> Option<i64> {
    arg.trim().parse::<i64>().ok().filter(|v| (min..=max).contains(v))
}

fn parse_real_range(arg: &str, min: f64, max: f64) -> Option<f64> {
    arg.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

/// Sets a single-valued `Option<String>` field, emitting a redefinition
/// warning if it was already set.
fn set_text(
    field: &mut Option<String>,
    arg: &str,
    tag: &str,
    line: usize,
    sink: &mut DiagnosticSink,
) {
    if field.is_some() {
        sink.emit(
            line,
            WarningContent::Redefinition {
                tag: tag.to_string(),
            },
        );
    }
    *field = Some(arg.to_string());
}

fn set_invalid(tag: &str, arg: &str, line: usize, sink: &mut DiagnosticSink) {
    sink.emit(
        line,
        WarningContent::InvalidValue {
            tag: tag.to_string(),
            value: arg.to_string(),
        },
    );
}

/// Interprets one command line, mutating `state` (single-valued metadata)
/// and `bms.resources` (the index tables) directly.
pub fn parse_command_line(
    line: RawLine<'_>,
    state: &mut HeaderState,
    bms: &mut Bms,
    sink: &mut DiagnosticSink,
) {
    let (tag, arg) = split_tag_arg(line.content);
    if arg.is_empty() {
        sink.emit(line.line_number, WarningContent::EmptyCommandArgument);
        return;
    }

    macro_rules! redefine_if_some {
        ($opt:expr) => {
            if $opt.is_some() {
                sink.emit(
                    line.line_number,
                    WarningContent::Redefinition {
                        tag: tag.to_string(),
                    },
                );
            }
        };
    }

    match tag {
        "PLAYER" => match parse_int_range(arg, 1, 3).and_then(|v| PlayerMode::try_from(v).ok()) {
            Some(mode) => {
                redefine_if_some!(state.player_num);
                state.player_num = Some(mode);
            }
            None => set_invalid(tag, arg, line.line_number, sink),
        },
        "GENRE" => set_text(&mut state.genre, arg, tag, line.line_number, sink),
        "TITLE" => set_text(&mut state.title, arg, tag, line.line_number, sink),
        "ARTIST" => set_text(&mut state.artist, arg, tag, line.line_number, sink),
        "SUBARTIST" => set_text(&mut state.subartist, arg, tag, line.line_number, sink),
        "STAGEFILE" => set_text(&mut state.stage_file, arg, tag, line.line_number, sink),
        "BANNER" => set_text(&mut state.banner, arg, tag, line.line_number, sink),
        "BACKBMP" => set_text(&mut state.back_bmp, arg, tag, line.line_number, sink),
        "BPM" => match parse_real_range(arg, 1.0, 999.0) {
            Some(v) => {
                redefine_if_some!(state.init_tempo);
                state.init_tempo = Some(v);
            }
            None => set_invalid(tag, arg, line.line_number, sink),
        },
        "PLAYLEVEL" => match parse_int_range(arg, 1, 999) {
            Some(v) => {
                redefine_if_some!(state.play_level);
                state.play_level = Some(v as u16);
            }
            None => set_invalid(tag, arg, line.line_number, sink),
        },
        "RANK" => match parse_int_range(arg, 0, 3) {
            Some(v) => {
                redefine_if_some!(state.judge_rank);
                state.judge_rank = Some(v as u8);
            }
            None => set_invalid(tag, arg, line.line_number, sink),
        },
        "TOTAL" => match parse_int_range(arg, 1, 9999) {
            Some(v) => {
                redefine_if_some!(state.gauge_total);
                state.gauge_total = Some(v as u16);
            }
            None => set_invalid(tag, arg, line.line_number, sink),
        },
        "DIFFICULTY" => match parse_int_range(arg, 1, 5) {
            Some(v) => {
                redefine_if_some!(state.difficulty);
                state.difficulty = Some(v as u8);
            }
            None => set_invalid(tag, arg, line.line_number, sink),
        },
        "LNOBJ" => match Base36Id::try_from(arg.trim()) {
            Ok(id) => {
                redefine_if_some!(state.lnobj);
                state.lnobj = Some(id);
            }
            Err(()) => set_invalid(tag, arg, line.line_number, sink),
        },
        _ if tag.len() == 5 && tag.starts_with("WAV") => {
            dispatch_resource(tag, &tag[3..], arg, line.line_number, sink, |id, text| {
                bms.resources.set_wav(id, text)
            })
        }
        _ if tag.len() == 5 && tag.starts_with("BMP") => {
            dispatch_resource(tag, &tag[3..], arg, line.line_number, sink, |id, text| {
                bms.resources.set_bmp(id, text)
            })
        }
        _ if tag.len() == 5 && tag.starts_with("BPM") => {
            match (Base36Id::try_from(&tag[3..]), parse_real_range(arg, 1.0, 999.0)) {
                (Ok(id), Some(v)) => {
                    if bms.resources.set_tempo(id, v).is_some() {
                        sink.emit(
                            line.line_number,
                            WarningContent::Redefinition {
                                tag: tag.to_string(),
                            },
                        );
                    }
                }
                (Ok(_), None) => set_invalid(tag, arg, line.line_number, sink),
                (Err(()), _) => sink.emit(
                    line.line_number,
                    WarningContent::UnrecognizedCommand {
                        tag: tag.to_string(),
                    },
                ),
            }
        }
        _ if tag.len() == 6 && tag.starts_with("STOP") => {
            match (Base36Id::try_from(&tag[4..]), parse_int_range(arg, 0, 32767)) {
                (Ok(id), Some(v)) => {
                    if bms.resources.set_stop(id, v as u32).is_some() {
                        sink.emit(
                            line.line_number,
                            WarningContent::Redefinition {
                                tag: tag.to_string(),
                            },
                        );
                    }
                }
                (Ok(_), None) => set_invalid(tag, arg, line.line_number, sink),
                (Err(()), _) => sink.emit(
                    line.line_number,
                    WarningContent::UnrecognizedCommand {
                        tag: tag.to_string(),
                    },
                ),
            }
        }
        _ => sink.emit(
            line.line_number,
            WarningContent::UnrecognizedCommand {
                tag: tag.to_string(),
            },
        ),
    }
}

fn dispatch_resource(
    tag: &str,
    id_text: &str,
    arg: &str,
    line: usize,
    sink: &mut DiagnosticSink,
    set: impl FnOnce(Base36Id, String) -> Option<String>,
) {
    match Base36Id::try_from(id_text) {
        Ok(id) => {
            if set(id, arg.to_string()).is_some() {
                sink.emit(
                    line,
                    WarningContent::Redefinition {
                        tag: tag.to_string(),
                    },
                );
            }
        }
        Err(()) => sink.emit(
            line,
            WarningContent::UnrecognizedCommand {
                tag: tag.to_string(),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_tag_and_argument() {
        assert_eq!(split_tag_arg("TITLE foo bar"), ("TITLE", "foo bar"));
        assert_eq!(split_tag_arg("TITLE"), ("TITLE", ""));
        assert_eq!(split_tag_arg("TITLE   foo"), ("TITLE", "foo"));
    }

    #[test]
    fn parses_wav_definitions() {
        let mut bms = Bms::default();
        let mut state = HeaderState::default();
        let mut sink = DiagnosticSink::new();
        parse_command_line(
            RawLine {
                line_number: 1,
                content: "WAV01 a.wav",
            },
            &mut state,
            &mut bms,
            &mut sink,
        );
        assert!(sink.is_empty());
        let id = Base36Id::try_from("01").unwrap();
        assert_eq!(bms.resources.wav(id), Some(&"a.wav".to_string()));
    }

    #[test]
    fn rejects_out_of_range_bpm() {
        let mut bms = Bms::default();
        let mut state = HeaderState::default();
        let mut sink = DiagnosticSink::new();
        parse_command_line(
            RawLine {
                line_number: 1,
                content: "BPM 1000",
            },
            &mut state,
            &mut bms,
            &mut sink,
        );
        assert_eq!(sink.len(), 1);
        assert_eq!(state.init_tempo, None);
    }
}
