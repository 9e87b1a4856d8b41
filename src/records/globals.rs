//! `GMST`, `GLOB` reconstructors (SPEC_FULL supplement).

use crate::primitives::{read_cstr, read_f32};
use crate::records::{dedup_by_form_id, iter_subrecords, ReconstructionContext};
use crate::types::{EditorId, FormId, Offset};

#[derive(Debug, Clone)]
pub enum GameSettingValue {
    Int(i32),
    Float(f32),
    Str(String),
}

#[derive(Debug, Clone)]
pub struct GameSetting {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub value: Option<GameSettingValue>,
}

pub fn reconstruct_game_settings(ctx: &ReconstructionContext<'_>) -> Vec<GameSetting> {
    let mut buf = Vec::with_capacity(ctx.config.small_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"GMST" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut setting = GameSetting {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            value: None,
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            let mut kind_hint = setting.editor_id.as_ref().map(|e| e.as_str().chars().next());
            for (sig, data) in iter_subrecords(&buf, rec) {
                match &sig {
                    b"EDID" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            kind_hint = Some(s.chars().next());
                            setting.editor_id = EditorId::new(s);
                        }
                    }
                    b"DATA" => {
                        setting.value = decode_gmst_value(kind_hint.flatten(), data, endian);
                    }
                    _ => {}
                }
            }
        }

        out.push(setting);
    }

    dedup_by_form_id(out, |g| g.form_id)
}

/// FNV `GMST` editor IDs are prefixed by type: `i` = int, `f` = float,
/// `s` = string; the `DATA` payload's shape follows that prefix.
fn decode_gmst_value(prefix: Option<char>, data: &[u8], endian: crate::types::Endianness) -> Option<GameSettingValue> {
    match prefix {
        Some('f') if data.len() >= 4 => read_f32(data, 0, endian).ok().map(GameSettingValue::Float),
        Some('s') => crate::primitives::read_cstr(data, 0).ok().map(GameSettingValue::Str),
        _ if data.len() >= 4 => {
            crate::primitives::read_i32(data, 0, endian).ok().map(GameSettingValue::Int)
        }
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Global {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub value: Option<f32>,
}

pub fn reconstruct_globals(ctx: &ReconstructionContext<'_>) -> Vec<Global> {
    let mut buf = Vec::with_capacity(ctx.config.small_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"GLOB" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut global = Global {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            value: None,
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            for (sig, data) in iter_subrecords(&buf, rec) {
                match &sig {
                    b"EDID" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            global.editor_id = EditorId::new(s);
                        }
                    }
                    b"FLTV" if data.len() >= 4 => global.value = read_f32(data, 0, endian).ok(),
                    _ => {}
                }
            }
        }

        out.push(global);
    }

    dedup_by_form_id(out, |g| g.form_id)
}
