//! `LVLI`/`LVLN`/`LVLC` reconstructor (spec §9 redesign note: one tagged
//! enum instead of three near-identical polymorphic types, since the core
//! only ever treats the three list kinds uniformly).

use crate::primitives::{read_cstr, read_u16, read_u32};
use crate::records::{dedup_by_form_id, iter_subrecords, ReconstructionContext};
use crate::types::{EditorId, FormId, Offset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeveledListType {
    Item,
    Npc,
    Creature,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeveledEntry {
    pub level: u16,
    pub form_id: FormId,
    pub count: u16,
}

#[derive(Debug, Clone)]
pub struct LeveledList {
    pub list_type: LeveledListType,
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub chance_none: Option<u8>,
    pub flags: Option<u8>,
    pub entries: Vec<LeveledEntry>,
}

pub fn reconstruct(ctx: &ReconstructionContext<'_>) -> Vec<LeveledList> {
    let mut out = Vec::new();
    out.extend(reconstruct_one_kind(ctx, b"LVLI", LeveledListType::Item));
    out.extend(reconstruct_one_kind(ctx, b"LVLN", LeveledListType::Npc));
    out.extend(reconstruct_one_kind(ctx, b"LVLC", LeveledListType::Creature));
    dedup_by_form_id(out, |l| l.form_id)
}

fn reconstruct_one_kind(
    ctx: &ReconstructionContext<'_>,
    signature: &[u8; 4],
    list_type: LeveledListType,
) -> Vec<LeveledList> {
    let mut buf = Vec::with_capacity(ctx.config.small_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != signature {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut list = LeveledList {
            list_type,
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            chance_none: None,
            flags: None,
            entries: Vec::new(),
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            for (sig, data) in iter_subrecords(&buf, rec) {
                match &sig {
                    b"EDID" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            list.editor_id = EditorId::new(s);
                        }
                    }
                    b"LVLD" if !data.is_empty() => list.chance_none = Some(data[0]),
                    b"LVLF" if !data.is_empty() => list.flags = Some(data[0]),
                    b"LVLO" if data.len() >= 10 => {
                        if let (Ok(level), Ok(form_id)) =
                            (read_u16(data, 0, endian), read_u32(data, 4, endian))
                        {
                            let count = read_u16(data, 8, endian).unwrap_or(1);
                            list.entries.push(LeveledEntry { level, form_id: FormId(form_id), count });
                        }
                    }
                    _ => {}
                }
            }
        }

        out.push(list);
    }

    out
}
