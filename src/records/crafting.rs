//! `IMOD`, `RCPE`, `CHAL`, `REPU` reconstructors (SPEC_FULL supplement).

use crate::primitives::{read_cstr, read_i32, read_u32};
use crate::records::{reconstruct_simple, ReconstructionContext, StubFields};
use crate::scan_result::MainRecord;
use crate::types::{EditorId, FormId, Offset};

fn base(rec: &MainRecord, stub: StubFields) -> (FormId, Option<EditorId>, Option<String>, Offset, bool) {
    (rec.form_id, stub.editor_id, stub.full_name, rec.offset, rec.is_big_endian)
}

macro_rules! edid_full {
    ($item:expr, $sig:expr, $data:expr) => {
        match $sig {
            b"EDID" => {
                if let Ok(s) = read_cstr($data, 0) {
                    $item.editor_id = EditorId::new(s);
                }
            }
            b"FULL" => {
                if let Ok(s) = read_cstr($data, 0) {
                    $item.full_name = Some(s);
                }
            }
            _ => {}
        }
    };
}

#[derive(Debug, Clone)]
pub struct ItemMod {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub value: Option<u32>,
}

pub fn reconstruct_item_mods(ctx: &ReconstructionContext<'_>) -> Vec<ItemMod> {
    reconstruct_simple(
        ctx,
        b"IMOD",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            ItemMod { form_id, editor_id, full_name, offset, is_big_endian, value: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 4 => item.value = read_u32(data, 0, endian).ok(),
                _ => edid_full!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct Recipe {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub created_item_form_id: Option<FormId>,
}

pub fn reconstruct_recipes(ctx: &ReconstructionContext<'_>) -> Vec<Recipe> {
    reconstruct_simple(
        ctx,
        b"RCPE",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Recipe { form_id, editor_id, full_name, offset, is_big_endian, created_item_form_id: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"CNAM" if data.len() >= 4 => {
                    item.created_item_form_id = read_u32(data, 0, endian).ok().map(FormId);
                }
                _ => edid_full!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct Challenge {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub challenge_type: Option<u32>,
    pub target_value: Option<i32>,
}

pub fn reconstruct_challenges(ctx: &ReconstructionContext<'_>) -> Vec<Challenge> {
    reconstruct_simple(
        ctx,
        b"CHAL",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Challenge { form_id, editor_id, full_name, offset, is_big_endian, challenge_type: None, target_value: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 8 => {
                    item.challenge_type = read_u32(data, 0, endian).ok();
                    item.target_value = read_i32(data, 4, endian).ok();
                }
                _ => edid_full!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct Reputation {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
}

pub fn reconstruct_reputations(ctx: &ReconstructionContext<'_>) -> Vec<Reputation> {
    reconstruct_simple(
        ctx,
        b"REPU",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Reputation { form_id, editor_id, full_name, offset, is_big_endian }
        },
        |item, _rec, sig, data| edid_full!(item, &sig, data),
    )
}
