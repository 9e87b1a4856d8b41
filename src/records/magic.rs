//! `ENCH`, `MGEF` reconstructors (SPEC_FULL supplement).

use crate::primitives::{read_cstr, read_f32, read_u32};
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
pub struct Enchantment {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub enchantment_type: Option<u32>,
    pub charge_amount: Option<u32>,
}

pub fn reconstruct_enchantments(ctx: &ReconstructionContext<'_>) -> Vec<Enchantment> {
    reconstruct_simple(
        ctx,
        b"ENCH",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Enchantment { form_id, editor_id, full_name, offset, is_big_endian, enchantment_type: None, charge_amount: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"ENIT" if data.len() >= 8 => {
                    item.enchantment_type = read_u32(data, 0, endian).ok();
                    item.charge_amount = read_u32(data, 4, endian).ok();
                }
                _ => edid_full!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct MagicEffect {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub base_cost: Option<f32>,
}

pub fn reconstruct_magic_effects(ctx: &ReconstructionContext<'_>) -> Vec<MagicEffect> {
    reconstruct_simple(
        ctx,
        b"MGEF",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            MagicEffect { form_id, editor_id, full_name, offset, is_big_endian, base_cost: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 4 => item.base_cost = read_f32(data, 0, endian).ok(),
                _ => edid_full!(item, &sig, data),
            }
        },
    )
}
