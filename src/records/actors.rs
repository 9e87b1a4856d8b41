//! `PERK`, `SPEL`, `RACE`, `CREA`, `FACT`, `CLAS` reconstructors.
//! Grouped as the "actor-adjacent" simple kinds (SPEC_FULL supplement).

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
pub struct Perk {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub description: Option<String>,
}

pub fn reconstruct_perks(ctx: &ReconstructionContext<'_>) -> Vec<Perk> {
    reconstruct_simple(
        ctx,
        b"PERK",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Perk { form_id, editor_id, full_name, offset, is_big_endian, description: None }
        },
        |item, _rec, sig, data| match &sig {
            b"DESC" => {
                if let Ok(s) = read_cstr(data, 0) {
                    item.description = Some(s);
                }
            }
            _ => edid_full!(item, &sig, data),
        },
    )
}

#[derive(Debug, Clone)]
pub struct Spell {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub spell_type: Option<u32>,
    pub base_cost: Option<u32>,
}

pub fn reconstruct_spells(ctx: &ReconstructionContext<'_>) -> Vec<Spell> {
    reconstruct_simple(
        ctx,
        b"SPEL",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Spell { form_id, editor_id, full_name, offset, is_big_endian, spell_type: None, base_cost: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"SPIT" if data.len() >= 8 => {
                    item.spell_type = read_u32(data, 0, endian).ok();
                    item.base_cost = read_u32(data, 4, endian).ok();
                }
                _ => edid_full!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct Race {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
}

pub fn reconstruct_races(ctx: &ReconstructionContext<'_>) -> Vec<Race> {
    reconstruct_simple(
        ctx,
        b"RACE",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Race { form_id, editor_id, full_name, offset, is_big_endian }
        },
        |item, _rec, sig, data| edid_full!(item, &sig, data),
    )
}

#[derive(Debug, Clone)]
pub struct Creature {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub health: Option<u32>,
    pub combat_skill: Option<u8>,
}

pub fn reconstruct_creatures(ctx: &ReconstructionContext<'_>) -> Vec<Creature> {
    let mut creatures = reconstruct_simple(
        ctx,
        b"CREA",
        ctx.config.large_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Creature { form_id, editor_id, full_name, offset, is_big_endian, health: None, combat_skill: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 5 => {
                    item.health = read_u32(data, 0, endian).ok();
                    item.combat_skill = data.get(4).copied();
                }
                _ => edid_full!(item, &sig, data),
            }
        },
    );

    if let Some(runtime) = ctx.runtime {
        for creature in &mut creatures {
            if creature.editor_id.is_none() || creature.full_name.is_none() {
                if let Some(rt) = runtime
                    .read_runtime_by_form_type(crate::form_type::RuntimeFormType::Creature.byte(), creature.form_id)
                {
                    if creature.editor_id.is_none() {
                        creature.editor_id = rt.editor_id.and_then(EditorId::new);
                    }
                    if creature.full_name.is_none() {
                        creature.full_name = rt.full_name;
                    }
                }
            }
        }
    }

    creatures
}

#[derive(Debug, Clone)]
pub struct Faction {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
}

pub fn reconstruct_factions(ctx: &ReconstructionContext<'_>) -> Vec<Faction> {
    reconstruct_simple(
        ctx,
        b"FACT",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Faction { form_id, editor_id, full_name, offset, is_big_endian }
        },
        |item, _rec, sig, data| edid_full!(item, &sig, data),
    )
}

#[derive(Debug, Clone)]
pub struct Class {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub tag_skill_bonus: Option<f32>,
}

pub fn reconstruct_classes(ctx: &ReconstructionContext<'_>) -> Vec<Class> {
    reconstruct_simple(
        ctx,
        b"CLAS",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Class { form_id, editor_id, full_name, offset, is_big_endian, tag_skill_bonus: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 4 => item.tag_skill_bonus = read_f32(data, 0, endian).ok(),
                _ => edid_full!(item, &sig, data),
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{Accessor, Logger, RuntimeReader};
    use crate::config::ReconstructionConfig;
    use crate::correlation::CorrelationMap;
    use crate::scan_result::ScanResult;

    struct NullLogger;
    impl Logger for NullLogger {
        fn debug(&self, _m: &str) {}
    }
    struct NoRuntime;
    impl RuntimeReader for NoRuntime {}
    struct FakeAccessor {
        bytes: Vec<u8>,
    }
    impl Accessor for FakeAccessor {
        fn read_at(&self, offset: u64, dst: &mut [u8]) -> bool {
            let start = offset as usize;
            if start + dst.len() > self.bytes.len() {
                return false;
            }
            dst.copy_from_slice(&self.bytes[start..start + dst.len()]);
            true
        }
    }
    fn le_subrecord(sig: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = sig.to_vec();
        out.extend_from_slice(&(data.len() as u16).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn spell_reads_spit_fields() {
        let mut spit = 0u32.to_le_bytes().to_vec();
        spit.extend_from_slice(&25u32.to_le_bytes());
        let body = le_subrecord(b"SPIT", &spit);
        let mut dump = vec![0u8; 24];
        dump.extend_from_slice(&body);
        let accessor = FakeAccessor { bytes: dump };
        let mut scan = ScanResult::default();
        scan.main_records.push(crate::scan_result::MainRecord {
            form_id: FormId(1),
            record_type: *b"SPEL",
            offset: 0,
            data_size: body.len() as u32,
            is_big_endian: false,
        });
        let correlation = CorrelationMap::build(&scan);
        let config = ReconstructionConfig::default();
        let logger = NullLogger;
        let no_runtime = NoRuntime;
        let ctx = ReconstructionContext {
            scan: &scan,
            correlation: &correlation,
            accessor: Some(&accessor),
            runtime: Some(&no_runtime),
            logger: &logger,
            config: &config,
        };
        let spells = reconstruct_spells(&ctx);
        assert_eq!(spells[0].spell_type, Some(0));
        assert_eq!(spells[0].base_cost, Some(25));
    }
}
