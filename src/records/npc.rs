//! `NPC_` reconstructor (spec §4.4 "NPC_").

use crate::heuristics::acbs::parse_acbs;
use crate::primitives::{read_i32, read_u32};
use crate::records::{dedup_by_form_id, iter_subrecords, ReconstructionContext};
use crate::scan_result::MainRecord;
use crate::types::{EditorId, Endianness, FormId, Offset};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorStats {
    pub flags: u32,
    pub fatigue_base: u16,
    pub barter_gold: u16,
    pub level: i16,
    pub calc_min: u16,
    pub calc_max: u16,
    pub speed_multiplier: u16,
    pub karma: f32,
    pub disposition: i16,
    pub template_flags: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionMembership {
    pub faction_form_id: FormId,
    pub rank: i8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryEntry {
    pub item_form_id: FormId,
    pub count: i32,
}

#[derive(Debug, Clone)]
pub struct Npc {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,

    pub stats: Option<ActorStats>,
    pub race_form_id: Option<FormId>,
    pub script_form_id: Option<FormId>,
    pub class_form_id: Option<FormId>,
    pub death_item_form_id: Option<FormId>,
    pub voice_type_form_id: Option<FormId>,
    pub template_form_id: Option<FormId>,
    pub factions: Vec<FactionMembership>,
    pub spells: Vec<FormId>,
    pub inventory: Vec<InventoryEntry>,
    pub packages: Vec<FormId>,
}

/// Reads the `NPC_` ESM track for every `MainRecord` of that kind, then
/// merges the runtime `TESNPC` track on top (spec §4.5, form-type `0x2A`).
pub fn reconstruct(ctx: &ReconstructionContext<'_>) -> Vec<Npc> {
    let mut buf = Vec::with_capacity(ctx.config.large_record_buffer_capacity);
    let mut esm_npcs = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"NPC_" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut npc = Npc {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            full_name: stub.full_name,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            stats: None,
            race_form_id: None,
            script_form_id: None,
            class_form_id: None,
            death_item_form_id: None,
            voice_type_form_id: None,
            template_form_id: None,
            factions: Vec::new(),
            spells: Vec::new(),
            inventory: Vec::new(),
            packages: Vec::new(),
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            for (sig, data) in iter_subrecords(&buf, rec) {
                apply_subrecord(&mut npc, &sig, data, endian);
            }
        }
        esm_npcs.push(npc);
    }

    let esm_form_ids: std::collections::HashSet<FormId> =
        esm_npcs.iter().map(|n| n.form_id).collect();

    let mut merged = esm_npcs;
    if let Some(runtime) = ctx.runtime {
        let runtime_ids = runtime.runtime_form_ids_for_type(
            crate::form_type::RuntimeFormType::NonPlayerCharacter.byte(),
        );
        let mut appended = 0usize;
        for form_id in runtime_ids {
            let Some(rt) = runtime.read_runtime_npc(form_id) else { continue };
            if esm_form_ids.contains(&form_id) {
                if let Some(npc) = merged.iter_mut().find(|n| n.form_id == form_id) {
                    enrich_from_runtime(npc, &rt);
                }
            } else {
                merged.push(npc_from_runtime(form_id, &rt));
                appended += 1;
            }
        }
        ctx.log(format!("npc: merged runtime track, {appended} runtime-only entries appended"));
    }

    dedup_by_form_id(merged, |n| n.form_id)
}

fn apply_subrecord(npc: &mut Npc, sig: &[u8; 4], data: &[u8], endian: Endianness) {
    match sig {
        b"EDID" => {
            if let Ok(s) = crate::primitives::read_cstr(data, 0) {
                npc.editor_id = EditorId::new(s);
            }
        }
        b"FULL" => {
            if let Ok(s) = crate::primitives::read_cstr(data, 0) {
                npc.full_name = Some(s);
            }
        }
        b"ACBS" => {
            let mut window = b"ACBS".to_vec();
            window.extend_from_slice(&24u16.to_le_bytes());
            window.extend_from_slice(data);
            if data.len() >= 24 {
                if let Some(parsed) = parse_acbs(&window) {
                    npc.stats = Some(ActorStats {
                        flags: parsed.flags,
                        fatigue_base: parsed.fatigue_base,
                        barter_gold: parsed.barter_gold,
                        level: parsed.level,
                        calc_min: parsed.calc_min,
                        calc_max: parsed.calc_max,
                        speed_multiplier: parsed.speed_multiplier,
                        karma: parsed.karma,
                        disposition: parsed.disposition,
                        template_flags: parsed.template_flags,
                    });
                }
            }
        }
        b"RNAM" if data.len() >= 4 => npc.race_form_id = read_form_id(data, endian),
        b"SCRI" if data.len() >= 4 => npc.script_form_id = read_form_id(data, endian),
        b"CNAM" if data.len() >= 4 => npc.class_form_id = read_form_id(data, endian),
        b"INAM" if data.len() >= 4 => npc.death_item_form_id = read_form_id(data, endian),
        b"VTCK" if data.len() >= 4 => npc.voice_type_form_id = read_form_id(data, endian),
        b"TPLT" if data.len() >= 4 => npc.template_form_id = read_form_id(data, endian),
        b"SNAM" if data.len() >= 5 => {
            if let Ok(faction) = read_u32(data, 0, endian) {
                let rank = data[4] as i8;
                npc.factions.push(FactionMembership { faction_form_id: FormId(faction), rank });
            }
        }
        b"SPLO" if data.len() >= 4 => {
            if let Some(fid) = read_form_id(data, endian) {
                npc.spells.push(fid);
            }
        }
        b"CNTO" if data.len() >= 8 => {
            if let (Ok(item), Ok(count)) =
                (read_u32(data, 0, endian), read_i32(data, 4, endian))
            {
                npc.inventory.push(InventoryEntry { item_form_id: FormId(item), count });
            }
        }
        b"PKID" if data.len() >= 4 => {
            if let Some(fid) = read_form_id(data, endian) {
                npc.packages.push(fid);
            }
        }
        _ => {}
    }
}

fn read_form_id(data: &[u8], endian: Endianness) -> Option<FormId> {
    read_u32(data, 0, endian).ok().map(FormId)
}

/// ESM wins any field it populated; runtime fills only the gaps (spec
/// §4.5 step 2).
fn enrich_from_runtime(npc: &mut Npc, rt: &crate::capabilities::RuntimeNpc) {
    if npc.editor_id.is_none() {
        npc.editor_id = rt.editor_id.clone().and_then(EditorId::new);
    }
    if npc.full_name.is_none() {
        npc.full_name = rt.full_name.clone();
    }
    if npc.stats.is_none() {
        if let Some(acbs) = rt.acbs {
            npc.stats = Some(ActorStats {
                flags: acbs.flags,
                fatigue_base: acbs.fatigue_base,
                barter_gold: acbs.barter_gold,
                level: acbs.level,
                calc_min: acbs.calc_min,
                calc_max: acbs.calc_max,
                speed_multiplier: acbs.speed_multiplier,
                karma: acbs.karma,
                disposition: acbs.disposition,
                template_flags: acbs.template_flags,
            });
        }
    }
    if let Some(faction) = rt.faction_form_id {
        if !npc.factions.iter().any(|f| f.faction_form_id == faction) {
            npc.factions.push(FactionMembership { faction_form_id: faction, rank: 0 });
        }
    }
}

fn npc_from_runtime(form_id: FormId, rt: &crate::capabilities::RuntimeNpc) -> Npc {
    Npc {
        form_id,
        editor_id: rt.editor_id.clone().and_then(EditorId::new),
        full_name: rt.full_name.clone(),
        offset: rt.offset,
        is_big_endian: true,
        stats: rt.acbs.map(|acbs| ActorStats {
            flags: acbs.flags,
            fatigue_base: acbs.fatigue_base,
            barter_gold: acbs.barter_gold,
            level: acbs.level,
            calc_min: acbs.calc_min,
            calc_max: acbs.calc_max,
            speed_multiplier: acbs.speed_multiplier,
            karma: acbs.karma,
            disposition: acbs.disposition,
            template_flags: acbs.template_flags,
        }),
        race_form_id: None,
        script_form_id: None,
        class_form_id: None,
        death_item_form_id: None,
        voice_type_form_id: None,
        template_form_id: None,
        factions: rt
            .faction_form_id
            .map(|f| vec![FactionMembership { faction_form_id: f, rank: 0 }])
            .unwrap_or_default(),
        spells: Vec::new(),
        inventory: Vec::new(),
        packages: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{Logger, RuntimeReader};
    use crate::config::ReconstructionConfig;
    use crate::correlation::CorrelationMap;
    use crate::scan_result::ScanResult;

    struct NullLogger;
    impl Logger for NullLogger {
        fn debug(&self, _m: &str) {}
    }
    struct NoRuntime;
    impl RuntimeReader for NoRuntime {}

    fn le_subrecord(sig: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = sig.to_vec();
        out.extend_from_slice(&(data.len() as u16).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    struct FakeAccessor {
        bytes: Vec<u8>,
    }
    impl crate::capabilities::Accessor for FakeAccessor {
        fn read_at(&self, offset: u64, dst: &mut [u8]) -> bool {
            let start = offset as usize;
            if start + dst.len() > self.bytes.len() {
                return false;
            }
            dst.copy_from_slice(&self.bytes[start..start + dst.len()]);
            true
        }
    }

    #[test]
    fn reconstructs_npc_fields_from_subrecords() {
        let mut body = le_subrecord(b"EDID", b"TestGhoul\0");
        body.extend(le_subrecord(b"FULL", b"Test Ghoul\0"));
        body.extend(le_subrecord(b"RNAM", &100u32.to_le_bytes()));
        body.extend(le_subrecord(b"CNTO", &{
            let mut v = 5u32.to_le_bytes().to_vec();
            v.extend_from_slice(&3i32.to_le_bytes());
            v
        }));

        let mut dump = vec![0u8; 24];
        dump.extend_from_slice(&body);

        let accessor = FakeAccessor { bytes: dump };
        let mut scan = ScanResult::default();
        scan.main_records.push(MainRecord {
            form_id: FormId(0x42),
            record_type: *b"NPC_",
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

        let npcs = reconstruct(&ctx);
        assert_eq!(npcs.len(), 1);
        let npc = &npcs[0];
        assert_eq!(npc.editor_id.as_ref().unwrap().as_str(), "TestGhoul");
        assert_eq!(npc.full_name.as_deref(), Some("Test Ghoul"));
        assert_eq!(npc.race_form_id, Some(FormId(100)));
        assert_eq!(npc.inventory, vec![InventoryEntry { item_form_id: FormId(5), count: 3 }]);
    }

    #[test]
    fn falls_back_to_stub_without_accessor() {
        let mut scan = ScanResult::default();
        scan.main_records.push(MainRecord {
            form_id: FormId(1),
            record_type: *b"NPC_",
            offset: 0,
            data_size: 40,
            is_big_endian: false,
        });
        let correlation = CorrelationMap::build(&scan);
        let config = ReconstructionConfig::default();
        let logger = NullLogger;
        let ctx = ReconstructionContext {
            scan: &scan,
            correlation: &correlation,
            accessor: None,
            runtime: None,
            logger: &logger,
            config: &config,
        };
        let npcs = reconstruct(&ctx);
        assert_eq!(npcs.len(), 1);
        assert!(npcs[0].stats.is_none());
    }
}
