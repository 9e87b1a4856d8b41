//! Narrow external capabilities the core consumes (spec §6).
//!
//! These mirror the teacher crate's [`BitStreamVisitor`]-style callback
//! trait: a small interface the core drives, implemented by a collaborator
//! the core never needs to know the concrete type of. Every method that can
//! fail returns `Option`/`bool` rather than `Result` — per spec §4.9/§7,
//! any capability failure is absence, never a propagated error.
//!
//! [`BitStreamVisitor`]: https://docs.rs/llvm-bitcode (teacher crate)

use crate::types::{FormId, Offset};

/// Bounded, synchronous reads over the dump file.
///
/// > Out-of-bounds reads are a contract violation (the caller checks
/// > `offset + len <= file_size` first) — spec §6.
pub trait Accessor {
    /// Fills `dst` with the bytes at `offset`. Returns `false` if the read
    /// could not be satisfied in full (e.g. short file), in which case the
    /// caller falls back to scan-result mode for that record (spec §4.9).
    fn read_at(&self, offset: Offset, dst: &mut [u8]) -> bool;
}

/// Runtime C++ NPC (`TESNPC`) fields available only from the live object
/// graph, not from a serialized ESM record.
#[derive(Debug, Clone, Default)]
pub struct RuntimeNpc {
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub acbs: Option<crate::heuristics::Acbs>,
    pub faction_form_id: Option<FormId>,
    pub offset: Offset,
}

#[derive(Debug, Clone, Default)]
pub struct RuntimeWeapon {
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub ammo_form_id: Option<FormId>,
    pub projectile_form_id: Option<FormId>,
    pub offset: Offset,
}

#[derive(Debug, Clone, Default)]
pub struct RuntimeContainerItem {
    pub item_form_id: FormId,
    pub count: i32,
}

#[derive(Debug, Clone, Default)]
pub struct RuntimeContainer {
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub contents: Vec<RuntimeContainerItem>,
    pub offset: Offset,
}

/// A `(quest_form_id, info_entry)` pair yielded while walking
/// `TESTopic.m_listQuestInfo` (spec §4.7 step 3).
#[derive(Debug, Clone, Copy)]
pub struct QuestInfoEntry {
    pub form_id: FormId,
    pub virtual_address: u64,
}

#[derive(Debug, Clone)]
pub struct QuestInfoList {
    pub quest_form_id: FormId,
    pub infos: Vec<QuestInfoEntry>,
}

/// Runtime `TESTopicInfo` fields (spec §4.7 step 4).
#[derive(Debug, Clone, Default)]
pub struct RuntimeDialogueInfo {
    pub editor_id: Option<String>,
    pub prompt_text: Option<String>,
    pub info_index: Option<i32>,
    pub info_flags: Option<u32>,
    pub difficulty: Option<u32>,
    pub speaker_form_id: Option<FormId>,
    pub quest_form_id: Option<FormId>,
    pub offset: Offset,
}

/// Runtime `TESTopic` fields, keyed by the detected topic form-type byte
/// (spec §4.7 steps 1-2).
#[derive(Debug, Clone, Default)]
pub struct RuntimeDialogueTopic {
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub speaker_form_id: Option<FormId>,
    pub offset: Offset,
}

/// Runtime `BGSProjectile` physics fields (spec §4.6 "Weapon ← Projectile
/// physics").
#[derive(Debug, Clone, Default)]
pub struct RuntimeProjectilePhysics {
    pub gravity: f32,
    pub speed: f32,
    pub range: f32,
    pub explosion_form_id: Option<FormId>,
    pub sound_form_id: Option<FormId>,
}

/// A single cell's heightmap, read directly from the runtime LAND table
/// (spec §6 "read_all_runtime_land_data").
#[derive(Debug, Clone)]
pub struct RuntimeLandData {
    pub cell_x: i32,
    pub cell_y: i32,
    pub heightmap: Vec<f32>,
}

/// Catch-all runtime entry for record kinds that only need the common
/// `{editor_id, full_name, offset}` fields enriched, rather than a fully
/// typed payload (spec §6's "…" after the explicitly named methods).
#[derive(Debug, Clone, Default)]
pub struct RuntimeGenericRecord {
    pub form_id: FormId,
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub offset: Offset,
}

/// One typed method per record kind that supports runtime extraction, plus
/// the dialogue-graph and land-data bulk readers (spec §6).
///
/// Every method returns `None` on any failure; a failed read of one record
/// never aborts the merge pass it's part of (spec §4.9).
pub trait RuntimeReader {
    fn read_runtime_npc(&self, form_id: FormId) -> Option<RuntimeNpc> {
        let _ = form_id;
        None
    }
    fn read_runtime_weapon(&self, form_id: FormId) -> Option<RuntimeWeapon> {
        let _ = form_id;
        None
    }
    fn read_runtime_container(&self, form_id: FormId) -> Option<RuntimeContainer> {
        let _ = form_id;
        None
    }
    fn read_runtime_dialogue_info(&self, virtual_address: u64) -> Option<RuntimeDialogueInfo> {
        let _ = virtual_address;
        None
    }
    fn read_runtime_dialogue_topic(&self, form_id: FormId) -> Option<RuntimeDialogueTopic> {
        let _ = form_id;
        None
    }
    fn read_projectile_physics(&self, form_id: FormId) -> Option<RuntimeProjectilePhysics> {
        let _ = form_id;
        None
    }

    /// Entries for record kinds without a dedicated typed method above.
    fn read_runtime_by_form_type(&self, form_type: u8, form_id: FormId) -> Option<RuntimeGenericRecord> {
        let _ = (form_type, form_id);
        None
    }

    /// All runtime entries observed for a given form-type byte, used by
    /// the merge layer to find runtime-only records (spec §4.5 step 2) and
    /// by dialogue topic-type detection (spec §4.7 step 1).
    fn runtime_form_ids_for_type(&self, form_type: u8) -> Vec<FormId> {
        let _ = form_type;
        Vec::new()
    }

    /// Walks every runtime DIAL entry's `TESTopic.m_listQuestInfo` (spec
    /// §4.7 step 3).
    fn walk_topic_quest_info_list(&self, dial_form_id: FormId) -> Vec<QuestInfoList> {
        let _ = dial_form_id;
        Vec::new()
    }

    /// Reads a `BSStringT` at `field_offset` bytes into the struct located
    /// at `file_offset` (spec §6).
    fn read_bsstringt(&self, file_offset: Offset, field_offset: Offset) -> Option<String> {
        let _ = (file_offset, field_offset);
        None
    }

    /// Bulk read of every runtime LAND entry (spec §6).
    fn read_all_runtime_land_data(&self) -> Vec<RuntimeLandData> {
        Vec::new()
    }
}

/// A debug-level diagnostic sink (spec §4.9, §6).
pub trait Logger {
    fn debug(&self, message: &str);
}
