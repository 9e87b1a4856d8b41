//! The immutable input to reconstruction (spec §3 "ScanResult").
//!
//! These types are produced by the raw scanner, an external collaborator
//! out of scope for this crate (spec §1). The core only ever borrows a
//! `ScanResult` for the duration of a single [`crate::orchestrator::reconstruct_all`]
//! call.

use crate::types::{FormId, Offset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainRecord {
    pub form_id: FormId,
    pub record_type: [u8; 4],
    pub offset: Offset,
    pub data_size: u32,
    pub is_big_endian: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorId {
    pub form_id: Option<FormId>,
    pub name: String,
    pub offset: Offset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    pub text: String,
    pub offset: Offset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Refr {
    pub header: MainRecord,
    pub base_form_id: FormId,
    pub position: Option<Position>,
    pub scale: f32,
    pub owner: Option<FormId>,
    pub is_map_marker: bool,
    pub marker_type: Option<u8>,
    pub marker_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Land {
    pub cell_x: i32,
    pub cell_y: i32,
    pub heightmap: Vec<f32_bits::F32Bits>,
}

/// `f32` doesn't implement `Eq`; heightmaps are compared/hashed by bit
/// pattern since they are opaque payload data here, never arithmetic.
pub mod f32_bits {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct F32Bits(pub f32);
    impl Eq for F32Bits {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    pub grid_x: i32,
    pub grid_y: i32,
    pub offset: Offset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseText {
    pub text: String,
    pub offset: Offset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorBase {
    pub form_id: FormId,
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
    pub offset: Offset,
    pub is_big_endian: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub condition_type: u8,
    pub operator: u8,
    pub comp_value: f32,
    pub function_index: u16,
    pub param1: u32,
    pub param2: u32,
    pub offset: Offset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEditorId {
    pub form_id: FormId,
    pub form_type: u8,
    pub editor_id: String,
    pub display_name: Option<String>,
    pub tes_form_offset: Option<Offset>,
}

/// Immutable aggregate input, borrowed read-only for a single
/// reconstruction pass (spec §3 "Ownership and lifetime").
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub main_records: Vec<MainRecord>,
    pub editor_ids: Vec<EditorId>,
    pub full_names: Vec<FullName>,
    pub refrs: Vec<Refr>,
    pub lands: Vec<Land>,
    pub cell_grids: Vec<CellGrid>,
    pub response_texts: Vec<ResponseText>,
    pub actor_bases: Vec<ActorBase>,
    pub conditions: Vec<Condition>,
    pub runtime_editor_ids: Vec<RuntimeEditorId>,
}

impl ScanResult {
    /// Finds the [`FullName`] whose offset is closest to `offset`, within
    /// `window` bytes on either side (spec §4.4 "nearest FULL within
    /// ±500 bytes"; the window is a policy decision, see
    /// `ReconstructionConfig::full_name_window`).
    #[must_use]
    pub fn nearest_full_name(&self, offset: Offset, window: u64) -> Option<&str> {
        self.full_names
            .iter()
            .filter(|fname| fname.offset.abs_diff(offset) <= window)
            .min_by_key(|fname| fname.offset.abs_diff(offset))
            .map(|fname| fname.text.as_str())
    }
}
