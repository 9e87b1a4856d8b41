//! FormID <-> EditorID correlation map (spec §4.3).

use std::collections::HashMap;

use crate::scan_result::ScanResult;
use crate::types::FormId;

/// Two-way index between FormIDs and editor IDs, built once at
/// construction and never mutated afterward.
#[derive(Debug, Clone, Default)]
pub struct CorrelationMap {
    form_id_to_editor_id: HashMap<FormId, String>,
    /// Lowercased editor id -> form id, for case-insensitive inverse
    /// lookup (spec §4.3 step 4).
    editor_id_to_form_id: HashMap<String, FormId>,
}

impl CorrelationMap {
    /// Builds the map from a `ScanResult` following spec §4.3 steps 1-4.
    #[must_use]
    pub fn build(scan: &ScanResult) -> Self {
        Self::build_with_overrides(scan, None)
    }

    /// `external_seed`, if provided, entirely replaces step 2 (the
    /// `EditorID`-to-nearest-preceding-`MainRecord` seeding) with an
    /// externally supplied `form_id -> editor_id` mapping (spec §4.3,
    /// "Externally supplied correlations").
    #[must_use]
    pub fn build_with_overrides(
        scan: &ScanResult,
        external_seed: Option<&HashMap<FormId, String>>,
    ) -> Self {
        // Step 1: index MainRecord by FormID, first occurrence wins. We
        // only need the (form_id, offset, data_size) tuples for step 2's
        // "closest preceding record" search.
        let mut first_main_record_offset: HashMap<FormId, (u64, u64)> = HashMap::new();
        for rec in &scan.main_records {
            first_main_record_offset
                .entry(rec.form_id)
                .or_insert((rec.offset, rec.offset + u64::from(rec.data_size) + 24));
        }

        let mut form_id_to_editor_id: HashMap<FormId, String> = HashMap::new();

        if let Some(seed) = external_seed {
            form_id_to_editor_id = seed.clone();
        } else {
            // Step 2: for each scanned EditorID, find the closest
            // preceding MainRecord whose data extent covers the EDID's
            // offset. First EDID wins per FormID.
            let mut ordered_records: Vec<(FormId, u64, u64)> = first_main_record_offset
                .iter()
                .map(|(&fid, &(start, end))| (fid, start, end))
                .collect();
            ordered_records.sort_by_key(|&(_, start, _)| start);

            for edid in &scan.editor_ids {
                let owner = if let Some(fid) = edid.form_id {
                    Some(fid)
                } else {
                    ordered_records
                        .iter()
                        .filter(|&&(_, start, end)| start <= edid.offset && edid.offset < end)
                        .max_by_key(|&&(_, start, _)| start)
                        .map(|&(fid, _, _)| fid)
                };
                if let Some(fid) = owner {
                    form_id_to_editor_id.entry(fid).or_insert_with(|| edid.name.clone());
                }
            }
        }

        // Step 3: merge RuntimeEditorID entries whose FormID is non-zero
        // and not yet mapped.
        for rt in &scan.runtime_editor_ids {
            if rt.form_id.is_null() {
                continue;
            }
            form_id_to_editor_id
                .entry(rt.form_id)
                .or_insert_with(|| rt.editor_id.clone());
        }

        // Step 4: invert, first FormID wins for a duplicated EditorID.
        let mut editor_id_to_form_id: HashMap<String, FormId> = HashMap::new();
        let mut by_form_id: Vec<(&FormId, &String)> = form_id_to_editor_id.iter().collect();
        by_form_id.sort_by_key(|(fid, _)| fid.0);
        for (fid, name) in by_form_id {
            editor_id_to_form_id.entry(name.to_lowercase()).or_insert(*fid);
        }

        Self { form_id_to_editor_id, editor_id_to_form_id }
    }

    #[must_use]
    pub fn editor_id_for(&self, form_id: FormId) -> Option<&str> {
        self.form_id_to_editor_id.get(&form_id).map(String::as_str)
    }

    #[must_use]
    pub fn form_id_for_editor_id(&self, editor_id: &str) -> Option<FormId> {
        self.editor_id_to_form_id.get(&editor_id.to_lowercase()).copied()
    }

    #[must_use]
    pub fn as_map(&self) -> &HashMap<FormId, String> {
        &self.form_id_to_editor_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_result::{EditorId as ScanEditorId, MainRecord};

    fn main_record(form_id: u32, offset: u64, data_size: u32) -> MainRecord {
        MainRecord {
            form_id: FormId(form_id),
            record_type: *b"NPC_",
            offset,
            data_size,
            is_big_endian: false,
        }
    }

    #[test]
    fn seeds_editor_id_from_nearest_preceding_main_record() {
        let mut scan = ScanResult::default();
        scan.main_records.push(main_record(0x100, 1000, 100));
        scan.editor_ids.push(ScanEditorId { form_id: None, name: "TestNpc".into(), offset: 1050 });
        let map = CorrelationMap::build(&scan);
        assert_eq!(map.editor_id_for(FormId(0x100)), Some("TestNpc"));
        assert_eq!(map.form_id_for_editor_id("testnpc"), Some(FormId(0x100)));
    }

    #[test]
    fn inverse_lookup_is_consistent_for_every_entry() {
        let mut scan = ScanResult::default();
        scan.main_records.push(main_record(1, 0, 50));
        scan.main_records.push(main_record(2, 100, 50));
        scan.editor_ids.push(ScanEditorId { form_id: None, name: "First".into(), offset: 10 });
        scan.editor_ids.push(ScanEditorId { form_id: None, name: "Second".into(), offset: 110 });
        let map = CorrelationMap::build(&scan);
        for (fid, name) in map.as_map() {
            assert_eq!(map.form_id_for_editor_id(name), Some(*fid));
        }
    }

    #[test]
    fn runtime_editor_id_fills_gap_not_already_mapped() {
        let mut scan = ScanResult::default();
        scan.runtime_editor_ids.push(crate::scan_result::RuntimeEditorId {
            form_id: FormId(5),
            form_type: 0x2A,
            editor_id: "RuntimeOnly".into(),
            display_name: None,
            tes_form_offset: None,
        });
        let map = CorrelationMap::build(&scan);
        assert_eq!(map.editor_id_for(FormId(5)), Some("RuntimeOnly"));
    }

    #[test]
    fn external_override_replaces_step_two_entirely() {
        let mut scan = ScanResult::default();
        scan.main_records.push(main_record(0x100, 1000, 100));
        scan.editor_ids.push(ScanEditorId { form_id: None, name: "WouldBeSeeded".into(), offset: 1050 });
        let mut overrides = HashMap::new();
        overrides.insert(FormId(0x100), "Overridden".to_string());
        let map = CorrelationMap::build_with_overrides(&scan, Some(&overrides));
        assert_eq!(map.editor_id_for(FormId(0x100)), Some("Overridden"));
    }
}
