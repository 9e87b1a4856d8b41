//! Reconstruction policy knobs (spec §9 Open Questions, §5 Buffer
//! discipline, §4.7 step 1).
//!
//! Mirrors the `core-config` crate's `MarginConfig` pattern in the
//! reference corpus: a `serde`-deserializable struct with `#[serde(default)]`
//! fields so an embedding CLI can load overrides from a TOML file while
//! still getting the spec's literal defaults for anything it omits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Nearest-neighbor search radius, in bytes, used by scan-result-mode
    /// reconstructors to associate a `FullName` with a `MainRecord` when no
    /// accessor is available (spec §4.4, §9 Open Question: left at ±500 and
    /// flagged as a known source of occasional misattribution).
    pub full_name_window: u64,

    /// Scratch-buffer capacity for small records (spec §5).
    pub small_record_buffer_capacity: usize,
    /// Scratch-buffer capacity for notes/dialogue records (spec §5).
    pub dialogue_record_buffer_capacity: usize,
    /// Scratch-buffer capacity for NPC/container records (spec §5).
    pub large_record_buffer_capacity: usize,
    /// Scratch-buffer capacity for quest records (spec §5).
    pub quest_record_buffer_capacity: usize,

    /// Number of leading runtime-topic candidates sampled when probing for
    /// the DIAL/INFO runtime form-type byte (spec §4.7 step 1).
    pub topic_form_type_probe_sample: usize,
    /// Minimum successful reads within the probe sample required to accept
    /// a candidate form-type byte (spec §4.7 step 1).
    pub topic_form_type_probe_threshold: usize,
    /// Minimum number of runtime entries that must match a known DIAL
    /// FormID before that form-type byte is accepted outright (spec §4.7
    /// step 1, "best-candidate" branch).
    pub topic_form_type_match_threshold: usize,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            full_name_window: 500,
            small_record_buffer_capacity: 4 * 1024,
            dialogue_record_buffer_capacity: 8 * 1024,
            large_record_buffer_capacity: 16 * 1024,
            quest_record_buffer_capacity: 32 * 1024,
            topic_form_type_probe_sample: 20,
            topic_form_type_probe_threshold: 3,
            topic_form_type_match_threshold: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_literals() {
        let cfg = ReconstructionConfig::default();
        assert_eq!(cfg.full_name_window, 500);
        assert_eq!(cfg.topic_form_type_probe_sample, 20);
        assert_eq!(cfg.topic_form_type_match_threshold, 2);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults_when_deserializing() {
        let cfg: ReconstructionConfig = serde_json::from_str("{}").unwrap_or_default();
        assert_eq!(cfg, ReconstructionConfig::default());
    }
}
