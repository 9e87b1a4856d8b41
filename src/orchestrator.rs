//! Top-level entry point (spec §2 "Pipeline", §4.9 "Never panic"): runs
//! every per-type reconstructor, the cross-enrichment passes, and the
//! dialogue graph builder, then tallies whatever it couldn't place.

use crate::capabilities::{Accessor, Logger, RuntimeReader};
use crate::config::ReconstructionConfig;
use crate::correlation::CorrelationMap;
use crate::dialogue;
use crate::enrichment::enrich_ammo_projectiles;
use crate::records::{actors, crafting, globals, items, leveled, magic, npc, projectile, qust, weapons, world, RecordKind, ReconstructionContext};
use crate::records::{dial, info};
use crate::result::SemanticReconstructionResult;
use crate::scan_result::ScanResult;

/// Runs the full reconstruction pipeline over `scan` (spec §2, §4 through
/// §4.9). `accessor` and `runtime` are optional: without either, every
/// reconstructor falls back to scan-result mode and the cross-enrichment
/// passes become no-ops, but the call still returns a complete
/// [`SemanticReconstructionResult`] rather than an error (spec §4.9).
#[must_use]
pub fn reconstruct_all(
    scan: &ScanResult,
    accessor: Option<&dyn Accessor>,
    runtime: Option<&dyn RuntimeReader>,
    logger: &dyn Logger,
    config: &ReconstructionConfig,
) -> SemanticReconstructionResult {
    let correlation = CorrelationMap::build(scan);
    let ctx = ReconstructionContext { scan, correlation: &correlation, accessor, runtime, logger, config };

    let mut result = SemanticReconstructionResult::default();

    result.npcs = npc::reconstruct(&ctx);
    result.quests = qust::reconstruct(&ctx);
    let dialogues = info::reconstruct(&ctx);
    let topics = dial::reconstruct(&ctx);

    result.weapons = weapons::reconstruct_weapons(&ctx);
    result.ammo = weapons::reconstruct_ammo(&ctx);
    result.projectiles = projectile::reconstruct_projectiles(&ctx);
    result.explosions = projectile::reconstruct_explosions(&ctx);
    result.messages = projectile::reconstruct_messages(&ctx);

    result.armor = items::reconstruct_armor(&ctx);
    result.alchemy = items::reconstruct_alchemy(&ctx);
    result.misc = items::reconstruct_misc(&ctx);
    result.key_items = items::reconstruct_key_item(&ctx);
    result.containers = items::reconstruct_container(&ctx);
    result.books = items::reconstruct_book(&ctx);
    result.terminals = items::reconstruct_terminal(&ctx);
    result.notes = items::reconstruct_note(&ctx);

    result.perks = actors::reconstruct_perks(&ctx);
    result.spells = actors::reconstruct_spells(&ctx);
    result.races = actors::reconstruct_races(&ctx);
    result.creatures = actors::reconstruct_creatures(&ctx);
    result.factions = actors::reconstruct_factions(&ctx);
    result.classes = actors::reconstruct_classes(&ctx);

    result.item_mods = crafting::reconstruct_item_mods(&ctx);
    result.recipes = crafting::reconstruct_recipes(&ctx);
    result.challenges = crafting::reconstruct_challenges(&ctx);
    result.reputations = crafting::reconstruct_reputations(&ctx);

    result.enchantments = magic::reconstruct_enchantments(&ctx);
    result.magic_effects = magic::reconstruct_magic_effects(&ctx);

    result.leveled_lists = leveled::reconstruct(&ctx);

    result.game_settings = globals::reconstruct_game_settings(&ctx);
    result.globals = globals::reconstruct_globals(&ctx);

    result.cells = world::reconstruct_cells(&ctx);
    result.worlds = world::reconstruct_worlds(&ctx);

    // Cross-enrichment (spec §4.6): ammo <- weapon <- projectile. The
    // weapon <- projectile physics pass and cells <- LAND pass already ran
    // inline inside their own reconstructors above.
    enrich_ammo_projectiles(&ctx, &result.weapons, &result.projectiles, &mut result.ammo);

    // Dialogue graph (spec §4.7): consumes and folds the ESM-plus-runtime
    // merged dialogues/topics into a quest-rooted tree. The flat lists are
    // kept too, for callers that want to look a single INFO/DIAL up by
    // FormID without walking the tree.
    result.dialogue_tree = dialogue::build(&ctx, dialogues.clone(), topics.clone(), &result.quests);
    result.dialogues = dialogues;
    result.topics = topics;

    result.form_id_to_editor_id = correlation.as_map().clone();

    let mut total = 0usize;
    let mut unreconstructed = std::collections::HashMap::new();
    for rec in &scan.main_records {
        total += 1;
        if RecordKind::from_signature(&rec.record_type).is_none() {
            *unreconstructed.entry(rec.record_type).or_insert(0usize) += 1;
        }
    }
    result.total_records_processed = total;
    result.unreconstructed_type_counts = unreconstructed;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NullLogger;
    use crate::scan_result::MainRecord;
    use crate::types::FormId;

    #[test]
    fn never_panics_with_no_accessor_or_runtime_and_tallies_unknown_signatures() {
        let mut scan = ScanResult::default();
        scan.main_records.push(MainRecord {
            form_id: FormId(1),
            record_type: *b"NPC_",
            offset: 0,
            data_size: 0,
            is_big_endian: false,
        });
        scan.main_records.push(MainRecord {
            form_id: FormId(2),
            record_type: *b"XXXX",
            offset: 24,
            data_size: 0,
            is_big_endian: false,
        });

        let logger = NullLogger;
        let config = ReconstructionConfig::default();
        let result = reconstruct_all(&scan, None, None, &logger, &config);

        assert_eq!(result.npcs.len(), 1);
        assert_eq!(result.total_records_processed, 2);
        assert_eq!(result.unreconstructed_type_counts.get(b"XXXX"), Some(&1));
    }
}
