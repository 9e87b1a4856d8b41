//! Cross-enrichment passes that run after per-type reconstruction and need
//! more than one reconstructed list at once (spec §4.6). The single-list
//! passes (weapon ← projectile physics, cells ← LAND) live inline in their
//! owning `records::*` module; this one genuinely spans three lists so it
//! gets its own file.

use crate::records::projectile::Projectile;
use crate::records::weapons::{Ammo, AmmoDynamics, Weapon};
use crate::records::ReconstructionContext;
use crate::types::FormId;

/// *Ammo ← Weapon ← Projectile* (spec §4.6, §8 scenario S5): for each
/// weapon with both an `ammo_form_id` and a `projectile_form_id`, record
/// the implied ammo → projectile mapping. Ammo already carrying a
/// projectile is left untouched (ESM wins).
pub fn enrich_ammo_projectiles(
    ctx: &ReconstructionContext<'_>,
    weapons: &[Weapon],
    projectiles: &[Projectile],
    ammo: &mut [Ammo],
) {
    let _ = projectiles;
    for weapon in weapons {
        let (Some(ammo_form_id), Some(dynamics)) = (weapon.ammo_form_id, weapon.dynamics) else {
            continue;
        };
        let Some(projectile_form_id) = dynamics.projectile_form_id else { continue };

        let Some(target) = ammo.iter_mut().find(|a| a.form_id == ammo_form_id) else { continue };
        let already_has_projectile =
            target.dynamics.and_then(|d| d.projectile_form_id).is_some();
        if already_has_projectile {
            continue;
        }

        match &mut target.dynamics {
            Some(d) => d.projectile_form_id = Some(projectile_form_id),
            None => {
                target.dynamics = Some(AmmoDynamics {
                    projectiles_per_shot: 1,
                    projectile_form_id: Some(projectile_form_id),
                    weight: None,
                })
            }
        }

        target.projectile_model_path = resolve_model_path(ctx, projectile_form_id);
    }
}

/// Reads the `BSStringT` at dump-offset `+80` of the projectile's runtime
/// `tes_form_offset`, if both the runtime entry and the runtime reader are
/// available (spec §8 scenario S5, `src/capabilities.rs` `read_bsstringt`).
fn resolve_model_path(ctx: &ReconstructionContext<'_>, projectile_form_id: FormId) -> Option<String> {
    let runtime = ctx.runtime?;
    let tes_form_offset = ctx
        .scan
        .runtime_editor_ids
        .iter()
        .find(|rt| rt.form_id == projectile_form_id)
        .and_then(|rt| rt.tes_form_offset)?;
    runtime.read_bsstringt(tes_form_offset, 80)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{Accessor, Logger, RuntimeReader};
    use crate::config::ReconstructionConfig;
    use crate::correlation::CorrelationMap;
    use crate::records::weapons::WeaponDynamics;
    use crate::scan_result::{RuntimeEditorId, ScanResult};
    use crate::types::Offset;

    struct NullLogger;
    impl Logger for NullLogger {
        fn debug(&self, _m: &str) {}
    }
    struct FakeAccessor;
    impl Accessor for FakeAccessor {
        fn read_at(&self, _offset: u64, _dst: &mut [u8]) -> bool {
            false
        }
    }
    struct FakeRuntime;
    impl RuntimeReader for FakeRuntime {
        fn read_bsstringt(&self, file_offset: Offset, field_offset: Offset) -> Option<String> {
            assert_eq!(file_offset, 0xDEAD_0000);
            assert_eq!(field_offset, 80);
            Some("meshes/projectiles/p.nif".to_string())
        }
    }

    fn weapon(ammo_form_id: FormId, projectile_form_id: FormId) -> Weapon {
        Weapon {
            form_id: FormId(1),
            editor_id: None,
            full_name: None,
            offset: 0,
            is_big_endian: false,
            dynamics: Some(WeaponDynamics {
                animation_type: 0,
                speed: 0.0,
                reach: 0.0,
                projectile_form_id: Some(projectile_form_id),
                min_range: 0.0,
                max_range: 0.0,
                shots_per_sec: None,
                action_points: None,
            }),
            ammo_form_id: Some(ammo_form_id),
            projectile_data: None,
        }
    }

    fn bare_ammo(form_id: FormId) -> Ammo {
        Ammo {
            form_id,
            editor_id: None,
            full_name: None,
            offset: 0,
            is_big_endian: false,
            dynamics: None,
            projectile_model_path: None,
        }
    }

    #[test]
    fn attaches_implied_projectile_and_reads_model_path() {
        let mut scan = ScanResult::default();
        scan.runtime_editor_ids.push(RuntimeEditorId {
            form_id: FormId(0xAB),
            form_type: 0x33,
            editor_id: "ProjTest".into(),
            display_name: None,
            tes_form_offset: Some(0xDEAD_0000),
        });
        let correlation = CorrelationMap::build(&scan);
        let config = ReconstructionConfig::default();
        let logger = NullLogger;
        let accessor = FakeAccessor;
        let runtime = FakeRuntime;
        let ctx = ReconstructionContext {
            scan: &scan,
            correlation: &correlation,
            accessor: Some(&accessor),
            runtime: Some(&runtime),
            logger: &logger,
            config: &config,
        };

        let weapons = vec![weapon(FormId(5), FormId(0xAB))];
        let mut ammo = vec![bare_ammo(FormId(5))];

        enrich_ammo_projectiles(&ctx, &weapons, &[], &mut ammo);

        assert_eq!(ammo[0].dynamics.unwrap().projectile_form_id, Some(FormId(0xAB)));
        assert_eq!(ammo[0].projectile_model_path.as_deref(), Some("meshes/projectiles/p.nif"));
    }
}
