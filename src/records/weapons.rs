//! `WEAP` and `AMMO` reconstructors (spec §4.4, §6 "Representative byte
//! layouts"). Grouped together because spec §4.6 enriches them against each
//! other and against `PROJ` in the same cross-enrichment pass.

use crate::primitives::{read_cstr, read_f32, read_u32};
use crate::records::{dedup_by_form_id, iter_subrecords, ReconstructionContext};
use crate::types::{EditorId, Endianness, FormId, Offset};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeaponDynamics {
    pub animation_type: u32,
    pub speed: f32,
    pub reach: f32,
    pub projectile_form_id: Option<FormId>,
    pub min_range: f32,
    pub max_range: f32,
    pub shots_per_sec: Option<f32>,
    pub action_points: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub dynamics: Option<WeaponDynamics>,
    pub ammo_form_id: Option<FormId>,
    /// Filled by the weapon ← projectile physics enrichment pass (spec
    /// §4.6), not by the ESM track itself.
    pub projectile_data: Option<crate::records::projectile::ProjectilePhysics>,
}

pub fn reconstruct_weapons(ctx: &ReconstructionContext<'_>) -> Vec<Weapon> {
    let mut buf = Vec::with_capacity(ctx.config.large_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"WEAP" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut weapon = Weapon {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            full_name: stub.full_name,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            dynamics: None,
            ammo_form_id: None,
            projectile_data: None,
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            for (sig, data) in iter_subrecords(&buf, rec) {
                match &sig {
                    b"EDID" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            weapon.editor_id = EditorId::new(s);
                        }
                    }
                    b"FULL" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            weapon.full_name = Some(s);
                        }
                    }
                    b"ETYP" if data.len() >= 4 => {
                        weapon.ammo_form_id = read_form_id(data, endian);
                    }
                    b"DNAM" if data.len() >= 64 => {
                        weapon.dynamics = parse_weapon_dnam(data, endian);
                    }
                    _ => {}
                }
            }
        }

        out.push(weapon);
    }

    if let Some(runtime) = ctx.runtime {
        for weapon in &mut out {
            let Some(projectile_form_id) =
                weapon.dynamics.and_then(|d| d.projectile_form_id)
            else {
                continue;
            };
            if let Some(rt) = runtime.read_projectile_physics(projectile_form_id) {
                weapon.projectile_data = Some(crate::records::projectile::ProjectilePhysics {
                    gravity: rt.gravity,
                    speed: rt.speed,
                    range: rt.range,
                    explosion_form_id: rt.explosion_form_id,
                    sound_form_id: rt.sound_form_id,
                });
            }
        }
    }

    dedup_by_form_id(out, |w| w.form_id)
}

fn parse_weapon_dnam(data: &[u8], endian: Endianness) -> Option<WeaponDynamics> {
    let animation_type = read_u32(data, 0, endian).ok()?;
    let speed = read_f32(data, 4, endian).ok()?;
    let reach = read_f32(data, 8, endian).ok()?;
    let projectile_form_id = read_u32(data, 36, endian).ok().map(FormId).filter(|f| !f.is_null());
    let min_range = read_f32(data, 44, endian).ok()?;
    let max_range = read_f32(data, 48, endian).ok()?;
    let shots_per_sec = read_f32(data, 64, endian).ok();
    let action_points = read_f32(data, 68, endian).ok();
    Some(WeaponDynamics {
        animation_type,
        speed,
        reach,
        projectile_form_id,
        min_range,
        max_range,
        shots_per_sec,
        action_points,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AmmoDynamics {
    pub projectiles_per_shot: u32,
    pub projectile_form_id: Option<FormId>,
    pub weight: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Ammo {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub dynamics: Option<AmmoDynamics>,
    /// Resolved by reading `BSStringT` at the runtime projectile's `tes_form_offset + 0x50`
    /// (spec §4.6, §8 scenario S5). `None` until the enrichment pass runs.
    pub projectile_model_path: Option<String>,
}

pub fn reconstruct_ammo(ctx: &ReconstructionContext<'_>) -> Vec<Ammo> {
    let mut buf = Vec::with_capacity(ctx.config.small_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"AMMO" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut ammo = Ammo {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            full_name: stub.full_name,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            dynamics: None,
            projectile_model_path: None,
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            for (sig, data) in iter_subrecords(&buf, rec) {
                match &sig {
                    b"EDID" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            ammo.editor_id = EditorId::new(s);
                        }
                    }
                    b"FULL" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            ammo.full_name = Some(s);
                        }
                    }
                    b"DAT2" if data.len() >= 8 => {
                        ammo.dynamics = parse_ammo_dat2(data, endian);
                    }
                    _ => {}
                }
            }
        }

        out.push(ammo);
    }

    dedup_by_form_id(out, |a| a.form_id)
}

fn parse_ammo_dat2(data: &[u8], endian: Endianness) -> Option<AmmoDynamics> {
    let projectiles_per_shot = read_u32(data, 0, endian).ok()?;
    let projectile_form_id = read_u32(data, 4, endian).ok().map(FormId).filter(|f| !f.is_null());
    let weight = read_f32(data, 8, endian).ok();
    Some(AmmoDynamics { projectiles_per_shot, projectile_form_id, weight })
}

fn read_form_id(data: &[u8], endian: Endianness) -> Option<FormId> {
    read_u32(data, 0, endian).ok().map(FormId)
}
