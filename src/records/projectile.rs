//! `PROJ`, `EXPL`, `MESG` reconstructors (spec §4.6 "Weapon ← Projectile
//! physics" supplies the runtime track merged into [`Projectile`]).

use crate::primitives::{read_cstr, read_f32};
use crate::records::{dedup_by_form_id, reconstruct_simple, ReconstructionContext, StubFields};
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

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectilePhysics {
    pub gravity: f32,
    pub speed: f32,
    pub range: f32,
    pub explosion_form_id: Option<FormId>,
    pub sound_form_id: Option<FormId>,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub physics: Option<ProjectilePhysics>,
}

pub fn reconstruct_projectiles(ctx: &ReconstructionContext<'_>) -> Vec<Projectile> {
    let mut projectiles = reconstruct_simple(
        ctx,
        b"PROJ",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Projectile { form_id, editor_id, full_name, offset, is_big_endian, physics: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 12 => {
                    let gravity = read_f32(data, 0, endian).ok().unwrap_or(0.0);
                    let speed = read_f32(data, 4, endian).ok().unwrap_or(0.0);
                    let range = read_f32(data, 8, endian).ok().unwrap_or(0.0);
                    item.physics = Some(ProjectilePhysics { gravity, speed, range, explosion_form_id: None, sound_form_id: None });
                }
                _ => edid_full!(item, &sig, data),
            }
        },
    );

    if let Some(runtime) = ctx.runtime {
        for proj in &mut projectiles {
            if proj.physics.is_none() {
                if let Some(rt) = runtime.read_projectile_physics(proj.form_id) {
                    proj.physics = Some(ProjectilePhysics {
                        gravity: rt.gravity,
                        speed: rt.speed,
                        range: rt.range,
                        explosion_form_id: rt.explosion_form_id,
                        sound_form_id: rt.sound_form_id,
                    });
                }
            }
        }
    }

    dedup_by_form_id(projectiles, |p| p.form_id)
}

#[derive(Debug, Clone)]
pub struct Explosion {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub force: Option<f32>,
    pub damage: Option<f32>,
}

pub fn reconstruct_explosions(ctx: &ReconstructionContext<'_>) -> Vec<Explosion> {
    reconstruct_simple(
        ctx,
        b"EXPL",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Explosion { form_id, editor_id, full_name, offset, is_big_endian, force: None, damage: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 8 => {
                    item.force = read_f32(data, 0, endian).ok();
                    item.damage = read_f32(data, 4, endian).ok();
                }
                _ => edid_full!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct Message {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub description: Option<String>,
}

pub fn reconstruct_messages(ctx: &ReconstructionContext<'_>) -> Vec<Message> {
    reconstruct_simple(
        ctx,
        b"MESG",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Message { form_id, editor_id, full_name, offset, is_big_endian, description: None }
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

