//! `CELL`, `WRLD` reconstructors plus the "cells ← LAND coordinates"
//! cross-enrichment pass (spec §4.6).

use crate::primitives::{read_cstr, read_i32};
use crate::records::{dedup_by_form_id, iter_subrecords, reconstruct_simple, ReconstructionContext, StubFields};
use crate::scan_result::MainRecord;
use crate::types::{EditorId, FormId, Offset};

#[derive(Debug, Clone)]
pub struct Cell {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub grid: Option<(i32, i32)>,
    pub heightmap: Vec<f32>,
}

pub fn reconstruct_cells(ctx: &ReconstructionContext<'_>) -> Vec<Cell> {
    let mut buf = Vec::with_capacity(ctx.config.small_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"CELL" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut cell = Cell {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            full_name: stub.full_name,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            grid: None,
            heightmap: Vec::new(),
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            for (sig, data) in iter_subrecords(&buf, rec) {
                let endian = ctx.endian(rec);
                match &sig {
                    b"EDID" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            cell.editor_id = EditorId::new(s);
                        }
                    }
                    b"FULL" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            cell.full_name = Some(s);
                        }
                    }
                    b"XCLC" if data.len() >= 8 => {
                        if let (Ok(x), Ok(y)) = (read_i32(data, 0, endian), read_i32(data, 4, endian)) {
                            cell.grid = Some((x, y));
                        }
                    }
                    _ => {}
                }
            }
        }

        out.push(cell);
    }

    // Cross-enrichment: attach the scanned LAND heightmap whose coordinates
    // match the cell's grid (spec §4.6 "cells ← LAND coordinates").
    for cell in &mut out {
        let Some((x, y)) = cell.grid else { continue };
        if let Some(land) = ctx.scan.lands.iter().find(|l| l.cell_x == x && l.cell_y == y) {
            cell.heightmap = land.heightmap.iter().map(|bits| bits.0).collect();
        }
    }

    if let Some(runtime) = ctx.runtime {
        for land in runtime.read_all_runtime_land_data() {
            if let Some(cell) = out.iter_mut().find(|c| c.grid == Some((land.cell_x, land.cell_y))) {
                if cell.heightmap.is_empty() {
                    cell.heightmap = land.heightmap;
                }
            }
        }
    }

    dedup_by_form_id(out, |c| c.form_id)
}

#[derive(Debug, Clone)]
pub struct World {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
}

fn base(rec: &MainRecord, stub: StubFields) -> (FormId, Option<EditorId>, Option<String>, Offset, bool) {
    (rec.form_id, stub.editor_id, stub.full_name, rec.offset, rec.is_big_endian)
}

pub fn reconstruct_worlds(ctx: &ReconstructionContext<'_>) -> Vec<World> {
    reconstruct_simple(
        ctx,
        b"WRLD",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            World { form_id, editor_id, full_name, offset, is_big_endian }
        },
        |item, _rec, sig, data| match &sig {
            b"EDID" => {
                if let Ok(s) = read_cstr(data, 0) {
                    item.editor_id = EditorId::new(s);
                }
            }
            b"FULL" => {
                if let Ok(s) = read_cstr(data, 0) {
                    item.full_name = Some(s);
                }
            }
            _ => {}
        },
    )
}
