//! Simple inventory-item record kinds: `ARMO`, `ALCH`, `MISC`, `KEYM`,
//! `CONT`, `BOOK`, `TERM`, `NOTE` (spec §4.4's "explicit table" kinds,
//! SPEC_FULL supplement). Grouped because each is a thin `EDID`/`FULL`
//! plus one or two value subrecords — the same shape `reconstruct_simple`
//! (`records/mod.rs`) was built to cover.

use crate::primitives::{read_cstr, read_f32, read_i32, read_u32};
use crate::records::{reconstruct_simple, ReconstructionContext, StubFields};
use crate::scan_result::MainRecord;
use crate::types::{EditorId, FormId, Offset};

fn base(rec: &MainRecord, stub: StubFields) -> (FormId, Option<EditorId>, Option<String>, Offset, bool) {
    (rec.form_id, stub.editor_id, stub.full_name, rec.offset, rec.is_big_endian)
}

macro_rules! edid_full_subrecord {
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

#[derive(Debug, Clone)]
pub struct Armor {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub value: Option<u32>,
    pub health: Option<u32>,
    pub damage_resistance: Option<f32>,
}

pub fn reconstruct_armor(ctx: &ReconstructionContext<'_>) -> Vec<Armor> {
    reconstruct_simple(
        ctx,
        b"ARMO",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Armor { form_id, editor_id, full_name, offset, is_big_endian, value: None, health: None, damage_resistance: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 8 => {
                    item.value = read_u32(data, 0, endian).ok();
                    item.health = read_u32(data, 4, endian).ok();
                }
                b"DNAM" if data.len() >= 4 => {
                    item.damage_resistance = read_f32(data, 0, endian).ok();
                }
                _ => edid_full_subrecord!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct Alchemy {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub value: Option<i32>,
}

pub fn reconstruct_alchemy(ctx: &ReconstructionContext<'_>) -> Vec<Alchemy> {
    reconstruct_simple(
        ctx,
        b"ALCH",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Alchemy { form_id, editor_id, full_name, offset, is_big_endian, value: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"ENIT" if data.len() >= 4 => item.value = read_i32(data, 0, endian).ok(),
                _ => edid_full_subrecord!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct Misc {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub value: Option<u32>,
    pub weight: Option<f32>,
}

pub fn reconstruct_misc(ctx: &ReconstructionContext<'_>) -> Vec<Misc> {
    reconstruct_simple(
        ctx,
        b"MISC",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Misc { form_id, editor_id, full_name, offset, is_big_endian, value: None, weight: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 8 => {
                    item.value = read_u32(data, 0, endian).ok();
                    item.weight = read_f32(data, 4, endian).ok();
                }
                _ => edid_full_subrecord!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct KeyItem {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub value: Option<u32>,
}

pub fn reconstruct_key_item(ctx: &ReconstructionContext<'_>) -> Vec<KeyItem> {
    reconstruct_simple(
        ctx,
        b"KEYM",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            KeyItem { form_id, editor_id, full_name, offset, is_big_endian, value: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 4 => item.value = read_u32(data, 0, endian).ok(),
                _ => edid_full_subrecord!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerItem {
    pub item_form_id: FormId,
    pub count: i32,
}

#[derive(Debug, Clone)]
pub struct Container {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub contents: Vec<ContainerItem>,
}

pub fn reconstruct_container(ctx: &ReconstructionContext<'_>) -> Vec<Container> {
    let mut containers = reconstruct_simple(
        ctx,
        b"CONT",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Container { form_id, editor_id, full_name, offset, is_big_endian, contents: Vec::new() }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"CNTO" if data.len() >= 8 => {
                    if let (Ok(fid), Ok(count)) = (read_u32(data, 0, endian), read_i32(data, 4, endian)) {
                        item.contents.push(ContainerItem { item_form_id: FormId(fid), count });
                    }
                }
                _ => edid_full_subrecord!(item, &sig, data),
            }
        },
    );

    if let Some(runtime) = ctx.runtime {
        for container in &mut containers {
            if let Some(rt) = runtime.read_runtime_container(container.form_id) {
                if container.contents.is_empty() {
                    container.contents = rt
                        .contents
                        .into_iter()
                        .map(|c| ContainerItem { item_form_id: c.item_form_id, count: c.count })
                        .collect();
                }
            }
        }
    }

    containers
}

#[derive(Debug, Clone)]
pub struct Book {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub value: Option<u32>,
    pub teaches_skill: Option<i8>,
}

pub fn reconstruct_book(ctx: &ReconstructionContext<'_>) -> Vec<Book> {
    reconstruct_simple(
        ctx,
        b"BOOK",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Book { form_id, editor_id, full_name, offset, is_big_endian, value: None, teaches_skill: None }
        },
        |item, rec, sig, data| {
            let endian = ctx.endian(rec);
            match &sig {
                b"DATA" if data.len() >= 9 => {
                    item.teaches_skill = data.get(1).map(|&b| b as i8);
                    item.value = read_u32(data, 4, endian).ok();
                }
                _ => edid_full_subrecord!(item, &sig, data),
            }
        },
    )
}

#[derive(Debug, Clone)]
pub struct Terminal {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub description: Option<String>,
}

pub fn reconstruct_terminal(ctx: &ReconstructionContext<'_>) -> Vec<Terminal> {
    reconstruct_simple(
        ctx,
        b"TERM",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Terminal { form_id, editor_id, full_name, offset, is_big_endian, description: None }
        },
        |item, _rec, sig, data| match &sig {
            b"DESC" => {
                if let Ok(s) = read_cstr(data, 0) {
                    item.description = Some(s);
                }
            }
            _ => edid_full_subrecord!(item, &sig, data),
        },
    )
}

#[derive(Debug, Clone)]
pub struct Note {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub text: Option<String>,
}

pub fn reconstruct_note(ctx: &ReconstructionContext<'_>) -> Vec<Note> {
    reconstruct_simple(
        ctx,
        b"NOTE",
        ctx.config.small_record_buffer_capacity,
        |rec, stub| {
            let (form_id, editor_id, full_name, offset, is_big_endian) = base(rec, stub);
            Note { form_id, editor_id, full_name, offset, is_big_endian, text: None }
        },
        |item, _rec, sig, data| match &sig {
            b"DESC" => {
                if let Ok(s) = read_cstr(data, 0) {
                    item.text = Some(s);
                }
            }
            _ => edid_full_subrecord!(item, &sig, data),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{Accessor, Logger, RuntimeReader};
    use crate::config::ReconstructionConfig;
    use crate::correlation::CorrelationMap;
    use crate::scan_result::ScanResult;

    struct NullLogger;
    impl Logger for NullLogger {
        fn debug(&self, _m: &str) {}
    }
    struct NoRuntime;
    impl RuntimeReader for NoRuntime {}
    struct FakeAccessor {
        bytes: Vec<u8>,
    }
    impl Accessor for FakeAccessor {
        fn read_at(&self, offset: u64, dst: &mut [u8]) -> bool {
            let start = offset as usize;
            if start + dst.len() > self.bytes.len() {
                return false;
            }
            dst.copy_from_slice(&self.bytes[start..start + dst.len()]);
            true
        }
    }
    fn le_subrecord(sig: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = sig.to_vec();
        out.extend_from_slice(&(data.len() as u16).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn armor_reads_value_health_and_dr() {
        let mut data = 100u32.to_le_bytes().to_vec();
        data.extend_from_slice(&50u32.to_le_bytes());
        let mut body = le_subrecord(b"DATA", &data);
        body.extend(le_subrecord(b"DNAM", &12.5f32.to_le_bytes()));
        let mut dump = vec![0u8; 24];
        dump.extend_from_slice(&body);
        let accessor = FakeAccessor { bytes: dump };
        let mut scan = ScanResult::default();
        scan.main_records.push(crate::scan_result::MainRecord {
            form_id: FormId(1),
            record_type: *b"ARMO",
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
        let armors = reconstruct_armor(&ctx);
        assert_eq!(armors[0].value, Some(100));
        assert_eq!(armors[0].health, Some(50));
        assert_eq!(armors[0].damage_resistance, Some(12.5));
    }

    #[test]
    fn container_reads_contents_from_cnto() {
        let mut cnto = 0x10u32.to_le_bytes().to_vec();
        cnto.extend_from_slice(&4i32.to_le_bytes());
        let body = le_subrecord(b"CNTO", &cnto);
        let mut dump = vec![0u8; 24];
        dump.extend_from_slice(&body);
        let accessor = FakeAccessor { bytes: dump };
        let mut scan = ScanResult::default();
        scan.main_records.push(crate::scan_result::MainRecord {
            form_id: FormId(2),
            record_type: *b"CONT",
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
        let containers = reconstruct_container(&ctx);
        assert_eq!(
            containers[0].contents,
            vec![ContainerItem { item_form_id: FormId(0x10), count: 4 }]
        );
    }
}
