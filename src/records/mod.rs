//! Per-type ESM reconstructors (spec §2 component 5, §4.4).
//!
//! Every reconstructor in this family follows the same two-mode shape the
//! spec describes: a cheap scan-result-only stub when no accessor is
//! available (or the accessor's read fails), and a full field-populating
//! walk over the record's subrecord stream when one is. [`ReconstructionContext`]
//! bundles the read-only collaborators every reconstructor needs; the
//! per-kind modules below are organized by domain relationship rather than
//! 1:1 with the spec's record-kind list (e.g. weapons and ammo share a
//! module because §4.6 enriches them together) — see `DESIGN.md` for the
//! grounding of each grouping.

pub mod actors;
pub mod crafting;
pub mod dial;
pub mod globals;
pub mod info;
pub mod items;
pub mod leveled;
pub mod magic;
pub mod npc;
pub mod projectile;
pub mod qust;
pub mod weapons;
pub mod world;

use crate::capabilities::{Accessor, Logger, RuntimeReader};
use crate::config::ReconstructionConfig;
use crate::correlation::CorrelationMap;
use crate::scan_result::{MainRecord, ScanResult};
use crate::subrecord::SubrecordIter;
use crate::types::{EditorId, Endianness, FormId, Offset};

/// Read-only collaborators threaded through every per-type reconstructor.
pub struct ReconstructionContext<'a> {
    pub scan: &'a ScanResult,
    pub correlation: &'a CorrelationMap,
    pub accessor: Option<&'a dyn Accessor>,
    pub runtime: Option<&'a dyn RuntimeReader>,
    pub logger: &'a dyn Logger,
    pub config: &'a ReconstructionConfig,
}

/// Common scan-result-mode fields every reconstructed entity starts from
/// (spec §4.4 "Scan-result mode").
#[derive(Debug, Clone)]
pub struct StubFields {
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
}

impl ReconstructionContext<'_> {
    #[must_use]
    pub fn stub_fields(&self, rec: &MainRecord) -> StubFields {
        StubFields {
            editor_id: self.correlation.editor_id_for(rec.form_id).and_then(EditorId::new),
            full_name: self
                .scan
                .nearest_full_name(rec.offset, self.config.full_name_window)
                .map(str::to_owned),
        }
    }

    /// Attempts to read the record's subrecord stream (everything after
    /// the fixed 24-byte main-record header) into `buf`, which the caller
    /// owns as a per-pass scratch buffer (spec §5 Buffer discipline).
    /// Returns `false` (and leaves `buf` empty) if no accessor is wired up
    /// or the read could not be satisfied in full, in which case the
    /// caller falls back to scan-result mode (spec §4.9).
    #[must_use]
    pub fn read_subrecord_stream(&self, rec: &MainRecord, buf: &mut Vec<u8>) -> bool {
        buf.clear();
        let Some(accessor) = self.accessor else { return false };
        buf.resize(rec.data_size as usize, 0);
        let ok = accessor.read_at(rec.offset + 24, buf);
        if !ok {
            buf.clear();
        }
        ok
    }

    #[must_use]
    pub fn endian(&self, rec: &MainRecord) -> Endianness {
        Endianness::from_is_big_endian(rec.is_big_endian)
    }

    pub fn log(&self, message: impl AsRef<str>) {
        self.logger.debug(message.as_ref());
    }
}

/// Iterates the subrecords of `data` with `rec`'s endianness, yielding
/// `(signature-as-bytes, data_slice)` pairs. Unknown signatures and
/// malformed lengths are silently skipped by virtue of the caller's match
/// falling through to a no-op arm (spec §4.4).
pub fn iter_subrecords<'a>(
    data: &'a [u8],
    rec: &MainRecord,
) -> impl Iterator<Item = ([u8; 4], &'a [u8])> {
    let endian = Endianness::from_is_big_endian(rec.is_big_endian);
    let iter = SubrecordIter::new(data, endian);
    let data_for_slices = data;
    iter.map(move |span| {
        (span.signature.0, &data_for_slices[span.data_offset..span.data_offset + span.data_length])
    })
}

/// A FormID appearing in a reconstructed entity's own list must be unique;
/// this is the final step of essentially every per-kind pipeline (spec §5
/// "Ordering guarantees", §4.8 "Deduplication is the last step").
pub fn dedup_by_form_id<T>(items: Vec<T>, form_id_of: impl Fn(&T) -> FormId) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(form_id_of(item)))
        .collect()
}

/// Like [`dedup_by_form_id`], but when the same FormID occurs more than
/// once, keeps the entry with the greatest `key_of` rather than whichever
/// came first (spec §4.8, §8 S6: two scans of the same `INFO` under
/// different endian guesses keep whichever decoded the richer response
/// set). Preserves the first-seen relative order of surviving FormIDs.
pub fn dedup_by_form_id_keep_best<T, K: Ord>(
    items: Vec<T>,
    form_id_of: impl Fn(&T) -> FormId,
    key_of: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut order = Vec::new();
    let mut best: std::collections::HashMap<FormId, T> = std::collections::HashMap::new();
    for item in items {
        let fid = form_id_of(&item);
        match best.entry(fid) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                order.push(fid);
                slot.insert(item);
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                if key_of(&item) > key_of(slot.get()) {
                    slot.insert(item);
                }
            }
        }
    }
    order.into_iter().map(|fid| best.remove(&fid).expect("just inserted")).collect()
}

/// Tags the 30-odd supported record kinds for the orchestrator's
/// dispatch loop and for tallying `unreconstructed_type_counts` (spec §6).
/// Not a polymorphic hierarchy — just a closed enumeration used to route a
/// signature to the right per-type module (spec §9 design note).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Npc,
    Quest,
    Info,
    Dialogue,
    Weapon,
    Ammo,
    Armor,
    Alchemy,
    Misc,
    KeyItem,
    Container,
    Perk,
    Spell,
    Race,
    Creature,
    Faction,
    Book,
    Terminal,
    Note,
    LeveledItem,
    LeveledNpc,
    LeveledCreature,
    GameSetting,
    Global,
    Enchantment,
    MagicEffect,
    ItemMod,
    Recipe,
    Challenge,
    Reputation,
    Projectile,
    Explosion,
    Message,
    Class,
    Cell,
    World,
}

impl RecordKind {
    #[must_use]
    pub fn from_signature(signature: &[u8; 4]) -> Option<Self> {
        Some(match signature {
            b"NPC_" => Self::Npc,
            b"QUST" => Self::Quest,
            b"INFO" => Self::Info,
            b"DIAL" => Self::Dialogue,
            b"WEAP" => Self::Weapon,
            b"AMMO" => Self::Ammo,
            b"ARMO" => Self::Armor,
            b"ALCH" => Self::Alchemy,
            b"MISC" => Self::Misc,
            b"KEYM" => Self::KeyItem,
            b"CONT" => Self::Container,
            b"PERK" => Self::Perk,
            b"SPEL" => Self::Spell,
            b"RACE" => Self::Race,
            b"CREA" => Self::Creature,
            b"FACT" => Self::Faction,
            b"BOOK" => Self::Book,
            b"TERM" => Self::Terminal,
            b"NOTE" => Self::Note,
            b"LVLI" => Self::LeveledItem,
            b"LVLN" => Self::LeveledNpc,
            b"LVLC" => Self::LeveledCreature,
            b"GMST" => Self::GameSetting,
            b"GLOB" => Self::Global,
            b"ENCH" => Self::Enchantment,
            b"MGEF" => Self::MagicEffect,
            b"IMOD" => Self::ItemMod,
            b"RCPE" => Self::Recipe,
            b"CHAL" => Self::Challenge,
            b"REPU" => Self::Reputation,
            b"PROJ" => Self::Projectile,
            b"EXPL" => Self::Explosion,
            b"MESG" => Self::Message,
            b"CLAS" => Self::Class,
            b"CELL" => Self::Cell,
            b"WRLD" => Self::World,
            _ => return None,
        })
    }
}

/// Shared helper for the many item-like record kinds whose ESM track is
/// just `EDID` / `FULL` / one or two value subrecords: reads the common
/// stub fields, then lets the caller's `on_subrecord` closure handle
/// anything kind-specific. Centralizes the "read subrecord stream, fall
/// back to stub on short buffer" control flow (spec §4.4, §4.9) so each
/// per-kind module only has to describe its own field layout.
pub fn reconstruct_simple<T>(
    ctx: &ReconstructionContext<'_>,
    kind_signature: &[u8; 4],
    buf_capacity: usize,
    build_stub: impl Fn(&MainRecord, StubFields) -> T,
    mut on_subrecord: impl FnMut(&mut T, &MainRecord, [u8; 4], &[u8]),
) -> Vec<T> {
    let mut buf = Vec::with_capacity(buf_capacity);
    let mut out = Vec::new();
    for rec in &ctx.scan.main_records {
        if &rec.record_type != kind_signature {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut item = build_stub(rec, stub);
        if ctx.read_subrecord_stream(rec, &mut buf) {
            for (sig, data) in iter_subrecords(&buf, rec) {
                on_subrecord(&mut item, rec, sig, data);
            }
        }
        out.push(item);
    }
    out
}

#[must_use]
pub fn offset_of(rec: &MainRecord) -> Offset {
    rec.offset
}
