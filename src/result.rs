//! The aggregate output of a reconstruction pass (spec §7 "SemanticReconstructionResult").

use std::collections::HashMap;

use crate::dialogue::DialogueTree;
use crate::records::actors::{Class, Creature, Faction, Perk, Race, Spell};
use crate::records::crafting::{Challenge, ItemMod, Recipe, Reputation};
use crate::records::dial::Topic;
use crate::records::globals::{GameSetting, Global};
use crate::records::info::Dialogue;
use crate::records::items::{Alchemy, Armor, Book, Container, KeyItem, Misc, Note, Terminal};
use crate::records::leveled::LeveledList;
use crate::records::magic::{Enchantment, MagicEffect};
use crate::records::npc::Npc;
use crate::records::projectile::{Explosion, Message, Projectile};
use crate::records::qust::Quest;
use crate::records::weapons::{Ammo, Weapon};
use crate::records::world::{Cell, World};
use crate::types::FormId;

/// Everything a reconstruction pass produced, plus the bookkeeping needed
/// to tell a caller what it's missing (spec §4.9 "partial results").
#[derive(Debug, Clone, Default)]
pub struct SemanticReconstructionResult {
    pub npcs: Vec<Npc>,
    pub quests: Vec<Quest>,
    pub dialogues: Vec<Dialogue>,
    pub topics: Vec<Topic>,
    pub weapons: Vec<Weapon>,
    pub ammo: Vec<Ammo>,
    pub armor: Vec<Armor>,
    pub alchemy: Vec<Alchemy>,
    pub misc: Vec<Misc>,
    pub key_items: Vec<KeyItem>,
    pub containers: Vec<Container>,
    pub books: Vec<Book>,
    pub terminals: Vec<Terminal>,
    pub notes: Vec<Note>,
    pub perks: Vec<Perk>,
    pub spells: Vec<Spell>,
    pub races: Vec<Race>,
    pub creatures: Vec<Creature>,
    pub factions: Vec<Faction>,
    pub classes: Vec<Class>,
    pub item_mods: Vec<ItemMod>,
    pub recipes: Vec<Recipe>,
    pub challenges: Vec<Challenge>,
    pub reputations: Vec<Reputation>,
    pub enchantments: Vec<Enchantment>,
    pub magic_effects: Vec<MagicEffect>,
    pub leveled_lists: Vec<LeveledList>,
    pub game_settings: Vec<GameSetting>,
    pub globals: Vec<Global>,
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub messages: Vec<Message>,
    pub cells: Vec<Cell>,
    pub worlds: Vec<World>,

    pub dialogue_tree: DialogueTree,

    /// Snapshot of the correlation map's forward index, handed out so
    /// callers don't need to keep the `CorrelationMap` itself alive (spec
    /// §4.3, §7).
    pub form_id_to_editor_id: HashMap<FormId, String>,

    pub total_records_processed: usize,

    /// One entry per `MainRecord` signature with no matching
    /// [`crate::records::RecordKind`], counting how many such records were
    /// skipped (spec §4.9, §6).
    pub unreconstructed_type_counts: HashMap<[u8; 4], usize>,
}
