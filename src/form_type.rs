use num_enum::TryFromPrimitive;

/// Runtime `TESForm` type byte, used to match a `RuntimeEditorId` or a
/// `RuntimeReader` entry against the record kind it belongs to (spec §6
/// "Runtime form-type byte map"). Test suites assert these exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum RuntimeFormType {
    Faction = 0x08,
    Terminal = 0x17,
    Armor = 0x18,
    Container = 0x1B,
    Misc = 0x1F,
    Weapon = 0x28,
    Ammo = 0x29,
    NonPlayerCharacter = 0x2A,
    Creature = 0x2B,
    KeyItem = 0x2E,
    Alchemy = 0x2F,
    Note = 0x31,
    Projectile = 0x33,
    /// Shared by DIAL and INFO; used as the empirical fallback in spec
    /// §4.7 step 1 when no better candidate is found.
    DialogOrInfoFallback = 0x45,
    Quest = 0x47,
}

impl RuntimeFormType {
    #[must_use]
    pub fn byte(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_spec_literal_values() {
        assert_eq!(RuntimeFormType::NonPlayerCharacter.byte(), 0x2A);
        assert_eq!(RuntimeFormType::Creature.byte(), 0x2B);
        assert_eq!(RuntimeFormType::Faction.byte(), 0x08);
        assert_eq!(RuntimeFormType::Quest.byte(), 0x47);
        assert_eq!(RuntimeFormType::Note.byte(), 0x31);
        assert_eq!(RuntimeFormType::Weapon.byte(), 0x28);
        assert_eq!(RuntimeFormType::Armor.byte(), 0x18);
        assert_eq!(RuntimeFormType::Ammo.byte(), 0x29);
        assert_eq!(RuntimeFormType::Alchemy.byte(), 0x2F);
        assert_eq!(RuntimeFormType::Misc.byte(), 0x1F);
        assert_eq!(RuntimeFormType::KeyItem.byte(), 0x2E);
        assert_eq!(RuntimeFormType::Container.byte(), 0x1B);
        assert_eq!(RuntimeFormType::Terminal.byte(), 0x17);
        assert_eq!(RuntimeFormType::Projectile.byte(), 0x33);
        assert_eq!(RuntimeFormType::DialogOrInfoFallback.byte(), 0x45);
    }

    #[test]
    fn try_from_round_trips() {
        assert_eq!(RuntimeFormType::try_from(0x2Au8), Ok(RuntimeFormType::NonPlayerCharacter));
        assert!(RuntimeFormType::try_from(0xFFu8).is_err());
    }
}
