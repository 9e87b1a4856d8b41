use bitflags::bitflags;

use crate::primitives::{read_f32, read_i16, read_u16, read_u32};
use crate::types::Endianness;

bitflags! {
    /// Named `ACBS.flags` bits (xEdit's `ACBS - Flags` enum). Only the low
    /// 20 bits are ever assigned; anything above that is the garbage this
    /// module's range policy exists to catch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AcbsFlags: u32 {
        const FEMALE = 0x0000_0001;
        const ESSENTIAL = 0x0000_0002;
        const IS_CHARGEN_FACE_PRESET = 0x0000_0004;
        const RESPAWN = 0x0000_0008;
        const AUTO_CALC_STATS = 0x0000_0010;
        const UNIQUE = 0x0000_0020;
        const DOES_NOT_AFFECT_STEALTH = 0x0000_0040;
        const PC_LEVEL_MULT = 0x0000_0080;
        const USE_TEMPLATE = 0x0000_0100;
        const NO_LOW_LEVEL_PROCESSING = 0x0000_0200;
        const NO_BLOOD_SPRAY = 0x0000_0400;
        const NO_BLOOD_DECAL = 0x0000_0800;
        const NO_VATS_MELEE = 0x0001_0000;
        const CAN_BE_ALL_RACES = 0x0002_0000;
        const AUTOCALC_SERVICE = 0x0004_0000;
        const HAS_INFINITE_AMMO = 0x0008_0000;
    }
}

/// Bits that must all be clear in a plausible `ACBS.flags` value (spec §4.2
/// range policy table): anything outside the named bit set above.
const INVALID_FLAG_BITS: u32 = !AcbsFlags::all().bits();
const EXPECTED_PAYLOAD_LEN: usize = 24;
const MIN_WINDOW: usize = 4 + 2 + EXPECTED_PAYLOAD_LEN;

/// Parsed `ACBS` ("Actor Base Config Stats") subrecord, per the fixed
/// layout in spec §6.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acbs {
    pub flags: u32,
    pub fatigue_base: u16,
    pub barter_gold: u16,
    pub level: i16,
    pub calc_min: u16,
    pub calc_max: u16,
    pub speed_multiplier: u16,
    pub karma: f32,
    pub disposition: i16,
    pub template_flags: u16,
    pub is_big_endian: bool,
}

/// `window` must start at the 4-byte `ACBS` signature. Returns `None` if
/// the window is too short, the declared length doesn't match the fixed
/// 24-byte payload, or the payload fails the range policy under both
/// endiannesses. LE is tried first and wins ties (spec §4.2).
#[must_use]
pub fn parse_acbs(window: &[u8]) -> Option<Acbs> {
    if window.len() < MIN_WINDOW || &window[0..4] != b"ACBS" {
        return None;
    }
    let payload = &window[6..6 + EXPECTED_PAYLOAD_LEN];

    if declared_length(window, Endianness::Little) == Some(EXPECTED_PAYLOAD_LEN as u16) {
        if let Some(acbs) = parse_payload(payload, Endianness::Little) {
            return Some(acbs);
        }
    }
    if declared_length(window, Endianness::Big) == Some(EXPECTED_PAYLOAD_LEN as u16) {
        if let Some(acbs) = parse_payload(payload, Endianness::Big) {
            return Some(acbs);
        }
    }
    None
}

fn declared_length(window: &[u8], endian: Endianness) -> Option<u16> {
    read_u16(window, 4, endian).ok()
}

fn parse_payload(payload: &[u8], endian: Endianness) -> Option<Acbs> {
    let flags = read_u32(payload, 0, endian).ok()?;
    let fatigue_base = read_u16(payload, 4, endian).ok()?;
    let barter_gold = read_u16(payload, 6, endian).ok()?;
    let level = read_i16(payload, 8, endian).ok()?;
    let calc_min = read_u16(payload, 10, endian).ok()?;
    let calc_max = read_u16(payload, 12, endian).ok()?;
    let speed_multiplier = read_u16(payload, 14, endian).ok()?;
    let karma = read_f32(payload, 16, endian).ok()?;
    let disposition = read_i16(payload, 20, endian).ok()?;
    let template_flags = read_u16(payload, 22, endian).ok()?;

    if flags & INVALID_FLAG_BITS != 0 {
        return None;
    }
    if fatigue_base > 1000 {
        return None;
    }
    if !(-128..=255).contains(&level) {
        return None;
    }
    if speed_multiplier > 500 {
        return None;
    }
    if karma.is_nan() || karma.is_infinite() || karma.abs() > 2.0 {
        return None;
    }

    Some(Acbs {
        flags,
        fatigue_base,
        barter_gold,
        level,
        calc_min,
        calc_max,
        speed_multiplier,
        karma,
        disposition,
        template_flags,
        is_big_endian: endian.is_big(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Spec §8 S1 — ACBS LE happy path.
    #[test]
    fn le_happy_path() {
        let mut window = b"ACBS".to_vec();
        window.extend_from_slice(&24u16.to_le_bytes());
        window.extend_from_slice(&[
            0x01, 0x00, 0x00, 0x00, // flags = 1
            0x64, 0x00, // fatigue_base = 100
            0x32, 0x00, // barter_gold = 50
            0x05, 0x00, // level = 5
            0x01, 0x00, // calc_min = 1
            0x05, 0x00, // calc_max = 5
            0x64, 0x00, // speed_mul = 100
            0x00, 0x00, 0x00, 0x00, // karma = 0.0
            0x0A, 0x00, // disposition = 10
            0x00, 0x00, // template_flags = 0
        ]);
        let acbs = parse_acbs(&window).expect("should parse");
        assert_eq!(acbs.flags, 1);
        assert_eq!(acbs.fatigue_base, 100);
        assert_eq!(acbs.barter_gold, 50);
        assert_eq!(acbs.level, 5);
        assert_eq!(acbs.calc_min, 1);
        assert_eq!(acbs.calc_max, 5);
        assert_eq!(acbs.speed_multiplier, 100);
        assert_eq!(acbs.karma, 0.0);
        assert_eq!(acbs.disposition, 10);
        assert_eq!(acbs.template_flags, 0);
        assert!(!acbs.is_big_endian);
    }

    /// Spec §8 S2 — ACBS BE validation rejection (flags has forbidden bits).
    #[test]
    fn rejects_invalid_flag_bits_under_both_endians() {
        let mut window = b"ACBS".to_vec();
        window.extend_from_slice(&24u16.to_be_bytes());
        let mut payload = vec![0xFF, 0xF0, 0x00, 0x00];
        payload.extend_from_slice(&[0u8; 20]);
        window.extend_from_slice(&payload);
        assert_eq!(parse_acbs(&window), None);
    }

    #[test]
    fn rejects_short_window() {
        let window = b"ACBS".to_vec();
        assert_eq!(parse_acbs(&window), None);
    }

    #[test]
    fn rejects_wrong_length() {
        let mut window = b"ACBS".to_vec();
        window.extend_from_slice(&16u16.to_le_bytes());
        window.extend_from_slice(&[0u8; 24]);
        assert_eq!(parse_acbs(&window), None);
    }
}
