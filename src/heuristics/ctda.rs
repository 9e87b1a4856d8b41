use crate::primitives::{read_f32, read_u16, read_u32, read_u8};
use crate::types::Endianness;

const MIN_PAYLOAD_LEN: usize = 24;
const MAX_PAYLOAD_LEN: usize = 28;

/// Parsed `CTDA` ("Condition") subrecord, per the fixed layout in spec §6.
/// `run_on_type` is only present in the 28-byte variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctda {
    pub condition_type: u8,
    pub operator: u8,
    pub comp_value: f32,
    pub function_index: u16,
    pub param1: u32,
    pub param2: u32,
    pub run_on_type: Option<u32>,
    pub is_big_endian: bool,
}

/// `window` must start at the 4-byte `CTDA` signature. Same LE-first,
/// then-BE, range-policy-gated strategy as [`super::acbs::parse_acbs`].
#[must_use]
pub fn parse_ctda(window: &[u8]) -> Option<Ctda> {
    if window.len() < 6 || &window[0..4] != b"CTDA" {
        return None;
    }

    if let Some(len) = declared_length(window, Endianness::Little) {
        if is_expected_len(len) && window.len() >= 6 + len as usize {
            if let Some(ctda) = parse_payload(&window[6..6 + len as usize], Endianness::Little) {
                return Some(ctda);
            }
        }
    }
    if let Some(len) = declared_length(window, Endianness::Big) {
        if is_expected_len(len) && window.len() >= 6 + len as usize {
            if let Some(ctda) = parse_payload(&window[6..6 + len as usize], Endianness::Big) {
                return Some(ctda);
            }
        }
    }
    None
}

fn is_expected_len(len: u16) -> bool {
    len as usize == MIN_PAYLOAD_LEN || len as usize == MAX_PAYLOAD_LEN
}

fn declared_length(window: &[u8], endian: Endianness) -> Option<u16> {
    read_u16(window, 4, endian).ok()
}

fn parse_payload(payload: &[u8], endian: Endianness) -> Option<Ctda> {
    let condition_type = read_u8(payload, 0).ok()?;
    let operator = read_u8(payload, 1).ok()?;
    let comp_value = read_f32(payload, 4, endian).ok()?;
    let function_index = read_u16(payload, 8, endian).ok()?;
    let param1 = read_u32(payload, 12, endian).ok()?;
    let param2 = read_u32(payload, 16, endian).ok()?;
    let run_on_type = if payload.len() >= MAX_PAYLOAD_LEN {
        Some(read_u32(payload, 20, endian).ok()?)
    } else {
        None
    };

    if function_index > 1000 {
        return None;
    }
    if comp_value.is_nan() || comp_value.is_infinite() {
        return None;
    }

    Some(Ctda {
        condition_type,
        operator,
        comp_value,
        function_index,
        param1,
        param2,
        run_on_type,
        is_big_endian: endian.is_big(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_24(function_index: u16, comp_value: f32) -> Vec<u8> {
        let mut p = vec![0u8; 24];
        p[0] = 1; // type
        p[1] = 0; // operator
        p[4..8].copy_from_slice(&comp_value.to_le_bytes());
        p[8..10].copy_from_slice(&function_index.to_le_bytes());
        p
    }

    #[test]
    fn parses_24_byte_le_payload() {
        let mut window = b"CTDA".to_vec();
        window.extend_from_slice(&24u16.to_le_bytes());
        window.extend_from_slice(&payload_24(42, 1.5));
        let ctda = parse_ctda(&window).expect("should parse");
        assert_eq!(ctda.function_index, 42);
        assert_eq!(ctda.comp_value, 1.5);
        assert_eq!(ctda.run_on_type, None);
        assert!(!ctda.is_big_endian);
    }

    #[test]
    fn parses_28_byte_payload_with_run_on_type() {
        let mut window = b"CTDA".to_vec();
        window.extend_from_slice(&28u16.to_le_bytes());
        let mut payload = payload_24(1, 0.0);
        payload.extend_from_slice(&7u32.to_le_bytes());
        window.extend_from_slice(&payload);
        let ctda = parse_ctda(&window).expect("should parse");
        assert_eq!(ctda.run_on_type, Some(7));
    }

    #[test]
    fn rejects_oversized_function_index() {
        let mut window = b"CTDA".to_vec();
        window.extend_from_slice(&24u16.to_le_bytes());
        window.extend_from_slice(&payload_24(2000, 0.0));
        assert_eq!(parse_ctda(&window), None);
    }

    #[test]
    fn rejects_nan_comp_value() {
        let mut window = b"CTDA".to_vec();
        window.extend_from_slice(&24u16.to_le_bytes());
        window.extend_from_slice(&payload_24(1, f32::NAN));
        assert_eq!(parse_ctda(&window), None);
    }
}
