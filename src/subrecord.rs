//! Subrecord iterator (spec §4.1, component 2).
//!
//! Yields `(signature, data_offset, data_length)` triples from the
//! subrecord stream that follows a main record's 24-byte header. The
//! iterator is finite, non-restartable, and never panics on malformed
//! input — it just stops.

use crate::types::{Endianness, Signature};

/// One subrecord header-and-data span, relative to the buffer the iterator
/// was built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubrecordSpan {
    pub signature: Signature,
    pub data_offset: usize,
    pub data_length: usize,
}

/// Header layout: 4-byte signature, 2-byte length (little-endian for LE
/// records, big-endian for BE records). For BE records the signature bytes
/// are also reversed in memory and must be reversed back on read.
const HEADER_LEN: usize = 6;

pub struct SubrecordIter<'a> {
    buf: &'a [u8],
    offset: usize,
    endian: Endianness,
    done: bool,
}

impl<'a> SubrecordIter<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8], endian: Endianness) -> Self {
        Self { buf, offset: 0, endian, done: false }
    }

    /// The subrecord's data slice, given a span yielded by this iterator.
    #[must_use]
    pub fn data<'b>(&self, buf: &'b [u8], span: SubrecordSpan) -> &'b [u8] {
        &buf[span.data_offset..span.data_offset + span.data_length]
    }
}

impl Iterator for SubrecordIter<'_> {
    type Item = SubrecordSpan;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let header = self.buf.get(self.offset..self.offset + HEADER_LEN)?;
        let mut raw_sig: [u8; 4] = header[0..4].try_into().unwrap();
        if self.endian.is_big() {
            raw_sig.reverse();
        }
        let length_bytes: [u8; 2] = header[4..6].try_into().unwrap();
        let length = match self.endian {
            Endianness::Little => u16::from_le_bytes(length_bytes),
            Endianness::Big => u16::from_be_bytes(length_bytes),
        } as usize;

        let data_offset = self.offset + HEADER_LEN;
        if data_offset + length > self.buf.len() {
            // A declared length exceeding the buffer means we've run off
            // the end of valid data; terminate cleanly rather than yield
            // a truncated/garbage span.
            self.done = true;
            return None;
        }

        self.offset = data_offset + length;
        Some(SubrecordSpan {
            signature: Signature::new(raw_sig),
            data_offset,
            data_length: length,
        })
    }
}
