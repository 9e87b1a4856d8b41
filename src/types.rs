use std::fmt;

/// 32-bit game-wide object identifier. `0` means "absent/null reference"
/// (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FormId(pub u32);

impl FormId {
    pub const NULL: FormId = FormId(0);

    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn non_null(self) -> Option<FormId> {
        if self.is_null() { None } else { Some(self) }
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl From<u32> for FormId {
    fn from(value: u32) -> Self {
        FormId(value)
    }
}

/// Developer-assigned identifier. Lookup is always case-insensitive; the
/// original casing is retained for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditorId(pub String);

impl EditorId {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() { None } else { Some(EditorId(text)) }
    }

    /// Lowercased key used for case-insensitive lookups and comparisons.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 4-byte ASCII record/subrecord signature, e.g. `NPC_`, `ACBS`, `EDID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 4]);

impl Signature {
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Signature(bytes)
    }

    #[must_use]
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Byte-reverses the signature, matching the in-memory layout of
    /// big-endian records (spec §4.1).
    #[must_use]
    pub fn reversed(self) -> Self {
        let [a, b, c, d] = self.0;
        Signature([d, c, b, a])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// 64-bit byte offset into the dump.
pub type Offset = u64;

/// Per-record endianness tag. The same logical record may appear in both a
/// big-endian region and a little-endian mirror region of the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    #[must_use]
    pub fn is_big(self) -> bool {
        matches!(self, Endianness::Big)
    }

    #[must_use]
    pub fn from_is_big_endian(is_big_endian: bool) -> Self {
        if is_big_endian { Endianness::Big } else { Endianness::Little }
    }
}
