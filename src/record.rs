//! Decoded metafile records.
//!
//! A [`MetaRecord`] is one parsed WMF record: the function code, the operand
//! words the parser extracted for it (already sign- and scale-corrected), and
//! an optional bulk payload. Records are immutable once constructed and are
//! replayed strictly in file order.

use smallvec::SmallVec;

use crate::constants::record_name;

/// Bulk payload carried by some records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// No payload beyond the operand words.
    None,
    /// Raw bytes, decoded later with playback-time context (drawn text keeps
    /// its bytes so the charset of the then-selected font applies; DIB
    /// records keep the undecoded bitmap).
    Bytes(Vec<u8>),
    /// Text decoded at parse time (font face names, which carry their own
    /// charset inside the record).
    Text(String),
}

/// One decoded WMF record.
#[derive(Debug, Clone)]
pub struct MetaRecord {
    /// Record function code (`constants::record`).
    pub function: u16,
    /// Declared operand size of the record, in 16-bit words.
    pub word_count: u32,
    /// Decoded integer operands, in the documented per-opcode order.
    pub operands: SmallVec<[i32; 8]>,
    pub payload: Payload,
}

impl MetaRecord {
    pub fn new(function: u16, word_count: u32) -> Self {
        Self {
            function,
            word_count,
            operands: SmallVec::new(),
            payload: Payload::None,
        }
    }

    #[inline]
    pub fn push(&mut self, v: i32) {
        self.operands.push(v);
    }

    /// Operand at `idx`, or 0 when the record is shorter than expected.
    /// Known record shapes are fixed by the parser, so a miss here only
    /// happens for records a damaged file declared too small.
    #[inline]
    pub fn op(&self, idx: usize) -> i32 {
        self.operands.get(idx).copied().unwrap_or(0)
    }

    /// Decoded text payload, if any.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Raw byte payload, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Mnemonic of the function code, falling back to hex.
    pub fn name(&self) -> String {
        match record_name(self.function) {
            Some(n) => n.to_string(),
            None => format!("0x{:04X}", self.function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_access_is_total() {
        let mut mr = MetaRecord::new(crate::constants::record::MOVE_TO, 2);
        mr.push(7);
        assert_eq!(mr.op(0), 7);
        assert_eq!(mr.op(1), 0);
    }

    #[test]
    fn names() {
        let mr = MetaRecord::new(crate::constants::record::LINE_TO, 2);
        assert_eq!(mr.name(), "LINETO");
        let mr = MetaRecord::new(0x4242, 0);
        assert_eq!(mr.name(), "0x4242");
    }
}
