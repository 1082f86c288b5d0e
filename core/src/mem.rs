//! Guest memory access surface.
//!
//! The front end consumes exactly one operation: read a 4-byte
//! little-endian word at a guest address. In-range behavior is the
//! only contract; permission and fault semantics belong to the real
//! memory subsystem behind this trait.

/// Read access to guest code memory.
pub trait GuestMemory {
    /// Read a 4-byte little-endian word at `addr`.
    ///
    /// Assumed to succeed for in-range addresses; out-of-range
    /// handling is the implementor's concern.
    fn read_u32(&self, addr: u64) -> u32;
}

/// Flat `Vec`-backed guest memory mapped at a base address.
///
/// Serves tests and simple image loading; a production memory
/// subsystem implements [`GuestMemory`] over its own paging.
pub struct FlatMemory {
    base: u64,
    bytes: Vec<u8>,
}

impl FlatMemory {
    pub fn new(base: u64, bytes: Vec<u8>) -> Self {
        Self { base, bytes }
    }

    /// Build from 4-byte instruction words, little-endian.
    pub fn from_words(base: u64, words: &[u32]) -> Self {
        let mut bytes = Vec::with_capacity(words.len() * 4);
        for w in words {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        Self { base, bytes }
    }

    /// Build from 2-byte instruction halfwords, little-endian.
    pub fn from_halfwords(base: u64, halves: &[u16]) -> Self {
        let mut bytes = Vec::with_capacity(halves.len() * 2);
        for h in halves {
            bytes.extend_from_slice(&h.to_le_bytes());
        }
        Self { base, bytes }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl GuestMemory for FlatMemory {
    fn read_u32(&self, addr: u64) -> u32 {
        let off = addr.checked_sub(self.base).expect("guest addr below base") as usize;
        // A 2-byte terminator at the end of the image leaves less
        // than a full word to fetch; missing bytes read as zero.
        let mut buf = [0u8; 4];
        for (i, b) in buf.iter_mut().enumerate() {
            if let Some(&v) = self.bytes.get(off + i) {
                *b = v;
            }
        }
        u32::from_le_bytes(buf)
    }
}
