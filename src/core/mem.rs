//! Flat Memory Model.
//!
//! A single contiguous little-endian RAM region at a configurable base
//! address. Out-of-range data accesses read as zero and drop writes; the
//! core validates addresses separately where a trap is required (fetch).

/// Flat little-endian RAM at a fixed base address.
pub struct Memory {
    base: u64,
    data: Vec<u8>,
}

impl Memory {
    /// Creates a zero-filled RAM region of `size` bytes at `base`.
    pub fn new(base: u64, size: usize) -> Self {
        Self {
            base,
            data: vec![0; size],
        }
    }

    /// Returns the base address of the region.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Returns true when `[addr, addr+len)` lies inside the region.
    pub fn is_valid(&self, addr: u64, len: usize) -> bool {
        addr >= self.base
            && addr
                .checked_add(len as u64)
                .is_some_and(|end| end <= self.base + self.data.len() as u64)
    }

    fn offset(&self, addr: u64, len: usize) -> Option<usize> {
        if self.is_valid(addr, len) {
            Some((addr - self.base) as usize)
        } else {
            None
        }
    }

    /// Reads `N` bytes at `addr`; out-of-range reads return zeros.
    pub fn read_bytes<const N: usize>(&self, addr: u64) -> [u8; N] {
        let mut buf = [0u8; N];
        if let Some(off) = self.offset(addr, N) {
            buf.copy_from_slice(&self.data[off..off + N]);
        }
        buf
    }

    /// Writes bytes at `addr`; out-of-range writes are dropped.
    pub fn write_bytes(&mut self, addr: u64, bytes: &[u8]) {
        if let Some(off) = self.offset(addr, bytes.len()) {
            self.data[off..off + bytes.len()].copy_from_slice(bytes);
        }
    }

    /// Reads a byte.
    pub fn read_u8(&self, addr: u64) -> u8 {
        u8::from_le_bytes(self.read_bytes(addr))
    }

    /// Reads a half-word (16-bit).
    pub fn read_u16(&self, addr: u64) -> u16 {
        u16::from_le_bytes(self.read_bytes(addr))
    }

    /// Reads a word (32-bit).
    pub fn read_u32(&self, addr: u64) -> u32 {
        u32::from_le_bytes(self.read_bytes(addr))
    }

    /// Reads a double-word (64-bit).
    pub fn read_u64(&self, addr: u64) -> u64 {
        u64::from_le_bytes(self.read_bytes(addr))
    }

    /// Writes a byte.
    pub fn write_u8(&mut self, addr: u64, val: u8) {
        self.write_bytes(addr, &val.to_le_bytes());
    }

    /// Writes a half-word (16-bit).
    pub fn write_u16(&mut self, addr: u64, val: u16) {
        self.write_bytes(addr, &val.to_le_bytes());
    }

    /// Writes a word (32-bit).
    pub fn write_u32(&mut self, addr: u64, val: u32) {
        self.write_bytes(addr, &val.to_le_bytes());
    }

    /// Writes a double-word (64-bit).
    pub fn write_u64(&mut self, addr: u64, val: u64) {
        self.write_bytes(addr, &val.to_le_bytes());
    }

    /// Copies a binary image into RAM at the given address.
    pub fn load_binary_at(&mut self, data: &[u8], addr: u64) {
        self.write_bytes(addr, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests little-endian round trips at the region base.
    #[test]
    fn test_rw_little_endian() {
        let mut mem = Memory::new(0x1000, 64);
        mem.write_u32(0x1000, 0xdead_beef);
        assert_eq!(mem.read_u32(0x1000), 0xdead_beef);
        assert_eq!(mem.read_u8(0x1000), 0xef);
        assert_eq!(mem.read_u16(0x1002), 0xdead);
    }

    /// Tests that out-of-range accesses are absorbed.
    #[test]
    fn test_out_of_range() {
        let mut mem = Memory::new(0x1000, 16);
        mem.write_u64(0x2000, 5);
        assert_eq!(mem.read_u64(0x2000), 0);
        assert!(!mem.is_valid(0x100c, 8));
        assert!(mem.is_valid(0x1008, 8));
    }
}
