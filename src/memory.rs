//! # Memory Model
//!
//! A flat 64 KiB address space owned exclusively by its machine instance.
//! There is no memory-mapped I/O and no banking; every address in
//! `0x0000..=0xFFFF` is plain RAM initialized to zero.
//!
//! ## Bounds Checking
//!
//! The host contract addresses memory with integers wider than the 16-bit
//! address space, so every accessor takes a `u32` and fails with
//! [`Error::AddressOutOfRange`] when the address (or, for chunk access,
//! the computed end address) exceeds `0xFFFF`. There is no wraparound
//! across the top of memory: exceeding it is always an error. A failed
//! chunk write leaves memory untouched.

use crate::Error;

/// Number of addressable bytes.
pub const MEMORY_SIZE: usize = 65536;

/// Highest valid address.
pub const MAX_ADDRESS: u32 = 0xFFFF;

/// Flat 64 KiB memory.
///
/// # Examples
///
/// ```
/// use libz80::Memory;
///
/// let mut mem = Memory::new();
/// mem.write_byte(0x1234, 0x42).unwrap();
/// assert_eq!(mem.read_byte(0x1234).unwrap(), 0x42);
///
/// // One past the end of the address space
/// assert!(mem.read_byte(0x10000).is_err());
/// ```
pub struct Memory {
    /// 64 KiB contiguous memory array
    data: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    /// Creates a memory with every byte zeroed.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; MEMORY_SIZE]),
        }
    }

    /// Reads the byte at `addr`.
    ///
    /// Fails with [`Error::AddressOutOfRange`] when `addr > 0xFFFF`.
    pub fn read_byte(&self, addr: u32) -> Result<u8, Error> {
        self.check(addr)?;
        Ok(self.data[addr as usize])
    }

    /// Writes one byte at `addr`.
    ///
    /// Fails with [`Error::AddressOutOfRange`] when `addr > 0xFFFF`; on
    /// failure nothing is written.
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), Error> {
        self.check(addr)?;
        self.data[addr as usize] = value;
        Ok(())
    }

    /// Reads `len` bytes starting at `addr`.
    ///
    /// The end address `addr + len - 1` must also lie inside the address
    /// space. A zero-length read of a valid address returns an empty
    /// vector.
    pub fn read_chunk(&self, addr: u32, len: u32) -> Result<Vec<u8>, Error> {
        self.check_span(addr, u64::from(len))?;
        let start = addr as usize;
        Ok(self.data[start..start + len as usize].to_vec())
    }

    /// Writes `bytes` starting at `addr`, in ascending address order.
    ///
    /// The end address must lie inside the address space; otherwise the
    /// call fails with [`Error::AddressOutOfRange`] and memory is left
    /// unmodified (the check happens before the first byte is copied).
    pub fn write_chunk(&mut self, addr: u32, bytes: &[u8]) -> Result<(), Error> {
        self.check_span(addr, bytes.len() as u64)?;
        let start = addr as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Infallible fetch for the decoder: `u16` addresses cover exactly
    /// the address space.
    pub(crate) fn fetch(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    /// Infallible store for the decoder.
    pub(crate) fn store(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    fn check(&self, addr: u32) -> Result<(), Error> {
        if addr > MAX_ADDRESS {
            return Err(Error::AddressOutOfRange {
                address: u64::from(addr),
            });
        }
        Ok(())
    }

    /// Checks a whole address span. The end address is computed in 64-bit
    /// arithmetic so a huge length cannot wrap the check.
    fn check_span(&self, addr: u32, len: u64) -> Result<(), Error> {
        self.check(addr)?;
        if len > 0 {
            let end = u64::from(addr) + len - 1;
            if end > u64::from(MAX_ADDRESS) {
                return Err(Error::AddressOutOfRange { address: end });
            }
        }
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
