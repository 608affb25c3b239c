use crate::{
    bus::memory::Memory,
    error::{Error, Result},
};

use std::ops::Range;

pub mod memory;

/// Chip-8 address
///
/// Addresses are 16-bit wide in the registers but only 0x000-0xFFF are backed by RAM,
/// so every access is checked against [`Memory::SIZE`] instead of silently wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address(u16);

impl Address {
    /// Programs are loaded here, everything below is reserved for the interpreter
    pub const PROGRAM_START: u16 = 0x200;

    pub fn new(addr: u16) -> Self {
        Self(addr)
    }

    /// Range of `len` bytes starting at this address, if all of them are backed by RAM
    pub fn span(&self, len: usize) -> Result<Range<usize>> {
        let start = self.0 as usize;
        let end = start + len;

        if end > Memory::SIZE {
            Err(Error::OutOfBounds { address: end - 1 })
        } else {
            Ok(start..end)
        }
    }
}

pub struct Bus {
    mem: Memory,
}

impl Bus {
    /// Largest program image that fits between [`Address::PROGRAM_START`] and the end of RAM
    pub const MAX_IMAGE_SIZE: usize = Memory::SIZE - Address::PROGRAM_START as usize;

    pub fn new(mem: Memory) -> Self {
        Self { mem }
    }

    /// Copies a program image verbatim to [`Address::PROGRAM_START`]
    pub fn load_image(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > Self::MAX_IMAGE_SIZE {
            return Err(Error::ImageTooLarge { size: image.len(), max: Self::MAX_IMAGE_SIZE });
        }

        let range = Address::new(Address::PROGRAM_START).span(image.len())?;
        self.mem[range].copy_from_slice(image);

        Ok(())
    }

    pub fn read_byte(&self, addr: Address) -> Result<u8> {
        let range = addr.span(1)?;

        Ok(self.mem[range.start])
    }

    /// Reads a big-endian word
    pub fn read_word(&self, addr: Address) -> Result<u16> {
        let range = addr.span(2)?;

        Ok(u16::from_be_bytes([self.mem[range.start], self.mem[range.start + 1]]))
    }

    pub fn read_bytes(&self, addr: Address, len: usize) -> Result<&[u8]> {
        let range = addr.span(len)?;

        Ok(&self.mem[range])
    }

    pub fn write_byte(&mut self, addr: Address, data: u8) -> Result<()> {
        let range = addr.span(1)?;
        self.mem[range.start] = data;

        Ok(())
    }

    /// Writes all of `data` or nothing at all
    pub fn write_bytes(&mut self, addr: Address, data: &[u8]) -> Result<()> {
        let range = addr.span(data.len())?;
        self.mem[range].copy_from_slice(data);

        Ok(())
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(Memory::default())
    }
}
