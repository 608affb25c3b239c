use crate::{
    bus::Address,
    error::{Error, Result},
};

use std::{mem::size_of, ops::{Index, IndexMut}};

pub const NUM_GPRS: usize = 16;

pub const VF: usize = 15;

/// Chip-8 general-purpose registers V0-VF
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gprs([u8; NUM_GPRS]);

impl Gprs {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl Index<usize> for Gprs {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Gprs {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

/// 8-bit downcounter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer(u8);

impl Timer {
    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn set(&mut self, value: u8) {
        self.0 = value;
    }

    /// Decrements counter only if current counter is not 0
    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.0 > 0
    }
}

/// Return address stack, 16 levels deep
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stack {
    entries: [u16; Self::DEPTH],
    sp: usize,
}

impl Stack {
    pub const DEPTH: usize = 16;

    pub fn push(&mut self, addr: u16) -> Result<()> {
        if self.sp == Self::DEPTH {
            return Err(Error::StackOverflow);
        }

        self.entries[self.sp] = addr;
        self.sp += 1;

        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }

        self.sp -= 1;

        Ok(self.entries[self.sp])
    }

    /// Number of return addresses currently held
    pub fn pointer(&self) -> usize {
        self.sp
    }

    pub fn is_full(&self) -> bool {
        self.sp == Self::DEPTH
    }
}

/// Chip-8 register file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegFile {
    /// 12-bit program counter
    pub pc: u16,

    /// 16 8-bit general purpose registers, V0-VF
    pub gprs: Gprs,

    /// 16-bit index register
    pub index: u16,

    pub stack: Stack,

    /// Delay and sound timers
    pub delay_timer: Timer,
    pub sound_timer: Timer,
}

impl RegFile {
    pub fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(size_of::<u16>() as u16);
    }

    pub fn rewind_pc(&mut self) {
        self.pc = self.pc.wrapping_sub(size_of::<u16>() as u16);
    }
}

impl Default for RegFile {
    fn default() -> Self {
        Self {
            pc: Address::PROGRAM_START,
            gprs: Gprs::default(),
            index: 0,
            stack: Stack::default(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
        }
    }
}
