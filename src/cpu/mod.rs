use crate::{
    bus::{memory::Memory, Address, Bus},
    cpu::{
        instruction::Instruction,
        opcode::Opcode,
        regfile::{RegFile, VF},
    },
    display::Display,
    error::Result,
    keypad::{KeyState, Keypad},
};

use log::{debug, trace, warn};
use std::{cell::RefCell, rc::Rc};

pub use quirks::Quirks;
pub use random::{FixedByte, RandomSource, RngSource};

pub mod instruction;
pub mod opcode;
pub mod quirks;
pub mod random;
pub mod regfile;

/// Something the driver should react to after a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuEvent {
    /// The framebuffer changed
    Draw,
    /// Fx0A is waiting for a key press, pc has not moved
    WaitForKey,
}

type StepResult = Result<Option<CpuEvent>>;

pub struct Cpu {
    bus: Bus,
    display: Rc<RefCell<Display>>,
    keypad: Rc<RefCell<Keypad>>,
    rng: Box<dyn RandomSource>,
    quirks: Quirks,
    regfile: RegFile,
    /// Keys held at the end of the previous step
    last_keys: KeyState,
}

impl Cpu {
    /// Default number of steps per 60 Hz frame
    pub const STEPS: usize = 11;

    pub fn new(bus: Bus, display: Rc<RefCell<Display>>, keypad: Rc<RefCell<Keypad>>) -> Self {
        let last_keys = keypad.borrow().snapshot();

        Self {
            bus,
            display,
            keypad,
            rng: Box::new(RngSource::from_entropy()),
            quirks: Quirks::default(),
            regfile: RegFile::default(),
            last_keys,
        }
    }

    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        debug!("CPU quirks: {:?}", quirks);

        self.quirks = quirks;
        self
    }

    pub fn regfile(&self) -> &RegFile {
        &self.regfile
    }

    pub fn regfile_mut(&mut self) -> &mut RegFile {
        &mut self.regfile
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// True while the sound timer is running
    pub fn is_beeping(&self) -> bool {
        self.regfile.sound_timer.is_active()
    }

    /// Decrements both timers, to be called at 60 Hz
    pub fn tick(&mut self) {
        self.regfile.delay_timer.decrement();
        self.regfile.sound_timer.decrement();
    }

    /// Executes a single Chip-8 instruction
    ///
    /// On error nothing observable has changed, pc still points at the faulting instruction.
    pub fn step(&mut self) -> StepResult {
        let pc = self.regfile.pc;

        let result = self.fetch_execute(pc).map_err(|err| {
            self.regfile.pc = pc;
            warn!("step at {:#06X} failed: {}", pc, err);
            err
        });

        self.last_keys = self.keypad.borrow().snapshot();

        result
    }

    fn fetch_execute(&mut self, pc: u16) -> StepResult {
        let opcode = Opcode::new(self.bus.read_word(Address::new(pc))?);
        let instruction = Instruction::decode(opcode)?;

        trace!("{:#06X}: {:04X} {:?}", pc, opcode.raw(), instruction);

        self.regfile.advance_pc();

        self.execute(instruction)
    }

    fn execute(&mut self, instruction: Instruction) -> StepResult {
        use Instruction::*;

        match instruction {
            Sys { .. } => Ok(None),
            Cls => self.cls(),
            Ret => self.ret(),
            Jp { nnn } => self.jp(nnn),
            Call { nnn } => self.call(nnn),
            SeImm { x, kk } => self.skip_if(self.regfile.gprs[x] == kk),
            SneImm { x, kk } => self.skip_if(self.regfile.gprs[x] != kk),
            SeReg { x, y } => self.skip_if(self.regfile.gprs[x] == self.regfile.gprs[y]),
            LdImm { x, kk } => self.ldv(x, kk),
            AddImm { x, kk } => self.add_imm(x, kk),
            LdReg { x, y } => self.ldv(x, self.regfile.gprs[y]),
            Or { x, y } => self.alu(x, y, |a, b| (a | b, None)),
            And { x, y } => self.alu(x, y, |a, b| (a & b, None)),
            Xor { x, y } => self.alu(x, y, |a, b| (a ^ b, None)),
            AddReg { x, y } => self.alu(x, y, |a, b| {
                let (sum, carry) = a.overflowing_add(b);
                (sum, Some(carry as u8))
            }),
            Sub { x, y } => self.alu(x, y, |a, b| (a.wrapping_sub(b), Some((a >= b) as u8))),
            Subn { x, y } => self.alu(x, y, |a, b| (b.wrapping_sub(a), Some((b >= a) as u8))),
            Shr { x, y } => self.shift(x, y, |v| (v >> 1, v & 0x1)),
            Shl { x, y } => self.shift(x, y, |v| (v << 1, v >> 7)),
            SneReg { x, y } => self.skip_if(self.regfile.gprs[x] != self.regfile.gprs[y]),
            LdI { nnn } => self.ldi(nnn),
            JpV0 { nnn } => self.jp(nnn + self.regfile.gprs[0] as u16),
            Rnd { x, kk } => self.rnd(x, kk),
            Drw { x, y, n } => self.drw(x, y, n),
            Skp { x } => self.skip_if(self.key_pressed(x)),
            Sknp { x } => self.skip_if(!self.key_pressed(x)),
            LdVxDt { x } => self.ldv(x, self.regfile.delay_timer.get()),
            LdVxK { x } => self.wait_key(x),
            LdDtVx { x } => self.set_delay(x),
            LdStVx { x } => self.set_sound(x),
            AddI { x } => self.add_index(x),
            LdF { x } => self.ld_glyph(x),
            Bcd { x } => self.bcd(x),
            Store { x } => self.store(x),
            Load { x } => self.load(x),
        }
    }

    // --- Opcode handlers
    //
    // pc already points at the next instruction when a handler runs.

    /// Adds immediate, VF untouched
    fn add_imm(&mut self, x: usize, kk: u8) -> StepResult {
        self.regfile.gprs[x] = self.regfile.gprs[x].wrapping_add(kk);

        Ok(None)
    }

    /// Adds Vx to index register
    fn add_index(&mut self, x: usize) -> StepResult {
        self.regfile.index = self.regfile.index.wrapping_add(self.regfile.gprs[x] as u16);

        Ok(None)
    }

    /// Register-register arithmetic and logic
    ///
    /// `op` returns the result and, for flag-setting operations, the new VF.
    /// VF is written after Vx so that it holds the flag even when x is 0xF.
    fn alu(&mut self, x: usize, y: usize, op: impl Fn(u8, u8) -> (u8, Option<u8>)) -> StepResult {
        let (result, flag) = op(self.regfile.gprs[x], self.regfile.gprs[y]);

        self.regfile.gprs[x] = result;

        if let Some(flag) = flag {
            self.regfile.gprs[VF] = flag;
        }

        Ok(None)
    }

    /// Stores Vx as three decimal digits at I, I+1, I+2
    fn bcd(&mut self, x: usize) -> StepResult {
        let value = self.regfile.gprs[x];

        self.bus.write_bytes(Address::new(self.regfile.index), &[value / 100, value / 10 % 10, value % 10])?;

        Ok(None)
    }

    /// Calls subroutine
    fn call(&mut self, nnn: u16) -> StepResult {
        self.regfile.stack.push(self.regfile.pc)?;
        self.regfile.pc = nnn;

        Ok(None)
    }

    /// Clears screen
    fn cls(&mut self) -> StepResult {
        self.display.borrow_mut().clear();

        Ok(Some(CpuEvent::Draw))
    }

    /// Draws sprite
    ///
    /// Each sprite byte is one row of 8 pixels, MSB leftmost. Pixels are XORed onto
    /// the screen and wrap around its edges. VF is set if any lit pixel was erased.
    fn drw(&mut self, x: usize, y: usize, n: u8) -> StepResult {
        let sprite = self.bus.read_bytes(Address::new(self.regfile.index), n as usize)?;
        let (x, y) = (self.regfile.gprs[x] as usize, self.regfile.gprs[y] as usize);

        let mut display = self.display.borrow_mut();
        let mut collision = false;

        for (row, pixels) in sprite.iter().enumerate() {
            for col in 0..8 {
                if pixels & (0x80 >> col) != 0 {
                    collision |= display.flip(x + col, y + row);
                }
            }
        }

        self.regfile.gprs[VF] = collision as u8;

        Ok(Some(CpuEvent::Draw))
    }

    /// Jumps to other location in program
    fn jp(&mut self, nnn: u16) -> StepResult {
        self.regfile.pc = nnn;

        Ok(None)
    }

    /// Points index register at the font glyph for the low nibble of Vx
    fn ld_glyph(&mut self, x: usize) -> StepResult {
        let digit = (self.regfile.gprs[x] & 0xF) as usize;

        self.regfile.index = (Memory::FONT_START + digit * Memory::GLYPH_SIZE) as u16;

        Ok(None)
    }

    /// Loads index register
    fn ldi(&mut self, nnn: u16) -> StepResult {
        self.regfile.index = nnn;

        Ok(None)
    }

    /// Loads GPR with value
    fn ldv(&mut self, x: usize, value: u8) -> StepResult {
        self.regfile.gprs[x] = value;

        Ok(None)
    }

    /// Reads V0..=Vx from memory at I
    fn load(&mut self, x: usize) -> StepResult {
        let data = self.bus.read_bytes(Address::new(self.regfile.index), x + 1)?;

        self.regfile.gprs.as_mut_slice()[..=x].copy_from_slice(data);
        self.bump_index(x);

        Ok(None)
    }

    /// Returns from subroutine
    fn ret(&mut self) -> StepResult {
        self.regfile.pc = self.regfile.stack.pop()?;

        Ok(None)
    }

    /// Random byte masked with kk
    fn rnd(&mut self, x: usize, kk: u8) -> StepResult {
        self.regfile.gprs[x] = self.rng.next_byte() & kk;

        Ok(None)
    }

    fn set_delay(&mut self, x: usize) -> StepResult {
        self.regfile.delay_timer.set(self.regfile.gprs[x]);

        Ok(None)
    }

    fn set_sound(&mut self, x: usize) -> StepResult {
        self.regfile.sound_timer.set(self.regfile.gprs[x]);

        Ok(None)
    }

    /// Shifts by one, shifted-out bit goes to VF
    fn shift(&mut self, x: usize, y: usize, op: impl Fn(u8) -> (u8, u8)) -> StepResult {
        let source = if self.quirks.shift_uses_vy { self.regfile.gprs[y] } else { self.regfile.gprs[x] };
        let (result, out) = op(source);

        self.regfile.gprs[x] = result;
        self.regfile.gprs[VF] = out;

        Ok(None)
    }

    /// Skips the next instruction if `condition` holds
    fn skip_if(&mut self, condition: bool) -> StepResult {
        if condition {
            self.regfile.advance_pc();
        }

        Ok(None)
    }

    /// Writes V0..=Vx to memory at I
    fn store(&mut self, x: usize) -> StepResult {
        self.bus.write_bytes(Address::new(self.regfile.index), &self.regfile.gprs.as_slice()[..=x])?;
        self.bump_index(x);

        Ok(None)
    }

    /// Blocks until a key goes from released to pressed, then stores it in Vx
    ///
    /// Keys are compared with those held at the end of the previous step.
    fn wait_key(&mut self, x: usize) -> StepResult {
        let pressed = self.keypad.borrow().first_new_press(&self.last_keys);

        match pressed {
            Some(key) => {
                self.regfile.gprs[x] = key;

                Ok(None)
            }
            None => {
                self.regfile.rewind_pc();

                Ok(Some(CpuEvent::WaitForKey))
            }
        }
    }

    /// Whether the key named by Vx is held
    fn key_pressed(&self, x: usize) -> bool {
        self.keypad.borrow().is_key_pressed(self.regfile.gprs[x])
    }

    fn bump_index(&mut self, x: usize) {
        if self.quirks.load_store_increments_index {
            self.regfile.index = self.regfile.index.wrapping_add(x as u16 + 1);
        }
    }
}
