use crate::{
    bus::{memory::Memory, Bus},
    cpu::{Cpu, CpuEvent, Quirks, RandomSource, RngSource},
    display::Display,
    keypad::Keypad,
};

use log::{info, warn};
use std::{cell::RefCell, path::PathBuf, rc::Rc};

pub use clap::Parser;
pub use error::{Error, Result};
pub use minifb::{Key, Scale, Window, WindowOptions};

pub mod bus;
pub mod cpu;
pub mod display;
pub mod error;
pub mod keypad;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to Chip-8 ROM
    pub rom_path: PathBuf,

    /// Instructions executed per 60 Hz frame
    #[arg(long, default_value_t = Cpu::STEPS)]
    pub steps_per_frame: usize,

    /// Original COSMAC VIP behavior for shifts and register load/store
    #[arg(long)]
    pub cosmac_vip: bool,

    /// 8xy6/8xyE shift Vy into Vx
    #[arg(long)]
    pub shift_vy: bool,

    /// Fx55/Fx65 advance I past the last register
    #[arg(long)]
    pub increment_index: bool,

    /// Seed for a reproducible random sequence
    #[arg(long)]
    pub seed: Option<u64>,

    /// Window scale factor: 1, 2, 4, 8, 16 or 32
    #[arg(long, default_value_t = 8, value_parser = parse_scale)]
    pub scale: u8,
}

fn parse_scale(value: &str) -> std::result::Result<u8, String> {
    match value.parse::<u8>() {
        Ok(scale @ (1 | 2 | 4 | 8 | 16 | 32)) => Ok(scale),
        _ => Err(format!("expected 1, 2, 4, 8, 16 or 32, got {}", value)),
    }
}

impl Args {
    pub fn quirks(&self) -> Quirks {
        if self.cosmac_vip {
            return Quirks::cosmac_vip();
        }

        Quirks {
            shift_uses_vy: self.shift_vy,
            load_store_increments_index: self.increment_index,
        }
    }

    pub fn window_scale(&self) -> Scale {
        match self.scale {
            1 => Scale::X1,
            2 => Scale::X2,
            4 => Scale::X4,
            16 => Scale::X16,
            32 => Scale::X32,
            // other values are rejected by parse_scale
            _ => Scale::X8,
        }
    }
}

/// Drives the CPU from a window: keyboard in, framebuffer out, timers at 60 Hz
pub struct Core {
    cpu: Cpu,
    display: Rc<RefCell<Display>>,
    keypad: Rc<RefCell<Keypad>>,
    steps_per_frame: usize,
    scale: Scale,
}

impl Core {
    pub fn new(args: Args) -> Result<Self> {
        let rom = std::fs::read(&args.rom_path)?;

        info!("loaded {} ({} bytes)", args.rom_path.display(), rom.len());

        let rng: Box<dyn RandomSource> = match args.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::from_entropy()),
        };

        let mut core = Self::from_image(&rom, args.quirks(), rng)?;
        core.steps_per_frame = args.steps_per_frame;
        core.scale = args.window_scale();

        Ok(core)
    }

    /// Core for an in-memory program image
    pub fn from_image(image: &[u8], quirks: Quirks, rng: Box<dyn RandomSource>) -> Result<Self> {
        let mut bus = Bus::new(Memory::default());
        bus.load_image(image)?;

        let display = Rc::new(RefCell::new(Display::default()));
        let keypad = Rc::new(RefCell::new(Keypad::default()));

        Ok(Self {
            cpu: Cpu::new(bus, display.clone(), keypad.clone()).with_rng(rng).with_quirks(quirks),
            display,
            keypad,
            steps_per_frame: Cpu::STEPS,
            scale: Scale::X8,
        })
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// One 60 Hz frame: tick timers once, then step until the frame budget is spent
    /// or the CPU draws or blocks on a key
    pub fn run_frame(&mut self) -> Result<()> {
        self.cpu.tick();

        for _ in 0..self.steps_per_frame {
            if let Some(event) = self.cpu.step()? {
                match event {
                    CpuEvent::Draw | CpuEvent::WaitForKey => break,
                }
            }
        }

        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        let mut window = Window::new(
            "chip8vm",
            Display::WIDTH,
            Display::HEIGHT,
            WindowOptions { scale: self.scale, scale_mode: minifb::ScaleMode::Center, topmost: true, ..WindowOptions::default() },
        )?;

        window.set_target_fps(60);

        let mut buffer = vec![0; Display::WIDTH * Display::HEIGHT];

        while window.is_open() && !window.is_key_down(Key::Escape) {
            self.keypad.borrow_mut().update_state(window.get_keys());

            if let Err(err) = self.run_frame() {
                warn!("halting at {:#06X}", self.cpu.regfile().pc);
                return Err(err);
            }

            self.display.borrow().render_into(&mut buffer);

            window.update_with_buffer(&buffer, Display::WIDTH, Display::HEIGHT)?;
        }

        Ok(())
    }
}
