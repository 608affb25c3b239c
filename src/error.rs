use thiserror::Error;

/// Every way a load or a step can fail
#[derive(Debug, Error)]
pub enum Error {
    #[error("memory access out of bounds at {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("call stack overflow: subroutine nesting exceeds 16 levels")]
    StackOverflow,

    #[error("call stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {0:#06X}")]
    UnknownOpcode(u16),

    #[error("program image is {size} bytes, at most {max} bytes fit")]
    ImageTooLarge { size: usize, max: usize },

    #[error("failed to read ROM")]
    RomRead(#[from] std::io::Error),

    #[error("window error")]
    Window(#[from] minifb::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
