/// Raw 16-bit instruction word with its nibble fields
///
/// ```text
/// [F X Y N]
///  | | | `-- n   (low nibble), kk = low byte, nnn = low 12 bits
///  | | `---- y   (register index)
///  | `------ x   (register index)
///  `-------- family
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    pub fn new(opcode: u16) -> Self {
        Self(opcode)
    }

    pub fn raw(&self) -> u16 {
        self.0
    }

    /// Instruction family (top nibble)
    pub fn family(&self) -> u8 {
        (self.raw() >> 12) as u8
    }

    pub fn kk(&self) -> u8 {
        (self.raw() & 0xFF) as u8
    }

    pub fn n(&self) -> u8 {
        (self.raw() & 0xF) as u8
    }

    pub fn nnn(&self) -> u16 {
        self.raw() & 0xFFF
    }

    pub fn x(&self) -> usize {
        ((self.raw() >> 8) & 0xF) as usize
    }

    pub fn y(&self) -> usize {
        ((self.raw() >> 4) & 0xF) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        let op = Opcode::new(0xD4A7);

        assert_eq!(op.family(), 0xD);
        assert_eq!(op.x(), 0x4);
        assert_eq!(op.y(), 0xA);
        assert_eq!(op.n(), 0x7);
        assert_eq!(op.kk(), 0xA7);
        assert_eq!(op.nnn(), 0x4A7);
    }
}
