use crate::{
    cpu::opcode::Opcode,
    error::{Error, Result},
};

/// Every Chip-8 instruction, with the operand fields it uses
///
/// Register operands are indices 0x0-0xF, addresses are 12-bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: machine code routine, ignored
    Sys { nnn: u16 },
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp { nnn: u16 },
    /// 2nnn
    Call { nnn: u16 },
    /// 3xkk
    SeImm { x: usize, kk: u8 },
    /// 4xkk
    SneImm { x: usize, kk: u8 },
    /// 5xy0
    SeReg { x: usize, y: usize },
    /// 6xkk
    LdImm { x: usize, kk: u8 },
    /// 7xkk
    AddImm { x: usize, kk: u8 },
    /// 8xy0
    LdReg { x: usize, y: usize },
    /// 8xy1
    Or { x: usize, y: usize },
    /// 8xy2
    And { x: usize, y: usize },
    /// 8xy3
    Xor { x: usize, y: usize },
    /// 8xy4
    AddReg { x: usize, y: usize },
    /// 8xy5
    Sub { x: usize, y: usize },
    /// 8xy6
    Shr { x: usize, y: usize },
    /// 8xy7
    Subn { x: usize, y: usize },
    /// 8xyE
    Shl { x: usize, y: usize },
    /// 9xy0
    SneReg { x: usize, y: usize },
    /// Annn
    LdI { nnn: u16 },
    /// Bnnn
    JpV0 { nnn: u16 },
    /// Cxkk
    Rnd { x: usize, kk: u8 },
    /// Dxyn
    Drw { x: usize, y: usize, n: u8 },
    /// Ex9E
    Skp { x: usize },
    /// ExA1
    Sknp { x: usize },
    /// Fx07
    LdVxDt { x: usize },
    /// Fx0A
    LdVxK { x: usize },
    /// Fx15
    LdDtVx { x: usize },
    /// Fx18
    LdStVx { x: usize },
    /// Fx1E
    AddI { x: usize },
    /// Fx29
    LdF { x: usize },
    /// Fx33
    Bcd { x: usize },
    /// Fx55
    Store { x: usize },
    /// Fx65
    Load { x: usize },
}

impl Instruction {
    /// Selects the instruction for an opcode
    ///
    /// The family nibble picks the instruction directly except for families 0x0, 0x8,
    /// 0xE and 0xF, which are further split on their low byte or low nibble.
    pub fn decode(opcode: Opcode) -> Result<Self> {
        use Instruction::*;

        let (x, y, n, kk, nnn) = (opcode.x(), opcode.y(), opcode.n(), opcode.kk(), opcode.nnn());

        let instruction = match opcode.family() {
            0x0 => match nnn {
                0x0E0 => Cls,
                0x0EE => Ret,
                _ => Sys { nnn },
            },
            0x1 => Jp { nnn },
            0x2 => Call { nnn },
            0x3 => SeImm { x, kk },
            0x4 => SneImm { x, kk },
            0x5 if n == 0x0 => SeReg { x, y },
            0x6 => LdImm { x, kk },
            0x7 => AddImm { x, kk },
            0x8 => match n {
                0x0 => LdReg { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => Sub { x, y },
                0x6 => Shr { x, y },
                0x7 => Subn { x, y },
                0xE => Shl { x, y },
                _ => return Err(Error::UnknownOpcode(opcode.raw())),
            },
            0x9 if n == 0x0 => SneReg { x, y },
            0xA => LdI { nnn },
            0xB => JpV0 { nnn },
            0xC => Rnd { x, kk },
            0xD => Drw { x, y, n },
            0xE => match kk {
                0x9E => Skp { x },
                0xA1 => Sknp { x },
                _ => return Err(Error::UnknownOpcode(opcode.raw())),
            },
            0xF => match kk {
                0x07 => LdVxDt { x },
                0x0A => LdVxK { x },
                0x15 => LdDtVx { x },
                0x18 => LdStVx { x },
                0x1E => AddI { x },
                0x29 => LdF { x },
                0x33 => Bcd { x },
                0x55 => Store { x },
                0x65 => Load { x },
                _ => return Err(Error::UnknownOpcode(opcode.raw())),
            },
            _ => return Err(Error::UnknownOpcode(opcode.raw())),
        };

        Ok(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Instruction::*;

    fn decode(raw: u16) -> Result<Instruction> {
        Instruction::decode(Opcode::new(raw))
    }

    #[test]
    fn test_family_0() {
        assert_eq!(decode(0x00E0).unwrap(), Cls);
        assert_eq!(decode(0x00EE).unwrap(), Ret);
        assert_eq!(decode(0x0123).unwrap(), Sys { nnn: 0x123 });
    }

    #[test]
    fn test_direct_families() {
        assert_eq!(decode(0x1ABC).unwrap(), Jp { nnn: 0xABC });
        assert_eq!(decode(0x2ABC).unwrap(), Call { nnn: 0xABC });
        assert_eq!(decode(0x3A42).unwrap(), SeImm { x: 0xA, kk: 0x42 });
        assert_eq!(decode(0x4A42).unwrap(), SneImm { x: 0xA, kk: 0x42 });
        assert_eq!(decode(0x5AB0).unwrap(), SeReg { x: 0xA, y: 0xB });
        assert_eq!(decode(0x6A42).unwrap(), LdImm { x: 0xA, kk: 0x42 });
        assert_eq!(decode(0x7A42).unwrap(), AddImm { x: 0xA, kk: 0x42 });
        assert_eq!(decode(0x9AB0).unwrap(), SneReg { x: 0xA, y: 0xB });
        assert_eq!(decode(0xA123).unwrap(), LdI { nnn: 0x123 });
        assert_eq!(decode(0xB123).unwrap(), JpV0 { nnn: 0x123 });
        assert_eq!(decode(0xC3FF).unwrap(), Rnd { x: 0x3, kk: 0xFF });
        assert_eq!(decode(0xD125).unwrap(), Drw { x: 0x1, y: 0x2, n: 0x5 });
    }

    #[test]
    fn test_family_8() {
        assert_eq!(decode(0x8120).unwrap(), LdReg { x: 1, y: 2 });
        assert_eq!(decode(0x8121).unwrap(), Or { x: 1, y: 2 });
        assert_eq!(decode(0x8122).unwrap(), And { x: 1, y: 2 });
        assert_eq!(decode(0x8123).unwrap(), Xor { x: 1, y: 2 });
        assert_eq!(decode(0x8124).unwrap(), AddReg { x: 1, y: 2 });
        assert_eq!(decode(0x8125).unwrap(), Sub { x: 1, y: 2 });
        assert_eq!(decode(0x8126).unwrap(), Shr { x: 1, y: 2 });
        assert_eq!(decode(0x8127).unwrap(), Subn { x: 1, y: 2 });
        assert_eq!(decode(0x812E).unwrap(), Shl { x: 1, y: 2 });
    }

    #[test]
    fn test_families_e_and_f() {
        assert_eq!(decode(0xE59E).unwrap(), Skp { x: 5 });
        assert_eq!(decode(0xE5A1).unwrap(), Sknp { x: 5 });
        assert_eq!(decode(0xF507).unwrap(), LdVxDt { x: 5 });
        assert_eq!(decode(0xF50A).unwrap(), LdVxK { x: 5 });
        assert_eq!(decode(0xF515).unwrap(), LdDtVx { x: 5 });
        assert_eq!(decode(0xF518).unwrap(), LdStVx { x: 5 });
        assert_eq!(decode(0xF51E).unwrap(), AddI { x: 5 });
        assert_eq!(decode(0xF529).unwrap(), LdF { x: 5 });
        assert_eq!(decode(0xF533).unwrap(), Bcd { x: 5 });
        assert_eq!(decode(0xF555).unwrap(), Store { x: 5 });
        assert_eq!(decode(0xF565).unwrap(), Load { x: 5 });
    }

    #[test]
    fn test_unknown_opcodes_carry_raw_word() {
        for raw in [0x5121, 0x8128, 0x812F, 0x9121, 0xE19F, 0xF1FF, 0xF100] {
            match decode(raw) {
                Err(Error::UnknownOpcode(word)) => assert_eq!(word, raw),
                other => panic!("{:04X} decoded to {:?}", raw, other),
            }
        }
    }
}
