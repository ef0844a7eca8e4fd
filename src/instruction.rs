//! # instruction set
//!
//! Every instruction is one big-endian 16-bit word. Fields:
//!
//! | field | bits        | meaning                      |
//! |-------|-------------|------------------------------|
//! | c     | 0xf000      | opcode group                 |
//! | x     | 0x0f00      | register Vx                  |
//! | y     | 0x00f0      | register Vy                  |
//! | n     | 0x000f      | sub-opcode / sprite height   |
//! | kk    | 0x00ff      | immediate byte               |
//! | nnn   | 0x0fff      | address                      |

/// register index, 0..=15
pub type Register = usize;

/// the register-vs-register arithmetic/logic group, 8xyn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Copy,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubN,
    ShiftLeft,
}

/// a decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00e0
    ClearScreen,
    /// 00ee
    Return,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SkipIfEqual { x: Register, byte: u8 },
    /// 4xkk
    SkipIfNotEqual { x: Register, byte: u8 },
    /// 5xy0
    SkipIfRegistersEqual { x: Register, y: Register },
    /// 6xkk
    Load { x: Register, byte: u8 },
    /// 7xkk
    AddImmediate { x: Register, byte: u8 },
    /// 8xyn
    Alu { op: AluOp, x: Register, y: Register },
    /// 9xy0
    SkipIfRegistersNotEqual { x: Register, y: Register },
    /// annn
    LoadIndex(u16),
    /// bnnn
    JumpOffset(u16),
    /// cxkk
    Random { x: Register, mask: u8 },
    /// dxyn
    Draw { x: Register, y: Register, height: u8 },
    /// ex9e
    SkipIfKey(Register),
    /// exa1
    SkipIfNotKey(Register),
    /// fx07
    ReadDelay(Register),
    /// fx0a
    WaitKey(Register),
    /// fx15
    SetDelay(Register),
    /// fx18
    SetSound(Register),
    /// fx1e
    AddIndex(Register),
    /// fx29
    LoadGlyph(Register),
    /// fx33
    StoreBcd(Register),
    /// fx55
    StoreRegisters(Register),
    /// fx65
    LoadRegisters(Register),
    /// anything else; carries the raw word
    Unknown(u16),
}

impl Instruction {
    /// decode is total; words outside the base set come back as `Unknown`
    pub fn decode(opcode: u16) -> Instruction {
        let x = ((opcode & 0x0f00) >> 8) as Register;
        let y = ((opcode & 0x00f0) >> 4) as Register;
        let n = (opcode & 0x000f) as u8;
        let kk = (opcode & 0x00ff) as u8;
        let nnn = opcode & 0x0fff;

        match opcode >> 12 {
            0x0 => match opcode {
                0x00e0 => Instruction::ClearScreen,
                0x00ee => Instruction::Return,
                _ => Instruction::Unknown(opcode),
            },
            0x1 => Instruction::Jump(nnn),
            0x2 => Instruction::Call(nnn),
            0x3 => Instruction::SkipIfEqual { x, byte: kk },
            0x4 => Instruction::SkipIfNotEqual { x, byte: kk },
            0x5 if n == 0 => Instruction::SkipIfRegistersEqual { x, y },
            0x6 => Instruction::Load { x, byte: kk },
            0x7 => Instruction::AddImmediate { x, byte: kk },
            0x8 => {
                let op = match n {
                    0x0 => AluOp::Copy,
                    0x1 => AluOp::Or,
                    0x2 => AluOp::And,
                    0x3 => AluOp::Xor,
                    0x4 => AluOp::Add,
                    0x5 => AluOp::Sub,
                    0x6 => AluOp::ShiftRight,
                    0x7 => AluOp::SubN,
                    0xe => AluOp::ShiftLeft,
                    _ => return Instruction::Unknown(opcode),
                };
                Instruction::Alu { op, x, y }
            }
            0x9 if n == 0 => Instruction::SkipIfRegistersNotEqual { x, y },
            0xa => Instruction::LoadIndex(nnn),
            0xb => Instruction::JumpOffset(nnn),
            0xc => Instruction::Random { x, mask: kk },
            0xd => Instruction::Draw { x, y, height: n },
            0xe => match kk {
                0x9e => Instruction::SkipIfKey(x),
                0xa1 => Instruction::SkipIfNotKey(x),
                _ => Instruction::Unknown(opcode),
            },
            0xf => match kk {
                0x07 => Instruction::ReadDelay(x),
                0x0a => Instruction::WaitKey(x),
                0x15 => Instruction::SetDelay(x),
                0x18 => Instruction::SetSound(x),
                0x1e => Instruction::AddIndex(x),
                0x29 => Instruction::LoadGlyph(x),
                0x33 => Instruction::StoreBcd(x),
                0x55 => Instruction::StoreRegisters(x),
                0x65 => Instruction::LoadRegisters(x),
                _ => Instruction::Unknown(opcode),
            },
            _ => Instruction::Unknown(opcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        assert_eq!(Instruction::decode(0x1abc), Instruction::Jump(0xabc));
        assert_eq!(Instruction::decode(0x2f00), Instruction::Call(0xf00));
        assert_eq!(
            Instruction::decode(0x3a42),
            Instruction::SkipIfEqual { x: 0xa, byte: 0x42 }
        );
        assert_eq!(
            Instruction::decode(0xd12f),
            Instruction::Draw { x: 1, y: 2, height: 15 }
        );
        assert_eq!(
            Instruction::decode(0xc3f0),
            Instruction::Random { x: 3, mask: 0xf0 }
        );
    }

    #[test]
    fn test_decode_alu_group() {
        let ops = [
            (0x0, AluOp::Copy),
            (0x1, AluOp::Or),
            (0x2, AluOp::And),
            (0x3, AluOp::Xor),
            (0x4, AluOp::Add),
            (0x5, AluOp::Sub),
            (0x6, AluOp::ShiftRight),
            (0x7, AluOp::SubN),
            (0xe, AluOp::ShiftLeft),
        ];
        for (n, op) in ops {
            assert_eq!(
                Instruction::decode(0x8450 | n),
                Instruction::Alu { op, x: 4, y: 5 }
            );
        }
        for n in [0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xf] {
            assert_eq!(
                Instruction::decode(0x8450 | n),
                Instruction::Unknown(0x8450 | n)
            );
        }
    }

    #[test]
    fn test_decode_system_group() {
        assert_eq!(Instruction::decode(0x00e0), Instruction::ClearScreen);
        assert_eq!(Instruction::decode(0x00ee), Instruction::Return);
        // machine code calls are not part of the base set
        assert_eq!(Instruction::decode(0x0123), Instruction::Unknown(0x0123));
    }

    #[test]
    fn test_decode_register_compare_needs_zero_nibble() {
        assert_eq!(
            Instruction::decode(0x5120),
            Instruction::SkipIfRegistersEqual { x: 1, y: 2 }
        );
        assert_eq!(Instruction::decode(0x5121), Instruction::Unknown(0x5121));
        assert_eq!(
            Instruction::decode(0x9120),
            Instruction::SkipIfRegistersNotEqual { x: 1, y: 2 }
        );
        assert_eq!(Instruction::decode(0x912f), Instruction::Unknown(0x912f));
    }

    #[test]
    fn test_decode_key_and_misc_groups() {
        assert_eq!(Instruction::decode(0xe29e), Instruction::SkipIfKey(2));
        assert_eq!(Instruction::decode(0xe2a1), Instruction::SkipIfNotKey(2));
        assert_eq!(Instruction::decode(0xe2a2), Instruction::Unknown(0xe2a2));
        assert_eq!(Instruction::decode(0xf70a), Instruction::WaitKey(7));
        assert_eq!(Instruction::decode(0xf729), Instruction::LoadGlyph(7));
        assert_eq!(Instruction::decode(0xff65), Instruction::LoadRegisters(15));
        assert_eq!(Instruction::decode(0xf0ff), Instruction::Unknown(0xf0ff));
    }
}
