use std::io;
use thiserror::Error;

/// Everything the virtual machine itself can report, at load time or while stepping
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("cannot read program: {0}")]
    Io(#[from] io::Error),

    #[error("program too large ({size} bytes), at most {max} bytes fit above 0x200")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("stack overflow calling {target:#05x} at pc {pc:#05x}")]
    StackOverflow { pc: u16, target: u16 },

    #[error("stack underflow returning at pc {pc:#05x}")]
    StackUnderflow { pc: u16 },

    #[error("unknown opcode {opcode:#06x} at pc {pc:#05x}")]
    UnknownOpcode { opcode: u16, pc: u16 },
}

impl Chip8Error {
    /// run-time faults are reported by `step()` after the machine state has
    /// already been updated; the caller may keep stepping
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            Chip8Error::StackOverflow { .. }
                | Chip8Error::StackUnderflow { .. }
                | Chip8Error::UnknownOpcode { .. }
        )
    }
}

/// errors from the host side: terminal, sound device, or a halted machine
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("sound device: {0}")]
    Sound(String),

    #[error("machine halted: {0}")]
    Halted(Chip8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_classification() {
        assert!(Chip8Error::StackUnderflow { pc: 0x200 }.is_runtime());
        assert!(Chip8Error::UnknownOpcode { opcode: 0xffff, pc: 0x200 }.is_runtime());
        assert!(!Chip8Error::ProgramTooLarge { size: 3600, max: 3584 }.is_runtime());
    }

    #[test]
    fn test_messages() {
        let e = Chip8Error::UnknownOpcode {
            opcode: 0x5121,
            pc: 0x204,
        };
        assert_eq!(e.to_string(), "unknown opcode 0x5121 at pc 0x204");
        let e = Chip8Error::ProgramTooLarge { size: 3600, max: 3584 };
        assert_eq!(
            e.to_string(),
            "program too large (3600 bytes), at most 3584 bytes fit above 0x200"
        );
    }
}
