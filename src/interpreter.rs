//! # interpreter
//!
//! Machine state for the base CHIP-8 instruction set:
//!  - 4K of memory, font at 0x050, programs load at 0x200
//!  - V0-VF, 8 bits each; VF doubles as the carry/borrow/collision flag
//!  - I, the 16-bit index register (only the low 12 bits reach memory)
//!  - a 16-deep call stack of return addresses
//!  - delay and sound timers, counted down once per host frame
//!  - 64x32 monochrome framebuffer and a 16-key snapshot
//!
//! `step()` runs exactly one instruction. fx0a (wait for key) is the only
//! instruction that can leave pc where it is: it re-runs on each step until
//! a key shows up in the snapshot.
use crate::config::Quirks;
use crate::error::Chip8Error;
use crate::framebuffer::Framebuffer;
use crate::instruction::{AluOp, Instruction, Register};
use crate::{memory, memory::MemoryMap};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io;
use std::path::Path;

pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;

const VF: Register = 0xf;

pub struct Chip8Interpreter {
    memory: memory::Chip8MemoryMap,
    v: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: [u16; STACK_DEPTH],
    stack_pointer: usize,
    delay_timer: u8,
    sound_timer: u8,
    framebuffer: Framebuffer,
    keys: [bool; KEY_COUNT],
    redraw_pending: bool,
    quirks: Quirks,
    rng: StdRng,
}

impl Chip8Interpreter {
    /// power-on state, random byte instruction seeded from the OS
    pub fn new(quirks: Quirks) -> Self {
        Self::with_rng(quirks, StdRng::from_entropy())
    }

    /// power-on state with a reproducible random byte sequence
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        Self::with_rng(quirks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(quirks: Quirks, rng: StdRng) -> Self {
        let memory = memory::Chip8MemoryMap::new();
        let program_counter = memory.program_addr;
        Chip8Interpreter {
            memory,
            v: [0; 16],
            i: 0,
            program_counter,
            stack: [0; STACK_DEPTH],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: Framebuffer::new(),
            keys: [false; KEY_COUNT],
            redraw_pending: false,
            quirks,
            rng,
        }
    }

    /// back to power-on state; quirks are kept, the random source is reseeded
    pub fn reset(&mut self) {
        *self = Self::new(self.quirks);
    }

    /// load a chip8 program from any reader
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        let len = self.memory.load_program(reader)?;
        info!("loaded {} byte program at {:#05x}", len, self.memory.program_addr);
        Ok(len)
    }

    /// load a chip8 program already in memory
    pub fn load_program_bytes(&mut self, image: &[u8]) -> Result<usize, Chip8Error> {
        let len = self.memory.load_program_bytes(image)?;
        info!("loaded {} byte program at {:#05x}", len, self.memory.program_addr);
        Ok(len)
    }

    /// load a chip8 program from a file
    pub fn load_rom_from_path(&mut self, path: impl AsRef<Path>) -> Result<usize, Chip8Error> {
        let mut f = File::open(path)?;
        let size = f.metadata()?.len() as usize;
        if size > memory::CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::ProgramTooLarge {
                size,
                max: memory::CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        self.load_program(&mut f)
    }

    /// count both timers down by one, stopping at zero. call once per host
    /// frame, not once per instruction
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// fetch, decode and execute one instruction, returning the opcode.
    ///
    /// run-time faults come back as `Err` once their effect on the machine
    /// has been applied:
    ///  - unknown opcode: skipped
    ///  - stack overflow: the call is not taken and pc moves past it
    ///  - stack underflow: pc stays on the return, which halts the program
    pub fn step(&mut self) -> Result<u16, Chip8Error> {
        let pc = self.program_counter;
        let opcode = self.memory.get_word(pc);
        self.execute(Instruction::decode(opcode), pc)?;
        Ok(opcode)
    }

    fn execute(&mut self, instruction: Instruction, pc: u16) -> Result<(), Chip8Error> {
        match instruction {
            Instruction::ClearScreen => {
                self.framebuffer.clear();
                self.redraw_pending = true;
                self.advance();
            }
            Instruction::Return => {
                if self.stack_pointer == 0 {
                    return Err(Chip8Error::StackUnderflow { pc });
                }
                self.stack_pointer -= 1;
                // the saved address already points past the call
                self.program_counter = self.stack[self.stack_pointer];
            }
            Instruction::Jump(addr) => self.program_counter = addr,
            Instruction::Call(addr) => {
                if self.stack_pointer == STACK_DEPTH {
                    self.advance();
                    return Err(Chip8Error::StackOverflow { pc, target: addr });
                }
                self.stack[self.stack_pointer] = pc.wrapping_add(2);
                self.stack_pointer += 1;
                self.program_counter = addr;
            }
            Instruction::SkipIfEqual { x, byte } => self.skip_if(self.v[x] == byte),
            Instruction::SkipIfNotEqual { x, byte } => self.skip_if(self.v[x] != byte),
            Instruction::SkipIfRegistersEqual { x, y } => self.skip_if(self.v[x] == self.v[y]),
            Instruction::Load { x, byte } => {
                self.v[x] = byte;
                self.advance();
            }
            Instruction::AddImmediate { x, byte } => {
                self.v[x] = self.v[x].wrapping_add(byte);
                self.advance();
            }
            Instruction::Alu { op, x, y } => {
                self.alu(op, x, y);
                self.advance();
            }
            Instruction::SkipIfRegistersNotEqual { x, y } => self.skip_if(self.v[x] != self.v[y]),
            Instruction::LoadIndex(addr) => {
                self.i = addr;
                self.advance();
            }
            Instruction::JumpOffset(addr) => {
                self.program_counter = self.v[0] as u16 + addr;
            }
            Instruction::Random { x, mask } => {
                self.v[x] = self.rng.gen::<u8>() & mask;
                self.advance();
            }
            Instruction::Draw { x, y, height } => {
                self.draw_sprite(x, y, height);
                self.advance();
            }
            Instruction::SkipIfKey(x) => self.skip_if(self.key_for(x)),
            Instruction::SkipIfNotKey(x) => self.skip_if(!self.key_for(x)),
            Instruction::ReadDelay(x) => {
                self.v[x] = self.delay_timer;
                self.advance();
            }
            Instruction::WaitKey(x) => {
                // no key: leave everything alone and run this again next step
                if let Some(key) = self.keys.iter().position(|&pressed| pressed) {
                    self.v[x] = key as u8;
                    self.advance();
                }
            }
            Instruction::SetDelay(x) => {
                self.delay_timer = self.v[x];
                self.advance();
            }
            Instruction::SetSound(x) => {
                self.sound_timer = self.v[x];
                self.advance();
            }
            Instruction::AddIndex(x) => {
                self.i = self.i.wrapping_add(self.v[x] as u16);
                self.advance();
            }
            Instruction::LoadGlyph(x) => {
                self.i = self.memory.glyph_addr(self.v[x]);
                self.advance();
            }
            Instruction::StoreBcd(x) => {
                let value = self.v[x];
                self.memory.write(&[value / 100, (value / 10) % 10, value % 10], self.i);
                self.advance();
            }
            Instruction::StoreRegisters(x) => {
                for r in 0..=x {
                    self.memory.write_byte(self.i.wrapping_add(r as u16), self.v[r]);
                }
                self.bump_index(x);
                self.advance();
            }
            Instruction::LoadRegisters(x) => {
                for r in 0..=x {
                    self.v[r] = self.memory.read_byte(self.i.wrapping_add(r as u16));
                }
                self.bump_index(x);
                self.advance();
            }
            Instruction::Unknown(opcode) => {
                self.advance();
                return Err(Chip8Error::UnknownOpcode { opcode, pc });
            }
        }
        Ok(())
    }

    /// 8xyn. VF is written before the result, so with x == F the result wins
    fn alu(&mut self, op: AluOp, x: Register, y: Register) {
        let (vx, vy) = (self.v[x], self.v[y]);
        match op {
            AluOp::Copy => self.v[x] = vy,
            AluOp::Or => self.v[x] = vx | vy,
            AluOp::And => self.v[x] = vx & vy,
            AluOp::Xor => self.v[x] = vx ^ vy,
            AluOp::Add => {
                let (sum, carry) = vx.overflowing_add(vy);
                self.v[VF] = carry as u8;
                self.v[x] = sum;
            }
            AluOp::Sub => {
                self.v[VF] = (vx > vy) as u8;
                self.v[x] = vx.wrapping_sub(vy);
            }
            AluOp::ShiftRight => {
                self.v[VF] = vx & 0x01;
                self.v[x] = vx >> 1;
            }
            AluOp::SubN => {
                self.v[VF] = (vy > vx) as u8;
                self.v[x] = vy.wrapping_sub(vx);
            }
            AluOp::ShiftLeft => {
                self.v[VF] = (vx & 0x80) >> 7;
                self.v[x] = vx << 1;
            }
        }
    }

    /// dxyn: 8 pixels wide, `height` rows from I, wrapping per pixel
    fn draw_sprite(&mut self, x: Register, y: Register, height: u8) {
        let origin_x = self.v[x] as usize;
        let origin_y = self.v[y] as usize;
        self.v[VF] = 0;
        for row in 0..height as usize {
            let bits = self.memory.read_byte(self.i.wrapping_add(row as u16));
            for col in 0..8 {
                if bits & (0x80 >> col) != 0 && self.framebuffer.flip(origin_x + col, origin_y + row)
                {
                    self.v[VF] = 1;
                }
            }
        }
        self.redraw_pending = true;
    }

    fn key_for(&self, x: Register) -> bool {
        self.keys[(self.v[x] & 0x0f) as usize]
    }

    fn bump_index(&mut self, x: Register) {
        if self.quirks.increment_index_on_load_store {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
    }

    fn skip_if(&mut self, condition: bool) {
        self.program_counter = self
            .program_counter
            .wrapping_add(if condition { 4 } else { 2 });
    }

    fn advance(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2);
    }

    /// replace the keypad snapshot; call before each frame's batch of steps
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        self.keys[key & 0x0f] = pressed;
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// true once the framebuffer has changed since the last `clear_redraw()`
    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    pub fn clear_redraw(&mut self) {
        self.redraw_pending = false;
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack_pointer(&self) -> usize {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn memory(&self) -> &impl MemoryMap {
        &self.memory
    }
}
