use crate::error::Chip8Error;
use std::io;
use std::io::Read;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the machine's flat address space
pub trait MemoryMap {
    /// read one byte; the address wraps into the 12-bit range
    fn read_byte(&self, addr: u16) -> u8;

    /// write one byte; the address wraps into the 12-bit range
    fn write_byte(&mut self, addr: u16, value: u8);

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: u16) -> u16 {
        ((self.read_byte(addr) as u16) << 8) | (self.read_byte(addr.wrapping_add(1)) as u16)
    }

    /// write a chunk of bytes, wrapping at the top of memory
    fn write(&mut self, data: &[u8], addr: u16) {
        for (n, b) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(n as u16), *b);
        }
    }

    /// get a r/o slice of the underlying memory; no wrapping here
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// every effective address is masked with this
pub const CHIP8_ADDR_MASK: u16 = 0x0fff;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// the biggest image that fits between the program origin and the top of RAM
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

pub const CHIP8_FONT_ADDR: u16 = 0x050;

/// bytes per glyph in the font table
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map
///   0x0000-0x01ff  reserved (font at 0x050-0x09f)
///   0x0200-0x0fff  program
pub struct Chip8MemoryMap {
    bytes: Box<[u8; CHIP8_RAM_SIZE_BYTES]>,
    pub program_addr: u16,
    pub font_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[(addr & CHIP8_ADDR_MASK) as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & CHIP8_ADDR_MASK) as usize] = value;
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.bytes[a..(a + len)]
    }
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: Box::new([0u8; CHIP8_RAM_SIZE_BYTES]),
            program_addr: CHIP8_PROGRAM_ADDR,
            font_addr: CHIP8_FONT_ADDR,
        };
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// load a CHIP-8 program at 0x200, returning its length
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        // read one byte past the limit so oversized images are detected
        // without slurping an arbitrarily large file
        let mut buf = Vec::with_capacity(CHIP8_MAX_PROGRAM_BYTES);
        reader
            .take(CHIP8_MAX_PROGRAM_BYTES as u64 + 1)
            .read_to_end(&mut buf)?;
        self.load_program_bytes(&buf)
    }

    /// load an in-memory image at 0x200, returning its length
    pub fn load_program_bytes(&mut self, image: &[u8]) -> Result<usize, Chip8Error> {
        if image.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::ProgramTooLarge {
                size: image.len(),
                max: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        self.write(image, self.program_addr);
        Ok(image.len())
    }

    /// address of the glyph for the low nibble of `digit`
    pub fn glyph_addr(&self, digit: u8) -> u16 {
        self.font_addr + (digit & 0x0f) as u16 * CHIP8_FONT_GLYPH_BYTES
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
