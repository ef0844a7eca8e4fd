use crate::interpreter::KEY_COUNT;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// map of keys on the left-hand side of a qwerty keyboard to the COSMAC hex
/// keypad, which is laid out
///   1 2 3 C
///   4 5 6 D
///   7 8 9 E
///   A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// terminals only report presses, so a key counts as held for this many
/// frames after its last press (or auto-repeat)
const KEY_HOLD_FRAMES: u8 = 6;

/// The 16-key matrix. This is the one piece of state written from outside the
/// machine, possibly from another thread, so each key is an atomic flag and
/// the machine only ever sees a copied snapshot.
pub struct Keypad {
    keys: [AtomicBool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: Default::default(),
        }
    }

    pub fn set(&self, key: u8, pressed: bool) {
        self.keys[(key & 0x0f) as usize].store(pressed, Ordering::Release);
    }

    pub fn press(&self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&self, key: u8) {
        self.set(key, false);
    }

    pub fn release_all(&self) {
        for k in self.keys.iter() {
            k.store(false, Ordering::Release);
        }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0f) as usize].load(Ordering::Acquire)
    }

    /// copy of all 16 flags, taken once before a batch of steps
    pub fn snapshot(&self) -> [bool; KEY_COUNT] {
        let mut snap = [false; KEY_COUNT];
        for (s, k) in snap.iter_mut().zip(self.keys.iter()) {
            *s = k.load(Ordering::Acquire);
        }
        snap
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

/// what the host should do after polling input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Continue,
    Quit,
}

/// reads keypresses into the keypad
pub trait Input {
    /// bring the keypad up to date with whatever happened since the last
    /// frame. called once per host frame
    fn update(&mut self, keypad: &Keypad) -> Result<InputCommand, io::Error>;
}

/// simple implementation of Input, using crossterm key events from the terminal
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    held_frames: [u8; KEY_COUNT],
}

impl StdinInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held_frames: [0; KEY_COUNT],
        })
    }

    /// age held keys by one frame, releasing any that have run out
    fn decay(&mut self, keypad: &Keypad) {
        for (key, frames) in self.held_frames.iter_mut().enumerate() {
            if *frames > 0 {
                *frames -= 1;
                if *frames == 0 {
                    keypad.release(key as u8);
                }
            }
        }
    }

    fn hold(&mut self, keypad: &Keypad, key: u8) {
        self.held_frames[key as usize] = KEY_HOLD_FRAMES;
        keypad.press(key);
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("can't leave raw mode: {}", e);
        }
    }
}

impl Input for StdinInput {
    fn update(&mut self, keypad: &Keypad) -> Result<InputCommand, io::Error> {
        self.decay(keypad);
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Esc => return Ok(InputCommand::Quit),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(InputCommand::Quit)
                    }
                    KeyCode::Char(key) => {
                        match self.keymap.get(&key.to_ascii_lowercase()).copied() {
                            Some(mapped_key) => self.hold(keypad, mapped_key),
                            None => debug!("can't map {:?} to a COSMAC key", key),
                        }
                    }
                    other => debug!("ignoring key event {:?}", other),
                },
                other => debug!("ignoring terminal event {:?}", other),
            }
        }
        Ok(InputCommand::Continue)
    }
}

/// dummy Input implementation for testing: plays back one keypad state per
/// frame, then quits
pub struct DummyInput {
    frames: Vec<[bool; KEY_COUNT]>,
    next: usize,
    quit_when_done: bool,
}

impl DummyInput {
    pub fn new(frames: &[[bool; KEY_COUNT]]) -> Self {
        DummyInput {
            frames: Vec::from(frames),
            next: 0,
            quit_when_done: true,
        }
    }

    /// no keys, ever, and never asks to quit
    pub fn idle() -> Self {
        DummyInput {
            frames: Vec::new(),
            next: 0,
            quit_when_done: false,
        }
    }
}

impl Input for DummyInput {
    fn update(&mut self, keypad: &Keypad) -> Result<InputCommand, io::Error> {
        match self.frames.get(self.next) {
            Some(frame) => {
                for (key, &pressed) in frame.iter().enumerate() {
                    keypad.set(key as u8, pressed);
                }
                self.next += 1;
                Ok(InputCommand::Continue)
            }
            None if self.quit_when_done => Ok(InputCommand::Quit),
            None => {
                keypad.release_all();
                Ok(InputCommand::Continue)
            }
        }
    }
}
