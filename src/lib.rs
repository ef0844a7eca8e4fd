//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the machine is bit-exact to the base instruction set; no SUPER-CHIP
//! * one `step()` is one instruction; timers tick once per host frame, so
//!   real-time behaviour doesn't depend on how many instructions a frame runs
//! * the machine doesn't know how it is shown or played; the host owns the
//!   display, input and sound and talks to the machine through:
//!    - `set_keys()`, a snapshot of the 16-key pad taken once per frame
//!    - `framebuffer()` plus `redraw_pending()`/`clear_redraw()`
//!    - `sound_timer()`
//! * run-time faults (unknown opcode, stack over/underflow) are returned from
//!   `step()` after they have been dealt with; the host decides to log them
//!   and carry on, or stop
//!
//! Model
//!
//! Emulator (host)
//!  |-- display, input, sound, run config
//!  |-- keypad (shared, may be written from another thread)
//!  |-- interpreter(quirks)
//!  |    |-- memory map (font, program)
//!  |    |-- instruction decoder
//!  |    `-- registers, stack, timers, framebuffer
//!  `-- main loop
//!       |-- input.update(keypad); interpreter.set_keys(keypad.snapshot())
//!       |-- cycles_per_frame x interpreter.step()
//!       |-- interpreter.tick_timers(); sound.follow_timer(..)
//!       |-- if redraw pending: display.draw(..)
//!       `-- sleep out the rest of the frame
pub mod config;
pub mod display;
pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod selector;
pub mod sound;

pub use config::{Quirks, RunConfig};
pub use error::{Chip8Error, HostError};
pub use interpreter::Chip8Interpreter;
