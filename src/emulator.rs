//! The host run-loop: once per frame it polls input, runs a batch of
//! instructions, ticks the timers, follows the sound timer and redraws if the
//! framebuffer changed, then sleeps off the rest of the frame.
use crate::config::RunConfig;
use crate::display::Display;
use crate::error::{Chip8Error, HostError};
use crate::input::{Input, InputCommand, Keypad};
use crate::instruction::Instruction;
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// how a frame ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Running,
    Quit,
}

pub struct Emulator<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    keypad: Arc<Keypad>,
    config: RunConfig,
    frames: u64,
}

impl<'a> Emulator<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: RunConfig,
    ) -> Self {
        Emulator {
            interpreter,
            display,
            input,
            sound,
            keypad: Arc::new(Keypad::new()),
            config,
            frames: 0,
        }
    }

    /// the keypad, for feeding keys from another thread
    pub fn keypad(&self) -> Arc<Keypad> {
        Arc::clone(&self.keypad)
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// run one host frame
    pub fn run_frame(&mut self) -> Result<FrameOutcome, HostError> {
        if self.input.update(&self.keypad)? == InputCommand::Quit {
            return Ok(FrameOutcome::Quit);
        }
        self.interpreter.set_keys(self.keypad.snapshot());

        for _ in 0..self.config.cycles_per_frame {
            match self.interpreter.step() {
                Ok(opcode) => {
                    if self.config.trace {
                        debug!(
                            "opcode {:04x} {:?} (pc={:03x})",
                            opcode,
                            Instruction::decode(opcode),
                            self.interpreter.program_counter()
                        );
                    }
                }
                Err(e @ Chip8Error::StackUnderflow { .. }) => {
                    // pc can't move past a return with nothing to return to
                    error!("{}", e);
                    return Err(HostError::Halted(e));
                }
                Err(e) if e.is_runtime() => warn!("{}", e),
                Err(e) => return Err(HostError::Halted(e)),
            }
        }

        self.interpreter.tick_timers();
        self.sound
            .follow_timer(self.interpreter.sound_timer())
            .map_err(|e| HostError::Sound(e.to_string()))?;

        if self.interpreter.redraw_pending() {
            self.display.draw(self.interpreter.framebuffer())?;
            self.interpreter.clear_redraw();
        }
        self.frames += 1;
        Ok(FrameOutcome::Running)
    }

    /// run frames until input asks to quit, the frame limit is reached, or
    /// the machine halts
    pub fn main_loop(&mut self) -> Result<(), HostError> {
        let frame_duration = self.config.frame_duration();
        info!(
            "running {} instructions per frame at {} Hz{}",
            self.config.cycles_per_frame,
            self.config.frame_rate,
            if self.config.pacing { "" } else { " (unpaced)" }
        );
        loop {
            if let Some(max) = self.config.max_frames {
                if self.frames >= max {
                    break;
                }
            }
            let start = Instant::now();
            if self.run_frame()? == FrameOutcome::Quit {
                info!("quit after {} frames", self.frames);
                break;
            }
            if self.config.pacing {
                if let Some(rest) = frame_duration.checked_sub(start.elapsed()) {
                    spin_sleep::sleep(rest);
                }
            }
        }
        // don't leave a tone running
        self.sound
            .stop()
            .map_err(|e| HostError::Sound(e.to_string()))?;
        Ok(())
    }
}
