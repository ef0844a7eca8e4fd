use beep::beep;
use std::error::Error;

/// on/off tone, driven by the sound timer being non-zero
pub trait Sound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
    fn is_beeping(&self) -> bool;

    /// start or stop the tone to match the sound timer
    fn follow_timer(&mut self, sound_timer: u8) -> Result<(), Box<dyn Error>> {
        match (sound_timer > 0, self.is_beeping()) {
            (true, false) => self.beep(),
            (false, true) => self.stop(),
            _ => Ok(()),
        }
    }
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker beep via the console
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        beep(SIMPLEBEEP_PITCH)?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        beep(0)?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

/// silence, but still tracks whether it would be beeping
#[derive(Default)]
pub struct Mute {
    is_beeping: bool,
}

impl Mute {
    pub fn new() -> Self {
        Mute { is_beeping: false }
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}
