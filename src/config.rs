use std::time::Duration;

/// historically-divergent behaviours, fixed when the machine is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// fx55/fx65 leave I pointing one past the last register copied
    /// (COSMAC VIP behaviour); off by default
    pub increment_index_on_load_store: bool,
}

/// how the host drives the machine
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// instructions executed per host frame
    pub cycles_per_frame: u32,
    /// host frames per second; the timers tick once per frame
    pub frame_rate: u32,
    /// sleep to hold `frame_rate`; off runs flat out
    pub pacing: bool,
    /// log every executed instruction
    pub trace: bool,
    /// stop after this many frames
    pub max_frames: Option<u64>,
}

impl RunConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            cycles_per_frame: 10,
            frame_rate: 60,
            pacing: true,
            trace: false,
            max_frames: None,
        }
    }
}
