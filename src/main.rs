use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::env;
use std::fs::File;
use std::path::PathBuf;

use chip8vm::display::{Display, DummyDisplay, MonoTermDisplay};
use chip8vm::emulator::Emulator;
use chip8vm::input::{DummyInput, Input, StdinInput};
use chip8vm::selector::select_rom;
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::{Chip8Interpreter, Quirks, RunConfig};

#[derive(Parser)]
#[command(version, about = "CHIP-8 virtual machine in the terminal")]
struct Args {
    /// ROM to run; opens a file browser when left out
    rom: Option<PathBuf>,

    /// log every executed instruction
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// run as fast as possible instead of 60 frames a second
    #[arg(long, default_value_t = false)]
    nosync: bool,

    /// instructions per frame
    #[arg(long, default_value_t = 10)]
    cycles_per_frame: u32,

    /// stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// fx55/fx65 advance I past the registers copied (COSMAC VIP behaviour)
    #[arg(long, default_value_t = false)]
    increment_index: bool,

    /// seed for the random byte instruction
    #[arg(long)]
    seed: Option<u64>,

    /// no beeping
    #[arg(long, default_value_t = false)]
    mute: bool,

    /// no terminal UI: run with no keys and print the machine state at the end
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// write log output here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    // RUST_LOG still wins
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Some(path) = &args.log_file {
        let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(f)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    if args.headless && args.frames.is_none() {
        bail!("--headless needs --frames");
    }

    let rom = match args.rom.clone() {
        Some(rom) => rom,
        None => match select_rom(env::current_dir()?)? {
            Some(rom) => rom,
            None => bail!("no ROM selected"),
        },
    };

    let quirks = Quirks {
        increment_index_on_load_store: args.increment_index,
    };
    let mut interpreter = match args.seed {
        Some(seed) => Chip8Interpreter::with_seed(quirks, seed),
        None => Chip8Interpreter::new(quirks),
    };
    interpreter
        .load_rom_from_path(&rom)
        .with_context(|| format!("loading {}", rom.display()))?;

    let config = RunConfig {
        cycles_per_frame: args.cycles_per_frame,
        pacing: !args.nosync,
        trace: args.debug,
        max_frames: args.frames,
        ..RunConfig::default()
    };

    let mut display: Box<dyn Display>;
    let mut input: Box<dyn Input>;
    if args.headless {
        display = Box::new(DummyDisplay::new());
        input = Box::new(DummyInput::idle());
    } else {
        let title = rom
            .file_name()
            .map(|n| format!("CHIP-8: {}", n.to_string_lossy()))
            .unwrap_or_else(|| "CHIP-8".to_string());
        display = Box::new(MonoTermDisplay::new(&title)?);
        input = Box::new(StdinInput::new()?);
    }
    let mut sound: Box<dyn Sound> = if args.mute || args.headless {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let mut emulator = Emulator::new(
        interpreter,
        display.as_mut(),
        input.as_mut(),
        sound.as_mut(),
        config,
    );
    let result = emulator.main_loop();

    if args.headless {
        let machine = emulator.interpreter();
        println!("frames: {}", emulator.frames());
        println!(
            "pc={:03x} i={:03x} sp={} dt={} st={}",
            machine.program_counter(),
            machine.index(),
            machine.stack_pointer(),
            machine.delay_timer(),
            machine.sound_timer()
        );
        println!("v: {:02x?}", machine.registers());
        print!("{:?}", machine.framebuffer());
    }
    result?;
    Ok(())
}
