use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use varioclub::hal::Clock;
use varioclub::output::{OutputFormat, RunClock, SummaryBuilder, create_formatter};
use varioclub::settings::{FileStore, MemoryStore, SettingsStore};
use varioclub::simulation::{ButtonScript, SimBoard, Trace};
use varioclub::{Vario, VarioConfig, render_timeline, save_wav};

#[derive(Parser, Debug)]
#[command(name = "varioclub")]
#[command(about = "Run the variometer control loop against a recorded pressure trace", long_about = None)]
struct Args {
    /// Pressure trace, one sample in Pa per control cycle
    #[arg(required_unless_present = "print_config")]
    trace: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Timed button script ("<time_ms> <buttons>" per line)
    #[arg(short, long)]
    buttons: Option<PathBuf>,

    /// Persist settings in this file instead of in memory
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print every Nth cycle (menu events are always printed)
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Number of cycles to run (default: one per trace sample)
    #[arg(short = 'n', long)]
    cycles: Option<u64>,

    /// Render the buzzer output to a WAV file
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Sample rate for WAV and live output
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,

    /// Pace the loop in real time
    #[arg(long)]
    realtime: bool,

    /// Play the tones on the default sound device (implies --realtime)
    #[cfg(feature = "audio")]
    #[arg(long)]
    live: bool,

    /// Simulate a pressure sensor that does not respond
    #[arg(long)]
    fail_sensor: bool,

    /// Print a summary after the run
    #[arg(long)]
    summary: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &args.config {
        Some(path) => VarioConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VarioConfig::default(),
    };

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    match &args.settings {
        Some(path) => {
            let store = FileStore::open(path)
                .with_context(|| format!("opening settings {}", path.display()))?;
            run(&args, &config, store)
        }
        None => run(&args, &config, MemoryStore::new()),
    }
}

fn build_board(args: &Args) -> Result<SimBoard> {
    let trace_path = args.trace.as_ref().context("no pressure trace given")?;
    let trace = Trace::load(trace_path)
        .with_context(|| format!("loading trace {}", trace_path.display()))?;
    log::info!("Loaded {} pressure samples", trace.len());

    let mut board = SimBoard::new(trace).with_realtime(args.realtime);

    if let Some(path) = &args.buttons {
        let script = ButtonScript::load(path)
            .with_context(|| format!("loading button script {}", path.display()))?;
        board = board.with_script(script);
    }
    if args.fail_sensor {
        board = board.with_sensor_fault();
    }

    attach_live_audio(board, args)
}

fn run<S: SettingsStore>(args: &Args, config: &VarioConfig, store: S) -> Result<()> {
    let board = build_board(args)?;
    let realtime = args.realtime || live(args);
    let cycles = args.cycles.unwrap_or(board.trace().len() as u64);

    let mut vario = Vario::new(board, store, config);
    log::info!("Settings: {:?}", vario.settings());

    if let Err(e) = vario.power_on() {
        if realtime {
            vario.halt();
        }
        return Err(e).context("power-on self-test failed");
    }

    let formatter = create_formatter(args.format, args.verbose > 0);
    let clock = RunClock::start_now();
    let every = args.every.max(1);
    let mut summary = SummaryBuilder::new();
    let mut stdout = std::io::stdout().lock();

    if let Some(header) = formatter.header() {
        writeln!(stdout, "{}", header)?;
    }

    let mut write_error = None;
    vario.run(cycles, |report| {
        summary.update(report);
        if write_error.is_some() || (report.cycle % every != 0 && report.menu.is_nothing()) {
            return;
        }
        let line = formatter.format(&clock.output(report));
        if let Err(e) = writeln!(stdout, "{}", line) {
            write_error = Some(e);
        }
    });
    if let Some(e) = write_error {
        return Err(e).context("writing output");
    }
    drop(stdout);

    let end_ms = vario.board().now_ms();

    if let Some(path) = &args.wav {
        let samples = render_timeline(vario.board().timeline(), end_ms, args.sample_rate);
        save_wav(path, &samples, args.sample_rate)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {} samples to {}", samples.len(), path.display());
    }

    if args.summary {
        let summary = summary.finish(end_ms, *vario.settings());
        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            _ => summary.print_text(),
        }
    }

    Ok(())
}

#[cfg(feature = "audio")]
fn attach_live_audio(board: SimBoard, args: &Args) -> Result<SimBoard> {
    if !args.live {
        return Ok(board);
    }
    let player = varioclub::audio::TonePlayer::new(args.sample_rate)?;
    Ok(board.with_tone_sink(Box::new(player)).with_realtime(true))
}

#[cfg(not(feature = "audio"))]
fn attach_live_audio(board: SimBoard, _args: &Args) -> Result<SimBoard> {
    Ok(board)
}

#[cfg(feature = "audio")]
fn live(args: &Args) -> bool {
    args.live
}

#[cfg(not(feature = "audio"))]
fn live(_args: &Args) -> bool {
    false
}
