use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use varioclub::simulation::{FlightConfig, Segment, generate_flight};

#[derive(Parser, Debug)]
#[command(name = "generate_trace")]
#[command(about = "Generate synthetic pressure traces from a flight profile")]
struct Args {
    /// TOML flight profile
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output trace file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Segments as "<vario_ms>:<duration_s>", comma-separated (e.g., "0:5,2.5:30,-1.5:20")
    #[arg(short = 'S', long)]
    segments: Option<String>,

    /// Sensor noise standard deviation in Pa (CLI override)
    #[arg(long)]
    noise: Option<f32>,

    /// Seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pressure at the start altitude in Pa
    #[arg(long)]
    base_pressure: Option<f32>,

    /// Sample period in ms
    #[arg(long)]
    period_ms: Option<u32>,
}

fn parse_segments(s: &str) -> Result<Vec<Segment>> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<Segment>().map_err(anyhow::Error::msg))
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str::<FlightConfig>(&content).context("Failed to parse flight profile")?
        }
        None => FlightConfig::default(),
    };

    if let Some(ref segments) = args.segments {
        config.segments = parse_segments(segments)?;
    }
    if let Some(noise) = args.noise {
        config.noise_std_pa = noise;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(p) = args.base_pressure {
        config.base_pressure_pa = p;
    }
    if let Some(period) = args.period_ms {
        config.period_ms = period;
    }

    if config.segments.is_empty() {
        bail!("No flight segments; use --segments or a config file");
    }

    let trace = generate_flight(&config)?;
    let csv = trace.to_csv(config.period_ms);

    match &args.output {
        Some(path) => {
            fs::write(path, csv).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} samples to {}", trace.len(), path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let segments = parse_segments("0:5, 2.5:30,-1.5:20").unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].vario_ms, 2.5);
        assert_eq!(segments[2].duration_s, 20.0);
        assert!(parse_segments("0:5,oops").is_err());
    }
}
