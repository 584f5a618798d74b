use std::ffi::OsString;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use dmdist::{
    density::{smooth_disk::SmoothDisk, uniform::UniformMedium, DensityModel},
    dispatch::{run_line_of_sight, LineOfSightRequest, TargetType},
    dmdist_errors::DmDistError,
    integrator::ConversionDirection,
    report::{FrbSummary, OutputFormat},
};

#[derive(Parser, Debug)]
#[command(
    name = "dmdist",
    version,
    about = "DM <-> distance along a line of sight through the YMW16 electron-density model"
)]
struct Cli {
    #[arg(allow_negative_numbers = true, help = "Galactic longitude (deg)")]
    gl: f64,
    #[arg(allow_negative_numbers = true, help = "Galactic latitude (deg)")]
    gb: f64,
    #[arg(help = "DM (pc cm^-3) or distance (pc), depending on <DIRECTION>")]
    value: f64,
    #[arg(
        value_parser = clap::value_parser!(u8).range(1..=2),
        help = "1: DM to distance, 2: distance to DM"
    )]
    direction: u8,
    #[arg(
        long,
        value_enum,
        default_value_t = Mode::Gal,
        help = "Target type, also accepted as a leading Gal|MC|FRB argument"
    )]
    mode: Mode,
    #[arg(long, default_value_t = 0.0, help = "Host-galaxy DM for FRBs")]
    host_dm: f64,
    #[arg(short = 'd', long, help = "Directory holding ymw16par.txt (built-in set if absent)")]
    parameter_dir: Option<Utf8PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[arg(short = 'o', long, help = "Compact ';'-separated output")]
    compact: bool,
    #[arg(long, help = "Uniform electron density (cm^-3) instead of the YMW16 thick disk")]
    ne: Option<f64>,
    #[arg(trailing_var_arg = true, help = "Free text appended to the report line")]
    label: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Galactic pulsar
    Gal,
    /// Source in the Magellanic Clouds
    Mc,
    /// Fast radio burst
    Frb,
}

impl From<Mode> for TargetType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Gal => TargetType::GalacticPulsar,
            Mode::Mc => TargetType::Magellanic,
            Mode::Frb => TargetType::Frb,
        }
    }
}

/// Options that consume the token after them.
const VALUE_OPTIONS: [&str; 5] = ["-d", "--parameter-dir", "--mode", "--host-dm", "--ne"];

/// Turn a leading `Gal`, `MC` or `FRB` positional (`dmdist -o Gal 12 2 100 1`) into
/// `--mode`. Only the first positional token is looked at.
fn lift_leading_mode(mut args: Vec<OsString>) -> Vec<OsString> {
    let mut i = 1;
    while i < args.len() {
        let Some(token) = args[i].to_str() else {
            break;
        };
        if token == "--" {
            break;
        }
        if VALUE_OPTIONS.contains(&token) {
            i += 2;
            continue;
        }
        if token.starts_with('-') && token.parse::<f64>().is_err() {
            i += 1;
            continue;
        }
        if Mode::from_str(token, true).is_ok() {
            args[i] = format!("--mode={}", token.to_lowercase()).into();
        }
        break;
    }
    args
}

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<(), DmDistError> {
    let cli = Cli::parse_from(lift_leading_mode(std::env::args_os().collect()));

    env_logger::Builder::new()
        .filter_level(level_filter(cli.verbose))
        .parse_default_env()
        .init();

    let direction = if cli.direction == 1 {
        ConversionDirection::DmToDistance
    } else {
        ConversionDirection::DistanceToDm
    };

    let request = LineOfSightRequest::builder()
        .longitude(cli.gl)
        .latitude(cli.gb)
        .target_value(cli.value)
        .direction(direction)
        .target_type(cli.mode.into())
        .host_dm(cli.host_dm)
        .verbosity(cli.verbose)
        .format(if cli.compact {
            OutputFormat::Compact
        } else {
            OutputFormat::HumanReadable
        })
        .label(cli.label.join(" "))
        .build()?;

    let model: Box<dyn DensityModel> = match cli.ne {
        Some(ne) => Box::new(UniformMedium::new(ne)),
        None => Box::new(SmoothDisk),
    };

    run_line_of_sight(
        &request,
        cli.parameter_dir.as_deref(),
        model.as_ref(),
        &FrbSummary,
    )?;
    Ok(())
}
