use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};
use point_grid::{GridFinder, GridFinderParams};

mod batch;
mod point_file;

use crate::batch::run_batch;
use crate::point_file::{load_params, read_points, write_points};

/// Find an ordered 10x10 grid in unordered 2D point detections.
#[derive(Debug, Parser)]
#[command(author, version, about = "Recover ordered calibration grids from point files")]
struct Cli {
    /// Optional path to a JSON GridFinderParams. Defaults are used if omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the grid in a single point file and print it row-major.
    Points {
        /// File with one `x y` pair per line.
        file: PathBuf,

        /// Dump every sequence candidate to the log.
        #[arg(long)]
        debug: bool,

        /// Print the full detection (points and index lists) as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Process many point files and print one combined report.
    Batch {
        /// Number of worker threads. Defaults to the available parallelism.
        #[arg(short, long)]
        jobs: Option<usize>,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn log_level(verbose: u8, debug: bool) -> LevelFilter {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if debug {
        level.max(LevelFilter::Debug)
    } else {
        level
    }
}

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let debug = matches!(cli.command, Command::Points { debug: true, .. });
    point_grid::init_with_level(log_level(cli.verbose, debug))?;
    #[cfg(feature = "tracing")]
    point_grid::init_tracing(false);

    let mut params = match &cli.config {
        Some(path) => load_params(path)?,
        None => GridFinderParams::default(),
    };

    match cli.command {
        Command::Points { file, debug, json } => {
            params.debug = debug;
            let points = read_points(&file)?;
            info!("{}: {} points", file.display(), points.len());

            let detection = match GridFinder::new(params).detect(&points) {
                Ok(detection) => detection,
                Err(err) => {
                    info!("{}: {err}", file.display());
                    return Ok(ExitCode::FAILURE);
                }
            };

            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            if json {
                serde_json::to_writer_pretty(&mut out, &detection)?;
                writeln!(out)?;
            } else {
                write_points(&mut out, &detection.points)?;
            }
            out.flush()?;
        }
        Command::Batch { jobs, files } => {
            let jobs = jobs.unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()));
            let finder = GridFinder::new(params);
            run_batch(&files, jobs, &finder, BufWriter::new(io::stdout()))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
