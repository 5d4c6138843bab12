//! OxiFax CLI - bilevel image codecs
//!
//! Encodes and decodes CCITT Group 3/4 fax streams and TIFF-style LZW data.

mod bitstring;
mod commands;
mod header;
mod pbm;
mod utils;

use clap::{Args, Parser, Subcommand, ValueEnum};
use commands::{FaxOptions, cmd_fax_decode, cmd_fax_encode, cmd_info, cmd_lzw_decode, cmd_lzw_encode};
use oxifax_ccitt::FaxMode;
use oxifax_lzw::LzwConfig;
use std::path::PathBuf;
use utils::OpenError;

#[derive(Parser)]
#[command(name = "oxifax")]
#[command(author, version, about = "Pure Rust CCITT G3/G4 fax and LZW codecs")]
#[command(long_about = "
OxiFax encodes PBM bitmaps into CCITT Group 3/4 fax streams and back, and
compresses arbitrary data with TIFF-style LZW.
Missing input/output paths mean standard input/output.

Examples:
  oxifax fax encode --g4 --header page.pbm page.mmr
  oxifax fax decode --g4 --header page.mmr page.pbm
  oxifax fax encode --g3-k 4 page.pbm page.g3
  oxifax fax decode --g3-k 4 --width 1728 page.g3 page.pbm
  oxifax lzw encode data.bin data.lzw
  oxifax lzw decode --pbm-width 1728 strip.lzw strip.pbm
  oxifax info --json page.mmr
")]
struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    loglevel: LogLevel,

    /// Show progress bars during operations.
    #[arg(long, global = true)]
    progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// CCITT Group 3/4 fax coding
    #[command(subcommand)]
    Fax(FaxCommand),

    /// TIFF/GIF-style LZW coding
    #[command(subcommand)]
    Lzw(LzwCommand),

    /// Show information about a headered G4 (MMR) file
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FaxCommand {
    /// Encode a PBM image into a fax stream
    #[command(alias = "e")]
    Encode {
        #[command(flatten)]
        mode: ModeArgs,

        #[command(flatten)]
        io: IoArgs,

        /// Write the MMR header in front of the stream
        #[arg(long)]
        header: bool,

        /// Write the stream as a '0'/'1' bit-string
        #[arg(short, long)]
        bits: bool,
    },

    /// Decode a fax stream into a PBM image
    #[command(alias = "d")]
    Decode {
        #[command(flatten)]
        mode: ModeArgs,

        #[command(flatten)]
        io: IoArgs,

        /// Image width in pixels (ignored with --header)
        #[arg(short, long)]
        width: Option<usize>,

        /// Read the MMR header in front of the stream
        #[arg(long)]
        header: bool,

        /// Read the stream as a '0'/'1' bit-string
        #[arg(short, long)]
        bits: bool,

        /// Write plain (P1) PBM instead of raw (P4)
        #[arg(short, long)]
        plain: bool,
    },
}

#[derive(Subcommand)]
enum LzwCommand {
    /// Compress data
    #[command(alias = "e")]
    Encode {
        #[command(flatten)]
        io: IoArgs,

        /// Widen codes on the entry limit instead of one entry early
        #[arg(long)]
        no_early_change: bool,

        /// Read a PBM image and compress its raster
        #[arg(long)]
        pbm: bool,
    },

    /// Decompress data
    #[command(alias = "d")]
    Decode {
        #[command(flatten)]
        io: IoArgs,

        /// Widen codes on the entry limit instead of one entry early
        #[arg(long)]
        no_early_change: bool,

        /// Write a raw PBM image with this width
        #[arg(long, value_name = "WIDTH")]
        pbm_width: Option<usize>,
    },
}

/// Fax coding mode. G3 one-dimensional when none is given.
#[derive(Args)]
#[group(multiple = false)]
struct ModeArgs {
    /// G3 one-dimensional (MH)
    #[arg(long)]
    g3: bool,

    /// G3 two-dimensional (MR) with parameter K (2 and 4 are standard)
    #[arg(long, value_name = "K")]
    g3_k: Option<i32>,

    /// G4 (MMR)
    #[arg(long)]
    g4: bool,
}

impl ModeArgs {
    fn mode(&self) -> oxifax_ccitt::Result<FaxMode> {
        if self.g4 {
            Ok(FaxMode::G4)
        } else {
            FaxMode::from_k(self.g3_k.unwrap_or(0))
        }
    }
}

#[derive(Args)]
struct IoArgs {
    /// Input file (stdin if omitted)
    input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Process exit code for a failed command.
fn exit_code(error: &(dyn std::error::Error + 'static)) -> i32 {
    if error.downcast_ref::<OpenError>().is_some() {
        3
    } else {
        2
    }
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG refines the --loglevel baseline.
    let mut env_builder = env_logger::Builder::new();
    env_builder
        .filter_level(cli.loglevel.to_level_filter())
        .format_timestamp(None)
        .parse_default_env();
    if let Err(e) = env_builder.try_init() {
        eprintln!("Warning: logger already initialised: {}", e);
    }

    let progress = cli.progress;
    let result = match cli.command {
        Commands::Fax(FaxCommand::Encode {
            mode,
            io,
            header,
            bits,
        }) => mode.mode().map_err(Into::into).and_then(|mode| {
            cmd_fax_encode(
                io.input.as_deref(),
                io.output.as_deref(),
                FaxOptions {
                    mode,
                    header,
                    bits,
                    progress,
                },
            )
        }),
        Commands::Fax(FaxCommand::Decode {
            mode,
            io,
            width,
            header,
            bits,
            plain,
        }) => mode.mode().map_err(Into::into).and_then(|mode| {
            cmd_fax_decode(
                io.input.as_deref(),
                io.output.as_deref(),
                width,
                plain,
                FaxOptions {
                    mode,
                    header,
                    bits,
                    progress,
                },
            )
        }),
        Commands::Lzw(LzwCommand::Encode {
            io,
            no_early_change,
            pbm,
        }) => cmd_lzw_encode(
            io.input.as_deref(),
            io.output.as_deref(),
            LzwConfig::new(!no_early_change),
            pbm,
            progress,
        ),
        Commands::Lzw(LzwCommand::Decode {
            io,
            no_early_change,
            pbm_width,
        }) => cmd_lzw_decode(
            io.input.as_deref(),
            io.output.as_deref(),
            LzwConfig::new(!no_early_change),
            pbm_width,
            progress,
        ),
        Commands::Info { file, json } => cmd_info(&file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(e.as_ref()));
    }
}
