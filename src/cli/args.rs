// cli/args.rs — clap definitions for the lz4chain command line.

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::block::MatchVariant;
use crate::cli::constants::{
    DISPLAY_LEVEL_DEFAULT, DISPLAY_LEVEL_MAX, ENV_CLEVEL, ENV_NBWORKERS, STDIN_MARK,
};
use crate::config::{
    default_nb_workers, BLOCKSIZEID_DEFAULT, CHUNK_SIZE_DEFAULT, CLEVEL_DEFAULT, CLEVEL_MAX,
    CLEVEL_MIN, NB_WORKERS_MAX,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "lz4chain",
    version,
    about = "LZ4-compatible compressor: frame streams and parallel raw blocks"
)]
pub struct Cli {
    /// Increase verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Decrease verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Notification level implied by `-v` / `-q`.
    pub fn display_level(&self) -> i32 {
        (DISPLAY_LEVEL_DEFAULT + self.verbose as i32 - self.quiet as i32).clamp(0, DISPLAY_LEVEL_MAX)
    }
}

#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// Input file ("-" for stdin)
    #[arg(default_value = STDIN_MARK)]
    pub input: String,
    /// Output file ("-" for stdout); derived from the input name when omitted
    #[arg(short, long)]
    pub output: Option<String>,
    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LevelArgs {
    /// Compression level
    #[arg(
        short,
        long,
        env = ENV_CLEVEL,
        default_value_t = CLEVEL_DEFAULT,
        value_parser = clap::value_parser!(u32).range(CLEVEL_MIN as i64..=CLEVEL_MAX as i64)
    )]
    pub level: u32,
    /// Use the baseline match finder (4-byte hash, greedy parsing)
    #[arg(long)]
    pub baseline: bool,
}

impl LevelArgs {
    pub fn variant(&self) -> MatchVariant {
        if self.baseline {
            MatchVariant::Baseline
        } else {
            MatchVariant::Improved
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress into an LZ4 frame
    Compress {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        level: LevelArgs,
        /// Block size code: 4 = 64 KB, 5 = 256 KB, 6 = 1 MB, 7 = 4 MB
        #[arg(short = 'B', long, default_value_t = BLOCKSIZEID_DEFAULT,
              value_parser = clap::value_parser!(u8).range(4..=7))]
        block_size: u8,
        /// Append an XXH32 of the whole content
        #[arg(long)]
        content_checksum: bool,
        /// Append an XXH32 after every block
        #[arg(long)]
        block_checksum: bool,
        /// Record the input size in the header (file inputs only)
        #[arg(long)]
        content_size: bool,
    },
    /// Decompress an LZ4 frame
    Decompress {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Print the header of an LZ4 frame
    Info {
        /// Input file ("-" for stdin)
        #[arg(default_value = STDIN_MARK)]
        input: String,
    },
    /// Compress a whole input as one raw block stream using worker threads
    Block {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        level: LevelArgs,
        /// Worker threads
        #[arg(short = 'T', long, env = ENV_NBWORKERS, default_value_t = default_nb_workers() as u32,
              value_parser = clap::value_parser!(u32).range(1..=NB_WORKERS_MAX as i64))]
        threads: u32,
        /// Bytes per parallel chunk
        #[arg(long, default_value_t = CHUNK_SIZE_DEFAULT)]
        chunk_size: usize,
    },
    /// Decompress a raw block stream
    Unblock {
        #[command(flatten)]
        io: IoArgs,
        /// Upper bound on the decompressed size
        #[arg(long)]
        max_size: usize,
    },
}
