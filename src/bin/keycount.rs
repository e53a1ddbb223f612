//! keycount - count word or number frequencies, or estimate distinct values.
//!

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use keyed_tables::cardinality::{HyperLogLog, DEFAULT_BUCKET_BITS};
use keyed_tables::freq::{self, CountOptions};
use keyed_tables::{AllocPolicy, Error, ERROR_STATUS};

/// Frequency counters and a cardinality estimator built on fixed-capacity
/// hash tables.
#[derive(Parser, Debug)]
#[command(name = "keycount")]
#[command(version)]
#[command(about = "Count token frequencies with a linear-probing table")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count whitespace-delimited words; prints "<word> <count>" per line
    Words(CountArgs),
    /// Count whitespace-delimited 32-bit integers; prints "<n> <count>" per line
    Numbers(CountArgs),
    /// Estimate the number of distinct integers in FILE (HyperLogLog)
    Estimate {
        /// Input file (exactly one)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Register index bits (4..=16)
        #[arg(short = 'b', long = "bucket-bits", default_value_t = DEFAULT_BUCKET_BITS)]
        bucket_bits: u32,
    },
}

#[derive(Args, Debug)]
struct CountArgs {
    /// Input file; stdin when omitted
    file: Option<PathBuf>,

    /// Number of table slots (default: number of tokens read)
    #[arg(short = 'c', long = "capacity", value_name = "SLOTS")]
    capacity: Option<usize>,

    /// Report allocation failure as an error instead of exiting immediately
    #[arg(long = "no-fatal-alloc")]
    no_fatal_alloc: bool,
}

impl CountArgs {
    fn options(&self) -> CountOptions {
        CountOptions {
            capacity: self.capacity,
            alloc_policy: if self.no_fatal_alloc {
                AllocPolicy::Propagate
            } else {
                AllocPolicy::Fatal
            },
        }
    }
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", msg);
    std::process::exit(ERROR_STATUS);
}

fn open_input(file: Option<&PathBuf>) -> Box<dyn BufRead> {
    match file {
        None => Box::new(BufReader::new(io::stdin().lock())),
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                log::debug!("cannot open {}: {}", path.display(), e);
                fail("Couldn't open input file");
            }
        },
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let stdout = io::stdout().lock();
    match cli.command {
        Command::Words(args) => {
            let tokens = freq::read_tokens(open_input(args.file.as_ref()))?;
            let counter = freq::count_words(&tokens, args.options())?;
            freq::write_counts(&counter, stdout)
        }
        Command::Numbers(args) => {
            let tokens = freq::read_tokens(open_input(args.file.as_ref()))?;
            let counter = freq::count_numbers(&tokens, args.options())?;
            freq::write_counts(&counter, stdout)
        }
        Command::Estimate { files, bucket_bits } => {
            let file = match files.as_slice() {
                [] => fail("Please enter input file"),
                [file] => file,
                _ => fail("Please enter only one input file"),
            };
            if !(4..=16).contains(&bucket_bits) {
                fail(format!("bucket bits must be between 4 and 16, got {bucket_bits}"));
            }
            let tokens = freq::read_tokens(open_input(Some(file)))?;
            let mut hll = HyperLogLog::new(bucket_bits);
            for t in &tokens {
                hll.insert(freq::parse_int(t)?);
            }
            println!("{:.6}", hll.estimate());
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::debug!("keycount failed: {:?}", e);
        fail(format!("Error: {}", e));
    }
}
