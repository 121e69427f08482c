use bruteforce_rs::{Generator, LengthRange, Pool};
use clap::Parser;
use std::io::{self, Write};
use std::process;

/// Prints every string over a pool, shortest first.
///
/// Usage: cargo run --example bruteforce -- <start> [stop] [--pool <chars>]
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Shortest length to print; 0 includes the empty string
    #[arg(allow_negative_numbers = true)]
    start: i64,

    /// Exclusive upper bound on length; omit to run forever
    #[arg(allow_negative_numbers = true)]
    stop: Option<i64>,

    /// Characters to draw from (default: all 256 byte values)
    #[arg(short, long)]
    pool: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let generator = match build(&args) {
        Ok(generator) => generator,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(2);
        }
    };

    // A closed pipe (e.g. `| head`) ends output quietly.
    if print_all(&generator).is_err() {
        process::exit(0);
    }
}

fn build(args: &Args) -> bruteforce_rs::Result<Generator> {
    let range = LengthRange::try_new(args.start, args.stop)?;
    let pool = match &args.pool {
        Some(chars) => Pool::from_chars(chars)?,
        None => Pool::all(),
    };
    log::debug!("range={:?} pool_len={}", range, pool.len());
    Ok(Generator::from_range(range, pool))
}

fn print_all(generator: &Generator) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for value in generator {
        writeln!(out, "{}", byte_literal(&value))?;
    }
    out.flush()
}

/// Formats bytes as a Rust byte-string literal, e.g. `b"a\x00"`.
fn byte_literal(value: &[u8]) -> String {
    let escaped: String = value
        .iter()
        .flat_map(|&byte| std::ascii::escape_default(byte))
        .map(char::from)
        .collect();
    format!("b\"{}\"", escaped)
}
