//! pbkv CLI – inspect and relay key/value record buffers.

use clap::{Args, Parser, Subcommand};
use pbkv::codec;
use pbkv::{Decoder, Encoder, EncoderConfig};
use std::io::{IsTerminal, Read, Write};
use std::process;

#[derive(Parser)]
#[command(name = "pbkv", about = "Inspect and relay protobuf-style key/value buffers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every record, one per line
    Dump(DumpArgs),
    /// Print one occurrence of a field
    Find(FindArgs),
    /// Copy selected fields into a new buffer
    Relay(RelayArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Input file (- for stdin)
    #[arg(short, long)]
    input: String,
}

#[derive(Args)]
struct DumpArgs {
    #[command(flatten)]
    common: InputArgs,

    /// Maximum bytes per printed record
    #[arg(long, default_value_t = 120)]
    limit: usize,
}

#[derive(Args)]
struct FindArgs {
    #[command(flatten)]
    common: InputArgs,

    /// Field number
    #[arg(short, long)]
    field: u32,

    /// 0-based occurrence of the field
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Maximum bytes of the printed record
    #[arg(long, default_value_t = 120)]
    limit: usize,
}

#[derive(Args)]
struct RelayArgs {
    #[command(flatten)]
    common: InputArgs,

    /// Output file (- for stdout)
    #[arg(short, long)]
    output: String,

    /// Field numbers to keep, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    fields: Vec<u32>,
}

fn read_input(path: &str) -> Result<Vec<u8>, String> {
    if path == "-" {
        if std::io::stdin().is_terminal() {
            eprintln!("Lese von stdin (Ctrl+D zum Beenden)...");
        }
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| format!("Lesefehler (stdin): {e}"))?;
        Ok(buf)
    } else {
        std::fs::read(path).map_err(|e| format!("Lesefehler '{}': {e}", path))
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Dump(args) => run_dump(args),
        Command::Find(args) => run_find(args),
        Command::Relay(args) => run_relay(args),
    }
}

fn run_dump(args: DumpArgs) -> Result<(), String> {
    let data = read_input(&args.common.input)?;
    let decoder = Decoder::from_vec(data);
    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    let mut records = decoder.iter();
    while let Some(pair) = records.next() {
        let offset = records.position();
        let pair = pair.map_err(|e| format!("Decode-Fehler bei Offset {offset}: {e}"))?;
        writeln!(out, "{}", codec::to_string(&pair, args.limit))
            .map_err(|e| format!("Schreibfehler: {e}"))?;
    }
    out.flush().map_err(|e| format!("Schreibfehler: {e}"))
}

fn run_find(args: FindArgs) -> Result<(), String> {
    let data = read_input(&args.common.input)?;
    let decoder = Decoder::from_vec(data);
    let pair = decoder
        .find(args.field, args.index)
        .map_err(|e| format!("Decode-Fehler: {e}"))?
        .ok_or_else(|| {
            format!("Feld {} (Vorkommen {}) nicht gefunden", args.field, args.index)
        })?;
    println!("{}", codec::to_string(&pair, args.limit));
    Ok(())
}

fn run_relay(args: RelayArgs) -> Result<(), String> {
    let data = read_input(&args.common.input)?;
    let decoder = Decoder::from_vec(data);
    let mut encoder = Encoder::with_config(EncoderConfig::with_capacity(decoder.len()));
    for pair in decoder.iter() {
        let pair = pair.map_err(|e| format!("Decode-Fehler: {e}"))?;
        if args.fields.is_empty() || args.fields.contains(&pair.field_number) {
            codec::add_field(&mut encoder, pair.field_number, &pair)
                .map_err(|e| format!("Encode-Fehler: {e}"))?;
        }
    }
    write_to_output(&args.output, &encoder.into_vec())
}

/// Schreibt nach stdout ("-") oder atomar in eine Datei (tmp+rename).
fn write_to_output(output_path: &str, bytes: &[u8]) -> Result<(), String> {
    if output_path == "-" {
        let mut out = std::io::stdout().lock();
        out.write_all(bytes).map_err(|e| format!("Schreibfehler: {e}"))?;
        return out.flush().map_err(|e| format!("Schreibfehler: {e}"));
    }

    let tmp_path = format!("{output_path}.tmp");
    if let Err(e) = std::fs::write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(format!("Schreibfehler: {e}"));
    }
    std::fs::rename(&tmp_path, output_path).map_err(|e| format!("Schreibfehler: {e}"))
}
