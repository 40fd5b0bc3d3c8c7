//! ercs CLI — consent token <-> JSON conversion.

use std::io::Read;
use std::process;

use clap::{Args, Parser, Subcommand};
use ercs::{ConsentData, Error, VendorList};

#[derive(Parser)]
#[command(name = "ercs", about = "IAB consent string (v1) encode/decode")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode consent data JSON to a web-safe token
    Encode(EncodeArgs),
    /// Decode a token to consent data JSON
    Decode(DecodeArgs),
    /// Decode only the metadata fields of a token
    Metadata(DecodeArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// Consent data JSON file (- for stdin)
    #[arg(short, long)]
    input: String,

    /// Vendor list JSON file (GVL format)
    #[arg(short = 'l', long)]
    vendor_list: Option<String>,
}

#[derive(Args)]
struct DecodeArgs {
    /// The web-safe consent token
    token: String,

    /// Pretty-printed JSON output (2-space indent)
    #[arg(long)]
    pretty: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Encode(args) => {
            let json = read_input(&args.input)?;
            let data: ConsentData = serde_json::from_str(&json)?;
            // Katalog-Pflicht wird vor jeder Bit-Arbeit geprüft
            let path = args.vendor_list.ok_or(Error::MissingVendorList)?;
            let vendor_list = VendorList::from_json(&std::fs::read_to_string(path)?)?;
            let token = ercs::encode_consent_string(&data, &vendor_list)?;
            println!("{token}");
        }
        Command::Decode(args) => {
            let data = ercs::decode_consent_string(&args.token)?;
            println!("{}", to_json(&data, args.pretty)?);
        }
        Command::Metadata(args) => {
            let meta = ercs::decode_metadata_string(&args.token)?;
            println!("{}", to_json(&meta, args.pretty)?);
        }
    }
    Ok(())
}

/// Reads a file, or stdin when the path is `-`.
fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
