use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tx_compiler::codec::PRE_SIGNING_OUTPUT_SCHEMA;
use tx_compiler::serde_bytes::decode_hex;
use tx_compiler::utils::logging;
use tx_compiler::{
    DecoderConfig, HashAlgorithm, PreSigningOutput, PreSigningOutputJson, SchemaRegistry,
    UnknownFieldPolicy,
};

#[derive(Parser)]
#[command(name = "presign", version, about = "Build and inspect pre-signing outputs")]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode an output and print it as hex
    Encode {
        #[arg(long, default_value = "")]
        data_hash: String,
        #[arg(long, default_value = "")]
        data: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        error_code: i32,
        #[arg(long, default_value = "")]
        error: String,
    },
    /// Decode hex (or `-` for stdin) and print it as JSON
    Decode {
        hex: String,
        /// Keep fields from newer schema revisions
        #[arg(long)]
        retain_unknown: bool,
        /// Reject inputs longer than this many bytes
        #[arg(long)]
        max_len: Option<usize>,
    },
    /// Decode hex (or `-` for stdin) and check it is safe to sign
    Validate {
        hex: String,
        /// Also recompute data_hash with this algorithm
        #[arg(long)]
        hash: Option<HashAlgorithm>,
    },
    /// Print the registered field-tag assignments
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        logging::enable_debug();
    }

    match cli.command {
        Command::Encode {
            data_hash,
            data,
            error_code,
            error,
        } => {
            let data_hash = decode_hex(&data_hash).context("--data-hash is not valid hex")?;
            let data = decode_hex(&data).context("--data is not valid hex")?;
            let output = PreSigningOutput::new(data_hash, data, error_code, error);
            println!("{}", hex::encode(output.encode()));
        }
        Command::Decode {
            hex,
            retain_unknown,
            max_len,
        } => {
            let bytes = read_hex_arg(&hex)?;
            let config = DecoderConfig {
                unknown_fields: if retain_unknown {
                    UnknownFieldPolicy::Retain
                } else {
                    UnknownFieldPolicy::Discard
                },
                max_message_len: max_len,
            };
            let output = PreSigningOutput::decode_with(&bytes, &config)?;
            println!("{}", PreSigningOutputJson::from(&output).to_json()?);
        }
        Command::Validate { hex, hash } => {
            let bytes = read_hex_arg(&hex)?;
            let output = PreSigningOutput::decode(&bytes)?;
            output.validate()?;
            if output.is_success() {
                // failure outputs carry no digest to check
                if let Some(algorithm) = hash {
                    output.verify_data_hash(algorithm)?;
                }
                println!("ok");
            } else {
                println!("ok (failure output: {} {})", output.kind(), output.error());
            }
        }
        Command::Schema => {
            let identity = PRE_SIGNING_OUTPUT_SCHEMA.identity();
            let schema = SchemaRegistry::global()
                .get(&identity)
                .with_context(|| format!("schema {} not registered", identity))?;
            println!("{}", identity);
            for field in schema.fields {
                let note = if field.deprecated { " (deprecated)" } else { "" };
                println!("  {:>2}  {:<10} {}{}", field.number, field.name, field.kind, note);
            }
        }
    }

    Ok(())
}

fn read_hex_arg(arg: &str) -> Result<Vec<u8>> {
    let text = if arg == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        arg.to_string()
    };
    decode_hex(&text).context("input is not valid hex")
}
