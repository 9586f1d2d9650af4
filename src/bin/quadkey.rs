//! Command-line access to value encoding, identifiers and index keys.
#![forbid(unsafe_code)]

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use quadkey::{
    config::Settings,
    logging::init_logging,
    model::parse::{parse_quad, parse_term},
    Role, StatementIndex,
};

#[derive(Parser, Debug)]
#[command(
    name = "quadkey",
    version,
    about = "Encode graph values and derive statement index keys",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "QUADKEY_CONFIG",
        value_name = "FILE",
        help = "Settings file (TOML)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log filter used when RUST_LOG is unset"
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Print the tagged byte encoding of a term")]
    Encode {
        #[arg(value_name = "TERM")]
        term: String,
    },

    #[command(about = "Decode a hex-encoded value")]
    Decode {
        #[arg(value_name = "HEX")]
        hex: String,
    },

    #[command(about = "Derive the identifier of a term")]
    Id {
        #[arg(value_name = "TERM")]
        term: String,
    },

    #[command(about = "Print the six index cells of a statement")]
    Keys {
        #[arg(value_name = "QUAD", help = "subject predicate object [context] .")]
        quad: String,
    },

    #[command(about = "Print one fork of a partitioned full-index scan")]
    Partition {
        #[arg(long, default_value = "SPO")]
        index: String,

        #[arg(long, help = "Role to split on; defaults to the first role of the index")]
        role: Option<String>,

        #[arg(long, default_value_t = 2)]
        count: usize,

        #[arg(long, default_value_t = 0)]
        fork: usize,
    },

    #[command(about = "Print region pre-split keys")]
    Splits {
        #[arg(long, default_value_t = 1)]
        bits: u32,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    let settings = Settings::load_or_default(cli.config.as_deref())?;
    let indices = settings.build()?;
    let factory = indices.factory();

    match cli.command {
        Command::Encode { term } => {
            let value = parse_term(&term)?;
            let encoded = factory.encode(&value);
            let hex = hex::encode(encoded.as_bytes());
            emit(
                cli.format,
                json!({ "tag": encoded.tag().name(), "hex": hex, "len": encoded.len() }),
                || println!("{} {hex}", encoded.tag()),
            )?;
        }
        Command::Decode { hex } => {
            let bytes = hex::decode(hex.trim())?;
            let value = factory.io().read_value(&bytes)?;
            emit(cli.format, json!({ "value": value.to_string() }), || {
                println!("{value}")
            })?;
        }
        Command::Id { term } => {
            let value = parse_term(&term)?;
            let id = factory.id(&value);
            let roles = factory.unpack_roles(&id);
            let minted = factory.mint_iri(&id);
            emit(
                cli.format,
                json!({
                    "id": id.to_hex(),
                    "kind": format!("{:?}", roles.kind()),
                    "string": roles.is_string(),
                    "numeric": roles.is_numeric(),
                    "iri": minted.to_string(),
                }),
                || {
                    println!("{id}");
                    println!(
                        "kind={:?} string={} numeric={}",
                        roles.kind(),
                        roles.is_string(),
                        roles.is_numeric()
                    );
                    println!("{minted}");
                },
            )?;
        }
        Command::Keys { quad } => {
            let quad = parse_quad(&quad)?;
            let cells = indices.cells(&quad);
            let rows: Vec<_> = cells
                .iter()
                .map(|c| {
                    json!({
                        "index": c.index.name(),
                        "row": hex::encode(&c.row),
                        "qualifier": hex::encode(&c.qualifier),
                        "value_len": c.value.len(),
                    })
                })
                .collect();
            emit(cli.format, json!(rows), || {
                for c in &cells {
                    println!(
                        "{:<5} {} {}",
                        c.index.name(),
                        hex::encode(&c.row),
                        hex::encode(&c.qualifier)
                    );
                }
            })?;
        }
        Command::Partition {
            index,
            role,
            count,
            fork,
        } => {
            let index: StatementIndex = index.parse()?;
            let role: Role = match role {
                Some(r) => r.parse()?,
                None => index.roles()[0],
            };
            let range = indices.partition(index, role, count, fork)?;
            let start = hex::encode(&range.start);
            let stop = hex::encode(&range.stop);
            emit(
                cli.format,
                json!({ "index": index.name(), "start": start, "stop": stop }),
                || println!("{index} {start} {stop}"),
            )?;
        }
        Command::Splits { bits } => {
            let keys: Vec<String> = indices
                .pre_split_keys(bits)?
                .iter()
                .map(hex::encode)
                .collect();
            emit(cli.format, json!(keys), || {
                for k in &keys {
                    println!("{k}");
                }
            })?;
        }
    }

    Ok(())
}

fn emit<F>(format: OutputFormat, value: serde_json::Value, printer: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}
