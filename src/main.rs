//! # TextConv CLI - Text Representation Converter
//!
//! Command-line interface over the conversion engine: converts text or files
//! between encodings and framings, validates input, and lists formats.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use textconv::{
    ByteOrder, ConversionEngine, DEFAULT_MAX_INPUT_LEN, EncodingFormat, EngineOptions, FormatKind,
    Response,
};

/// TextConv: lossless conversion between text encodings and byte framings
#[derive(Parser)]
#[command(name = "textconv")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert text or a file between formats
    Convert(ConvertArgs),

    /// List all supported formats
    List(ListArgs),

    /// Validate that input is well-formed in a format
    Validate(ValidateArgs),

    /// Display detailed information about a format
    Info(InfoArgs),
}

#[derive(Args)]
struct EngineArgs {
    /// Read and write UTF-16 as big-endian
    #[arg(long)]
    utf16_be: bool,

    /// Maximum input size in bytes (0 for no limit)
    #[arg(long, default_value_t = DEFAULT_MAX_INPUT_LEN)]
    max_input: usize,
}

impl EngineArgs {
    fn engine(&self) -> ConversionEngine {
        let utf16_byte_order = if self.utf16_be {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        };
        ConversionEngine::with_options(EngineOptions {
            max_input_len: self.max_input,
            utf16_byte_order,
        })
    }
}

#[derive(Args)]
struct ConvertArgs {
    /// Source format
    #[arg(short = 'f', long = "from")]
    from: EncodingFormat,

    /// Target format
    #[arg(short = 't', long = "to")]
    to: EncodingFormat,

    /// Text to convert (reads --input or stdin when omitted)
    text: Option<String>,

    /// Input file, decoded with the source format
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the target bytes (e.g. raw UTF-16) instead of rendered text
    #[arg(long)]
    raw: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct ListArgs {
    /// Filter by kind
    #[arg(short, long)]
    kind: Option<KindArg>,

    /// Show format details
    #[arg(long)]
    details: bool,
}

#[derive(Args)]
struct ValidateArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Expected format
    #[arg(short, long)]
    encoding: EncodingFormat,

    /// Show position of first error
    #[arg(long)]
    show_errors: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct InfoArgs {
    /// Format to describe
    encoding: EncodingFormat,
}

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Codec,
    Framing,
}

impl From<KindArg> for FormatKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Codec => FormatKind::Codec,
            KindArg::Framing => FormatKind::Framing,
        }
    }
}

#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    format: EncodingFormat,
    bytes_checked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Response>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(ref args) => convert_command(args, &cli)?,
        Commands::List(ref args) => list_command(args, &cli)?,
        Commands::Validate(ref args) => validate_command(args, &cli)?,
        Commands::Info(ref args) => info_command(args, &cli)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "reading input file");
            fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            debug!("reading from stdin");
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

fn convert_command(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    let start_time = std::time::Instant::now();
    let engine = args.engine.engine();

    let result = match args.text {
        Some(ref text) => engine.convert_str(text, args.from, args.to),
        None => {
            let data = read_input(args.input.as_deref())?;
            engine.convert_bytes(&data, args.from, args.to)
        }
    };

    debug!(elapsed = ?start_time.elapsed(), "conversion done");

    if let OutputFormat::Json = cli.format {
        println!("{}", serde_json::to_string_pretty(&Response::from(&result))?);
    }

    let conversion = match result {
        Ok(conversion) => conversion,
        Err(err) => {
            if let OutputFormat::Text = cli.format {
                eprintln!("✗ Conversion from {} to {} failed", args.from.name(), args.to.name());
                eprintln!("  {err}");
            }
            std::process::exit(1);
        }
    };

    let payload: &[u8] = if args.raw {
        &conversion.encoded
    } else {
        conversion.output.as_bytes()
    };

    if let Some(ref output_path) = args.output {
        fs::write(output_path, payload)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;
        debug!(path = %output_path.display(), bytes = payload.len(), "wrote output");
    } else if let OutputFormat::Text = cli.format {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(payload)
            .context("Failed to write to stdout")?;
        if !args.raw {
            writeln!(stdout).context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn list_command(args: &ListArgs, cli: &Cli) -> Result<()> {
    let formats: Vec<EncodingFormat> = EncodingFormat::ALL
        .into_iter()
        .filter(|format| {
            args.kind
                .is_none_or(|kind| format.kind() == FormatKind::from(kind))
        })
        .collect();

    match cli.format {
        OutputFormat::Json => {
            let formats_info: Vec<_> = formats
                .iter()
                .map(|format| {
                    serde_json::json!({
                        "id": format.id(),
                        "name": format.name(),
                        "kind": format.kind(),
                        "description": format.description(),
                        "ascii_compatible": format.is_ascii_compatible(),
                        "multibyte": format.is_multibyte(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&formats_info)?);
        }
        OutputFormat::Text => {
            println!("Supported Formats ({} total):", formats.len());
            println!();

            for format in formats {
                println!(
                    "{:15} {:16} {:10} {}",
                    format.id(),
                    format.name(),
                    format!("[{}]", format.kind()),
                    format.description()
                );

                if args.details {
                    println!("                ASCII Compatible: {}", yes_no(format.is_ascii_compatible()));
                    println!("                Multibyte: {}", yes_no(format.is_multibyte()));
                    println!();
                }
            }
        }
    }

    Ok(())
}

fn validate_command(args: &ValidateArgs, cli: &Cli) -> Result<()> {
    let input_data = read_input(args.input.as_deref())?;
    let engine = args.engine.engine();
    let outcome = engine.validate(&input_data, args.encoding);

    match cli.format {
        OutputFormat::Json => {
            let result = ValidationResult {
                valid: outcome.is_ok(),
                format: args.encoding,
                bytes_checked: input_data.len(),
                error: outcome.as_ref().err().map(Response::from),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => match outcome {
            Ok(()) => println!("✓ Input is valid {}", args.encoding.name()),
            Err(ref err) => {
                println!("✗ Input is not valid {}", args.encoding.name());
                if args.show_errors {
                    println!("  Error at position {}: {} ({})", err.position, err.kind, err.detail);
                }
            }
        },
    }

    if outcome.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn info_command(args: &InfoArgs, cli: &Cli) -> Result<()> {
    let format = args.encoding;

    match cli.format {
        OutputFormat::Json => {
            let info = serde_json::json!({
                "id": format.id(),
                "name": format.name(),
                "kind": format.kind(),
                "ascii_compatible": format.is_ascii_compatible(),
                "multibyte": format.is_multibyte(),
                "description": format.description(),
                "sample": sample_rendering(format),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Text => {
            println!("Format Information: {} ({})", format.name(), format.id());
            println!("Description: {}", format.description());
            println!("Kind: {}", format.kind());
            println!("ASCII Compatible: {}", yes_no(format.is_ascii_compatible()));
            println!("Multibyte: {}", yes_no(format.is_multibyte()));
            match sample_rendering(format) {
                Some(sample) => println!("Sample \"Hi\" -> {sample}"),
                None => println!("Sample: unavailable"),
            }
        }
    }

    Ok(())
}

/// How "Hi" looks in `format`, as rendered text or raw bytes
fn sample_rendering(format: EncodingFormat) -> Option<String> {
    let conversion = textconv::convert("Hi", EncodingFormat::Utf8, format).ok()?;
    Some(match format.kind() {
        FormatKind::Codec => format!("{:02X?}", conversion.encoded),
        FormatKind::Framing => conversion.output,
    })
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
