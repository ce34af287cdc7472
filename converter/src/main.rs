//! acmgen CLI - Generate and verify ACM channel lineup documents
//!
//! ```bash
//! acmgen generate                                # input_csv/ -> output/output.json
//! acmgen generate --input extracts --output out.json
//! acmgen verify                                  # normalized equality, exit 1 when different
//! acmgen verify out.json ref.json --sort-key 'lineups[].channels=serviceId'
//! acmgen diff out.json ref.json                  # key and channel level report
//! ```
//!
//! `ACMGEN_INPUT_DIR`, `ACMGEN_OUTPUT`, `ACMGEN_LOCALE` and `ACMGEN_SOURCE_ID`
//! (also read from `.env`) supply defaults; flags take precedence.

use acmgen::{
    convert, diff_documents, differences, documents_equal, init_logging, load_json,
    source_id_from_env, ConvertError, ConvertOptions, DocumentMeta, LogConfig, LogFormat,
    SortKeys, DEFAULT_OUTPUT_PATH, DEFAULT_REFERENCE_PATH,
};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "acmgen")]
#[command(about = "Generate ACM channel lineup JSON from CSV extracts", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log format: pretty, compact or json
    #[arg(long, default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the lineup document from the CSV extracts
    Generate {
        /// Directory holding the CSV extracts
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source id written to diagnostics and deployment
        #[arg(long)]
        source_id: Option<String>,

        /// Generation timestamp (RFC 3339, default: now)
        #[arg(long)]
        generated_at: Option<String>,

        /// Deployment timestamp (RFC 3339, default: generation timestamp)
        #[arg(long)]
        deployed_at: Option<String>,

        /// Locale of application synopsis and toaster message
        #[arg(long)]
        locale: Option<String>,

        /// CSV field delimiter
        #[arg(short, long, default_value = ";")]
        delimiter: char,
    },

    /// Check a generated document against a reference, ignoring list order
    Verify {
        /// Generated document
        #[arg(default_value = DEFAULT_OUTPUT_PATH)]
        generated: PathBuf,

        /// Reference document
        #[arg(default_value = DEFAULT_REFERENCE_PATH)]
        reference: PathBuf,

        /// Sort key override for one list, as PATH=KEY (repeatable)
        #[arg(long = "sort-key", value_name = "PATH=KEY")]
        sort_keys: Vec<String>,

        /// Number of differences to print
        #[arg(long, default_value = "10")]
        show: usize,
    },

    /// Print a key and channel level report of two documents
    Diff {
        /// Generated document
        #[arg(default_value = DEFAULT_OUTPUT_PATH)]
        generated: PathBuf,

        /// Reference document
        #[arg(default_value = DEFAULT_REFERENCE_PATH)]
        reference: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(io::stderr().is_terminal());
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            source_id,
            generated_at,
            deployed_at,
            locale,
            delimiter,
        } => cmd_generate(GenerateArgs {
            input,
            output,
            source_id,
            generated_at,
            deployed_at,
            locale,
            delimiter,
        }),

        Commands::Verify {
            generated,
            reference,
            sort_keys,
            show,
        } => cmd_verify(&generated, &reference, &sort_keys, show),

        Commands::Diff {
            generated,
            reference,
        } => cmd_diff(&generated, &reference),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct GenerateArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    source_id: Option<String>,
    generated_at: Option<String>,
    deployed_at: Option<String>,
    locale: Option<String>,
    delimiter: char,
}

fn cmd_generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ConvertOptions::from_env();
    if let Some(input) = args.input {
        options = options.with_input_dir(input);
    }
    if let Some(output) = args.output {
        options = options.with_output_path(output);
    }
    if let Some(locale) = args.locale {
        options.locale = locale;
    }
    options.delimiter = delimiter_byte(args.delimiter)?;

    let generation_date = match args.generated_at {
        Some(value) => parse_timestamp("generated-at", &value)?,
        None => Utc::now(),
    };
    let deployment_date = match args.deployed_at {
        Some(value) => parse_timestamp("deployed-at", &value)?,
        None => generation_date,
    };
    let meta = DocumentMeta {
        source_id: args.source_id.unwrap_or_else(source_id_from_env),
        generation_date,
        deployment_date,
    };

    let document = convert(&options, &meta)?;
    eprintln!(
        "Generated {} channels, {} lineups, {} locations",
        document.channels.len(),
        document.lineups.len(),
        document.locations.len()
    );

    Ok(())
}

fn cmd_verify(
    generated: &Path,
    reference: &Path,
    sort_keys: &[String],
    show: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let keys = sort_keys
        .iter()
        .try_fold(SortKeys::default(), |keys, spec| keys.with_spec(spec))?;

    let ours = load_json(generated)?;
    let theirs = load_json(reference)?;

    if documents_equal(&ours, &theirs, &keys) {
        println!("JSON files are identical.");
        return Ok(());
    }

    println!("JSON files are different.");
    for difference in differences(&ours, &theirs, &keys, show) {
        println!("  {}", difference);
    }
    std::process::exit(1);
}

fn cmd_diff(generated: &Path, reference: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let ours = load_json(generated)?;
    let theirs = load_json(reference)?;

    print!("{}", diff_documents(&ours, &theirs));
    Ok(())
}

fn delimiter_byte(c: char) -> Result<u8, ConvertError> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ConvertError::InvalidOption {
            name: "delimiter".to_string(),
            message: format!("'{}' is not a single ASCII character", c),
        })
}

fn parse_timestamp(name: &str, value: &str) -> Result<DateTime<Utc>, ConvertError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| ConvertError::InvalidOption {
            name: name.to_string(),
            message: format!("'{}' is not an RFC 3339 timestamp: {}", value, e),
        })
}
