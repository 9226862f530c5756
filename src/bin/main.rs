//! libsvm-datasets Command Line Interface
//!
//! Lists catalog entries and streams records of LIBSVM datasets,
//! downloading and caching files on first use.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use libsvm_datasets::catalog::{resolve, StaticCatalog};
use libsvm_datasets::core::{Catalog, DatasetError, Record, Result, Value};
use libsvm_datasets::data::{parse_value, DecodeConfig};
use libsvm_datasets::LibSvmDataset;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "libsvm-datasets")]
#[command(about = "Stream records from LIBSVM-format datasets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "libsvm-datasets contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List dataset names in catalog order
    List(CatalogArgs),
    /// Show the file variants of a dataset
    Files(FilesArgs),
    /// Print the records of a dataset
    Show(ShowArgs),
}

#[derive(Args)]
struct CatalogArgs {
    /// Catalog file (JSON array of datasets)
    #[arg(long)]
    catalog: PathBuf,
}

#[derive(Args)]
struct FilesArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Dataset name
    name: String,
}

#[derive(Args)]
struct ShowArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Dataset name
    name: String,

    /// File variant note (e.g. "testing")
    #[arg(short, long)]
    note: Option<String>,

    /// Value for absent features
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    default_value: String,

    /// Stop after this many records
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "csv")]
    format: OutputFormat,

    /// Cache root directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Decompression command for .bz2 files
    #[arg(long, default_value = "bzcat")]
    bz2_command: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// label followed by features, comma separated
    #[value(name = "csv")]
    Csv,
    /// One JSON object per record
    #[value(name = "json")]
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::List(args) => list_command(args),
        Commands::Files(args) => files_command(args),
        Commands::Show(args) => show_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_catalog(args: &CatalogArgs) -> Result<StaticCatalog> {
    info!("Loading catalog from {:?}", args.catalog);
    let catalog = StaticCatalog::from_json_file(&args.catalog)?;
    info!("Catalog has {} datasets", catalog.len());
    Ok(catalog)
}

fn list_command(args: CatalogArgs) -> Result<()> {
    let catalog = load_catalog(&args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for entry in catalog.entries() {
        writeln!(out, "{}", entry.name)?;
    }
    Ok(())
}

fn files_command(args: FilesArgs) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let info = resolve(&catalog, &args.name)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{} ({} features)", info.name, info.n_features)?;
    for file in &info.files {
        writeln!(
            out,
            "  {}\t{}\t{}",
            file.name,
            file.note.as_deref().unwrap_or("-"),
            file.url
        )?;
    }
    Ok(())
}

fn show_command(args: ShowArgs) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let default_value: Value = parse_value(&args.default_value, 0).map_err(|_| {
        DatasetError::InvalidParameter(format!("--default-value {:?}", args.default_value))
    })?;

    let mut builder = LibSvmDataset::builder(&args.name)
        .default_feature_value(default_value)
        .decode_config(DecodeConfig::with_bz2_command(
            args.bz2_command.split_whitespace(),
        ));
    if let Some(note) = &args.note {
        builder = builder.note(note);
    }
    if let Some(dir) = &args.cache_dir {
        builder = builder.cache_dir(dir);
    }
    let dataset = builder.build(&catalog)?;
    info!(
        "Streaming {} from {}",
        dataset.metadata().name,
        dataset.local_path().display()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let limit = args.limit.unwrap_or(usize::MAX);
    let mut count = 0;
    for record in dataset.records()?.take(limit) {
        write_record(&mut out, &record?, args.format)?;
        count += 1;
    }
    out.flush()?;

    info!("Printed {count} records");
    Ok(())
}

fn write_record<W: Write>(out: &mut W, record: &Record, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let label = match record.label() {
                label if label.is_multi() => format!("\"{label}\""),
                label => label.to_string(),
            };
            let fields: Vec<String> = std::iter::once(label)
                .chain(record.features().iter().map(Value::to_string))
                .collect();
            writeln!(out, "{}", fields.join(","))?;
        }
        OutputFormat::Json => {
            let line = serde_json::to_string(&record.to_map())
                .map_err(|e| DatasetError::SerializationError(e.to_string()))?;
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
