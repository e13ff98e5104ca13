//! md2qmd: CLI tool to convert Markdown notes to Quarto Markdown

mod config;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use md2qmd_core::convert;
use md2qmd_export::export::MARKDOWN_EXTENSION;
use md2qmd_export::{
    BatchOptions, ExportError, FileHost, export_active_document, export_directory,
};

use config::{CONFIG_FILE_NAME, Config};

#[derive(Parser, Debug)]
#[command(name = "md2qmd")]
#[command(about = "Convert Markdown notes to Quarto Markdown")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
#[command(after_help = "Examples:
  md2qmd note.md                    # Write YYYYMMDD-note.qmd next to note.md
  md2qmd note.md -o posts/          # Write into posts/
  md2qmd note.md --stdout           # Print the converted document
  md2qmd vault/ -o site/ -r -j4     # Convert a directory tree with 4 jobs
  md2qmd init                       # Write a sample _md2qmd.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Input Markdown file or directory
    #[arg(required = true)]
    input: Option<PathBuf>,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title used for the output filename (defaults to the file name)
    #[arg(long)]
    title: Option<String>,

    /// Date used for the output filename, as YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Print the converted document to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Print a JSON report instead of output paths
    #[arg(long)]
    json: bool,

    /// Overwrite existing output files
    #[arg(short, long)]
    force: bool,

    /// Fail when any construct needs manual conversion
    #[arg(long)]
    strict: bool,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Configuration file (defaults to ./_md2qmd.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sample configuration file
    Init {
        /// Path of the configuration file to create
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Print the configuration JSON schema instead
        #[arg(long)]
        schema: bool,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

/// Settings resolved from the command line and the configuration file
#[derive(Debug)]
struct Settings {
    output_dir: Option<PathBuf>,
    overwrite: bool,
    strict: bool,
    today: NaiveDate,
    json: bool,
    quiet: bool,
}

impl Settings {
    fn resolve(cli: &Cli, config: Config) -> Self {
        Self {
            output_dir: cli.output.clone().or(config.output.dir),
            overwrite: cli.force || config.output.overwrite.unwrap_or(false),
            strict: cli.strict || config.check.strict.unwrap_or(false),
            today: cli.date.unwrap_or_else(|| Local::now().date_naive()),
            json: cli.json,
            quiet: cli.quiet,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose, cli.quiet);

    if let Some(Command::Init {
        output,
        schema,
        force,
    }) = &cli.command
    {
        return run_init(output, *schema, *force, cli.quiet);
    }

    let Some(input) = cli.input.as_deref() else {
        anyhow::bail!("No input given");
    };

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(Path::new("."))?.unwrap_or_default(),
    };
    let settings = Settings::resolve(&cli, config);
    tracing::debug!(?settings, "resolved settings");

    if input.is_file() {
        if cli.stdout {
            print_converted(input, &settings)
        } else {
            convert_file(input, cli.title.clone(), &settings)
        }
    } else if input.is_dir() {
        if cli.stdout {
            anyhow::bail!("--stdout can only be used with a single input file");
        }
        if cli.title.is_some() {
            anyhow::bail!("--title can only be used with a single input file");
        }
        convert_directory(input, cli.recursive, cli.jobs, &settings)
    } else {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }
}

/// Parse `--date`, limited to years that print as four digits
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let date: NaiveDate = s
        .parse()
        .map_err(|e| format!("invalid date {s:?}, expected YYYY-MM-DD: {e}"))?;
    if !(0..=9999).contains(&date.year()) {
        return Err(format!("year {} is outside 0000-9999", date.year()));
    }
    Ok(date)
}

fn setup_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "md2qmd={level},md2qmd_core={level},md2qmd_export={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Write a sample configuration file, or print its schema
fn run_init(output: &Path, schema: bool, force: bool, quiet: bool) -> Result<()> {
    if schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }

    if output.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    let content = Config::sample().to_toml_with_schema()?;
    fs::write(output, content)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    if !quiet {
        println!("{}", output.display());
    }

    Ok(())
}

/// Convert a single file and print the result instead of saving it
fn print_converted(input: &Path, settings: &Settings) -> Result<()> {
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !extension.eq_ignore_ascii_case(MARKDOWN_EXTENSION) {
        return Err(ExportError::UnsupportedFileType(extension).into());
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    let result = convert(&content);
    for warning in &result.warnings {
        tracing::warn!(input = %input.display(), "{}", warning);
    }

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.document);
    }

    check_strict(settings, result.warnings.len())
}

/// Convert a single file through the filesystem host
fn convert_file(input: &Path, title: Option<String>, settings: &Settings) -> Result<()> {
    let output_dir = match &settings.output_dir {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let mut host = FileHost::new(input, output_dir)
        .with_title(title)
        .with_overwrite(settings.overwrite);

    let exported = export_active_document(&mut host, settings.today)
        .with_context(|| format!("Failed to convert: {}", input.display()))?;

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&exported)?);
    } else if !settings.quiet {
        println!("{}", exported.path.display());
    }

    check_strict(settings, exported.warnings.len())
}

/// Convert a directory of Markdown files
fn convert_directory(
    input: &Path,
    recursive: bool,
    jobs: Option<usize>,
    settings: &Settings,
) -> Result<()> {
    let options = BatchOptions {
        output_dir: settings
            .output_dir
            .clone()
            .unwrap_or_else(|| input.to_path_buf()),
        recursive,
        overwrite: settings.overwrite,
        today: settings.today,
        parallel_jobs: jobs,
    };

    let result = export_directory(input, &options)
        .with_context(|| format!("Failed to convert directory: {}", input.display()))?;

    if result.exported.is_empty() && result.failed.is_empty() && !settings.quiet {
        eprintln!("No .md files found in {}", input.display());
    }

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !settings.quiet {
        for entry in &result.exported {
            println!("{}", entry.exported.path.display());
        }
    }

    // Report errors
    for failure in &result.failed {
        eprintln!(
            "Error converting {}: {}",
            failure.input.display(),
            failure.error
        );
    }

    if !settings.quiet {
        eprintln!(
            "Converted {} files, {} failed",
            result.exported.len(),
            result.failed.len()
        );
    }

    if !result.failed.is_empty() {
        anyhow::bail!("{} files failed to convert", result.failed.len());
    }

    check_strict(settings, result.warned_count())
}

fn check_strict(settings: &Settings, warnings: usize) -> Result<()> {
    if settings.strict && warnings > 0 {
        anyhow::bail!(
            "{} construct(s) need manual conversion (strict mode)",
            warnings
        );
    }
    Ok(())
}
