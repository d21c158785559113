//! md2bn: CLI tool to render mdast JSON documents into semantic node trees

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use config::{CONFIG_FILE_NAME, Config, OutputFormat};
use md2bn_core::{Report, Transformer};
use md2bn_mdast::{Node, WriterOptions, to_html};

/// Path argument standing for stdin (as input) or stdout (as output)
const STDIO: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "md2bn")]
#[command(about = "Render mdast documents into bn-* semantic node trees")]
#[command(version)]
#[command(after_help = "Examples:
  md2bn convert doc.json                 # Write doc.bn.json next to the input
  md2bn convert doc.json -f html -o -    # Print HTML to stdout
  md2bn convert docs/ -o out/ -r -j4     # Convert a directory tree with 4 jobs
  md2bn init                             # Write a sample _md2bn.toml")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert mdast JSON files into semantic trees
    Convert(ConvertArgs),
    /// Write a sample configuration file to the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input mdast JSON file, directory, or `-` for stdin
    input: PathBuf,

    /// Output file or directory (`-` for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Write JSON without indentation
    #[arg(long)]
    compact: bool,

    /// Configuration file (defaults to `_md2bn.toml` in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum node nesting before a document is rejected
    #[arg(long)]
    max_depth: Option<usize>,

    /// Rewrite language aliases to the highlighter's canonical names
    #[arg(long)]
    normalize_languages: bool,
}

/// Output settings resolved from flags and configuration
#[derive(Debug, Clone, Copy)]
struct Rendering {
    format: OutputFormat,
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Convert(args) => convert(&args, cli.quiet),
        Command::Init { force } => init(force),
        Command::Schema => {
            println!("{}", Config::json_schema_string()?);
            Ok(())
        }
    }
}

/// Install the stderr subscriber; `RUST_LOG` takes precedence over the flags
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn convert(args: &ConvertArgs, quiet: bool) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(Path::new("."))?.unwrap_or_default(),
    };

    let mut options = config.transform_options();
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }
    if args.normalize_languages {
        options.normalize_languages = true;
    }
    let transformer = Transformer::new(config.registry(), options);
    debug!(?transformer, "configured transformer");

    let rendering = Rendering {
        format: args
            .format
            .or(config.output.format)
            .unwrap_or(OutputFormat::Json),
        pretty: !args.compact && config.output.pretty.unwrap_or(true),
    };

    if args.input.as_os_str() == STDIO {
        convert_stdin(args.output.as_deref(), &transformer, rendering)
    } else if args.input.is_file() {
        convert_file(
            &args.input,
            args.output.as_deref(),
            &transformer,
            rendering,
            quiet,
        )
    } else if args.input.is_dir() {
        convert_directory(
            &args.input,
            args.output.as_deref(),
            args.recursive,
            &transformer,
            rendering,
            quiet,
            args.jobs,
        )
    } else {
        anyhow::bail!("Input path does not exist: {}", args.input.display());
    }
}

/// Convert a document read from stdin; output defaults to stdout
fn convert_stdin(
    output: Option<&Path>,
    transformer: &Transformer,
    rendering: Rendering,
) -> Result<()> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read stdin")?;

    let (rendered, report) = render(&content, transformer, rendering)?;
    log_report("<stdin>", &report);

    write_output(output.unwrap_or(Path::new(STDIO)), &rendered)
}

/// Convert a single mdast JSON file
fn convert_file(
    input: &Path,
    output: Option<&Path>,
    transformer: &Transformer,
    rendering: Rendering,
    quiet: bool,
) -> Result<()> {
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension(rendering.format.extension()),
    };

    info!(
        "Converting: {} -> {}",
        input.display(),
        output_path.display()
    );

    let report = convert_file_inner(input, &output_path, transformer, rendering)?;
    log_report(&input.display().to_string(), &report);

    if !quiet && output_path.as_os_str() != STDIO {
        println!("{}", output_path.display());
    }

    Ok(())
}

/// Convert a directory of mdast JSON files
fn convert_directory(
    input: &Path,
    output: Option<&Path>,
    recursive: bool,
    transformer: &Transformer,
    rendering: Rendering,
    quiet: bool,
    jobs: Option<usize>,
) -> Result<()> {
    let output_dir = output.unwrap_or(input);

    let files = collect_json_files(input, recursive)?;

    if files.is_empty() {
        warn!("No .json files found in {}", input.display());
        return Ok(());
    }

    info!("Found {} .json files", files.len());

    // Configure thread pool if jobs specified
    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Atomic counters for thread-safe progress tracking
    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let outcomes: Vec<_> = files
        .par_iter()
        .map(|file| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let output_file = output_dir
                .join(relative)
                .with_extension(rendering.format.extension());

            match convert_file_inner(file, &output_file, transformer, rendering) {
                Ok(report) => {
                    success.fetch_add(1, Ordering::Relaxed);
                    if !quiet {
                        println!("{}", output_file.display());
                    }
                    debug!(file = %file.display(), ?report, "converted");
                    Ok(report)
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    Err((file.clone(), e))
                }
            }
        })
        .collect();

    // One summary of soft conditions across the whole directory
    let mut summary = Report::default();
    for outcome in outcomes {
        match outcome {
            Ok(report) => summary.merge(report),
            Err((file, e)) => error!("Error converting {}: {:#}", file.display(), e),
        }
    }
    log_report(&input.display().to_string(), &summary);

    let success_count = success.load(Ordering::Relaxed);
    let failed_count = failed.load(Ordering::Relaxed);

    info!("Converted {} files, {} failed", success_count, failed_count);

    if failed_count > 0 {
        anyhow::bail!("{} files failed to convert", failed_count);
    }

    Ok(())
}

/// Read, transform and write one file without printing
///
/// Nothing is written when the transform fails.
fn convert_file_inner(
    input: &Path,
    output: &Path,
    transformer: &Transformer,
    rendering: Rendering,
) -> Result<Report> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    let (rendered, report) = render(&content, transformer, rendering)
        .with_context(|| format!("Failed to convert: {}", input.display()))?;

    write_output(output, &rendered)?;
    Ok(report)
}

/// Collect all mdast `.json` files in a directory, skipping rendered `.bn.json` output
fn collect_json_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if is_document(&path) {
                files.push(path);
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_json_files(&path, recursive)?);
        }
    }

    files.sort();
    Ok(files)
}

fn is_document(path: &Path) -> bool {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let is_rendered = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".bn.json"));
    is_json && !is_rendered
}

/// Core conversion function
fn render(
    content: &str,
    transformer: &Transformer,
    rendering: Rendering,
) -> Result<(String, Report)> {
    let document: Node = serde_json::from_str(content).context("Failed to parse mdast JSON")?;
    let (root, report) = transformer.process_with_report(&document)?;

    let rendered = match rendering.format {
        OutputFormat::Json if rendering.pretty => serde_json::to_string_pretty(&root)?,
        OutputFormat::Json => serde_json::to_string(&root)?,
        OutputFormat::Html => to_html(&root, &WriterOptions::default()),
    };
    Ok((rendered, report))
}

/// Write rendered output to a file, creating parent directories, or to stdout for `-`
fn write_output(output: &Path, rendered: &str) -> Result<()> {
    if output.as_os_str() == STDIO {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", rendered).context("Failed to write to stdout")?;
        return Ok(());
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(output, format!("{}\n", rendered))
        .with_context(|| format!("Failed to write: {}", output.display()))
}

/// Surface the soft conditions of a document or directory as warnings
fn log_report(source: &str, report: &Report) {
    for (node_type, count) in &report.unknown_types {
        warn!(
            "{}: no handler for `{}` ({} rendered as fallback)",
            source, node_type, count
        );
    }
    for (language, count) in &report.unrecognized_languages {
        warn!(
            "{}: unrecognized code language `{}` ({} blocks)",
            source, language, count
        );
    }
    for (name, count) in &report.rejected_overrides {
        warn!(
            "{}: skipped data override {:?}, not a valid HTML name ({} times)",
            source, name, count
        );
    }
}

/// Write a sample `_md2bn.toml` to the current directory
fn init(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::sample().to_toml_with_schema()?;
    fs::write(path, content).with_context(|| format!("Failed to write: {}", path.display()))?;

    println!("{}", path.display());
    Ok(())
}
