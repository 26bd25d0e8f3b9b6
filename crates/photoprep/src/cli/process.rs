//! The `photoprep process` command for processing images.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use photoprep_core::pipeline::discovery::{self, DiscoveredFile};
use photoprep_core::{
    Config, OutputFormat as CoreOutputFormat, OutputWriter, ProcessOutcome, Processor,
};

/// Output format choice for the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Image file or directory to process
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Coldpreview maximum dimension in pixels (defaults to the configured size)
    #[arg(long)]
    pub cold_size: Option<u32>,

    /// Skip coldpreview generation entirely
    #[arg(long, conflicts_with = "cold_size")]
    pub no_cold: bool,

    /// Coldpreview JPEG quality, 1-100 (defaults to the configured value).
    /// The hotpreview quality is fixed by config: it defines the hothash.
    #[arg(short, long)]
    pub quality: Option<u8>,
}

/// Execute the process command.
pub fn execute(args: ProcessArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(quality) = args.quality {
        anyhow::ensure!(
            (1..=100).contains(&quality),
            "--quality must be between 1 and 100"
        );
        config.preview.cold_quality = quality;
    }
    let cold_target = if args.no_cold {
        None
    } else {
        Some(args.cold_size.unwrap_or(config.preview.cold_size))
    };
    let format = resolve_format(&args, &config);
    let pretty = args.pretty || config.output.pretty;

    let processor = Processor::new(config);

    // An explicitly named file goes straight to the pipeline, bypassing
    // the discovery filter, so the validator's failure reason surfaces
    // even for unsupported extensions.
    if args.input.is_file() {
        return process_single(&processor, &args, cold_target, format, pretty);
    }

    let files = discovery::discover(&args.input);
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to process", files.len());

    process_batch(&processor, &args, files, cold_target, format, pretty)
}

/// Pick the output format: CLI flag, then config file, then JSON.
fn resolve_format(args: &ProcessArgs, config: &Config) -> CoreOutputFormat {
    match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Json),
    }
}

/// Process a single image file and emit its outcome.
fn process_single(
    processor: &Processor,
    args: &ProcessArgs,
    cold_target: Option<u32>,
    format: CoreOutputFormat,
    pretty: bool,
) -> anyhow::Result<()> {
    let outcome = processor.process(&args.input, cold_target);

    write_outcomes(
        std::slice::from_ref(&outcome),
        &args.output,
        format,
        pretty,
        false,
    )?;

    if outcome.failed() {
        let reason = outcome.error.as_deref().unwrap_or("unknown error");
        anyhow::bail!("processing failed: {reason}");
    }
    Ok(())
}

/// Process a directory of images with a progress bar and summary.
fn process_batch(
    processor: &Processor,
    args: &ProcessArgs,
    files: Vec<DiscoveredFile>,
    cold_target: Option<u32>,
    format: CoreOutputFormat,
    pretty: bool,
) -> anyhow::Result<()> {
    let total_bytes = discovery::total_size(&files);
    let paths: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();

    let progress = create_progress_bar(paths.len() as u64);
    let start_time = std::time::Instant::now();
    let mut succeeded: u64 = 0;
    let mut failed: u64 = 0;

    let mut on_progress = |_index: usize, _total: usize, outcome: &ProcessOutcome| {
        if outcome.success {
            succeeded += 1;
        } else {
            failed += 1;
        }
        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            let rate = (succeeded + failed) as f64 / elapsed;
            progress.set_message(format!("{:.1} img/sec", rate));
        }
    };
    let outcomes = processor.batch(&paths, cold_target, Some(&mut on_progress));

    progress.finish_and_clear();

    write_outcomes(&outcomes, &args.output, format, pretty, true)?;
    if let Some(output_path) = &args.output {
        tracing::info!("Output written to {:?}", output_path);
    }

    print_summary(succeeded, failed, total_bytes, start_time.elapsed());
    Ok(())
}

/// Write outcomes to the output file, or to stdout when none is given.
///
/// Single-file runs emit one object; batches emit a JSON array (or one
/// line per outcome for JSONL), even when the batch found a single file.
fn write_outcomes(
    outcomes: &[ProcessOutcome],
    output: &Option<PathBuf>,
    format: CoreOutputFormat,
    pretty: bool,
    as_batch: bool,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = OutputWriter::new(BufWriter::new(file), format, pretty);
            write_shape(&mut writer, outcomes, as_batch)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = OutputWriter::new(stdout.lock(), format, pretty);
            write_shape(&mut writer, outcomes, as_batch)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_shape<W: Write>(
    writer: &mut OutputWriter<W>,
    outcomes: &[ProcessOutcome],
    as_batch: bool,
) -> std::io::Result<()> {
    if as_batch {
        writer.write_all(outcomes)
    } else {
        match outcomes {
            [single] => writer.write(single),
            many => writer.write_all(many),
        }
    }
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(succeeded: u64, failed: u64, total_bytes: u64, elapsed: std::time::Duration) {
    let total = succeeded + failed;
    let rate = if elapsed.as_secs_f64() > 0.0 {
        total as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };
    let throughput = if elapsed.as_secs_f64() > 0.0 {
        (total_bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", succeeded);
    if failed > 0 {
        eprintln!("    Failed:       {:>8}", failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("    Throughput:   {:>7.1} MB/sec", throughput);
    eprintln!("  ====================================");
}
