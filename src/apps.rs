use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, error::ErrorKind};
use tracing::info;

use crate::config::TrainingFlags;
use crate::constants::audio::{
    DEFAULT_CLIP_DURATION_MS, DEFAULT_NUM_COEFFICIENT, DEFAULT_SAMPLE_RATE,
    DEFAULT_WINDOW_SIZE_MS, DEFAULT_WINDOW_STRIDE_MS,
};
use crate::constants::corpus::DEFAULT_DATA_DIR;
use crate::constants::model::{
    DEFAULT_BATCH_SIZE, DEFAULT_DIMENSION_PROJECTION, DEFAULT_NUM_LAYERS, DEFAULT_NUM_REPEATS,
    DEFAULT_NUM_UNITS, DEFAULT_NUM_UTT_ENROLLMENT,
};
use crate::constants::partition::{
    ALL_PARTITIONS, DEFAULT_TESTING_PERCENTAGE, DEFAULT_VALIDATION_PERCENTAGE,
};
use crate::corpus::CorpusIndex;
use crate::hash::BucketHasher;
use crate::metrics::{expected_partition_counts, format_with_commas, partition_shares};
use crate::settings::prepare_settings;
use crate::splits::{PartitionPercentages, Partitioner};

#[derive(Debug, Parser)]
#[command(
    name = "split_report",
    disable_help_subcommand = true,
    about = "Deterministic training/validation/testing assignment",
    long_about = "Label explicit clip paths, or scan a dataset directory and report how its clips fall into training, validation, and testing partitions.",
    after_help = "Clips named <speaker>_nohash_<n>.wav share a partition per speaker."
)]
/// CLI for `split_report`.
///
/// Common usage:
/// - Label single files: `--path yes/bobby_nohash_0.wav --path no/alice_nohash_2.wav`
/// - Summarize a corpus: `--data-dir /data/speech_commands`
/// - Include every clip: `--data-dir /data/speech_commands --list`
struct SplitReportCli {
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        help = "Dataset root to scan (defaults to ./data)"
    )]
    data_dir: Option<PathBuf>,
    #[arg(
        long = "validation-percentage",
        default_value_t = DEFAULT_VALIDATION_PERCENTAGE,
        help = "Percent of speakers held out for validation"
    )]
    validation_percentage: f64,
    #[arg(
        long = "testing-percentage",
        default_value_t = DEFAULT_TESTING_PERCENTAGE,
        help = "Percent of speakers held out for testing"
    )]
    testing_percentage: f64,
    #[arg(
        long = "num-utt-enrollment",
        value_name = "N",
        help = "Also report speakers with at least N + 1 clips per partition"
    )]
    num_utt_enrollment: Option<usize>,
    #[arg(long, help = "Print the partition of every scanned clip")]
    list: bool,
    #[arg(
        long = "path",
        value_name = "PATH",
        help = "Clip path to label instead of scanning, repeat as needed"
    )]
    paths: Vec<String>,
}

#[derive(Debug, Parser)]
#[command(
    name = "prepare_settings",
    disable_help_subcommand = true,
    about = "Assemble model, audio, and input settings",
    long_about = "Derive LSTM, audio front-end, audio processor, and model input settings from training flags and print them as JSON."
)]
struct PrepareSettingsCli {
    #[arg(long = "data-dir", value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    #[arg(long = "num-units", default_value_t = DEFAULT_NUM_UNITS)]
    num_units: usize,
    #[arg(long = "dimension-projection", default_value_t = DEFAULT_DIMENSION_PROJECTION)]
    dimension_projection: usize,
    #[arg(long = "num-layers", default_value_t = DEFAULT_NUM_LAYERS)]
    num_layers: usize,
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,
    #[arg(long = "clip-duration-ms", default_value_t = DEFAULT_CLIP_DURATION_MS)]
    clip_duration_ms: u32,
    #[arg(long = "window-size-ms", default_value_t = DEFAULT_WINDOW_SIZE_MS)]
    window_size_ms: f64,
    #[arg(long = "window-stride-ms", default_value_t = DEFAULT_WINDOW_STRIDE_MS)]
    window_stride_ms: f64,
    #[arg(long = "num-coefficient", default_value_t = DEFAULT_NUM_COEFFICIENT)]
    num_coefficient: usize,
    #[arg(long = "num-repeats", default_value_t = DEFAULT_NUM_REPEATS)]
    num_repeats: usize,
    #[arg(long = "num-utt-enrollment", default_value_t = DEFAULT_NUM_UTT_ENROLLMENT)]
    num_utt_enrollment: usize,
    #[arg(
        long = "is-training",
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL",
        help = "Whether the run trains the model (true/false)"
    )]
    is_training: bool,
    #[arg(
        long = "batch-size",
        default_value_t = DEFAULT_BATCH_SIZE,
        value_parser = parse_batch_size
    )]
    batch_size: usize,
    #[arg(long = "validation-percentage", default_value_t = DEFAULT_VALIDATION_PERCENTAGE)]
    validation_percentage: f64,
    #[arg(long = "testing-percentage", default_value_t = DEFAULT_TESTING_PERCENTAGE)]
    testing_percentage: f64,
}

impl From<PrepareSettingsCli> for TrainingFlags {
    fn from(cli: PrepareSettingsCli) -> Self {
        Self {
            data_dir: cli.data_dir,
            num_units: cli.num_units,
            dimension_projection: cli.dimension_projection,
            num_layers: cli.num_layers,
            sample_rate: cli.sample_rate,
            clip_duration_ms: cli.clip_duration_ms,
            window_size_ms: cli.window_size_ms,
            window_stride_ms: cli.window_stride_ms,
            num_coefficient: cli.num_coefficient,
            num_repeats: cli.num_repeats,
            num_utt_enrollment: cli.num_utt_enrollment,
            is_training: cli.is_training,
            batch_size: cli.batch_size,
            validation_percentage: cli.validation_percentage,
            testing_percentage: cli.testing_percentage,
        }
    }
}

/// Entry point for the `split_report` binary.
pub fn run_split_report<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();
    let Some(cli) = parse_cli::<SplitReportCli, _>(
        std::iter::once("split_report".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let percentages =
        PartitionPercentages::new(cli.validation_percentage, cli.testing_percentage)?;
    let partitioner = Partitioner::new(percentages)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !cli.paths.is_empty() {
        write_path_labels(&mut out, &partitioner, &cli.paths)?;
        return Ok(());
    }

    let root = cli
        .data_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    info!(root = %root.display(), "scanning corpus");
    let index = CorpusIndex::scan(&root, &partitioner)?;
    write_corpus_report(&mut out, &index, percentages, cli.num_utt_enrollment)?;
    if cli.list {
        for sample in index.samples() {
            writeln!(out, "{}\t{}", sample.partition, sample.path.display())?;
        }
    }
    Ok(())
}

/// Entry point for the `prepare_settings` binary.
pub fn run_prepare_settings<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();
    let Some(cli) = parse_cli::<PrepareSettingsCli, _>(
        std::iter::once("prepare_settings".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let flags = TrainingFlags::from(cli);
    let prepared = prepare_settings(&flags)?;
    info!(shape = ?prepared.input.shape, "prepared model input");
    println!("{}", prepared.to_json()?);
    Ok(())
}

/// Write one `label<TAB>path` line per path.
pub fn write_path_labels<W, H>(
    out: &mut W,
    partitioner: &Partitioner<H>,
    paths: &[String],
) -> io::Result<()>
where
    W: Write,
    H: BucketHasher,
{
    for path in paths {
        writeln!(out, "{}\t{}", partitioner.label_for(path), path)?;
    }
    Ok(())
}

/// Write a per-partition summary of `index`.
pub fn write_corpus_report<W: Write>(
    out: &mut W,
    index: &CorpusIndex,
    percentages: PartitionPercentages,
    num_utt_enrollment: Option<usize>,
) -> io::Result<()> {
    writeln!(
        out,
        "{} clips under {}",
        format_with_commas(index.len()),
        index.root().display()
    )?;
    let expected = expected_partition_counts(index.len(), percentages);
    for share in partition_shares(&index.counts(), percentages) {
        let expected_count = expected
            .iter()
            .find(|(label, _)| *label == share.label)
            .map(|(_, count)| *count)
            .unwrap_or(0);
        writeln!(
            out,
            "{:<10} {:>10} clips  {:>6.2}% observed  {:>6.2}% configured  (~{} expected)",
            share.label.as_str(),
            format_with_commas(share.count),
            share.observed_percentage,
            share.expected_percentage,
            format_with_commas(expected_count),
        )?;
    }
    if let Some(enrollment) = num_utt_enrollment {
        for label in ALL_PARTITIONS {
            let speakers = index.enrollment_speakers(label, enrollment);
            writeln!(
                out,
                "{:<10} {} speakers with at least {} clips",
                label.as_str(),
                format_with_commas(speakers.len()),
                enrollment.saturating_add(1)
            )?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn parse_batch_size(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("--batch-size needs at least one clip per batch, got 0".to_string()),
        Ok(size) => Ok(size),
        Err(err) => Err(format!("--batch-size '{raw}' is not a clip count: {err}")),
    }
}

/// Parse `args`; `Ok(None)` means help or version text was already printed.
fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    let err = match T::try_parse_from(args) {
        Ok(cli) => return Ok(Some(cli)),
        Err(err) => err,
    };
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        err.print()?;
        return Ok(None);
    }
    Err(err.into())
}
