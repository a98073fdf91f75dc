//! A binary to count aligned reads over restriction fragments.
//!
//! ```shell
//! cargo run --release --bin=fragcount --features=binaries -- \
//!     --fragments fragments.bed.gz --mode flank wt.bam ko.bam
//! ```
//!
//! The fragment-by-sample count matrix is written as tab-delimited text to the
//! output file (or standard output). Each sample is counted on its own worker.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use clap_verbosity_flag::Verbosity;
use fragcount::assign;
use fragcount::bam;
use fragcount::core::fragment::Set;
use fragcount::count::Matrix;
use fragcount::engine;
use fragcount::flank;
use fragcount::reader;
use omics::coordinate::interval::interbase::Interval;
use omics::coordinate::position::Number;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////
// Arguments
////////////////////////////////////////////////////////////////////////////////////////

/// The counting mode.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Count reads whose 5' position falls anywhere within a fragment.
    Inner,

    /// Count reads whose 5' position falls within a window at either end of a
    /// fragment.
    Flank,
}

/// The policy for reads that fall within more than one fragment.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Overlap {
    /// Assign the read to the fragment with the lowest identifier.
    Lowest,

    /// Leave the read unassigned.
    Discard,
}

impl From<Overlap> for assign::Overlap {
    fn from(value: Overlap) -> Self {
        match value {
            Overlap::Lowest => assign::Overlap::Lowest,
            Overlap::Discard => assign::Overlap::Discard,
        }
    }
}

/// Count aligned reads over restriction fragments.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The BAM files to count, one sample per file.
    #[arg(required = true)]
    bams: Vec<PathBuf>,

    /// A BED file of fragments (optionally gzipped).
    #[arg(short, long, conflicts_with = "region", required_unless_present = "region")]
    fragments: Option<PathBuf>,

    /// A fragment given as an interbase interval, such as `chr1:+:99-199`
    /// for the same fragment as the BED record `chr1 99 199`. May be repeated.
    #[arg(short, long)]
    region: Vec<Interval>,

    /// The counting mode.
    #[arg(short, long, value_enum, default_value_t = Mode::Inner)]
    mode: Mode,

    /// The width of each flanking window in `flank` mode.
    #[arg(long, default_value_t = flank::DEFAULT_SIZE)]
    flank_size: Number,

    /// The policy for reads that fall within more than one fragment.
    #[arg(long, value_enum, default_value_t = Overlap::Lowest)]
    overlap: Overlap,

    /// Ignore reads and header contigs that no fragment is located on instead
    /// of failing.
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// The label for each sample, in the same order as the BAM files.
    ///
    /// Defaults to the file stem of each BAM file.
    #[arg(short, long)]
    label: Vec<String>,

    /// The number of worker threads (defaults to the number of CPUs).
    #[arg(short, long)]
    threads: Option<usize>,

    /// The file to write the count matrix to (defaults to standard output).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a per-sample assignment summary to standard error.
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

////////////////////////////////////////////////////////////////////////////////////////
// Helpers
////////////////////////////////////////////////////////////////////////////////////////

/// Loads the fragments from either a BED file or the provided regions.
fn load_fragments(args: &Args) -> Result<Set> {
    match &args.fragments {
        Some(path) => {
            info!("fragments: reading {}", path.display());

            reader::open(path)
                .with_context(|| format!("opening fragment file {}", path.display()))?
                .fragments()
                .with_context(|| format!("reading fragment file {}", path.display()))
        }
        None => Set::try_from_intervals(args.region.iter().cloned())
            .context("building fragments from regions"),
    }
}

/// Gets the default label for a BAM file.
fn default_label(path: &Path) -> Result<String> {
    match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => Ok(stem.to_string()),
        None => bail!("cannot derive a sample label from {}", path.display()),
    }
}

/// Gets the labels for all samples.
fn labels(args: &Args) -> Result<Vec<String>> {
    if args.label.is_empty() {
        return args.bams.iter().map(|path| default_label(path)).collect();
    }

    if args.label.len() != args.bams.len() {
        bail!(
            "{} labels were provided for {} BAM files",
            args.label.len(),
            args.bams.len()
        );
    }

    Ok(args.label.clone())
}

/// Prints a per-sample summary table to standard error.
fn print_summary(matrix: &Matrix) {
    let mut builder = Builder::default();
    builder.push_record([
        "Sample",
        "Total",
        "Assigned",
        "Duplicate",
        "No Features",
        "Ambiguous",
        "Unknown Contig",
    ]);

    for (label, summary) in matrix.summaries() {
        builder.push_record([
            label.to_string(),
            summary.total.to_string(),
            summary.assigned.to_string(),
            summary.duplicate.to_string(),
            summary.no_features.to_string(),
            summary.ambiguous.to_string(),
            summary.unknown_contig.to_string(),
        ]);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Columns::new(1..), Alignment::right())
        .to_string();

    eprintln!("{}", table);
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

fn throw(args: &Args) -> Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring the worker pool")?;
    }

    let mode = match args.mode {
        Mode::Inner => assign::Mode::Inner,
        Mode::Flank => assign::Mode::Flank(
            flank::Size::try_new(args.flank_size).context("parsing the flank size")?,
        ),
    };

    let strictness = match args.lenient {
        true => assign::Strictness::Lenient,
        false => assign::Strictness::Strict,
    };

    let fragments = load_fragments(args)?;
    info!("fragments: loaded {} fragments", fragments.len());

    let engine = engine::Builder::default()
        .mode(mode)?
        .overlap(args.overlap.into())?
        .strictness(strictness)?
        .try_build_from(fragments)
        .context("building the counting engine")?;

    let samples = args
        .bams
        .iter()
        .zip(labels(args)?)
        .map(|(path, label)| {
            bam::open(path, label).with_context(|| format!("opening BAM file {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let matrix = engine.count(samples).context("counting samples")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            matrix
                .write_tsv(BufWriter::new(file))
                .with_context(|| format!("writing count matrix to {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout().lock();
            matrix
                .write_tsv(BufWriter::new(stdout))
                .context("writing count matrix to standard output")?;
        }
    }

    if args.summary {
        print_summary(&matrix);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(io::stderr)
            .init(),
    };

    throw(&args)
}
