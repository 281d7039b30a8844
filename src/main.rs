use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use barcode_tagger::processing::{process_bam, TagConfig};
use barcode_tagger::whitelist::Whitelist;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Tags BAM records with whitelist-corrected cell barcodes from the read name"
)]
struct Args {
    /// Input file (BAM or SAM)
    #[arg(short, long)]
    input: PathBuf,

    /// Barcode whitelist: tab-separated, canonical name then barcode
    /// sequence per line (plain text or gzipped)
    #[arg(short, long)]
    barcodes: PathBuf,

    /// Output BAM file
    #[arg(short, long)]
    output: PathBuf,

    /// Character separating the fields of the read name
    #[arg(short, long)]
    delimiter: char,

    /// 0-based field holding the observed cell barcode
    #[arg(long)]
    cbc_field: usize,

    /// 0-based field holding the unique molecular identifier
    #[arg(long)]
    umi_field: usize,

    /// Number of threads for parallel processing
    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// Verbose output (show elapsed time)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// CLI entry point: parse args, load the whitelist, and stream the input
/// through the tagger. Prints a concise tab-separated summary:
/// input filename, records tagged.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let args = Args::parse();

    // Set up thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    let config = TagConfig {
        delimiter: args.delimiter,
        cbc_field: args.cbc_field,
        umi_field: args.umi_field,
    };

    // The whitelist is built once up front and read-only afterwards; a load
    // failure aborts before any record is touched.
    let whitelist = Whitelist::from_path(&args.barcodes)?;
    info!(
        "Loaded {} whitelist barcodes from {}",
        whitelist.len(),
        args.barcodes.display()
    );

    // Start timer
    let start = std::time::Instant::now();

    let total = process_bam(&args.input, &args.output, &config, &whitelist)?;

    let elapsed = start.elapsed();

    // Include input filename as first column for easier aggregation in shell loops
    let fname = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| args.input.to_string_lossy().to_string());

    println!("{}\t{}", fname, total);

    if args.verbose {
        println!("Elapsed: {:.3}s", elapsed.as_secs_f64());
    }

    Ok(())
}
