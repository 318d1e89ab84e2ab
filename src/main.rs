use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use correlation_cluster_analyzer::storage::RunRecord;
use correlation_cluster_analyzer::{
    data, storage, AnalysisConfig, ClusteringEngine, LogObserver,
};

#[derive(Parser, Debug)]
#[clap(
    name = "correlation-cluster-analyzer",
    about = "Hierarchical correlation clustering of signed graphs with a non-agreement ranking index"
)]
struct Cli {
    /// Path to the input edge table (first line `n m`, then one pair per line)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Default disagreement threshold
    #[clap(long, default_value = "0.8")]
    eps: f64,

    /// File with a hierarchical threshold schedule, one epsilon per line
    #[clap(long)]
    schedule: Option<String>,

    /// Derive a schedule of this length from the observed score distribution
    #[clap(long)]
    auto_schedule: Option<usize>,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads for the index build
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting correlation clustering analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;
    let output_dir = Path::new(&args.output_dir);
    let prefix = Path::new(&args.input)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("graph")
        .to_string();

    // 1. Load the graph
    let started = Instant::now();
    let mut graph = data::read_graph_table(Path::new(&args.input))?;
    log::info!(
        "Time to read the graph with n: {}, m: {} is: {} ms",
        graph.vertex_count(),
        graph.edge_count(),
        started.elapsed().as_millis()
    );
    graph.set_observer(Arc::new(LogObserver));

    // 2. Build both engines; indexed construction time covers the ranking
    // indices
    let direct = ClusteringEngine::direct(&graph);
    let started = Instant::now();
    let mut indexed = ClusteringEngine::indexed(&graph)?;
    log::info!(
        "Time to construct ranking indices: {} ms",
        started.elapsed().as_millis()
    );

    // 3. Save the observed non-agreement distribution
    let distribution = indexed.index_store().score_distribution();
    storage::write_distribution(
        &output_dir.join(format!("{}_eps_distribution.tsv", prefix)),
        &distribution,
    )?;

    // 4. Resolve the threshold schedule
    let config = if let Some(schedule_path) = &args.schedule {
        AnalysisConfig::from_schedule_file(args.eps, Path::new(schedule_path))?
    } else if let Some(length) = args.auto_schedule {
        AnalysisConfig::auto_schedule(args.eps, &distribution, length)
    } else {
        AnalysisConfig::single(args.eps)
    };
    log::info!("Threshold schedule: {:?}", config.thresholds());

    // 5. Run both engines at every threshold
    let mut runs = Vec::new();
    for eps in config.thresholds() {
        let started = Instant::now();
        let direct_assignment = direct.query(eps)?;
        let direct_millis = started.elapsed().as_millis();
        log::info!(
            "Time for direct correlation clustering (eps = {}): {} ms",
            eps,
            direct_millis
        );
        storage::write_assignment(
            &output_dir.join(format!("{}_{}_direct.tsv", prefix, eps)),
            &direct_assignment,
        )?;

        indexed.rebuild_index()?;
        let started = Instant::now();
        let indexed_assignment = indexed.query(eps)?;
        let indexed_millis = started.elapsed().as_millis();
        log::info!(
            "Time for index-based correlation clustering (eps = {}): {} ms",
            eps,
            indexed_millis
        );
        storage::write_assignment(
            &output_dir.join(format!("{}_{}_indexed.tsv", prefix, eps)),
            &indexed_assignment,
        )?;

        if direct_assignment != indexed_assignment {
            log::warn!(
                "Direct and indexed assignments differ at eps = {}; the index is stale",
                eps
            );
        }
        runs.push(RunRecord {
            eps,
            cluster_count: direct_assignment.cluster_count(),
            direct_millis,
            indexed_millis,
        });
    }

    // 6. Save the run summary
    storage::write_summary(&output_dir.join("summary.json"), &graph, &runs)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
