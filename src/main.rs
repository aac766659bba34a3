use clap::Parser;
use log::{debug, info};
use matlook::render::write_graph;
use matlook::{build_bipartite, check_merge_request, merge_clusters, parse_mapping, parse_matrix};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "matlook")]
#[command(about = "Visualize a dense matrix as a bipartite graph.", long_about = None)]
struct Args {
    // Input Options
    /// Read the matrix from this FILE (standard input when omitted).
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Split the columns into clusters using the ids in this FILE.
    #[arg(short = 'm', long = "mapping", value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// The inputs carry no "<height> <width>" line in front.
    #[arg(long = "no-size")]
    no_size: bool,

    // Output Options
    /// Write the visualization to this FILE (PNG or SVG based on extension).
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = "result.png")]
    output: PathBuf,

    /// Set the width in pixels of the output image.
    #[arg(short = 'x', long = "width", value_name = "N", default_value_t = 1200)]
    width: u32,

    /// Set the height in pixels of the output image.
    #[arg(short = 'y', long = "height", value_name = "N", default_value_t = 600)]
    height: u32,

    // Cluster Options
    /// Collapse clusters and draw only the connections between them.
    #[arg(short = 'M', long = "merge")]
    merge: bool,

    /// Also write the merged matrix to this FILE (mapping goes to <stem>.mapping.txt).
    #[arg(short = 'D', long = "dump-merged", value_name = "FILE", requires = "merge")]
    dump_merged: Option<PathBuf>,

    // Threading
    /// Number of threads to use for parallel operations.
    #[arg(short = 't', long = "threads", value_name = "N")]
    threads: Option<usize>,

    // Logging
    /// Verbosity level (0 = error, 1 = info, 2 = debug).
    #[arg(short = 'v', long = "verbose", value_name = "N", default_value_t = 1)]
    verbose: u8,
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn run(args: &Args) -> matlook::Result<()> {
    check_merge_request(args.merge, args.mapping.is_some())?;
    let has_size = !args.no_size;

    match args.input {
        Some(ref path) => info!("Loading matrix from {:?}...", path),
        None => info!("Loading matrix from standard input..."),
    }
    let content = read_input(args.input.as_deref())?;
    let matrix = parse_matrix(&content, has_size)?;
    info!("Matrix is {}x{}", matrix.height(), matrix.width());

    let mapping = match args.mapping {
        Some(ref path) => {
            info!("Loading mapping from {:?}...", path);
            let content = std::fs::read_to_string(path)?;
            Some(parse_mapping(content.trim(), has_size)?)
        }
        None => None,
    };

    let graph = if args.merge {
        let quotient = merge_clusters(&matrix, mapping.as_ref())?;
        if let Some(ref path) = args.dump_merged {
            quotient.write_to(path)?;
        }
        build_bipartite(&quotient.matrix, Some(&quotient.mapping))?
    } else {
        build_bipartite(&matrix, mapping.as_ref())?
    };
    debug!(
        "Graph has {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );

    write_graph(&graph, &args.output, args.width, args.height)
}

fn main() {
    let args = Args::parse();

    // Initialize logger based on verbosity
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    if let Some(threads) = args.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            eprintln!("Warning: could not configure {} threads: {}", threads, e);
        }
    }

    info!("Starting visualization...");

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!("Done.");
}
