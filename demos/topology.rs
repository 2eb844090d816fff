use std::path::PathBuf;

use clap::Parser;

use rbd_rs::proba::ProbabilityMap;
use rbd_rs::types::NodeId;
use rbd_rs::{pathset, sdp, utils};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Path-sets file: one term per line, whitespace-separated ids.
    #[arg(value_name = "FILE")]
    pathsets: PathBuf,

    /// Source node id.
    #[clap(long, value_name = "INT", default_value = "1")]
    src: NodeId,

    /// Destination node id.
    #[clap(long, value_name = "INT", default_value = "2")]
    dst: NodeId,

    /// Uniform component availability.
    #[clap(long, value_name = "FLOAT", default_value = "0.9")]
    avail: f64,

    /// Algorithm: "pathset", "sdp", or "sdp-parallel".
    #[clap(long, value_name = "NAME", default_value = "sdp")]
    algorithm: String,

    /// Write the SDP forest to this file (sdp algorithms only).
    #[clap(long, value_name = "FILE")]
    dump: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let path_sets = utils::read_pathsets_from_file(&args.pathsets)?;
    println!("Read {} path sets:", path_sets.len());
    print!("{}", utils::terms_to_string(&path_sets));

    let max_id = path_sets
        .iter()
        .flatten()
        .map(|lit| lit.abs())
        .max()
        .unwrap_or(0)
        .max(args.src)
        .max(args.dst);
    let map = ProbabilityMap::from_uniform(max_id, args.avail);

    let availability = match args.algorithm.as_str() {
        "pathset" => pathset::eval_avail(args.src, args.dst, &map, path_sets)?,
        "sdp" | "sdp-parallel" => {
            let forest = if args.algorithm == "sdp" {
                sdp::to_sdp_set(path_sets)
            } else {
                sdp::to_sdp_set_parallel(path_sets)
            };
            println!("SDP forest has {} products", forest.len());
            if let Some(dump) = &args.dump {
                utils::write_sdp_sets_to_file(&forest, dump)?;
                println!("SDP forest written to {}", dump.display());
            }
            sdp::sdp_to_avail(&map, &forest)?
        }
        other => color_eyre::eyre::bail!("unknown algorithm: {}", other),
    };

    println!(
        "Availability of ({}, {}) = {}",
        args.src, args.dst, availability
    );
    println!("Total time: {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
