//! Tile probe - builds a tile and prints terrain answers for one point.
//!
//! Usage: cargo run --release --bin probe_tile -- [OPTIONS]
//!
//! Options:
//!   --map-dir <DIR>     Map directory with height.png and <name>.json (required)
//!   --resources <DIR>   Directory with noise.png and the databases (default: resources)
//!   --config <FILE>     TileConfig JSON (default: built-in defaults)
//!   --x <METERS>        World X of the query (default: tile center)
//!   --z <METERS>        World Z of the query (default: tile center)
//!   --yaw <DEGREES>     Facing of the placed object (default: 0)
//!   --spawns            Also list world spawn points of every base

use std::path::PathBuf;
use std::time::Instant;

use serde_json::json;

use tileterrain::core::Result;
use tileterrain::{Tile, TileConfig, TileSources};

fn main() {
    tileterrain::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let Some(map_dir) = parse_str_arg(args, "--map-dir").map(PathBuf::from) else {
        eprintln!("usage: probe_tile --map-dir <DIR> [--resources <DIR>] [--config <FILE>] [--x <M>] [--z <M>] [--yaw <DEG>] [--spawns]");
        std::process::exit(2);
    };
    let resources = parse_str_arg(args, "--resources")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("resources"));
    let config = match parse_str_arg(args, "--config") {
        Some(path) => TileConfig::load(&PathBuf::from(path))?,
        None => TileConfig::default(),
    };

    let start = Instant::now();
    let sources = TileSources::from_map_dir(&map_dir, &resources)?;
    let tile = Tile::load(&sources, config)?;
    log::info!("Tile built in {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);

    let center = tile.tile_size() / 2.0;
    let x = parse_f64_arg(args, "--x").unwrap_or(center);
    let z = parse_f64_arg(args, "--z").unwrap_or(center);
    let yaw = parse_f64_arg(args, "--yaw").unwrap_or(0.0);
    let step = tile.config().placement.normal_step;

    let mut report = json!({
        "calibration": tile.calibration(),
        "elevation_range": tile.elevation_range(),
        "tile_size": tile.tile_size(),
        "counts": {
            "bases": tile.bases().len(),
            "city_blocks": tile.city_blocks().len(),
            "static_surfaces": tile.static_surfaces().len(),
            "road_segments": tile.road_segments().len(),
        },
        "query": {
            "x": x,
            "z": z,
            "height": tile.height_at(x, z),
            "normal": tile.normal_at(x, z, step),
            "on_road": tile.is_on_road(x, z, tile.config().placement.road_tolerance),
            "city_density": tile.city_density_at(x, z),
            "nearest_base": tile.bases().nearest(x, z).map(|(b, d)| json!({"name": b.name, "distance": d})),
            "placement": tile.resolve_placement(x, z, yaw),
        },
    });

    if has_flag(args, "--spawns") {
        let spawns: Vec<_> = tile
            .bases()
            .iter()
            .map(|b| json!({"base": b.name, "prefab": b.prefab_type, "spawns": tile.base_spawns(b)}))
            .collect();
        report["spawns"] = json!(spawns);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_f64_arg(args: &[String], flag: &str) -> Option<f64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
