//! Ortho Connector CLI
//!
//! Usage:
//!   ortho-connector [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Router configuration (TOML format)
//!   -m, --moved <ID>     Reroute connectors attached to this shape (repeatable)
//!   -n, --nearest <X,Y>  Print the nearest anchor to a point instead
//!   -v, --verbose        Debug tracing on stderr
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use ortho_connector::{Point, RouterConfig, Scene};

#[derive(Parser)]
#[command(name = "ortho-connector")]
#[command(about = "Route orthogonal connectors in a TOML scene")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Router configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only reroute connectors attached to these shapes
    #[arg(short, long = "moved", value_name = "ID")]
    moved: Vec<String>,

    /// Print the nearest anchor to X,Y instead of the scene
    #[arg(short, long, value_name = "X,Y", value_parser = parse_point)]
    nearest: Option<Point>,

    /// Show routing decisions on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", value))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", s.trim(), e))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match RouterConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RouterConfig::default(),
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut scene = match Scene::from_str(&source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(point) = cli.nearest {
        match scene.nearest_anchor(point.x, point.y, None, &config) {
            Some(anchor) => match toml::to_string(&anchor) {
                Ok(text) => print!("{}", text),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            },
            None => eprintln!("No anchor within {} of ({}, {})", config.snap_radius, point.x, point.y),
        }
        return;
    }

    if cli.moved.is_empty() {
        scene.reroute_all(&config);
    } else {
        for id in &cli.moved {
            if scene.shapes().get(id).is_none() {
                eprintln!("Error: no shape with id '{}'", id);
                std::process::exit(1);
            }
            scene.shape_moved(id, &config);
        }
    }

    match scene.to_toml() {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
