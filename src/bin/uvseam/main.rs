//! uvseam CLI - break Phong shading along UV borders.
//!
//! Usage: uvseam <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `uvseam --help` for available commands. Set `RUST_LOG=info` to see
//! per-object diagnostics.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use uvseam::algo::classify::{classify, ClassifyOptions};
use uvseam::algo::normals::phong_normals;
use uvseam::algo::shading::PhongSettings;
use uvseam::algo::Progress;
use uvseam::io;
use uvseam::mesh::{PolyMesh, UvTag};
use uvseam::scene::{
    break_selected_with_progress, BreakOptions, History, PolygonObject, Scene, SceneNode,
};
use uvseam::topology::TopologyIndex;

#[derive(Parser)]
#[command(name = "uvseam")]
#[command(author, version, about = "Break Phong shading along UV borders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh, topology and UV seam information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Mark UV borders as hard edges and write Phong normals
    Break {
        /// Input mesh file (must carry texture coordinates)
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Phong angle limit in degrees (0 to 180)
        #[arg(short, long, default_value = "180")]
        angle: f64,

        /// Print every hard edge
        #[arg(short, long)]
        list: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Break {
            input,
            output,
            angle,
            list,
            sequential,
        } => {
            cmd_break(&input, &output, angle, list, sequential)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Monotonic: never move the bar backwards
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        let percent = previous.max(raw_percent);
        if percent == previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn object_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("object")
        .to_string()
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (mesh, uvs): (PolyMesh, Option<UvTag>) = io::load_with_uvs(input)?;
    let topology = TopologyIndex::build(&mesh);

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!(
        "Polygons: {} ({} triangles, {} quads)",
        mesh.num_polygons(),
        mesh.num_triangles(),
        mesh.num_quads()
    );
    println!("Edges: {}", topology.edge_count());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    if topology.is_closed() {
        println!("Topology: Closed (no boundary)");
    } else {
        println!(
            "Topology: Open ({} boundary edges)",
            topology.boundary_edge_count()
        );
    }
    if !topology.is_manifold() {
        println!(
            "Non-manifold edges: {}",
            topology.non_manifold_edges().count()
        );
    }

    match uvs {
        Some(uvs) => {
            if let Some((min, max)) = uvs.bounding_box() {
                println!(
                    "UV bounds: ({:.3}, {:.3}) to ({:.3}, {:.3})",
                    min.x, min.y, max.x, max.y
                );
            }
            let classification = classify(&mesh, &topology, &uvs, &ClassifyOptions::default())?;
            println!("UV seams: {}", classification.seam_count());
            println!(
                "Break edges: {} ({} borders + {} seams)",
                classification.len(),
                classification.border_count(),
                classification.seam_count()
            );
        }
        None => println!("UV: none (no texture coordinates)"),
    }

    Ok(())
}

fn cmd_break(
    input: &Path,
    output: &Path,
    angle: f64,
    list: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mesh, uvs): (PolyMesh, Option<UvTag>) = io::load_with_uvs(input)?;
    println!(
        "Loaded: {} vertices, {} polygons",
        mesh.num_vertices(),
        mesh.num_polygons()
    );

    let mut object = PolygonObject::new(mesh);
    object.uvs = uvs;

    let name = object_name(input);
    let mut scene = Scene::new();
    let path = scene.add_root(SceneNode::polygon(name.clone(), object).selected(true));
    let mut history = History::new();

    let options = BreakOptions::default()
        .with_classify(ClassifyOptions::default().with_parallel(!sequential))
        .with_phong(PhongSettings::default().with_angle_limit(angle)?);

    let mode = if sequential { "sequential" } else { "parallel" };
    println!("Classifying edges ({})...", mode);

    let start = Instant::now();
    let mut report =
        break_selected_with_progress(&mut scene, &mut history, &options, &create_progress());
    let elapsed = start.elapsed();

    if let Some(skipped) = report.skipped.first() {
        return Err(format!("`{}` {}", name, skipped.reason).into());
    }
    if let Some(failed) = report.failed.pop() {
        return Err(failed.error.into());
    }

    for processed in &report.processed {
        println!(
            "Broke shading on {} edges ({} borders, {} seams) in {:.2?}",
            processed.borders + processed.seams,
            processed.borders,
            processed.seams,
            elapsed
        );
        if processed.non_manifold > 0 {
            println!(
                "Skipped {} non-manifold edges",
                processed.non_manifold
            );
        }
    }

    let object = scene
        .polygon_object(&path)
        .ok_or("processed object disappeared from the scene")?;
    let topology = TopologyIndex::build(&object.mesh);

    if list {
        for key in topology.edges() {
            if !object.is_hard_edge(key, &topology) {
                continue;
            }
            let kind = match topology.incident(key) {
                Ok(polys) if polys.is_boundary() => "border",
                _ => "seam",
            };
            println!("{} {} {}", key.lo().index(), key.hi().index(), kind);
        }
    }

    let phong = object.phong.unwrap_or(options.phong);
    let normals = phong_normals(
        &object.mesh,
        &topology,
        |key| object.is_hard_edge(key, &topology),
        &phong,
    );

    io::save_with_uvs(&object.mesh, object.uvs.as_ref(), Some(&normals), output)?;
    println!("Saved: {}", output.display());

    Ok(())
}
