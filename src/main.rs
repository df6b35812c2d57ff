use clap::Parser;
use scene_export::export::{
    DEFAULT_PATHS_FILE, DEFAULT_WAYPOINTS_FILE, ExportConfig, PathOutcome, run_export,
};
use scene_export::scene::{Scene, SceneError};
use std::path::PathBuf;
use std::process;

/// Export curve paths and waypoint markers from a scene dump to JSON files
/// for a web 3D renderer.
#[derive(Parser)]
#[command(name = "scene-export")]
struct Args {
    /// Scene dump JSON produced by the authoring tool
    scene: PathBuf,

    /// Destination file for the path point lists
    #[arg(long, default_value = DEFAULT_PATHS_FILE)]
    paths: PathBuf,

    /// Destination file for the waypoint positions
    #[arg(long, default_value = DEFAULT_WAYPOINTS_FILE)]
    waypoints: PathBuf,
}

fn main() {
    let args = Args::parse();

    let scene = match Scene::load(&args.scene) {
        Ok(scene) => scene,
        Err(e @ SceneError::Read { .. }) => {
            eprintln!("{e}");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(3);
        }
    };

    let config = ExportConfig {
        paths_file: args.paths,
        waypoints_file: args.waypoints,
    };

    let report = match run_export(&scene, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{e}");
            process::exit(4);
        }
    };

    println!("Median height (scene Z): {}", report.median_height);
    for outcome in &report.path_outcomes {
        match outcome {
            PathOutcome::Exported { name, vertex_count } => {
                println!("Exported {name}: {vertex_count} vertices");
            }
            PathOutcome::SkippedEmptyMesh { name } => {
                println!("Skipping {name}: no mesh data");
            }
        }
    }
    println!(
        "\nExported {} paths to: {}",
        report.exported_path_count(),
        config.paths_file.display()
    );
    println!("Path names: {:?}", report.exported_path_names());

    for (name, position) in &report.waypoints {
        println!("Exported waypoint {name}: {position:?}");
    }
    println!(
        "\nExported {} waypoints to: {}",
        report.waypoints.len(),
        config.waypoints_file.display()
    );
}
