//! # scene-export
//!
//! A Rust library for extracting curve paths and waypoint markers from a 3D
//! authoring tool's scene dump and writing them as JSON for a web renderer.
//!
//! ## Pipeline
//!
//! 1. **Height survey**: collect the world-space height of every control
//!    point on every exportable curve and take the median
//! 2. **Path export**: discretize each exportable curve into a vertex list,
//!    remap Z-up world coordinates to the renderer's Y-up convention, and
//!    flatten everything onto the median height plane
//! 3. **Waypoint export**: export the world position of every object named
//!    with the `wp` prefix, remapped the same way
//!
//! ## Example
//!
//! ```rust,ignore
//! use scene_export::export::{run_export, ExportConfig};
//! use scene_export::scene::Scene;
//!
//! let scene = Scene::load("scene.json").unwrap();
//! let report = run_export(&scene, &ExportConfig::default()).unwrap();
//! println!("median height: {}", report.median_height);
//! ```

pub mod export;
pub mod scene;

// Re-export commonly used items
pub use export::{
    ExportConfig, ExportError, ExportReport, PathExport, PathOutcome, export_paths,
    export_waypoints, run_export, survey_heights,
};
pub use scene::{ObjectKind, Scene, SceneError, SceneObject};
