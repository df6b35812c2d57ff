//! Scene export pipeline
//!
//! Three sequential stages over a parsed scene dump:
//!
//! 1. [`survey_heights`] scans every exportable curve's control points and
//!    takes the median of their world-space heights
//! 2. [`export_paths`] discretizes each exportable curve, remaps its points
//!    to the renderer's coordinate convention, and flattens them onto the
//!    median height plane
//! 3. [`export_waypoints`] does the same for single-point marker objects
//!
//! [`run_export`] sequences all three and writes the two output files.
//! Exportable curves are curve objects with a hyphen in their name;
//! waypoints are objects whose name starts with `wp` (case-insensitive).

use crate::scene::Scene;
use glam::DVec3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default destination for the path point lists.
pub const DEFAULT_PATHS_FILE: &str = "mesh_paths.json";
/// Default destination for the waypoint positions.
pub const DEFAULT_WAYPOINTS_FILE: &str = "waypoints.json";

/// Failure while writing export output.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode output JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Output destinations for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub paths_file: PathBuf,
    pub waypoints_file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            paths_file: PathBuf::from(DEFAULT_PATHS_FILE),
            waypoints_file: PathBuf::from(DEFAULT_WAYPOINTS_FILE),
        }
    }
}

/// Per-object result of the path export stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// The curve was discretized and its points written out.
    Exported { name: String, vertex_count: usize },
    /// The curve yielded no mesh data and was left out of the output.
    SkippedEmptyMesh { name: String },
}

impl PathOutcome {
    pub fn name(&self) -> &str {
        match self {
            PathOutcome::Exported { name, .. } => name,
            PathOutcome::SkippedEmptyMesh { name } => name,
        }
    }
}

/// Result of the path export stage: the name-keyed point lists destined for
/// the output file, plus a per-object outcome list for reporting.
#[derive(Debug, Clone, Default)]
pub struct PathExport {
    pub paths: BTreeMap<String, Vec<[f64; 3]>>,
    pub outcomes: Vec<PathOutcome>,
}

/// Summary of a full export run.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub median_height: f64,
    pub path_outcomes: Vec<PathOutcome>,
    pub waypoints: BTreeMap<String, [f64; 3]>,
}

impl ExportReport {
    pub fn exported_path_count(&self) -> usize {
        self.path_outcomes
            .iter()
            .filter(|o| matches!(o, PathOutcome::Exported { .. }))
            .count()
    }

    pub fn exported_path_names(&self) -> Vec<&str> {
        self.path_outcomes
            .iter()
            .filter(|o| matches!(o, PathOutcome::Exported { .. }))
            .map(PathOutcome::name)
            .collect()
    }
}

/// Median of a value collection, or `None` when it is empty.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Median world-space height over every control point (uniform and Bezier)
/// of every exportable curve in the scene. Falls back to `0.0` when the
/// scene has no eligible control points.
pub fn survey_heights(scene: &Scene) -> f64 {
    let mut heights = Vec::new();
    for obj in scene.objects.iter().filter(|o| o.is_path_curve()) {
        let Some(curve) = obj.curve.as_ref() else {
            continue;
        };
        let world = obj.world_matrix();
        for spline in &curve.splines {
            for p in &spline.points {
                heights.push(world.transform_point3(DVec3::from_array(*p)).z);
            }
            for bp in &spline.bezier_points {
                heights.push(world.transform_point3(DVec3::from_array(bp.co)).z);
            }
        }
    }
    median(heights).unwrap_or(0.0)
}

/// Remap a world-space point to the renderer's convention: the source is
/// Z-up, the destination Y-up, so Y takes the (flattened) height and the old
/// Y is negated to keep the orientation right-handed.
fn remap_point(world: DVec3, median_height: f64) -> [f64; 3] {
    [world.x, median_height, -world.y]
}

/// Discretize every exportable curve into a name-keyed point list, remapped
/// and flattened onto the median height plane. Curves without mesh data are
/// reported as skipped and get no output entry.
pub fn export_paths(scene: &Scene, median_height: f64) -> PathExport {
    let mut export = PathExport::default();
    for obj in scene.objects.iter().filter(|o| o.is_path_curve()) {
        let Some(mesh) = obj.evaluated_mesh() else {
            export.outcomes.push(PathOutcome::SkippedEmptyMesh {
                name: obj.name.clone(),
            });
            continue;
        };

        let world = obj.world_matrix();
        let points: Vec<[f64; 3]> = mesh
            .vertices
            .iter()
            .map(|v| remap_point(world.transform_point3(*v), median_height))
            .collect();

        export.outcomes.push(PathOutcome::Exported {
            name: obj.name.clone(),
            vertex_count: points.len(),
        });
        export.paths.insert(obj.name.clone(), points);
    }
    export
}

/// Export the world position of every waypoint marker, remapped and
/// flattened like path points.
pub fn export_waypoints(scene: &Scene, median_height: f64) -> BTreeMap<String, [f64; 3]> {
    scene
        .objects
        .iter()
        .filter(|o| o.is_waypoint())
        .map(|o| (o.name.clone(), remap_point(o.world_translation(), median_height)))
        .collect()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the full export: survey, path export, waypoint export, two file
/// writes. A write failure aborts the run immediately, so a failure on the
/// paths file leaves the waypoints file untouched.
pub fn run_export(scene: &Scene, config: &ExportConfig) -> Result<ExportReport, ExportError> {
    let median_height = survey_heights(scene);

    let path_export = export_paths(scene, median_height);
    write_json(&config.paths_file, &path_export.paths)?;

    let waypoints = export_waypoints(scene, median_height);
    write_json(&config.waypoints_file, &waypoints)?;

    Ok(ExportReport {
        median_height,
        path_outcomes: path_export.outcomes,
        waypoints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CurveData, ObjectKind, SceneObject, Spline};

    fn poly_curve(name: &str, points: Vec<[f64; 3]>) -> SceneObject {
        SceneObject {
            name: name.to_string(),
            kind: ObjectKind::Curve,
            curve: Some(CurveData {
                splines: vec![Spline {
                    points,
                    ..Default::default()
                }],
                evaluated_vertices: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn median_of_even_count_averages_the_middle_pair() {
        assert_eq!(median(vec![1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn median_of_odd_count_takes_the_middle() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn survey_of_empty_scene_falls_back_to_zero() {
        assert_eq!(survey_heights(&Scene::default()), 0.0);
    }

    #[test]
    fn survey_ignores_curves_without_hyphen_and_non_curves() {
        let scene = Scene {
            objects: vec![
                poly_curve("fence-a", vec![[0.0, 0.0, 1.0], [0.0, 0.0, 3.0]]),
                poly_curve("fencea", vec![[0.0, 0.0, 100.0]]),
                SceneObject {
                    name: "building-1".to_string(),
                    kind: ObjectKind::Mesh,
                    ..Default::default()
                },
            ],
        };
        assert_eq!(survey_heights(&scene), 2.0);
    }

    #[test]
    fn survey_applies_world_transform() {
        let mut obj = poly_curve("road-1", vec![[0.0, 0.0, 1.0]]);
        // Translate 10 up.
        obj.matrix_world[2][3] = 10.0;
        let scene = Scene { objects: vec![obj] };
        assert_eq!(survey_heights(&scene), 11.0);
    }

    #[test]
    fn survey_reads_bezier_control_points_too() {
        use crate::scene::BezierPoint;
        let scene = Scene {
            objects: vec![SceneObject {
                name: "arc-1".to_string(),
                kind: ObjectKind::Curve,
                curve: Some(CurveData {
                    splines: vec![Spline {
                        points: vec![[0.0, 0.0, 1.0], [0.0, 0.0, 2.0]],
                        bezier_points: vec![
                            BezierPoint {
                                co: [0.0, 0.0, 3.0],
                                handle_left: None,
                                handle_right: None,
                            },
                            BezierPoint {
                                co: [0.0, 0.0, 4.0],
                                handle_left: None,
                                handle_right: None,
                            },
                        ],
                        ..Default::default()
                    }],
                    evaluated_vertices: None,
                }),
                ..Default::default()
            }],
        };
        assert_eq!(survey_heights(&scene), 2.5);
    }

    #[test]
    fn remap_replaces_height_and_negates_y() {
        assert_eq!(
            remap_point(DVec3::new(3.0, 4.0, 9.0), 10.0),
            [3.0, 10.0, -4.0]
        );
    }

    #[test]
    fn path_export_selects_only_hyphenated_curves() {
        let scene = Scene {
            objects: vec![
                poly_curve("fence-a", vec![[0.0, 0.0, 0.0]]),
                poly_curve("fence", vec![[0.0, 0.0, 0.0]]),
                SceneObject {
                    name: "wall-1".to_string(),
                    kind: ObjectKind::Mesh,
                    ..Default::default()
                },
            ],
        };
        let export = export_paths(&scene, 0.0);
        assert_eq!(export.paths.keys().collect::<Vec<_>>(), vec!["fence-a"]);
        assert_eq!(export.outcomes.len(), 1);
    }

    #[test]
    fn curve_with_empty_mesh_is_skipped_not_emptied() {
        let scene = Scene {
            objects: vec![SceneObject {
                name: "ghost-1".to_string(),
                kind: ObjectKind::Curve,
                curve: Some(CurveData {
                    splines: vec![],
                    evaluated_vertices: Some(vec![]),
                }),
                ..Default::default()
            }],
        };
        let export = export_paths(&scene, 0.0);
        assert!(export.paths.is_empty());
        assert_eq!(
            export.outcomes,
            vec![PathOutcome::SkippedEmptyMesh {
                name: "ghost-1".to_string()
            }]
        );
    }

    #[test]
    fn path_points_are_flattened_onto_the_median_plane() {
        let scene = Scene {
            objects: vec![poly_curve(
                "ramp-1",
                vec![[0.0, 2.0, 5.0], [1.0, -3.0, 7.0]],
            )],
        };
        let export = export_paths(&scene, 1.5);
        assert_eq!(
            export.paths["ramp-1"],
            vec![[0.0, 1.5, -2.0], [1.0, 1.5, 3.0]]
        );
    }

    #[test]
    fn waypoint_export_takes_world_translation() {
        let mut wp = SceneObject {
            name: "WP_start".to_string(),
            kind: ObjectKind::Empty,
            ..Default::default()
        };
        wp.matrix_world[0][3] = 5.0;
        wp.matrix_world[1][3] = 4.0;
        wp.matrix_world[2][3] = 2.0;
        let scene = Scene {
            objects: vec![
                wp,
                SceneObject {
                    name: "not_a_marker".to_string(),
                    ..Default::default()
                },
            ],
        };
        let waypoints = export_waypoints(&scene, 1.0);
        assert_eq!(waypoints.len(), 1);
        assert_eq!(waypoints["WP_start"], [5.0, 1.0, -4.0]);
    }

    #[test]
    fn curve_typed_waypoints_are_eligible() {
        let scene = Scene {
            objects: vec![poly_curve("wp-route", vec![[0.0, 0.0, 0.0]])],
        };
        let waypoints = export_waypoints(&scene, 0.0);
        assert!(waypoints.contains_key("wp-route"));
        // And the same object is also a path curve.
        let export = export_paths(&scene, 0.0);
        assert!(export.paths.contains_key("wp-route"));
    }
}
