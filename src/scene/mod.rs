//! Scene dump data model
//!
//! A scene dump is a JSON document exported by the authoring tool containing
//! every scene object with its name, type tag, world transform, and (for
//! curves) control-point splines plus an optional pre-evaluated vertex list.
//! This module parses the dump into read-only Rust types; the export logic
//! never talks to a live host instance.

pub mod tessellate;

use glam::{DMat4, DVec3};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use tessellate::{CurveMesh, DEFAULT_RESOLUTION};

/// Failure while loading a scene dump.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Object type tag from the authoring tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    Curve,
    Mesh,
    Empty,
    Light,
    Camera,
    #[default]
    #[serde(other)]
    Other,
}

/// Bezier control point. Handles may be absent in a sparse dump; a segment
/// with a missing handle degrades to a straight line when sampled.
#[derive(Debug, Clone, Deserialize)]
pub struct BezierPoint {
    pub co: [f64; 3],
    #[serde(default)]
    pub handle_left: Option<[f64; 3]>,
    #[serde(default)]
    pub handle_right: Option<[f64; 3]>,
}

/// One sub-curve. A spline carries uniform control points, Bezier control
/// points, or both (the survey reads both flavors).
#[derive(Debug, Clone, Deserialize)]
pub struct Spline {
    #[serde(default)]
    pub points: Vec<[f64; 3]>,
    #[serde(default)]
    pub bezier_points: Vec<BezierPoint>,
    #[serde(default)]
    pub cyclic: bool,
    #[serde(default = "default_resolution")]
    pub resolution: u32,
}

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

impl Default for Spline {
    fn default() -> Self {
        Self {
            points: vec![],
            bezier_points: vec![],
            cyclic: false,
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

/// Curve geometry attached to a curve-typed object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurveData {
    #[serde(default)]
    pub splines: Vec<Spline>,
    /// Vertex list from the host's own mesh conversion, evaluated in the
    /// object's final (post-modifier) state. When present it takes priority
    /// over spline tessellation; `Some(vec![])` means the host evaluated the
    /// curve to nothing and the object must be skipped.
    #[serde(default)]
    pub evaluated_vertices: Option<Vec<[f64; 3]>>,
}

/// One object from the scene dump.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// 4x4 row-major affine world transform.
    #[serde(default = "identity_rows")]
    pub matrix_world: [[f64; 4]; 4],
    #[serde(default)]
    pub curve: Option<CurveData>,
}

fn identity_rows() -> [[f64; 4]; 4] {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

impl Default for SceneObject {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ObjectKind::Other,
            matrix_world: identity_rows(),
            curve: None,
        }
    }
}

impl SceneObject {
    /// World transform as a glam matrix.
    pub fn world_matrix(&self) -> DMat4 {
        DMat4::from_cols_array_2d(&self.matrix_world).transpose()
    }

    /// World-space translation of this object.
    pub fn world_translation(&self) -> DVec3 {
        self.world_matrix().w_axis.truncate()
    }

    /// True for curve objects following the exportable-path naming
    /// convention (a hyphen somewhere in the name, e.g. `fence-a`).
    pub fn is_path_curve(&self) -> bool {
        self.kind == ObjectKind::Curve && self.name.contains('-')
    }

    /// True for waypoint markers: any object whose name starts with `wp`,
    /// case-insensitively.
    pub fn is_waypoint(&self) -> bool {
        self.name.to_lowercase().starts_with("wp")
    }

    /// Discretized mesh for a curve object, in local coordinates.
    ///
    /// Prefers the host's `evaluated_vertices` channel; falls back to
    /// tessellating the splines. Returns `None` when the object has no curve
    /// data or the mesh comes out empty, in which case the object is skipped
    /// by the path export. The returned mesh is owned by the caller and
    /// dropped as soon as its points have been read.
    pub fn evaluated_mesh(&self) -> Option<CurveMesh> {
        let curve = self.curve.as_ref()?;
        let mesh = match &curve.evaluated_vertices {
            Some(vertices) => CurveMesh::from_points(vertices),
            None => tessellate::tessellate(curve),
        };
        if mesh.is_empty() { None } else { Some(mesh) }
    }
}

/// Parsed scene dump.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Parse a scene dump from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scene dump file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
