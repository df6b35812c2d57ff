//! Curve discretization
//!
//! Converts a curve's parametric splines into the flat vertex list the path
//! export reads. Used when the scene dump carries no pre-evaluated vertices
//! from the host. Uniform control points pass through as a polyline; Bezier
//! segments are flattened by uniform parameter sampling.

use crate::scene::{BezierPoint, CurveData, Spline};
use glam::DVec3;

/// Samples per Bezier segment when the spline does not specify a resolution.
pub const DEFAULT_RESOLUTION: u32 = 12;

/// Flat vertex list sampled from a curve, in local object coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveMesh {
    pub vertices: Vec<DVec3>,
}

impl CurveMesh {
    pub fn from_points(points: &[[f64; 3]]) -> Self {
        Self {
            vertices: points.iter().copied().map(DVec3::from_array).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Discretize every spline of a curve into one vertex list.
pub fn tessellate(curve: &CurveData) -> CurveMesh {
    let mut vertices = Vec::new();
    for spline in &curve.splines {
        sample_spline(spline, &mut vertices);
    }
    CurveMesh { vertices }
}

fn sample_spline(spline: &Spline, out: &mut Vec<DVec3>) {
    out.extend(spline.points.iter().copied().map(DVec3::from_array));

    let anchors = &spline.bezier_points;
    if anchors.is_empty() {
        return;
    }

    let resolution = spline.resolution.max(1);
    out.push(DVec3::from_array(anchors[0].co));
    if anchors.len() == 1 {
        return;
    }

    for pair in anchors.windows(2) {
        sample_segment(&pair[0], &pair[1], resolution, true, out);
    }
    if spline.cyclic {
        // The closing segment ends on the first anchor, which is already in
        // the list; sample up to but not including t = 1.
        sample_segment(&anchors[anchors.len() - 1], &anchors[0], resolution, false, out);
    }
}

fn sample_segment(
    from: &BezierPoint,
    to: &BezierPoint,
    resolution: u32,
    include_end: bool,
    out: &mut Vec<DVec3>,
) {
    let (Some(h0), Some(h1)) = (from.handle_right, to.handle_left) else {
        // Missing handles degrade the segment to a straight line.
        if include_end {
            out.push(DVec3::from_array(to.co));
        }
        return;
    };

    let p0 = DVec3::from_array(from.co);
    let p1 = DVec3::from_array(h0);
    let p2 = DVec3::from_array(h1);
    let p3 = DVec3::from_array(to.co);

    let last = if include_end { resolution } else { resolution - 1 };
    for i in 1..=last {
        let t = f64::from(i) / f64::from(resolution);
        out.push(cubic_point(p0, p1, p2, p3, t));
    }
}

/// Evaluate a cubic Bezier at parameter `t`.
fn cubic_point(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
