use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Knot parameterization of a Catmull-Rom spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// Uniform knots, tangents scaled by the curve's tension
    CatmullRom,
    /// Knot spacing = chord length^0.5
    #[default]
    Centripetal,
    /// Knot spacing = chord length
    Chordal,
}

/// Hermite form `c0 + c1*t + c2*t^2 + c3*t^3`, evaluated per axis at once.
#[derive(Debug, Clone, Copy, Default)]
struct CubicPoly {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl CubicPoly {
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(x0: Vec3, x1: Vec3, x2: Vec3, x3: Vec3, tension: f32) -> Self {
        Self::hermite(x1, x2, tension * (x2 - x0), tension * (x3 - x1))
    }

    fn nonuniform(x0: Vec3, x1: Vec3, x2: Vec3, x3: Vec3, dt0: f32, dt1: f32, dt2: f32) -> Self {
        // tangents at x1 and x2 for the [0, dt1] knot span, rescaled to [0, 1]
        let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        Self::hermite(x1, x2, t1 * dt1, t2 * dt1)
    }

    fn calc(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }
}

/// Open Catmull-Rom spline through a fixed set of control points.
///
/// Control points are mutated in place each frame; sampling can write into a
/// reused buffer so the per-frame update never allocates.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    pub curve_type: CurveType,
    pub tension: f32,
}

impl CatmullRomCurve {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            curve_type: CurveType::default(),
            tension: 0.5,
        }
    }

    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve_type = curve_type;
        self
    }

    pub fn with_tension(mut self, tension: f32) -> Self {
        self.tension = tension;
        self
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn control_points_mut(&mut self) -> &mut [Vec3] {
        &mut self.points
    }

    /// Point at curve parameter `t` in `[0, 1]`. Values outside are clamped.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let points = &self.points;
        let l = points.len();
        match l {
            0 => return Vec3::ZERO,
            1 => return points[0],
            _ => {}
        }

        let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
        let mut index = (p.floor() as usize).min(l - 1);
        let mut weight = p - index as f32;
        if index == l - 1 {
            index = l - 2;
            weight = 1.0;
        }

        // Ends are extrapolated by mirroring the inner neighbour.
        let p0 = if index > 0 {
            points[index - 1]
        } else {
            2.0 * points[0] - points[1]
        };
        let p1 = points[index];
        let p2 = points[index + 1];
        let p3 = if index + 2 < l {
            points[index + 2]
        } else {
            2.0 * points[l - 1] - points[l - 2]
        };

        let poly = match self.curve_type {
            CurveType::CatmullRom => CubicPoly::uniform(p0, p1, p2, p3, self.tension),
            CurveType::Centripetal | CurveType::Chordal => {
                let pow = if self.curve_type == CurveType::Chordal { 0.5 } else { 0.25 };
                let mut dt0 = p0.distance_squared(p1).powf(pow);
                let mut dt1 = p1.distance_squared(p2).powf(pow);
                let mut dt2 = p2.distance_squared(p3).powf(pow);

                if dt1 < 1e-4 {
                    dt1 = 1.0;
                }
                if dt0 < 1e-4 {
                    dt0 = dt1;
                }
                if dt2 < 1e-4 {
                    dt2 = dt1;
                }
                CubicPoly::nonuniform(p0, p1, p2, p3, dt0, dt1, dt2)
            }
        };

        poly.calc(weight)
    }

    /// Samples `divisions + 1` points at evenly spaced parameters into `out`,
    /// replacing its contents.
    pub fn sample_into(&self, divisions: usize, out: &mut Vec<Vec3>) {
        out.clear();
        let divisions = divisions.max(1);
        out.extend((0..=divisions).map(|d| self.point_at(d as f32 / divisions as f32)));
    }

    pub fn sample(&self, divisions: usize) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(divisions + 1);
        self.sample_into(divisions, &mut out);
        out
    }
}

impl Default for CatmullRomCurve {
    /// Four control points at the origin, the shape the band starts from.
    fn default() -> Self {
        Self::new(vec![Vec3::ZERO; 4])
    }
}
