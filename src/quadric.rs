// ============================================================================
// Quadric - quadric error metric
// Accumulated plane distances used to score and place edge collapses
// ============================================================================

use glam::{DVec3, Vec3};

/// Symmetric 4x4 quadric, stored as its upper triangle (10 values)
///
/// ```text
/// | a b c d |
/// | b e f g |
/// | c f h i |
/// | d g i j |
/// ```
///
/// Evaluated in `f64`: summed plane quadrics of nearly coplanar faces lose most
/// of their precision in `f32`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quadric {
    a: f64, b: f64, c: f64, d: f64,
            e: f64, f: f64, g: f64,
                    h: f64, i: f64,
                            j: f64,
}

impl Quadric {
    /// Create from the upper triangle of the 4x4 matrix
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn new(a: f64, b: f64, c: f64, d: f64,
                       e: f64, f: f64, g: f64,
                               h: f64, i: f64,
                                       j: f64) -> Self {
        Self { a, b, c, d, e, f, g, h, i, j }
    }

    /// The all-zero quadric
    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Outer product `p * p^T` of the plane `ax + by + cz + d = 0`
    #[inline]
    pub fn from_plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::new(
            a * a, a * b, a * c, a * d,
                   b * b, b * c, b * d,
                          c * c, c * d,
                                 d * d,
        )
    }

    /// Plane through `point` with unit `normal`
    #[inline]
    pub fn from_face(normal: Vec3, point: Vec3) -> Self {
        let n = normal.as_dvec3();
        Self::from_plane(n.x, n.y, n.z, -n.dot(point.as_dvec3()))
    }

    /// Evaluate `v^T Q v` for the homogeneous point `(v, 1)`
    #[inline]
    pub fn value(&self, v: DVec3) -> f64 {
        let (x, y, z) = (v.x, v.y, v.z);

        self.a * x * x + 2.0 * self.b * x * y + 2.0 * self.c * x * z + 2.0 * self.d * x
            + self.e * y * y + 2.0 * self.f * y * z + 2.0 * self.g * y
            + self.h * z * z + 2.0 * self.i * z
            + self.j
    }

    /// Point minimising the quadric, solved by Cramer's rule on the 3x3 block.
    ///
    /// Returns `None` when `|det| < singular_threshold`; callers fall back to
    /// a fixed candidate such as the edge midpoint.
    pub fn optimize(&self, singular_threshold: f64) -> Option<DVec3> {
        let (a11, a12, a13) = (self.a, self.b, self.c);
        let (a22, a23, a33) = (self.e, self.f, self.h);
        let (b1, b2, b3) = (-self.d, -self.g, -self.i);

        let det = a11 * (a22 * a33 - a23 * a23)
            - a12 * (a12 * a33 - a23 * a13)
            + a13 * (a12 * a23 - a22 * a13);

        if !det.is_finite() || det.abs() < singular_threshold {
            return None;
        }

        let det_x = b1 * (a22 * a33 - a23 * a23)
            - a12 * (b2 * a33 - a23 * b3)
            + a13 * (b2 * a23 - a22 * b3);

        let det_y = a11 * (b2 * a33 - a23 * b3)
            - b1 * (a12 * a33 - a23 * a13)
            + a13 * (a12 * b3 - b2 * a13);

        let det_z = a11 * (a22 * b3 - a23 * b2)
            - a12 * (a12 * b3 - b2 * a13)
            + b1 * (a12 * a23 - a22 * a13);

        Some(DVec3::new(det_x / det, det_y / det, det_z / det))
    }

    #[inline]
    pub fn xx(&self) -> f64 { self.a }
    #[inline]
    pub fn yy(&self) -> f64 { self.e }
    #[inline]
    pub fn zz(&self) -> f64 { self.h }
    #[inline]
    pub fn ww(&self) -> f64 { self.j }
}

impl std::ops::Add for Quadric {
    type Output = Self;
    #[inline]
    fn add(self, o: Self) -> Self {
        Self::new(
            self.a + o.a, self.b + o.b, self.c + o.c, self.d + o.d,
                          self.e + o.e, self.f + o.f, self.g + o.g,
                                        self.h + o.h, self.i + o.i,
                                                      self.j + o.j,
        )
    }
}

impl std::ops::AddAssign for Quadric {
    #[inline]
    fn add_assign(&mut self, o: Self) {
        *self = *self + o;
    }
}

impl std::ops::Mul<f64> for Quadric {
    type Output = Self;
    #[inline]
    fn mul(self, s: f64) -> Self {
        Self::new(
            self.a * s, self.b * s, self.c * s, self.d * s,
                        self.e * s, self.f * s, self.g * s,
                                    self.h * s, self.i * s,
                                                self.j * s,
        )
    }
}

impl std::iter::Sum for Quadric {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, q| acc + q)
    }
}
