//! Four-point projective transforms.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use rand::Rng;

use crate::foundation::core::Point;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random::uniform;

/// Corner quadrilateral in top-left, top-right, bottom-right, bottom-left order.
pub type Quad = [Point; 4];

const RANK_EPS: f64 = 1e-10;

/// 3×3 projective matrix, normalized so that `h33 == 1` whenever that entry is non-zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography(Matrix3<f64>);

impl Homography {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Wrap a raw matrix, rescaling it so the bottom-right entry is 1.
    pub fn from_matrix(m: Matrix3<f64>) -> SynthResult<Self> {
        let s = m[(2, 2)];
        if s == 0.0 || !s.is_finite() {
            return Err(SynthError::geometry(
                "homography bottom-right entry must be finite and non-zero",
            ));
        }
        Ok(Self(m / s))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Map one point; a zero homogeneous weight leaves the point where it was.
    pub fn apply(&self, p: Point) -> Point {
        let v = self.0 * Vector3::new(p.x, p.y, 1.0);
        if v.z == 0.0 {
            return p;
        }
        Point::new(v.x / v.z, v.y / v.z)
    }

    /// Algebraic inverse, `None` only when the matrix is singular.
    ///
    /// An inverse whose bottom-right entry is zero cannot be rescaled and is kept as is;
    /// it still maps points correctly.
    pub fn inverse(&self) -> Option<Self> {
        let inv = self.0.try_inverse()?;
        Some(Self::from_matrix(inv).unwrap_or(Self(inv)))
    }
}

/// Solve the homography mapping each `src[i]` onto `dst[i]`.
///
/// The eight unknowns come from
/// `u = (h11 x + h12 y + h13) / (h31 x + h32 y + 1)` and its `v` twin, two rows per
/// correspondence. The system is solved in the least-squares sense through an SVD, which
/// is exact for four points in general position.
pub fn solve_homography(src: &[Point], dst: &[Point]) -> SynthResult<Homography> {
    if src.len() != 4 {
        return Err(SynthError::InvalidCorrespondenceCount(src.len()));
    }
    if dst.len() != 4 {
        return Err(SynthError::InvalidCorrespondenceCount(dst.len()));
    }

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for (i, (s, d)) in src.iter().zip(dst).enumerate() {
        let (x, y, u, v) = (s.x, s.y, d.x, d.y);
        let r0 = 2 * i;
        let r1 = r0 + 1;

        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    // Scale the rank threshold with the largest singular value so pixel-sized
    // coordinates do not read as rank-deficient.
    let svd = a.svd(true, true);
    let max_sv = svd.singular_values.max();
    let eps = RANK_EPS * max_sv.max(1.0);
    if svd.rank(eps) < 8 {
        return Err(SynthError::SingularTransform);
    }
    let h = svd.solve(&b, eps).map_err(SynthError::geometry)?;

    let m = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
    if m.iter().any(|v| !v.is_finite()) {
        return Err(SynthError::SingularTransform);
    }
    Ok(Homography(m))
}

/// Map every point through `h` with a perspective divide.
pub fn apply_homography(points: &[Point], h: &Homography) -> Vec<Point> {
    points.iter().map(|&p| h.apply(p)).collect()
}

/// Canvas corners plus an inward-jittered copy of them.
///
/// Each destination corner moves inward by up to `w * max_shift` horizontally and
/// `h * max_shift` vertically; draws happen x then y, corner by corner.
pub fn random_perspective_quad<R: Rng + ?Sized>(
    w: f64,
    h: f64,
    max_shift: f64,
    rng: &mut R,
) -> (Quad, Quad) {
    let src = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];
    let dx = w * max_shift;
    let dy = h * max_shift;

    let tl = Point::new(uniform(rng, 0.0, dx), uniform(rng, 0.0, dy));
    let tr = Point::new(w - uniform(rng, 0.0, dx), uniform(rng, 0.0, dy));
    let br = Point::new(w - uniform(rng, 0.0, dx), h - uniform(rng, 0.0, dy));
    let bl = Point::new(uniform(rng, 0.0, dx), h - uniform(rng, 0.0, dy));

    (src, [tl, tr, br, bl])
}

#[cfg(test)]
#[path = "../../tests/unit/transform/homography.rs"]
mod tests;
