use std::ops::{Add, AddAssign, Mul};

use crate::{
    error::{Result, ViewerError},
    math::Vector3,
};

/// Row-major 3x3 matrix. `aRC` is the component in row `R`, column `C`.
///
/// Nothing is enforced about the contents: a `Matrix3` is not required to be
/// orthonormal or invertible.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Matrix3 {
    pub a00: f32,
    pub a01: f32,
    pub a02: f32,
    pub a10: f32,
    pub a11: f32,
    pub a12: f32,
    pub a20: f32,
    pub a21: f32,
    pub a22: f32,
}

impl Matrix3 {
    pub const ZERO: Self = Self::from_rows([0.0; 3], [0.0; 3], [0.0; 3]);
    pub const IDENTITY: Self =
        Self::from_rows([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);

    pub const fn from_rows(r0: [f32; 3], r1: [f32; 3], r2: [f32; 3]) -> Self {
        Self {
            a00: r0[0],
            a01: r0[1],
            a02: r0[2],
            a10: r1[0],
            a11: r1[1],
            a12: r1[2],
            a20: r2[0],
            a21: r2[1],
            a22: r2[2],
        }
    }

    /// Counter-clockwise rotation of `angle` radians about `axis` (Rodrigues).
    ///
    /// `axis` is normalized first; a zero axis gives the identity.
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let Vector3 { x, y, z } = axis.normalize();
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return Self::IDENTITY;
        }
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Self::from_rows(
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
        )
    }

    pub fn rows(&self) -> [[f32; 3]; 3] {
        [
            [self.a00, self.a01, self.a02],
            [self.a10, self.a11, self.a12],
            [self.a20, self.a21, self.a22],
        ]
    }

    pub fn transposed(&self) -> Self {
        let mut out = Self::ZERO;
        transpose_into(&mut out, self);
        out
    }

    pub fn determinant(&self) -> f32 {
        det3x3(
            self.a00, self.a01, self.a02, self.a10, self.a11, self.a12, self.a20, self.a21,
            self.a22,
        )
    }

    pub fn inverse(&self) -> Result<Self> {
        let mut out = Self::ZERO;
        invert(&mut out, self)?;
        Ok(out)
    }

    pub fn approx_eq(&self, rhs: &Self, epsilon: f32) -> bool {
        self.rows()
            .iter()
            .flatten()
            .zip(rhs.rows().iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

/// `u = M * v`, returns `u`.
pub fn mult_matrix_vector<'u>(u: &'u mut Vector3, m: &Matrix3, v: &Vector3) -> &'u mut Vector3 {
    u.x = m.a00 * v.x + m.a01 * v.y + m.a02 * v.z;
    u.y = m.a10 * v.x + m.a11 * v.y + m.a12 * v.z;
    u.z = m.a20 * v.x + m.a21 * v.y + m.a22 * v.z;
    u
}

/// `u = v * M`, i.e. `v` transformed by the transpose of `M`. Returns `u`.
pub fn mult_vector_matrix<'u>(u: &'u mut Vector3, v: &Vector3, m: &Matrix3) -> &'u mut Vector3 {
    u.x = m.a00 * v.x + m.a10 * v.y + m.a20 * v.z;
    u.y = m.a01 * v.x + m.a11 * v.y + m.a21 * v.z;
    u.z = m.a02 * v.x + m.a12 * v.y + m.a22 * v.z;
    u
}

/// `a += b`, returns `a`.
pub fn add<'a>(a: &'a mut Matrix3, b: &Matrix3) -> &'a mut Matrix3 {
    a.a00 += b.a00;
    a.a01 += b.a01;
    a.a02 += b.a02;
    a.a10 += b.a10;
    a.a11 += b.a11;
    a.a12 += b.a12;
    a.a20 += b.a20;
    a.a21 += b.a21;
    a.a22 += b.a22;
    a
}

/// `c = a + b`, returns `c`.
pub fn add_into<'c>(c: &'c mut Matrix3, a: &Matrix3, b: &Matrix3) -> &'c mut Matrix3 {
    *c = *a;
    add(c, b)
}

/// `c = a * b`, returns `c`.
///
/// `c` is written component by component while `a` and `b` are still read,
/// so it must not alias either input. The borrow checker rules that out.
pub fn multiply<'c>(c: &'c mut Matrix3, a: &Matrix3, b: &Matrix3) -> &'c mut Matrix3 {
    c.a00 = a.a00 * b.a00 + a.a01 * b.a10 + a.a02 * b.a20;
    c.a01 = a.a00 * b.a01 + a.a01 * b.a11 + a.a02 * b.a21;
    c.a02 = a.a00 * b.a02 + a.a01 * b.a12 + a.a02 * b.a22;
    c.a10 = a.a10 * b.a00 + a.a11 * b.a10 + a.a12 * b.a20;
    c.a11 = a.a10 * b.a01 + a.a11 * b.a11 + a.a12 * b.a21;
    c.a12 = a.a10 * b.a02 + a.a11 * b.a12 + a.a12 * b.a22;
    c.a20 = a.a20 * b.a00 + a.a21 * b.a10 + a.a22 * b.a20;
    c.a21 = a.a20 * b.a01 + a.a21 * b.a11 + a.a22 * b.a21;
    c.a22 = a.a20 * b.a02 + a.a21 * b.a12 + a.a22 * b.a22;
    c
}

/// `b = transpose(a)`, returns `b`.
pub fn transpose_into<'b>(b: &'b mut Matrix3, a: &Matrix3) -> &'b mut Matrix3 {
    b.a00 = a.a00;
    b.a01 = a.a10;
    b.a02 = a.a20;
    b.a10 = a.a01;
    b.a11 = a.a11;
    b.a12 = a.a21;
    b.a20 = a.a02;
    b.a21 = a.a12;
    b.a22 = a.a22;
    b
}

/// Transposes `b` in place. The diagonal is untouched.
pub fn transpose(b: &mut Matrix3) -> &mut Matrix3 {
    std::mem::swap(&mut b.a01, &mut b.a10);
    std::mem::swap(&mut b.a02, &mut b.a20);
    std::mem::swap(&mut b.a12, &mut b.a21);
    b
}

fn det2x2(a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    a1 * b2 - b1 * a2
}

// a1 a2 a3
// b1 b2 b3
// c1 c2 c3
#[allow(clippy::too_many_arguments)]
fn det3x3(
    a1: f32,
    a2: f32,
    a3: f32,
    b1: f32,
    b2: f32,
    b3: f32,
    c1: f32,
    c2: f32,
    c3: f32,
) -> f32 {
    a1 * det2x2(b2, b3, c2, c3) - b1 * det2x2(a2, a3, c2, c3) + c1 * det2x2(a2, a3, b2, b3)
}

/// `b = inverse(a)` by the adjugate over the determinant. Returns `b`.
///
/// A singular (or non-finite) `a` is rejected with
/// [`ViewerError::UnsupportedOperation`] and `b` is left untouched.
pub fn invert<'b>(b: &'b mut Matrix3, a: &Matrix3) -> Result<&'b mut Matrix3> {
    let det = a.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(ViewerError::UnsupportedOperation {
            operation: "invert",
            reason: "matrix is singular",
        });
    }
    let inv = 1.0 / det;

    b.a00 = det2x2(a.a11, a.a12, a.a21, a.a22) * inv;
    b.a01 = -det2x2(a.a01, a.a02, a.a21, a.a22) * inv;
    b.a02 = det2x2(a.a01, a.a02, a.a11, a.a12) * inv;
    b.a10 = -det2x2(a.a10, a.a12, a.a20, a.a22) * inv;
    b.a11 = det2x2(a.a00, a.a02, a.a20, a.a22) * inv;
    b.a12 = -det2x2(a.a00, a.a02, a.a10, a.a12) * inv;
    b.a20 = det2x2(a.a10, a.a11, a.a20, a.a21) * inv;
    b.a21 = -det2x2(a.a00, a.a01, a.a20, a.a21) * inv;
    b.a22 = det2x2(a.a00, a.a01, a.a10, a.a11) * inv;
    Ok(b)
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        let mut u = Vector3::ZERO;
        mult_matrix_vector(&mut u, &self, &v);
        u
    }
}

/// Row vector times matrix: `v * M == transpose(M) * v`.
impl Mul<Matrix3> for Vector3 {
    type Output = Vector3;

    fn mul(self, m: Matrix3) -> Vector3 {
        let mut u = Vector3::ZERO;
        mult_vector_matrix(&mut u, &self, &m);
        u
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let mut c = Matrix3::ZERO;
        multiply(&mut c, &self, &rhs);
        c
    }
}

impl Add for Matrix3 {
    type Output = Matrix3;

    fn add(mut self, rhs: Matrix3) -> Matrix3 {
        add(&mut self, &rhs);
        self
    }
}

impl AddAssign for Matrix3 {
    fn add_assign(&mut self, rhs: Matrix3) {
        add(self, &rhs);
    }
}

impl From<Matrix3> for cgmath::Matrix3<f32> {
    fn from(m: Matrix3) -> Self {
        // cgmath takes columns
        cgmath::Matrix3::new(
            m.a00, m.a10, m.a20, m.a01, m.a11, m.a21, m.a02, m.a12, m.a22,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn det2x2_is_cross_difference() {
        assert_eq!(det2x2(1.0, 2.0, 3.0, 4.0), 1.0 * 4.0 - 3.0 * 2.0);
    }

    #[test]
    fn det3x3_matches_rule_of_sarrus() {
        let m = Matrix3::from_rows([2.0, -3.0, 1.0], [2.0, 0.0, -1.0], [1.0, 4.0, 5.0]);
        let sarrus = m.a00 * m.a11 * m.a22 + m.a01 * m.a12 * m.a20 + m.a02 * m.a10 * m.a21
            - m.a02 * m.a11 * m.a20
            - m.a00 * m.a12 * m.a21
            - m.a01 * m.a10 * m.a22;
        assert!((m.determinant() - sarrus).abs() < 1e-4);
        assert!((m.determinant() - 49.0).abs() < 1e-4);
    }

    #[test]
    fn invert_leaves_output_untouched_on_failure() {
        let mut out = Matrix3::IDENTITY;
        assert!(invert(&mut out, &Matrix3::ZERO).is_err());
        assert_eq!(out, Matrix3::IDENTITY);
    }
}
