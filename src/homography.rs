//! Typed planar homographies between coordinate spaces.
//!
//! A [`Homography<From, To>`] maps points of space `From` into space `To`.
//! Matrices are solved from exactly four correspondences by an 8×8 linear
//! system (h33 fixed to 1) and kept in `f64`; points stay `f32`.

use crate::error::GeometryError;
use crate::geometry::{Point, Quad, Space};
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

const EPS: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Homography<From: Space, To: Space> {
    pub matrix: Matrix3<f64>,
    #[serde(skip)]
    spaces: PhantomData<(From, To)>,
}

impl<From: Space, To: Space> Homography<From, To> {
    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self {
            matrix,
            spaces: PhantomData,
        }
    }

    /// Solves the homography taking each corner of `src` onto the corner of
    /// `dst` at the same position.
    pub fn from_quads(src: &Quad<From>, dst: &Quad<To>) -> Result<Self, GeometryError> {
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for (i, (s, d)) in src.corners.iter().zip(dst.corners.iter()).enumerate() {
            if !s.is_finite() || !d.is_finite() {
                return Err(GeometryError::NonFinite);
            }
            let (x, y) = (s.x as f64, s.y as f64);
            let (u, v) = (d.x as f64, d.y as f64);

            // u = (h11 x + h12 y + h13) / (h31 x + h32 y + 1)
            a[(2 * i, 0)] = x;
            a[(2 * i, 1)] = y;
            a[(2 * i, 2)] = 1.0;
            a[(2 * i, 6)] = -u * x;
            a[(2 * i, 7)] = -u * y;
            b[2 * i] = u;

            // v = (h21 x + h22 y + h23) / (h31 x + h32 y + 1)
            a[(2 * i + 1, 3)] = x;
            a[(2 * i + 1, 4)] = y;
            a[(2 * i + 1, 5)] = 1.0;
            a[(2 * i + 1, 6)] = -v * x;
            a[(2 * i + 1, 7)] = -v * y;
            b[2 * i + 1] = v;
        }

        let h = a.lu().solve(&b).ok_or(GeometryError::SingularHomography)?;
        if h.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::SingularHomography);
        }
        let matrix = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        if matrix.determinant().abs() <= EPS {
            return Err(GeometryError::SingularHomography);
        }
        Ok(Self::from_matrix(matrix))
    }

    /// Maps one point; fails when it lands on the line at infinity.
    pub fn apply(&self, p: Point<From>) -> Result<Point<To>, GeometryError> {
        let v = self.matrix * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
            return Err(GeometryError::NonFinite);
        }
        Ok(Point::new((v[0] / w) as f32, (v[1] / w) as f32))
    }

    pub fn apply_quad(&self, quad: &Quad<From>) -> Result<Quad<To>, GeometryError> {
        quad.try_map(|p| self.apply(p))
    }

    /// Matrix inverse, mapping `To` back into `From`.
    pub fn inverse(&self) -> Result<Homography<To, From>, GeometryError> {
        self.matrix
            .try_inverse()
            .map(Homography::from_matrix)
            .ok_or(GeometryError::SingularHomography)
    }
}
