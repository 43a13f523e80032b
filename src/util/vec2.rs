use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Lengths below this are treated as zero when normalizing
pub const NORMALIZE_EPSILON: f32 = 1e-4;

/// 2D vector in field inches (x along the field width, y along its length)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along a heading given in degrees
    #[inline]
    pub fn from_heading(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { x: cos, y: sin }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn length_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector, or zero when the length is (nearly) zero
    pub fn normalize(&self) -> Self {
        self.normalize_with_length().0
    }

    /// Returns normalized vector and original length
    pub fn normalize_with_length(&self) -> (Self, f32) {
        let len = self.length();
        if len > NORMALIZE_EPSILON && len.is_finite() {
            (
                Self {
                    x: self.x / len,
                    y: self.y / len,
                },
                len,
            )
        } else {
            (Self::ZERO, 0.0)
        }
    }

    #[inline]
    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn distance_to(&self, other: Vec2) -> f32 {
        (*self - other).length()
    }

    #[inline]
    pub fn distance_sq_to(&self, other: Vec2) -> f32 {
        (*self - other).length_sq()
    }

    /// Heading of this vector in degrees, `atan2(y, x)`
    pub fn heading_deg(&self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Express a field-frame offset in a robot frame facing `heading` degrees.
    ///
    /// Returned `x` is the forward component, `y` the lateral component
    /// (positive toward heading + 90°).
    pub fn to_local(&self, heading: f32) -> Self {
        let (sin, cos) = heading.to_radians().sin_cos();
        Self {
            x: self.x * cos + self.y * sin,
            y: -self.x * sin + self.y * cos,
        }
    }

    /// Inverse of [`Vec2::to_local`]
    pub fn from_local(&self, heading: f32) -> Self {
        let (sin, cos) = heading.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Check if vector is approximately equal to another
    pub fn approx_eq(&self, other: Vec2, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_normalize_coincident_points_is_zero() {
        let a = Vec2::new(12.0, 40.0);
        assert_eq!((a - a).normalize(), Vec2::ZERO);
        assert_eq!(Vec2::new(1e-6, 0.0).normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_normalize_non_finite_is_zero() {
        let (n, len) = Vec2::new(f32::NAN, 1.0).normalize_with_length();
        assert_eq!(n, Vec2::ZERO);
        assert_eq!(len, 0.0);
    }

    #[test]
    fn test_normalize() {
        let (n, len) = Vec2::new(3.0, 4.0).normalize_with_length();
        assert!(approx_eq(len, 5.0));
        assert!(approx_eq(n.x, 0.6));
        assert!(approx_eq(n.y, 0.8));
    }

    #[test]
    fn test_from_heading() {
        let v = Vec2::from_heading(90.0);
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, 1.0));

        let v = Vec2::from_heading(180.0);
        assert!(approx_eq(v.x, -1.0));
    }

    #[test]
    fn test_heading_deg() {
        assert!(approx_eq(Vec2::new(1.0, 0.0).heading_deg(), 0.0));
        assert!(approx_eq(Vec2::new(0.0, 2.0).heading_deg(), 90.0));
        assert!(approx_eq(Vec2::new(-3.0, 0.0).heading_deg(), 180.0));
    }

    #[test]
    fn test_to_local_facing_east() {
        // Facing +x: forward is +x, lateral is +y
        let local = Vec2::new(5.0, 2.0).to_local(0.0);
        assert!(approx_eq(local.x, 5.0));
        assert!(approx_eq(local.y, 2.0));
    }

    #[test]
    fn test_to_local_facing_south() {
        // Facing +y: a point further along +y is straight ahead
        let local = Vec2::new(0.0, 7.0).to_local(90.0);
        assert!(approx_eq(local.x, 7.0));
        assert!(approx_eq(local.y, 0.0));
    }

    #[test]
    fn test_local_roundtrip_at_odd_heading() {
        let v = Vec2::new(-4.0, 9.5);
        let back = v.to_local(-217.0).from_local(-217.0);
        assert!(back.approx_eq(v, EPSILON));
    }

    #[test]
    fn test_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!(approx_eq(a.distance_to(b), 5.0));
        assert!(approx_eq(a.distance_sq_to(b), 25.0));
    }

    #[test]
    fn test_operators() {
        let mut a = Vec2::new(1.0, 2.0);
        a += Vec2::new(3.0, 4.0);
        assert_eq!(a, Vec2::new(4.0, 6.0));
        a -= Vec2::new(1.0, 1.0);
        assert_eq!(a, Vec2::new(3.0, 5.0));
        a *= 2.0;
        assert_eq!(a, Vec2::new(6.0, 10.0));
        assert_eq!(-a, Vec2::new(-6.0, -10.0));
        assert!(approx_eq(a.dot(Vec2::new(1.0, 0.0)), 6.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(Vec2::new(1.0, 2.0).is_finite());
        assert!(!Vec2::new(f32::INFINITY, 2.0).is_finite());
    }
}
