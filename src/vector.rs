use ultraviolet::DVec2;

/// 2D vector used for positions, velocities and forces.
pub type Vector2 = DVec2;

/// Operations the simulation needs on top of what `ultraviolet` provides.
pub trait Vector2Ext: Sized {
    /// Euclidean distance between two points.
    fn distance_to(self, other: Self) -> f64;

    /// Returns the vector rotated counter-clockwise by `angle` radians.
    fn rotated(self, angle: f64) -> Self;

    /// Returns the negated vector.
    fn inverse(self) -> Self;

    /// Builds a vector of length `magnitude` pointing along `angle`.
    fn from_angle(angle: f64, magnitude: f64) -> Self;

    /// Overwrites the components in place.
    fn set(&mut self, other: Self);
}

impl Vector2Ext for DVec2 {
    #[inline]
    fn distance_to(self, other: Self) -> f64 {
        (self - other).mag()
    }

    #[inline]
    fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn inverse(self) -> Self {
        -self
    }

    #[inline]
    fn from_angle(angle: f64, magnitude: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        DVec2::new(cos, sin) * magnitude
    }

    #[inline]
    fn set(&mut self, other: Self) {
        self.x = other.x;
        self.y = other.y;
    }
}
