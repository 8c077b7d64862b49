//! Rigid-transform helpers shared by the placement code.
//!
//! Tracking hands us poses as column-major `Mat4`s (rotation in the upper
//! 3×3, translation in the fourth column).  The helpers below pull those
//! apart and provide the few quaternion/bounds operations the entity model
//! and the gesture controller need.

use glam::{Mat4, Quat, Vec3};

// ── Matrix decomposition ─────────────────────────────────────────────────────

/// Translation stored in the fourth column of a rigid transform.
#[inline]
pub fn translation(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

/// Orientation of a rigid transform as a unit quaternion.
///
/// Any scale baked into the matrix is stripped first so the result is
/// always normalised.
pub fn orientation(m: &Mat4) -> Quat {
    let (_, rotation, _) = m.to_scale_rotation_translation();
    rotation.normalize()
}

/// Uniform scale matrix.
#[inline]
pub fn uniform_scale(s: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(s))
}

// ── Quaternions ─────────────────────────────────────────────────────────────

/// Applies `delta` in the local frame of `base` (`base * delta`).
///
/// This is the composition used when a rotation must stay expressed in the
/// object's own axes, e.g. spinning a wall-mounted model around the wall
/// normal.
#[inline]
pub fn compose_local(base: Quat, delta: Quat) -> Quat {
    (base * delta).normalize()
}

/// Applies `delta` in world space (`delta * base`).
#[inline]
pub fn compose_world(base: Quat, delta: Quat) -> Quat {
    (delta * base).normalize()
}

// ── Distances ───────────────────────────────────────────────────────────────

#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Arithmetic mean of a set of points, `None` when the set is empty.
pub fn mean<'a, I>(points: I) -> Option<Vec3>
where
    I: IntoIterator<Item = &'a Vec3>,
{
    let (sum, count) = points
        .into_iter()
        .fold((Vec3::ZERO, 0usize), |(sum, n), p| (sum + *p, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

// ── Bounds ───────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in an entity's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size().x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size().y
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.size().z
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Centre of the bottom face: x/z centred, y at the minimum.
    ///
    /// This is the point that becomes the entity pivot after normalisation.
    pub fn floor_center(&self) -> Vec3 {
        let c = self.center();
        Vec3::new(c.x, self.min.y, c.z)
    }

    /// Both corners multiplied by a uniform factor.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
        }
    }

    /// Diagonal of the x/z footprint, `sqrt(width² + depth²)`.
    pub fn footprint_diagonal(&self) -> f32 {
        let w = self.width();
        let d = self.depth();
        (w * w + d * d).sqrt()
    }

    /// `true` when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Ray in world space.  `direction` is expected to be normalised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
