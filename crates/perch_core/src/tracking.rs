//! Boundary to the collaborators this crate does not implement: the AR
//! tracking subsystem (anchors, camera, ray casts) and the scene graph
//! (hit-testing rendered entities).
//!
//! Anchors are owned by tracking.  The core only keeps [`AnchorId`]s and
//! asks [`Tracking::anchor`] for the live record whenever it needs one, so a
//! removed or merged plane simply stops resolving.

use glam::{Mat4, Vec2, Vec3};

use crate::alignment::PlaneAlignment;
use crate::pose::Ray;

/// Identifier of a surface anchor in the tracking subsystem's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u64);

/// A detected surface, as reported by tracking in add/update events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceAnchor {
    pub id: AnchorId,
    pub alignment: PlaneAlignment,
    /// Pose of the plane in world space; its local +Y is the surface normal.
    pub transform: Mat4,
}

/// What a ray cast may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFilter {
    /// Rough planes tracking is still refining; good enough for a first
    /// placement.
    EstimatedPlane,
    /// Only the measured extent of detected planes.
    ExistingPlaneGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub world_transform: Mat4,
    pub anchor_id: Option<AnchorId>,
    pub distance: f32,
}

/// Queries served by the AR tracking subsystem.  Screen points are in view
/// coordinates (pixels, origin top-left).
pub trait Tracking {
    /// Camera pose of the most recent frame, if tracking has one.
    fn camera_transform(&self) -> Option<Mat4>;

    /// Centre of the viewport.
    fn viewport_center(&self) -> Vec2;

    /// World-space ray through a screen point.
    fn ray_from_screen(&self, point: Vec2) -> Option<Ray>;

    /// Nearest hit of `ray` against surfaces admitted by `filter`.
    fn cast(&self, ray: &Ray, filter: SurfaceFilter) -> Option<RaycastHit>;

    /// Intersects the ray through `point` with the infinite plane described
    /// by `plane` (normal = local +Y).
    fn unproject(&self, point: Vec2, plane: &Mat4) -> Option<Vec3>;

    /// Screen position of a world point; `None` when it is not in front of
    /// the camera.
    fn project(&self, world: Vec3) -> Option<Vec2>;

    /// Live record for an anchor id, `None` once tracking dropped it.
    fn anchor(&self, id: AnchorId) -> Option<SurfaceAnchor>;

    /// Casts through a screen point.
    fn cast_from_screen(&self, point: Vec2, filter: SurfaceFilter) -> Option<RaycastHit> {
        let ray = self.ray_from_screen(point)?;
        self.cast(&ray, filter)
    }

    /// Camera position of the most recent frame.
    fn camera_position(&self) -> Option<Vec3> {
        self.camera_transform().map(|m| crate::pose::translation(&m))
    }
}

/// What the scene graph found under a screen point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    /// The placed model itself.
    Model,
    /// The ground-plane helper mesh under the model.
    GroundPlane,
    /// Some other rendered entity.
    Other,
}

/// Hit-testing against rendered entities.
pub trait Scene {
    fn pick(&self, point: Vec2) -> Option<PickTarget>;
}
