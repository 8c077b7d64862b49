//! Pinhole-camera stand-in for an AR tracking subsystem.
//!
//! Planes are finite rectangles in their own x/z; `ExistingPlaneGeometry`
//! casts respect that extent while `EstimatedPlane` casts get a margin, the
//! way a real tracker's plane estimates run larger than the measured mesh.

use glam::{Mat4, Vec2, Vec3};
use perch_core::pose;
use perch_core::{
    AnchorId, PickTarget, PlaneAlignment, Ray, RaycastHit, Scene, SurfaceAnchor, SurfaceFilter,
    Tracking,
};

const ESTIMATE_MARGIN: f32 = 1.5;

struct Plane {
    anchor: SurfaceAnchor,
    /// Half extents along local x and z.
    half_extent: Vec2,
}

pub struct SimTracking {
    camera: Mat4,
    viewport: Vec2,
    focal: f32,
    planes: Vec<Plane>,
}

impl SimTracking {
    pub fn new(viewport: Vec2, focal: f32) -> Self {
        Self {
            camera: Mat4::IDENTITY,
            viewport,
            focal,
            planes: Vec::new(),
        }
    }

    pub fn set_camera(&mut self, camera: Mat4) {
        self.camera = camera;
    }

    pub fn add_plane(
        &mut self,
        id: u64,
        alignment: PlaneAlignment,
        transform: Mat4,
        half_extent: Vec2,
    ) -> SurfaceAnchor {
        let anchor = SurfaceAnchor {
            id: AnchorId(id),
            alignment,
            transform,
        };
        self.planes.push(Plane {
            anchor,
            half_extent,
        });
        anchor
    }

    /// Ray parameter where `ray` meets the infinite plane through `plane`
    /// (normal = local +Y).
    fn intersect(ray: &Ray, plane: &Mat4) -> Option<f32> {
        let normal = plane.transform_vector3(Vec3::Y).normalize();
        let denom = normal.dot(ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = normal.dot(pose::translation(plane) - ray.origin) / denom;
        (t > 0.0).then_some(t)
    }
}

impl Tracking for SimTracking {
    fn camera_transform(&self) -> Option<Mat4> {
        Some(self.camera)
    }

    fn viewport_center(&self) -> Vec2 {
        self.viewport / 2.0
    }

    fn ray_from_screen(&self, point: Vec2) -> Option<Ray> {
        let c = self.viewport_center();
        let local = Vec3::new(
            (point.x - c.x) / self.focal,
            -(point.y - c.y) / self.focal,
            -1.0,
        );
        Some(Ray::new(
            pose::translation(&self.camera),
            self.camera.transform_vector3(local),
        ))
    }

    fn cast(&self, ray: &Ray, filter: SurfaceFilter) -> Option<RaycastHit> {
        let margin = match filter {
            SurfaceFilter::EstimatedPlane => ESTIMATE_MARGIN,
            SurfaceFilter::ExistingPlaneGeometry => 1.0,
        };
        self.planes
            .iter()
            .filter_map(|plane| {
                let t = Self::intersect(ray, &plane.anchor.transform)?;
                let point = ray.at(t);
                let local = plane.anchor.transform.inverse().transform_point3(point);
                let limit = plane.half_extent * margin;
                if local.x.abs() > limit.x || local.z.abs() > limit.y {
                    return None;
                }
                Some(RaycastHit {
                    world_transform: Mat4::from_rotation_translation(
                        pose::orientation(&plane.anchor.transform),
                        point,
                    ),
                    anchor_id: Some(plane.anchor.id),
                    distance: t,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn unproject(&self, point: Vec2, plane: &Mat4) -> Option<Vec3> {
        let ray = self.ray_from_screen(point)?;
        Self::intersect(&ray, plane).map(|t| ray.at(t))
    }

    fn project(&self, world: Vec3) -> Option<Vec2> {
        let p = self.camera.inverse().transform_point3(world);
        if p.z >= 0.0 {
            return None;
        }
        let c = self.viewport_center();
        Some(Vec2::new(
            c.x + self.focal * p.x / -p.z,
            c.y - self.focal * p.y / -p.z,
        ))
    }

    fn anchor(&self, id: AnchorId) -> Option<SurfaceAnchor> {
        self.planes
            .iter()
            .find(|p| p.anchor.id == id)
            .map(|p| p.anchor)
    }
}

/// Every touch lands on the model.
pub struct SimScene;

impl Scene for SimScene {
    fn pick(&self, _point: Vec2) -> Option<PickTarget> {
        Some(PickTarget::Model)
    }
}
