//! The placed entity: a loaded model normalised to a standard height, plus
//! the ground-plane helper and shadow light that travel with it.
//!
//! Two layers of pose are kept apart:
//!
//! * the **model pose** (`model_position`, `orientation`) is what alignment
//!   changes touch.  `initial_position`/`initial_orientation` are its reset
//!   baseline and never change after [`PlacedEntity::normalize`];
//! * the **world placement** (`position`, `scale`) is what ray-cast hits and
//!   pinch gestures write.
//!
//! The renderer combines them with [`PlacedEntity::world_matrix`].

use glam::{Mat4, Quat, Vec3};
use log::{debug, warn};
use std::f32::consts::FRAC_PI_2;

use crate::alignment::Alignment;
use crate::config::PlacementConfig;
use crate::error::PlacementError;
use crate::pose::{self, Aabb};
use crate::transform::Transform;

/// Opaque reference to the decoded asset, owned by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u64);

/// What the loader reports once an asset has finished decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAsset {
    pub handle: AssetHandle,
    /// Visual bounds in the asset's own coordinates.
    pub bounds: Aabb,
    /// Orientation the asset was authored with.
    pub orientation: Quat,
}

impl LoadedAsset {
    pub fn new(handle: AssetHandle, bounds: Aabb) -> Self {
        Self {
            handle,
            bounds,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Circular shadow-catcher under the model, only shown on floors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub enabled: bool,
    /// Side length of the square mesh; wide enough for the footprint diagonal.
    pub edge: f32,
}

impl GroundPlane {
    /// Corner radius that turns the square into a disc.
    pub fn corner_radius(&self) -> f32 {
        self.edge / 2.0
    }
}

/// Directional light that casts the model's shadow onto the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowLight {
    pub enabled: bool,
    pub intensity: f32,
    /// Falloff range of the cast shadow.
    pub max_distance: f32,
    /// Points straight down.
    pub orientation: Quat,
}

#[derive(Debug, Clone)]
pub struct PlacedEntity {
    asset: AssetHandle,
    bounds: Aabb,
    scale_factor: f32,
    initial_position: Vec3,
    initial_orientation: Quat,
    model_position: Vec3,
    transform: Transform,
    alignment: Option<Alignment>,
    horizontal_baseline: Option<Quat>,
    ground: GroundPlane,
    light: ShadowLight,
    shadow_distance: Option<f32>,
    min_shadow_distance: f32,
}

impl PlacedEntity {
    /// Rescales `asset` to `config.standard_height` and moves its pivot to the
    /// centre of its footprint with the base at `y = 0`.
    ///
    /// Fails with [`PlacementError::InvalidAssetGeometry`] when the bounds
    /// have no finite, positive height.
    pub fn normalize(asset: &LoadedAsset, config: &PlacementConfig) -> Result<Self, PlacementError> {
        let raw = asset.bounds;
        let height = raw.height();
        if !raw.is_finite() || !(height > f32::EPSILON) {
            warn!("rejecting asset {:?}: bounding height {}", asset.handle, height);
            return Err(PlacementError::InvalidAssetGeometry { height });
        }
        let scale_factor = config.standard_height / height;
        if !(scale_factor.is_finite() && scale_factor > 0.0) {
            return Err(PlacementError::InvalidAssetGeometry { height });
        }

        let bounds = raw.scaled(scale_factor);
        let initial_position = -bounds.floor_center();
        let initial_orientation = asset.orientation.normalize();

        debug!(
            "normalised asset {:?}: height {} -> {}, scale factor {}",
            asset.handle, height, config.standard_height, scale_factor
        );

        Ok(Self {
            asset: asset.handle,
            bounds,
            scale_factor,
            initial_position,
            initial_orientation,
            model_position: initial_position,
            transform: Transform::with_rotation(initial_orientation),
            alignment: None,
            horizontal_baseline: None,
            ground: GroundPlane {
                enabled: false,
                edge: bounds.footprint_diagonal(),
            },
            light: ShadowLight {
                enabled: false,
                intensity: config.shadow_light_intensity,
                max_distance: config.initial_shadow_distance,
                orientation: Quat::from_rotation_x(-FRAC_PI_2),
            },
            shadow_distance: None,
            min_shadow_distance: config.min_shadow_distance,
        })
    }

    // ── Alignment ────────────────────────────────────────────────────────────

    /// Switches the mounting mode.  Returns `false` (and changes nothing) when
    /// `alignment` is already current.
    ///
    /// * `Horizontal` shows the ground plane and shadow light and puts the
    ///   model back on its floor pivot.  Coming from `Vertical` it also
    ///   restores `initial_orientation`, dropping the wall tilt and any
    ///   rotation made since.
    /// * `Vertical` hides the floor visuals and pushes the model out by half
    ///   its depth so its back sits on the wall.
    /// * `Floating` only records the new mode.
    pub fn set_alignment(&mut self, alignment: Alignment) -> bool {
        if self.alignment == Some(alignment) {
            return false;
        }
        let previous = self.alignment.replace(alignment);

        match alignment {
            Alignment::Horizontal => {
                self.ground.enabled = true;
                self.light.enabled = true;
                self.model_position = self.initial_position;
                if previous == Some(Alignment::Vertical) {
                    self.transform.rotation = self.initial_orientation;
                }
            }
            Alignment::Vertical => {
                self.ground.enabled = false;
                self.light.enabled = false;
                self.model_position = Vec3::new(
                    self.initial_position.x,
                    self.initial_position.y,
                    self.bounds.depth() / 2.0,
                );
            }
            Alignment::Floating => {}
        }
        true
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    // ── Shadow ───────────────────────────────────────────────────────────────

    /// Records the camera distance and derives the shadow falloff from it.
    /// Distances up to 1 unit clamp to the configured minimum.
    pub fn set_shadow_distance(&mut self, distance: f32) {
        if !distance.is_finite() {
            debug!("ignoring non-finite shadow distance");
            return;
        }
        self.shadow_distance = Some(distance);
        self.light.max_distance = if distance > 1.0 {
            distance
        } else {
            self.min_shadow_distance
        };
    }

    pub fn shadow_distance(&self) -> Option<f32> {
        self.shadow_distance
    }

    // ── World placement ──────────────────────────────────────────────────────

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Multiplies the uniform scale by `factor`.  Non-positive or non-finite
    /// factors are ignored.
    pub fn scale_by(&mut self, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            debug!("ignoring scale factor {}", factor);
            return;
        }
        let s = self.transform.uniform_scale() * factor;
        self.transform.set_scale_uniform(s);
    }

    /// Uniform gesture scale (1.0 until the first pinch).
    pub fn scale(&self) -> f32 {
        self.transform.uniform_scale()
    }

    // ── Orientation ──────────────────────────────────────────────────────────

    pub fn orientation(&self) -> Quat {
        self.transform.rotation
    }

    /// Spins the model about the world up axis and records the result as the
    /// horizontal baseline.  Non-finite angles are ignored.
    pub fn rotate_about_up(&mut self, angle: f32) {
        if !angle.is_finite() {
            debug!("ignoring rotation {}", angle);
            return;
        }
        self.transform.rotate_world(Vec3::Y, angle);
        self.horizontal_baseline = Some(self.transform.rotation);
    }

    /// Spins a wall-mounted model within the wall plane.  The wall normal is
    /// the model's local +Z after [`mount_on_wall`](Self::mount_on_wall).
    /// Non-finite angles are ignored.
    pub fn rotate_in_wall_plane(&mut self, angle: f32) {
        if !angle.is_finite() {
            debug!("ignoring rotation {}", angle);
            return;
        }
        self.transform.rotate_local(Vec3::Z, angle);
    }

    /// Orients the model against a wall hit: the surface orientation tilted
    /// back a quarter turn so the model's up axis lies along the wall.
    pub fn mount_on_wall(&mut self, surface: Quat) {
        self.transform.rotation = pose::compose_local(surface, Quat::from_rotation_x(-FRAC_PI_2));
    }

    pub fn set_horizontal_baseline(&mut self, orientation: Quat) {
        self.horizontal_baseline = Some(orientation);
    }

    /// Last orientation reached on a horizontal surface, if any.
    pub fn horizontal_baseline(&self) -> Option<Quat> {
        self.horizontal_baseline
    }

    // ── Read-only views ──────────────────────────────────────────────────────

    pub fn asset(&self) -> AssetHandle {
        self.asset
    }

    /// Bounds after normalisation, still relative to the asset origin.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    pub fn initial_orientation(&self) -> Quat {
        self.initial_orientation
    }

    /// Current offset of the scaled model from the pivot.
    pub fn model_position(&self) -> Vec3 {
        self.model_position
    }

    /// Offset of the pivot expressed in unscaled asset units.
    pub fn raw_origin_offset(&self) -> Vec3 {
        self.initial_position / self.scale_factor
    }

    pub fn ground_plane(&self) -> &GroundPlane {
        &self.ground
    }

    pub fn shadow_light(&self) -> &ShadowLight {
        &self.light
    }

    /// Matrix taking raw asset coordinates to world space.
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix()
            * Mat4::from_translation(self.model_position)
            * pose::uniform_scale(self.scale_factor)
    }
}
