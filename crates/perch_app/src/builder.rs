use perch_core::{Placement, PlacementConfig, Scene, Settings, Tracking};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::session::{Session, SessionHooks};

/// Entry point for hosts.  Collects the collaborators and configuration,
/// then builds a [`Session`].
///
/// ```rust,ignore
/// let config = AppConfig::load(Path::new("perch.toml"))?;
/// let mut session = App::new(tracking, scene, MyHooks)
///     .with_config(config)
///     .build()?;
/// ```
pub struct App<T: Tracking, S: Scene, H: SessionHooks> {
    config: AppConfig,
    tracking: T,
    scene: S,
    hooks: H,
}

impl<T: Tracking, S: Scene, H: SessionHooks> App<T, S, H> {
    pub fn new(tracking: T, scene: S, hooks: H) -> Self {
        Self {
            config: AppConfig::default(),
            tracking,
            scene,
            hooks,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.config.placement = placement;
        self
    }

    /// Persisted user state from a previous run.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.config.settings = settings;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validates the configuration and creates the session.
    pub fn build(self) -> Result<Session<T, S, H>, AppError> {
        self.config.validate()?;
        let placement = Placement::new(self.config.placement, self.config.settings);
        Ok(Session::new(placement, self.tracking, self.scene, self.hooks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec2, Vec3};
    use perch_core::{AnchorId, PickTarget, PlacementError, Ray, RaycastHit, SurfaceAnchor, SurfaceFilter};

    struct NoTracking;

    impl Tracking for NoTracking {
        fn camera_transform(&self) -> Option<Mat4> {
            None
        }
        fn viewport_center(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn ray_from_screen(&self, _point: Vec2) -> Option<Ray> {
            None
        }
        fn cast(&self, _ray: &Ray, _filter: SurfaceFilter) -> Option<RaycastHit> {
            None
        }
        fn unproject(&self, _point: Vec2, _plane: &Mat4) -> Option<Vec3> {
            None
        }
        fn project(&self, _world: Vec3) -> Option<Vec2> {
            None
        }
        fn anchor(&self, _id: AnchorId) -> Option<SurfaceAnchor> {
            None
        }
    }

    struct NoScene;

    impl Scene for NoScene {
        fn pick(&self, _point: Vec2) -> Option<PickTarget> {
            None
        }
    }

    #[test]
    fn builds_with_settings() {
        let session = App::new(NoTracking, NoScene, ())
            .with_settings(Settings {
                has_shown_rotate_tip: true,
            })
            .build()
            .unwrap();
        assert!(session.placement().settings().has_shown_rotate_tip);
        assert_eq!(session.placement().config(), &PlacementConfig::default());
    }

    #[test]
    fn invalid_placement_config_fails_build() {
        let result = App::new(NoTracking, NoScene, ())
            .with_placement(PlacementConfig {
                max_jump_factor: -1.0,
                ..Default::default()
            })
            .build();
        assert!(matches!(
            result,
            Err(AppError::Placement(PlacementError::InvalidConfig(_)))
        ));
    }
}
