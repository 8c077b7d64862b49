//! Headless placement session against a simulated room: a floor in front of
//! the camera and a wall behind it.  Loads a model, places it on the floor,
//! drags it onto the wall and back, rotating and pinching along the way.
//!
//! Usage: `perch_sim [config.toml]`.  Set `PERCH_LOG=debug` for the
//! discarded-update chatter.

mod tracking;

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use glam::{Mat4, Quat, Vec2, Vec3};
use log::{info, warn};
use perch_app::{logging, App, AppConfig, AppError, Command, Session, SessionHandle, SessionHooks};
use perch_core::{
    Aabb, Alignment, AnchorId, AssetHandle, DragGesture, GesturePhase, LoadedAsset, PinchGesture,
    PlaneAlignment, RotationGesture, Settings, Tracking, UiHint,
};

use tracking::{SimScene, SimTracking};

type SimSession = Session<SimTracking, SimScene, LogHooks>;

/// Logs every callback and writes settings back to the config file.
struct LogHooks {
    config_path: Option<PathBuf>,
    config: AppConfig,
}

impl SessionHooks for LogHooks {
    fn on_attached(&mut self, position: Vec3) {
        info!("attached at {:.2}; starting animations", position);
    }

    fn on_placement_changed(&mut self, alignment: Alignment) {
        info!("placement is now {:?}", alignment);
    }

    fn on_reanchored(&mut self) {
        info!("*click*");
    }

    fn on_hint(&mut self, hint: UiHint) {
        info!("ui: {:?}", hint);
    }

    fn on_settings_changed(&mut self, settings: Settings) {
        self.config.settings = settings;
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save(path) {
            warn!("could not persist settings: {}", e);
        }
    }

    fn on_asset_failed(&mut self, error: &AppError) {
        warn!("no model to place: {}", error);
    }
}

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match &config_path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    logging::init(logging::resolve_level(config.level_filter()?))?;

    let mut session = App::new(room(), SimScene, LogHooks {
        config_path,
        config: config.clone(),
    })
    .with_config(config)
    .build()
    .context("building session")?;

    session.load_asset(|| {
        // pretend decoding takes a moment
        std::thread::sleep(Duration::from_millis(30));
        Ok(LoadedAsset::new(
            AssetHandle(1),
            Aabb::new(Vec3::new(-0.4, 0.0, -0.3), Vec3::new(0.4, 0.9, 0.3)),
        ))
    });

    let handle = session.handle();
    handle.send(Command::CoachingActivated)?;
    wait_for_asset(&mut session)?;

    let floor = session
        .tracking()
        .anchor(AnchorId(1))
        .context("floor anchor missing")?;
    frame(&mut session, &handle)?;
    handle.send(Command::AnchorsAdded(vec![floor]))?;
    session.pump();
    if !session.placement().is_placed() {
        bail!("nothing under the viewport centre");
    }

    rotate(&mut session, &handle, 0.6)?;
    drag(&mut session, &handle, Vec2::new(0.0, -50.0), 8)?;
    rotate(&mut session, &handle, -0.3)?;
    pinch(&mut session, &handle, 1.2)?;
    drag(&mut session, &handle, Vec2::new(0.0, 50.0), 8)?;

    report(&session);
    Ok(())
}

/// Camera 1.5 above the origin pitched down 45°, a 2x2 floor centred 1.5
/// ahead and a 3x3 wall 3.5 ahead facing the camera.
fn room() -> SimTracking {
    let mut t = SimTracking::new(Vec2::new(1000.0, 1000.0), 800.0);
    t.set_camera(Mat4::from_rotation_translation(
        Quat::from_rotation_x(-FRAC_PI_4),
        Vec3::new(0.0, 1.5, 0.0),
    ));
    t.add_plane(
        1,
        PlaneAlignment::Horizontal,
        Mat4::from_translation(Vec3::new(0.0, 0.0, -1.5)),
        Vec2::ONE,
    );
    t.add_plane(
        2,
        PlaneAlignment::Vertical,
        Mat4::from_rotation_translation(Quat::from_rotation_x(FRAC_PI_2), Vec3::new(0.0, 1.5, -3.5)),
        Vec2::splat(1.5),
    );
    t
}

fn wait_for_asset(session: &mut SimSession) -> Result<()> {
    for _ in 0..200 {
        session.pump();
        if session.placement().entity().is_some() {
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    bail!("asset never finished loading")
}

fn frame(session: &mut SimSession, handle: &SessionHandle) -> Result<()> {
    let camera = session.tracking().camera_transform().context("no camera")?;
    handle.send(Command::Frame { camera })?;
    session.pump();
    Ok(())
}

fn drag(session: &mut SimSession, handle: &SessionHandle, step: Vec2, steps: usize) -> Result<()> {
    let start = session
        .placement()
        .entity()
        .and_then(|e| session.tracking().project(e.position()))
        .context("entity not on screen")?;
    let gesture = |phase, translation| {
        Command::Drag(DragGesture {
            touches: 1,
            phase,
            location: start,
            translation,
        })
    };

    handle.send(gesture(GesturePhase::Began, Vec2::ZERO))?;
    for _ in 0..steps {
        handle.send(gesture(GesturePhase::Changed, step))?;
        session.pump();
        frame(session, handle)?;
        if let Some(e) = session.placement().entity() {
            info!("drag -> {:.2} ({:?})", e.position(), session.placement().alignment());
        }
    }
    handle.send(gesture(GesturePhase::Ended, Vec2::ZERO))?;
    session.pump();
    Ok(())
}

fn rotate(session: &mut SimSession, handle: &SessionHandle, radians: f32) -> Result<()> {
    handle.send(Command::Rotate(RotationGesture {
        touches: 2,
        phase: GesturePhase::Changed,
        rotation: radians,
    }))?;
    session.pump();
    Ok(())
}

fn pinch(session: &mut SimSession, handle: &SessionHandle, scale: f32) -> Result<()> {
    handle.send(Command::Pinch(PinchGesture {
        touches: 2,
        phase: GesturePhase::Changed,
        scale,
    }))?;
    session.pump();
    Ok(())
}

fn report(session: &SimSession) {
    let placement = session.placement();
    let Some(e) = placement.entity() else {
        return;
    };
    info!("state: {:?}", placement.state());
    info!(
        "position {:.2}, scale {:.2}, orientation {:.3}",
        e.position(),
        e.scale(),
        e.orientation()
    );
    info!(
        "ground plane {} (edge {:.2}), shadow light {} (max distance {:.2})",
        if e.ground_plane().enabled { "on" } else { "off" },
        e.ground_plane().edge,
        if e.shadow_light().enabled { "on" } else { "off" },
        e.shadow_light().max_distance
    );
    info!("world matrix {:.3}", e.world_matrix());
}
