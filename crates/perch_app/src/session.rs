//! The session actor.
//!
//! A [`Session`] owns the [`Placement`] state machine and is the only thing
//! that mutates it.  Tracking and gesture callbacks arriving on other threads
//! go through a [`SessionHandle`] into the command queue; the owning thread
//! calls [`Session::pump`] (once per frame, say) to apply them in order and
//! dispatch the resulting events to the host's [`SessionHooks`].

use std::sync::mpsc::{self, Receiver, Sender};

use glam::{Mat4, Vec3};
use log::{debug, info, warn};
use perch_core::{
    Alignment, AnchorEventKind, DragGesture, LoadedAsset, PinchGesture, Placement, PlacementEvent,
    RotationGesture, Scene, Settings, SurfaceAnchor, Tracking, UiHint,
};

use crate::error::AppError;
use crate::loader::{spawn_asset_load, AssetLoad, LoadStatus};

/// Input to the session.  Gesture commands carry the delta since the
/// previous command of the same kind.
#[derive(Debug, Clone)]
pub enum Command {
    AnchorsAdded(Vec<SurfaceAnchor>),
    AnchorsUpdated(Vec<SurfaceAnchor>),
    Frame { camera: Mat4 },
    Drag(DragGesture),
    Pinch(PinchGesture),
    Rotate(RotationGesture),
    CoachingActivated,
    CoachingDeactivated,
}

/// Callbacks into the host.  Everything defaults to a no-op, so implement
/// only what you need.
#[allow(unused_variables)]
pub trait SessionHooks {
    /// Attach the entity to the scene and start its looping animations.
    fn on_attached(&mut self, position: Vec3) {}

    fn on_placement_changed(&mut self, alignment: Alignment) {}

    /// Play the placement cue (haptic/sound).
    fn on_reanchored(&mut self) {}

    fn on_hint(&mut self, hint: UiHint) {}

    /// Persist `settings`.
    fn on_settings_changed(&mut self, settings: Settings) {}

    fn on_asset_failed(&mut self, error: &AppError) {}
}

impl SessionHooks for () {}

/// Cloneable, `Send` sender for [`Command`]s.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Sender<Command>,
}

impl SessionHandle {
    pub fn send(&self, command: Command) -> Result<(), AppError> {
        self.tx.send(command).map_err(|_| AppError::SessionClosed)
    }
}

pub struct Session<T: Tracking, S: Scene, H: SessionHooks> {
    placement: Placement,
    tracking: T,
    scene: S,
    hooks: H,
    tx: Sender<Command>,
    rx: Receiver<Command>,
    asset: Option<AssetLoad>,
}

impl<T: Tracking, S: Scene, H: SessionHooks> Session<T, S, H> {
    pub fn new(placement: Placement, tracking: T, scene: S, hooks: H) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            placement,
            tracking,
            scene,
            hooks,
            tx,
            rx,
            asset: None,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn tracking(&self) -> &T {
        &self.tracking
    }

    /// The tracking side is owned by the session so that queries and state
    /// changes happen on the same thread; simulators update it through here.
    pub fn tracking_mut(&mut self) -> &mut T {
        &mut self.tracking
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Starts decoding the asset on a worker thread.  The result is picked
    /// up by a later [`pump`](Self::pump).  Only the first call has any
    /// effect.
    pub fn load_asset<F>(&mut self, load: F)
    where
        F: FnOnce() -> anyhow::Result<LoadedAsset> + Send + 'static,
    {
        if self.asset.is_some() || self.placement.entity().is_some() {
            warn!("asset load already started");
            return;
        }
        self.placement.begin_loading();
        self.asset = Some(spawn_asset_load(load));
    }

    /// Applies every queued command, then dispatches the events they
    /// produced.  Returns the number of commands applied.
    pub fn pump(&mut self) -> usize {
        self.poll_asset();
        let mut applied = 0;
        while let Ok(command) = self.rx.try_recv() {
            self.apply(command);
            applied += 1;
        }
        self.dispatch();
        applied
    }

    /// Applies one command immediately, bypassing the queue.
    pub fn apply(&mut self, command: Command) {
        let tracking = &self.tracking;
        match command {
            Command::AnchorsAdded(anchors) => {
                self.placement
                    .on_anchors(AnchorEventKind::Added, &anchors, tracking);
            }
            Command::AnchorsUpdated(anchors) => {
                self.placement
                    .on_anchors(AnchorEventKind::Updated, &anchors, tracking);
            }
            Command::Frame { camera } => self.placement.on_frame(&camera),
            Command::Drag(mut g) => self.placement.on_drag(&mut g, tracking, &self.scene),
            Command::Pinch(mut g) => self.placement.on_pinch(&mut g),
            Command::Rotate(mut g) => self.placement.on_rotate(&mut g),
            Command::CoachingActivated => self.placement.on_coaching_activated(),
            Command::CoachingDeactivated => self.placement.on_coaching_deactivated(),
        }
    }

    fn poll_asset(&mut self) {
        let Some(load) = self.asset.as_ref() else {
            return;
        };
        let error = match load.poll() {
            LoadStatus::Pending => return,
            LoadStatus::Ready(Ok(asset)) => {
                info!("asset {:?} delivered", asset.handle);
                self.placement.on_asset_loaded(&asset).err().map(AppError::from)
            }
            LoadStatus::Ready(Err(e)) => Some(AppError::AssetLoad(format!("{e:#}"))),
            LoadStatus::Disconnected => {
                Some(AppError::AssetLoad("loader exited without a result".to_string()))
            }
        };
        self.asset = None;
        if let Some(error) = error {
            warn!("{}", error);
            self.hooks.on_asset_failed(&error);
        }
    }

    fn dispatch(&mut self) {
        for event in self.placement.drain_events() {
            debug!("event {:?}", event);
            match event {
                PlacementEvent::Attached { position } => self.hooks.on_attached(position),
                PlacementEvent::PlacementChanged(a) => self.hooks.on_placement_changed(a),
                PlacementEvent::Reanchored => self.hooks.on_reanchored(),
                PlacementEvent::Hint(hint) => self.hooks.on_hint(hint),
                PlacementEvent::SettingsChanged(s) => self.hooks.on_settings_changed(s),
            }
        }
    }
}
