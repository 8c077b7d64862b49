//! Placement state machine.
//!
//! `Placement` owns everything the core mutates: the entity, the smoothing
//! window, the anchor back-references and the outgoing event queue.  There
//! is no interior locking; whoever owns it must drive it from one thread
//! (see `perch_app::Session`).
//!
//! ```text
//! Unplaced --(first qualifying ray-cast hit)--> Placed(horizontal|vertical)
//! Placed(A) --(drag re-anchors to a surface of alignment B)--> Placed(B)
//! ```
//!
//! Tracking events are handled in [`crate::selector`], gestures in
//! [`crate::gesture`]; both funnel alignment changes through
//! [`Placement::set_alignment`] and position changes through the smoothing
//! gate here.

use glam::{Mat4, Vec3};
use log::{debug, info, warn};

use crate::alignment::Alignment;
use crate::config::{PlacementConfig, Settings};
use crate::entity::{LoadedAsset, PlacedEntity};
use crate::error::PlacementError;
use crate::gesture::DragState;
use crate::pose;
use crate::smoothing::SmoothingFilter;
use crate::tracking::{AnchorId, Tracking};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    Unplaced,
    Placed(Alignment),
}

/// Overlay hints the UI layer shows or hides in response to placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiHint {
    HideLoading,
    /// "Move the phone to find a surface".
    ShowSurfaceSearch,
    HideSurfaceSearch,
    /// One-time hint that two fingers rotate the model.
    ShowRotateTip,
}

/// Everything the core asks the host to do, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementEvent {
    /// Attach the entity to the scene at `position` and start its
    /// animations.  Emitted once, on first placement.
    Attached { position: Vec3 },
    /// The entity now uses a different alignment.
    PlacementChanged(Alignment),
    /// Play the placement cue: the entity landed on a new surface.
    Reanchored,
    Hint(UiHint),
    /// Settings changed and should be persisted.
    SettingsChanged(Settings),
}

/// The most recent anchors the entity sat on, by id only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchorMemory {
    pub current: Option<AnchorId>,
    pub horizontal: Option<AnchorId>,
    pub vertical: Option<AnchorId>,
}

#[derive(Debug)]
pub struct Placement {
    config: PlacementConfig,
    settings: Settings,
    state: PlacementState,
    entity: Option<PlacedEntity>,
    pub(crate) filter: SmoothingFilter,
    pub(crate) anchors: AnchorMemory,
    pub(crate) drag: DragState,
    loading: bool,
    events: Vec<PlacementEvent>,
}

impl Placement {
    /// `config` is assumed valid (see [`PlacementConfig::validate`]).
    pub fn new(config: PlacementConfig, settings: Settings) -> Self {
        Self {
            filter: SmoothingFilter::new(config.history_len, config.max_jump_factor),
            config,
            settings,
            state: PlacementState::Unplaced,
            entity: None,
            anchors: AnchorMemory::default(),
            drag: DragState::default(),
            loading: false,
            events: Vec::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> PlacementState {
        self.state
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.state, PlacementState::Placed(_))
    }

    pub fn alignment(&self) -> Option<Alignment> {
        match self.state {
            PlacementState::Placed(a) => Some(a),
            PlacementState::Unplaced => None,
        }
    }

    pub fn entity(&self) -> Option<&PlacedEntity> {
        self.entity.as_ref()
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn anchors(&self) -> AnchorMemory {
        self.anchors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Takes all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<PlacementEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn entity_mut(&mut self) -> Option<&mut PlacedEntity> {
        self.entity.as_mut()
    }

    pub(crate) fn emit(&mut self, event: PlacementEvent) {
        self.events.push(event);
    }

    // ── Asset lifecycle ──────────────────────────────────────────────────────

    /// The host started fetching/decoding the asset.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Delivers the decoded asset.  Only one asset per session is accepted.
    pub fn on_asset_loaded(&mut self, asset: &LoadedAsset) -> Result<(), PlacementError> {
        if self.entity.is_some() {
            warn!("ignoring second asset {:?}", asset.handle);
            return Err(PlacementError::AssetAlreadyLoaded);
        }
        self.loading = false;
        self.emit(PlacementEvent::Hint(UiHint::HideLoading));

        let entity = PlacedEntity::normalize(asset, &self.config)?;
        info!(
            "asset {:?} ready, scale factor {:.3}",
            asset.handle,
            entity.scale_factor()
        );
        self.entity = Some(entity);
        if !self.is_placed() {
            self.emit(PlacementEvent::Hint(UiHint::ShowSurfaceSearch));
        }
        Ok(())
    }

    // ── Coaching overlay ─────────────────────────────────────────────────────

    pub fn on_coaching_activated(&mut self) {
        if !self.loading {
            self.emit(PlacementEvent::Hint(UiHint::ShowSurfaceSearch));
        }
    }

    pub fn on_coaching_deactivated(&mut self) {
        if self.is_placed() {
            self.emit(PlacementEvent::Hint(UiHint::HideSurfaceSearch));
        }
    }

    // ── Frame loop ───────────────────────────────────────────────────────────

    /// Per-frame camera update; refreshes the shadow falloff while placed.
    pub fn on_frame(&mut self, camera: &Mat4) {
        if !self.is_placed() {
            return;
        }
        let eye = pose::translation(camera);
        if let Some(entity) = self.entity.as_mut() {
            let d = pose::distance(eye, entity.position());
            entity.set_shadow_distance(d);
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Changes the alignment of a placed entity.  No-op before placement and
    /// when `alignment` is already current.
    pub fn set_alignment(&mut self, alignment: Alignment) -> bool {
        if !self.is_placed() {
            return false;
        }
        self.apply_alignment(alignment)
    }

    /// The single place where alignment changes happen.  Also used for the
    /// `Unplaced -> Placed` transition.
    pub(crate) fn apply_alignment(&mut self, alignment: Alignment) -> bool {
        let Some(entity) = self.entity.as_mut() else {
            return false;
        };
        if !entity.set_alignment(alignment) {
            return false;
        }
        info!("alignment -> {:?}", alignment);
        self.state = PlacementState::Placed(alignment);
        self.emit(PlacementEvent::PlacementChanged(alignment));
        true
    }

    /// Placement cue; also dismisses the surface-search hint.
    pub(crate) fn cue(&mut self) {
        self.emit(PlacementEvent::Reanchored);
        self.emit(PlacementEvent::Hint(UiHint::HideSurfaceSearch));
    }

    /// Shows the rotate tip the first time anything is placed.
    pub(crate) fn offer_rotate_tip(&mut self) {
        if self.settings.has_shown_rotate_tip {
            return;
        }
        self.settings.has_shown_rotate_tip = true;
        self.emit(PlacementEvent::Hint(UiHint::ShowRotateTip));
        self.emit(PlacementEvent::SettingsChanged(self.settings));
    }

    /// Pushes a candidate through the smoothing window and moves the entity
    /// to the average if the jump gate allows it.  Returns whether the entity
    /// moved.
    pub(crate) fn commit_candidate<T: Tracking + ?Sized>(&mut self, candidate: Vec3, tracking: &T) -> bool {
        let average = self.filter.push(candidate);
        let Some(camera) = tracking.camera_position() else {
            debug!("no camera pose; holding position");
            return false;
        };
        let Some(entity) = self.entity.as_mut() else {
            return false;
        };
        if !self.filter.accepts(camera, average, entity.scale()) {
            debug!("discarding jump to {:?}", average);
            return false;
        }
        entity.set_position(average);
        true
    }
}
