//! First placement: turns tracking anchor events into a one-shot latch.
//!
//! While unplaced, every add/update event triggers a cast from the viewport
//! centre.  The first hit on a floor or wall places the entity; after that
//! anchor events are ignored, so several planes appearing in the same
//! instant cannot bounce the model between them.

use log::{debug, info};

use crate::alignment::Alignment;
use crate::placement::{Placement, PlacementEvent};
use crate::pose;
use crate::tracking::{SurfaceAnchor, SurfaceFilter, Tracking};

/// Kind of anchor notification coming from tracking.  Only logged: added
/// and updated batches run the same first-hit search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorEventKind {
    Added,
    Updated,
}

impl Placement {
    /// Handles an anchor add/update batch.  `kind` is informational.
    /// Returns `true` if this call placed the entity.
    pub fn on_anchors<T: Tracking + ?Sized>(
        &mut self,
        kind: AnchorEventKind,
        anchors: &[SurfaceAnchor],
        tracking: &T,
    ) -> bool {
        if anchors.is_empty() || self.is_placed() || self.entity().is_none() {
            return false;
        }
        debug!("{} anchor(s) {:?} while unplaced", anchors.len(), kind);
        self.try_place(tracking)
    }

    fn try_place<T: Tracking + ?Sized>(&mut self, tracking: &T) -> bool {
        let center = tracking.viewport_center();
        let Some(hit) = tracking.cast_from_screen(center, SurfaceFilter::EstimatedPlane) else {
            debug!("no surface under viewport centre");
            return false;
        };
        let Some(anchor) = hit.anchor_id.and_then(|id| tracking.anchor(id)) else {
            debug!("hit without a live plane anchor");
            return false;
        };
        let Some(alignment) = anchor.alignment.placement() else {
            debug!("anchor {:?} has unsupported alignment {:?}", anchor.id, anchor.alignment);
            return false;
        };

        let position = pose::translation(&hit.world_transform);
        let Some(entity) = self.entity_mut() else {
            return false;
        };
        entity.set_position(position);
        match alignment {
            Alignment::Horizontal => {
                entity.set_horizontal_baseline(pose::orientation(&hit.world_transform));
                self.anchors.horizontal = Some(anchor.id);
            }
            Alignment::Vertical => self.anchors.vertical = Some(anchor.id),
            Alignment::Floating => {}
        }
        self.anchors.current = Some(anchor.id);

        info!("placed on {:?} ({:?}) at {:?}", anchor.id, alignment, position);
        self.emit(PlacementEvent::Attached { position });
        self.apply_alignment(alignment);
        self.cue();
        self.offer_rotate_tip();
        true
    }
}
