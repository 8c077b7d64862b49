//! Touch gestures on a placed entity: one-finger drag re-anchors it across
//! surfaces, two-finger pinch scales it, two-finger rotate spins it.
//!
//! Gesture recognisers report cumulative deltas.  Every handler here consumes
//! the delta it applied and writes the identity value back (`translation =
//! 0`, `scale = 1`, `rotation = 0`) so the next `Changed` carries only new
//! motion.

use glam::Vec2;
use log::{debug, trace};

use crate::alignment::Alignment;
use crate::placement::Placement;
use crate::pose;
use crate::tracking::{PickTarget, RaycastHit, Scene, SurfaceFilter, Tracking};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Pan gesture.  `translation` is the screen-space delta since the last
/// time it was reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub touches: usize,
    pub phase: GesturePhase,
    pub location: Vec2,
    pub translation: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    pub touches: usize,
    pub phase: GesturePhase,
    /// Multiplicative scale since the last reset.
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationGesture {
    pub touches: usize,
    pub phase: GesturePhase,
    /// Radians since the last reset, positive clockwise on screen.
    pub rotation: f32,
}

/// Per-drag bookkeeping kept between gesture callbacks.
#[derive(Debug, Default)]
pub(crate) struct DragState {
    can_move: bool,
    last_touch: Option<Vec2>,
}

impl Placement {
    /// One-finger drag.  Drags that start on the ground-plane helper (or on
    /// nothing) are ignored for their whole lifetime.
    pub fn on_drag<T, S>(&mut self, gesture: &mut DragGesture, tracking: &T, scene: &S)
    where
        T: Tracking + ?Sized,
        S: Scene + ?Sized,
    {
        if !self.is_placed() || gesture.touches != 1 {
            self.drag.last_touch = None;
            return;
        }

        match gesture.phase {
            GesturePhase::Began => {
                self.drag.can_move = matches!(
                    scene.pick(gesture.location),
                    Some(PickTarget::Model) | Some(PickTarget::Other)
                );
                self.drag.last_touch = None;
                trace!("drag began, can_move={}", self.drag.can_move);
            }
            GesturePhase::Changed => {
                if self.drag.can_move {
                    self.drag_to(gesture, tracking);
                }
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                self.drag.last_touch = None;
            }
        }
    }

    fn drag_to<T: Tracking + ?Sized>(&mut self, gesture: &mut DragGesture, tracking: &T) {
        let previous = match self.drag.last_touch {
            Some(p) => p,
            None => {
                let Some(position) = self.entity().map(|e| e.position()) else {
                    return;
                };
                let Some(on_screen) = tracking.project(position) else {
                    debug!("entity is off screen; drag ignored");
                    return;
                };
                on_screen
            }
        };
        let current = previous + gesture.translation;

        let handled = tracking
            .cast_from_screen(current, SurfaceFilter::ExistingPlaneGeometry)
            .is_some_and(|hit| self.reanchor(&hit, tracking));
        if !handled {
            self.slide_on_floor(current, tracking);
        }

        self.drag.last_touch = Some(current);
        gesture.translation = Vec2::ZERO;
    }

    /// Moves onto the surface under `hit`.  Returns `false` when the hit has
    /// no live plane anchor, which the caller treats like a miss.  Hits on
    /// planes of an unsupported alignment count as handled and move nothing.
    fn reanchor<T: Tracking + ?Sized>(&mut self, hit: &RaycastHit, tracking: &T) -> bool {
        let Some(anchor) = hit.anchor_id.and_then(|id| tracking.anchor(id)) else {
            trace!("hit on {:?} no longer resolves", hit.anchor_id);
            return false;
        };
        let Some(alignment) = anchor.alignment.placement() else {
            trace!("drag over unsupported surface {:?}", anchor.id);
            return true;
        };

        if self.anchors.current != Some(anchor.id) {
            debug!("re-anchored to {:?}", anchor.id);
            self.cue();
        }
        self.anchors.current = Some(anchor.id);

        let candidate = pose::translation(&hit.world_transform);
        match alignment {
            Alignment::Horizontal => {
                self.anchors.horizontal = Some(anchor.id);
                self.apply_alignment(Alignment::Horizontal);
                self.commit_candidate(candidate, tracking);
            }
            Alignment::Vertical => {
                self.anchors.vertical = Some(anchor.id);
                self.apply_alignment(Alignment::Vertical);
                self.commit_candidate(candidate, tracking);
                if let Some(entity) = self.entity_mut() {
                    entity.mount_on_wall(pose::orientation(&hit.world_transform));
                }
            }
            Alignment::Floating => {}
        }
        true
    }

    /// No measured surface under the finger: keep sliding along the
    /// infinite plane of the last floor, if tracking still knows it.
    fn slide_on_floor<T: Tracking + ?Sized>(&mut self, point: Vec2, tracking: &T) {
        let Some(floor) = self.anchors.horizontal.and_then(|id| tracking.anchor(id)) else {
            return;
        };
        let Some(candidate) = tracking.unproject(point, &floor.transform) else {
            return;
        };
        self.commit_candidate(candidate, tracking);
        self.apply_alignment(Alignment::Horizontal);
    }

    /// Two-finger pinch: scales the entity by the incremental factor.
    pub fn on_pinch(&mut self, gesture: &mut PinchGesture) {
        if !self.is_placed() || gesture.touches < 2 || gesture.phase != GesturePhase::Changed {
            return;
        }
        if let Some(entity) = self.entity_mut() {
            entity.scale_by(gesture.scale);
        }
        gesture.scale = 1.0;
    }

    /// Two-finger rotate: spins about the world up axis on the floor and
    /// within the wall plane on a wall.
    pub fn on_rotate(&mut self, gesture: &mut RotationGesture) {
        if !self.is_placed() || gesture.touches < 2 || gesture.phase != GesturePhase::Changed {
            return;
        }
        let angle = -gesture.rotation;
        let alignment = self.alignment();
        if let Some(entity) = self.entity_mut() {
            match alignment {
                Some(Alignment::Horizontal) => entity.rotate_about_up(angle),
                Some(Alignment::Vertical) => entity.rotate_in_wall_plane(angle),
                Some(Alignment::Floating) | None => {}
            }
        }
        gesture.rotation = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::PlaneAlignment;
    use crate::placement::{PlacementEvent, PlacementState};
    use crate::selector::AnchorEventKind;
    use crate::tracking::fake::{loaded_placement, FakeScene, FakeTracking};
    use crate::tracking::AnchorId;
    use glam::{Mat4, Quat, Vec3};
    use std::f32::consts::FRAC_PI_2;

    const MODEL: FakeScene = FakeScene(Some(PickTarget::Model));

    fn wall_pose(at: Vec3) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_x(FRAC_PI_2), at)
    }

    /// Placed on floor anchor 1 at (0, 0, -1), wall anchor 2 known.
    fn placed() -> (Placement, FakeTracking) {
        let mut p = loaded_placement();
        let mut t = FakeTracking::with_camera_at(Vec3::new(0.0, 1.5, 0.0));
        let floor = t.add_anchor(1, PlaneAlignment::Horizontal, Mat4::IDENTITY);
        t.add_anchor(2, PlaneAlignment::Vertical, wall_pose(Vec3::new(0.0, 1.0, -3.0)));
        t.queue_hit(Some(1), Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0)));
        assert!(p.on_anchors(AnchorEventKind::Added, &[floor], &t));
        p.drain_events();
        t.casts.borrow_mut().clear();
        (p, t)
    }

    fn drag(phase: GesturePhase, translation: Vec2) -> DragGesture {
        DragGesture {
            touches: 1,
            phase,
            location: Vec2::ZERO,
            translation,
        }
    }

    #[test]
    fn two_finger_drag_is_ignored() {
        let (mut p, t) = placed();
        let mut g = drag(GesturePhase::Began, Vec2::ZERO);
        g.touches = 2;
        p.on_drag(&mut g, &t, &MODEL);
        g.phase = GesturePhase::Changed;
        g.translation = Vec2::new(0.2, 0.0);
        t.queue_hit(Some(1), Mat4::from_translation(Vec3::ONE));
        p.on_drag(&mut g, &t, &MODEL);
        g.phase = GesturePhase::Ended;
        p.on_drag(&mut g, &t, &MODEL);
        assert!(t.casts.borrow().is_empty());
        assert_eq!(g.translation, Vec2::new(0.2, 0.0));
        assert_eq!(p.entity().unwrap().position(), Vec3::new(0.0, 0.0, -1.0));
        assert!(p.drain_events().is_empty());
    }

    #[test]
    fn drag_from_ground_plane_is_suppressed() {
        let (mut p, t) = placed();
        let ground = FakeScene(Some(PickTarget::GroundPlane));
        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &ground);
        let mut g = drag(GesturePhase::Changed, Vec2::new(0.3, 0.0));
        p.on_drag(&mut g, &t, &ground);
        assert!(t.casts.borrow().is_empty());

        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &FakeScene(None));
        p.on_drag(&mut g, &t, &FakeScene(None));
        assert!(t.casts.borrow().is_empty());
    }

    #[test]
    fn drag_starts_from_projected_entity_and_accumulates() {
        let (mut p, t) = placed();
        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &MODEL);

        let mut g = drag(GesturePhase::Changed, Vec2::new(0.1, 0.0));
        t.queue_hit(Some(1), Mat4::from_translation(Vec3::new(0.1, 0.0, -1.0)));
        p.on_drag(&mut g, &t, &MODEL);
        assert_eq!(g.translation, Vec2::ZERO);

        g.translation = Vec2::new(0.0, 0.2);
        t.queue_hit(Some(1), Mat4::from_translation(Vec3::new(0.1, 0.0, -0.8)));
        p.on_drag(&mut g, &t, &MODEL);

        // entity projects to (0, -1); deltas add up from there
        let casts = t.casts.borrow();
        assert!(casts[0].abs_diff_eq(Vec2::new(0.1, -1.0), 1e-6));
        assert!(casts[1].abs_diff_eq(Vec2::new(0.1, -0.8), 1e-6));
        // smoothed over both samples
        assert!(p
            .entity()
            .unwrap()
            .position()
            .abs_diff_eq(Vec3::new(0.1, 0.0, -0.9), 1e-6));
        // same anchor, no cue
        assert!(p.drain_events().is_empty());
    }

    #[test]
    fn drag_onto_wall_and_back() {
        let (mut p, t) = placed();
        let before = p.entity().unwrap().orientation();
        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &MODEL);

        let wall_hit = wall_pose(Vec3::new(0.0, 1.0, -3.0));
        t.queue_hit(Some(2), wall_hit);
        p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(0.0, -2.0)), &t, &MODEL);

        assert_eq!(p.state(), PlacementState::Placed(Alignment::Vertical));
        assert_eq!(p.anchors().current, Some(AnchorId(2)));
        assert_eq!(p.anchors().vertical, Some(AnchorId(2)));
        let e = p.entity().unwrap();
        assert!(!e.ground_plane().enabled);
        assert_eq!(e.position(), Vec3::new(0.0, 1.0, -3.0));
        let expected = pose::orientation(&wall_hit) * Quat::from_rotation_x(-FRAC_PI_2);
        assert!(e.orientation().abs_diff_eq(expected, 1e-5));
        let events = p.drain_events();
        assert_eq!(events.iter().filter(|e| **e == PlacementEvent::Reanchored).count(), 1);
        assert!(events.contains(&PlacementEvent::PlacementChanged(Alignment::Vertical)));

        t.queue_hit(Some(1), Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)));
        p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(0.0, 1.0)), &t, &MODEL);
        assert_eq!(p.state(), PlacementState::Placed(Alignment::Horizontal));
        let e = p.entity().unwrap();
        assert!(e.ground_plane().enabled);
        assert!(e.orientation().abs_diff_eq(before, 1e-6));
        assert_eq!(p.anchors().current, Some(AnchorId(1)));
    }

    #[test]
    fn miss_slides_along_last_floor() {
        let (mut p, t) = placed();
        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &MODEL);
        t.queue_hit(Some(2), wall_pose(Vec3::new(0.0, 1.0, -3.0)));
        p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(0.0, -2.0)), &t, &MODEL);
        p.drain_events();

        // last touch is (0, -3); this lands on (0.5, 0, -3) of the floor plane
        t.queue_miss();
        p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(0.5, 0.0)), &t, &MODEL);
        assert_eq!(p.state(), PlacementState::Placed(Alignment::Horizontal));
        assert_eq!(
            p.drain_events(),
            vec![PlacementEvent::PlacementChanged(Alignment::Horizontal)]
        );
        // average of the wall hit and the unprojected floor point
        assert!(p
            .entity()
            .unwrap()
            .position()
            .abs_diff_eq(Vec3::new(0.25, 0.5, -3.0), 1e-6));
    }

    #[test]
    fn miss_without_floor_holds() {
        let mut p = loaded_placement();
        let mut t = FakeTracking::with_camera_at(Vec3::ZERO);
        let wall = t.add_anchor(2, PlaneAlignment::Vertical, Mat4::IDENTITY);
        t.queue_hit(Some(2), Mat4::from_translation(Vec3::new(0.0, 1.0, -2.0)));
        p.on_anchors(AnchorEventKind::Added, &[wall], &t);

        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &MODEL);
        t.queue_miss();
        let mut g = drag(GesturePhase::Changed, Vec2::new(0.5, 0.0));
        p.on_drag(&mut g, &t, &MODEL);
        assert_eq!(p.state(), PlacementState::Placed(Alignment::Vertical));
        assert_eq!(p.entity().unwrap().position(), Vec3::new(0.0, 1.0, -2.0));
        assert_eq!(g.translation, Vec2::ZERO);
    }

    #[test]
    fn stale_anchor_hit_slides_along_floor() {
        let (mut p, t) = placed();
        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &MODEL);
        // plane 42 was merged away by tracking; anchorless hits behave alike
        t.queue_hit(Some(42), Mat4::from_translation(Vec3::new(5.0, 0.0, -5.0)));
        p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(0.4, 0.0)), &t, &MODEL);
        t.queue_hit(None, Mat4::from_translation(Vec3::new(5.0, 0.0, -5.0)));
        p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(0.4, 0.0)), &t, &MODEL);

        // unprojected onto floor anchor 1: (0.4, 0, -1) then (0.8, 0, -1)
        assert!(p
            .entity()
            .unwrap()
            .position()
            .abs_diff_eq(Vec3::new(0.6, 0.0, -1.0), 1e-6));
        assert_eq!(p.anchors().current, Some(AnchorId(1)));
        assert!(p.drain_events().is_empty());
    }

    #[test]
    fn unsupported_surface_during_drag_is_ignored() {
        let (mut p, mut t) = placed();
        t.add_anchor(3, PlaneAlignment::Other, Mat4::IDENTITY);
        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &MODEL);
        t.queue_hit(Some(3), Mat4::from_translation(Vec3::new(2.0, 0.0, -2.0)));
        p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(2.0, -1.0)), &t, &MODEL);
        assert_eq!(p.anchors().current, Some(AnchorId(1)));
        assert_eq!(p.entity().unwrap().position(), Vec3::new(0.0, 0.0, -1.0));
        assert!(p.drain_events().is_empty());
    }

    #[test]
    fn ended_and_cancelled_restart_from_entity() {
        let (mut p, t) = placed();
        for end in [GesturePhase::Ended, GesturePhase::Cancelled] {
            p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &MODEL);
            t.queue_miss();
            p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(0.0, 0.0)), &t, &MODEL);
            p.on_drag(&mut drag(end, Vec2::ZERO), &t, &MODEL);
            assert!(p.drag.last_touch.is_none());
        }
    }

    #[test]
    fn pinch_compounds_and_resets() {
        let (mut p, _) = placed();
        let mut g = PinchGesture {
            touches: 2,
            phase: GesturePhase::Changed,
            scale: 1.1,
        };
        p.on_pinch(&mut g);
        assert_eq!(g.scale, 1.0);
        g.scale = 1.1;
        p.on_pinch(&mut g);
        assert!((p.entity().unwrap().scale() - 1.21).abs() < 1e-5);
    }

    #[test]
    fn pinch_needs_two_fingers_and_placement() {
        let mut p = loaded_placement();
        let mut g = PinchGesture {
            touches: 2,
            phase: GesturePhase::Changed,
            scale: 2.0,
        };
        p.on_pinch(&mut g);
        assert_eq!(p.entity().unwrap().scale(), 1.0);
        assert_eq!(g.scale, 2.0);

        let (mut p, _) = placed();
        g.touches = 1;
        p.on_pinch(&mut g);
        assert_eq!(p.entity().unwrap().scale(), 1.0);
    }

    #[test]
    fn rotate_on_floor_turns_about_world_up() {
        let (mut p, _) = placed();
        let mut g = RotationGesture {
            touches: 2,
            phase: GesturePhase::Changed,
            rotation: 0.25,
        };
        p.on_rotate(&mut g);
        assert_eq!(g.rotation, 0.0);
        let e = p.entity().unwrap();
        assert!(e.orientation().abs_diff_eq(Quat::from_rotation_y(-0.25), 1e-6));
        assert_eq!(e.horizontal_baseline(), Some(e.orientation()));
    }

    #[test]
    fn rotate_on_wall_turns_in_plane() {
        let (mut p, t) = placed();
        p.on_drag(&mut drag(GesturePhase::Began, Vec2::ZERO), &t, &MODEL);
        t.queue_hit(Some(2), wall_pose(Vec3::new(0.0, 1.0, -3.0)));
        p.on_drag(&mut drag(GesturePhase::Changed, Vec2::new(0.0, -2.0)), &t, &MODEL);
        let mounted = p.entity().unwrap().orientation();

        let mut g = RotationGesture {
            touches: 2,
            phase: GesturePhase::Changed,
            rotation: 0.5,
        };
        p.on_rotate(&mut g);
        let expected = mounted * Quat::from_rotation_z(-0.5);
        assert!(p.entity().unwrap().orientation().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn non_finite_rotation_is_dropped() {
        let (mut p, _) = placed();
        let mut g = RotationGesture {
            touches: 2,
            phase: GesturePhase::Changed,
            rotation: 0.25,
        };
        p.on_rotate(&mut g);
        let turned = p.entity().unwrap().orientation();
        g.rotation = f32::NAN;
        p.on_rotate(&mut g);
        assert_eq!(g.rotation, 0.0);
        let e = p.entity().unwrap();
        assert!(e.orientation().is_finite());
        assert_eq!(e.orientation(), turned);
        assert_eq!(e.horizontal_baseline(), Some(turned));
    }

    #[test]
    fn rotate_ignores_other_phases() {
        let (mut p, _) = placed();
        let mut g = RotationGesture {
            touches: 2,
            phase: GesturePhase::Began,
            rotation: 1.0,
        };
        p.on_rotate(&mut g);
        assert_eq!(p.entity().unwrap().orientation(), Quat::IDENTITY);
    }
}
