// perch_core: placement math, smoothing and the placement state machine

// pose helpers (matrices, bounds, rays)
pub mod pose;

// position / rotation / scale of the placed entity
pub mod transform;

pub mod alignment;
pub mod config;
pub mod entity;
pub mod error;
pub mod smoothing;

// boundary traits towards tracking and the scene graph
pub mod tracking;

pub mod placement;

// first placement from anchor events
pub mod selector;

// drag / pinch / rotate
pub mod gesture;

pub use alignment::{Alignment, PlaneAlignment};
pub use config::{PlacementConfig, Settings};
pub use entity::{AssetHandle, GroundPlane, LoadedAsset, PlacedEntity, ShadowLight};
pub use error::PlacementError;
pub use gesture::{DragGesture, GesturePhase, PinchGesture, RotationGesture};
pub use placement::{AnchorMemory, Placement, PlacementEvent, PlacementState, UiHint};
pub use pose::{Aabb, Ray};
pub use selector::AnchorEventKind;
pub use smoothing::{PositionHistory, SmoothingFilter};
pub use tracking::{AnchorId, PickTarget, RaycastHit, Scene, SurfaceAnchor, SurfaceFilter, Tracking};
pub use transform::Transform;

// re-export glam so hosts don't need to pin a matching version
pub use glam;
