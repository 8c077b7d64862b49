use serde::{Deserialize, Serialize};

/// How a placed entity is mounted.
///
/// Every alignment-dependent branch in the crate matches on this one type;
/// the transition rules themselves live in
/// [`PlacedEntity::set_alignment`](crate::entity::PlacedEntity::set_alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Standing on a floor or table.
    Horizontal,
    /// Hanging flush against a wall.
    Vertical,
    /// Neither; the pose is left exactly as it is.
    Floating,
}

/// Orientation of a detected surface as reported by tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneAlignment {
    Horizontal,
    Vertical,
    /// Anything tracking may report that placement does not support.
    Other,
}

impl PlaneAlignment {
    /// The entity alignment a surface of this kind supports, if any.
    pub fn placement(self) -> Option<Alignment> {
        match self {
            PlaneAlignment::Horizontal => Some(Alignment::Horizontal),
            PlaneAlignment::Vertical => Some(Alignment::Vertical),
            PlaneAlignment::Other => None,
        }
    }
}
