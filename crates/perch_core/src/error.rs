use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
    /// The asset's bounding box has no usable height; normalising it would
    /// divide by zero (or by a non-finite value).
    #[error("asset geometry is degenerate: bounding height {height}")]
    InvalidAssetGeometry { height: f32 },
    /// A second asset was delivered to a session that already owns one.
    #[error("an asset has already been loaded into this session")]
    AssetAlreadyLoaded,
    #[error("invalid placement configuration: {0}")]
    InvalidConfig(&'static str),
}
