use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Placeable is not registered with this controller")]
    NotRegistered,

    #[error("Unknown placeable id in snapshot: {0:?}")]
    UnknownId(crate::core::types::PlaceableId),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlacementError>;
