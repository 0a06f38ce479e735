use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("record identifier must not be empty")]
    EmptyRecordId,
    #[error("unknown activity: {0}")]
    UnknownActivity(String),
    #[error("unknown age group: {0}")]
    UnknownAgeGroup(String),
    #[error("unknown fur color: {0}")]
    UnknownFurColor(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error("invalid coordinate ({lon}, {lat})")]
    InvalidCoordinate { lon: f64, lat: f64 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
