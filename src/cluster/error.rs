use thiserror::Error;

/// Errors produced by the clustering engine
#[derive(Debug, Error, PartialEq)]
pub enum ClusterError {
    /// A run parameter or an input coordinate is outside its domain
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, ClusterError>;
