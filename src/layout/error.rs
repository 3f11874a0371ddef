use thiserror::Error;

use crate::surface::SurfaceError;

/// Fatal layout failures. Content problems never end up here: missing text
/// degrades to empty strings and crowded labels are accepted where they stop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("configuration error: {0}")]
    Capability(#[from] SurfaceError),

    #[error("configuration error: invalid track path {0}")]
    InvalidPath(String),
}
