//! Error types for snowfall.
//!
//! Only setup can fail. Degenerate geometry and frame-time pressure are
//! handled inside the engine and never surface here.

use core::fmt;

use crate::surface::SurfaceId;

/// Errors returned while constructing or reconfiguring an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SnowfallError {
    /// No drawing surface is registered under the identifier.
    SurfaceNotFound(SurfaceId),
    /// The identifier does not fit in a [`SurfaceId`].
    IdentifierTooLong,
    /// A configuration field is out of its accepted domain.
    InvalidConfig(&'static str),
}

impl fmt::Display for SnowfallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnowfallError::SurfaceNotFound(id) => {
                write!(f, "No drawing surface found for identifier `{}`", id)
            }
            SnowfallError::IdentifierTooLong => write!(
                f,
                "Surface identifier exceeds {} bytes",
                crate::surface::SURFACE_ID_CAPACITY
            ),
            SnowfallError::InvalidConfig(field) => {
                write!(f, "Invalid configuration value for `{}`", field)
            }
        }
    }
}

impl core::error::Error for SnowfallError {}
