//! Vehicle control module
//!
//! Converts discrete directional intents (accelerate, brake, steer) into a
//! bounded velocity and steering angle, and integrates them through a
//! kinematic bicycle model once per tick.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod ctrl;
mod cyclic;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use ctrl::*;
pub use cyclic::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Minimum allowed vehicle length (front to rear axle).
pub const MIN_VEHICLE_LENGTH: f64 = 1.0;

/// Minimum allowed axle width.
pub const MIN_VEHICLE_AXLE_WIDTH: f64 = 1.0;

/// Tolerance used when deciding whether the steering is centred.
///
/// Units: degrees
pub const STEER_EPSILON_DEG: f64 = 0.1;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during VehCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum VehCtrlError {
    #[error(
        "Invalid vehicle geometry: vehicle length ({vehicle_length}) and axle \
        width ({axle_width}) must both be at least 1.0"
    )]
    InvalidConfiguration {
        vehicle_length: f64,
        axle_width: f64
    },

    #[error("Could not load the vehicle parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Could not initialise the archives: {0}")]
    ArchiveError(#[from] util::archive::ArchiveError),
}

/// A demanded direction for one control axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Brake/reverse or steer left.
    Negative,
    /// No demand.
    Neutral,
    /// Accelerate forward or steer right.
    Positive,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Direction {
    /// The signed factor applied to step sizes.
    pub fn factor(self) -> f64 {
        match self {
            Direction::Negative => -1.0,
            Direction::Neutral => 0.0,
            Direction::Positive => 1.0,
        }
    }
}
