//! Rendering of the vehicle
//!
//! The vehicle's world position is mapped into a screen whose origin is
//! flipped relative to the world (see [`screen_position`]). Renderers own
//! this mapping, the vehicle controller has no knowledge of the screen.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod log_renderer;
mod terminal;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use thiserror::Error;

// Internal
pub use crate::veh_ctrl::Pose;
pub use log_renderer::*;
pub use terminal::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Could not draw to the terminal: {0}")]
    TerminalError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Something that can display the vehicle once per tick.
pub trait Renderer {
    fn render(&mut self, pose: &Pose) -> Result<(), RenderError>;
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a world position onto the screen, flipping both axes about the screen
/// size.
///
/// Units: pixels
pub fn screen_position(position: (f64, f64), width: f64, height: f64) -> (i64, i64) {
    (
        (width - position.0).round() as i64,
        (height - position.1).round() as i64,
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
