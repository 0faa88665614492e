//! # Vehicle simulator library.
//!
//! This library allows other crates in the workspace to access items defined inside the vehicle
//! simulator crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Input sources - keyboard and drive scripts, and the mapping of input onto vehicle demands
pub mod input;

/// Exec parameters - tick loop and display settings
pub mod params;

/// Renderers - display the vehicle on the terminal or in the log
pub mod render;

/// Vehicle control module - converts directional demands into vehicle motion
pub mod veh_ctrl;
