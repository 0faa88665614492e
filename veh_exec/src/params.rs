//! # Vehicle Executable Parameters
//!
//! This module provide parameters for the vehicle executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use std::time::Duration;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehExecParams {

    /// Rate at which ticks are run and frames drawn
    ///
    /// Units: hertz
    pub frame_rate_hz: f64,

    /// Width of the screen the vehicle is drawn on
    ///
    /// Units: pixels
    pub screen_width: f64,

    /// Height of the screen the vehicle is drawn on
    ///
    /// Units: pixels
    pub screen_height: f64,

    /// Spawn position of the vehicle
    pub spawn_x: f64,
    pub spawn_y: f64,

    /// Name of the vehicle parameter file, relative to the params directory
    pub veh_ctrl_params: String,

    /// How long a key is treated as held after its last press, for terminals which do not report
    /// key releases
    ///
    /// Units: seconds
    pub key_hold_s: f64,

    /// Number of frames between log lines when running headless
    pub log_every_n_frames: u64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A value in the exec parameters which cannot be used.
#[derive(Debug, Error)]
pub enum VehExecParamsError {
    #[error("frame_rate_hz must be a finite value above zero, found {0}")]
    InvalidFrameRate(f64),

    #[error("key_hold_s must be a finite value of zero or more, found {0}")]
    InvalidKeyHold(f64),

    #[error("The screen size must be above zero in both directions, found {0} x {1}")]
    InvalidScreenSize(f64, f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for VehExecParams {
    fn default() -> Self {
        Self {
            frame_rate_hz: 30.0,
            screen_width: 16.0 * 50.0,
            screen_height: 9.0 * 50.0,
            spawn_x: 50.0,
            spawn_y: 50.0,
            veh_ctrl_params: String::from("veh_ctrl.toml"),
            key_hold_s: 0.55,
            log_every_n_frames: 10,
        }
    }
}

impl VehExecParams {
    /// Check every value can be used by the exec.
    pub fn validate(&self) -> Result<(), VehExecParamsError> {
        self.frame_period()?;
        self.key_hold()?;

        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(VehExecParamsError::InvalidScreenSize(
                self.screen_width, self.screen_height
            ));
        }

        Ok(())
    }

    /// Target period of one frame.
    pub fn frame_period(&self) -> Result<Duration, VehExecParamsError> {
        util::time::period_from_frequency(self.frame_rate_hz)
            .ok_or(VehExecParamsError::InvalidFrameRate(self.frame_rate_hz))
    }

    /// Hold window for keys.
    pub fn key_hold(&self) -> Result<Duration, VehExecParamsError> {
        Duration::try_from_secs_f64(self.key_hold_s)
            .map_err(|_| VehExecParamsError::InvalidKeyHold(self.key_hold_s))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
