//! Input handling
//!
//! Input sources report, once per tick, which longitudinal and lateral
//! directions are held and whether the simulation should terminate. The
//! reports are mapped onto the vehicle controller's demands by
//! [`apply_input`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod keyboard;
mod script;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use thiserror::Error;

// Internal
use crate::veh_ctrl::{Direction, VehicleController};
pub use keyboard::*;
pub use script::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The input state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InputReport {
    pub longitudinal: Longitudinal,
    pub lateral: Lateral,

    /// The simulation should stop.
    pub terminate: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Held longitudinal input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Longitudinal {
    Forward,
    Backward,
    None,
}

/// Held lateral input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Lateral {
    Left,
    Right,
    None,
}

/// Errors which can occur while acquiring input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Terminal input error: {0}")]
    TerminalError(#[from] std::io::Error),

    #[error("Script error: {0}")]
    ScriptError(#[from] ScriptError),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of per-tick input reports.
pub trait InputSource {
    /// Get the input state for the tick starting at `sim_time_s`.
    fn poll(&mut self, sim_time_s: f64) -> Result<InputReport, InputError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Longitudinal {
    fn default() -> Self {
        Longitudinal::None
    }
}

impl Default for Lateral {
    fn default() -> Self {
        Lateral::None
    }
}

impl Longitudinal {
    /// Resolve a pair of held keys, forward takes precedence.
    pub fn from_held(forward: bool, backward: bool) -> Self {
        if forward {
            Longitudinal::Forward
        }
        else if backward {
            Longitudinal::Backward
        }
        else {
            Longitudinal::None
        }
    }
}

impl Lateral {
    /// Resolve a pair of held keys, left takes precedence.
    pub fn from_held(left: bool, right: bool) -> Self {
        if left {
            Lateral::Left
        }
        else if right {
            Lateral::Right
        }
        else {
            Lateral::None
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map one tick's input onto the controller's demands.
///
/// With no lateral input the steering is centred by one step.
pub fn apply_input(ctrl: &mut VehicleController, input: &InputReport) {
    match input.longitudinal {
        Longitudinal::Forward => ctrl.accelerate(Direction::Positive),
        Longitudinal::Backward => ctrl.accelerate(Direction::Negative),
        Longitudinal::None => ctrl.accelerate(Direction::Neutral),
    }

    match input.lateral {
        Lateral::Left => ctrl.steer(Direction::Negative),
        Lateral::Right => ctrl.steer(Direction::Positive),
        Lateral::None => ctrl.centre_steering(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn report(longitudinal: Longitudinal, lateral: Lateral) -> InputReport {
        InputReport { longitudinal, lateral, terminate: false }
    }

    #[test]
    fn test_key_precedence() {
        assert_eq!(Longitudinal::from_held(true, true), Longitudinal::Forward);
        assert_eq!(Longitudinal::from_held(false, true), Longitudinal::Backward);
        assert_eq!(Longitudinal::from_held(false, false), Longitudinal::None);

        assert_eq!(Lateral::from_held(true, true), Lateral::Left);
        assert_eq!(Lateral::from_held(false, true), Lateral::Right);
        assert_eq!(Lateral::from_held(false, false), Lateral::None);
    }

    #[test]
    fn test_apply_input() {
        let mut c = VehicleController::default();

        apply_input(&mut c, &report(Longitudinal::Forward, Lateral::Left));
        assert!(c.acceleration() > 0.0);
        assert_eq!(c.steering_angle(), -1.0);

        apply_input(&mut c, &report(Longitudinal::Backward, Lateral::Left));
        assert!(c.acceleration().abs() < 1e-12);
        assert_eq!(c.steering_angle(), -2.0);

        apply_input(&mut c, &report(Longitudinal::Backward, Lateral::Right));
        assert!(c.acceleration() < 0.0);
        assert_eq!(c.steering_angle(), -1.0);

        apply_input(&mut c, &report(Longitudinal::None, Lateral::Left));
        assert_eq!(c.acceleration(), 0.0);
        assert_eq!(c.steering_angle(), -2.0);
    }

    #[test]
    fn test_self_centering() {
        let mut c = VehicleController::default();

        for _ in 0..12 {
            apply_input(&mut c, &report(Longitudinal::None, Lateral::Right));
        }
        assert_eq!(c.steering_angle(), 12.0);

        for tick in 1..=12 {
            apply_input(&mut c, &InputReport::default());
            assert_eq!(c.steering_angle(), 12.0 - tick as f64);
        }

        apply_input(&mut c, &InputReport::default());
        assert_eq!(c.steering_angle(), 0.0);
    }
}
