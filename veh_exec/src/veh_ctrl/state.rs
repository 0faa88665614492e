//! Kinematic state of the vehicle

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Position and heading of the vehicle, integrated once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleState {
    x: f64,
    y: f64,

    /// Cumulative heading. Never wrapped into a bounded range.
    ///
    /// Units: degrees
    heading: f64,

    /// Steering angle applied on the last update.
    ///
    /// Units: degrees
    steering_angle: f64,
}

/// Snapshot of the vehicle published to renderers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,

    /// Units: degrees
    pub heading_deg: f64,

    /// Units: degrees
    pub steering_angle_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {
    /// Create a new state at the given position with zero heading and
    /// centred steering.
    pub fn new(x0: f64, y0: f64) -> Self {
        Self {
            x: x0,
            y: y0,
            heading: 0.0,
            steering_angle: 0.0,
        }
    }

    /// Integrate one tick of the bicycle model.
    ///
    /// The heading is updated first and the position update uses the new
    /// heading. The heading delta is not scaled by `time_step`.
    /// `_acceleration` is accepted but does not enter the model.
    pub fn update_state(
        &mut self,
        velocity: f64,
        _acceleration: f64,
        steering_angle: f64,
        time_step: f64,
        vehicle_length: f64,
    ) {
        self.steering_angle = steering_angle;

        self.heading += (velocity / vehicle_length) * steering_angle.to_radians().tan();

        let heading_rad = self.heading.to_radians();
        self.x += velocity * heading_rad.cos() * time_step;
        self.y += velocity * heading_rad.sin() * time_step;
    }

    /// Current position as `(x, y)`.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Units: degrees
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Units: degrees
    pub fn steering_angle(&self) -> f64 {
        self.steering_angle
    }

    pub fn pose(&self) -> Pose {
        Pose {
            x: self.x,
            y: self.y,
            heading_deg: self.heading,
            steering_angle_deg: self.steering_angle,
        }
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "At ({},{}) with heading {} and steering angle {}",
            self.x, self.y, self.heading, self.steering_angle
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
