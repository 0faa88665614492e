//! Parameters structure for VehCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for vehicle control.
///
/// Any field missing from the parameter file takes its default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Width of the axles. Validated but not used by the motion model.
    pub axle_width: f64,

    /// Distance between the front and rear axles.
    pub vehicle_length: f64,

    // ---- CAPABILITIES ----

    /// Maximum steering angle magnitude (steering lock).
    ///
    /// Units: degrees
    pub max_steering_angle: f64,

    /// Maximum velocity magnitude.
    pub max_velocity: f64,

    // ---- CONTROL ----

    /// Change in acceleration per tick of held accelerate/brake input, before
    /// scaling by `time_step`.
    pub acceleration_step: f64,

    /// Change in steering angle per tick of held steer input.
    ///
    /// Units: degrees
    pub steer_step: f64,

    /// Duration of one tick.
    ///
    /// Units: seconds
    pub time_step: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            axle_width: 1.5,
            vehicle_length: 4.0,
            max_steering_angle: 30.0,
            max_velocity: 15.0,
            acceleration_step: 0.1,
            steer_step: 1.0,
            time_step: 1.0 / 10.0,
        }
    }
}

impl Params {
    /// Determine if the geometry meets the minimum vehicle size.
    pub fn geometry_is_valid(&self) -> bool {
        self.vehicle_length >= super::MIN_VEHICLE_LENGTH
            && self.axle_width >= super::MIN_VEHICLE_AXLE_WIDTH
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_params_file() {
        let p: Params = util::params::from_str(
            "vehicle_length = 2.5\nmax_velocity = 5.0"
        ).unwrap();

        assert_eq!(p.vehicle_length, 2.5);
        assert_eq!(p.max_velocity, 5.0);
        assert_eq!(p.axle_width, 1.5);
        assert_eq!(p.time_step, 0.1);
    }

    #[test]
    fn test_geometry_is_valid() {
        assert!(Params::default().geometry_is_valid());

        let min = Params { vehicle_length: 1.0, axle_width: 1.0, ..Default::default() };
        assert!(min.geometry_is_valid());

        let short = Params { vehicle_length: 0.5, ..Default::default() };
        assert!(!short.geometry_is_valid());

        let narrow = Params { axle_width: 0.9, ..Default::default() };
        assert!(!narrow.geometry_is_valid());
    }
}
