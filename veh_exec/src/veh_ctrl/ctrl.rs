//! Implementation of the vehicle controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{Direction, Params, Pose, VehCtrlError, VehicleState, STEER_EPSILON_DEG};
use util::archive::Archiver;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle control module state.
///
/// Owns the vehicle's kinematic state, which is only ever mutated by
/// [`VehicleController::advance`].
pub struct VehicleController {
    pub(crate) params: Params,

    /// Signed velocity, `|velocity| <= max_velocity` after every tick.
    velocity: f64,

    /// Signed acceleration, zeroed whenever there is no longitudinal demand.
    acceleration: f64,

    /// Demanded steering angle, mirrored into the state on each tick.
    ///
    /// Units: degrees
    steering_angle: f64,

    epsilon: f64,

    state: VehicleState,

    /// Number of ticks advanced so far.
    num_ticks: u64,

    pub(crate) report: StatusReport,
    pub(crate) arch_report: Archiver,
    pub(crate) arch_tick: Archiver,
}

/// Status report for VehCtrl processing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// The velocity update was skipped as it would have exceeded the limit.
    pub velocity_limited: bool,

    /// A steer demand was ignored as it would have exceeded the steering lock.
    pub steering_limited: bool,

    /// The steering angle was snapped to exactly zero.
    pub steering_snapped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for VehicleController {
    fn default() -> Self {
        Self::from_valid_params(0.0, 0.0, Params::default())
    }
}

impl VehicleController {
    /// Spawn a new vehicle at `(x0, y0)`.
    ///
    /// Fails with `InvalidConfiguration` if the vehicle length or axle width
    /// are below their minimums (1.0).
    pub fn new(x0: f64, y0: f64, params: Params) -> Result<Self, VehCtrlError> {
        if !params.geometry_is_valid() {
            return Err(VehCtrlError::InvalidConfiguration {
                vehicle_length: params.vehicle_length,
                axle_width: params.axle_width,
            });
        }

        Ok(Self::from_valid_params(x0, y0, params))
    }

    fn from_valid_params(x0: f64, y0: f64, params: Params) -> Self {
        Self {
            params,
            velocity: 0.0,
            acceleration: 0.0,
            steering_angle: 0.0,
            epsilon: STEER_EPSILON_DEG,
            state: VehicleState::new(x0, y0),
            num_ticks: 0,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            arch_tick: Archiver::default(),
        }
    }

    /// Apply a longitudinal demand for this tick.
    ///
    /// A held direction accumulates `acceleration_step * time_step` per call,
    /// a neutral direction resets the acceleration to exactly zero.
    pub fn accelerate(&mut self, direction: Direction) {
        match direction {
            Direction::Neutral => self.acceleration = 0.0,
            d => {
                self.acceleration +=
                    d.factor() * self.params.acceleration_step * self.params.time_step
            }
        }
    }

    /// Apply a lateral demand for this tick.
    ///
    /// The step is only applied if the result stays within the steering lock.
    /// Otherwise the angle is left alone, unless it is already within
    /// `epsilon` of zero in which case it is snapped to zero. The angle is
    /// never clamped to the lock.
    pub fn steer(&mut self, direction: Direction) {
        let target = self.steering_angle + direction.factor() * self.params.steer_step;

        if target.abs() <= self.params.max_steering_angle {
            self.steering_angle = target;
        }
        else if self.steering_angle.abs() < self.epsilon {
            self.steering_angle = 0.0;
            self.report.steering_snapped = true;
        }
        else {
            self.report.steering_limited = true;
        }
    }

    /// Perform one tick of self-centering, used when there is no lateral
    /// demand.
    ///
    /// Nudges the steering one `steer_step` back towards zero. Once the angle
    /// is within one step (or `epsilon`) of zero it is snapped to exactly
    /// zero instead, so that centering never oscillates about zero.
    ///
    /// This differs from a plain opposing `steer` nudge for angles which are
    /// not a whole number of steps from zero: those are zeroed on the last
    /// tick rather than being pushed past zero.
    pub fn centre_steering(&mut self) {
        let angle = self.steering_angle;

        if angle == 0.0 {
            return;
        }

        if angle.abs() <= self.params.steer_step || angle.abs() <= self.epsilon {
            self.steering_angle = 0.0;
            self.report.steering_snapped = true;
        }
        else {
            if angle > 0.0 {
                self.steer(Direction::Negative);
            }
            else {
                self.steer(Direction::Positive);
            }

            // Rounding in the step can leave a residual just off zero
            if self.steering_angle.abs() <= self.epsilon {
                self.steering_angle = 0.0;
                self.report.steering_snapped = true;
            }
        }
    }

    /// Advance the vehicle by one tick.
    ///
    /// The velocity update is skipped entirely (not clamped) if it would
    /// take the velocity magnitude over `max_velocity`.
    pub fn advance(&mut self) {
        let velocity = self.velocity + self.acceleration;

        if velocity.abs() <= self.params.max_velocity {
            self.velocity = velocity;
        }
        else {
            self.report.velocity_limited = true;
        }

        self.state.update_state(
            self.velocity,
            self.acceleration,
            self.steering_angle,
            self.params.time_step,
            self.params.vehicle_length,
        );

        self.num_ticks += 1;

        trace!(
            "VehCtrl tick {}: v = {}, a = {}, steer = {}",
            self.num_ticks,
            self.velocity,
            self.acceleration,
            self.steering_angle
        );
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Units: degrees
    pub fn steering_angle(&self) -> f64 {
        self.steering_angle
    }

    /// Tolerance used for centering decisions.
    ///
    /// Units: degrees
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn position(&self) -> (f64, f64) {
        self.state.position()
    }

    /// Units: degrees
    pub fn heading(&self) -> f64 {
        self.state.heading()
    }

    pub fn pose(&self) -> Pose {
        self.state.pose()
    }

    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }

    /// Simulated time elapsed since spawn.
    ///
    /// Units: seconds
    pub fn sim_time_s(&self) -> f64 {
        self.num_ticks as f64 * self.params.time_step
    }

    /// Status flags raised since the last call to `clear_report`.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    pub fn clear_report(&mut self) {
        self.report = StatusReport::default();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn default_ctrl() -> VehicleController {
        VehicleController::new(0.0, 0.0, Params::default()).unwrap()
    }

    #[test]
    fn test_construction_limits() {
        let p = Params { vehicle_length: 0.5, ..Default::default() };
        assert!(matches!(
            VehicleController::new(0.0, 0.0, p),
            Err(VehCtrlError::InvalidConfiguration { .. })
        ));

        let p = Params { axle_width: 0.9, ..Default::default() };
        assert!(matches!(
            VehicleController::new(0.0, 0.0, p),
            Err(VehCtrlError::InvalidConfiguration { .. })
        ));

        let p = Params { vehicle_length: 1.0, axle_width: 1.0, ..Default::default() };
        assert!(VehicleController::new(0.0, 0.0, p).is_ok());
    }

    #[test]
    fn test_spawn() {
        let c = VehicleController::new(50.0, 50.0, Params::default()).unwrap();
        assert_eq!(c.position(), (50.0, 50.0));
        assert_eq!(c.heading(), 0.0);
        assert_eq!(c.velocity(), 0.0);
        assert_eq!(c.acceleration(), 0.0);
        assert_eq!(c.steering_angle(), 0.0);
        assert_eq!(c.epsilon(), 0.1);
        assert_eq!(c.num_ticks(), 0);
    }

    #[test]
    fn test_accelerate() {
        let mut c = default_ctrl();

        c.accelerate(Direction::Positive);
        assert!((c.acceleration() - 0.01).abs() < 1e-12);

        // Held input accumulates
        c.accelerate(Direction::Positive);
        assert!((c.acceleration() - 0.02).abs() < 1e-12);

        c.accelerate(Direction::Negative);
        assert!((c.acceleration() - 0.01).abs() < 1e-12);

        // Coasting resets instantly, and is idempotent
        for _ in 0..5 {
            c.accelerate(Direction::Neutral);
            assert_eq!(c.acceleration(), 0.0);
        }
    }

    #[test]
    fn test_velocity_never_exceeds_limit() {
        let params = Params { max_velocity: 2.0, ..Default::default() };
        let mut c = VehicleController::new(0.0, 0.0, params).unwrap();

        let mut limited = false;
        for _ in 0..200 {
            c.accelerate(Direction::Positive);
            c.advance();
            assert!(c.velocity().abs() <= 2.0);
            limited |= c.report().velocity_limited;
        }
        assert!(limited);

        // Velocity sticks below the limit rather than saturating at it
        assert!(c.velocity() < 2.0);

        for _ in 0..400 {
            c.accelerate(Direction::Negative);
            c.advance();
            assert!(c.velocity().abs() <= 2.0);
        }
    }

    #[test]
    fn test_velocity_update_skipped_not_clamped() {
        let params = Params { max_velocity: 0.025, ..Default::default() };
        let mut c = VehicleController::new(0.0, 0.0, params).unwrap();

        // 0.01 then 0.01 + 0.02 = 0.03 which is over the limit
        c.accelerate(Direction::Positive);
        c.advance();
        let v1 = c.velocity();
        assert!((v1 - 0.01).abs() < 1e-12);

        c.accelerate(Direction::Positive);
        c.advance();
        assert_eq!(c.velocity(), v1);
        assert!(c.report().velocity_limited);
    }

    #[test]
    fn test_steer_to_lock_and_hold() {
        let mut c = default_ctrl();

        for tick in 1..=30 {
            c.steer(Direction::Positive);
            assert_eq!(c.steering_angle(), tick as f64);
        }
        assert_eq!(c.steering_angle(), 30.0);
        assert!(!c.report().steering_limited);

        // Over the lock, neither advances nor zeroes
        c.steer(Direction::Positive);
        assert_eq!(c.steering_angle(), 30.0);
        assert!(c.report().steering_limited);
        assert!(!c.report().steering_snapped);
    }

    #[test]
    fn test_steering_never_exceeds_lock() {
        let params = Params { steer_step: 0.7, max_steering_angle: 5.0, ..Default::default() };
        let mut c = VehicleController::new(0.0, 0.0, params).unwrap();

        let pattern = [
            Direction::Positive, Direction::Positive, Direction::Negative,
            Direction::Positive, Direction::Neutral
        ];

        for d in pattern.iter().cycle().take(100) {
            c.steer(*d);
            assert!(c.steering_angle().abs() <= 5.0);
        }

        for _ in 0..100 {
            c.steer(Direction::Negative);
            assert!(c.steering_angle().abs() <= 5.0);
        }
    }

    #[test]
    fn test_steer_snaps_near_zero_when_over_lock() {
        // A step larger than the lock can never be applied, from near zero
        // the angle snaps to exactly zero instead.
        let params = Params { steer_step: 40.0, ..Default::default() };
        let mut c = VehicleController::new(0.0, 0.0, params).unwrap();

        c.steer(Direction::Positive);
        assert_eq!(c.steering_angle(), 0.0);
        assert!(c.report().steering_snapped);
    }

    #[test]
    fn test_centering_convergence() {
        for start_ticks in 0..=30 {
            let mut c = default_ctrl();
            for _ in 0..start_ticks {
                c.steer(Direction::Negative);
            }
            let angle0 = c.steering_angle();

            let max_ticks = (angle0.abs() / c.params().steer_step).ceil() as usize;
            for _ in 0..max_ticks {
                c.centre_steering();
            }
            assert_eq!(c.steering_angle(), 0.0, "from {}", angle0);

            // Stays centred
            c.centre_steering();
            assert_eq!(c.steering_angle(), 0.0);
        }
    }

    #[test]
    fn test_centering_off_grid_angle() {
        let params = Params { steer_step: 0.3, ..Default::default() };
        let mut c = VehicleController::new(0.0, 0.0, params).unwrap();

        for _ in 0..7 {
            c.steer(Direction::Positive);
        }
        let angle0 = c.steering_angle();
        let max_ticks = (angle0 / 0.3).ceil() as usize;

        for _ in 0..max_ticks {
            c.centre_steering();
        }
        assert_eq!(c.steering_angle(), 0.0);
    }

    #[test]
    fn test_centering_zeroes_instead_of_crossing() {
        let params = Params { steer_step: 0.5, ..Default::default() };
        let mut c = VehicleController::new(0.0, 0.0, params).unwrap();
        for _ in 0..5 {
            c.steer(Direction::Positive);
        }
        assert_eq!(c.steering_angle(), 2.5);

        c.params.steer_step = 1.0;

        c.centre_steering();
        assert_eq!(c.steering_angle(), 1.5);
        c.centre_steering();
        assert_eq!(c.steering_angle(), 0.5);
        assert!(!c.report().steering_snapped);

        // A plain nudge would cross to -0.5 here
        c.centre_steering();
        assert_eq!(c.steering_angle(), 0.0);
        assert!(c.report().steering_snapped);
    }

    #[test]
    fn test_single_tick_scenario() {
        let mut c = default_ctrl();

        c.accelerate(Direction::Positive);
        c.steer(Direction::Positive);
        c.advance();

        let a = 0.1 * 0.1;
        assert_eq!(c.acceleration(), a);
        assert_eq!(c.velocity(), a);
        assert_eq!(c.steering_angle(), 1.0);
        assert_eq!(c.state().steering_angle(), 1.0);

        let heading = (a / 4.0) * 1f64.to_radians().tan();
        assert_eq!(c.heading(), heading);
        assert!((heading - 0.0000436).abs() < 1e-7);

        let (x, y) = c.position();
        assert_eq!(x, a * heading.to_radians().cos() * 0.1);
        assert_eq!(y, a * heading.to_radians().sin() * 0.1);

        assert_eq!(c.num_ticks(), 1);
        assert!((c.sim_time_s() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_clear_report() {
        let mut c = default_ctrl();
        c.steer(Direction::Positive);
        c.centre_steering();
        assert!(c.report().steering_snapped);

        c.clear_report();
        assert_eq!(c.report(), StatusReport::default());
    }
}
