//! Cyclic module interface for VehCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;

// Internal
use super::{Pose, StatusReport, VehCtrlError, VehicleController};
use crate::input::{apply_input, InputReport};
use util::{
    params,
    module::State,
    archive::{ArchiveError, Archived, Archiver},
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Data required to initialise VehCtrl.
#[derive(Clone, Debug)]
pub struct InitData {
    /// Path to the vehicle parameter file.
    pub params_path: PathBuf,

    /// Spawn position of the vehicle.
    pub spawn_x: f64,
    pub spawn_y: f64,
}

/// One row of the per-tick archive.
#[derive(Serialize)]
struct TickRecord {
    tick: u64,
    sim_time_s: f64,
    x: f64,
    y: f64,
    heading_deg: f64,
    steering_angle_deg: f64,
    velocity: f64,
    acceleration: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for VehicleController {
    type InitData = InitData;
    type InitError = VehCtrlError;

    type InputData = InputReport;
    type OutputData = Pose;
    type StatusReport = StatusReport;
    type ProcError = VehCtrlError;

    /// Initialise the VehCtrl module.
    ///
    /// Loads and validates the parameters, respawns the vehicle and opens the
    /// archives in the session.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: super::Params = params::load_path(&init_data.params_path)?;

        *self = VehicleController::new(init_data.spawn_x, init_data.spawn_y, params)?;

        self.arch_report = Archiver::from_path(session, "veh_ctrl/status_report.csv")?;
        self.arch_tick = Archiver::from_path(session, "veh_ctrl/tick.csv")?;

        info!("VehCtrl parameters: {:?}", self.params);

        Ok(())
    }

    /// Perform one tick: apply the input demands then advance the vehicle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.clear_report();

        apply_input(self, input_data);
        self.advance();

        debug!("{}", self.state());

        Ok((self.pose(), self.report()))
    }
}

impl Archived for VehicleController {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let pose = self.pose();
        let record = TickRecord {
            tick: self.num_ticks(),
            sim_time_s: self.sim_time_s(),
            x: pose.x,
            y: pose.y,
            heading_deg: pose.heading_deg,
            steering_angle_deg: pose.steering_angle_deg,
            velocity: self.velocity(),
            acceleration: self.acceleration(),
        };

        self.arch_tick.serialise(record)?;
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::input::{Lateral, Longitudinal};
    use crate::veh_ctrl::Params;

    #[test]
    fn test_proc_applies_input_then_advances() {
        let mut c = VehicleController::default();

        let input = InputReport {
            longitudinal: Longitudinal::Forward,
            lateral: Lateral::Right,
            terminate: false,
        };

        let (pose, report) = c.proc(&input).unwrap();

        assert_eq!(c.num_ticks(), 1);
        assert_eq!(pose.steering_angle_deg, 1.0);
        assert!(pose.x > 0.0);
        assert_eq!(report, StatusReport::default());

        // Releasing the keys centres the steering and stops accelerating
        let (pose, report) = c.proc(&InputReport::default()).unwrap();
        assert_eq!(pose.steering_angle_deg, 0.0);
        assert_eq!(c.acceleration(), 0.0);
        assert!(report.steering_snapped);
    }

    #[test]
    fn test_init_and_archive() {
        let root = std::env::temp_dir()
            .join(format!("veh_ctrl_init_{}", std::process::id()));
        let session = Session {
            session_root: root.clone(),
            arch_root: root.join("arch"),
            log_file_path: root.join("veh_exec.log"),
        };

        let params_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../params/veh_ctrl.toml");

        let mut c = VehicleController::default();
        c.init(InitData { params_path, spawn_x: 50.0, spawn_y: 50.0 }, &session).unwrap();

        assert_eq!(c.position(), (50.0, 50.0));
        assert_eq!(*c.params(), Params::default());

        c.proc(&InputReport::default()).unwrap();
        c.write().unwrap();

        let ticks = std::fs::read_to_string(root.join("arch/veh_ctrl/tick.csv")).unwrap();
        let mut lines = ticks.lines();
        assert_eq!(
            lines.next(),
            Some("tick,sim_time_s,x,y,heading_deg,steering_angle_deg,velocity,acceleration")
        );
        assert!(lines.next().unwrap().starts_with("1,0.1,50.0,50.0,"));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_init_rejects_bad_geometry() {
        let root = std::env::temp_dir()
            .join(format!("veh_ctrl_bad_{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        let params_path = root.join("bad.toml");
        std::fs::write(&params_path, "vehicle_length = 0.5").unwrap();

        let session = Session {
            session_root: root.clone(),
            arch_root: root.join("arch"),
            log_file_path: root.join("veh_exec.log"),
        };

        let mut c = VehicleController::default();
        assert!(matches!(
            c.init(InitData { params_path, spawn_x: 0.0, spawn_y: 0.0 }, &session),
            Err(VehCtrlError::InvalidConfiguration { .. })
        ));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_write_without_init() {
        let mut c = VehicleController::default();
        assert!(matches!(c.write(), Err(ArchiveError::NotInitialised)));
    }
}
