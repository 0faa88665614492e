//! Main vehicle simulator executable entry point.
//! 
//! # Architecture
//! 
//! The general execution methodology consists of:
//! 
//!     - Initialise the session, logging, parameters and VehCtrl
//!     - Main loop, once per frame:
//!         - Input acquisition (keyboard or drive script)
//!         - Vehicle control processing (demands then one tick of motion)
//!         - Rendering
//!         - Archiving
//!         - Sleep for the rest of the frame

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::WrapErr};
use log::{debug, info, trace, warn};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use structopt::StructOpt;

// Internal
use util::{
    host,
    module::State,
    archive::Archived,
    logger::{logger_init, LevelFilter},
    session::Session,
};
use veh_lib::{
    input::{InputSource, KeyboardInput, ScriptInput},
    params::VehExecParams,
    render::{LogRenderer, Renderer, TerminalRenderer},
    veh_ctrl::{InitData as VehCtrlInitData, VehicleController},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic bicycle model vehicle simulator.
///
/// Drive with the arrow keys, or give a drive script to run headless.
#[derive(Debug, StructOpt)]
#[structopt(name = "veh_exec")]
struct Opt {
    /// Drive script to run instead of keyboard control
    #[structopt(short, long, parse(from_os_str))]
    script: Option<PathBuf>,

    /// Stop after this many ticks
    #[structopt(short = "n", long)]
    max_ticks: Option<u64>,

    /// Run ticks back to back instead of at the frame rate (scripts only)
    #[structopt(long)]
    fast: bool,

    /// Minimum level of messages to log (info, debug or trace)
    #[structopt(short, long, default_value = "info")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();
    let headless = opt.script.is_some();

    // ---- EARLY INITIALISATION ----

    let session = Session::new(
        "veh_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // The terminal is drawn on when driving by keyboard so only log to file
    logger_init(opt.log_level, &session, headless)
        .wrap_err("Failed to initialise logging")?;

    info!("Vehicle Simulator Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let exec_params: VehExecParams = util::params::load(
        "veh_exec.toml"
    ).wrap_err("Could not load exec params")?;

    exec_params.validate().wrap_err("Invalid exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut params_path = host::get_sim_root()
        .wrap_err("The software root environment variable (VEH_SIM_ROOT) is not set")?;
    params_path.push("params");
    params_path.push(&exec_params.veh_ctrl_params);

    let mut veh_ctrl = VehicleController::default();
    veh_ctrl.init(
        VehCtrlInitData {
            params_path,
            spawn_x: exec_params.spawn_x,
            spawn_y: exec_params.spawn_y,
        },
        &session
    ).wrap_err("Failed to initialise VehCtrl")?;
    info!("VehCtrl init complete");

    // ---- INITIALISE INPUT AND DISPLAY ----

    let mut input: Box<dyn InputSource> = match opt.script {
        Some(ref path) => {
            info!("Loading drive script from {:?}", path);

            let si = ScriptInput::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} entries\n",
                si.get_duration(),
                si.get_num_entries()
            );

            Box::new(si)
        }
        None => {
            info!("No script provided, keyboard control will be used\n");
            Box::new(
                KeyboardInput::new(exec_params.key_hold().wrap_err("Invalid key hold time")?)
                    .wrap_err("Failed to start keyboard input")?
            )
        }
    };

    let mut renderer: Box<dyn Renderer> = if headless {
        Box::new(LogRenderer::new(
            exec_params.screen_width,
            exec_params.screen_height,
            exec_params.log_every_n_frames
        ))
    }
    else {
        Box::new(
            TerminalRenderer::new(exec_params.screen_width, exec_params.screen_height)
                .wrap_err("Failed to initialise the terminal display")?
        )
    };

    let frame_period = exec_params.frame_period().wrap_err("Invalid frame rate")?;
    let pace = !(headless && opt.fast);

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {

        let frame_start_instant = Instant::now();

        // ---- INPUT ----

        let input_report = input.poll(veh_ctrl.sim_time_s())
            .wrap_err("Failed to acquire input")?;

        if input_report.terminate {
            info!("Termination requested");
            break;
        }

        // ---- VEHICLE CONTROL ----

        let (pose, report) = veh_ctrl.proc(&input_report)
            .wrap_err("VehCtrl processing failed")?;

        trace!("VehCtrl status: {:?}", report);

        // ---- DISPLAY ----

        renderer.render(&pose).wrap_err("Failed to render the vehicle")?;

        // ---- WRITE ARCHIVES ----

        if let Err(e) = veh_ctrl.write() {
            warn!("Could not write VehCtrl archives: {}", e);
        }

        if let Some(max) = opt.max_ticks {
            if veh_ctrl.num_ticks() >= max {
                info!("Tick limit ({}) reached", max);
                break;
            }
        }

        // ---- CYCLE MANAGEMENT ----

        if !pace {
            continue;
        }

        let frame_dur = Instant::now() - frame_start_instant;

        match frame_period.checked_sub(frame_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Frame overran by {:.06} s",
                frame_dur.as_secs_f64() - frame_period.as_secs_f64()
            )
        }
    }

    // ---- SHUTDOWN ----

    // Restore the terminal before the final report
    drop(renderer);
    drop(input);

    info!("{}", veh_ctrl.state());
    info!("End of execution after {} ticks", veh_ctrl.num_ticks());

    Ok(())
}
