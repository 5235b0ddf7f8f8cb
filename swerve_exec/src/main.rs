//! Main swerve executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Script command acquisition
//!         - Chassis processing (drive control and odometry)
//!         - Simulated hardware step
//!         - Archiving
//!
//! Simulation time advances by exactly one cycle period per cycle and is the
//! time against which the script is run, so a `--fast` run gives the same
//! results as a real time one.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use swerve_lib::{
    chassis::{self, Chassis, DriveCmd},
    data_store::DataStore,
    drive_ctrl,
    input::InputParams,
    sim::{SimChassis, SimGyro, SimParams},
};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{Pending, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Run a swerve chassis command script against the simulated chassis.
#[derive(Debug, StructOpt)]
#[structopt(name = "swerve_exec")]
struct Opts {
    /// Path to the command script
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Don't wait for each cycle period, run as fast as possible
    #[structopt(long)]
    fast: bool,

    /// Minimum log level, one of info, debug or trace
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "swerve_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opts.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Swerve Chassis Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let drive_params: drive_ctrl::Params = util::params::load("drive_ctrl.toml")
        .wrap_err("Could not load drive control params")?;
    let input_params: InputParams = util::params::load("input.toml")
        .wrap_err("Could not load input params")?;
    let sim_params: SimParams = util::params::load("sim.toml")
        .wrap_err("Could not load sim params")?;

    if (drive_params.wheelbase_to_track_ratio - sim_params.wheelbase_to_track_ratio()).abs() > 1e-6 {
        warn!(
            "Drive control wheelbase to track ratio ({}) doesn't match the simulated chassis ({})",
            drive_params.wheelbase_to_track_ratio,
            sim_params.wheelbase_to_track_ratio()
        );
    }

    info!("Exec parameters loaded");

    // ---- LOAD SCRIPT ----

    info!("Loading script from {:?}", opts.script);

    let mut script = ScriptInterpreter::<DriveCmd>::new(&opts.script)
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} commands\n",
        script.get_duration(),
        script.get_num_cmds()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let sim = SimChassis::new(sim_params)
        .wrap_err("Invalid simulation parameters")?;

    let mut chassis = Chassis::new(drive_params, input_params, sim.wheels(), SimGyro::default())
        .wrap_err("Failed to initialise the chassis")?;
    chassis.init_archives(&session)
        .map_err(|e| eyre!("Failed to initialise the chassis archives: {}", e))?;
    info!("Chassis init complete");

    let mut ds = DataStore::default();

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let run_start = Utc::now();

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Set the per-cycle flags
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- SCRIPT PROCESSING ----

        let cmds = match script.get_pending(ds.sim_time_s) {
            Pending::None => vec![],
            Pending::Some(cmds) => cmds,
            Pending::EndOfScript => {
                info!("End of script reached, stopping");
                break
            }
        };

        // ---- CHASSIS PROCESSING ----

        // One chassis cycle per command, or one with no new command
        let mut inputs: Vec<chassis::InputData> = cmds
            .into_iter()
            .map(|c| chassis::InputData { cmd: Some(c) })
            .collect();
        if inputs.is_empty() {
            inputs.push(chassis::InputData::default());
        }

        for input in inputs.iter() {
            match chassis.proc(input) {
                Ok((o, r)) => {
                    ds.chassis_output = o;
                    ds.chassis_status_rpt = r;
                },
                Err(e) => {
                    // Chassis errors are down to bad commands in the script,
                    // which are dropped
                    warn!("Rejected chassis command {:?}: {}", input.cmd, e);
                    ds.num_rejected_cmds += 1;
                }
            }
        }

        // ---- SIMULATION ----

        {
            let (wheels, gyro) = chassis.hardware_mut();
            sim.step(wheels, gyro, CYCLE_PERIOD_S);
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = chassis.write() {
            warn!("Could not write chassis archives: {}", e);
        }

        // ---- TELEMETRY ----

        if ds.is_1_hz_cycle {
            info!(
                "t = {:6.2} s: pose {}, saturated: {}",
                ds.sim_time_s,
                ds.chassis_output.pose,
                ds.chassis_status_rpt.speeds_saturated
            );
        }

        // ---- CYCLE MANAGEMENT ----

        ds.cycle_end(CYCLE_PERIOD_S);

        if opts.fast {
            continue;
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S)
            .checked_sub(cycle_dur)
        {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    chassis.stop();

    let pose = chassis.get_position()
        .wrap_err("Could not get the final pose")?;

    info!("Final pose: {}", pose);
    info!("Distance travelled: {:.2} in", chassis.distance_traveled());
    info!(
        "Ran {} cycles ({:.2} s simulated) in {:.3} s, {} commands rejected",
        ds.num_cycles,
        ds.sim_time_s,
        util::time::duration_to_seconds(Utc::now() - run_start).unwrap_or(std::f64::NAN),
        ds.num_rejected_cmds
    );
    info!("End of execution");

    Ok(())
}
