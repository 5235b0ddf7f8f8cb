//! Implementations for the Chassis state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use serde::Serialize;

// Internal
use super::{ChassisError, DriveCmd, FrameOfReference};
use crate::{
    drive_ctrl::{self, DriveCtrl, DriveReport, WheelPos, NUM_WHEELS},
    input::{InputHandler, InputParams},
    odom::{Odometry, Pose, WheelSample},
    wheel::{HeadingSensor, OdomWheelHw, SwerveWheel, WheelOutput},
};
use util::{
    archive::{Archived, Archiver},
    maths::wrap_degrees,
    module::State,
    session::Session,
    vector::PlanarVector,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A swerve chassis with odometry.
pub struct Chassis<H, G> {
    drive_ctrl: DriveCtrl<H>,
    input: InputHandler,
    gyro: G,
    odom: Odometry,

    /// Wheel travel at the last distance reference.
    distance_ref_in: [f64; NUM_WHEELS],

    current_cmd: Option<DriveCmd>,

    /// Number of archived cycles. An exec cycle may run `proc` more than
    /// once but archives once.
    num_cycles: u64,

    report: StatusReport,
    output: OutputData,
    arch_wheels: Archiver,
    arch_pose: Archiver,
}

/// Input data to the chassis.
#[derive(Debug, Default)]
pub struct InputData {
    /// New command, or `None` to carry on with the current one.
    pub cmd: Option<DriveCmd>,
}

/// Output of one chassis cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutputData {
    /// Demands issued to each wheel this cycle.
    pub wheels: [WheelOutput; NUM_WHEELS],

    /// Pose estimate at the end of the cycle.
    pub pose: Pose,
}

/// Status report for chassis processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Wheel speeds were scaled down to the maximum output.
    pub speeds_saturated: bool,

    /// Wheels driving in reverse to avoid a long steer.
    pub reversed: [bool; NUM_WHEELS],

    /// Wheels holding their direction as they had nothing to do.
    pub held: [bool; NUM_WHEELS],
}

/// Archive record for one wheel on one cycle.
#[derive(Serialize)]
struct WheelRecord {
    cycle: u64,
    wheel: WheelPos,
    direction_deg: f64,
    travel_in: f64,
    steer_target_revs: f64,
    drive_speed: f64,
    reversed: bool,
    held: bool,
}

/// Archive record for the chassis on one cycle.
#[derive(Serialize)]
struct PoseRecord {
    cycle: u64,
    cmd: &'static str,
    x_in: f64,
    y_in: f64,
    heading_deg: f64,
    speeds_saturated: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<H, G> Chassis<H, G>
where
    H: OdomWheelHw,
    G: HeadingSensor
{
    /// Build the chassis from its parameters and hardware.
    ///
    /// Wheels are given in `WheelPos` order. The pose starts at the origin
    /// with the current sensor heading taken as heading 0.
    pub fn new(
        drive_params: drive_ctrl::Params,
        input_params: InputParams,
        wheels: [H; NUM_WHEELS],
        gyro: G
    ) -> Result<Self, ChassisError> {
        let drive_ctrl = DriveCtrl::new(drive_params, wheels)?;
        let input = InputHandler::new(input_params)?;
        let odom = Odometry::new(gyro.absolute_heading())?;
        let distance_ref_in = drive_ctrl.travel_distances();

        Ok(Self {
            drive_ctrl,
            input,
            gyro,
            odom,
            distance_ref_in,
            current_cmd: None,
            num_cycles: 0,
            report: StatusReport::default(),
            output: OutputData::default(),
            arch_wheels: Archiver::default(),
            arch_pose: Archiver::default(),
        })
    }

    /// Start archiving into the session's `chassis` archive directory.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_wheels = Archiver::from_path(session, "chassis/wheels.csv")?;
        self.arch_pose = Archiver::from_path(session, "chassis/pose.csv")?;

        Ok(())
    }

    /// Drive the chassis, see [`DriveCtrl::drive`].
    pub fn drive(
        &mut self,
        strafe_x: f64,
        strafe_y: f64,
        rotation: f64
    ) -> Result<DriveReport, ChassisError> {
        let report = self.drive_ctrl.drive(strafe_x, strafe_y, rotation)?;
        self.update_odometry()?;

        Ok(report)
    }

    /// Drive from raw driver input.
    ///
    /// The strafe vector and rotation are shaped by the input handler. In the
    /// field frame the strafe is turned by the heading sensor's reading so it
    /// is given relative to the field.
    pub fn user_input_drive(
        &mut self,
        strafe_x: f64,
        strafe_y: f64,
        rotation: f64,
        frame: FrameOfReference
    ) -> Result<DriveReport, ChassisError> {
        let mut strafe = self.input.apply_vector(PlanarVector::new(strafe_x, strafe_y))?;
        let rotation = self.input.apply(rotation)?;

        if frame == FrameOfReference::Field {
            let heading_deg = wrap_degrees(self.gyro.absolute_heading());
            strafe = strafe.with_angle(wrap_degrees(strafe.angle() - heading_deg));
        }

        // Shaped vectors can stray just outside the unit square through
        // rounding of the polar conversion
        let clip = |v: f64| v.max(-1.0).min(1.0);

        self.drive(clip(strafe.x()), clip(strafe.y()), rotation)
    }

    /// Point all wheels at `direction_deg` and drive them at `speed`.
    pub fn steer_all(
        &mut self,
        direction_deg: f64,
        speed: f64
    ) -> Result<[WheelOutput; NUM_WHEELS], ChassisError> {
        let outputs = self.drive_ctrl.steer_all(direction_deg, speed)?;
        self.update_odometry()?;

        Ok(outputs)
    }

    /// Steer all wheels to `direction_deg` without driving, returning true
    /// once they are all within `margin_deg` of it.
    pub fn steer_all_within_range(
        &mut self,
        direction_deg: f64,
        margin_deg: f64
    ) -> Result<bool, ChassisError> {
        let within = self.drive_ctrl.steer_all_within_range(direction_deg, margin_deg)?;
        self.update_odometry()?;

        Ok(within)
    }

    pub fn check_all_within_range(
        &self,
        direction_deg: f64,
        margin_deg: f64
    ) -> Result<bool, ChassisError> {
        Ok(self.drive_ctrl.check_all_within_range(direction_deg, margin_deg)?)
    }

    pub fn stop(&mut self) {
        self.drive_ctrl.stop();
    }

    /// Bring the pose estimate up to date with the hardware.
    pub fn update_odometry(&mut self) -> Result<Pose, ChassisError> {
        let samples = self.wheel_samples();
        Ok(self.odom.update(&samples, self.gyro.absolute_heading())?)
    }

    /// Current pose, including any movement since the last update.
    pub fn get_position(&mut self) -> Result<Pose, ChassisError> {
        self.update_odometry()
    }

    /// Overwrite the pose estimate without touching the heading sensor.
    pub fn reset_position(&mut self, pose: Pose) -> Result<(), ChassisError> {
        // Account for travel up to now against the old pose
        self.update_odometry()?;
        Ok(self.odom.reset_position(pose, self.gyro.absolute_heading())?)
    }

    /// Zero the heading sensor, making the current chassis heading the new
    /// field frame for field relative input. The pose estimate is unaffected.
    pub fn reset_gyro(&mut self) -> Result<(), ChassisError> {
        self.update_odometry()?;
        self.gyro.reset();
        self.odom.rebase_heading(self.gyro.absolute_heading())?;

        info!("Heading sensor reset");

        Ok(())
    }

    /// Use the current wheel travel as the reference for `distance_traveled`.
    pub fn set_distance_reference(&mut self) {
        self.distance_ref_in = self.drive_ctrl.travel_distances();
    }

    /// Mean of each wheel's absolute travel since the distance reference.
    ///
    /// Units: inches
    pub fn distance_traveled(&self) -> f64 {
        let travel = self.drive_ctrl.travel_distances();

        travel.iter()
            .zip(self.distance_ref_in.iter())
            .map(|(t, r)| (t - r).abs())
            .sum::<f64>()
            / NUM_WHEELS as f64
    }

    pub fn current_cmd(&self) -> Option<DriveCmd> {
        self.current_cmd
    }

    pub fn drive_ctrl(&self) -> &DriveCtrl<H> {
        &self.drive_ctrl
    }

    pub fn gyro(&self) -> &G {
        &self.gyro
    }

    /// Mutable access to the wheels and heading sensor together, for
    /// hardware which must be stepped.
    pub fn hardware_mut(&mut self) -> (&mut [SwerveWheel<H>; NUM_WHEELS], &mut G) {
        (self.drive_ctrl.wheels_mut(), &mut self.gyro)
    }

    fn wheel_samples(&self) -> [WheelSample; NUM_WHEELS] {
        let mut samples = [WheelSample::default(); NUM_WHEELS];
        for (s, w) in samples.iter_mut().zip(self.drive_ctrl.wheels().iter()) {
            *s = WheelSample {
                direction_deg: w.direction(),
                travel_in: w.travel_distance(),
            };
        }
        samples
    }

    /// Outputs for wheels that have been stopped.
    fn stopped_outputs(&self) -> [WheelOutput; NUM_WHEELS] {
        let mut outputs = [WheelOutput::default(); NUM_WHEELS];
        for (o, w) in outputs.iter_mut().zip(self.drive_ctrl.wheels().iter()) {
            o.steer_target_revs = w.hw().raw_steer_position();
        }
        outputs
    }

    /// Execute a command which moves the wheels.
    fn exec_cmd(&mut self, cmd: &DriveCmd) -> Result<[WheelOutput; NUM_WHEELS], ChassisError> {
        let drive_report = match *cmd {
            DriveCmd::None => return Ok(self.output.wheels),
            DriveCmd::Stop => {
                self.stop();
                return Ok(self.stopped_outputs());
            },
            DriveCmd::Drive { strafe_x, strafe_y, rotation } => {
                self.drive(strafe_x, strafe_y, rotation)?
            },
            DriveCmd::UserInput { strafe_x, strafe_y, rotation, frame } => {
                self.user_input_drive(strafe_x, strafe_y, rotation, frame)?
            },
            DriveCmd::SteerAll { direction_deg, speed } => DriveReport {
                outputs: self.steer_all(direction_deg, speed)?,
                ..Default::default()
            },
            DriveCmd::ResetPosition { x_in, y_in, heading_deg } => {
                self.reset_position(Pose::new(PlanarVector::new(x_in, y_in), heading_deg))?;
                return Ok(self.output.wheels);
            },
        };

        self.report.speeds_saturated = drive_report.saturated;
        self.report.held = drive_report.held;
        for (r, o) in self.report.reversed.iter_mut().zip(drive_report.outputs.iter()) {
            *r = o.reversed;
        }

        Ok(drive_report.outputs)
    }
}

impl<H, G> State for Chassis<H, G>
where
    H: OdomWheelHw,
    G: HeadingSensor
{
    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = ChassisError;

    /// Perform cyclic processing of the chassis.
    ///
    /// A new command is executed and becomes the current command. Without a
    /// new command the current one is executed again, so steering is
    /// recomputed from the measured wheel directions every cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();

        let mut wheels = None;

        match input_data.cmd {
            Some(DriveCmd::None) | None => (),
            Some(cmd) if cmd.is_one_shot() => {
                self.exec_cmd(&cmd)?;
            },
            Some(cmd) => {
                // Only adopt the command once it has been accepted
                wheels = Some(self.exec_cmd(&cmd)?);
                debug!("New chassis command: {:?}", cmd);
                self.current_cmd = Some(cmd);
            }
        }

        if wheels.is_none() {
            if let Some(cmd) = self.current_cmd {
                wheels = Some(self.exec_cmd(&cmd)?);
            }
        }

        let output = OutputData {
            wheels: match wheels {
                Some(w) => w,
                None => self.output.wheels
            },
            pose: self.update_odometry()?,
        };

        trace!("Chassis output: pose {}, report {:?}", output.pose, self.report);

        self.output = output;

        Ok((output, self.report))
    }
}

impl<H, G> Archived for Chassis<H, G>
where
    H: OdomWheelHw,
    G: HeadingSensor
{
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let cycle = self.num_cycles;
        self.num_cycles += 1;

        self.arch_pose.serialise(PoseRecord {
            cycle,
            cmd: self.current_cmd.map(|c| c.name()).unwrap_or("none"),
            x_in: self.output.pose.location().x(),
            y_in: self.output.pose.location().y(),
            heading_deg: self.output.pose.heading_deg(),
            speeds_saturated: self.report.speeds_saturated,
        })?;

        let samples = self.wheel_samples();
        for pos in WheelPos::ALL.iter() {
            let i = pos.index();
            self.arch_wheels.serialise(WheelRecord {
                cycle,
                wheel: *pos,
                direction_deg: samples[i].direction_deg,
                travel_in: samples[i].travel_in,
                steer_target_revs: self.output.wheels[i].steer_target_revs,
                drive_speed: self.output.wheels[i].drive_speed,
                reversed: self.report.reversed[i],
                held: self.report.held[i],
            })?;
        }

        Ok(())
    }
}
