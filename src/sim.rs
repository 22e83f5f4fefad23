use std::f64::consts::PI;
use std::time::Duration;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strafe_kinematics::{
    ChassisSpeeds, Pose2d, Rotation2d, SwerveDriveKinematics, SwerveDriveOdometry,
    SwerveModulePosition, SwerveModuleState, Twist2d, desaturate_wheel_speeds, wrap_angle,
};
use tokio::time;
use tracing::{debug, info, warn};

use crate::blackboard::{self, Blackboard};
use crate::config::{NoiseConfig, PathConfig, SimConfig};

/// Commanded chassis speeds along a weaving path.
///
/// Speed rises from rest and falls back to rest over the run; curvature
/// swings left and right with a fixed period.
pub struct ReferencePath {
    config: PathConfig,
    duration: f64,
}

impl ReferencePath {
    pub fn new(config: PathConfig, duration: f64) -> Self {
        ReferencePath { config, duration }
    }

    pub fn speeds_at(&self, t: f64) -> ChassisSpeeds {
        let s = (PI * t / self.duration).sin();
        let v = self.config.max_speed * s * s;
        let curvature =
            self.config.curvature_amplitude * (2.0 * PI * t / self.config.curvature_period_s).sin();
        ChassisSpeeds::new(v, 0.0, v * curvature)
    }
}

/// The simulated robot: true pose plus the noisy sensors odometry sees.
pub struct SimulatedDrivetrain {
    kinematics: SwerveDriveKinematics,
    max_module_speed: f64,
    noise: NoiseConfig,
    rng: StdRng,
    truth: Pose2d,
    commanded: Vec<SwerveModuleState>,
    positions: Vec<SwerveModulePosition>,
}

impl SimulatedDrivetrain {
    pub fn new(
        kinematics: SwerveDriveKinematics,
        max_module_speed: f64,
        noise: NoiseConfig,
        seed: u64,
    ) -> Self {
        let count = kinematics.module_count();
        SimulatedDrivetrain {
            kinematics,
            max_module_speed,
            noise,
            rng: StdRng::seed_from_u64(seed),
            truth: Pose2d::default(),
            commanded: vec![SwerveModuleState::default(); count],
            positions: vec![SwerveModulePosition::default(); count],
        }
    }

    pub fn truth(&self) -> Pose2d {
        self.truth
    }

    pub fn module_positions(&self) -> &[SwerveModulePosition] {
        &self.positions
    }

    /// Drive for `dt` seconds toward `speeds`, within module speed limits.
    pub fn step(&mut self, speeds: &ChassisSpeeds, dt: f64) -> anyhow::Result<()> {
        let discrete = speeds.discretize(dt);
        let mut states = self.kinematics.to_module_states(&discrete, &self.commanded)?;
        desaturate_wheel_speeds(&mut states, self.max_module_speed);
        let states: Vec<SwerveModuleState> = states
            .iter()
            .zip(&self.commanded)
            .map(|(state, previous)| state.optimize(previous.angle))
            .collect();

        let achieved = self.kinematics.to_chassis_speeds(&states)?;
        self.truth = self.truth.exp(&Twist2d::new(
            achieved.vx * dt,
            achieved.vy * dt,
            achieved.omega * dt,
        ));

        for (position, state) in self.positions.iter_mut().zip(&states) {
            let speed = state.speed + gaussian(&mut self.rng) * self.noise.speed_std;
            position.distance += speed * dt;
            let angle_noise = gaussian(&mut self.rng) * self.noise.angle_std;
            position.angle = state.angle + Rotation2d::new(angle_noise);
        }
        self.commanded = states;
        Ok(())
    }

    /// A gyro reading: true heading plus noise.
    pub fn read_gyro(&mut self) -> Rotation2d {
        self.truth.rotation() + Rotation2d::new(gaussian(&mut self.rng) * self.noise.heading_std)
    }
}

/// Standard normal sample (Box–Muller).
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub mean_error: f64,
    pub max_error: f64,
    pub final_heading_error: f64,
    pub final_estimate: Pose2d,
    pub final_truth: Pose2d,
}

/// Run the control loop for the configured duration.
pub async fn control_loop(config: SimConfig, bb: Blackboard) -> anyhow::Result<RunSummary> {
    let kinematics = SwerveDriveKinematics::new(&config.drivetrain.module_translations())
        .context("building swerve kinematics")?;
    let path = ReferencePath::new(config.path.clone(), config.run.duration_s);
    let mut drivetrain = SimulatedDrivetrain::new(
        kinematics.clone(),
        config.drivetrain.max_module_speed,
        config.noise.clone(),
        config.run.seed,
    );

    let gyro = drivetrain.read_gyro();
    let mut odometry = SwerveDriveOdometry::new(kinematics, gyro, drivetrain.module_positions())?;

    let dt = config.run.period_s;
    let ticks = (config.run.duration_s / dt).round() as u64;
    let reanchor_every = config
        .run
        .reanchor_period_s
        .map(|period| ((period / dt).round() as u64).max(1));
    let mut ticker = time::interval(Duration::from_secs_f64(dt));

    let mut summary = RunSummary::default();
    let mut error_sum = 0.0;

    info!(ticks, dt, modules = odometry.kinematics().module_count(), "Control loop started.");

    for tick in 1..=ticks {
        if config.run.realtime {
            ticker.tick().await;
        } else {
            tokio::task::yield_now().await;
        }

        let t = (tick - 1) as f64 * dt;
        drivetrain.step(&path.speeds_at(t), dt)?;
        let gyro = drivetrain.read_gyro();
        let estimate = odometry.update(gyro, drivetrain.module_positions())?;
        let truth = drivetrain.truth();

        blackboard::publish(&bb, tick, estimate, truth);
        let error = estimate.translation().distance(&truth.translation());
        error_sum += error;
        summary.max_error = summary.max_error.max(error);
        debug!(tick, x = estimate.x(), y = estimate.y(), error, "Odometry updated");

        if error > config.run.drift_fault_threshold
            && blackboard::raise_fault(&bb, "odometry drift above threshold")
        {
            warn!(tick, error, "Odometry drift above threshold.");
        }

        if reanchor_every.is_some_and(|every| tick % every == 0) {
            odometry.reset_position(truth, gyro, drivetrain.module_positions())?;
            info!(tick, error, "Re-anchored odometry to ground truth.");
        }
    }

    let estimate = odometry.pose();
    let truth = drivetrain.truth();
    summary.ticks = ticks;
    summary.mean_error = if ticks > 0 { error_sum / ticks as f64 } else { 0.0 };
    summary.final_heading_error =
        wrap_angle(estimate.rotation().radians() - truth.rotation().radians());
    summary.final_estimate = estimate;
    summary.final_truth = truth;

    blackboard::finish(&bb);
    Ok(summary)
}

/// Log the blackboard periodically until the control loop finishes.
pub async fn telemetry(bb: Blackboard, period: Duration) -> anyhow::Result<()> {
    let mut tick = time::interval(period);
    loop {
        tick.tick().await;
        let state = blackboard::snapshot(&bb);
        info!(
            tick = state.tick,
            estimate = %state.estimate,
            truth = %state.truth,
            error = state.position_error,
            "Telemetry"
        );
        if state.finished {
            return Ok(());
        }
    }
}
