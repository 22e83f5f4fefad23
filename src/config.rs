use anyhow::{Context, ensure};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use strafe_kinematics::Translation2d;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    pub drivetrain: DrivetrainConfig,
    pub path: PathConfig,
    pub noise: NoiseConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrivetrainConfig {
    /// `[x, y]` offset of each module from the center of rotation (m).
    pub module_locations: Vec<[f64; 2]>,
    pub max_module_speed: f64,
}

impl DrivetrainConfig {
    pub fn module_translations(&self) -> Vec<Translation2d> {
        self.module_locations
            .iter()
            .map(|[x, y]| Translation2d::new(*x, *y))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathConfig {
    pub max_speed: f64,
    pub curvature_amplitude: f64,
    pub curvature_period_s: f64,
}

/// Standard deviations of the simulated sensor noise.
#[derive(Debug, Clone, Deserialize)]
pub struct NoiseConfig {
    pub speed_std: f64,
    pub angle_std: f64,
    pub heading_std: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub period_s: f64,
    pub duration_s: f64,
    pub seed: u64,
    pub realtime: bool,
    pub telemetry_period_s: f64,
    pub drift_fault_threshold: f64,
    #[serde(default)]
    pub reanchor_period_s: Option<f64>,
}

impl SimConfig {
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.run.period_s > 0.0, "run.period_s must be positive");
        ensure!(self.run.duration_s > 0.0, "run.duration_s must be positive");
        ensure!(
            self.run.telemetry_period_s > 0.0,
            "run.telemetry_period_s must be positive"
        );
        ensure!(
            self.drivetrain.max_module_speed > 0.0,
            "drivetrain.max_module_speed must be positive"
        );
        ensure!(
            self.path.curvature_period_s > 0.0,
            "path.curvature_period_s must be positive"
        );
        if let Some(reanchor) = self.run.reanchor_period_s {
            ensure!(reanchor > 0.0, "run.reanchor_period_s must be positive");
        }
        for (name, std) in [
            ("noise.speed_std", self.noise.speed_std),
            ("noise.angle_std", self.noise.angle_std),
            ("noise.heading_std", self.noise.heading_std),
        ] {
            ensure!(std >= 0.0, "{} must not be negative", name);
        }
        Ok(())
    }
}

/// Load the simulation config from a TOML file, with `STRAFE__SECTION__KEY`
/// environment variables taking precedence.
pub fn load_config(path: &str) -> anyhow::Result<SimConfig> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("STRAFE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e).with_context(|| format!("reading {}", path));
        }
    };

    let config: SimConfig = settings
        .try_deserialize()
        .with_context(|| format!("parsing {}", path))?;
    config.validate().context("invalid simulation config")?;
    info!("Successfully loaded configuration: {:?}", config);
    Ok(config)
}
