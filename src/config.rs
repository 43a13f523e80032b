//! Simulation and batch-runner configuration
//!
//! `SimConfig` is the explicit, validated replacement for loosely-typed
//! tuning dictionaries: every component receives its values at construction
//! time. `RunnerConfig` is read from the environment by the `fuel-sim` binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::game::constants::{collection, field, fuel, grid, robot, scoring, timing};
use crate::game::robot::{Drivetrain, IntakeKind};

/// Rejected configuration values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("field dimensions must be positive, got {width} x {length}")]
    FieldSize { width: f32, length: f32 },
    #[error("divider_x {divider_x} must leave a neutral zone inside a field {width} wide")]
    Divider { divider_x: f32, width: f32 },
    #[error("{alliance} alliance needs 1-3 robots, got {count}")]
    SeatCount { alliance: &'static str, count: usize },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
    #[error("shoot range {min}..{max} is empty")]
    ShootRange { min: f32, max: f32 },
    #[error("spatial grid needs at least one column and one row")]
    EmptyGrid,
    #[error("grid cell {cell_width:.1} x {cell_length:.1} is smaller than collection range {range:.1}")]
    GridTooFine {
        cell_width: f32,
        cell_length: f32,
        range: f32,
    },
    #[error("RUNS must be at least 1")]
    NoRuns,
}

/// Failures constructing a simulation from external configuration
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("malformed configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("no robot seat {0}")]
    UnknownSeat(usize),
}

/// Static field dimensions (inches)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub length: f32,
    pub divider_x: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: field::WIDTH,
            length: field::LENGTH,
            divider_x: field::DIVIDER_X,
        }
    }
}

/// Fuel physics coefficients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-tick velocity retention
    pub friction: f32,
    /// Restitution on wall contact
    pub bounciness: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: fuel::FRICTION,
            bounciness: fuel::BOUNCINESS,
        }
    }
}

/// Spatial grid layout (columns along x, rows along y)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub columns: usize,
    pub rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: grid::COLUMNS,
            rows: grid::ROWS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Physics ticks per second
    pub tick_rate: f32,
}

impl TimingConfig {
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_rate: timing::TICK_RATE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub points_per_hit: u32,
    pub hot_catch_penalty: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_hit: scoring::POINTS_PER_HIT,
            hot_catch_penalty: scoring::HOT_CATCH_PENALTY,
        }
    }
}

/// Per-seat robot build and behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RobotConfig {
    pub name: String,
    pub drivetrain: Drivetrain,
    pub intake: IntakeKind,
    pub length: f32,
    pub width: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    /// Degrees per second at full rotate command
    pub rotation_speed: f32,
    pub capacity: u32,
    pub preload: u32,
    pub shoot_rate: f32,
    pub launch_accuracy: f32,
    pub min_shoot_dist: f32,
    pub max_shoot_dist: f32,
    pub auto_shoot_max_speed: f32,
    pub auto_shoot_accel: f32,
    pub intake_success_rate: f32,
    pub intake_transition_time: f32,
    pub auto_shoot_enabled: bool,
    pub auto_pass_enabled: bool,
    /// Controller may choose to pass instead of ferrying
    pub can_pass: bool,
    /// Seat is driven by the built-in controller
    pub is_ai: bool,
    /// Controller decisions per second
    pub ai_tick_rate: f32,
}

impl RobotConfig {
    /// Broad-phase collection radius around the robot center
    pub fn collection_range(&self) -> f32 {
        self.length.max(self.width) / 2.0 + collection::RANGE_MARGIN
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("length", self.length)?;
        positive("width", self.width)?;
        positive("max_speed", self.max_speed)?;
        positive("acceleration", self.acceleration)?;
        positive("rotation_speed", self.rotation_speed)?;
        positive("capacity", self.capacity as f32)?;
        positive("shoot_rate", self.shoot_rate)?;
        positive("auto_shoot_max_speed", self.auto_shoot_max_speed)?;
        positive("auto_shoot_accel", self.auto_shoot_accel)?;
        positive("ai_tick_rate", self.ai_tick_rate)?;
        unit("launch_accuracy", self.launch_accuracy)?;
        unit("intake_success_rate", self.intake_success_rate)?;
        if !(self.intake_transition_time >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "intake_transition_time",
                value: self.intake_transition_time,
            });
        }
        if !(self.min_shoot_dist >= 0.0 && self.min_shoot_dist <= self.max_shoot_dist) {
            return Err(ConfigError::ShootRange {
                min: self.min_shoot_dist,
                max: self.max_shoot_dist,
            });
        }
        Ok(())
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            name: "Robot".to_string(),
            drivetrain: Drivetrain::Swerve,
            intake: IntakeKind::Dual,
            length: robot::LENGTH,
            width: robot::WIDTH,
            max_speed: robot::MAX_SPEED,
            acceleration: robot::ACCELERATION,
            rotation_speed: robot::ROTATION_SPEED,
            capacity: robot::CAPACITY,
            preload: robot::PRELOAD,
            shoot_rate: robot::SHOOT_RATE,
            launch_accuracy: robot::LAUNCH_ACCURACY,
            min_shoot_dist: robot::MIN_SHOOT_DIST,
            max_shoot_dist: robot::MAX_SHOOT_DIST,
            auto_shoot_max_speed: robot::AUTO_SHOOT_MAX_SPEED,
            auto_shoot_accel: robot::AUTO_SHOOT_ACCEL,
            intake_success_rate: robot::INTAKE_SUCCESS_RATE,
            intake_transition_time: robot::INTAKE_TRANSITION_TIME,
            auto_shoot_enabled: true,
            auto_pass_enabled: false,
            can_pass: false,
            is_ai: true,
            ai_tick_rate: crate::game::constants::ai::TICK_RATE,
        }
    }
}

/// Seat count per alliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    #[serde(rename = "1v1")]
    OneVsOne,
    #[serde(rename = "3v3")]
    ThreeVsThree,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1v1" => Ok(Self::OneVsOne),
            "3v3" => Ok(Self::ThreeVsThree),
            other => Err(format!("unknown match mode '{}'", other)),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneVsOne => write!(f, "1v1"),
            Self::ThreeVsThree => write!(f, "3v3"),
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub field: FieldConfig,
    pub physics: PhysicsConfig,
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub red: Vec<RobotConfig>,
    pub blue: Vec<RobotConfig>,
    /// Fixed seed; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            physics: PhysicsConfig::default(),
            grid: GridConfig::default(),
            timing: TimingConfig::default(),
            scoring: ScoringConfig::default(),
            red: default_lineup("Red"),
            blue: default_lineup("Blue"),
            seed: None,
        }
    }
}

/// Swerve scorer, tank hauler, and a swerve passer
fn default_lineup(prefix: &str) -> Vec<RobotConfig> {
    vec![
        RobotConfig {
            name: format!("{} 1", prefix),
            ..RobotConfig::default()
        },
        RobotConfig {
            name: format!("{} 2", prefix),
            drivetrain: Drivetrain::Tank,
            intake: IntakeKind::Single,
            max_speed: 130.0,
            ai_tick_rate: 20.0,
            ..RobotConfig::default()
        },
        RobotConfig {
            name: format!("{} 3", prefix),
            can_pass: true,
            capacity: 30,
            launch_accuracy: 0.85,
            ai_tick_rate: 30.0,
            ..RobotConfig::default()
        },
    ]
}

impl SimConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Keep only the first seat per alliance for 1v1
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        if mode == MatchMode::OneVsOne {
            self.red.truncate(1);
            self.blue.truncate(1);
        }
        self
    }

    pub fn grid_cell_size(&self) -> (f32, f32) {
        (
            self.field.width / self.grid.columns.max(1) as f32,
            self.field.length / self.grid.rows.max(1) as f32,
        )
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.field;
        if !(f.width > 0.0 && f.length > 0.0) {
            return Err(ConfigError::FieldSize {
                width: f.width,
                length: f.length,
            });
        }
        if !(f.divider_x > 0.0 && f.divider_x * 2.0 < f.width) {
            return Err(ConfigError::Divider {
                divider_x: f.divider_x,
                width: f.width,
            });
        }
        unit("friction", self.physics.friction)?;
        unit("bounciness", self.physics.bounciness)?;
        positive("tick_rate", self.timing.tick_rate)?;

        for (alliance, seats) in [("red", &self.red), ("blue", &self.blue)] {
            if seats.is_empty() || seats.len() > 3 {
                return Err(ConfigError::SeatCount {
                    alliance,
                    count: seats.len(),
                });
            }
            for seat in seats {
                seat.validate()?;
            }
        }

        if self.grid.columns == 0 || self.grid.rows == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        // A 3x3 neighborhood only covers the collection range if cells are at least that big
        let range = self
            .red
            .iter()
            .chain(self.blue.iter())
            .map(RobotConfig::collection_range)
            .fold(0.0, f32::max);
        let (cell_width, cell_length) = self.grid_cell_size();
        if cell_width < range || cell_length < range {
            return Err(ConfigError::GridTooFine {
                cell_width,
                cell_length,
                range,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

/// Batch runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Number of matches to simulate
    pub runs: usize,
    pub mode: MatchMode,
    /// Base seed; match `i` uses `seed + i`
    pub seed: Option<u64>,
    /// Log phase transitions for every match
    pub verbose: bool,
    /// Optional JSON file overriding `SimConfig` defaults
    pub config_path: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runs: 1,
            mode: MatchMode::ThreeVsThree,
            seed: None,
            verbose: false,
            config_path: None,
        }
    }
}

impl RunnerConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(runs) = std::env::var("RUNS") {
            match runs.parse::<usize>() {
                Ok(parsed) if parsed > 0 && parsed <= 100_000 => config.runs = parsed,
                Ok(_) => tracing::warn!("RUNS must be 1-100000, using default"),
                Err(_) => tracing::warn!("Invalid RUNS '{}', using default", runs),
            }
        }

        if let Ok(mode) = std::env::var("MATCH_MODE") {
            match mode.parse() {
                Ok(parsed) => config.mode = parsed,
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        if let Ok(seed) = std::env::var("SEED") {
            if let Ok(parsed) = seed.parse::<u64>() {
                config.seed = Some(parsed);
            } else {
                tracing::warn!("Invalid SEED '{}', using random seeds", seed);
            }
        }

        if let Ok(verbose) = std::env::var("VERBOSE") {
            config.verbose = matches!(verbose.as_str(), "1" | "true" | "yes");
        }

        if let Ok(path) = std::env::var("SIM_CONFIG") {
            if !path.is_empty() {
                config.config_path = Some(path);
            }
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::NoRuns);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config.red.len(), 3);
        assert_eq!(config.blue.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_one_vs_one_keeps_first_seat() {
        let config = SimConfig::default().with_mode(MatchMode::OneVsOne);
        assert_eq!(config.red.len(), 1);
        assert_eq!(config.blue.len(), 1);
        assert_eq!(config.red[0].name, "Red 1");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json_str(r#"{"physics": {"friction": 0.9}, "seed": 7}"#)
            .expect("partial config should parse");
        assert_eq!(config.physics.friction, 0.9);
        assert_eq!(config.physics.bounciness, fuel::BOUNCINESS);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.red.len(), 3);
    }

    #[test]
    fn test_json_robot_enums() {
        let json = r#"{"red": [{"drivetrain": "tank", "intake": "single"}],
                       "blue": [{"drivetrain": "swerve"}]}"#;
        let config = SimConfig::from_json_str(json).expect("config should parse");
        assert_eq!(config.red[0].drivetrain, Drivetrain::Tank);
        assert_eq!(config.red[0].intake, IntakeKind::Single);
        assert_eq!(config.blue[0].intake, IntakeKind::Dual);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            SimConfig::from_json_str("{not json"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_bad_field() {
        let mut config = SimConfig::default();
        config.field.width = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::FieldSize { .. })));

        let mut config = SimConfig::default();
        config.field.divider_x = config.field.width;
        assert!(matches!(config.validate(), Err(ConfigError::Divider { .. })));
    }

    #[test]
    fn test_rejects_seat_counts() {
        let mut config = SimConfig::default();
        config.blue.clear();
        assert_eq!(
            config.validate(),
            Err(ConfigError::SeatCount {
                alliance: "blue",
                count: 0
            })
        );

        let mut config = SimConfig::default();
        config.red.push(RobotConfig::default());
        assert!(matches!(config.validate(), Err(ConfigError::SeatCount { .. })));
    }

    #[test]
    fn test_rejects_probabilities() {
        let mut config = SimConfig::default();
        config.red[0].launch_accuracy = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange {
                name: "launch_accuracy",
                ..
            })
        ));

        let mut config = SimConfig::default();
        config.physics.bounciness = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_grid_finer_than_collection_range() {
        let mut config = SimConfig::default();
        config.grid.rows = 40;
        assert!(matches!(config.validate(), Err(ConfigError::GridTooFine { .. })));

        config.grid.rows = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid));
    }

    #[test]
    fn test_rejects_empty_shoot_range() {
        let mut config = SimConfig::default();
        config.blue[0].min_shoot_dist = 200.0;
        assert!(matches!(config.validate(), Err(ConfigError::ShootRange { .. })));
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!("1v1".parse::<MatchMode>(), Ok(MatchMode::OneVsOne));
        assert_eq!(" 3V3 ".parse::<MatchMode>(), Ok(MatchMode::ThreeVsThree));
        assert!("2v2".parse::<MatchMode>().is_err());
    }

    #[test]
    fn test_load_or_default() {
        let config = RunnerConfig::load_or_default();
        assert!(config.runs > 0);
        assert!(config.validate().is_ok());
    }
}
