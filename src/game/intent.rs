//! Per-tick robot commands
//!
//! Every driver (built-in controller, external agent, human input) speaks
//! `RobotIntent`. Commands from outside the crate are validated and
//! sanitized before they reach kinematics or collision math.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Threshold above which an action-vector entry counts as pressed
pub const ACTION_PRESS_THRESHOLD: f32 = 0.5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntentViolation {
    #[error("NaN or Infinity in {0} command")]
    NonFinite(&'static str),
    #[error("{axis} command {value} outside [-1, 1]")]
    OutOfRange { axis: &'static str, value: f32 },
}

/// Normalized drive command plus action flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotIntent {
    /// Lateral translation, positive toward heading + 90°
    pub strafe: f32,
    /// Forward translation along the heading
    pub drive: f32,
    /// Rotation, positive increases heading
    pub rotate: f32,
    /// Set the auto-shoot mode; `None` leaves it unchanged
    pub auto_shoot: Option<bool>,
    /// Set the auto-pass mode; `None` leaves it unchanged
    pub auto_pass: Option<bool>,
    /// Empty the hopper this tick
    pub dump: bool,
    /// Keep the intake retracted this tick
    pub disable_intake: bool,
}

impl RobotIntent {
    pub const IDLE: RobotIntent = RobotIntent {
        strafe: 0.0,
        drive: 0.0,
        rotate: 0.0,
        auto_shoot: None,
        auto_pass: None,
        dump: false,
        disable_intake: false,
    };

    /// Map a learning agent's `[strafe, drive, rotate, shoot, pass, dump]` action
    pub fn from_action(action: [f32; 6]) -> Self {
        let pressed = |v: f32| v > ACTION_PRESS_THRESHOLD;
        Self {
            strafe: action[0],
            drive: action[1],
            rotate: action[2],
            auto_shoot: Some(pressed(action[3])),
            auto_pass: Some(pressed(action[4])),
            dump: pressed(action[5]),
            disable_intake: false,
        }
    }

    fn axes(&self) -> [(&'static str, f32); 3] {
        [
            ("strafe", self.strafe),
            ("drive", self.drive),
            ("rotate", self.rotate),
        ]
    }

    /// First problem found in the analog commands
    pub fn validate(&self) -> Result<(), IntentViolation> {
        for (axis, value) in self.axes() {
            if !value.is_finite() {
                return Err(IntentViolation::NonFinite(axis));
            }
            if !(-1.0..=1.0).contains(&value) {
                return Err(IntentViolation::OutOfRange { axis, value });
            }
        }
        Ok(())
    }

    /// Zero any non-finite or out-of-range analog command
    pub fn sanitize(self) -> Self {
        let violation = match self.validate() {
            Ok(()) => return self,
            Err(violation) => violation,
        };
        tracing::trace!(%violation, "sanitizing robot intent");

        let clean = |v: f32| if (-1.0..=1.0).contains(&v) { v } else { 0.0 };
        Self {
            strafe: clean(self.strafe),
            drive: clean(self.drive),
            rotate: clean(self.rotate),
            ..self
        }
    }
}
