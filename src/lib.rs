//! Fuel Match Simulation Library
//!
//! Headless fixed-timestep simulation of a two-alliance robot match:
//! fuel physics on a walled field, robot kinematics with intake and
//! launcher, a scripted robot controller and the phased match clock.
//!
//! The entry point is [`game::state::Simulation`]; the `fuel-sim` binary
//! runs batches of matches in parallel.

pub mod config;
pub mod game;
pub mod util;
