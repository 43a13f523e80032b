/// Fixed-timestep and match timing constants
pub mod timing {
    /// Simulation tick rate in Hz
    pub const TICK_RATE: f32 = 60.0;
    /// Delta time per tick in seconds
    pub const DT: f32 = 1.0 / 60.0;
    /// End of the autonomous period (both alliances score)
    pub const AUTO_END: f32 = 20.0;
    /// End of the transition period; stage ordering is fixed here
    pub const TRANSITION_END: f32 = 30.0;
    /// Length of one exclusive teleop stage
    pub const STAGE_DURATION: f32 = 25.0;
    /// Number of alternating teleop stages
    pub const STAGE_COUNT: usize = 4;
    /// End of the last teleop stage, start of endgame
    pub const TELEOP_END: f32 = TRANSITION_END + STAGE_DURATION * STAGE_COUNT as f32;
    /// Total match length in seconds
    pub const MATCH_DURATION: f32 = 160.0;
}

/// Field geometry (inches)
pub mod field {
    /// Field extent along x (alliance wall to alliance wall)
    pub const WIDTH: f32 = 651.22;
    /// Field extent along y
    pub const LENGTH: f32 = 317.69;
    /// Distance from each alliance wall to its divider line
    pub const DIVIDER_X: f32 = 181.56;
    /// Scoring hub radius
    pub const HUB_RADIUS: f32 = 18.0;
    /// Divider segment occupied by the hub support structure (centered)
    pub const HUB_SEGMENT: f32 = 47.0;
    /// Bump segment on each side of the hub structure
    pub const BUMP_SEGMENT: f32 = 73.0;
    /// Upright post segment beyond each bump
    pub const UPRIGHT_SEGMENT: f32 = 12.0;
    /// Thickness of divider posts and hub structure
    pub const POST_THICKNESS: f32 = 5.0;
    /// Thickness of the perimeter wall colliders (outside the field)
    pub const WALL_THICKNESS: f32 = 10.0;
    /// Half-width of the bump strip around each divider line
    pub const BUMP_HALF_WIDTH: f32 = 10.0;
    /// Translation multiplier while on a bump
    pub const BUMP_SPEED_FACTOR: f32 = 0.4;

    // ========================================================================
    // Initial fuel layout
    // ========================================================================

    /// Depot box offset from the alliance wall
    pub const DEPOT_WALL_OFFSET: f32 = 15.5;
    /// Depot box size
    pub const DEPOT_WIDTH: f32 = 27.0;
    pub const DEPOT_HEIGHT: f32 = 42.0;
    /// Depot center sits this far toward y = 0 from mid-field
    pub const DEPOT_CENTER_OFFSET: f32 = 76.0;
    /// Depot grid (columns x rows)
    pub const DEPOT_COLUMNS: usize = 4;
    pub const DEPOT_ROWS: usize = 6;
    /// Neutral-zone scatter box size
    pub const SCATTER_WIDTH: f32 = 72.0;
    pub const SCATTER_HEIGHT: f32 = 182.0;
    /// Neutral-zone scatter grid (columns x rows)
    pub const SCATTER_COLUMNS: usize = 10;
    pub const SCATTER_ROWS: usize = 15;

    /// Outpost corner inset from both walls
    pub const OUTPOST_INSET: f32 = 10.0;
}

/// Fuel physics and spawn constants
pub mod fuel {
    /// Fuel radius (inches)
    pub const RADIUS: f32 = 2.95;
    /// Per-tick velocity retention
    pub const FRICTION: f32 = 0.97;
    /// Coefficient of restitution on wall contact
    pub const BOUNCINESS: f32 = 0.8;
    /// Fuel centers are kept this far inside the field edge
    pub const BOUNDARY_INSET: f32 = 5.0;
    /// A fuel integrates only while some axis exceeds this speed (in/s)
    pub const MOVING_THRESHOLD: f32 = 0.1;
    /// Velocity components below this after friction snap to zero (in/s)
    pub const SNAP_THRESHOLD: f32 = 2.0;

    /// Recycled fuel: immunity, flight time, spread (rad) and speed range
    pub const RECYCLE_IMMUNITY: f32 = 0.3;
    pub const RECYCLE_AIRBORNE: f32 = 0.6;
    pub const RECYCLE_SPREAD: f32 = 0.6;
    pub const RECYCLE_SPEED_MIN: f32 = 80.0;
    pub const RECYCLE_SPEED_MAX: f32 = 120.0;

    /// Pass spawn distance ahead of the passer
    pub const PASS_SPAWN_OFFSET: f32 = 20.0;
    pub const PASS_IMMUNITY: f32 = 0.5;
    pub const PASS_AIRBORNE: f32 = 0.8;
    /// Rendezvous point distance from the passer's own alliance wall
    pub const PASS_TARGET_WALL_OFFSET: f32 = 60.0;
    /// Lateral half-corridor around the hub that counts as obstructed
    pub const PASS_BLOCK_CORRIDOR: f32 = 60.0;
    /// Lob velocity multiplier over an obstruction
    pub const LOB_MULTIPLIER: f32 = 1.4;
    /// Lob scatter applied to each offset axis (+/- inches)
    pub const LOB_SCATTER: f32 = 40.0;

    /// Outpost release after this much match time
    pub const OUTPOST_RELEASE_TIME: f32 = 30.0;
    /// Fuel released per outpost
    pub const OUTPOST_COUNT: usize = 24;
    pub const OUTPOST_IMMUNITY: f32 = 0.5;
    pub const OUTPOST_AIRBORNE: f32 = 0.4;
    pub const OUTPOST_SPEED_MIN: f32 = 70.0;
    pub const OUTPOST_SPEED_MAX: f32 = 110.0;
    /// Red outpost launch angles (rad, y mirrored)
    pub const RED_OUTPOST_ANGLES: (f32, f32) = (0.1, 1.4);
    /// Blue outpost launch angles (rad, y mirrored)
    pub const BLUE_OUTPOST_ANGLES: (f32, f32) = (3.2, 4.6);

    /// Dumped fuel: immunity, placement jitter and kick speed range
    pub const DUMP_IMMUNITY: f32 = 0.5;
    pub const DUMP_JITTER: f32 = 6.0;
    pub const DUMP_KICK_MIN: f32 = 10.0;
    pub const DUMP_KICK_MAX: f32 = 30.0;
}

/// Intake geometry and impact constants
pub mod collection {
    /// Broad-phase range beyond the robot's half extent
    pub const RANGE_MARGIN: f32 = 5.0;
    /// Lateral slack beyond half the robot width
    pub const MOUTH_SLACK: f32 = 1.0;
    /// Mouth depth inside the bumper edge
    pub const MOUTH_DEPTH_INSIDE: f32 = 8.0;
    /// Mouth reach beyond the bumper edge
    pub const MOUTH_DEPTH_OUTSIDE: f32 = 5.0;
    /// Contact distance beyond the robot's smaller half extent
    pub const KICK_MARGIN: f32 = 4.0;
    /// Base kick speed before bounciness scaling
    pub const KICK_BASE_SPEED: f32 = 50.0;
    /// Share of robot speed transferred on a kick
    pub const KICK_SPEED_SHARE: f32 = 0.8;
    /// Extra separation applied when pushing a fuel out of a robot
    pub const PUSH_SLACK: f32 = 1.0;
    /// Seconds the penalty indicator stays lit after a hot catch
    pub const PENALTY_FLASH: f32 = 1.0;
}

/// Robot defaults and kinematic thresholds
pub mod robot {
    /// Frame size (inches)
    pub const LENGTH: f32 = 27.0;
    pub const WIDTH: f32 = 27.0;
    pub const MAX_SPEED: f32 = 150.0;
    pub const ACCELERATION: f32 = 250.0;
    /// Degrees per second at full rotate command
    pub const ROTATION_SPEED: f32 = 270.0;
    pub const CAPACITY: u32 = 40;
    /// Fuel loaded before the match starts
    pub const PRELOAD: u32 = 8;
    /// Speed profile while stationary-scoring
    pub const AUTO_SHOOT_MAX_SPEED: f32 = 60.0;
    pub const AUTO_SHOOT_ACCEL: f32 = 100.0;
    /// Shots per second
    pub const SHOOT_RATE: f32 = 5.0;
    pub const LAUNCH_ACCURACY: f32 = 0.95;
    pub const MIN_SHOOT_DIST: f32 = 0.0;
    pub const MAX_SHOOT_DIST: f32 = 160.0;
    pub const INTAKE_SUCCESS_RATE: f32 = 1.0;
    /// Seconds an intake is disabled after switching sides
    pub const INTAKE_TRANSITION_TIME: f32 = 0.5;
    /// Drive-axis speed that flips a dual intake's deploy side (in/s)
    pub const DEPLOY_SWITCH_SPEED: f32 = 10.0;
    /// Cooldown tolerance so tick-quantized timestamps land on the rate
    pub const COOLDOWN_EPSILON: f32 = 1e-4;
    /// Hub exclusion disc is shrunk by this much
    pub const HUB_CLEARANCE_SLACK: f32 = 1.0;
    /// Starting x distance from the alliance wall
    pub const START_WALL_OFFSET: f32 = 100.0;
}

/// Robot controller constants
pub mod ai {
    /// Default decisions per second
    pub const TICK_RATE: f32 = 60.0;
    /// Minimum expected travel speed before a robot counts as stuck (in/s).
    /// Equals 0.2 in per 60 Hz tick.
    pub const STUCK_SPEED: f32 = 12.0;
    /// Continuous stuck time that triggers recovery
    pub const STUCK_TIMEOUT: f32 = 1.2;
    /// Reverse-and-turn recovery window
    pub const RECOVERY_DURATION: f32 = 0.8;
    /// Partially loaded robots ferry/pass above this share of capacity
    pub const FULL_FRACTION: f32 = 0.8;
    /// Fuel this close to a teammate is probably theirs
    pub const TEAMMATE_CLAIM_RADIUS: f32 = 20.0;
    /// Chance of skipping a fuel claimed by a teammate
    pub const TEAMMATE_SKIP_CHANCE: f32 = 0.7;
    /// Stop this far from the hub while scoring
    pub const SCORE_STANDOFF: f32 = 120.0;
    /// Ferry drop spot distance from the alliance wall
    pub const FERRY_WALL_OFFSET: f32 = 80.0;
    /// Dump once this close to the ferry spot
    pub const DUMP_RADIUS: f32 = 20.0;
    /// Hub avoidance kicks in inside this radius
    pub const HUB_DANGER_RADIUS: f32 = 95.0;
    /// A targeted fuel this close to a hub keeps the intake enabled
    pub const SAFE_BALL_RADIUS: f32 = 40.0;
    /// Lateral offset used to route around a hub
    pub const SKIRT_OFFSET: f32 = 75.0;
    /// Heading error below which no rotation is commanded (degrees)
    pub const HEADING_DEADBAND: f32 = 5.0;
    /// Tank drives forward only inside this heading error (degrees)
    pub const TANK_DRIVE_TOLERANCE: f32 = 30.0;
    /// Target reached inside this distance
    pub const ARRIVE_RADIUS: f32 = 5.0;
}

/// Spatial grid defaults
pub mod grid {
    pub const COLUMNS: usize = 6;
    pub const ROWS: usize = 3;
}

/// Scoring values
pub mod scoring {
    /// Points per fuel landed in an active hub
    pub const POINTS_PER_HIT: u32 = 1;
    /// Points credited to the opponent for catching a fuel before it bounced
    pub const HOT_CATCH_PENALTY: u32 = 15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teleop_block_fills_phase_table() {
        assert_eq!(timing::TELEOP_END, 130.0);
        assert!(timing::TELEOP_END < timing::MATCH_DURATION);
    }

    #[test]
    fn test_stuck_speed_matches_per_tick_threshold() {
        let per_tick = ai::STUCK_SPEED * timing::DT;
        assert!((per_tick - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_divider_leaves_neutral_zone() {
        assert!(field::DIVIDER_X * 2.0 < field::WIDTH);
    }
}
