//! Fuel intake and robot impact resolution
//!
//! Called by the piece manager for each fuel that survives the spatial-grid
//! neighborhood query. A fuel inside the robot's active intake mouth is
//! captured when every gate passes; a fuel that ends up in contact with the
//! robot body instead is pushed clear and kicked away.

use crate::game::constants::collection::*;
use crate::game::fuel::Fuel;
use crate::game::robot::{IntakeSide, Robot};
use crate::util::rng::SimRng;
use crate::util::vec2::Vec2;

/// Result of one fuel/robot interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Fuel went into the hopper; `hot` if it had not bounced yet
    Captured { hot: bool },
    /// Fuel hit the robot body and was knocked away
    Kicked,
    None,
}

/// Squared-distance broad phase around the robot center
#[inline]
pub fn in_range(fuel: &Fuel, robot: &Robot) -> bool {
    let range = robot.config().collection_range();
    fuel.position.distance_sq_to(robot.position) < range * range
}

/// Narrow phase: `local` is the fuel offset in the robot frame
pub fn in_intake_mouth(local: Vec2, robot: &Robot) -> bool {
    let half_l = robot.length() / 2.0;
    let half_w = robot.width() / 2.0;
    if local.y.abs() >= half_w + MOUTH_SLACK {
        return false;
    }
    match robot.active_intake_side() {
        IntakeSide::Front => half_l - MOUTH_DEPTH_INSIDE < local.x && local.x < half_l + MOUTH_DEPTH_OUTSIDE,
        IntakeSide::Back => -half_l - MOUTH_DEPTH_OUTSIDE < local.x && local.x < -half_l + MOUTH_DEPTH_INSIDE,
    }
}

/// Resolve one fuel against one robot
pub fn resolve(fuel: &mut Fuel, robot: &mut Robot, bounciness: f32, rng: &mut SimRng) -> Contact {
    if !fuel.is_collectible() || !in_range(fuel, robot) {
        return Contact::None;
    }

    let offset = fuel.position - robot.position;
    let local = offset.to_local(robot.heading);

    if in_intake_mouth(local, robot)
        && robot.intake_ready()
        && rng.chance(robot.config().intake_success_rate)
        && robot.try_collect()
    {
        let hot = fuel.is_hot();
        fuel.collected = true;
        if hot {
            robot.flag_penalty();
        }
        return Contact::Captured { hot };
    }

    let contact = (robot.length() / 2.0).min(robot.width() / 2.0) + KICK_MARGIN;
    let (dir, dist) = offset.normalize_with_length();
    if dist >= contact {
        return Contact::None;
    }

    // Dead-center overlap has no direction; eject along the heading
    let dir = if dist > 0.0 {
        dir
    } else {
        Vec2::from_heading(robot.heading)
    };
    fuel.position += dir * (contact - dist + PUSH_SLACK);
    fuel.velocity = dir * (KICK_BASE_SPEED * bounciness + KICK_SPEED_SHARE * robot.speed());
    fuel.register_bounce();
    Contact::Kicked
}
