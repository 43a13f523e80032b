use crate::config::PhysicsConfig;
use crate::game::constants::fuel::{BOUNDARY_INSET, MOVING_THRESHOLD, SNAP_THRESHOLD};
use crate::game::field::Field;
use crate::game::fuel::Fuel;

/// Advance every uncollected fuel by one tick
/// CRITICAL: friction is a per-tick multiplier (v *= friction), NOT per second
/// Runs on the match thread; parallelism lives at the batch level
pub fn update(fuels: &mut [Fuel], physics: &PhysicsConfig, field: &Field, dt: f32) {
    let width = field.width();
    let length = field.length();

    for fuel in fuels.iter_mut() {
        if fuel.collected {
            continue;
        }
        fuel.tick_timers(dt);

        if !is_moving(fuel) {
            continue;
        }

        fuel.position += fuel.velocity * dt;
        fuel.velocity *= physics.friction;
        if fuel.velocity.x.abs() < SNAP_THRESHOLD {
            fuel.velocity.x = 0.0;
        }
        if fuel.velocity.y.abs() < SNAP_THRESHOLD {
            fuel.velocity.y = 0.0;
        }

        contain(fuel, width, length, physics.bounciness);
    }
}

/// Fuel integrates only while some axis exceeds the rest threshold
#[inline]
pub fn is_moving(fuel: &Fuel) -> bool {
    fuel.velocity.x.abs() > MOVING_THRESHOLD || fuel.velocity.y.abs() > MOVING_THRESHOLD
}

/// Keep a fuel inside the inset boundary, reflecting off any wall it reached
/// while heading outward. Each reflected axis counts as a bounce.
pub fn contain(fuel: &mut Fuel, width: f32, length: f32, bounciness: f32) {
    let (min_x, max_x) = (BOUNDARY_INSET, width - BOUNDARY_INSET);
    let (min_y, max_y) = (BOUNDARY_INSET, length - BOUNDARY_INSET);

    if fuel.position.x < min_x || (fuel.position.x == min_x && fuel.velocity.x < 0.0) {
        fuel.position.x = min_x;
        fuel.velocity.x = fuel.velocity.x.abs() * bounciness;
        fuel.register_bounce();
    } else if fuel.position.x > max_x || (fuel.position.x == max_x && fuel.velocity.x > 0.0) {
        fuel.position.x = max_x;
        fuel.velocity.x = -fuel.velocity.x.abs() * bounciness;
        fuel.register_bounce();
    }

    if fuel.position.y < min_y || (fuel.position.y == min_y && fuel.velocity.y < 0.0) {
        fuel.position.y = min_y;
        fuel.velocity.y = fuel.velocity.y.abs() * bounciness;
        fuel.register_bounce();
    } else if fuel.position.y > max_y || (fuel.position.y == max_y && fuel.velocity.y > 0.0) {
        fuel.position.y = max_y;
        fuel.velocity.y = -fuel.velocity.y.abs() * bounciness;
        fuel.register_bounce();
    }
}
