use serde::{Deserialize, Serialize};

use crate::game::constants::fuel::RADIUS;
use crate::util::vec2::Vec2;

/// Where a fuel instance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelSource {
    Depot,
    Scatter,
    Recycled,
    Pass,
    Dump,
    Outpost,
}

impl FuelSource {
    /// Sources that enter play in flight and start hot
    pub fn is_airborne(self) -> bool {
        matches!(self, Self::Recycled | Self::Pass | Self::Outpost)
    }
}

/// A single game piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fuel {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub collected: bool,
    /// Ground/wall contacts; only ever increases
    bounces: u32,
    /// Seconds until the fuel may be collected
    pub immune_timer: f32,
    /// Seconds until an in-flight fuel is forced to touch down
    pub airborne_timer: f32,
    pub source: FuelSource,
}

impl Fuel {
    /// Fuel resting on (or rolling along) the carpet
    pub fn grounded(position: Vec2, source: FuelSource) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius: RADIUS,
            collected: false,
            bounces: 1,
            immune_timer: 0.0,
            airborne_timer: 0.0,
            source,
        }
    }

    /// Fuel launched into the air; hot until it lands
    pub fn airborne(position: Vec2, velocity: Vec2, source: FuelSource, flight_time: f32) -> Self {
        Self {
            position,
            velocity,
            radius: RADIUS,
            collected: false,
            bounces: 0,
            immune_timer: 0.0,
            airborne_timer: flight_time.max(0.0),
            source,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_immunity(mut self, seconds: f32) -> Self {
        self.immune_timer = seconds.max(0.0);
        self
    }

    #[inline]
    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    /// Never touched the ground; catching it is a foul
    #[inline]
    pub fn is_hot(&self) -> bool {
        self.bounces == 0
    }

    #[inline]
    pub fn is_immune(&self) -> bool {
        self.immune_timer > 0.0
    }

    /// Live fuel a robot may interact with this tick
    #[inline]
    pub fn is_collectible(&self) -> bool {
        !self.collected && !self.is_immune()
    }

    pub fn register_bounce(&mut self) {
        self.bounces = self.bounces.saturating_add(1);
    }

    /// Count down immunity and flight; landing ends the hot state
    pub fn tick_timers(&mut self, dt: f32) {
        self.immune_timer = (self.immune_timer - dt).max(0.0);
        if self.airborne_timer > 0.0 {
            self.airborne_timer = (self.airborne_timer - dt).max(0.0);
            if self.airborne_timer == 0.0 && self.bounces == 0 {
                self.bounces = 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_origin_sets_bounces() {
        let ground = Fuel::grounded(Vec2::new(10.0, 10.0), FuelSource::Depot);
        assert_eq!(ground.bounces(), 1);
        assert!(!ground.is_hot());

        let air = Fuel::airborne(Vec2::ZERO, Vec2::new(80.0, 0.0), FuelSource::Recycled, 0.6);
        assert_eq!(air.bounces(), 0);
        assert!(air.is_hot());
        assert!(FuelSource::Recycled.is_airborne());
        assert!(!FuelSource::Dump.is_airborne());
    }

    #[test]
    fn test_landing_clears_hot_state() {
        let mut fuel = Fuel::airborne(Vec2::ZERO, Vec2::ZERO, FuelSource::Pass, 0.05);
        fuel.tick_timers(0.03);
        assert!(fuel.is_hot());
        fuel.tick_timers(0.03);
        assert!(!fuel.is_hot());
        assert_eq!(fuel.airborne_timer, 0.0);
    }

    #[test]
    fn test_landing_does_not_add_to_wall_bounces() {
        let mut fuel = Fuel::airborne(Vec2::ZERO, Vec2::ZERO, FuelSource::Outpost, 0.1);
        fuel.register_bounce();
        fuel.register_bounce();
        fuel.tick_timers(0.2);
        assert_eq!(fuel.bounces(), 2);
    }

    #[test]
    fn test_immunity_clamps_at_zero() {
        let mut fuel = Fuel::grounded(Vec2::ZERO, FuelSource::Dump).with_immunity(0.02);
        assert!(fuel.is_immune());
        assert!(!fuel.is_collectible());
        fuel.tick_timers(1.0);
        assert_eq!(fuel.immune_timer, 0.0);
        assert!(fuel.is_collectible());
    }
}
