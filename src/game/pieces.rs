//! Live fuel set, spawn routines and per-tick collection
//!
//! The manager owns every fuel instance in play. Each tick it advances fuel
//! physics, rebuilds the spatial grid from live fuel, resolves intake and
//! impacts for every robot against its 3x3 grid neighborhood, then spawns
//! queued dumps and drops collected fuel.

use smallvec::SmallVec;
use std::f32::consts::TAU;

use crate::config::{PhysicsConfig, SimConfig};
use crate::game::constants::field::*;
use crate::game::constants::fuel::*;
use crate::game::field::{Alliance, Field};
use crate::game::fuel::{Fuel, FuelSource};
use crate::game::robot::{PassRequest, Robot};
use crate::game::spatial::{FuelGrid, FuelGridStats};
use crate::game::systems::collection::{self, Contact};
use crate::game::systems::physics;
use crate::util::rng::SimRng;
use crate::util::vec2::Vec2;

/// A hot catch: the offender's opponents are credited `points`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyEvent {
    pub seat: usize,
    pub offender: Alliance,
    pub beneficiary: Alliance,
    pub points: u32,
}

#[derive(Debug, Clone)]
pub struct GamePieceManager {
    fuels: Vec<Fuel>,
    grid: FuelGrid,
    /// Dump origins and counts, spawned at the end of the next update
    pending_dumps: Vec<(Vec2, u32)>,
    /// Cleared at the start of every update
    penalties: SmallVec<[PenaltyEvent; 4]>,
    physics: PhysicsConfig,
    hot_catch_penalty: u32,
    outpost_released: bool,
}

impl GamePieceManager {
    /// Empty manager; call [`spawn_initial`](Self::spawn_initial) for the match layout
    pub fn new(config: &SimConfig) -> Self {
        Self {
            fuels: Vec::with_capacity(256),
            grid: FuelGrid::new(
                config.field.width,
                config.field.length,
                config.grid.columns,
                config.grid.rows,
            ),
            pending_dumps: Vec::new(),
            penalties: SmallVec::new(),
            physics: config.physics.clone(),
            hot_catch_penalty: config.scoring.hot_catch_penalty,
            outpost_released: false,
        }
    }

    /// Both depots plus the neutral-zone scatter block, all resting on the carpet
    pub fn spawn_initial(&mut self, field: &Field) {
        let depot_y = field.length() / 2.0 - DEPOT_CENTER_OFFSET - DEPOT_HEIGHT / 2.0;
        for x in [DEPOT_WALL_OFFSET, field.width() - DEPOT_WALL_OFFSET - DEPOT_WIDTH] {
            self.spawn_block(
                Vec2::new(x, depot_y),
                (DEPOT_WIDTH, DEPOT_HEIGHT),
                (DEPOT_COLUMNS, DEPOT_ROWS),
                FuelSource::Depot,
            );
        }

        let center = field.center();
        self.spawn_block(
            Vec2::new(center.x - SCATTER_WIDTH / 2.0, center.y - SCATTER_HEIGHT / 2.0),
            (SCATTER_WIDTH, SCATTER_HEIGHT),
            (SCATTER_COLUMNS, SCATTER_ROWS),
            FuelSource::Scatter,
        );
    }

    /// Fill a box with a cell-centered grid of fuel
    fn spawn_block(&mut self, origin: Vec2, size: (f32, f32), cells: (usize, usize), source: FuelSource) {
        let (columns, rows) = cells;
        let spacing = Vec2::new(size.0 / columns as f32, size.1 / rows as f32);
        for row in 0..rows {
            for col in 0..columns {
                let position = Vec2::new(
                    origin.x + (col as f32 + 0.5) * spacing.x,
                    origin.y + (row as f32 + 0.5) * spacing.y,
                );
                self.fuels.push(Fuel::grounded(position, source));
            }
        }
    }

    pub fn fuels(&self) -> &[Fuel] {
        &self.fuels
    }

    /// Fuel still on the field
    pub fn live_count(&self) -> usize {
        self.fuels.iter().filter(|f| !f.collected).count()
    }

    pub fn penalties(&self) -> &[PenaltyEvent] {
        &self.penalties
    }

    pub fn outpost_released(&self) -> bool {
        self.outpost_released
    }

    pub fn grid_stats(&self) -> FuelGridStats {
        self.grid.stats()
    }

    pub fn spawn(&mut self, fuel: Fuel) {
        self.fuels.push(fuel);
    }

    /// A scored fuel re-enters play from the hub, heading back toward mid-field
    pub fn recycle(&mut self, field: &Field, alliance: Alliance, rng: &mut SimRng) {
        let hub = field.hub(alliance).center;
        let direction = if hub.x < field.center().x { 1.0 } else { -1.0 };
        let angle = rng.range(-RECYCLE_SPREAD, RECYCLE_SPREAD);
        let speed = rng.range(RECYCLE_SPEED_MIN, RECYCLE_SPEED_MAX) * self.physics.bounciness;
        let velocity = Vec2::new(angle.cos() * speed * direction, angle.sin() * speed);

        self.fuels.push(
            Fuel::airborne(hub, velocity, FuelSource::Recycled, RECYCLE_AIRBORNE)
                .with_immunity(RECYCLE_IMMUNITY),
        );
    }

    /// Launch a pass ahead of the passer; an obstructed lane becomes a scattered lob
    pub fn spawn_pass(&mut self, pass: &PassRequest, rng: &mut SimRng) {
        let offset = pass.target - pass.origin;
        let direction = offset.normalize();
        let origin = pass.origin + direction * PASS_SPAWN_OFFSET;

        let velocity = if pass.blocked {
            let scatter = Vec2::new(
                rng.range(-LOB_SCATTER, LOB_SCATTER),
                rng.range(-LOB_SCATTER, LOB_SCATTER),
            );
            (offset + scatter).normalize() * (pass.speed * LOB_MULTIPLIER)
        } else {
            direction * pass.speed
        };

        self.fuels.push(
            Fuel::airborne(origin, velocity, FuelSource::Pass, PASS_AIRBORNE).with_immunity(PASS_IMMUNITY),
        );
    }

    /// Empty both outposts into the field; only the first call has any effect
    pub fn release_outpost(&mut self, field: &Field, rng: &mut SimRng) {
        if self.outpost_released {
            return;
        }
        self.outpost_released = true;

        let corners = [
            (Vec2::new(OUTPOST_INSET, field.length() - OUTPOST_INSET), RED_OUTPOST_ANGLES),
            (Vec2::new(field.width() - OUTPOST_INSET, OUTPOST_INSET), BLUE_OUTPOST_ANGLES),
        ];
        for (corner, (lo, hi)) in corners {
            for _ in 0..OUTPOST_COUNT {
                let angle = rng.range(lo, hi);
                let speed = rng.range(OUTPOST_SPEED_MIN, OUTPOST_SPEED_MAX) * self.physics.bounciness;
                // Screen-style angles: positive sine points toward y = 0
                let velocity = Vec2::new(angle.cos() * speed, -angle.sin() * speed);
                self.fuels.push(
                    Fuel::airborne(corner, velocity, FuelSource::Outpost, OUTPOST_AIRBORNE)
                        .with_immunity(OUTPOST_IMMUNITY),
                );
            }
        }
        tracing::debug!(count = OUTPOST_COUNT * 2, "Outposts released");
    }

    /// Queue `count` fuel to drop around `origin`
    pub fn queue_dump(&mut self, origin: Vec2, count: u32) {
        if count > 0 {
            self.pending_dumps.push((origin, count));
        }
    }

    fn drain_dumps(&mut self, field: &Field, rng: &mut SimRng) {
        for (origin, count) in std::mem::take(&mut self.pending_dumps) {
            for _ in 0..count {
                let position = origin
                    + Vec2::new(
                        rng.range(-DUMP_JITTER, DUMP_JITTER),
                        rng.range(-DUMP_JITTER, DUMP_JITTER),
                    );
                let angle = rng.range(0.0, TAU);
                let kick = rng.range(DUMP_KICK_MIN, DUMP_KICK_MAX);
                let mut fuel = Fuel::grounded(position, FuelSource::Dump)
                    .with_velocity(Vec2::new(angle.cos(), angle.sin()) * kick)
                    .with_immunity(DUMP_IMMUNITY);
                physics::contain(&mut fuel, field.width(), field.length(), self.physics.bounciness);
                self.fuels.push(fuel);
            }
        }
    }

    /// Advance all fuel one tick and resolve it against every robot.
    /// Returns the penalty events raised this tick.
    pub fn update(
        &mut self,
        field: &Field,
        robots: &mut [Robot],
        elapsed: f32,
        dt: f32,
        rng: &mut SimRng,
    ) -> &[PenaltyEvent] {
        self.penalties.clear();

        if elapsed > OUTPOST_RELEASE_TIME && !self.outpost_released {
            self.release_outpost(field, rng);
        }

        physics::update(&mut self.fuels, &self.physics, field, dt);

        self.grid.rebuild(
            self.fuels
                .iter()
                .enumerate()
                .filter(|(_, f)| !f.collected)
                .map(|(i, f)| (i, f.position)),
        );

        let bounciness = self.physics.bounciness;
        for robot in robots.iter_mut() {
            for index in self.grid.query_neighborhood(robot.position) {
                let fuel = &mut self.fuels[index];
                match collection::resolve(fuel, robot, bounciness, rng) {
                    Contact::Captured { hot: true } => {
                        let offender = robot.alliance();
                        self.penalties.push(PenaltyEvent {
                            seat: robot.seat(),
                            offender,
                            beneficiary: offender.opponent(),
                            points: self.hot_catch_penalty,
                        });
                    }
                    Contact::Kicked => {
                        physics::contain(fuel, field.width(), field.length(), bounciness);
                    }
                    Contact::Captured { hot: false } | Contact::None => {}
                }
            }
        }

        self.drain_dumps(field, rng);
        self.fuels.retain(|f| !f.collected);
        &self.penalties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotConfig;
    use crate::game::constants::timing::DT;

    fn create_test_manager() -> (GamePieceManager, Field) {
        let config = SimConfig::default();
        (GamePieceManager::new(&config), Field::new(&config.field))
    }

    fn create_robot(alliance: Alliance, position: Vec2) -> Robot {
        Robot::new(0, alliance, &RobotConfig::default(), position, 0.0)
    }

    #[test]
    fn test_initial_layout() {
        let (mut manager, field) = create_test_manager();
        manager.spawn_initial(&field);

        let expected = 2 * DEPOT_COLUMNS * DEPOT_ROWS + SCATTER_COLUMNS * SCATTER_ROWS;
        assert_eq!(manager.fuels().len(), expected);
        assert_eq!(manager.live_count(), 198);
        assert!(manager.fuels().iter().all(|f| f.bounces() == 1 && f.velocity == Vec2::ZERO));

        let depots: Vec<&Fuel> = manager
            .fuels()
            .iter()
            .filter(|f| f.source == FuelSource::Depot)
            .collect();
        assert_eq!(depots.iter().filter(|f| f.position.x < DIVIDER_X).count(), 24);
        assert_eq!(depots.iter().filter(|f| f.position.x > field.width() - DIVIDER_X).count(), 24);
        assert!(manager
            .fuels()
            .iter()
            .filter(|f| f.source == FuelSource::Scatter)
            .all(|f| field.in_neutral_zone(f.position.x)));
    }

    #[test]
    fn test_recycle_heads_to_midfield_hot() {
        let (mut manager, field) = create_test_manager();
        let mut rng = SimRng::seeded(1);
        manager.recycle(&field, Alliance::Blue, &mut rng);

        let fuel = &manager.fuels()[0];
        assert_eq!(fuel.position, field.hub(Alliance::Blue).center);
        assert!(fuel.is_hot());
        assert!(fuel.is_immune());
        assert!(fuel.velocity.x < 0.0);
        let speed = fuel.velocity.length();
        assert!(speed >= RECYCLE_SPEED_MIN * BOUNCINESS - 1e-3);
        assert!(speed <= RECYCLE_SPEED_MAX * BOUNCINESS + 1e-3);
    }

    #[test]
    fn test_pass_spawns_ahead_of_passer() {
        let (mut manager, _) = create_test_manager();
        let mut rng = SimRng::seeded(2);
        let pass = PassRequest {
            origin: Vec2::new(300.0, 100.0),
            target: Vec2::new(60.0, 100.0),
            speed: 432.0,
            blocked: false,
        };
        manager.spawn_pass(&pass, &mut rng);

        let fuel = &manager.fuels()[0];
        assert!(fuel.position.approx_eq(Vec2::new(280.0, 100.0), 1e-3));
        assert!(fuel.velocity.approx_eq(Vec2::new(-432.0, 0.0), 1e-2));
        assert_eq!(fuel.source, FuelSource::Pass);
        assert!(fuel.is_hot());
    }

    #[test]
    fn test_blocked_pass_lobs_harder() {
        let (mut manager, _) = create_test_manager();
        let mut rng = SimRng::seeded(3);
        let pass = PassRequest {
            origin: Vec2::new(300.0, 160.0),
            target: Vec2::new(60.0, 160.0),
            speed: 400.0,
            blocked: true,
        };
        manager.spawn_pass(&pass, &mut rng);

        let fuel = &manager.fuels()[0];
        assert!((fuel.velocity.length() - 400.0 * LOB_MULTIPLIER).abs() < 1e-2);
        assert!(fuel.velocity.x < 0.0);
    }

    #[test]
    fn test_outpost_releases_once_after_threshold() {
        let (mut manager, field) = create_test_manager();
        let mut rng = SimRng::seeded(4);

        manager.update(&field, &mut [], OUTPOST_RELEASE_TIME, DT, &mut rng);
        assert!(!manager.outpost_released());
        assert_eq!(manager.fuels().len(), 0);

        manager.update(&field, &mut [], OUTPOST_RELEASE_TIME + DT, DT, &mut rng);
        manager.update(&field, &mut [], OUTPOST_RELEASE_TIME + 2.0 * DT, DT, &mut rng);
        assert!(manager.outpost_released());
        assert_eq!(manager.fuels().len(), OUTPOST_COUNT * 2);
        assert!(manager.fuels().iter().all(|f| f.source == FuelSource::Outpost));
    }

    #[test]
    fn test_dump_conserves_fuel() {
        let (mut manager, field) = create_test_manager();
        let mut rng = SimRng::seeded(5);
        let mut robot = create_robot(Alliance::Red, Vec2::new(80.0, 150.0));
        let dumped = robot.dump();
        manager.queue_dump(robot.position, dumped);
        manager.queue_dump(robot.position, 0);

        manager.update(&field, std::slice::from_mut(&mut robot), 40.0, DT, &mut rng);
        let spawned: Vec<&Fuel> = manager
            .fuels()
            .iter()
            .filter(|f| f.source == FuelSource::Dump)
            .collect();
        assert_eq!(spawned.len() as u32, dumped);
        assert!(spawned.iter().all(|f| f.is_immune() && !f.is_hot()));
        assert_eq!(robot.holding(), 0);
    }

    #[test]
    fn test_hot_catch_credits_opponent() {
        let (mut manager, field) = create_test_manager();
        let mut rng = SimRng::seeded(6);
        let mut robot = create_robot(Alliance::Red, Vec2::new(300.0, 150.0));
        manager.spawn(Fuel::airborne(
            Vec2::new(315.0, 150.0),
            Vec2::ZERO,
            FuelSource::Pass,
            0.5,
        ));

        let penalties = manager
            .update(&field, std::slice::from_mut(&mut robot), 10.0, DT, &mut rng)
            .to_vec();
        assert_eq!(
            penalties,
            vec![PenaltyEvent {
                seat: 0,
                offender: Alliance::Red,
                beneficiary: Alliance::Blue,
                points: 15,
            }]
        );
        assert_eq!(robot.holding(), 9);
        assert!(robot.penalty_flash > 0.0);
        assert_eq!(manager.live_count(), 0);

        // Events do not carry over into the next tick
        manager.update(&field, std::slice::from_mut(&mut robot), 10.0 + DT, DT, &mut rng);
        assert!(manager.penalties().is_empty());
    }

    #[test]
    fn test_ground_catch_is_clean() {
        let (mut manager, field) = create_test_manager();
        let mut rng = SimRng::seeded(7);
        let mut robot = create_robot(Alliance::Blue, Vec2::new(300.0, 150.0));
        manager.spawn(Fuel::grounded(Vec2::new(315.0, 150.0), FuelSource::Scatter));

        let penalties = manager.update(&field, std::slice::from_mut(&mut robot), 10.0, DT, &mut rng);
        assert!(penalties.is_empty());
        assert_eq!(robot.holding(), 9);
    }

    #[test]
    fn test_distant_fuel_untouched() {
        let (mut manager, field) = create_test_manager();
        let mut rng = SimRng::seeded(8);
        let mut robot = create_robot(Alliance::Red, Vec2::new(100.0, 250.0));
        manager.spawn_initial(&field);

        manager.update(&field, std::slice::from_mut(&mut robot), 1.0, DT, &mut rng);
        assert_eq!(manager.live_count(), 198);
        assert_eq!(robot.holding(), 8);
        assert_eq!(manager.grid_stats().total_entries, 198);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: holding never exceeds capacity however much fuel is nearby
            #[test]
            fn prop_holding_within_capacity(
                capacity in 1u32..12,
                preload in 0u32..12,
                seed in any::<u64>(),
                offsets in prop::collection::vec((-20.0f32..20.0, -20.0f32..20.0), 1..60)
            ) {
                let (mut manager, field) = create_test_manager();
                let mut rng = SimRng::seeded(seed);
                let config = RobotConfig { capacity, preload, ..RobotConfig::default() };
                let center = Vec2::new(320.0, 150.0);
                let mut robots = vec![Robot::new(0, Alliance::Red, &config, center, 0.0)];
                for (dx, dy) in offsets {
                    manager.spawn(Fuel::grounded(center + Vec2::new(dx, dy), FuelSource::Scatter));
                }

                for tick in 0..30 {
                    manager.update(&field, &mut robots, 1.0 + tick as f32 * DT, DT, &mut rng);
                    prop_assert!(robots[0].holding() <= robots[0].capacity());
                }
            }

            /// Property: bounce counts never decrease while fuel flies around
            #[test]
            fn prop_bounces_monotonic(
                vx in -400.0f32..400.0,
                vy in -400.0f32..400.0,
                x in 5.0f32..640.0,
                y in 5.0f32..310.0,
                airborne in any::<bool>()
            ) {
                let field = Field::default();
                let physics = PhysicsConfig::default();
                let position = Vec2::new(x, y);
                let fuel = if airborne {
                    Fuel::airborne(position, Vec2::new(vx, vy), FuelSource::Pass, 0.8)
                } else {
                    Fuel::grounded(position, FuelSource::Scatter).with_velocity(Vec2::new(vx, vy))
                };
                let mut fuels = vec![fuel];
                let mut last = fuels[0].bounces();
                for _ in 0..240 {
                    physics::update(&mut fuels, &physics, &field, DT);
                    prop_assert!(fuels[0].bounces() >= last);
                    last = fuels[0].bounces();
                    prop_assert!(fuels[0].position.x >= BOUNDARY_INSET && fuels[0].position.x <= field.width() - BOUNDARY_INSET);
                    prop_assert!(fuels[0].position.y >= BOUNDARY_INSET && fuels[0].position.y <= field.length() - BOUNDARY_INSET);
                }
            }
        }
    }
}
