//! Scripted robot controller
//!
//! A finite-state behavior (gather, score, pass, ferry-and-dump) with a
//! hub-avoidance overlay, point-and-drive steering and stuck recovery.
//! Controllers decide at their own rate; between decisions the last intent
//! is re-applied.

use crate::game::constants::ai::*;
use crate::game::field::{Alliance, Field};
use crate::game::fuel::Fuel;
use crate::game::intent::RobotIntent;
use crate::game::robot::{Drivetrain, Robot, RobotBody};
use crate::util::rng::SimRng;
use crate::util::vec2::Vec2;

/// Controller behavior mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    /// Collect the nearest safe fuel
    Gather,
    /// Hold a standoff from the own hub and let auto-shoot fire
    Score,
    /// Wait at mid-field and feed the own alliance zone
    Pass,
    /// Carry a load home and dump it
    FerryDump,
}

/// What a controller may look at when deciding
#[derive(Debug, Clone, Copy)]
pub struct AiView<'a> {
    pub robot: &'a Robot,
    pub field: &'a Field,
    pub fuels: &'a [Fuel],
    /// Start-of-tick snapshot of every robot, including this one
    pub bodies: &'a [RobotBody],
    pub can_score: bool,
}

/// Where a behavior wants to go and face
#[derive(Debug, Clone, Copy)]
struct Plan {
    target: Vec2,
    heading: f32,
    /// Index of the fuel being chased, if any
    fuel: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RobotController {
    state: AiState,
    last_position: Option<Vec2>,
    stuck_timer: f32,
    recovery_timer: f32,
    /// Rotate command used while recovering (+1 or -1)
    recovery_turn: f32,
    decision_timer: f32,
    interval: f32,
    /// Time accumulated since the last decision
    since_last: f32,
    last_intent: RobotIntent,
}

impl RobotController {
    /// `tick_rate` decisions per second; the first scheduled decision is
    /// offset randomly so controllers on one field do not run in lockstep
    pub fn new(tick_rate: f32, rng: &mut SimRng) -> Self {
        let interval = 1.0 / tick_rate.max(f32::EPSILON);
        Self {
            state: AiState::Gather,
            last_position: None,
            stuck_timer: 0.0,
            recovery_timer: 0.0,
            recovery_turn: 1.0,
            decision_timer: rng.range(0.0, interval),
            interval,
            since_last: 0.0,
            last_intent: RobotIntent::IDLE,
        }
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn stuck_timer(&self) -> f32 {
        self.stuck_timer
    }

    pub fn is_recovering(&self) -> bool {
        self.recovery_timer > 0.0
    }

    /// Intent for this physics tick
    pub fn tick(&mut self, view: &AiView, dt: f32, rng: &mut SimRng) -> RobotIntent {
        self.since_last += dt;
        self.decision_timer -= dt;

        let first = self.last_position.is_none();
        if !first && self.decision_timer > 0.0 {
            return self.last_intent;
        }
        if self.decision_timer <= 0.0 {
            self.decision_timer += self.interval;
            if self.decision_timer <= 0.0 {
                self.decision_timer = self.interval;
            }
        }

        let elapsed = std::mem::take(&mut self.since_last);
        let intent = self.decide(view, elapsed, rng);
        self.last_intent = intent;
        intent
    }

    /// Run one full decision covering `elapsed` seconds since the previous one
    pub fn decide(&mut self, view: &AiView, elapsed: f32, rng: &mut SimRng) -> RobotIntent {
        let robot = view.robot;

        let next = decide_state(robot, view.can_score);
        if next != self.state {
            tracing::debug!(seat = robot.seat(), from = ?self.state, to = ?next, "AI state change");
            self.state = next;
        }

        if self.update_stuck(robot.position, elapsed, rng) {
            return RobotIntent {
                drive: -1.0,
                rotate: self.recovery_turn,
                ..RobotIntent::IDLE
            };
        }

        let mut intent = RobotIntent::IDLE;
        let plan = match self.state {
            AiState::Gather => execute_gather(view, &mut intent, rng),
            AiState::Score => execute_score(view, &mut intent),
            AiState::Pass => execute_pass(view, &mut intent),
            AiState::FerryDump => execute_ferry(view, &mut intent),
        };

        let plan = avoid_hubs(view, self.state, plan, &mut intent);
        self.steer(robot, plan, &mut intent);
        intent
    }

    /// Track displacement between decisions. Returns true while recovering.
    fn update_stuck(&mut self, position: Vec2, elapsed: f32, rng: &mut SimRng) -> bool {
        let moved = self
            .last_position
            .map_or(f32::INFINITY, |last| last.distance_to(position));
        self.last_position = Some(position);

        if self.recovery_timer > 0.0 {
            self.recovery_timer = (self.recovery_timer - elapsed).max(0.0);
        } else {
            if moved < STUCK_SPEED * elapsed {
                self.stuck_timer += elapsed;
            } else {
                self.stuck_timer = 0.0;
            }

            if self.stuck_timer > STUCK_TIMEOUT {
                self.recovery_timer = RECOVERY_DURATION;
                self.stuck_timer = 0.0;
                self.recovery_turn = rng.sign();
                tracing::debug!(turn = self.recovery_turn, "AI stuck, recovering");
            }
        }

        self.recovery_timer > 0.0
    }

    /// Bang-bang rotation plus drivetrain-specific translation toward the plan
    fn steer(&mut self, robot: &Robot, plan: Plan, intent: &mut RobotIntent) {
        let error = wrap_degrees(plan.heading - robot.heading);
        if error.abs() > HEADING_DEADBAND {
            intent.rotate = error.signum();
        }

        let (direction, distance) = (plan.target - robot.position).normalize_with_length();
        if distance > ARRIVE_RADIUS {
            match robot.drivetrain() {
                Drivetrain::Swerve => {
                    let local = direction.to_local(robot.heading);
                    intent.drive = local.x.clamp(-1.0, 1.0);
                    intent.strafe = local.y.clamp(-1.0, 1.0);
                }
                Drivetrain::Tank => {
                    if error.abs() < TANK_DRIVE_TOLERANCE {
                        intent.drive = 1.0;
                    }
                }
            }
        } else {
            // Arrived; standing still is not being stuck
            self.stuck_timer = 0.0;
        }
    }
}

/// Pick the behavior for this decision. An emptied ferry falls back to
/// gathering on its own.
pub fn decide_state(robot: &Robot, can_score: bool) -> AiState {
    let holding = robot.holding();
    let capacity = robot.capacity();
    let can_pass = robot.config().can_pass;
    let haul = if can_pass { AiState::Pass } else { AiState::FerryDump };

    if holding >= capacity {
        if can_score {
            AiState::Score
        } else {
            haul
        }
    } else if holding == 0 {
        AiState::Gather
    } else if can_score {
        AiState::Score
    } else if holding as f32 > FULL_FRACTION * capacity as f32 {
        haul
    } else {
        AiState::Gather
    }
}

/// Wrap an angle difference into `[-180, 180)`
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

fn hold_position(robot: &Robot) -> Plan {
    Plan {
        target: robot.position,
        heading: robot.heading,
        fuel: None,
    }
}

fn execute_gather(view: &AiView, intent: &mut RobotIntent, rng: &mut SimRng) -> Plan {
    let robot = view.robot;
    intent.auto_shoot = Some(false);
    intent.auto_pass = Some(false);

    match select_fuel(view, rng) {
        Some(index) => {
            let target = view.fuels[index].position;
            Plan {
                target,
                heading: (target - robot.position).heading_deg(),
                fuel: Some(index),
            }
        }
        None => hold_position(robot),
    }
}

/// Nearest safe fuel: own zone first when scoring is allowed, then neutral
/// or own zone. Fuel near a teammate is usually left to them.
fn select_fuel(view: &AiView, rng: &mut SimRng) -> Option<usize> {
    let robot = view.robot;
    let field = view.field;
    let alliance = robot.alliance();
    let own_zone = |fuel: &Fuel| field.in_alliance_zone(alliance, fuel.position.x);

    if view.can_score {
        if let Some(index) = nearest_fuel(view, rng, &own_zone) {
            return Some(index);
        }
    }
    nearest_fuel(view, rng, |fuel| {
        own_zone(fuel) || field.in_neutral_zone(fuel.position.x)
    })
}

fn nearest_fuel(view: &AiView, rng: &mut SimRng, eligible: impl Fn(&Fuel) -> bool) -> Option<usize> {
    let robot = view.robot;
    let mut best: Option<(usize, f32)> = None;

    for (index, fuel) in view.fuels.iter().enumerate() {
        if !fuel.is_collectible() {
            continue;
        }
        if claimed_by_teammate(view, fuel) && rng.chance(TEAMMATE_SKIP_CHANCE) {
            continue;
        }
        // Unbounced fuel is a foul to catch
        if fuel.is_hot() || !eligible(fuel) {
            continue;
        }
        let dist = robot.position.distance_sq_to(fuel.position);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((index, dist));
        }
    }
    best.map(|(index, _)| index)
}

fn claimed_by_teammate(view: &AiView, fuel: &Fuel) -> bool {
    let robot = view.robot;
    view.bodies.iter().any(|body| {
        body.seat != robot.seat()
            && body.alliance == robot.alliance()
            && body.position.distance_to(fuel.position) < TEAMMATE_CLAIM_RADIUS
    })
}

fn execute_score(view: &AiView, intent: &mut RobotIntent) -> Plan {
    let robot = view.robot;
    let hub = view.field.hub(robot.alliance()).center;
    let heading = (hub - robot.position).heading_deg();
    let target = if robot.position.distance_to(hub) < SCORE_STANDOFF {
        robot.position
    } else {
        hub
    };

    if robot.in_shoot_range(view.field) {
        intent.auto_shoot = Some(true);
    }
    intent.auto_pass = Some(false);

    Plan {
        target,
        heading,
        fuel: None,
    }
}

fn execute_pass(view: &AiView, intent: &mut RobotIntent) -> Plan {
    let robot = view.robot;
    intent.auto_pass = Some(true);
    intent.auto_shoot = Some(false);

    // Back to the own alliance wall, facing downfield
    let heading = match robot.alliance() {
        Alliance::Red => 0.0,
        Alliance::Blue => 180.0,
    };
    Plan {
        target: view.field.center(),
        heading,
        fuel: None,
    }
}

fn execute_ferry(view: &AiView, intent: &mut RobotIntent) -> Plan {
    let robot = view.robot;
    let field = view.field;
    let alliance = robot.alliance();
    let target = Vec2::new(field.from_wall(alliance, FERRY_WALL_OFFSET), field.length() / 2.0);

    if field.in_alliance_zone(alliance, robot.position.x) {
        intent.disable_intake = true;
        if robot.position.distance_to(target) < DUMP_RADIUS {
            intent.dump = true;
        }
    }

    Plan {
        target,
        heading: (target - robot.position).heading_deg(),
        fuel: None,
    }
}

/// Near a hub: retract the intake unless chasing a safe fuel right next to
/// it, and route around the hub when the target lies beyond it
fn avoid_hubs(view: &AiView, state: AiState, mut plan: Plan, intent: &mut RobotIntent) -> Plan {
    let robot = view.robot;
    for hub in view.field.hubs() {
        let hub_dist = robot.position.distance_to(hub.center);
        if hub_dist >= HUB_DANGER_RADIUS {
            continue;
        }

        let safe_ball = state == AiState::Gather
            && plan.fuel.map_or(false, |index| {
                let fuel = &view.fuels[index];
                fuel.position.distance_to(hub.center) < SAFE_BALL_RADIUS && !fuel.is_hot()
            });
        if !safe_ball {
            intent.disable_intake = true;
        }

        if plan.target.distance_to(hub.center) > hub_dist {
            plan.target.y = if robot.position.y < hub.center.y {
                hub.center.y - SKIRT_OFFSET
            } else {
                hub.center.y + SKIRT_OFFSET
            };
            plan.heading = (plan.target - robot.position).heading_deg();
        }
    }
    plan
}
