//! Robot kinematics, collision and scoring actions
//!
//! Velocity is kept in the robot frame (`x` forward along the heading, `y`
//! lateral toward heading + 90°). Movement is resolved one field axis at a
//! time against field colliders, hub discs and the start-of-tick bodies of
//! the other robots, which gives sliding contact instead of dead stops.

use serde::{Deserialize, Serialize};

use crate::config::RobotConfig;
use crate::game::constants::{collection, fuel, robot::*};
use crate::game::field::{Alliance, Field, Rect};
use crate::game::intent::RobotIntent;
use crate::util::rng::SimRng;
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Drivetrain {
    /// Independent forward and lateral translation
    Swerve,
    /// Forward translation only; turning is the only source of lateral motion
    Tank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeKind {
    /// Front and back intakes; whichever side leads is deployed
    Dual,
    /// Front intake only
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeSide {
    Front,
    Back,
}

/// Read-only start-of-tick view of a robot, shared with the others
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotBody {
    pub seat: usize,
    pub alliance: Alliance,
    pub position: Vec2,
    pub length: f32,
    pub width: f32,
}

impl RobotBody {
    /// Collision footprint (unrotated: length along x, width along y)
    pub fn rect(&self) -> Rect {
        Rect::centered(self.position, self.length, self.width)
    }
}

/// Per-robot match statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotStats {
    pub shots: u32,
    pub hits: u32,
    pub passes: u32,
    pub dumped: u32,
    pub collected: u32,
    pub hot_catches: u32,
}

/// Outcome of a fired shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub hit: bool,
}

/// A pass to be spawned by the piece manager
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassRequest {
    pub origin: Vec2,
    pub target: Vec2,
    /// Launch speed before any lob adjustment (in/s)
    pub speed: f32,
    /// A hub structure lies in the lane; lob over it
    pub blocked: bool,
}

/// What a robot did during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RobotOutcome {
    pub shot: Option<Shot>,
    pub pass: Option<PassRequest>,
    /// Fuel handed to the dump queue
    pub dumped: u32,
}

/// Shared inputs for one robot update
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub field: &'a Field,
    /// Match time at the start of this tick
    pub elapsed: f32,
    pub dt: f32,
    /// Robot's alliance may score right now
    pub can_score: bool,
    /// Fuel friction, used to size passes
    pub friction: f32,
}

#[derive(Debug, Clone)]
pub struct Robot {
    pub position: Vec2,
    /// Degrees, unbounded
    pub heading: f32,
    /// Robot-frame velocity (x forward, y lateral)
    pub velocity: Vec2,
    /// Degrees per second
    pub angular_velocity: f32,
    holding: u32,

    pub intake_side: IntakeSide,
    pub intake_transition_timer: f32,
    pub intake_disabled: bool,
    pub auto_shoot: bool,
    pub auto_pass: bool,
    /// Timestamp of the last shot or pass
    last_shot: f32,
    pub penalty_flash: f32,
    pub stats: RobotStats,

    seat: usize,
    alliance: Alliance,
    config: RobotConfig,
}

impl Robot {
    pub fn new(seat: usize, alliance: Alliance, config: &RobotConfig, position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            holding: config.preload.min(config.capacity),
            intake_side: IntakeSide::Front,
            intake_transition_timer: 0.0,
            intake_disabled: false,
            auto_shoot: config.auto_shoot_enabled,
            auto_pass: config.auto_pass_enabled,
            last_shot: f32::NEG_INFINITY,
            penalty_flash: 0.0,
            stats: RobotStats::default(),
            seat,
            alliance,
            config: config.clone(),
        }
    }

    /// Starting pose for seat `index` of `count`: evenly spaced along y,
    /// a fixed distance off the alliance wall, facing the neutral zone
    pub fn starting_pose(field: &Field, alliance: Alliance, index: usize, count: usize) -> (Vec2, f32) {
        let spacing = field.length() / (count + 1) as f32;
        let x = field.from_wall(alliance, START_WALL_OFFSET);
        let heading = match alliance {
            Alliance::Red => 0.0,
            Alliance::Blue => 180.0,
        };
        (Vec2::new(x, spacing * (index + 1) as f32), heading)
    }

    #[inline]
    pub fn holding(&self) -> u32 {
        self.holding
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.config.capacity
    }

    pub fn is_full(&self) -> bool {
        self.holding >= self.config.capacity
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn alliance(&self) -> Alliance {
        self.alliance
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn drivetrain(&self) -> Drivetrain {
        self.config.drivetrain
    }

    pub fn intake_kind(&self) -> IntakeKind {
        self.config.intake
    }

    pub fn length(&self) -> f32 {
        self.config.length
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }

    pub fn body(&self) -> RobotBody {
        RobotBody {
            seat: self.seat,
            alliance: self.alliance,
            position: self.position,
            length: self.config.length,
            width: self.config.width,
        }
    }

    /// Robot-frame speed magnitude
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Robot-frame velocity rotated into field coordinates
    pub fn field_velocity(&self) -> Vec2 {
        match self.config.drivetrain {
            Drivetrain::Swerve => self.velocity.from_local(self.heading),
            Drivetrain::Tank => Vec2::from_heading(self.heading) * self.velocity.x,
        }
    }

    /// Active intake side given the intake kind
    pub fn active_intake_side(&self) -> IntakeSide {
        match self.config.intake {
            IntakeKind::Dual => self.intake_side,
            IntakeKind::Single => IntakeSide::Front,
        }
    }

    /// Intake is deployed, settled, enabled and has room
    pub fn intake_ready(&self) -> bool {
        self.intake_transition_timer <= 0.0 && !self.intake_disabled && !self.is_full()
    }

    /// Take one fuel into the hopper; no-op when full
    pub fn try_collect(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.holding += 1;
        self.stats.collected += 1;
        true
    }

    /// Light the penalty indicator after a hot catch
    pub fn flag_penalty(&mut self) {
        self.penalty_flash = collection::PENALTY_FLASH;
        self.stats.hot_catches += 1;
    }

    pub fn in_shoot_range(&self, field: &Field) -> bool {
        let dist = self.position.distance_to(field.hub(self.alliance).center);
        self.config.min_shoot_dist <= dist && dist <= self.config.max_shoot_dist
    }

    /// Stationary-scoring: auto-shoot on, loaded, permitted and in range
    pub fn is_scoring(&self, ctx: &TickContext) -> bool {
        self.auto_shoot && self.holding > 0 && ctx.can_score && self.in_shoot_range(ctx.field)
    }

    fn cooldown_ready(&self, elapsed: f32) -> bool {
        elapsed - self.last_shot >= 1.0 / self.config.shoot_rate - COOLDOWN_EPSILON
    }

    /// Advance one tick under `intent`
    pub fn update(
        &mut self,
        intent: &RobotIntent,
        ctx: &TickContext,
        others: &[RobotBody],
        rng: &mut SimRng,
    ) -> RobotOutcome {
        let intent = intent.sanitize();
        if let Some(on) = intent.auto_shoot {
            self.auto_shoot = on;
        }
        if let Some(on) = intent.auto_pass {
            self.auto_pass = on;
        }
        self.intake_disabled = intent.disable_intake;
        self.penalty_flash = (self.penalty_flash - ctx.dt).max(0.0);

        let scoring = self.is_scoring(ctx);
        let (max_speed, accel) = if scoring {
            (self.config.auto_shoot_max_speed, self.config.auto_shoot_accel)
        } else {
            (self.config.max_speed, self.config.acceleration)
        };

        let target = match self.config.drivetrain {
            // Any two-axis command drives at the full profile speed
            Drivetrain::Swerve if intent.drive != 0.0 && intent.strafe != 0.0 => {
                Vec2::new(intent.drive, intent.strafe).normalize() * max_speed
            }
            Drivetrain::Swerve => Vec2::new(intent.drive * max_speed, intent.strafe * max_speed),
            Drivetrain::Tank => Vec2::new(intent.drive * max_speed, 0.0),
        };
        let max_step = accel * ctx.dt;
        self.velocity.x = approach(self.velocity.x, target.x, max_step);
        self.velocity.y = approach(self.velocity.y, target.y, max_step);

        self.angular_velocity = intent.rotate * self.config.rotation_speed;
        self.heading += self.angular_velocity * ctx.dt;

        let mut outcome = RobotOutcome::default();
        if scoring {
            outcome.shot = self.launch(ctx, rng);
        }
        if self.auto_pass && self.holding > 0 {
            outcome.pass = self.auto_pass(ctx);
        }
        if intent.dump {
            outcome.dumped = self.dump();
        }

        self.translate(ctx.field, others, ctx.dt);
        self.update_intake_side(ctx.dt);
        outcome
    }

    /// Fire one fuel at the own hub. Only inside the own alliance zone and
    /// off cooldown; a miss still consumes the piece and the cooldown.
    pub fn launch(&mut self, ctx: &TickContext, rng: &mut SimRng) -> Option<Shot> {
        if !ctx.field.in_alliance_zone(self.alliance, self.position.x) {
            return None;
        }
        if self.holding == 0 || !self.cooldown_ready(ctx.elapsed) {
            return None;
        }
        self.holding -= 1;
        self.last_shot = ctx.elapsed;

        let hit = rng.chance(self.config.launch_accuracy);
        self.stats.shots += 1;
        if hit {
            self.stats.hits += 1;
        }
        Some(Shot { hit })
    }

    /// Feed one fuel toward the own alliance wall from the neutral zone
    pub fn auto_pass(&mut self, ctx: &TickContext) -> Option<PassRequest> {
        let field = ctx.field;
        if !field.in_neutral_zone(self.position.x) || self.holding == 0 {
            return None;
        }
        if !self.cooldown_ready(ctx.elapsed) {
            return None;
        }

        let target = Vec2::new(
            field.from_wall(self.alliance, fuel::PASS_TARGET_WALL_OFFSET),
            self.position.y,
        );
        // Speed that coasts exactly to the target under per-tick friction decay
        let speed = self.position.distance_to(target) * (1.0 - ctx.friction) / ctx.dt;

        // The own hub structure sits between the neutral zone and the target
        let hub = field.hub(self.alliance).center;
        let past_hub = match self.alliance {
            Alliance::Red => self.position.x > hub.x,
            Alliance::Blue => self.position.x < hub.x,
        };
        let blocked = past_hub && (self.position.y - hub.y).abs() < fuel::PASS_BLOCK_CORRIDOR;

        self.holding -= 1;
        self.last_shot = ctx.elapsed;
        self.stats.passes += 1;
        Some(PassRequest {
            origin: self.position,
            target,
            speed,
            blocked,
        })
    }

    /// Empty the hopper; returns how many fuel were released
    pub fn dump(&mut self) -> u32 {
        let count = self.holding;
        self.holding = 0;
        self.stats.dumped += count;
        count
    }

    /// Per-axis sliding movement
    fn translate(&mut self, field: &Field, others: &[RobotBody], dt: f32) {
        let field_velocity = self.field_velocity();
        let step = field_velocity * (dt * field.speed_factor(self.position));
        let mut permitted = field_velocity;

        if step.x != 0.0 {
            let next = Vec2::new(self.position.x + step.x, self.position.y);
            if self.is_blocked(next, field, others) {
                permitted.x = 0.0;
            } else {
                self.position = next;
            }
        }
        if step.y != 0.0 {
            let next = Vec2::new(self.position.x, self.position.y + step.y);
            if self.is_blocked(next, field, others) {
                permitted.y = 0.0;
            } else {
                self.position = next;
            }
        }

        if permitted != field_velocity {
            let local = permitted.to_local(self.heading);
            self.velocity = match self.config.drivetrain {
                Drivetrain::Swerve => local,
                Drivetrain::Tank => Vec2::new(local.x, 0.0),
            };
        }
    }

    fn is_blocked(&self, candidate: Vec2, field: &Field, others: &[RobotBody]) -> bool {
        let rect = Rect::centered(candidate, self.config.length, self.config.width);
        if field.hits_collider(&rect) {
            return true;
        }

        let clearance = self.config.width.min(self.config.length) / 2.0 - HUB_CLEARANCE_SLACK;
        if field
            .hubs()
            .iter()
            .any(|hub| candidate.distance_to(hub.center) < hub.radius + clearance)
        {
            return true;
        }

        others
            .iter()
            .filter(|body| body.seat != self.seat)
            .any(|body| rect.intersects(&body.rect()))
    }

    /// Dual intakes follow the drive direction; switching sides retracts briefly
    fn update_intake_side(&mut self, dt: f32) {
        if self.config.intake == IntakeKind::Dual && self.velocity.x.abs() > DEPLOY_SWITCH_SPEED {
            let side = if self.velocity.x > 0.0 {
                IntakeSide::Front
            } else {
                IntakeSide::Back
            };
            if side != self.intake_side {
                self.intake_side = side;
                self.intake_transition_timer = self.config.intake_transition_time;
            }
        }
        if self.intake_transition_timer > 0.0 {
            self.intake_transition_timer = (self.intake_transition_timer - dt).max(0.0);
        }
    }
}

/// Move `current` toward `target` by at most `max_step`
#[inline]
fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    if current < target {
        (current + max_step).min(target)
    } else {
        (current - max_step).max(target)
    }
}
