//! Match simulation state
//!
//! Owns the field, fuel, robots, their pilots and the match clock, and
//! advances all of them one fixed timestep at a time.

use smallvec::SmallVec;

use crate::config::{SimConfig, SimError};
use crate::game::field::{Alliance, Field};
use crate::game::intent::RobotIntent;
use crate::game::match_clock::{MatchClock, MatchPhase};
use crate::game::match_result::{determine_result, MatchResult, Scoreboard};
use crate::game::pieces::GamePieceManager;
use crate::game::robot::{PassRequest, Robot, RobotBody, TickContext};
use crate::game::systems::ai::{AiView, RobotController};
use crate::util::rng::SimRng;

/// Who drives a seat
#[derive(Debug, Clone)]
pub enum Pilot {
    Controller(RobotController),
    /// Intent supplied through [`Simulation::set_intent`]
    External,
}

impl Pilot {
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External)
    }
}

/// What happened during one [`Simulation::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub phase: Option<MatchPhase>,
    pub phase_changed: bool,
    pub shots: u32,
    pub hits: u32,
    pub passes: u32,
    pub dumped: u32,
    /// Penalty points awarded this tick
    pub penalty_points: u32,
}

impl TickReport {
    pub fn is_finished(&self) -> bool {
        self.phase == Some(MatchPhase::Finished)
    }
}

/// One headless match
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    field: Field,
    pieces: GamePieceManager,
    /// Seats in order: red robots first, then blue
    robots: Vec<Robot>,
    pilots: Vec<Pilot>,
    /// Latest external intent per seat
    intents: Vec<RobotIntent>,
    /// Start-of-tick snapshot shared with every robot and controller
    bodies: Vec<RobotBody>,
    clock: MatchClock,
    scoreboard: Scoreboard,
    rng: SimRng,
    dt: f32,
    seed: u64,
}

impl Simulation {
    /// Validate `config` and set up the starting layout
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = SimRng::seeded(seed);
        let field = Field::new(&config.field);
        let dt = config.timing.dt();

        let mut pieces = GamePieceManager::new(&config);
        pieces.spawn_initial(&field);

        let mut robots = Vec::with_capacity(config.red.len() + config.blue.len());
        let mut pilots = Vec::with_capacity(robots.capacity());
        for (alliance, lineup) in [(Alliance::Red, &config.red), (Alliance::Blue, &config.blue)] {
            for (index, robot_config) in lineup.iter().enumerate() {
                let (position, heading) = Robot::starting_pose(&field, alliance, index, lineup.len());
                let seat = robots.len();
                robots.push(Robot::new(seat, alliance, robot_config, position, heading));
                pilots.push(if robot_config.is_ai {
                    Pilot::Controller(RobotController::new(robot_config.ai_tick_rate, &mut rng))
                } else {
                    Pilot::External
                });
            }
        }

        tracing::debug!(
            seed,
            red = config.red.len(),
            blue = config.blue.len(),
            fuel = pieces.live_count(),
            "Simulation created"
        );

        let bodies = robots.iter().map(Robot::body).collect();
        Ok(Self {
            intents: vec![RobotIntent::IDLE; robots.len()],
            bodies,
            robots,
            pilots,
            field,
            pieces,
            clock: MatchClock::new(dt),
            scoreboard: Scoreboard::default(),
            rng,
            dt,
            seed,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn pieces(&self) -> &GamePieceManager {
        &self.pieces
    }

    /// Direct access for harnesses that stage fuel
    pub fn pieces_mut(&mut self) -> &mut GamePieceManager {
        &mut self.pieces
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot(&self, seat: usize) -> Option<&Robot> {
        self.robots.get(seat)
    }

    pub fn robot_mut(&mut self, seat: usize) -> Option<&mut Robot> {
        self.robots.get_mut(seat)
    }

    pub fn pilot(&self, seat: usize) -> Option<&Pilot> {
        self.pilots.get(seat)
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    /// Drive `seat` externally from now on with `intent`
    pub fn set_intent(&mut self, seat: usize, intent: RobotIntent) -> Result<(), SimError> {
        let slot = self.intents.get_mut(seat).ok_or(SimError::UnknownSeat(seat))?;
        *slot = intent;
        if !self.pilots[seat].is_external() {
            tracing::debug!(seat, "Seat switched to external control");
            self.pilots[seat] = Pilot::External;
        }
        Ok(())
    }

    /// Advance the match by one tick
    pub fn step(&mut self) -> TickReport {
        let phase_changed = self.clock.begin_tick(&self.scoreboard);
        let mut report = TickReport {
            phase: Some(self.clock.phase()),
            phase_changed,
            ..TickReport::default()
        };
        if self.clock.is_finished() {
            return report;
        }

        let elapsed = self.clock.elapsed();
        let dt = self.dt;
        let points = self.config.scoring.points_per_hit;

        self.bodies.clear();
        self.bodies.extend(self.robots.iter().map(Robot::body));

        let mut passes: SmallVec<[PassRequest; 6]> = SmallVec::new();
        for seat in 0..self.robots.len() {
            let alliance = self.robots[seat].alliance();
            let can_score = self.clock.can_score(alliance);

            let intent = match &mut self.pilots[seat] {
                Pilot::Controller(controller) => {
                    let view = AiView {
                        robot: &self.robots[seat],
                        field: &self.field,
                        fuels: self.pieces.fuels(),
                        bodies: &self.bodies,
                        can_score,
                    };
                    controller.tick(&view, dt, &mut self.rng)
                }
                Pilot::External => self.intents[seat],
            };

            let ctx = TickContext {
                field: &self.field,
                elapsed,
                dt,
                can_score,
                friction: self.config.physics.friction,
            };
            let robot = &mut self.robots[seat];
            let outcome = robot.update(&intent, &ctx, &self.bodies, &mut self.rng);

            if let Some(shot) = outcome.shot {
                report.shots += 1;
                if shot.hit && can_score {
                    report.hits += 1;
                    self.scoreboard.add_fuel(alliance, points);
                    self.pieces.recycle(&self.field, alliance, &mut self.rng);
                }
            }
            if let Some(pass) = outcome.pass {
                passes.push(pass);
            }
            if outcome.dumped > 0 {
                report.dumped += outcome.dumped;
                self.pieces.queue_dump(robot.position, outcome.dumped);
            }
        }

        report.passes = passes.len() as u32;
        for pass in &passes {
            self.pieces.spawn_pass(pass, &mut self.rng);
        }

        let penalties = self
            .pieces
            .update(&self.field, &mut self.robots, elapsed, dt, &mut self.rng);
        for penalty in penalties {
            tracing::trace!(seat = penalty.seat, points = penalty.points, "Hot catch");
            self.scoreboard.add_penalty(penalty.beneficiary, penalty.points);
            report.penalty_points += penalty.points;
        }

        self.clock.advance();
        report
    }

    /// Step until the clock runs out
    pub fn run_to_end(&mut self) -> MatchResult {
        while !self.step().is_finished() {}

        let result = self.result();
        tracing::info!(
            seed = self.seed,
            red = result.red.total,
            blue = result.blue.total,
            winner = ?result.winner,
            "Match complete"
        );
        result
    }

    /// Result as of the current tick
    pub fn result(&self) -> MatchResult {
        determine_result(
            &self.scoreboard,
            &self.robots,
            self.clock.elapsed(),
            self.clock.stage_order(),
            self.seed,
        )
    }
}
