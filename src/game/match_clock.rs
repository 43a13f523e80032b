//! Match phase state machine
//!
//! Phase is a pure function of elapsed time. The only state the clock
//! carries besides its tick counter is the teleop stage ordering, which is
//! decided exactly once, on the first tick after the transition period.

use std::fmt;

use crate::game::constants::timing::*;
use crate::game::field::Alliance;
use crate::game::match_result::Scoreboard;

/// Stage ordering used when the transition period ends level
pub const DEFAULT_STAGE_ORDER: [Alliance; STAGE_COUNT] =
    [Alliance::Red, Alliance::Blue, Alliance::Red, Alliance::Blue];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Auto,
    Transition,
    /// Exclusive scoring stage, `stage` in `0..STAGE_COUNT`
    Teleop { stage: u8 },
    Endgame,
    Finished,
}

impl MatchPhase {
    pub fn at(elapsed: f32) -> Self {
        if elapsed < AUTO_END {
            Self::Auto
        } else if elapsed < TRANSITION_END {
            Self::Transition
        } else if elapsed < TELEOP_END {
            let stage = ((elapsed - TRANSITION_END) / STAGE_DURATION) as usize;
            Self::Teleop {
                stage: stage.min(STAGE_COUNT - 1) as u8,
            }
        } else if elapsed < MATCH_DURATION {
            Self::Endgame
        } else {
            Self::Finished
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "AUTO"),
            Self::Transition => write!(f, "TRANSITION"),
            Self::Teleop { stage } => write!(f, "TELEOP STAGE {}", stage + 1),
            Self::Endgame => write!(f, "ENDGAME"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

/// Who may score right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringRights {
    Both,
    Only(Alliance),
    Neither,
}

impl ScoringRights {
    pub fn allows(self, alliance: Alliance) -> bool {
        match self {
            Self::Both => true,
            Self::Only(active) => active == alliance,
            Self::Neither => false,
        }
    }
}

/// The leading alliance scores second; a level score keeps the default
pub fn stage_order_for(leader: Option<Alliance>) -> [Alliance; STAGE_COUNT] {
    match leader {
        Some(leader) => {
            let trailer = leader.opponent();
            [trailer, leader, trailer, leader]
        }
        None => DEFAULT_STAGE_ORDER,
    }
}

#[derive(Debug, Clone)]
pub struct MatchClock {
    tick: u64,
    dt: f32,
    phase: MatchPhase,
    stage_order: Option<[Alliance; STAGE_COUNT]>,
}

impl MatchClock {
    pub fn new(dt: f32) -> Self {
        Self {
            tick: 0,
            dt,
            phase: MatchPhase::Auto,
            stage_order: None,
        }
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Match time at the start of the current tick
    #[inline]
    pub fn elapsed(&self) -> f32 {
        (self.tick as f64 * self.dt as f64) as f32
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == MatchPhase::Finished
    }

    /// Decided ordering, or the default before the decision is made
    pub fn stage_order(&self) -> [Alliance; STAGE_COUNT] {
        self.stage_order.unwrap_or(DEFAULT_STAGE_ORDER)
    }

    pub fn order_decided(&self) -> bool {
        self.stage_order.is_some()
    }

    /// Derive the phase for the current tick, fixing the stage ordering from
    /// the fuel score the first time teleop is reached. Returns true when the
    /// phase changed.
    pub fn begin_tick(&mut self, scoreboard: &Scoreboard) -> bool {
        let phase = MatchPhase::at(self.elapsed());

        if self.stage_order.is_none() && self.elapsed() >= TRANSITION_END {
            let leader = scoreboard.fuel_leader();
            let order = stage_order_for(leader);
            tracing::debug!(
                red = scoreboard.fuel(Alliance::Red),
                blue = scoreboard.fuel(Alliance::Blue),
                order = ?order,
                "Teleop stage order decided"
            );
            self.stage_order = Some(order);
        }

        let changed = phase != self.phase;
        if changed {
            tracing::debug!(elapsed = self.elapsed(), %phase, "Phase change");
            self.phase = phase;
        }
        changed
    }

    pub fn rights(&self) -> ScoringRights {
        match self.phase {
            MatchPhase::Auto | MatchPhase::Transition | MatchPhase::Endgame => ScoringRights::Both,
            MatchPhase::Teleop { stage } => ScoringRights::Only(self.stage_order()[stage as usize]),
            MatchPhase::Finished => ScoringRights::Neither,
        }
    }

    pub fn can_score(&self, alliance: Alliance) -> bool {
        self.rights().allows(alliance)
    }

    /// Move to the next tick
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
