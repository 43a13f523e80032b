//! Scoreboard, match result and batch statistics
//!
//! Computes final match results and aggregates them across a batch run.

use serde::Serialize;

use crate::game::field::Alliance;
use crate::game::robot::{Robot, RobotStats};

/// Running per-alliance score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    fuel: [u32; 2],
    /// Points received from opponent fouls
    penalty: [u32; 2],
}

impl Scoreboard {
    pub fn add_fuel(&mut self, alliance: Alliance, points: u32) {
        self.fuel[alliance.index()] += points;
    }

    /// Credit `points` to the alliance that benefits from a foul
    pub fn add_penalty(&mut self, beneficiary: Alliance, points: u32) {
        self.penalty[beneficiary.index()] += points;
    }

    pub fn fuel(&self, alliance: Alliance) -> u32 {
        self.fuel[alliance.index()]
    }

    pub fn penalty(&self, alliance: Alliance) -> u32 {
        self.penalty[alliance.index()]
    }

    pub fn total(&self, alliance: Alliance) -> u32 {
        self.fuel(alliance) + self.penalty(alliance)
    }

    /// Alliance ahead on fuel points, `None` when level
    pub fn fuel_leader(&self) -> Option<Alliance> {
        leader_of(self.fuel(Alliance::Red), self.fuel(Alliance::Blue))
    }

    /// Alliance ahead on total points, `None` when level
    pub fn leader(&self) -> Option<Alliance> {
        leader_of(self.total(Alliance::Red), self.total(Alliance::Blue))
    }
}

fn leader_of(red: u32, blue: u32) -> Option<Alliance> {
    match red.cmp(&blue) {
        std::cmp::Ordering::Greater => Some(Alliance::Red),
        std::cmp::Ordering::Less => Some(Alliance::Blue),
        std::cmp::Ordering::Equal => None,
    }
}

/// Final score of one alliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllianceScore {
    pub fuel: u32,
    pub penalty: u32,
    pub total: u32,
}

/// End-of-match state of one robot
#[derive(Debug, Clone, Serialize)]
pub struct RobotSummary {
    pub seat: usize,
    pub name: String,
    pub alliance: Alliance,
    pub holding: u32,
    pub stats: RobotStats,
}

/// Match result information
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub red: AllianceScore,
    pub blue: AllianceScore,
    /// `None` on a tie
    pub winner: Option<Alliance>,
    /// Simulated seconds
    pub duration: f32,
    pub stage_order: [Alliance; 4],
    pub robots: Vec<RobotSummary>,
    pub seed: u64,
}

impl MatchResult {
    pub fn score(&self, alliance: Alliance) -> &AllianceScore {
        match alliance {
            Alliance::Red => &self.red,
            Alliance::Blue => &self.blue,
        }
    }
}

/// Determine match result from the final scoreboard and robots
pub fn determine_result(
    scoreboard: &Scoreboard,
    robots: &[Robot],
    duration: f32,
    stage_order: [Alliance; 4],
    seed: u64,
) -> MatchResult {
    let score = |alliance| AllianceScore {
        fuel: scoreboard.fuel(alliance),
        penalty: scoreboard.penalty(alliance),
        total: scoreboard.total(alliance),
    };

    let robots = robots
        .iter()
        .map(|r| RobotSummary {
            seat: r.seat(),
            name: r.config().name.clone(),
            alliance: r.alliance(),
            holding: r.holding(),
            stats: r.stats,
        })
        .collect();

    MatchResult {
        red: score(Alliance::Red),
        blue: score(Alliance::Blue),
        winner: scoreboard.leader(),
        duration,
        stage_order,
        robots,
        seed,
    }
}

/// Aggregate over a batch of matches
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub matches: usize,
    pub red_wins: usize,
    pub blue_wins: usize,
    pub ties: usize,
    pub red_avg: f32,
    pub blue_avg: f32,
    pub red_max: u32,
    pub blue_max: u32,
    pub red_avg_penalty: f32,
    pub blue_avg_penalty: f32,
}

impl BatchSummary {
    pub fn from_results(results: &[MatchResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let n = results.len() as f32;
        let wins = |alliance| results.iter().filter(|r| r.winner == Some(alliance)).count();
        let red_wins = wins(Alliance::Red);
        let blue_wins = wins(Alliance::Blue);

        let avg = |f: fn(&MatchResult) -> u32| results.iter().map(f).sum::<u32>() as f32 / n;
        let max = |f: fn(&MatchResult) -> u32| results.iter().map(f).max().unwrap_or(0);

        Self {
            matches: results.len(),
            red_wins,
            blue_wins,
            ties: results.len() - red_wins - blue_wins,
            red_avg: avg(|r| r.red.total),
            blue_avg: avg(|r| r.blue.total),
            red_max: max(|r| r.red.total),
            blue_max: max(|r| r.blue.total),
            red_avg_penalty: avg(|r| r.red.penalty),
            blue_avg_penalty: avg(|r| r.blue.penalty),
        }
    }

    /// Share of matches won, in percent
    pub fn win_rate(&self, alliance: Alliance) -> f32 {
        if self.matches == 0 {
            return 0.0;
        }
        let wins = match alliance {
            Alliance::Red => self.red_wins,
            Alliance::Blue => self.blue_wins,
        };
        wins as f32 / self.matches as f32 * 100.0
    }

    pub fn tie_rate(&self) -> f32 {
        if self.matches == 0 {
            return 0.0;
        }
        self.ties as f32 / self.matches as f32 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotConfig;
    use crate::util::vec2::Vec2;

    const DEFAULT_ORDER: [Alliance; 4] = [Alliance::Red, Alliance::Blue, Alliance::Red, Alliance::Blue];

    fn create_test_robots() -> Vec<Robot> {
        let config = RobotConfig::default();
        vec![
            Robot::new(0, Alliance::Red, &config, Vec2::new(100.0, 150.0), 0.0),
            Robot::new(1, Alliance::Blue, &config, Vec2::new(550.0, 150.0), 180.0),
        ]
    }

    fn result_with(red: u32, blue: u32, red_penalty: u32) -> MatchResult {
        let mut board = Scoreboard::default();
        board.add_fuel(Alliance::Red, red);
        board.add_fuel(Alliance::Blue, blue);
        board.add_penalty(Alliance::Red, red_penalty);
        determine_result(&board, &[], 160.0, DEFAULT_ORDER, 0)
    }

    #[test]
    fn test_scoreboard_totals() {
        let mut board = Scoreboard::default();
        board.add_fuel(Alliance::Red, 3);
        board.add_penalty(Alliance::Blue, 15);
        assert_eq!(board.total(Alliance::Red), 3);
        assert_eq!(board.total(Alliance::Blue), 15);
        assert_eq!(board.fuel_leader(), Some(Alliance::Red));
        assert_eq!(board.leader(), Some(Alliance::Blue));
    }

    #[test]
    fn test_tie_has_no_winner() {
        let result = result_with(10, 10, 0);
        assert_eq!(result.winner, None);
        assert_eq!(result.red.total, result.blue.total);
    }

    #[test]
    fn test_penalties_decide_winner() {
        let result = result_with(10, 20, 15);
        assert_eq!(result.winner, Some(Alliance::Red));
        assert_eq!(result.score(Alliance::Red).total, 25);
    }

    #[test]
    fn test_robot_summaries() {
        let mut robots = create_test_robots();
        robots[1].stats.hits = 4;
        let result = determine_result(&Scoreboard::default(), &robots, 160.0, DEFAULT_ORDER, 42);
        assert_eq!(result.robots.len(), 2);
        assert_eq!(result.robots[1].alliance, Alliance::Blue);
        assert_eq!(result.robots[1].stats.hits, 4);
        assert_eq!(result.robots[0].holding, 8);
        assert_eq!(result.seed, 42);
    }

    #[test]
    fn test_result_serializes() {
        let result = result_with(5, 2, 0);
        let json = serde_json::to_value(&result).expect("result should serialize");
        assert_eq!(json["winner"], "red");
        assert_eq!(json["red"]["total"], 5);
    }

    #[test]
    fn test_batch_summary() {
        let results = vec![result_with(10, 5, 0), result_with(3, 9, 15), result_with(4, 4, 0)];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.matches, 3);
        assert_eq!(summary.red_wins, 2);
        assert_eq!(summary.blue_wins, 0);
        assert_eq!(summary.ties, 1);
        assert_eq!(summary.red_max, 18);
        assert!((summary.red_avg - 32.0 / 3.0).abs() < 1e-4);
        assert!((summary.red_avg_penalty - 5.0).abs() < 1e-4);
        assert!((summary.win_rate(Alliance::Red) - 200.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_batch() {
        let summary = BatchSummary::from_results(&[]);
        assert_eq!(summary.matches, 0);
        assert_eq!(summary.win_rate(Alliance::Blue), 0.0);
        assert_eq!(summary.tie_rate(), 0.0);
    }
}
