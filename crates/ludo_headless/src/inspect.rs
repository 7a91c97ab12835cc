//! Position analysis for debugging a dumped board.
//!
//! For every die value the report lists what the side to move could
//! capture, which of its coins are exposed, and the move the heuristic
//! would pick.

use ludo_core::board::DIE_FACES;
use ludo_core::color::Color;
use ludo_core::moves::NO_MOVE;
use ludo_core::state::MatchState;
use serde::{Deserialize, Serialize};

/// Analysis of one die value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieReport {
    /// Die value.
    pub die: u8,
    /// Capture options as `(killer, victim)` coin names.
    pub kills: Vec<(String, String)>,
    /// Chosen move and why, if any move is legal.
    pub chosen: Option<(String, String)>,
}

/// Analysis of a whole position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    /// Side to move, then the opponent.
    pub players: [Color; 2],
    /// Completion percentage of each side.
    pub progress: [f64; 2],
    /// Coins of the side to move that an opponent coin could hit.
    pub in_danger: Vec<String>,
    /// One entry per die value.
    pub dice: Vec<DieReport>,
}

impl PositionReport {
    /// Render as a markdown report.
    pub fn to_markdown(&self) -> String {
        let [me, opponent] = self.players;
        let mut md = String::new();
        md.push_str("# Position Report\n\n");
        md.push_str(&format!(
            "{me}: {:.1}% | {opponent}: {:.1}%\n\n",
            self.progress[0], self.progress[1]
        ));

        if self.in_danger.is_empty() {
            md.push_str("No coins in danger\n\n");
        } else {
            md.push_str(&format!("In danger: {}\n\n", self.in_danger.join(", ")));
        }

        md.push_str("| Die | Kills | Move | Reason |\n|-----|-------|------|--------|\n");
        for report in &self.dice {
            let kills = report
                .kills
                .iter()
                .map(|(killer, victim)| format!("{killer}x{victim}"))
                .collect::<Vec<_>>()
                .join(" ");
            let (mv, reason) = report
                .chosen
                .clone()
                .unwrap_or_else(|| (NO_MOVE.to_string(), "-".to_string()));
            md.push_str(&format!("| {} | {} | {} | {} |\n", report.die, kills, mv, reason));
        }
        md
    }
}

/// Analyze `state` from the point of view of its first player.
pub fn analyze_position(state: &MatchState) -> PositionReport {
    let me = state.me();
    let opponent = state.opponent();

    let dice = DIE_FACES
        .map(|die| DieReport {
            die,
            kills: me
                .can_kill(die, opponent)
                .into_iter()
                .map(|(killer, victim)| (killer.id().to_string(), victim.id().to_string()))
                .collect(),
            chosen: me
                .choose_move(die, opponent)
                .map(|(mv, reason)| (mv.to_string(), reason.to_string())),
        })
        .collect();

    PositionReport {
        players: [me.color(), opponent.color()],
        progress: [me.progress(), opponent.progress()],
        in_danger: me
            .in_danger(opponent)
            .into_iter()
            .map(|c| c.id().to_string())
            .collect(),
        dice,
    }
}
