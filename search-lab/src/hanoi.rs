//! The Tower of Hanoi, solved by recursive decomposition

use std::fmt;

use tracing::info;

use crate::{Extras, Phase, SearchError, SearchResult, Trace};

/// The final pegs, with every move in the trace
pub type HanoiResult = SearchResult<Towers, HanoiMove>;

/// Largest tower we'll solve, `2^20 - 1` moves
pub const MAX_DISKS: u32 = 20;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Peg {
    A,
    B,
    C,
}

impl fmt::Display for Peg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Peg::A => "A",
            Peg::B => "B",
            Peg::C => "C",
        };
        write!(f, "{name}")
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HanoiMove {
    /// Counts from 1
    #[serde(rename = "move")]
    pub number: u64,
    pub disk: u32,
    pub from: Peg,
    pub to: Peg,
    pub description: String,
}

/// Disks on each peg from the bottom up, disk `1` is the smallest
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub struct Towers {
    pub a: Vec<u32>,
    pub b: Vec<u32>,
    pub c: Vec<u32>,
}

impl Towers {
    /// Every disk stacked on peg A
    pub fn new(n_disks: u32) -> Self {
        Self {
            a: (1..=n_disks).rev().collect(),
            b: vec![],
            c: vec![],
        }
    }

    pub fn peg(&self, peg: Peg) -> &[u32] {
        match peg {
            Peg::A => &self.a,
            Peg::B => &self.b,
            Peg::C => &self.c,
        }
    }

    fn peg_mut(&mut self, peg: Peg) -> &mut Vec<u32> {
        match peg {
            Peg::A => &mut self.a,
            Peg::B => &mut self.b,
            Peg::C => &mut self.c,
        }
    }

    /// Moves the top disk of `from` onto `to` and returns it
    ///
    /// Returns `None` without changing anything if `from` is empty or the move would put a
    /// larger disk on a smaller one.
    pub fn apply(&mut self, from: Peg, to: Peg) -> Option<u32> {
        let disk = *self.peg(from).last()?;
        if self.peg(to).last().map_or(false, |&top| top < disk) {
            return None;
        }

        self.peg_mut(from).pop();
        self.peg_mut(to).push(disk);
        Some(disk)
    }
}

struct Solver {
    towers: Towers,
    moves: u64,
    trace: Trace<HanoiMove>,
}

impl Solver {
    fn solve(&mut self, n: u32, from: Peg, to: Peg, via: Peg) {
        if n == 0 {
            return;
        }

        self.solve(n - 1, from, via, to);

        let moved = self.towers.apply(from, to);
        debug_assert_eq!(moved, Some(n), "disk {n} should be free to move");

        self.moves += 1;
        self.trace.record(
            HanoiMove {
                number: self.moves,
                disk: n,
                from,
                to,
                description: format!("Move disk {n} from {from} to {to}"),
            },
            Phase::Placing,
        );

        self.solve(n - 1, via, to, from);
    }
}

/// Moves `n_disks` from peg A to peg C using B
#[tracing::instrument(level = "debug", skip_all, fields(n_disks = n_disks))]
pub fn solve(n_disks: u32) -> Result<HanoiResult, SearchError> {
    if n_disks > MAX_DISKS {
        return Err(SearchError::InvalidParameter(format!(
            "n_disks must be at most {MAX_DISKS}, got {n_disks}"
        )));
    }

    let mut solver = Solver {
        towers: Towers::new(n_disks),
        moves: 0,
        trace: Trace::default(),
    };
    solver.solve(n_disks, Peg::A, Peg::C, Peg::B);

    let optimal_moves = (1u64 << n_disks) - 1;
    info!(moves = solver.moves, optimal_moves, "solved tower of hanoi");

    Ok(SearchResult::from_trace(Some(solver.towers), solver.trace).with_extras(Extras {
        n_disks: Some(n_disks),
        moves: Some(solver.moves),
        optimal_moves: Some(optimal_moves),
        is_optimal: Some(solver.moves == optimal_moves),
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_the_optimal_number_of_moves() {
        for n in 1..=10 {
            let result = solve(n).unwrap();

            assert_eq!(result.extras.moves, Some(2u64.pow(n) - 1), "{n} disks");
            assert_eq!(result.extras.is_optimal, Some(true));
            assert_eq!(result.trace.len() as u64, 2u64.pow(n) - 1);
        }
    }

    #[test]
    fn test_replaying_the_trace_never_breaks_the_rules() {
        let result = solve(6).unwrap();
        let mut towers = Towers::new(6);

        for (i, entry) in result.trace.iter().enumerate() {
            let step = &entry.snapshot;
            assert_eq!(step.number, i as u64 + 1);
            assert_eq!(entry.phase, Phase::Placing);
            assert_eq!(towers.apply(step.from, step.to), Some(step.disk));
        }

        assert_eq!(towers.c, vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(Some(towers), result.artifact);
    }

    #[test]
    fn test_three_disks() {
        let result = solve(3).unwrap();
        let moves: Vec<_> = result
            .trace
            .iter()
            .map(|e| (e.snapshot.disk, e.snapshot.from, e.snapshot.to))
            .collect();

        assert_eq!(
            moves,
            vec![
                (1, Peg::A, Peg::C),
                (2, Peg::A, Peg::B),
                (1, Peg::C, Peg::B),
                (3, Peg::A, Peg::C),
                (1, Peg::B, Peg::A),
                (2, Peg::B, Peg::C),
                (1, Peg::A, Peg::C),
            ]
        );
        assert_eq!(result.trace[3].snapshot.description, "Move disk 3 from A to C");
    }

    #[test]
    fn test_apply_rejects_illegal_moves() {
        let mut towers = Towers::new(2);

        assert_eq!(towers.apply(Peg::B, Peg::C), None);
        assert_eq!(towers.apply(Peg::A, Peg::B), Some(1));
        assert_eq!(towers.apply(Peg::A, Peg::B), None);
        assert_eq!(towers.peg(Peg::A), &[2]);
    }

    #[test]
    fn test_disk_limits() {
        let empty = solve(0).unwrap();
        assert!(empty.found);
        assert!(empty.trace.is_empty());
        assert_eq!(empty.extras.optimal_moves, Some(0));

        assert!(matches!(solve(MAX_DISKS + 1), Err(SearchError::InvalidParameter(_))));
    }

    #[test]
    fn test_serialized_move() {
        let result = solve(1).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json["trace"][0]["snapshot"],
            serde_json::json!({
                "move": 1,
                "disk": 1,
                "from": "A",
                "to": "C",
                "description": "Move disk 1 from A to C",
            })
        );
        assert_eq!(json["artifact"], serde_json::json!({ "A": [], "B": [], "C": [1] }));
        assert_eq!(json["is_optimal"], true);
    }
}
