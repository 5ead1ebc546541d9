use crate::game::Outcome;

/// What the search was doing when it recorded a state
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Taken off the frontier and looked at
    Visiting,
    /// Put on the frontier for the first time, or with a better cost
    Exploring,
    /// A candidate placement or move that is about to be checked
    Trying,
    /// A placement or move that was committed to
    Placing,
    /// A placement that was undone
    Backtracking,
    /// A complete solution
    Solution,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry<S> {
    pub snapshot: S,
    pub phase: Phase,
}

/// The ordered record of everything a search looked at
///
/// `recorded` keeps counting after [Trace::keep_last] drops old entries, or once a
/// [Trace::capped] trace is full, so callers can still tell how much work was done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace<S> {
    entries: Vec<TraceEntry<S>>,
    recorded: usize,
    limit: Option<usize>,
}

impl<S> Default for Trace<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            recorded: 0,
            limit: None,
        }
    }
}

impl<S> Trace<S> {
    /// A trace that keeps only the first `limit` entries
    pub fn capped(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn record(&mut self, snapshot: S, phase: Phase) {
        self.record_with(phase, || snapshot);
    }

    /// Like [Trace::record], but only builds the snapshot if there is room to keep it
    pub fn record_with(&mut self, phase: Phase, snapshot: impl FnOnce() -> S) {
        if !self.is_full() {
            self.entries.push(TraceEntry {
                snapshot: snapshot(),
                phase,
            });
        }
        self.recorded += 1;
    }

    pub fn is_full(&self) -> bool {
        self.limit.map_or(false, |limit| self.entries.len() >= limit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry ever recorded, including ones dropped by [Trace::keep_last]
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Drop all but the most recent `limit` entries
    pub fn keep_last(&mut self, limit: usize) {
        if self.entries.len() > limit {
            let excess = self.entries.len() - limit;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[TraceEntry<S>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TraceEntry<S>> {
        self.entries
    }
}

/// Algorithm specific fields, only the ones that were set are serialized
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Extras {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_cost: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moves: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_disks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_moves: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_optimal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The result every engine returns
///
/// `A` is the answer (a path, a board, a move) and `S` is the snapshot type of the trace.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchResult<A, S> {
    pub found: bool,
    pub artifact: Option<A>,
    pub trace: Vec<TraceEntry<S>>,
    pub nodes_explored: usize,
    #[serde(flatten)]
    pub extras: Extras,
}

impl<A, S> SearchResult<A, S> {
    /// Builds a result counting every recorded trace entry as an explored node
    pub fn from_trace(artifact: Option<A>, trace: Trace<S>) -> Self {
        Self {
            found: artifact.is_some(),
            artifact,
            nodes_explored: trace.recorded(),
            trace: trace.into_entries(),
            extras: Extras::default(),
        }
    }

    pub fn with_nodes_explored(mut self, nodes_explored: usize) -> Self {
        self.nodes_explored = nodes_explored;
        self
    }

    pub fn with_extras(mut self, extras: Extras) -> Self {
        self.extras = extras;
        self
    }
}
