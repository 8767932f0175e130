//! Certainty tracking across rounds.

/// Probability of accepting the best unvisited candidate.
///
/// Starts at 1.0 for a goal not seen in the previous round and is multiplied
/// by the decay factor each time the same goal comes back, so repeated
/// failures push the walk toward lower-ranked links. Always in (0, 1].
#[derive(Debug, Clone)]
pub struct CertaintyTracker {
    decay: f64,
    goal: Option<String>,
    certainty: f64,
}

impl CertaintyTracker {
    pub fn new(decay: f64) -> Self {
        Self {
            decay,
            goal: None,
            certainty: 1.0,
        }
    }

    /// Record the goal of a newly started round and return the certainty
    /// to play it with.
    pub fn observe(&mut self, goal: &str) -> f64 {
        if self.goal.as_deref() == Some(goal) {
            self.certainty = (self.certainty * self.decay).max(f64::MIN_POSITIVE);
        } else {
            self.goal = Some(goal.to_string());
            self.certainty = 1.0;
        }
        self.certainty
    }

    pub fn certainty(&self) -> f64 {
        self.certainty
    }
}
