/// Per-request analysis phases
///
/// A request moves forward through the pipeline one phase at a time and ends
/// in `Done` or the absorbing `Failed` state.
use std::fmt;
use std::time::Instant;

/// Where a single analysis request currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisPhase {
    // ===== Active Phases =====
    /// Retrieving the page bytes
    Fetching,

    /// Building the document tree
    Parsing,

    /// Handing one task per extraction pass to the worker pool
    Dispatching,

    /// Waiting for every pass and merging outputs into the record
    Collecting,

    /// Storing the finished record
    Caching,

    // ===== Terminal Phases =====
    /// The record was produced
    Done,

    /// A transport, status or parse error ended the request
    Failed,
}

impl AnalysisPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if `next` may follow this phase
    ///
    /// Failure is only reachable while fetching or parsing.
    pub fn can_transition_to(&self, next: AnalysisPhase) -> bool {
        matches!(
            (self, next),
            (Self::Fetching, Self::Parsing)
                | (Self::Fetching, Self::Failed)
                | (Self::Parsing, Self::Dispatching)
                | (Self::Parsing, Self::Failed)
                | (Self::Dispatching, Self::Collecting)
                | (Self::Collecting, Self::Caching)
                | (Self::Caching, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Dispatching => "dispatching",
            Self::Collecting => "collecting",
            Self::Caching => "caching",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Follows one request through its phases, logging each step
#[derive(Debug)]
pub struct PhaseTracker {
    url: String,
    phase: AnalysisPhase,
    entered: Instant,
}

impl PhaseTracker {
    /// Starts tracking a request in the `Fetching` phase
    pub fn start(url: &str) -> Self {
        tracing::debug!("[{}] entering {}", url, AnalysisPhase::Fetching);
        Self {
            url: url.to_string(),
            phase: AnalysisPhase::Fetching,
            entered: Instant::now(),
        }
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    /// Moves to `next`, logging how long the previous phase took
    pub fn advance(&mut self, next: AnalysisPhase) {
        let valid = self.phase.can_transition_to(next);
        debug_assert!(valid, "invalid transition {} -> {}", self.phase, next);
        if !valid {
            tracing::error!(
                "[{}] unexpected phase transition {} -> {}",
                self.url,
                self.phase,
                next
            );
        }

        tracing::debug!(
            "[{}] {} took {:?}, entering {}",
            self.url,
            self.phase,
            self.entered.elapsed(),
            next
        );
        self.phase = next;
        self.entered = Instant::now();
    }

    /// Moves to `Failed`
    pub fn fail(&mut self, reason: &dyn fmt::Display) {
        tracing::debug!("[{}] failed while {}: {}", self.url, self.phase, reason);
        self.advance(AnalysisPhase::Failed);
    }
}
