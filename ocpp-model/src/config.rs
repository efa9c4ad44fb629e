//! Configuration for the payload checker

/// Which half of an action a payload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Direction {
    Request,
    Response,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How much the checker reports about a non-conformant payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Decode through the constructors and stop at the first rejected field
    FirstViolation,
    /// Decode without enforcement, then list every violation in the tree
    Exhaustive,
}

/// Complete checker configuration
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub direction: Direction,

    pub report_mode: ReportMode,

    /// Payloads above this size are refused before parsing
    pub max_payload_bytes: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Request,
            report_mode: ReportMode::FirstViolation,
            max_payload_bytes: 64 * 1024,
        }
    }
}

impl CheckerConfig {
    /// Create config for one direction with default reporting
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// Check response payloads instead of requests
    pub fn for_responses(mut self) -> Self {
        self.direction = Direction::Response;
        self
    }

    /// Report every violation instead of the first one
    pub fn exhaustive(mut self) -> Self {
        self.report_mode = ReportMode::Exhaustive;
        self
    }

    /// Set payload size limit
    pub fn with_max_payload_bytes(mut self, limit: usize) -> Self {
        self.max_payload_bytes = limit;
        self
    }
}
