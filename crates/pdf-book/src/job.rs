use std::fmt;

/// Per-job logging context, created once when a job starts and handed to
/// every stage. Log lines for the job are prefixed with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobContext {
    id: String,
    trace_geometry: bool,
}

impl JobContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            trace_geometry: false,
        }
    }

    /// Also log every derived geometry value at debug level
    pub fn with_geometry_trace(mut self, enabled: bool) -> Self {
        self.trace_geometry = enabled;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn trace_geometry(&self) -> bool {
        self.trace_geometry
    }
}

impl Default for JobContext {
    fn default() -> Self {
        Self::new("job")
    }
}

impl fmt::Display for JobContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.id)
    }
}
