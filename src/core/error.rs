use thiserror::Error;

/// Errors surfaced by the pad core and its browser collaborators.
///
/// Audio and device failures are recoverable: the pad stays responsive but
/// silent and shows a status line. `GraphWiring` only fires if a routing plan
/// tries to connect a node that still has an outgoing edge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PadError {
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
    #[error("microphone unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("graph wiring: {0}")]
    GraphWiring(String),
    #[error("render: {0}")]
    Render(String),
    #[error("config: {0}")]
    Config(String),
}

pub type PadResult<T> = Result<T, PadError>;

impl PadError {
    /// Whether the pad keeps accepting gestures after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PadError::GraphWiring(_))
    }
}
