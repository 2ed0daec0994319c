use layers::LayerId;

/// Failure reported by the rendering engine.
///
/// Never escapes a component: callers turn it into a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RendererError {
    #[error("layer '{0}' does not exist")]
    MissingLayer(LayerId),
    #[error("source '{0}' does not exist")]
    MissingSource(String),
    #[error("renderer rejected '{target}': {reason}")]
    Rejected { target: String, reason: String },
    #[error("renderer call failed: {0}")]
    Call(String),
}

impl RendererError {
    pub fn rejected(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            target: target.into(),
            reason: reason.into(),
        }
    }
}
