use crate::config::ConfigError;
use redline_metrics::WindowError;
use thiserror::Error;

/// Errors that can abort a probe session.
#[derive(Debug, Error)]
pub enum ProbeError<E>
where
    E: std::error::Error + 'static,
{
    /// The scene failed to render; the session cannot continue.
    #[error("render submission failed")]
    Render(#[source] E),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("scene rejected workload of {vertex_count} vertices")]
    Attach {
        vertex_count: u32,
        #[source]
        source: E,
    },
}
