use thiserror::Error;

pub type Result<T, E = AlmanacError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AlmanacError {
    /// Neither a rendering nor a redirect sidecar exists for the request.
    #[error("No content found for {0}")]
    NotFound(String),

    /// A read or directory walk failed. Never retried inside the core.
    #[error(transparent)]
    Io(#[from] anyhow::Error),

    /// A template slot is still empty; callers may retry once startup finishes.
    #[error("Template {0} has not been loaded")]
    TemplatesNotLoaded(&'static str),

    #[error("Failed to render template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

impl AlmanacError {
    pub fn template(name: impl Into<String>, source: minijinja::Error) -> Self {
        Self::Template {
            name: name.into(),
            source,
        }
    }
}
