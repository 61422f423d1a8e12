//! Crate-wide error taxonomy.
//!
//! Every failure path in the engine resolves to one of three variants:
//! a background/source image failed to fetch or decode ([`CraftError::Load`]),
//! the same-origin relay itself failed ([`CraftError::Proxy`]), or the final
//! raster could not be produced/encoded ([`CraftError::Export`]).
//!
//! Proxy failures are handled identically to load failures by callers; they
//! are distinguished only so external logging can tell the relay apart from
//! a bad asset.

pub type CraftResult<T> = Result<T, CraftError>;

#[derive(thiserror::Error, Debug)]
pub enum CraftError {
    /// Background or source image fetch/decode failed. The scene that was
    /// active before the failing call is left untouched.
    #[error("load error: {0}")]
    Load(String),

    /// The image relay returned a non-success status or was unreachable.
    #[error("proxy error: {url}: {reason}")]
    Proxy { url: String, reason: String },

    /// Raster encode failed. Not recoverable for the current scene state
    /// except by reloading the background through the gateway.
    #[error("export error: {0}")]
    Export(String),
}

impl CraftError {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn proxy(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Proxy {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Returns true for failures that callers recover from by retrying the
    /// fetch (load and proxy errors, which share one recovery path).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Proxy { .. })
    }
}
