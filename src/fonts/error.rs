use thiserror::Error;

/// Errors from the remote font collaborator. They never leave the resolver:
/// a failed fetch only means the font resolves to `None`.
#[derive(Error, Debug)]
pub enum FontFetchError {
    /// Error originating from the underlying HTTP client (`reqwest`).
    #[error("Font download failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The font server answered with a non-success status.
    #[error("Font server returned status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Writing the downloaded font into the cache directory failed.
    #[error("I/O error while caching font: {0}")]
    Io(#[from] std::io::Error),

    /// No fetcher is available in this build (offline or wasm).
    #[error("Remote font fetching is unavailable: {0}")]
    Unavailable(String),
}
