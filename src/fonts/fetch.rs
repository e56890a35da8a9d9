//! The remote font collaborator.

use super::error::FontFetchError;

/// Downloads font files. Implementations must bound how long a fetch may take.
pub trait FontFetcher: Send + Sync {
    /// Returns the raw bytes of the font file at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FontFetchError>;
}

/// A fetcher that never reaches the network. Used in the browser build and
/// for fully offline resolvers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFontFetcher;

impl FontFetcher for NoFontFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FontFetchError> {
        Err(FontFetchError::Unavailable(format!(
            "no fetcher configured for {}",
            url
        )))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpFontFetcher;

#[cfg(not(target_arch = "wasm32"))]
mod http {
    use super::{FontFetchError, FontFetcher};
    use log::debug;
    use std::time::Duration;

    /// Blocking HTTP fetcher with a per-request timeout.
    #[derive(Debug, Clone)]
    pub struct HttpFontFetcher {
        client: reqwest::blocking::Client,
    }

    impl HttpFontFetcher {
        pub fn new(timeout: Duration) -> Result<Self, FontFetchError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .connect_timeout(timeout)
                .build()?;
            Ok(Self { client })
        }
    }

    impl FontFetcher for HttpFontFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FontFetchError> {
            debug!("[HttpFontFetcher] GET {}", url);
            let response = self.client.get(url).send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(FontFetchError::HttpStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            let bytes = response.bytes()?;
            Ok(bytes.to_vec())
        }
    }
}
