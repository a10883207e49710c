//! Shader source fetching.
//!
//! A [`SourceFetcher`] turns a [`SourceLocator`] into a URI and then fetches
//! the text behind it. Fetches are awaited one at a time by the flow; nothing
//! here imposes a timeout.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::SourceLocator;
use crate::error::FetchError;

/// Retrieves shader source text.
///
/// Futures need not be `Send`: browser fetches live on the single JS thread.
#[async_trait(?Send)]
pub trait SourceFetcher {
    /// Resolves a locator into something [`fetch_text`](Self::fetch_text) accepts.
    ///
    /// The default accepts direct URIs only. Hosts with a document override
    /// this to read the `src` of a script element.
    fn resolve(&self, locator: &SourceLocator) -> Result<String, FetchError> {
        match locator {
            SourceLocator::Uri(uri) => Ok(uri.clone()),
            SourceLocator::Element(_) => Err(FetchError::Unresolved(locator.to_string())),
        }
    }

    /// Fetches the text body at `uri`.
    async fn fetch_text(&self, uri: &str) -> Result<String, FetchError>;
}

/// Reads sources from the local filesystem, treating URIs as relative paths.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    base_dir: PathBuf,
}

impl FileFetcher {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait(?Send)]
impl SourceFetcher for FileFetcher {
    async fn fetch_text(&self, uri: &str) -> Result<String, FetchError> {
        let path = self.base_dir.join(uri);
        log::debug!("reading shader source from {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| FetchError::Transport {
            uri: uri.to_owned(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn default_resolve_passes_uris_through() {
        let fetcher = FileFetcher::new(".");
        let uri = fetcher
            .resolve(&SourceLocator::Uri("shaders/point.vert".into()))
            .unwrap();
        assert_eq!(uri, "shaders/point.vert");
    }

    #[test]
    fn default_resolve_rejects_elements() {
        let fetcher = FileFetcher::new(".");
        let err = fetcher
            .resolve(&SourceLocator::Element("shaderVs".into()))
            .unwrap_err();
        assert_eq!(err, FetchError::Unresolved("#shaderVs".into()));
    }

    #[test]
    fn file_fetcher_reads_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("point.vert"), "void main() {}").unwrap();

        let fetcher = FileFetcher::new(dir.path());
        let text = block_on(fetcher.fetch_text("point.vert")).unwrap();
        assert_eq!(text, "void main() {}");
    }

    #[test]
    fn file_fetcher_reports_missing_file_as_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FileFetcher::new(dir.path());
        let err = block_on(fetcher.fetch_text("missing.frag")).unwrap_err();
        match err {
            FetchError::Transport { uri, .. } => assert_eq!(uri, "missing.frag"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
