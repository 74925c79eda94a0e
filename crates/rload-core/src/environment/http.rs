//! Injector fetching `http(s)://` resources with libcurl.

use std::time::Duration;

use super::{Document, InjectError, ResourceInjector};
use crate::descriptor::ResourceDescriptor;

/// Fetches resources over HTTP and attaches the body to a `Document`.
///
/// The transfer runs on a blocking thread. The loader's own timeout decides
/// when an attempt failed; `transfer_timeout` only bounds the thread.
#[derive(Debug, Clone)]
pub struct HttpInjector {
    document: Document,
    transfer_timeout: Duration,
}

impl HttpInjector {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            transfer_timeout: Duration::from_secs(60),
        }
    }

    /// Bound on a single curl transfer; the CLI sets it to the per-attempt timeout.
    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }
}

/// Performs a GET and returns the body. Blocking; call from `spawn_blocking`.
fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>, InjectError> {
    let mut body = Vec::new();
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15).min(timeout))?;
    easy.timeout(timeout)?;
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(InjectError::Http(code));
    }
    Ok(body)
}

impl ResourceInjector for HttpInjector {
    async fn inject(&self, resource: &ResourceDescriptor) -> Result<(), InjectError> {
        if !(resource.url.starts_with("http://") || resource.url.starts_with("https://")) {
            return Err(InjectError::UnsupportedUrl(resource.url.clone()));
        }
        let url = resource.url.clone();
        let timeout = self.transfer_timeout;
        let content = tokio::task::spawn_blocking(move || fetch(&url, timeout))
            .await
            .map_err(|e| InjectError::Other(format!("fetch task join: {}", e)))??;
        self.document.attach(resource, content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Instant;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn transfer_timeout_bounds_a_stalled_server() {
        // Accepts connections into the backlog but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/stall.js", listener.local_addr().unwrap());

        let document = Document::new();
        let injector =
            HttpInjector::new(document.clone()).with_transfer_timeout(Duration::from_millis(300));
        let started = Instant::now();
        let err = injector
            .inject(&ResourceDescriptor::new(url, "stall"))
            .await
            .unwrap_err();
        assert!(matches!(err, InjectError::Curl(_)), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(document.is_empty());
        drop(listener);
    }

    #[tokio::test]
    async fn rejects_non_http_urls() {
        let injector = HttpInjector::new(Document::new());
        let err = injector
            .inject(&ResourceDescriptor::new("file:///tmp/a.js", "a"))
            .await
            .unwrap_err();
        assert!(matches!(err, InjectError::UnsupportedUrl(_)));
    }
}
