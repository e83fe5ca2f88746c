//! A host page backed by a fetched HTML snapshot.

use super::{HostPage, HAVE_ENOUGH_DATA};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use tracing::{debug, instrument};

/// Watch page markup as served, without a running player.
///
/// There is nothing to wait for, so the video reports itself fully loaded, and
/// activation cannot change the markup. Rendered-only structures such as the
/// transcript panel are therefore absent unless the snapshot was taken from a
/// rendered page.
#[derive(Debug, Clone)]
pub struct SnapshotPage {
    address: String,
    html: String,
}

impl SnapshotPage {
    /// Wrap markup that was captured elsewhere.
    pub fn new(address: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            html: html.into(),
        }
    }

    /// Fetch the page at `address`.
    #[instrument(skip(client))]
    pub async fn fetch(client: &reqwest::Client, address: &str, hl: &str) -> Result<Self> {
        let response = client
            .get(address)
            .header(ACCEPT_LANGUAGE, hl)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        debug!("Fetched {} bytes of page markup", html.len());
        Ok(Self::new(address, html))
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

#[async_trait]
impl HostPage for SnapshotPage {
    fn address(&self) -> &str {
        &self.address
    }

    async fn document(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn video_ready_state(&self) -> Option<u8> {
        Some(HAVE_ENOUGH_DATA)
    }

    async fn activate(&self, selector: &str) -> Result<()> {
        debug!("Snapshot page ignores activation of {}", selector);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/video-page")
            .match_header("accept-language", "fr")
            .with_status(200)
            .with_body("<html><title>Video</title></html>")
            .create_async()
            .await;

        let address = format!("{}/video-page", server.url());
        let page = SnapshotPage::fetch(&reqwest::Client::new(), &address, "fr")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.address(), address);
        assert!(page.document().await.unwrap().contains("<title>Video</title>"));
        assert_eq!(page.video_ready_state().await, Some(HAVE_ENOUGH_DATA));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/watch")
            .with_status(429)
            .create_async()
            .await;

        let address = format!("{}/watch", server.url());
        assert!(SnapshotPage::fetch(&reqwest::Client::new(), &address, "en").await.is_err());
    }
}
