//! Map image retrieval.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info};

use geolabel_core::BoundingBox;
use geolabel_render::{decode_image, RenderBuffer, RenderError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("map request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("map service answered HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("map service returned an unusable image: {0}")]
    Decode(#[from] RenderError),
}

/// Anything that can produce the base map image for a bounding box.
pub trait ImageFetcher: Send + Sync {
    /// Fetch a `size_px`×`size_px` image covering exactly `bbox`.
    fn fetch_image(&self, bbox: &BoundingBox, size_px: u32) -> Result<RenderBuffer, FetchError>;
}

/// Substitute the bounding box and size into a request URL template.
pub fn fill_url_template(template: &str, bbox: &BoundingBox, size_px: u32) -> String {
    let size = size_px.to_string();
    template
        .replace("{bbox}", &bbox.to_wms_string())
        .replace("{west}", &bbox.west.to_string())
        .replace("{south}", &bbox.south.to_string())
        .replace("{east}", &bbox.east.to_string())
        .replace("{north}", &bbox.north.to_string())
        .replace("{width}", &size)
        .replace("{height}", &size)
        .replace("{size}", &size)
}

/// Fetches map images over HTTP from a WMS-style URL template.
///
/// One attempt per request; retrying is left to the operator.
pub struct HttpImageFetcher {
    client: Client,
    url_template: String,
}

impl HttpImageFetcher {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("geolabel/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch_image(&self, bbox: &BoundingBox, size_px: u32) -> Result<RenderBuffer, FetchError> {
        let url = fill_url_template(&self.url_template, bbox, size_px);
        debug!(%url, "Requesting map image");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let bytes = response.bytes()?;
        let image = decode_image(&bytes)?;
        info!(
            width = image.width,
            height = image.height,
            bytes = bytes.len(),
            "Fetched map image"
        );
        Ok(image)
    }
}
