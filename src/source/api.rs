//! HTTP JSON source adapter
//!
//! Fetches a JSON array of record objects from an endpoint with a GET
//! request. Ambient keys in the response objects are ignored.

use crate::batch::{Batch, Record, SourceTag};
use crate::error::ExtractionError;
use crate::etl::Extractor;

use reqwest::StatusCode;
use url::Url;

/// Extractor for HTTP JSON endpoints
///
/// The response body must be a JSON array whose elements each map to a
/// record (`identifier`, `date`, `quantity`, `price`); array order is
/// preserved and every record is tagged `api`.
///
/// # Example
/// ```no_run
/// use tabular_etl::etl::Extractor;
/// use tabular_etl::source::JsonApiExtractor;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("https://api.example.com/data")?;
/// let batch = JsonApiExtractor::new(url).extract().await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonApiExtractor {
    url: Url,
    client: reqwest::Client,
}

impl JsonApiExtractor {
    /// Create an extractor for the given endpoint
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_records(&self) -> Result<Vec<Record>, ExtractionError> {
        let resource = self.url.to_string();

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|error| ExtractionError::Transport {
                resource: resource.clone(),
                message: error.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ExtractionError::NotFound { resource });
        }
        if !status.is_success() {
            return Err(ExtractionError::Transport {
                resource,
                message: format!("unexpected status {status}"),
            });
        }

        response.json::<Vec<Record>>().await.map_err(|error| {
            if error.is_decode() {
                ExtractionError::MalformedPayload {
                    resource: resource.clone(),
                    message: error.to_string(),
                }
            } else {
                ExtractionError::Transport {
                    resource: resource.clone(),
                    message: error.to_string(),
                }
            }
        })
    }
}

impl Extractor for JsonApiExtractor {
    async fn extract(&self) -> Result<Batch, ExtractionError> {
        log::debug!("Fetching {}", self.url);

        let records = self.fetch_records().await?;

        log::info!("Extracted {} record(s) from {}", records.len(), self.url);

        Ok(Batch::new(SourceTag::Api, records))
    }
}
