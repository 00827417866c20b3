use std::future::Future;

use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::digest::PrefixKey;
use crate::error::{Error, Result};
use crate::range::{RangeParser, SuffixRecord};

/// Outcome of a range fetch.
///
/// A fetch can fail halfway through the body, so the records read before the
/// failure travel alongside the error instead of being discarded.
#[derive(Debug, Default)]
pub struct RangeResponse {
    pub records: Vec<SuffixRecord>,
    pub error: Option<Error>,
}

impl RangeResponse {
    pub fn failed(error: Error) -> Self {
        Self { records: Vec::new(), error: Some(error) }
    }

    /// All-or-nothing view: any error discards the partial records.
    pub fn into_result(self) -> Result<Vec<SuffixRecord>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.records),
        }
    }

    /// Drops zero-count decoys added by the service when padding is requested.
    pub fn without_padding(mut self) -> Self {
        self.records.retain(|record| record.frequency > 0);
        self
    }
}

/// Something that can answer a range query for a prefix.
pub trait RangeSource {
    fn fetch_range(&self, prefix: &PrefixKey) -> impl Future<Output = RangeResponse> + Send;
}

/// Range source backed by the HTTP range API.
#[derive(Clone, Debug)]
pub struct HttpRangeSource {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpRangeSource {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

impl RangeSource for HttpRangeSource {
    #[instrument(level = "debug", skip_all, fields(prefix = %prefix))]
    async fn fetch_range(&self, prefix: &PrefixKey) -> RangeResponse {
        let url = self.config.range_url(prefix.as_str());

        let mut request = self.client.get(&url);
        if self.config.add_padding {
            request = request.header("Add-Padding", "true");
        }

        // The response owns the connection; every return below drops it.
        let mut response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                return RangeResponse::failed(Error::Transport {
                    prefix: prefix.to_string(),
                    source,
                });
            }
        };

        if !response.status().is_success() {
            return RangeResponse::failed(Error::HttpStatus {
                prefix: prefix.to_string(),
                status: response.status().as_u16(),
            });
        }

        let mut parser = RangeParser::new(prefix.clone());
        let result = loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = parser.feed(&chunk) {
                        break parser.into_response(Some(e));
                    }
                }
                Ok(None) => break parser.finish(),
                Err(source) => {
                    break parser.into_response(Some(Error::Transport {
                        prefix: prefix.to_string(),
                        source,
                    }));
                }
            }
        };

        debug!(records = result.records.len(), failed = result.error.is_some(), "range fetched");

        if self.config.add_padding { result.without_padding() } else { result }
    }
}
