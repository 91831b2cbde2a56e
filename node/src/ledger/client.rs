// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use paystream_kernel::snapshot::LedgerReading;
use paystream_kernel::types::StreamId;
use reqwest::Client;

use crate::errors::EngineError;
use crate::ledger::LedgerSource;

/// Reads stream state from a ledger-reader gateway over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    base_url: String,
    client: Client,
}

impl HttpLedgerClient {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_stream(&self, stream_id: &StreamId) -> Result<LedgerReading, EngineError> {
        let url = format!("{}/v1/streams/{}", self.base_url, stream_id);
        let resp = self.client.get(&url).send().await
            .map_err(|e| EngineError::Ledger(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EngineError::Ledger(format!("Stream request failed: {}", resp.status())));
        }

        let reading: LedgerReading = resp.json().await
            .map_err(|e| EngineError::Ledger(e.to_string()))?;

        if reading.stream_id != *stream_id {
            return Err(EngineError::Ledger(format!(
                "Gateway answered for {} when asked for {}",
                reading.stream_id, stream_id
            )));
        }
        Ok(reading)
    }
}

impl LedgerSource for HttpLedgerClient {
    fn read_stream<'a>(&'a self, stream_id: &'a StreamId) -> BoxFuture<'a, Result<LedgerReading, EngineError>> {
        self.get_stream(stream_id).boxed()
    }
}
