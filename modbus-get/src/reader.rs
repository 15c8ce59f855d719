use std::time::Duration;

use crate::constants::defaults;
use crate::decode::decode;
use crate::error::Error;
use crate::format::{format_values, ItemValue};
use crate::request::ReadRequest;
use crate::transport::{Connection, Transport, TransportLock};

/// Settings applied to every request of an [`ItemReader`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReaderConfig {
    /// bounds the connection attempt and the response
    pub timeout: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(defaults::TIMEOUT_SECS),
        }
    }
}

/// Serves item requests: validates the parameters, reads from the device and formats the result
pub struct ItemReader<T: Transport> {
    transport: T,
    lock: TransportLock,
    config: ReaderConfig,
}

impl<T: Transport> ItemReader<T> {
    /// Create a reader that shares the process-wide transport lock
    pub fn new(transport: T, config: ReaderConfig) -> Self {
        Self::with_lock(transport, config, TransportLock::global())
    }

    /// Create a reader that serializes device access through `lock`
    pub fn with_lock(transport: T, config: ReaderConfig, lock: TransportLock) -> Self {
        Self {
            transport,
            lock,
            config,
        }
    }

    /// Handle one item request
    ///
    /// `params` are the positional item parameters, endpoint first. Nothing is sent to the device
    /// unless every parameter is valid.
    pub async fn get<S: AsRef<str>>(&self, params: &[S]) -> Result<ItemValue, Error> {
        let request = ReadRequest::from_params(params)?;
        let raw = {
            let _guard = self.lock.acquire().await;
            let mut connection = self
                .transport
                .connect(&request.endpoint, request.slave_id, self.config.timeout)
                .await?;
            let result = connection
                .read(request.function, request.address, request.read_span())
                .await;
            connection.close().await;
            if let Err(err) = &result {
                tracing::warn!("read from {} failed: {err}", request.endpoint);
            }
            result?
        };

        let values = decode(&raw, &request)?;
        Ok(format_values(&values)?)
    }
}
