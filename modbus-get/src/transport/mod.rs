//! Access to the device behind an [`Endpoint`].
//!
//! The reader talks to devices through the [`Transport`] and [`Connection`] traits so that the
//! normalization and decoding pipeline can be exercised without hardware. [`RodbusTransport`] is
//! the production implementation on top of the `rodbus` client channels.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::decode::RawData;
use crate::endpoint::Endpoint;
use crate::error::TransportError;
use crate::types::FunctionCode;

mod channel;

pub use channel::{RodbusConnection, RodbusTransport};

/// Opens connections to Modbus devices
pub trait Transport: Send + Sync {
    /// connection produced by this transport
    type Connection: Connection;

    /// Connect to `endpoint` and select `slave_id` for subsequent reads
    ///
    /// `timeout` bounds both the connection attempt and every response.
    fn connect(
        &self,
        endpoint: &Endpoint,
        slave_id: u8,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// An open connection to a single device
pub trait Connection: Send {
    /// Read `count` bits or registers starting at the 0-based `address`
    fn read(
        &mut self,
        function: FunctionCode,
        address: u16,
        count: u16,
    ) -> impl Future<Output = Result<RawData, TransportError>> + Send;

    /// Close the connection
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Serializes device access between concurrent readers
///
/// Only one connect/read/close sequence runs at a time for all readers sharing a lock.
#[derive(Clone, Debug, Default)]
pub struct TransportLock {
    inner: Arc<tokio::sync::Mutex<()>>,
}

impl TransportLock {
    /// Create a lock that is independent of the process-wide one
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock shared by every reader in the process
    pub fn global() -> Self {
        static GLOBAL: OnceLock<TransportLock> = OnceLock::new();
        GLOBAL.get_or_init(TransportLock::new).clone()
    }

    pub(crate) async fn acquire(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn global_lock_is_shared() {
        let first = TransportLock::global();
        let second = TransportLock::global();
        let _guard = first.acquire().await;
        assert!(second.inner.try_lock().is_err());
    }

    #[tokio::test]
    async fn separate_locks_are_independent() {
        let first = TransportLock::new();
        let second = TransportLock::new();
        let _guard = first.acquire().await;
        assert!(second.inner.try_lock().is_ok());
    }
}
