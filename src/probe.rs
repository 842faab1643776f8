//! Reachability check for the server under test.

use std::time::Duration;

use tokio::net::TcpStream;

use crate::error::ToolError;
use crate::tool::ToolFuture;

/// Checks that a service accepts connections.
pub trait ServiceProbe: Send + Sync {
    /// Succeed if `address` (`host:port`) accepts a connection within `timeout`.
    fn check(&self, address: &str, timeout: Duration) -> ToolFuture<'_, ()>;
}

/// Opens a TCP connection and closes it again.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl ServiceProbe for TcpProbe {
    fn check(&self, address: &str, timeout: Duration) -> ToolFuture<'_, ()> {
        let target = address.to_owned();
        Box::pin(async move {
            let unreachable = |message: String| ToolError::Unreachable {
                address: target.clone(),
                message,
            };
            let stream = tokio::time::timeout(timeout, TcpStream::connect(target.as_str()))
                .await
                .map_err(|_| unreachable(format!("no answer within {timeout:?}")))?
                .map_err(|e| unreachable(e.to_string()))?;
            drop(stream);
            tracing::debug!(address = %target, "server accepted connection");
            Ok(())
        })
    }
}
