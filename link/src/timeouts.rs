//! Timeout configuration for FMS client operations.
//!
//! Centralizes the deadlines applied to script requests and uploads.

use std::time::Duration;

/// Timeout configuration for FMS client operations.
///
/// # Examples
///
/// ```rust
/// use fms_link::FmsLinkTimeouts;
/// use std::time::Duration;
///
/// // Defaults: 30 second request deadline
/// let timeouts = FmsLinkTimeouts::default();
///
/// // Custom deadlines for a slow deployment
/// let timeouts = FmsLinkTimeouts::builder()
///     .request_timeout(Duration::from_secs(60))
///     .build();
///
/// // Short deadlines for a local mock endpoint
/// let timeouts = FmsLinkTimeouts::fast();
/// ```
#[derive(Debug, Clone)]
pub struct FmsLinkTimeouts {
    /// Timeout for establishing connections (TCP + TLS handshake).
    /// Default: 10 seconds
    pub connection_timeout: Duration,

    /// Deadline for a callback invocation to arrive after a request is issued.
    /// Applies to script requests and multipart uploads alike.
    /// Default: 30 seconds
    pub request_timeout: Duration,
}

impl Default for FmsLinkTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl FmsLinkTimeouts {
    /// Create a new builder for custom timeout configuration.
    pub fn builder() -> FmsLinkTimeoutsBuilder {
        FmsLinkTimeoutsBuilder::new()
    }

    /// Short deadlines suitable for a local endpoint.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Long deadlines for slow script deployments or unreliable networks.
    pub fn relaxed() -> Self {
        Self {
            connection_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Check if a duration represents "no timeout" (zero or very large).
    pub fn is_no_timeout(duration: Duration) -> bool {
        duration.is_zero() || duration > Duration::from_secs(86400 * 365)
    }
}

/// Builder for creating custom [`FmsLinkTimeouts`] configurations.
#[derive(Debug, Clone)]
pub struct FmsLinkTimeoutsBuilder {
    timeouts: FmsLinkTimeouts,
}

impl FmsLinkTimeoutsBuilder {
    fn new() -> Self {
        Self {
            timeouts: FmsLinkTimeouts::default(),
        }
    }

    /// Set the connection timeout (TCP + TLS handshake).
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connection_timeout = timeout;
        self
    }

    /// Set the connection timeout in seconds.
    pub fn connection_timeout_secs(self, secs: u64) -> Self {
        self.connection_timeout(Duration::from_secs(secs))
    }

    /// Set the request deadline.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set the request deadline in seconds.
    pub fn request_timeout_secs(self, secs: u64) -> Self {
        self.request_timeout(Duration::from_secs(secs))
    }

    /// Build the timeout configuration.
    pub fn build(self) -> FmsLinkTimeouts {
        self.timeouts
    }
}
