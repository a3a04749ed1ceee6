use std::fmt;
use std::net::IpAddr;

use url::Url;

use crate::ProvisionError;

/// Default Weaviate gRPC port.
pub const DEFAULT_GRPC_PORT: u16 = 50051;

// ---------------------------------------------------------------------------
// ConnectionTarget
// ---------------------------------------------------------------------------

/// A resolved Weaviate endpoint: HTTP channel plus the paired gRPC channel.
///
/// Built by [`resolve_target`] from a single URL-shaped configuration
/// string. The gRPC host always mirrors the HTTP host; the gRPC port is
/// [`DEFAULT_GRPC_PORT`] unless overridden after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// `http` or `https`.
    pub scheme: String,
    /// Hostname or IP literal. `localhost` is normalized to `127.0.0.1`.
    pub host: String,
    /// HTTP port. Must be explicit in the endpoint URL.
    pub port: u16,
    /// gRPC hostname, identical to `host`.
    pub grpc_host: String,
    /// gRPC port, defaults to 50051.
    pub grpc_port: u16,
}

/// How a session to the target is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    /// Loopback instance: local development convenience path.
    Local,
    /// Arbitrary remote endpoint with explicit transport parameters.
    Custom {
        /// HTTPS on the HTTP channel, inferred from the URL scheme.
        secure: bool,
    },
}

impl ConnectionTarget {
    /// Base URL of the HTTP channel, e.g. `http://127.0.0.1:8080`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Select the connection mode for this target.
    ///
    /// Any loopback host picks [`ConnectMode::Local`] regardless of port;
    /// everything else is [`ConnectMode::Custom`] with HTTPS taken from
    /// the original scheme.
    pub fn connect_mode(&self) -> ConnectMode {
        if self.is_loopback() {
            ConnectMode::Local
        } else {
            ConnectMode::Custom {
                secure: self.scheme == "https",
            }
        }
    }

    fn is_loopback(&self) -> bool {
        match self.host.parse::<IpAddr>() {
            Ok(ip) => ip.is_loopback(),
            Err(_) => self.host == "localhost",
        }
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (gRPC: {}:{})",
            self.base_url(),
            self.grpc_host,
            self.grpc_port
        )
    }
}

// ---------------------------------------------------------------------------
// resolve_target
// ---------------------------------------------------------------------------

/// Parse an endpoint URL into a [`ConnectionTarget`].
///
/// The URL must be absolute with an `http` or `https` scheme and carry an
/// explicit host and port, e.g. `http://127.0.0.1:8080`. A `localhost`
/// hostname is rewritten to `127.0.0.1` to sidestep platform-dependent
/// DNS/IPv6 resolution of the name.
pub fn resolve_target(endpoint: &str) -> Result<ConnectionTarget, ProvisionError> {
    let parsed = Url::parse(endpoint)
        .map_err(|e| ProvisionError::Config(format!("invalid endpoint URL {endpoint:?}: {e}")))?;

    let scheme = parsed.scheme().to_string();
    if scheme != "http" && scheme != "https" {
        return Err(ProvisionError::Config(format!(
            "unsupported scheme {scheme:?} in endpoint URL {endpoint:?}"
        )));
    }

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| {
            ProvisionError::Config(format!("endpoint URL {endpoint:?} has no hostname"))
        })?;
    // Url::port() reports None for an explicitly written default port
    // (http://host:80, https://host:443), so consult the raw authority
    // before rejecting the URL as portless.
    let port = match parsed.port() {
        Some(port) => port,
        None if authority_has_explicit_port(endpoint) => {
            parsed.port_or_known_default().ok_or_else(|| {
                ProvisionError::Config(format!("endpoint URL {endpoint:?} has no explicit port"))
            })?
        }
        None => {
            return Err(ProvisionError::Config(format!(
                "endpoint URL {endpoint:?} has no explicit port"
            )))
        }
    };

    let host = if host == "localhost" {
        tracing::debug!("resolved 'localhost' to '127.0.0.1' for connection");
        "127.0.0.1".to_string()
    } else {
        host.to_string()
    };

    Ok(ConnectionTarget {
        scheme,
        grpc_host: host.clone(),
        host,
        port,
        grpc_port: DEFAULT_GRPC_PORT,
    })
}

/// Whether the authority component of the URL text spells out a port.
fn authority_has_explicit_port(endpoint: &str) -> bool {
    let Some((_, rest)) = endpoint.split_once("://") else {
        return false;
    };
    let authority = rest
        .split(&['/', '?', '#'][..])
        .next()
        .unwrap_or(rest);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    // Skip past an IPv6 bracket before looking for the port separator.
    let tail = match host_port.rfind(']') {
        Some(i) => &host_port[i + 1..],
        None => host_port,
    };
    match tail.rfind(':') {
        Some(i) => {
            let digits = &tail[i + 1..];
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}
