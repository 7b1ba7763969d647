//! Crate-level error types shared across the flow, exchanger, and store.

// std
use std::io;
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal failure value of a loopback authorization flow.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The callback port is already bound by another process or flow.
	#[error("Callback port {port} is already in use.")]
	PortInUse {
		/// Port requested for the one-shot listener.
		port: u16,
		/// Underlying bind failure.
		#[source]
		source: io::Error,
	},
	/// The callback listener failed at the socket level after binding.
	#[error("Callback listener failed.")]
	Listener(#[source] io::Error),
	/// Provider signaled an error in the authorization callback.
	#[error("Provider returned an authorization error: {detail}.")]
	ProviderDenied {
		/// The `error` query parameter forwarded by the provider.
		detail: String,
	},
	/// Returned state did not match the session state.
	#[error("Authorization state mismatch; rejecting the callback.")]
	CsrfMismatch,
	/// Callback carried neither an error nor an authorization code.
	#[error("Authorization callback did not include a code parameter.")]
	MissingCode,
	/// Code-for-token exchange failed.
	#[error(transparent)]
	Exchange(#[from] ExchangeError),
	/// The localhost redirect URI could not be constructed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// No callback arrived within the configured waiting bound.
	#[error("Authorization flow timed out after {waited}.")]
	TimedOut {
		/// Configured waiting bound.
		waited: Duration,
	},
	/// Token store failure surfaced to flow callers.
	#[error(transparent)]
	Store(#[from] crate::store::StoreError),
}

/// Failures produced by [`TokenExchanger`](crate::http::TokenExchanger) implementations.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Token endpoint answered with a non-2xx status.
	#[error("Token endpoint rejected the exchange with HTTP {status}: {body}.")]
	Rejected {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Response body, forwarded for operator diagnostics.
		body: String,
	},
	/// Transport failure (DNS, TCP, TLS) while calling the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token endpoint returned 2xx but the body is not a usable token response.
	#[error("Token endpoint returned a malformed token response.")]
	MalformedResponse {
		/// Structured parsing failure carrying the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ExchangeError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ExchangeError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}
