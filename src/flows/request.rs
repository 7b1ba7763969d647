//! Caller-supplied options describing one provider's endpoints.

// self
use crate::_prelude::*;

/// Default localhost callback port used when callers do not override it.
pub const DEFAULT_CALLBACK_PORT: u16 = 3000;

/// Immutable options for a single authorization flow.
///
/// The port doubles as shared configuration between the provider's registered redirect URI and
/// the one-shot listener, so it stays an explicit field rather than a hidden constant.
#[derive(Clone)]
pub struct AuthorizationRequest {
	/// OAuth client identifier; omitted for providers that do not require one.
	pub client_id: Option<String>,
	/// Confidential client secret forwarded to the token endpoint, when the provider needs one.
	pub client_secret: Option<String>,
	/// Provider authorization endpoint the browser is sent to.
	pub authorization_url: Url,
	/// Provider token endpoint used for the code exchange.
	pub token_url: Url,
	/// Redirect URI registered with the provider; defaults to the localhost callback.
	pub redirect_uri: Option<Url>,
	/// Scope string forwarded verbatim to the provider.
	pub scope: Option<String>,
	/// Localhost port the one-shot listener binds.
	pub port: u16,
	/// Bound on how long the flow waits for the browser callback; `None` waits indefinitely.
	pub timeout: Option<Duration>,
}
impl AuthorizationRequest {
	/// Creates a request for the provided authorization/token endpoint pair.
	pub fn new(authorization_url: Url, token_url: Url) -> Self {
		Self {
			client_id: None,
			client_secret: None,
			authorization_url,
			token_url,
			redirect_uri: None,
			scope: None,
			port: DEFAULT_CALLBACK_PORT,
			timeout: None,
		}
	}

	/// Sets the OAuth client identifier.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets or replaces the confidential client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Overrides the redirect URI registered with the provider.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Sets the scope string forwarded to the provider.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Overrides the localhost callback port (defaults to [`DEFAULT_CALLBACK_PORT`]).
	pub fn with_port(mut self, port: u16) -> Self {
		self.port = port;

		self
	}

	/// Bounds how long the flow waits for the browser callback.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Effective redirect URI: the caller override or the constructed localhost callback.
	pub fn effective_redirect_uri(&self) -> Result<Url> {
		match &self.redirect_uri {
			Some(redirect_uri) => Ok(redirect_uri.clone()),
			None => Url::parse(&format!("http://localhost:{}/callback", self.port))
				.map_err(|source| Error::InvalidRedirect { source }),
		}
	}
}
impl Debug for AuthorizationRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationRequest")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("authorization_url", &self.authorization_url)
			.field("token_url", &self.token_url)
			.field("redirect_uri", &self.redirect_uri)
			.field("scope", &self.scope)
			.field("port", &self.port)
			.field("timeout", &self.timeout)
			.finish()
	}
}
