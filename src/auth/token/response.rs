//! Token endpoint response model.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Successful token endpoint payload mapped from the provider's JSON body.
///
/// Only `access_token` is required for a 2xx body to be considered well formed; every other
/// field is provider-dependent and mapped when present.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Access token used to call the protected API on behalf of the user.
	pub access_token: TokenSecret,
	/// Refresh token, when the provider issues one.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Relative token lifetime in seconds, when the provider reports one.
	#[serde(default)]
	pub expires_in: Option<u64>,
	/// Token type label, usually `bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
}
impl TokenResponse {
	/// Relative token lifetime as a [`Duration`], when the provider reported one.
	pub fn lifetime(&self) -> Option<Duration> {
		self.expires_in.and_then(|secs| i64::try_from(secs).ok()).map(Duration::seconds)
	}
}
