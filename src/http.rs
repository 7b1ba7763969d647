//! Transport seam for the authorization-code token exchange.
//!
//! [`TokenExchanger`] is the flow's only dependency on an HTTP stack. The default
//! reqwest-backed implementation speaks the plain `application/x-www-form-urlencoded` token
//! request; tests substitute counting stubs through the same trait.

// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	error::ExchangeError,
	flows::AuthorizationRequest,
};

/// Boxed future returned by [`TokenExchanger`] implementations.
pub type ExchangeFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TokenResponse, ExchangeError>> + 'a + Send>>;

/// Contract for exchanging an authorization code plus PKCE verifier for tokens.
pub trait TokenExchanger
where
	Self: Send + Sync,
{
	/// Performs the `authorization_code` grant against `request.token_url`.
	///
	/// `redirect_uri` must be the exact value that was sent in the authorization request; the
	/// orchestrator computes it once per session and passes it to both sides.
	fn exchange<'a>(
		&'a self,
		code: &'a str,
		code_verifier: &'a str,
		redirect_uri: &'a Url,
		request: &'a AuthorizationRequest,
	) -> ExchangeFuture<'a>;
}

/// Reqwest-backed exchanger used by [`LoopbackFlow::new`](crate::flows::LoopbackFlow::new).
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestExchanger(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestExchanger {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl TokenExchanger for ReqwestExchanger {
	fn exchange<'a>(
		&'a self,
		code: &'a str,
		code_verifier: &'a str,
		redirect_uri: &'a Url,
		request: &'a AuthorizationRequest,
	) -> ExchangeFuture<'a> {
		Box::pin(async move {
			let mut form = vec![
				("grant_type", "authorization_code"),
				("code", code),
				("redirect_uri", redirect_uri.as_str()),
				("code_verifier", code_verifier),
			];

			if let Some(client_id) = request.client_id.as_deref() {
				form.push(("client_id", client_id));
			}
			if let Some(client_secret) = request.client_secret.as_deref() {
				form.push(("client_secret", client_secret));
			}

			let response = self
				.0
				.post(request.token_url.clone())
				.form(&form)
				.send()
				.await
				.map_err(ExchangeError::from)?;
			let status = response.status();
			let body = response.text().await.map_err(ExchangeError::from)?;

			if !status.is_success() {
				return Err(ExchangeError::Rejected { status: status.as_u16(), body });
			}

			decode_token_response(&body)
		})
	}
}

/// Decodes a 2xx token endpoint body, rejecting payloads without a usable access token.
pub fn decode_token_response(body: &str) -> Result<TokenResponse, ExchangeError> {
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ExchangeError::MalformedResponse { source })
}
