//! Loopback flow orchestration: bind, launch, validate, exchange, close.

// crates.io
use tracing::Instrument;
// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	browser::BrowserLauncher as _,
	flows::{
		LoopbackFlow,
		handshake::{self, Handshake},
		listener::{CallbackListener, CallbackQuery, CallbackResponder},
		pages,
		request::AuthorizationRequest,
	},
	http::TokenExchanger as _,
	obs::{self, FlowOutcome},
};

impl LoopbackFlow {
	/// Runs one complete authorization-code + PKCE flow against the request's provider.
	///
	/// The call suspends until the browser callback resolves the session, the session fails, or
	/// the optional waiting bound elapses. The one-shot listener is closed on every exit branch;
	/// requests arriving after resolution are refused at the TCP level.
	pub async fn authorize(&self, request: AuthorizationRequest) -> Result<TokenResponse> {
		let span = obs::flow_span("authorize");

		obs::record_flow_outcome(FlowOutcome::Attempt);

		let result = self.drive(request).instrument(span).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(FlowOutcome::Failure),
		}

		result
	}

	async fn drive(&self, request: AuthorizationRequest) -> Result<TokenResponse> {
		let handshake = Handshake::generate();
		let redirect_uri = request.effective_redirect_uri()?;
		// The listener owns the port for exactly this scope; every return path below drops it,
		// which is what closes the one-shot socket.
		let mut listener = CallbackListener::bind(request.port).await?;
		let authorize_url = handshake::build_authorize_url(&request, &redirect_uri, &handshake);

		tracing::info!(port = request.port, "Callback listener ready; opening the browser.");

		if let Err(e) = self.browser.open(&authorize_url) {
			tracing::warn!("Failed to open the system browser: {e}.");
			tracing::info!(%authorize_url, "Authorize manually by visiting the URL.");
		}

		let (query, responder) = match request.timeout {
			Some(bound) =>
				match tokio::time::timeout(bound.unsigned_abs(), listener.next_callback()).await {
					Ok(callback) => callback?,
					Err(_) => return Err(Error::TimedOut { waited: bound }),
				},
			None => listener.next_callback().await?,
		};

		self.resolve_callback(query, responder, &handshake, &redirect_uri, &request).await
	}

	/// Applies the callback checks in their mandated order: provider error, state binding,
	/// code presence, then the code-for-token exchange.
	async fn resolve_callback(
		&self,
		query: CallbackQuery,
		responder: CallbackResponder,
		handshake: &Handshake,
		redirect_uri: &Url,
		request: &AuthorizationRequest,
	) -> Result<TokenResponse> {
		if let Some(detail) = query.error {
			responder.send(pages::provider_error(&detail)).await;

			return Err(Error::ProviderDenied { detail });
		}

		if !query.state.as_deref().is_some_and(|returned| handshake.state_matches(returned)) {
			tracing::warn!("Rejecting a callback whose state does not match this session.");

			responder.send(pages::security_error()).await;

			return Err(Error::CsrfMismatch);
		}

		let Some(code) = query.code else {
			responder.send(pages::missing_code()).await;

			return Err(Error::MissingCode);
		};

		match self
			.exchanger
			.exchange(&code, handshake.pkce().verifier(), redirect_uri, request)
			.await
		{
			Ok(tokens) => {
				responder.send(pages::success()).await;

				Ok(tokens)
			},
			Err(e) => {
				responder.send(pages::exchange_failed(&e.to_string())).await;

				Err(e.into())
			},
		}
	}
}
