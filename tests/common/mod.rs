//! Shared fixtures for the loopback integration tests: a scripted browser that plays the
//! provider's redirect, and a counting stub exchanger.

#![allow(dead_code)]

// std
use std::{
	collections::HashMap,
	io,
	net::TcpListener as StdTcpListener,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use oauth2_loopback::{
	auth::{TokenResponse, TokenSecret},
	browser::BrowserLauncher,
	error::ExchangeError,
	flows::{AuthorizationRequest, LoopbackFlow},
	http::{ExchangeFuture, ReqwestExchanger, TokenExchanger},
	reqwest,
	url::Url,
};

/// Reserves a free loopback port by briefly binding port zero.
pub fn free_port() -> u16 {
	let listener =
		StdTcpListener::bind("127.0.0.1:0").expect("Failed to reserve a loopback port for tests.");

	listener.local_addr().expect("Reserved socket should expose a local address.").port()
}

/// Request fixture pointing at the provided provider endpoints.
pub fn request_fixture(authorization_url: &str, token_url: &str, port: u16) -> AuthorizationRequest {
	let authorization_url = Url::parse(authorization_url)
		.expect("Authorization endpoint fixture should parse successfully.");
	let token_url =
		Url::parse(token_url).expect("Token endpoint fixture should parse successfully.");

	AuthorizationRequest::new(authorization_url, token_url)
		.with_client_id("client-it")
		.with_scope("openid profile")
		.with_port(port)
}

/// Request fixture for scenarios that never reach the provider endpoints.
pub fn offline_request(port: u16) -> AuthorizationRequest {
	request_fixture("http://localhost:9/authorize", "http://localhost:9/token", port)
}

/// How a [`ScriptedBrowser`] answers the authorization URL on the provider's behalf.
#[derive(Clone, Copy, Debug)]
pub enum RedirectScript {
	/// Redirect to the callback with the session state and the given code.
	Grant { code: &'static str },
	/// Redirect with an attacker-controlled state value instead of the session's.
	ForgedState { code: &'static str, state: &'static str },
	/// Redirect carrying a provider-side authorization error.
	Deny { error: &'static str },
	/// Redirect with the session state but neither code nor error.
	Empty,
	/// Request an unrelated path first, then grant.
	StrayThenGrant { code: &'static str },
	/// Never contact the callback at all.
	Silent,
}

/// Browser stand-in that plays both browser and provider: it parses the authorization URL and
/// immediately issues the scripted redirect against the callback listener.
#[derive(Clone, Debug)]
pub struct ScriptedBrowser {
	script: RedirectScript,
}
impl ScriptedBrowser {
	pub fn new(script: RedirectScript) -> Self {
		Self { script }
	}
}
impl BrowserLauncher for ScriptedBrowser {
	fn open(&self, url: &Url) -> io::Result<()> {
		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
		let redirect = pairs
			.get("redirect_uri")
			.cloned()
			.expect("Authorization URL should carry a redirect_uri parameter.");
		let state = pairs.get("state").cloned().unwrap_or_default();
		let script = self.script;

		tokio::spawn(async move {
			match script {
				RedirectScript::Grant { code } => {
					let _ = reqwest::get(format!("{redirect}?code={code}&state={state}")).await;
				},
				RedirectScript::ForgedState { code, state: forged } => {
					let _ = reqwest::get(format!("{redirect}?code={code}&state={forged}")).await;
				},
				RedirectScript::Deny { error } => {
					let _ = reqwest::get(format!("{redirect}?error={error}&state={state}")).await;
				},
				RedirectScript::Empty => {
					let _ = reqwest::get(format!("{redirect}?state={state}")).await;
				},
				RedirectScript::StrayThenGrant { code } => {
					let mut stray =
						Url::parse(&redirect).expect("Redirect URI fixture should parse.");

					stray.set_path("/healthz");

					let _ = reqwest::get(stray).await;
					let _ = reqwest::get(format!("{redirect}?code={code}&state={state}")).await;
				},
				RedirectScript::Silent => {},
			}
		});

		Ok(())
	}
}

/// Canned outcome returned by a [`RecordingExchanger`].
#[derive(Clone, Copy, Debug)]
pub enum CannedExchange {
	/// Resolve with a bearer token response.
	Grant { access_token: &'static str },
	/// Fail with a rejection carrying the given HTTP status.
	Reject { status: u16 },
}

/// Counting stub exchanger used to assert short-circuit behavior.
#[derive(Debug)]
pub struct RecordingExchanger {
	calls: AtomicUsize,
	behavior: CannedExchange,
}
impl RecordingExchanger {
	pub fn new(behavior: CannedExchange) -> Arc<Self> {
		Arc::new(Self { calls: AtomicUsize::new(0), behavior })
	}

	/// Returns how many times [`TokenExchanger::exchange`] was invoked.
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenExchanger for RecordingExchanger {
	fn exchange<'a>(
		&'a self,
		_code: &'a str,
		_code_verifier: &'a str,
		_redirect_uri: &'a Url,
		_request: &'a AuthorizationRequest,
	) -> ExchangeFuture<'a> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			match self.behavior {
				CannedExchange::Grant { access_token } => Ok(TokenResponse {
					access_token: TokenSecret::new(access_token),
					refresh_token: None,
					expires_in: Some(3_600),
					token_type: Some("bearer".into()),
				}),
				CannedExchange::Reject { status } =>
					Err(ExchangeError::Rejected { status, body: "stub rejection".into() }),
			}
		})
	}
}

/// Builds a flow wired to a scripted browser and the crate's reqwest exchanger.
pub fn scripted_flow(script: RedirectScript) -> LoopbackFlow {
	LoopbackFlow::with_parts(
		Arc::new(ReqwestExchanger::default()),
		Arc::new(ScriptedBrowser::new(script)),
	)
}

/// Builds a flow wired to a scripted browser and a counting stub exchanger.
pub fn stubbed_flow(
	script: RedirectScript,
	behavior: CannedExchange,
) -> (LoopbackFlow, Arc<RecordingExchanger>) {
	let exchanger = RecordingExchanger::new(behavior);
	let flow = LoopbackFlow::with_parts(exchanger.clone(), Arc::new(ScriptedBrowser::new(script)));

	(flow, exchanger)
}
