//! Per-session PKCE and CSRF-state material.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, flows::AuthorizationRequest};

const STATE_ENTROPY_BYTES: usize = 32;
const VERIFIER_ENTROPY_BYTES: usize = 32;

/// Supported PKCE challenge methods for the loopback flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// PKCE verifier/challenge pair bound to one flow session.
#[derive(Clone)]
pub struct PkcePair {
	verifier: String,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	pub(crate) fn generate() -> Self {
		let verifier = random_token(VERIFIER_ENTROPY_BYTES);
		let challenge = compute_challenge(&verifier);

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}

	/// PKCE code challenge derived from the secret verifier.
	pub fn challenge(&self) -> &str {
		&self.challenge
	}

	/// PKCE challenge method (currently always `S256`).
	pub fn method(&self) -> PkceCodeChallengeMethod {
		self.method
	}

	pub(crate) fn verifier(&self) -> &str {
		&self.verifier
	}
}
impl Debug for PkcePair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PkcePair")
			.field("verifier", &"<redacted>")
			.field("challenge", &self.challenge)
			.field("method", &self.method)
			.finish()
	}
}

/// CSRF state plus PKCE material generated once per session, before the listener binds.
///
/// The state token and the PKCE verifier are drawn independently from the thread CSPRNG; an
/// entropy-source failure aborts inside `rand` before any socket exists.
#[derive(Clone, Debug)]
pub struct Handshake {
	state: String,
	pkce: PkcePair,
}
impl Handshake {
	/// Generates fresh session material.
	pub fn generate() -> Self {
		Self { state: random_token(STATE_ENTROPY_BYTES), pkce: PkcePair::generate() }
	}

	/// Opaque state value that must round-trip through the authorization redirect.
	pub fn state(&self) -> &str {
		&self.state
	}

	/// PKCE pair for this session.
	pub fn pkce(&self) -> &PkcePair {
		&self.pkce
	}

	/// Compares the returned `state` parameter against the session's value.
	pub fn state_matches(&self, returned_state: &str) -> bool {
		returned_state == self.state
	}
}

/// Composes the provider authorization URL for one session.
pub(crate) fn build_authorize_url(
	request: &AuthorizationRequest,
	redirect_uri: &Url,
	handshake: &Handshake,
) -> Url {
	let mut url = request.authorization_url.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");

	if let Some(client_id) = &request.client_id {
		pairs.append_pair("client_id", client_id);
	}

	pairs.append_pair("redirect_uri", redirect_uri.as_str());
	pairs.append_pair("state", handshake.state());
	pairs.append_pair("code_challenge", handshake.pkce().challenge());
	pairs.append_pair("code_challenge_method", handshake.pkce().method().as_str());

	if let Some(scope) = &request.scope {
		pairs.append_pair("scope", scope);
	}

	drop(pairs);

	url
}

fn random_token(entropy_bytes: usize) -> String {
	let mut bytes = vec![0_u8; entropy_bytes];

	rand::rng().fill_bytes(&mut bytes);

	URL_SAFE_NO_PAD.encode(bytes)
}

fn compute_challenge(verifier: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(verifier.as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}
