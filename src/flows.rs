//! High-level loopback flow facade.

pub mod handshake;
pub mod request;

mod listener;
mod loopback;
mod pages;

pub use handshake::*;
pub use request::*;

// self
use crate::{_prelude::*, browser::BrowserLauncher, http::TokenExchanger};
#[cfg(feature = "reqwest")]
use crate::{browser::SystemBrowser, http::ReqwestExchanger};

/// Coordinates one-shot localhost authorization flows.
///
/// The flow owns the token exchanger and browser launcher references so the orchestration in
/// [`LoopbackFlow::authorize`] can focus on session lifetime and callback validation. Every
/// `authorize` call creates its own session material and its own listener; nothing is shared
/// between calls.
#[derive(Clone)]
pub struct LoopbackFlow {
	/// Exchanger invoked with the authorization code and PKCE verifier.
	pub exchanger: Arc<dyn TokenExchanger>,
	/// Launcher that drives the user's browser to the authorization URL.
	pub browser: Arc<dyn BrowserLauncher>,
}
impl LoopbackFlow {
	/// Creates a flow from caller-provided exchanger + launcher parts.
	pub fn with_parts(
		exchanger: Arc<dyn TokenExchanger>,
		browser: Arc<dyn BrowserLauncher>,
	) -> Self {
		Self { exchanger, browser }
	}
}
#[cfg(feature = "reqwest")]
impl LoopbackFlow {
	/// Creates a flow backed by the crate's reqwest exchanger and the system browser.
	pub fn new() -> Self {
		Self::with_parts(Arc::new(ReqwestExchanger::default()), Arc::new(SystemBrowser))
	}
}
#[cfg(feature = "reqwest")]
impl Default for LoopbackFlow {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for LoopbackFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoopbackFlow").finish()
	}
}
