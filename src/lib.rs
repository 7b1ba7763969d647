//! Localhost OAuth 2.0 for CLIs—one-shot PKCE callback listeners, code-for-token exchanges, and
//! owner-locked token files in one crate built for terminal sign-in.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod browser;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod store;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use httpmock as _;
