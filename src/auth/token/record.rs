//! Persisted token record with creation and expiry instants.

// crates.io
use time::serde::rfc3339;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Single token record persisted by the [`TokenStore`](crate::store::TokenStore).
///
/// Serialized as `{accessToken, createdAt, expiresAt?}` with RFC 3339 timestamps; the file at a
/// given path always holds exactly one record and is replaced wholesale on every write.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Instant the record was written.
	#[serde(with = "rfc3339")]
	pub created_at: OffsetDateTime,
	/// Expiry instant, when the provider reported a token lifetime.
	#[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub expires_at: Option<OffsetDateTime>,
}
impl StoredToken {
	/// Builds a record stamped with the current clock.
	pub fn issued_now(access_token: impl Into<String>, expires_in: Option<Duration>) -> Self {
		let created_at = OffsetDateTime::now_utc();

		Self {
			access_token: TokenSecret::new(access_token),
			created_at,
			expires_at: expires_in.map(|delta| created_at + delta),
		}
	}

	/// Returns `true` while the record has not passed its expiry instant.
	///
	/// Records without an expiry never expire.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		match self.expires_at {
			Some(expires_at) => instant < expires_at,
			None => true,
		}
	}

	/// Convenience helper evaluating [`Self::is_valid_at`] against the current clock.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}
impl Debug for StoredToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StoredToken")
			.field("access_token", &"<redacted>")
			.field("created_at", &self.created_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
