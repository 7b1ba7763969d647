//! File-backed token persistence with owner-only permissions.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::{Path, PathBuf},
};
#[cfg(unix)] use std::os::unix::fs::PermissionsExt;
// self
use crate::{
	_prelude::*,
	auth::{StoredToken, TokenSecret},
};

/// Conventional hidden workspace directory holding CLI state.
const WORKSPACE_DIR: &str = ".createsuite";
/// Token record file name inside the workspace directory.
const TOKEN_FILE: &str = "oauth-token.json";
#[cfg(unix)]
const OWNER_ONLY_MODE: u32 = 0o600;

/// Error type produced by [`TokenStore`] write and delete operations.
///
/// Read paths never surface these; a record that cannot be read or parsed is reported as
/// "no token" instead.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// Serialization failure while encoding the record.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Filesystem failure for the storage path.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Persists the single token record for a workspace.
#[derive(Clone, Debug)]
pub struct TokenStore {
	path: PathBuf,
}
impl TokenStore {
	/// Opens a store whose record lives at the provided path.
	pub fn open(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Opens the conventional store under a workspace root
	/// (`<root>/.createsuite/oauth-token.json`).
	pub fn in_workspace(root: impl AsRef<Path>) -> Self {
		Self::open(root.as_ref().join(WORKSPACE_DIR).join(TOKEN_FILE))
	}

	/// Record path backing this store.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Writes a fresh record stamped with the current clock, replacing any previous one.
	pub fn store(
		&self,
		access_token: impl Into<String>,
		expires_in: Option<Duration>,
	) -> Result<StoredToken, StoreError> {
		let record = StoredToken::issued_now(access_token, expires_in);

		self.persist(&record)?;

		Ok(record)
	}

	/// Reads the current record; absent, unreadable, or unparsable files read as `None`.
	pub fn load(&self) -> Option<StoredToken> {
		let bytes = fs::read(&self.path).ok()?;

		serde_json::from_slice(&bytes).ok()
	}

	/// Returns the stored access token regardless of expiry, when a record exists at all.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.load().map(|record| record.access_token)
	}

	/// Returns `true` when a parsable record exists and has not passed its expiry instant.
	pub fn has_valid_token(&self) -> bool {
		self.load().is_some_and(|record| record.is_valid())
	}

	/// Deletes the record; a missing file is not an error.
	pub fn clear(&self) -> Result<(), StoreError> {
		match fs::remove_file(&self.path) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StoreError::Backend {
				message: format!("Failed to remove {}: {e}", self.path.display()),
			}),
		}
	}

	fn persist(&self, record: &StoredToken) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(record).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize the token record: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			restrict_permissions(&file, &tmp_path)?;
			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}
}

#[cfg(unix)]
fn restrict_permissions(file: &File, path: &Path) -> Result<(), StoreError> {
	file.set_permissions(fs::Permissions::from_mode(OWNER_ONLY_MODE)).map_err(|e| {
		StoreError::Backend {
			message: format!("Failed to restrict permissions on {}: {e}", path.display()),
		}
	})
}
#[cfg(not(unix))]
fn restrict_permissions(_file: &File, _path: &Path) -> Result<(), StoreError> {
	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	fn temp_store() -> TokenStore {
		let unique = format!(
			"oauth2_loopback_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		TokenStore::open(env::temp_dir().join(unique))
	}

	#[test]
	fn store_then_load_round_trips_the_record() {
		let store = temp_store();
		let written = store
			.store("tok-1", Some(Duration::hours(1)))
			.expect("Storing a record should succeed.");
		let loaded = store.load().expect("Stored record should load back.");

		assert_eq!(loaded.access_token.expose(), written.access_token.expose());
		assert!(store.has_valid_token());

		store.clear().expect("Clearing an existing record should succeed.");
	}

	#[test]
	fn workspace_store_targets_the_conventional_path() {
		let store = TokenStore::in_workspace("/tmp/workspace");

		assert_eq!(store.path(), Path::new("/tmp/workspace/.createsuite/oauth-token.json"));
	}

	#[test]
	fn unparsable_records_read_as_absent() {
		let store = temp_store();

		TokenStore::ensure_parent_exists(store.path())
			.expect("Creating the store parent directory should succeed.");
		fs::write(store.path(), b"{ not json")
			.expect("Writing the corrupt fixture should succeed.");

		assert!(store.load().is_none());
		assert!(store.access_token().is_none());
		assert!(!store.has_valid_token());

		store.clear().expect("Clearing the corrupt fixture should succeed.");
	}

	#[cfg(unix)]
	#[test]
	fn records_are_written_owner_only() {
		let store = temp_store();

		store.store("tok-1", None).expect("Storing a record should succeed.");

		let mode = fs::metadata(store.path())
			.expect("Stored record should expose metadata.")
			.permissions()
			.mode();

		assert_eq!(mode & 0o777, OWNER_ONLY_MODE);

		store.clear().expect("Clearing an existing record should succeed.");
	}
}
