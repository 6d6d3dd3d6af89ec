//! Simple file-backed [`RequestStore`] for lightweight deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	request::{NewResetRequest, ResetRequest, Selector},
	store::{RequestStore, StoreError, StoreFuture},
	user::{ResetUser, UserKey},
};

/// Persists reset requests to a JSON file after each mutation.
pub struct FileStore<U> {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<Selector, ResetRequest<U>>>>,
}
impl<U> FileStore<U>
where
	U: ResetUser + Serialize + DeserializeOwned,
{
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the JSON snapshot.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<Selector, ResetRequest<U>>, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let entries: Vec<ResetRequest<U>> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(entries.into_iter().map(|request| (request.selector.clone(), request)).collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<Selector, ResetRequest<U>>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot: Vec<_> = contents.values().collect();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

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
}
impl<U> Debug for FileStore<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FileStore").field("path", &self.path).finish()
	}
}
impl<U> RequestStore<U> for FileStore<U>
where
	U: ResetUser + Serialize + DeserializeOwned,
{
	fn create_reset_request(
		&self,
		request: NewResetRequest<U>,
	) -> StoreFuture<'_, ResetRequest<U>> {
		Box::pin(async move {
			let request = request.into_request();
			let mut guard = self.inner.write();

			if guard.contains_key(&request.selector) {
				return Err(StoreError::Conflict { selector: request.selector.to_string() });
			}

			guard.insert(request.selector.clone(), request.clone());

			if let Err(e) = self.persist_locked(&guard) {
				guard.remove(&request.selector);

				return Err(e);
			}

			Ok(request)
		})
	}

	fn find_by_selector<'a>(
		&'a self,
		selector: &'a Selector,
	) -> StoreFuture<'a, Option<ResetRequest<U>>> {
		Box::pin(async move { Ok(self.inner.read().get(selector).cloned()) })
	}

	fn remove<'a>(&'a self, request: &'a ResetRequest<U>) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			if let Some(previous) = guard.remove(&request.selector) {
				if let Err(e) = self.persist_locked(&guard) {
					guard.insert(previous.selector.clone(), previous);

					return Err(e);
				}
			}

			Ok(())
		})
	}

	fn most_recent_non_expired_request_at<'a>(
		&'a self,
		user: &'a UserKey,
		now: OffsetDateTime,
	) -> StoreFuture<'a, Option<OffsetDateTime>> {
		Box::pin(async move { Ok(super::newest_unexpired(self.inner.read().values(), user, now)) })
	}

	fn remove_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let expired = guard
				.values()
				.filter(|request| request.is_expired_at(now))
				.map(|request| request.selector.clone())
				.collect::<Vec<_>>();
			let purged =
				expired.iter().filter_map(|selector| guard.remove(selector)).collect::<Vec<_>>();

			if purged.is_empty() {
				return Ok(0);
			}
			if let Err(e) = self.persist_locked(&guard) {
				for request in purged {
					guard.insert(request.selector.clone(), request);
				}

				return Err(e);
			}

			Ok(purged.len())
		})
	}
}
