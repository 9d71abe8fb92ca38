//! Session persistence in a JSON file for the command-line front end.
//!
//! The file lives inside a capability-scoped directory handle; writes go to a
//! hidden temporary file that is then renamed over the target so a crash
//! never leaves a half-written session behind.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use crate::client::{ClientError, SessionStorage};
use crate::domain::AuthenticatedSession;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// [`SessionStorage`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
    file_name: String,
}

impl FileSessionStorage {
    /// Store the session at `path`. The parent directory is created on the
    /// first save.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ClientError::storage(format!("{} does not name a file", path.display()))
            })?
            .to_owned();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self { dir, file_name })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn storage_error(&self, action: &str, error: impl std::fmt::Display) -> ClientError {
        ClientError::storage(format!("{action} {}: {error}", self.path().display()))
    }

    fn open_dir(&self) -> io::Result<Dir> {
        Dir::open_ambient_dir(&self.dir, ambient_authority())
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<AuthenticatedSession>, ClientError> {
        let contents = match self
            .open_dir()
            .and_then(|dir| dir.read_to_string(&self.file_name))
        {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.storage_error("read", error)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|error| self.storage_error("parse", error))
    }

    fn save(&self, session: &AuthenticatedSession) -> Result<(), ClientError> {
        let contents =
            serde_json::to_vec_pretty(session).map_err(|error| self.storage_error("encode", error))?;
        Dir::create_ambient_dir_all(&self.dir, ambient_authority())
            .map_err(|error| self.storage_error("create directory for", error))?;
        let dir = self
            .open_dir()
            .map_err(|error| self.storage_error("open directory for", error))?;

        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(".{}.tmp.{}.{counter}", self.file_name, std::process::id());
        if let Err(error) = dir.write(&tmp_name, &contents) {
            drop(dir.remove_file(&tmp_name));
            return Err(self.storage_error("write", error));
        }
        if let Err(error) = dir.rename(&tmp_name, &dir, &self.file_name) {
            drop(dir.remove_file(&tmp_name));
            return Err(self.storage_error("replace", error));
        }
        debug!(path = %self.path().display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match self.open_dir().and_then(|dir| dir.remove_file(&self.file_name)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.storage_error("remove", error)),
        }
    }
}
