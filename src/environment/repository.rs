use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{from_slice, to_string_pretty};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::types::AuthInfo;

const SESSION_PATH: &str = "session.json";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub token: String,
    pub saved: DateTime<Utc>,
}

/// Keeps the session token between runs. Without a directory the
/// session only lives in memory.
#[derive(Clone, Debug)]
pub struct Repository {
    directory: Option<PathBuf>,
    session: Arc<Mutex<Option<Session>>>,
}

impl Repository {
    /// Use `directory`, or the platform config directory if `None`
    pub fn new(directory: Option<PathBuf>) -> Self {
        let directory = match directory {
            Some(d) => Some(d),
            None => match data_directory() {
                Ok(d) => Some(d),
                Err(e) => {
                    log::error!("{e}");
                    None
                }
            },
        };
        let session = directory
            .as_ref()
            .and_then(|dir| match read::<Session>(dir, SESSION_PATH) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("Could not load session: {e}");
                    None
                }
            });
        Self {
            directory,
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            directory: None,
            session: Arc::default(),
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.session.lock().ok()?.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    pub fn save_session(&self, auth: &AuthInfo) -> Result<(), String> {
        let session = Session {
            email: auth.email.clone(),
            token: auth.token.clone(),
            saved: Utc::now(),
        };
        let mut current = self
            .session
            .lock()
            .map_err(|e| format!("Session Data Error: {e:?}"))?;
        if let Some(ref dir) = self.directory {
            write(dir, SESSION_PATH, &session)?;
        }
        *current = Some(session);
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), String> {
        let mut current = self
            .session
            .lock()
            .map_err(|e| format!("Session Data Error: {e:?}"))?;
        *current = None;
        let Some(ref dir) = self.directory else {
            return Ok(());
        };
        let path = dir.join(SESSION_PATH);
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| format!("Could not remove {}: {e:?}", path.display()))?;
        }
        Ok(())
    }
}

fn read<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>, String> {
    let data_path = dir.join(name);
    if !data_path.exists() {
        return Ok(None);
    };
    let data = std::fs::read(&data_path)
        .map_err(|e| format!("Could not read {}: {e:?}", data_path.display()))?;
    let obj: T =
        from_slice(&data).map_err(|e| format!("Could not parse {}: {e:?}", data_path.display()))?;
    Ok(Some(obj))
}

fn write<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<(), String> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Could not create directory {}: {e:?}", dir.display()))?;
    }
    let data_path = dir.join(name);
    let data = to_string_pretty(&value).map_err(|e| format!("Could not parse value:{e:?}"))?;
    std::fs::write(&data_path, data)
        .map_err(|e| format!("Could not write to {}: {e:?}", data_path.display()))?;
    Ok(())
}

fn data_directory() -> Result<PathBuf, String> {
    use directories_next::ProjectDirs;
    ProjectDirs::from("academy", "pages", "six-cities")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| "Couldn't find a folder to save data".to_string())
}
