use std::path::PathBuf;

use anyhow::Context;

use crate::model::UserId;
use crate::persistence::{AnnouncementReads, JsonFileKv, Viewer};
use crate::seed::InitialState;
use crate::store::DEFAULT_TYPING_WINDOW;
use crate::{AppResult, AppStore};

const READS_FILE: &str = "announcement_reads.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the announcement read file lives.
    pub data_dir: PathBuf,
    pub typing_window: time::Duration,
    pub viewer: Viewer,
}

impl Config {
    /// Reads `GROUPIN_*` variables, with `.env` loaded first when present.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let data_dir = lookup("GROUPIN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".groupin"));

        let typing_window = match lookup("GROUPIN_TYPING_WINDOW_MS") {
            Some(raw) => {
                let ms: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("GROUPIN_TYPING_WINDOW_MS must be a number of milliseconds, got {raw:?}"))?;
                time::Duration::milliseconds(i64::from(ms))
            }
            None => DEFAULT_TYPING_WINDOW,
        };

        let viewer = lookup("GROUPIN_VIEWER")
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .map(|id| Viewer::User(UserId::from(id)))
            .unwrap_or_default();

        Ok(Self {
            data_dir,
            typing_window,
            viewer,
        })
    }

    pub fn reads_path(&self) -> PathBuf {
        self.data_dir.join(READS_FILE)
    }

    /// Builds a store over `seed` with file-backed announcement reads.
    pub fn open_store(&self, seed: InitialState) -> AppStore {
        let reads = AnnouncementReads::new(JsonFileKv::new(self.reads_path()), &self.viewer);
        AppStore::new(seed, reads).with_typing_window(self.typing_window)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppResult<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".groupin"));
        assert_eq!(config.typing_window, DEFAULT_TYPING_WINDOW);
        assert_eq!(config.viewer, Viewer::Local);
        assert_eq!(config.reads_path(), PathBuf::from(".groupin").join("announcement_reads.json"));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("GROUPIN_DATA_DIR", "/tmp/groupin"),
            ("GROUPIN_TYPING_WINDOW_MS", "2500"),
            ("GROUPIN_VIEWER", "user-1"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/groupin"));
        assert_eq!(config.typing_window, time::Duration::milliseconds(2500));
        assert_eq!(config.viewer, Viewer::User("user-1".into()));
    }

    #[test]
    fn bad_window_is_an_error() {
        let err = config(&[("GROUPIN_TYPING_WINDOW_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("GROUPIN_TYPING_WINDOW_MS"));
    }

    #[test]
    fn blank_viewer_means_local() {
        assert_eq!(config(&[("GROUPIN_VIEWER", "  ")]).unwrap().viewer, Viewer::Local);
    }
}
