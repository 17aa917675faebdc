use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn sessions_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("letterbros");
            Some(state_dir.join("sessions.csv"))
        } else {
            ProjectDirs::from("", "", "letterbros")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("sessions.csv"))
        }
    }

    /// Where letter/word recordings are looked up when no --audio-dir is given.
    pub fn audio_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "letterbros").map(|proj_dirs| proj_dirs.data_dir().join("audio"))
    }
}
