//! Where the save file lives on this machine.

use std::path::PathBuf;

use directories::ProjectDirs;

const SAVE_FILE_NAME: &str = "save.json";

pub fn default_save_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "HighNoon").map(|project_dirs| {
        let mut path = project_dirs.data_dir().to_path_buf();
        path.push(SAVE_FILE_NAME);
        path
    })
}
