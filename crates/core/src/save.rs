//! Player progress on the map, persisted as checksummed JSON.
//!
//! Nodes are referenced by index so the state survives serialization
//! without holding on to graph objects. The file wraps its body with a
//! SHA-256 checksum; loading verifies the checksum and the format
//! version and refuses anything that doesn't match.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Where the player is and what they have finished.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub current_map: String,
    pub current_node: usize,
    pub last_node: Option<usize>,
    /// Indices of nodes whose events are done, sorted ascending.
    pub completed_nodes: Vec<usize>,
}

impl SaveState {
    pub fn new(current_map: impl Into<String>, current_node: usize) -> Self {
        Self {
            current_map: current_map.into(),
            current_node,
            last_node: None,
            completed_nodes: Vec::new(),
        }
    }

    /// Moves the player, remembering where they came from.
    pub fn visit_node(&mut self, node: usize) {
        if node == self.current_node {
            return;
        }
        self.last_node = Some(self.current_node);
        self.current_node = node;
    }

    pub fn complete_node(&mut self, node: usize) {
        if let Err(position) = self.completed_nodes.binary_search(&node) {
            self.completed_nodes.insert(position, node);
        }
    }

    pub fn is_completed(&self, node: usize) -> bool {
        self.completed_nodes.binary_search(&node).is_ok()
    }

    /// Switches to another map, resetting per-map progress.
    pub fn enter_map(&mut self, map: impl Into<String>, start_node: usize) {
        self.current_map = map.into();
        self.current_node = start_node;
        self.last_node = None;
        self.completed_nodes.clear();
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveFile {
    format_version: u32,
    state: SaveState,
    sha256_hex: String,
}

/// Canonical hash input: version and state, without the checksum
/// field itself.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody<'a> {
    format_version: u32,
    state: &'a SaveState,
}

#[derive(Debug)]
pub enum SaveFileError {
    Io(io::Error),
    Parse(serde_json::Error),
    VersionMismatch { found: u32, expected: u32 },
    ChecksumMismatch,
}

impl fmt::Display for SaveFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "save file I/O error: {e}"),
            Self::Parse(e) => write!(f, "invalid save file: {e}"),
            Self::VersionMismatch { found, expected } => {
                write!(f, "save version mismatch: found {found}, expected {expected}")
            }
            Self::ChecksumMismatch => write!(f, "save file checksum does not match its content"),
        }
    }
}

impl From<io::Error> for SaveFileError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SaveFileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

fn body_checksum(state: &SaveState) -> Result<String, SaveFileError> {
    let body = SaveBody { format_version: SAVE_FORMAT_VERSION, state };
    let body_json = serde_json::to_string(&body)?;
    let mut hasher = Sha256::new();
    hasher.update(body_json.as_bytes());
    let digest = hasher.finalize();
    Ok(format!("{digest:064x}"))
}

/// Writes via a temp file and rename so a crash never leaves a torn
/// save behind.
pub fn write_save(state: &SaveState, path: &Path) -> Result<(), SaveFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = SaveFile {
        format_version: SAVE_FORMAT_VERSION,
        state: state.clone(),
        sha256_hex: body_checksum(state)?,
    };
    let json = serde_json::to_string_pretty(&file)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn load_save(path: &Path) -> Result<SaveState, SaveFileError> {
    let text = fs::read_to_string(path)?;
    let file: SaveFile = serde_json::from_str(&text)?;
    if file.format_version != SAVE_FORMAT_VERSION {
        return Err(SaveFileError::VersionMismatch {
            found: file.format_version,
            expected: SAVE_FORMAT_VERSION,
        });
    }
    if body_checksum(&file.state)? != file.sha256_hex {
        return Err(SaveFileError::ChecksumMismatch);
    }
    Ok(file.state)
}
