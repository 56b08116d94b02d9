use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tempfile::NamedTempFile;
use thiserror::Error;

/// In-memory view of the store: username -> password
pub type UserMap = HashMap<String, String>;

const FIELD_SEPARATOR: char = ':';

/// Custom error type for user store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt record on line {line}: {content:?}")]
    CorruptRecord { line: usize, content: String },

    #[error("{field} cannot contain ':' or line breaks")]
    UnencodableField { field: &'static str },
}

/// Plain-text user store: one `username:password` record per line
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    /// Create a store backed by the file at `path`; nothing is touched on disk yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once the store file has been created
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Function to load every record from the store.
    ///
    /// A missing file is an empty store. Any line that does not split into
    /// exactly two fields aborts the load with `CorruptRecord`.
    pub fn load(&self) -> Result<UserMap, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(UserMap::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut users = UserMap::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let (username, password) = parse_record(&line).ok_or_else(|| {
                StoreError::CorruptRecord {
                    line: index + 1,
                    content: line.clone(),
                }
            })?;
            users.insert(username.to_string(), password.to_string());
        }
        Ok(users)
    }

    /// Function to add a single record at the end of the store.
    ///
    /// Existing records are not rewritten and duplicates are not checked.
    pub fn append(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let record = encode_record(username, password)?;

        let mut file = open_options().append(true).open(&self.path)?;
        file.write_all(record.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Function to replace the whole store with `users`.
    ///
    /// Records are written to a temporary file next to the store, which is
    /// then renamed over it, so an interrupted rewrite leaves the previous
    /// contents intact.
    pub fn rewrite_all(&self, users: &UserMap) -> Result<(), StoreError> {
        let mut contents = String::new();
        for (username, password) in users.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            contents.push_str(&encode_record(username, password)?);
        }

        let mut temp_file = NamedTempFile::new_in(self.parent_dir())?;
        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

// Store files hold cleartext passwords; keep them private to the owner
#[cfg(unix)]
fn open_options() -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    let mut options = OpenOptions::new();
    options.create(true).mode(0o600);
    options
}

#[cfg(not(unix))]
fn open_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true);
    options
}

fn parse_record(line: &str) -> Option<(&str, &str)> {
    // Only the line ending is dropped; whitespace inside a field is data
    let mut fields = line.trim_end_matches(['\r', '\n']).split(FIELD_SEPARATOR);
    match (fields.next(), fields.next(), fields.next()) {
        (Some(username), Some(password), None) => Some((username, password)),
        _ => None,
    }
}

fn encode_record(username: &str, password: &str) -> Result<String, StoreError> {
    check_field("username", username)?;
    check_field("password", password)?;
    Ok(format!("{}{}{}\n", username, FIELD_SEPARATOR, password))
}

fn check_field(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.contains([FIELD_SEPARATOR, '\n', '\r']) {
        return Err(StoreError::UnencodableField { field });
    }
    Ok(())
}
