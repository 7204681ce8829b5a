//! Content hashing for change detection
//!
//! Produces a deterministic SHA256 fingerprint of a directory tree. Same
//! tree = same hash, on any machine. Any file addition, deletion, rename or
//! content change outside the exclusion set produces a different hash.

use crate::error::{RiggerError, RiggerResult};
use glob::Pattern;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Exclusions that every caller hashes with
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", ".rigger"];

/// Compiled set of exclusion globs
#[derive(Debug, Clone)]
struct Excludes {
    patterns: Vec<Pattern>,
}

impl Excludes {
    fn compile(raw: &[String]) -> RiggerResult<Self> {
        let patterns = raw
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| RiggerError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<RiggerResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// An entry is excluded when a pattern matches its relative path or its name
    fn matches(&self, relative: &str, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(relative) || p.matches(name))
    }
}

/// Relative path with `/` separators, independent of the host platform
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Raw bytes of the relative path, components joined by `/`
fn relative_path_bytes(root: &Path, path: &Path) -> Vec<u8> {
    let mut bytes = Vec::new();
    let relative = path.strip_prefix(root).unwrap_or(path);
    for (i, component) in relative.components().enumerate() {
        if i > 0 {
            bytes.push(b'/');
        }
        bytes.extend_from_slice(component.as_os_str().as_encoded_bytes());
    }
    bytes
}

/// Feed one entry record: kind byte, then length-prefixed path and payload
fn update_record(hasher: &mut Sha256, kind: u8, path: &[u8], payload: &[u8]) {
    hasher.update([kind]);
    hasher.update((path.len() as u64).to_le_bytes());
    hasher.update(path);
    hasher.update((payload.len() as u64).to_le_bytes());
    hasher.update(payload);
}

/// Hash a single file's contents, streaming so large files stay out of memory
fn hash_file_contents(path: &Path) -> RiggerResult<String> {
    let mut file = fs::File::open(path)
        .map_err(|e| RiggerError::io(format!("opening {} for hashing", path.display()), e))?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| RiggerError::io(format!("reading {} for hashing", path.display()), e))?;

    Ok(hex::encode(hasher.finalize()))
}

fn walk_error(root: &Path, err: walkdir::Error) -> RiggerError {
    let context = match err.path() {
        Some(path) => format!("walking {}", path.display()),
        None => format!("walking {}", root.display()),
    };
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    RiggerError::io(context, source)
}

/// Compute the content hash of a directory tree
///
/// Entries are visited in file-name order without following symlinks. Each
/// directory (including empty ones), file and symlink contributes a record
/// of its kind and raw relative path; files add a hash of their content and
/// symlinks their target. Path and payload are length-prefixed, so no file
/// name can reproduce the records of a different tree.
pub fn directory_hash(root: &Path, excludes: &[String]) -> RiggerResult<String> {
    if !root.exists() {
        return Err(RiggerError::PathNotFound(root.to_path_buf()));
    }
    fs::symlink_metadata(root)
        .map_err(|e| RiggerError::io(format!("reading {}", root.display()), e))?;

    let excludes = Excludes::compile(excludes)?;
    let keep = |entry: &DirEntry| {
        if entry.depth() == 0 {
            return true;
        }
        let relative = relative_path(root, entry.path());
        let name = entry.file_name().to_string_lossy();
        !excludes.matches(&relative, &name)
    };

    let mut hasher = Sha256::new();
    let mut entries = 0usize;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(keep)
    {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let relative = relative_path_bytes(root, entry.path());
        let file_type = entry.file_type();

        if file_type.is_dir() {
            update_record(&mut hasher, b'd', &relative, &[]);
        } else if file_type.is_symlink() {
            let target = fs::read_link(entry.path()).map_err(|e| {
                RiggerError::io(format!("reading link {}", entry.path().display()), e)
            })?;
            update_record(
                &mut hasher,
                b'l',
                &relative,
                target.as_os_str().as_encoded_bytes(),
            );
        } else {
            let content = hash_file_contents(entry.path())?;
            update_record(&mut hasher, b'f', &relative, content.as_bytes());
        }
        entries += 1;
    }

    let hash = hex::encode(hasher.finalize());
    debug!("Hashed {} entries under {}: {}", entries, root.display(), hash);
    Ok(hash)
}

/// Compute [`directory_hash`] on the blocking thread pool
pub async fn directory_hash_async(root: PathBuf, excludes: Vec<String>) -> RiggerResult<String> {
    tokio::task::spawn_blocking(move || directory_hash(&root, &excludes))
        .await
        .map_err(|e| RiggerError::Internal(format!("hash task failed: {}", e)))?
}

/// Merge caller exclusions with [`DEFAULT_EXCLUDES`], without duplicates
pub fn with_default_excludes(extra: &[String]) -> Vec<String> {
    let mut all: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    for pattern in extra {
        if !all.contains(pattern) {
            all.push(pattern.clone());
        }
    }
    all
}
