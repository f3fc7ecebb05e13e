// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Filesystem helpers shared by the folder-backed stores: key encoding for file names
//! and atomic (temp file + rename) writes that refuse to follow symlinks.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("path is outside store root: root={root:?} path={path:?}")]
    PathOutsideRoot { root: PathBuf, path: PathBuf },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// Longest file name stem [`encode_persisted_key`] produces before switching to a hash.
///
/// Leaves room for the `.json` suffix and the temp-file prefix used by [`write_atomic`]
/// under the common 255-byte name limit.
pub const MAX_PERSISTED_KEY_LEN: usize = 160;

const HASHED_PREFIX_LEN: usize = 64;

/// Turns an opaque key (a session id, say) into a single safe file name segment.
///
/// Keys that are already safe pass through unchanged; anything else is hex-encoded
/// behind a `~` prefix, so distinct keys never collide. Results longer than
/// [`MAX_PERSISTED_KEY_LEN`] keep a readable prefix followed by `~` and the SHA-256 of
/// the full key.
pub fn encode_persisted_key(key: &str) -> String {
    let encoded = if needs_encoding(key) {
        hex_encode_key(key)
    } else {
        key.to_owned()
    };
    if encoded.len() <= MAX_PERSISTED_KEY_LEN {
        return encoded;
    }

    let mut cut = HASHED_PREFIX_LEN;
    while !encoded.is_char_boundary(cut) {
        cut -= 1;
    }
    let digest = Sha256::digest(key.as_bytes());
    format!("{}~{digest:x}", &encoded[..cut])
}

fn hex_encode_key(key: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(1 + key.len().saturating_mul(2));
    out.push('~');
    for &b in key.as_bytes() {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

fn needs_encoding(key: &str) -> bool {
    if key.is_empty() || key.starts_with('~') || key.starts_with('.') {
        return true;
    }
    if key.ends_with(' ') || key.ends_with('.') {
        return true;
    }

    let base = key.split('.').next().unwrap_or(key);
    if is_windows_device_name(base) {
        return true;
    }

    key.chars().any(|ch| {
        matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '#' | '%')
            || ch <= '\u{1f}'
            || ch == '\u{7f}'
    })
}

fn is_windows_device_name(base: &str) -> bool {
    let base = base.to_ascii_uppercase();
    match base.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => {
            if let Some(num) = base.strip_prefix("COM") {
                matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")
            } else if let Some(num) = base.strip_prefix("LPT") {
                matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")
            } else {
                false
            }
        }
    }
}

/// Reads a file, mapping "not found" to `Ok(None)`.
pub fn read_if_exists(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Removes a file; a missing file is not an error.
pub fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` to `path` (a direct child of `root`) via a temp file and rename.
pub fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    if path.parent() != Some(root) {
        return Err(StoreError::PathOutsideRoot {
            root: root.to_path_buf(),
            path: path.to_path_buf(),
        });
    }

    match fs::symlink_metadata(root) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: root.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(root).map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: root.to_path_buf(),
                source,
            })
        }
    }

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = root.join(format!(
        ".ffcanvas.tmp.{}.{}.{nanos}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(root).map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::env;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    pub(crate) struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        pub(crate) fn new(prefix: &str) -> Self {
            let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
            let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = env::temp_dir();
            path.push(format!("ffcanvas-{prefix}-{}-{nanos}-{counter}", std::process::id()));
            std::fs::create_dir_all(&path).expect("create temp dir");
            Self { path }
        }

        pub(crate) fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::test_support::TempDir;
    use super::{
        encode_persisted_key, read_if_exists, write_atomic, StoreError, WriteDurability,
        MAX_PERSISTED_KEY_LEN,
    };

    #[fixture]
    fn tmp() -> TempDir {
        TempDir::new("fs")
    }

    #[test]
    fn safe_keys_pass_through() {
        assert_eq!(encode_persisted_key("3f2a-91bc"), "3f2a-91bc");
    }

    #[rstest]
    #[case("a/b")]
    #[case("CON")]
    #[case("..")]
    #[case("~x")]
    #[case("trailing.")]
    #[case("q?x#y")]
    fn unsafe_keys_are_hex_encoded(#[case] key: &str) {
        let encoded = encode_persisted_key(key);
        assert!(encoded.starts_with('~'), "{key} -> {encoded}");
        assert!(encoded[1..].chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[rstest]
    #[case("x".repeat(300))]
    #[case(format!("team/{}", "y".repeat(120)))]
    #[case("ñ".repeat(200))]
    fn long_keys_get_a_bounded_hashed_name(tmp: TempDir, #[case] key: String) {
        let encoded = encode_persisted_key(&key);
        assert!(encoded.len() <= MAX_PERSISTED_KEY_LEN, "{} bytes", encoded.len());
        assert_ne!(encoded, encode_persisted_key(&format!("{key}z")));

        let root = tmp.path().join("store");
        let path = root.join(format!("{encoded}.json"));
        write_atomic(&root, &path, b"kept", WriteDurability::BestEffort).unwrap();
        assert_eq!(read_if_exists(&path).unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn keys_at_the_bound_are_not_hashed() {
        let key = "k".repeat(MAX_PERSISTED_KEY_LEN);
        assert_eq!(encode_persisted_key(&key), key);
    }

    #[rstest]
    #[case(WriteDurability::BestEffort)]
    #[case(WriteDurability::Durable)]
    fn write_atomic_replaces_contents(tmp: TempDir, #[case] durability: WriteDurability) {
        let root = tmp.path().join("store");
        let path = root.join("entry.json");

        write_atomic(&root, &path, b"one", durability).unwrap();
        write_atomic(&root, &path, b"two", durability).unwrap();

        assert_eq!(read_if_exists(&path).unwrap().as_deref(), Some("two"));
        let leftovers = std::fs::read_dir(&root)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".ffcanvas.tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[rstest]
    fn write_atomic_rejects_nested_paths(tmp: TempDir) {
        let root = tmp.path().to_path_buf();
        let err = write_atomic(&root, &root.join("a").join("b.json"), b"x", WriteDurability::BestEffort)
            .unwrap_err();
        assert!(matches!(err, StoreError::PathOutsideRoot { .. }));
    }

    #[cfg(unix)]
    #[rstest]
    fn write_atomic_refuses_symlink_targets(tmp: TempDir) {
        let root = tmp.path().to_path_buf();
        let target = root.join("target.json");
        std::fs::write(&target, "original").unwrap();
        let link = root.join("link.json");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = write_atomic(&root, &link, b"x", WriteDurability::BestEffort).unwrap_err();
        assert!(matches!(err, StoreError::SymlinkRefused { .. }));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "original");
    }

    #[rstest]
    fn read_if_exists_maps_missing_to_none(tmp: TempDir) {
        assert_eq!(read_if_exists(&tmp.path().join("nope")).unwrap(), None);
    }
}
