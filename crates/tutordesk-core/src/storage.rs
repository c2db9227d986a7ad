//! Sandboxed hierarchical file storage for generated PDFs.
//!
//! All file operations are confined to a single root directory fixed when the
//! [`Storage`] is opened. Relative paths supplied by callers are lexically
//! normalized against that root and rejected with
//! [`TutordeskError::PathTraversalDenied`] if they would escape it; this is a
//! security boundary, not a convenience.
//!
//! # Storage Layout
//!
//! Generated invoices land in a year/month hierarchy under the root:
//!
//! ```text
//! pdf-storage/
//! └── 2025/
//!     └── 05/
//!         └── Alice Tan.pdf
//! ```
//!
//! # Consistency Model
//!
//! The tree listing is a point-in-time scan rebuilt on every call; there is no
//! cache, no locking, and no transaction log. Concurrent writers follow
//! last-writer-wins, and a recursive delete that fails partway leaves the
//! filesystem in whatever state the failed step left it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::error::{Result, TutordeskError};

/// Whether a storage entry is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A regular file.
    File,
    /// A directory.
    Folder,
}

/// One entry in the storage tree.
///
/// Paths are relative to the storage root and always use `/` as the
/// separator, regardless of host convention. The structure is a transient
/// view: it is rebuilt from disk on every listing and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "05",
    "kind": "folder",
    "path": "2025/05",
    "children": [
        {"name": "Alice Tan.pdf", "kind": "file", "path": "2025/05/Alice Tan.pdf", "children": []}
    ]
}))]
pub struct StorageNode {
    /// The entry's own name (no separators).
    pub name: String,

    /// File or folder.
    pub kind: NodeKind,

    /// Path relative to the storage root, `/`-separated.
    pub path: String,

    /// Child entries; populated only for folders.
    #[schema(no_recursion)]
    pub children: Vec<StorageNode>,
}

impl StorageNode {
    fn file(name: String, path: String) -> Self {
        Self {
            name,
            kind: NodeKind::File,
            path,
            children: Vec::new(),
        }
    }

    fn folder(name: String, path: String) -> Self {
        Self {
            name,
            kind: NodeKind::Folder,
            path,
            children: Vec::new(),
        }
    }
}

/// Sandboxed file storage rooted at a single directory.
///
/// The root is fixed for the lifetime of the instance and created (with any
/// missing parents) when the storage is opened.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open storage rooted at `root`, creating the directory if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or canonicalized.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            fs::create_dir_all(root)?;
        }
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    /// The absolute storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a caller-supplied relative path against the storage root.
    ///
    /// The path is normalized lexically: `.` segments drop out, `..` segments
    /// pop the previous segment, and redundant separators collapse. A `..`
    /// with nothing left to pop, or an absolute-path injection, means the
    /// path would land outside the root and the call fails with
    /// [`TutordeskError::PathTraversalDenied`]; there is no silent clamping.
    ///
    /// The empty path resolves to the root itself (the tree listing runs
    /// against it).
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::PathTraversalDenied`] as described above.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        self.resolve_path(Path::new(relative))
    }

    fn resolve_path(&self, relative: &Path) -> Result<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => normalized.push(segment),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(TutordeskError::PathTraversalDenied);
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(TutordeskError::PathTraversalDenied);
                }
            }
        }

        let resolved = self.root.join(normalized);
        // The boundary itself, restated on the final path.
        if !resolved.starts_with(&self.root) {
            return Err(TutordeskError::PathTraversalDenied);
        }
        Ok(resolved)
    }

    /// List the storage subtree under `relative_root` as a tree of nodes.
    ///
    /// The top level contains directories only, sorted descending by name,
    /// a deliberate, observable contract (invoice years/months list newest
    /// first). Nested levels contain every entry, files included, in
    /// filesystem enumeration order with no further sorting. A directory that
    /// cannot be read mid-walk is logged and skipped for its own subtree
    /// rather than failing the whole listing.
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::PathTraversalDenied`] for an escaping path
    /// and an I/O error if the listing root itself cannot be read.
    pub fn list_tree(&self, relative_root: &str) -> Result<Vec<StorageNode>> {
        let root = self.resolve(relative_root)?;

        let mut folders: Vec<String> = Vec::new();
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                folders.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        folders.sort_by(|a, b| b.cmp(a));

        let mut result = Vec::with_capacity(folders.len());
        for name in folders {
            let dir = root.join(&name);
            let mut node = StorageNode::folder(name.clone(), name);
            self.collect_children(&mut node, &dir);
            result.push(node);
        }
        Ok(result)
    }

    /// Recursively populate `parent.children` from the directory at `dir`.
    ///
    /// Children keep filesystem enumeration order. Unreadable directories or
    /// entries are logged and skipped.
    fn collect_children(&self, parent: &mut StorageNode, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = format!("{}/{}", parent.path, name);
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if is_dir {
                let mut folder = StorageNode::folder(name, path);
                self.collect_children(&mut folder, &entry.path());
                parent.children.push(folder);
            } else {
                parent.children.push(StorageNode::file(name, path));
            }
        }
    }

    /// Read a stored file's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::NotFound`] if the resolved path does not
    /// exist or is not a regular file, and
    /// [`TutordeskError::PathTraversalDenied`] for an escaping path.
    pub fn read_file(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative)?;
        if !path.is_file() {
            return Err(TutordeskError::NotFound(relative.to_string()));
        }
        Ok(fs::read(&path)?)
    }

    /// Delete a file or directory subtree.
    ///
    /// Returns `Ok(false)` when the target does not exist: nothing to delete
    /// is a normal outcome, not a failure. Directories are removed depth
    /// first, children before parents, so removal never hits a non-empty
    /// directory.
    ///
    /// This operation is not atomic: if deleting a descendant fails partway
    /// through, the error is surfaced and the entries already removed stay
    /// removed. Callers must not assume any rollback.
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::PathTraversalDenied`] for an escaping path
    /// and an I/O error if any removal fails.
    pub fn delete_entry(&self, relative: &str) -> Result<bool> {
        let target = self.resolve(relative)?;
        if !target.exists() {
            return Ok(false);
        }

        if target.is_dir() {
            remove_tree(&target)?;
        } else {
            fs::remove_file(&target)?;
        }
        Ok(true)
    }

    /// Create `name` under `parent` if it does not already exist, including
    /// any missing intermediate directories.
    ///
    /// Returns `true` when the directory was created and `false` when it
    /// already existed; a collision is a no-op, never an error. A directory
    /// that springs into existence between the existence check and the
    /// creation call is treated the same as one that was already there.
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::PathTraversalDenied`] for an escaping path
    /// and an I/O error if creation fails.
    pub fn ensure_directory(&self, parent: &str, name: &str) -> Result<bool> {
        let target = self.resolve_path(&Path::new(parent).join(name))?;
        if target.exists() {
            debug!(path = %target.display(), "directory already exists");
            return Ok(false);
        }
        match fs::create_dir_all(&target) {
            Ok(()) => {
                debug!(path = %target.display(), "created directory");
                Ok(true)
            }
            // Appeared between the check and the create.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Idempotently provision the year/month directory for a date subpath
    /// such as `2025/05`, returning its absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::PathTraversalDenied`] for an escaping path
    /// and an I/O error if creation fails.
    pub fn ensure_directory_for_date(&self, date_subpath: &str) -> Result<PathBuf> {
        let target = self.resolve(date_subpath)?;
        if !target.exists() {
            fs::create_dir_all(&target)?;
            debug!(path = %target.display(), "created invoice directory");
        }
        Ok(target)
    }

    /// Write `bytes` to `relative`, overwriting any existing file.
    ///
    /// The parent directory must already exist (see
    /// [`Storage::ensure_directory_for_date`]).
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::PathTraversalDenied`] for an escaping path
    /// and an I/O error if the write fails.
    pub fn write_file(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(relative)?;
        if target.exists() {
            debug!(path = %target.display(), "overwriting existing file");
        }
        fs::write(&target, bytes)?;
        Ok(())
    }
}

/// Remove a directory subtree depth first, children before parents.
fn remove_tree(dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            remove_tree(&entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    fs::remove_dir(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_storage(temp: &TempDir) -> Storage {
        Storage::open(temp.path().join("pdf-storage")).unwrap()
    }

    #[test]
    fn test_open_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("pdf-storage");
        assert!(!root.exists());

        let storage = Storage::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(storage.root().ends_with("pdf-storage"));
    }

    #[test]
    fn test_open_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("pdf-storage");
        Storage::open(&root).unwrap();
        Storage::open(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_resolve_plain_path() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        let resolved = storage.resolve("2025/05/x.pdf").unwrap();
        assert!(resolved.starts_with(storage.root()));
        assert!(resolved.ends_with("2025/05/x.pdf"));
    }

    #[test]
    fn test_resolve_collapses_dot_segments() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        let resolved = storage.resolve("2025/./05/../05/x.pdf").unwrap();
        assert!(resolved.ends_with("2025/05/x.pdf"));
    }

    #[test]
    fn test_resolve_empty_path_is_the_root() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);
        assert_eq!(storage.resolve("").unwrap(), storage.root());
    }

    #[test]
    fn test_resolve_denies_escapes() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        for path in ["..", "../x", "a/../../etc/passwd", "a/b/../../../x", "../../.."] {
            assert!(
                matches!(
                    storage.resolve(path),
                    Err(TutordeskError::PathTraversalDenied)
                ),
                "{path} should be denied"
            );
        }
    }

    #[test]
    fn test_resolve_denies_absolute_paths() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);
        assert!(matches!(
            storage.resolve("/etc/passwd"),
            Err(TutordeskError::PathTraversalDenied)
        ));
    }

    #[test]
    fn test_ensure_directory_created_then_noop() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        assert!(storage.ensure_directory("2025", "05").unwrap());
        assert!(!storage.ensure_directory("2025", "05").unwrap());
        assert!(storage.root().join("2025/05").is_dir());
    }

    #[test]
    fn test_ensure_directory_creates_missing_parents() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        assert!(storage.ensure_directory("a/b/c", "d").unwrap());
        assert!(storage.root().join("a/b/c/d").is_dir());
    }

    #[test]
    fn test_ensure_directory_denies_escape() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);
        assert!(matches!(
            storage.ensure_directory("..", "outside"),
            Err(TutordeskError::PathTraversalDenied)
        ));
    }

    #[test]
    fn test_ensure_directory_for_date_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        let first = storage.ensure_directory_for_date("2025/05").unwrap();
        let second = storage.ensure_directory_for_date("2025/05").unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn test_read_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        storage.ensure_directory_for_date("2025/05").unwrap();
        storage.write_file("2025/05/x.pdf", b"%PDF-1.4 test").unwrap();

        assert_eq!(storage.read_file("2025/05/x.pdf").unwrap(), b"%PDF-1.4 test");
    }

    #[test]
    fn test_read_file_not_found() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);
        assert!(matches!(
            storage.read_file("absent.pdf"),
            Err(TutordeskError::NotFound(_))
        ));
    }

    #[test]
    fn test_read_file_rejects_directories() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);
        storage.ensure_directory("", "2025").unwrap();
        assert!(matches!(
            storage.read_file("2025"),
            Err(TutordeskError::NotFound(_))
        ));
    }

    #[test]
    fn test_write_file_overwrites() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        storage.write_file("x.pdf", b"first").unwrap();
        storage.write_file("x.pdf", b"second").unwrap();
        assert_eq!(storage.read_file("x.pdf").unwrap(), b"second");
    }

    #[test]
    fn test_delete_entry_missing_is_false_not_error() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);
        assert!(!storage.delete_entry("absent").unwrap());
    }

    #[test]
    fn test_delete_entry_file() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        storage.write_file("x.pdf", b"bytes").unwrap();
        assert!(storage.delete_entry("x.pdf").unwrap());
        assert!(!storage.root().join("x.pdf").exists());
    }

    #[test]
    fn test_delete_entry_empty_directory_disappears_from_tree() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        storage.ensure_directory("", "2025").unwrap();
        assert_eq!(storage.list_tree("").unwrap().len(), 1);

        assert!(storage.delete_entry("2025").unwrap());
        assert!(storage.list_tree("").unwrap().is_empty());
    }

    #[test]
    fn test_delete_entry_removes_nested_subtree() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        storage.ensure_directory_for_date("2025/05").unwrap();
        storage.write_file("2025/05/a.pdf", b"a").unwrap();
        storage.write_file("2025/05/b.pdf", b"b").unwrap();
        storage.ensure_directory("2025", "06").unwrap();

        assert!(storage.delete_entry("2025").unwrap());
        assert!(!storage.root().join("2025").exists());
    }

    #[test]
    fn test_delete_entry_denies_escape() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);
        assert!(matches!(
            storage.delete_entry("../victim"),
            Err(TutordeskError::PathTraversalDenied)
        ));
    }

    #[test]
    fn test_list_tree_top_level_descending() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        storage.ensure_directory("", "2024").unwrap();
        storage.ensure_directory("", "2025").unwrap();
        storage.ensure_directory("", "2023").unwrap();

        let tree = storage.list_tree("").unwrap();
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["2025", "2024", "2023"]);
    }

    #[test]
    fn test_list_tree_excludes_top_level_files() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        storage.write_file("stray.pdf", b"x").unwrap();
        storage.ensure_directory("", "2025").unwrap();

        let tree = storage.list_tree("").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "2025");
    }

    #[test]
    fn test_list_tree_nested_levels_contain_files_and_folders() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        storage.ensure_directory_for_date("2025/05").unwrap();
        storage.write_file("2025/05/invoice.pdf", b"x").unwrap();

        let tree = storage.list_tree("").unwrap();
        assert_eq!(tree.len(), 1);
        let year = &tree[0];
        assert_eq!(year.kind, NodeKind::Folder);
        assert_eq!(year.path, "2025");

        assert_eq!(year.children.len(), 1);
        let month = &year.children[0];
        assert_eq!(month.kind, NodeKind::Folder);
        assert_eq!(month.path, "2025/05");

        assert_eq!(month.children.len(), 1);
        let file = &month.children[0];
        assert_eq!(file.kind, NodeKind::File);
        assert_eq!(file.name, "invoice.pdf");
        assert_eq!(file.path, "2025/05/invoice.pdf");
        assert!(file.children.is_empty());
    }

    #[test]
    fn test_list_tree_is_a_fresh_scan() {
        let temp = TempDir::new().unwrap();
        let storage = open_storage(&temp);

        assert!(storage.list_tree("").unwrap().is_empty());
        storage.ensure_directory("", "2025").unwrap();
        assert_eq!(storage.list_tree("").unwrap().len(), 1);
    }

    #[test]
    fn test_node_serializes_with_lowercase_kind() {
        let node = StorageNode::file("x.pdf".into(), "2025/05/x.pdf".into());
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"kind\":\"file\""));
        assert!(json.contains("\"path\":\"2025/05/x.pdf\""));
    }
}
