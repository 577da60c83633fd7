//! UTF-8 path file access for problem and plan documents.
//!
//! Every helper resolves the containing directory with ambient authority and
//! then works relative to that capability, so callers can pass absolute or
//! relative `camino` paths alike.
#![forbid(unsafe_code)]

use std::io;
use std::path::{Component, MAIN_SEPARATOR};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open an existing file for reading.
///
/// # Errors
///
/// Propagates the underlying open failure.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole file into a string.
///
/// # Errors
///
/// Fails when the file is missing, unreadable, or not valid UTF-8.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read_to_string(name.as_str())
}

/// Write `contents` to `path`, creating missing parent directories and
/// replacing any existing file.
///
/// # Errors
///
/// Fails when a parent cannot be created or the file cannot be written.
pub fn write_utf8_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    dir.write(name.as_str(), contents)
}

/// Open the directory containing `path` and return it with the file name.
///
/// # Errors
///
/// Fails when `path` has no file name or the directory cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Create every missing directory above `path`.
///
/// # Errors
///
/// Propagates directory creation failures.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Whether `path` exists and is a regular file.
///
/// # Errors
///
/// A missing file yields an error of kind [`io::ErrorKind::NotFound`], so
/// callers can tell "absent" from "present but a directory".
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Open the root of `path` (`/`, a Windows prefix, or the current
/// directory) and return it with the remainder of `path` relative to it.
///
/// # Errors
///
/// Fails when the root cannot be opened or a component is not UTF-8.
pub fn base_dir_and_relative(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let (base, relative) = split_root(path)?;
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

fn split_root(path: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let base = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("path prefix is not UTF-8"))?;
            format!("{prefix}{MAIN_SEPARATOR}")
        }
        Some(Component::RootDir) => MAIN_SEPARATOR.to_string(),
        _ => return Ok((Utf8PathBuf::from("."), path.to_path_buf())),
    };
    let relative = path
        .strip_prefix(base.as_str())
        .map_err(|_| io::Error::other(format!("cannot strip {base} from {path}")))?;
    Ok((Utf8PathBuf::from(base), relative.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Workspace {
        _tmp: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn workspace() -> Workspace {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 tempdir");
        Workspace { _tmp: tmp, root }
    }

    #[rstest]
    fn written_files_read_back(workspace: Workspace) {
        let path = workspace.root.join("plans").join("nested").join("plan.json");
        write_utf8_file(&path, b"{\"total_cost\":7}").expect("write");
        assert_eq!(read_utf8_file(&path).expect("read"), "{\"total_cost\":7}");
        assert!(file_is_file(&path).expect("inspect"));
    }

    #[rstest]
    fn writing_replaces_existing_contents(workspace: Workspace) {
        let path = workspace.root.join("plan.json");
        write_utf8_file(&path, b"first").expect("first write");
        write_utf8_file(&path, b"second").expect("second write");
        assert_eq!(read_utf8_file(&path).expect("read"), "second");
    }

    #[rstest]
    fn directories_are_not_files(workspace: Workspace) {
        let dir = workspace.root.join("problems");
        std::fs::create_dir(&dir).expect("mkdir");
        assert!(!file_is_file(&dir).expect("inspect"));
    }

    #[rstest]
    fn missing_files_report_not_found(workspace: Workspace) {
        let path = workspace.root.join("absent.json");
        let err = file_is_file(&path).expect_err("missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(open_utf8_file(&path).is_err());
    }

    #[rstest]
    fn relative_paths_resolve_from_the_current_directory() {
        let (base, relative) = split_root(Utf8Path::new("out/plan.json")).expect("split");
        assert_eq!(base, Utf8PathBuf::from("."));
        assert_eq!(relative, Utf8PathBuf::from("out/plan.json"));
    }

    #[cfg(unix)]
    #[rstest]
    fn absolute_paths_split_at_the_root() {
        let (base, relative) = split_root(Utf8Path::new("/tmp/out")).expect("split");
        assert_eq!(base, Utf8PathBuf::from("/"));
        assert_eq!(relative, Utf8PathBuf::from("tmp/out"));
    }

    #[rstest]
    fn bare_file_names_need_no_parent(workspace: Workspace) {
        let path = workspace.root.join("plan.json");
        ensure_parent_dir(&path).expect("existing parent");
        assert!(ensure_parent_dir(Utf8Path::new("plan.json")).is_ok());
    }
}
