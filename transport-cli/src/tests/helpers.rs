//! Test helpers writing problem documents into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use transport_core::{Problem, ProblemDocument};

/// A temporary directory with a UTF-8 path.
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture");
}

/// Write `problem` as a JSON document to `path`.
pub(super) fn write_problem(path: &Utf8Path, problem: &Problem) {
    let document = ProblemDocument::from(problem);
    let payload = serde_json::to_string_pretty(&document).expect("serialize problem");
    write_utf8(path, payload.as_bytes());
}
