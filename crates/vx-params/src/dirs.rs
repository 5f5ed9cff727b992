//! Input directory probing.
//!
//! Directories are only checked for the presence of the expected database
//! files; their contents are never read here. A failed check produces a status
//! message and leaves the previously accepted directory in place.

use std::path::{Path, PathBuf};

use vx_core::QIndex;

/// Lattice database expected inside the SAVE directory.
pub const SAVE_DB_FILE: &str = "ns.db1";
/// Prefix of the per-momentum diagonalization databases.
pub const DIAGO_DB_PREFIX: &str = "ndb.BS_diago_Q";
/// Quasiparticle correction database.
pub const QP_DB_FILE: &str = "ndb.QP";

/// File name of the diagonalization database for momentum index `q`.
pub fn diago_file_name(q: QIndex) -> String {
    format!("{DIAGO_DB_PREFIX}{}", q.as_usize() + 1)
}

/// Filesystem queries used by [`DataDirectories`].
pub trait DirectoryProbe {
    fn is_file(&self, path: &Path) -> bool;

    /// Number of entries in `dir` whose file name starts with `prefix`.
    fn count_prefixed(&self, dir: &Path, prefix: &str) -> usize;
}

/// Probe backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl DirectoryProbe for FsProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn count_prefixed(&self, dir: &Path, prefix: &str) -> usize {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
                .count(),
            Err(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirKind {
    Save,
    Diago,
    QuasiParticle,
}

/// Outcome of a directory check, suitable for a status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirStatus {
    pub kind: DirKind,
    pub path: PathBuf,
    pub valid: bool,
    pub message: String,
}

/// Accepted input directories and what was learned from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataDirectories {
    save_dir: Option<PathBuf>,
    diago_dir: Option<PathBuf>,
    qp_dir: Option<PathBuf>,
    parent_dir: Option<PathBuf>,
    job_string: Option<String>,
    n_qpoints: usize,
}

impl DataDirectories {
    pub fn save_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref()
    }

    pub fn diago_dir(&self) -> Option<&Path> {
        self.diago_dir.as_deref()
    }

    pub fn qp_dir(&self) -> Option<&Path> {
        self.qp_dir.as_deref()
    }

    /// Parent of the diago directory (the job root).
    pub fn parent_dir(&self) -> Option<&Path> {
        self.parent_dir.as_deref()
    }

    /// Name of the diago directory.
    pub fn job_string(&self) -> Option<&str> {
        self.job_string.as_deref()
    }

    /// Number of momentum points with a diagonalization database.
    pub fn n_qpoints(&self) -> usize {
        self.n_qpoints
    }

    pub fn set_save_dir(&mut self, probe: &dyn DirectoryProbe, dir: impl AsRef<Path>) -> DirStatus {
        let dir = dir.as_ref();
        let valid = probe.is_file(&dir.join(SAVE_DB_FILE));
        let message = if valid {
            self.save_dir = Some(dir.to_path_buf());
            format!("{SAVE_DB_FILE} found")
        } else {
            tracing::warn!(dir = %dir.display(), "SAVE directory has no lattice database");
            format!("{SAVE_DB_FILE} not found!")
        };
        status(DirKind::Save, dir, valid, message)
    }

    pub fn set_diago_dir(&mut self, probe: &dyn DirectoryProbe, dir: impl AsRef<Path>) -> DirStatus {
        let dir = dir.as_ref();
        let count = probe.count_prefixed(dir, DIAGO_DB_PREFIX);
        let valid = count > 0;
        let message = if valid {
            self.diago_dir = Some(dir.to_path_buf());
            self.parent_dir = dir.parent().map(Path::to_path_buf);
            self.job_string = dir.file_name().map(|n| n.to_string_lossy().into_owned());
            self.n_qpoints = count;
            tracing::info!(dir = %dir.display(), n_qpoints = count, "diago directory accepted");
            format!("{DIAGO_DB_PREFIX}* found - ({count} Q-Points)")
        } else {
            tracing::warn!(dir = %dir.display(), "diago directory has no diagonalization databases");
            format!("{DIAGO_DB_PREFIX}* not found!")
        };
        status(DirKind::Diago, dir, valid, message)
    }

    pub fn set_qp_dir(&mut self, probe: &dyn DirectoryProbe, dir: impl AsRef<Path>) -> DirStatus {
        let dir = dir.as_ref();
        let valid = probe.is_file(&dir.join(QP_DB_FILE));
        let message = if valid {
            self.qp_dir = Some(dir.to_path_buf());
            format!("{QP_DB_FILE} found")
        } else {
            format!("{QP_DB_FILE} not found!")
        };
        status(DirKind::QuasiParticle, dir, valid, message)
    }

    /// Drop the quasiparticle correction directory.
    pub fn clear_qp_dir(&mut self) {
        self.qp_dir = None;
    }
}

fn status(kind: DirKind, dir: &Path, valid: bool, message: String) -> DirStatus {
    DirStatus {
        kind,
        path: dir.to_path_buf(),
        valid,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory probe: directory -> file names.
    #[derive(Default)]
    struct MapProbe(HashMap<PathBuf, Vec<String>>);

    impl MapProbe {
        fn with(mut self, dir: &str, files: &[&str]) -> Self {
            self.0
                .insert(dir.into(), files.iter().map(|f| f.to_string()).collect());
            self
        }
    }

    impl DirectoryProbe for MapProbe {
        fn is_file(&self, path: &Path) -> bool {
            let (Some(dir), Some(name)) = (path.parent(), path.file_name()) else {
                return false;
            };
            self.0
                .get(dir)
                .is_some_and(|files| files.iter().any(|f| f.as_str() == name))
        }

        fn count_prefixed(&self, dir: &Path, prefix: &str) -> usize {
            self.0
                .get(dir)
                .map_or(0, |files| files.iter().filter(|f| f.starts_with(prefix)).count())
        }
    }

    #[test]
    fn diago_dir_counts_qpoints() {
        let probe = MapProbe::default().with(
            "/calc/bse",
            &["ndb.BS_diago_Q1", "ndb.BS_diago_Q2", "ndb.BS_diago_Q3", "r_setup"],
        );
        let mut dirs = DataDirectories::default();
        let st = dirs.set_diago_dir(&probe, "/calc/bse");

        assert!(st.valid);
        assert_eq!(st.message, "ndb.BS_diago_Q* found - (3 Q-Points)");
        assert_eq!(dirs.n_qpoints(), 3);
        assert_eq!(dirs.job_string(), Some("bse"));
        assert_eq!(dirs.parent_dir(), Some(Path::new("/calc")));
    }

    #[test]
    fn invalid_dir_keeps_previous_state() {
        let probe = MapProbe::default()
            .with("/good/SAVE", &["ns.db1"])
            .with("/bad", &["notes.txt"]);
        let mut dirs = DataDirectories::default();

        assert!(dirs.set_save_dir(&probe, "/good/SAVE").valid);
        let st = dirs.set_save_dir(&probe, "/bad");

        assert!(!st.valid);
        assert_eq!(st.message, "ns.db1 not found!");
        assert_eq!(dirs.save_dir(), Some(Path::new("/good/SAVE")));

        let st = dirs.set_diago_dir(&probe, "/bad");
        assert!(!st.valid);
        assert_eq!(dirs.n_qpoints(), 0);
        assert!(dirs.diago_dir().is_none());
    }

    #[test]
    fn qp_dir_is_optional() {
        let probe = MapProbe::default().with("/qp", &["ndb.QP"]);
        let mut dirs = DataDirectories::default();
        assert!(dirs.set_qp_dir(&probe, "/qp").valid);
        dirs.clear_qp_dir();
        assert!(dirs.qp_dir().is_none());
    }

    #[test]
    fn diago_file_name_is_one_based() {
        assert_eq!(diago_file_name(QIndex::from_index(0)), "ndb.BS_diago_Q1");
        assert_eq!(diago_file_name(QIndex::from_index(11)), "ndb.BS_diago_Q12");
    }
}
