use std::path::{Path, PathBuf};

use crate::errors::{AccuracyError, Result};

///
/// Where region and target signal files for each cluster live: a primary
/// directory and an optional fallback, each with one sub-directory per
/// cluster.
///
#[derive(Debug, Clone)]
pub struct SourceDirs {
    pub primary: PathBuf,
    pub fallback: Option<PathBuf>,
    /// Use the blocklist filtered variants of every file.
    pub blocklist: bool,
}

impl SourceDirs {
    pub fn new<P: AsRef<Path>>(primary: P, fallback: Option<P>, blocklist: bool) -> Self {
        SourceDirs {
            primary: primary.as_ref().to_path_buf(),
            fallback: fallback.map(|f| f.as_ref().to_path_buf()),
            blocklist,
        }
    }

    fn suffix(&self) -> &'static str {
        match self.blocklist {
            true => "_blocklist",
            false => "",
        }
    }

    ///
    /// Regions predicted for a cluster: `<primary>/<cluster>/predict_regions.bed`,
    /// else `<fallback>/<cluster>/<cluster>_test_chrs.bed`.
    ///
    pub fn region_file(&self, cluster: &str) -> Result<PathBuf> {
        let suffix = self.suffix();
        let primary = self
            .primary
            .join(cluster)
            .join(format!("predict_regions{}.bed", suffix));
        let fallback = self.fallback.as_ref().map(|dir| {
            dir.join(cluster)
                .join(format!("{}_test_chrs{}.bed", cluster, suffix))
        });

        resolve(format!("regions of cluster {}", cluster), primary, fallback)
    }

    ///
    /// Target signal of one cell type in a cluster,
    /// `<dir>/<cluster>/<cell_type>_target_signal.out`, in the primary then
    /// the fallback directory.
    ///
    pub fn signal_file(&self, cluster: &str, cell_type: &str) -> Result<PathBuf> {
        let name = format!("{}_target_signal{}.out", cell_type, self.suffix());
        let primary = self.primary.join(cluster).join(&name);
        let fallback = self
            .fallback
            .as_ref()
            .map(|dir| dir.join(cluster).join(&name));

        resolve(
            format!("{} target signal of cluster {}", cell_type, cluster),
            primary,
            fallback,
        )
    }
}

fn resolve(what: String, primary: PathBuf, fallback: Option<PathBuf>) -> Result<PathBuf> {
    if primary.is_file() {
        return Ok(primary);
    }
    if let Some(fallback) = fallback.as_ref().filter(|f| f.is_file()) {
        log::debug!("Using fallback {} for {}", fallback.display(), what);
        return Ok(fallback.clone());
    }

    Err(AccuracyError::MissingSource {
        what,
        primary,
        fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[rstest]
    #[case(false, "predict_regions.bed", "c1_test_chrs.bed")]
    #[case(true, "predict_regions_blocklist.bed", "c1_test_chrs_blocklist.bed")]
    fn test_region_file_prefers_primary(
        #[case] blocklist: bool,
        #[case] primary_name: &str,
        #[case] fallback_name: &str,
    ) {
        let tempdir = tempfile::tempdir().unwrap();
        let primary = tempdir.path().join("targets");
        let fallback = tempdir.path().join("more");
        let dirs = SourceDirs::new(&primary, Some(&fallback), blocklist);

        touch(&fallback.join("c1").join(fallback_name));
        assert_eq!(
            dirs.region_file("c1").unwrap(),
            fallback.join("c1").join(fallback_name)
        );

        touch(&primary.join("c1").join(primary_name));
        assert_eq!(
            dirs.region_file("c1").unwrap(),
            primary.join("c1").join(primary_name)
        );
    }

    #[rstest]
    fn test_signal_file_fallback() {
        let tempdir = tempfile::tempdir().unwrap();
        let primary = tempdir.path().join("targets");
        let fallback = tempdir.path().join("more");
        let dirs = SourceDirs::new(&primary, Some(&fallback), true);

        let expected = fallback.join("c2").join("CT1_target_signal_blocklist.out");
        touch(&expected);
        assert_eq!(dirs.signal_file("c2", "CT1").unwrap(), expected);
    }

    #[rstest]
    fn test_missing_everywhere() {
        let tempdir = tempfile::tempdir().unwrap();
        let dirs = SourceDirs::new(tempdir.path().join("targets"), None, false);

        let result = dirs.signal_file("c1", "CT1");
        assert!(matches!(
            result,
            Err(AccuracyError::MissingSource { fallback: None, .. })
        ));
    }
}
