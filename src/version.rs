//! Component version registration.
//!
//! At startup the probe records which version of itself is deployed by writing
//! `<version_dir>/<component>.ver`. A missing record means the deployment is
//! broken, so any failure here stops the process before it serves.

use std::io::Write;
use std::path::{Path, PathBuf};

/// Extension of version record files
const VERSION_FILE_EXTENSION: &str = "ver";

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("Invalid component name: {0:?}")]
    InvalidComponent(String),

    #[error("Kubeconfig {path} is not usable: {reason}")]
    KubeConfig { path: String, reason: String },

    #[error("Failed to write version file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Write the version record for `component` and return its path.
///
/// When `kube_config_path` is given it must point at an existing file.
pub fn register_version(
    component: &str,
    version: &str,
    kube_config_path: Option<&Path>,
    version_dir: &Path,
) -> Result<PathBuf, VersionError> {
    if component.is_empty()
        || component.contains(|c: char| c == '/' || c == '\\')
        || component.starts_with('.')
    {
        return Err(VersionError::InvalidComponent(component.to_string()));
    }

    if let Some(path) = kube_config_path {
        check_kube_config(path)?;
    }

    let target = version_dir.join(format!("{}.{}", component, VERSION_FILE_EXTENSION));
    write_atomically(version_dir, &target, version).map_err(|source| VersionError::Write {
        path: target.display().to_string(),
        source,
    })?;

    tracing::info!(
        component,
        version,
        path = %target.display(),
        "Registered component version"
    );
    Ok(target)
}

fn check_kube_config(path: &Path) -> Result<(), VersionError> {
    let reason = match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => return Ok(()),
        Ok(_) => "not a regular file".to_string(),
        Err(e) => e.to_string(),
    };
    Err(VersionError::KubeConfig {
        path: path.display().to_string(),
        reason,
    })
}

/// Write through a sibling temp file and rename so readers never see a partial record.
fn write_atomically(dir: &Path, target: &Path, version: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut tmp_name = target.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    {
        let mut file = std::fs::File::create(&tmp)?;
        writeln!(file, "{}", version)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_version_writes_record() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("version");

        let path = register_version("liveness-probe", "1.2.3", None, &dir).unwrap();

        assert_eq!(path, dir.join("liveness-probe.ver"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.2.3\n");
        assert!(!dir.join("liveness-probe.ver.tmp").exists());
    }

    #[test]
    fn test_register_version_overwrites_previous_record() {
        let tmp = tempfile::tempdir().unwrap();

        register_version("liveness-probe", "1.0.0", None, tmp.path()).unwrap();
        let path = register_version("liveness-probe", "2.0.0", None, tmp.path()).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "2.0.0\n");
    }

    #[test]
    fn test_register_version_accepts_existing_kubeconfig() {
        let tmp = tempfile::tempdir().unwrap();
        let kubeconfig = tmp.path().join("kubeconfig");
        std::fs::write(&kubeconfig, "apiVersion: v1\n").unwrap();

        assert!(register_version("liveness-probe", "1.0.0", Some(&kubeconfig), tmp.path()).is_ok());
    }

    #[test]
    fn test_register_version_rejects_missing_kubeconfig() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");

        let err = register_version("liveness-probe", "1.0.0", Some(&missing), tmp.path())
            .unwrap_err();
        assert!(matches!(err, VersionError::KubeConfig { .. }));
        assert!(!tmp.path().join("liveness-probe.ver").exists());
    }

    #[test]
    fn test_register_version_rejects_directory_kubeconfig() {
        let tmp = tempfile::tempdir().unwrap();

        let err = register_version("liveness-probe", "1.0.0", Some(tmp.path()), tmp.path())
            .unwrap_err();
        assert!(matches!(err, VersionError::KubeConfig { .. }));
    }

    #[test]
    fn test_register_version_rejects_bad_component() {
        let tmp = tempfile::tempdir().unwrap();

        for name in ["", "../escape", ".hidden"] {
            assert!(matches!(
                register_version(name, "1.0.0", None, tmp.path()),
                Err(VersionError::InvalidComponent(_))
            ));
        }
    }

    #[test]
    fn test_register_version_fails_when_dir_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"").unwrap();

        assert!(matches!(
            register_version("liveness-probe", "1.0.0", None, &blocker),
            Err(VersionError::Write { .. })
        ));
    }
}
