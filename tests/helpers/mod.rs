use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ICCID_A: &str = "98410800004860024951";
pub const ICCID_B: &str = "98109909002143658739";

/// Scratch directory holding an ICCID config and a settings file, so runs
/// never depend on the working directory or the per-user config dir
pub struct LabDir {
    pub temp_dir: TempDir,
}

#[allow(dead_code)]
impl LabDir {
    pub fn new() -> Self {
        let lab = LabDir {
            temp_dir: tempfile::tempdir().unwrap(),
        };
        lab.write_settings("");
        lab
    }

    /// Lab dir whose config lists the two standard ICCIDs
    pub fn with_two_iccids() -> Self {
        let lab = Self::new();
        lab.write_config(&format!(r#"{{"iccid": ["{}", "{}"]}}"#, ICCID_A, ICCID_B));
        lab
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("lpa_config")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.path().join("settings.toml")
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).unwrap();
    }

    pub fn write_settings(&self, content: &str) {
        fs::write(self.settings_path(), content).unwrap();
    }

    /// Command preloaded with `--iccid-config` and `--settings`
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo_bin_cmd!("lpa-conformance");
        cmd.current_dir(self.path())
            .arg("--iccid-config")
            .arg(self.config_path())
            .arg("--settings")
            .arg(self.settings_path());
        cmd
    }
}
