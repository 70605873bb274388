//! Integration tests for Lockstage

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use sha2::{Digest, Sha256};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A tool bundle, a working tree and an isolated config
    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let ws = Self {
                dir: TempDir::new().unwrap(),
            };
            fs::create_dir_all(ws.action()).unwrap();
            fs::create_dir_all(ws.work()).unwrap();
            ws.write_config("");
            ws
        }

        fn action(&self) -> PathBuf {
            self.dir.path().join("action")
        }

        fn work(&self) -> PathBuf {
            self.dir.path().join("work")
        }

        fn config(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn output(&self) -> PathBuf {
            self.dir.path().join("github_output")
        }

        fn cache(&self) -> PathBuf {
            self.dir.path().join("cache")
        }

        fn write(root: &Path, relative: &str, contents: &str) {
            let path = root.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        fn write_config(&self, extra: &str) {
            let config = format!(
                "[cache]\ndir = {:?}\n{}",
                self.cache().display().to_string(),
                extra
            );
            fs::write(self.config(), config).unwrap();
        }

        fn lockstage(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("lockstage");
            for var in [
                "GITHUB_OUTPUT",
                "GITHUB_ACTION_PATH",
                "GITHUB_WORKSPACE",
                "LOCKSTAGE_SOURCE_ROOT",
                "LOCKSTAGE_TARGET_ROOT",
                "LOCKSTAGE_LOG",
            ] {
                cmd.env_remove(var);
            }
            cmd.env("LOCKSTAGE_CONFIG", self.config());
            cmd
        }

        fn stage(&self, manifest: &str) -> Command {
            let mut cmd = self.lockstage();
            cmd.arg("stage")
                .arg(manifest)
                .arg("--source-root")
                .arg(self.action())
                .arg("--target-root")
                .arg(self.work())
                .arg("--output-file")
                .arg(self.output());
            cmd
        }
    }

    fn cache_key(contents: &str) -> String {
        let digest = Sha256::digest(contents.as_bytes());
        format!("lockstage-{}", hex::encode(&digest[..6]))
    }

    #[test]
    fn help_displays() {
        let ws = Workspace::new();
        ws.lockstage()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("stage dependency manifests"));
    }

    #[test]
    fn version_displays() {
        let ws = Workspace::new();
        ws.lockstage()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("lockstage"));
    }

    #[test]
    fn stages_into_natural_destination() {
        let ws = Workspace::new();
        Workspace::write(&ws.action(), "deps/poetry.lock", "bundled\n");

        ws.stage("deps/poetry.lock")
            .assert()
            .success()
            .stdout("deps/poetry.lock\n");

        assert_eq!(
            fs::read_to_string(ws.work().join("deps/poetry.lock")).unwrap(),
            "bundled\n"
        );
        assert_eq!(
            fs::read_to_string(ws.output()).unwrap(),
            "cache-dependency-path=deps/poetry.lock\n"
        );
    }

    #[test]
    fn conflicting_file_gets_isolated_copy() {
        let ws = Workspace::new();
        Workspace::write(&ws.action(), "poetry.lock", "bundled\n");
        Workspace::write(&ws.work(), "poetry.lock", "project\n");

        let assert = ws
            .stage("poetry.lock")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("lockstage-"))
            .stdout(predicate::str::ends_with("/poetry.lock\n"));

        let reported = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        let reported = reported.trim();
        assert_eq!(
            fs::read_to_string(ws.work().join(reported)).unwrap(),
            "bundled\n"
        );
        assert_eq!(
            fs::read_to_string(ws.work().join("poetry.lock")).unwrap(),
            "project\n"
        );
    }

    #[test]
    fn missing_source_fails() {
        let ws = Workspace::new();

        ws.stage("poetry.lock")
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::is_match(r"WARN.*Dependency manifest .*poetry\.lock does not exist").unwrap())
            .stderr(predicate::str::contains("Error:"));

        assert!(!ws.output().exists());
    }

    #[test]
    fn empty_manifest_is_a_noop() {
        let ws = Workspace::new();

        ws.stage("").assert().success().stdout("").stderr("");
        ws.stage("")
            .arg("--format")
            .arg("json")
            .assert()
            .success()
            .stdout("")
            .stderr("");

        assert!(!ws.output().exists());
        assert_eq!(fs::read_dir(ws.work()).unwrap().count(), 0);
    }

    #[test]
    fn copy_failure_logs_warning() {
        let ws = Workspace::new();
        Workspace::write(&ws.action(), "poetry.lock", "bundled\n");
        // A regular file where the working tree should be: no copy can land
        let work_file = ws.dir.path().join("work-file");
        fs::write(&work_file, "").unwrap();

        ws.lockstage()
            .arg("stage")
            .arg("poetry.lock")
            .arg("--source-root")
            .arg(ws.action())
            .arg("--target-root")
            .arg(&work_file)
            .arg("--output-file")
            .arg(ws.output())
            .assert()
            .failure()
            .stderr(predicate::str::is_match(r"WARN.*Failed to copy").unwrap())
            .stderr(predicate::str::contains("did not materialize"));

        assert!(!ws.output().exists());
    }

    #[test]
    fn json_outcome() {
        let ws = Workspace::new();
        Workspace::write(&ws.action(), "uv.lock", "bundled\n");

        ws.stage("uv.lock")
            .arg("--format")
            .arg("json")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""status": "staged""#))
            .stdout(predicate::str::contains(r#""dependency_path": "uv.lock""#));
    }

    #[test]
    fn custom_prefix_and_output_name() {
        let ws = Workspace::new();
        ws.write_config("[staging]\nisolated_prefix = \"setup-cache\"\noutput_name = \"lock-path\"\n");
        Workspace::write(&ws.action(), "uv.lock", "bundled\n");
        Workspace::write(&ws.work(), "uv.lock", "project\n");

        ws.stage("uv.lock")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("setup-cache-"));

        assert!(fs::read_to_string(ws.output())
            .unwrap()
            .starts_with("lock-path=setup-cache-"));
    }

    #[test]
    fn restores_local_cache_entry() {
        let ws = Workspace::new();
        Workspace::write(&ws.action(), "poetry.lock", "requests 2.32\n");
        let entry = ws.cache().join(cache_key("requests 2.32\n"));
        Workspace::write(&entry, ".venv/marker", "restored");

        ws.stage("poetry.lock").assert().success();

        assert_eq!(
            fs::read_to_string(ws.work().join(".venv/marker")).unwrap(),
            "restored"
        );
    }

    #[test]
    fn no_restore_skips_cache() {
        let ws = Workspace::new();
        Workspace::write(&ws.action(), "poetry.lock", "requests 2.32\n");
        let entry = ws.cache().join(cache_key("requests 2.32\n"));
        Workspace::write(&entry, ".venv/marker", "restored");

        ws.stage("poetry.lock").arg("--no-restore").assert().success();

        assert!(!ws.work().join(".venv").exists());
    }

    #[test]
    fn invalid_config_reported() {
        let ws = Workspace::new();
        ws.write_config("[staging]\nisolated_prefix = \"../up\"\n");

        ws.lockstage()
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("staging.isolated_prefix"));
    }

    #[test]
    fn config_path() {
        let ws = Workspace::new();
        ws.lockstage()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_writes_defaults_once() {
        let ws = Workspace::new();
        fs::remove_file(ws.config()).unwrap();

        ws.lockstage().args(["config", "init"]).assert().success();
        let written = fs::read_to_string(ws.config()).unwrap();
        assert!(written.contains("isolated_prefix = \"lockstage\""));

        fs::write(ws.config(), "[staging]\noutput_name = \"kept\"\n").unwrap();
        ws.lockstage().args(["config", "init"]).assert().success();
        assert!(fs::read_to_string(ws.config()).unwrap().contains("kept"));

        ws.lockstage()
            .args(["config", "init", "--force"])
            .assert()
            .success();
        assert!(!fs::read_to_string(ws.config()).unwrap().contains("kept"));
    }

    #[test]
    fn config_loading_is_logged_with_verbose() {
        let ws = Workspace::new();
        fs::remove_file(ws.config()).unwrap();

        ws.lockstage()
            .args(["-v", "config", "path"])
            .assert()
            .success()
            .stderr(predicate::str::is_match(r"No config at .*config\.toml, using defaults").unwrap());
    }

    #[test]
    fn config_show() {
        let ws = Workspace::new();
        ws.lockstage()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[staging]"));
    }
}
