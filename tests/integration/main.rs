//! Integration tests for memdrop

mod fake_memcached;

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    use crate::fake_memcached;

    fn memdrop() -> Command {
        cargo_bin_cmd!("memdrop")
    }

    /// Isolated site layout with its own config file
    struct Site {
        dir: TempDir,
    }

    impl Site {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let root = dir.path();
            fs::create_dir_all(root.join("wp-content")).unwrap();

            let config = format!(
                r#"
[general]
audit_log = false

[backend]
account = "alice"
home_root = '{home}'
connect_timeout_ms = 500
io_timeout_ms = 500

[dropin]
content_dir = '{content}'

[settings]
path = '{options}'
"#,
                home = root.join("home").display(),
                content = root.join("wp-content").display(),
                options = root.join("options.json").display(),
            );
            fs::write(root.join("config.toml"), config).unwrap();

            Self { dir }
        }

        fn with_port(port: u16) -> Self {
            let site = Self::new();
            site.write_status(&format!("memcache||{}\n", port));
            site
        }

        fn write_status(&self, contents: &str) {
            let status_dir = self.dir.path().join("home").join("alice").join(".SGCache");
            fs::create_dir_all(&status_dir).unwrap();
            fs::write(status_dir.join("cache_status"), contents).unwrap();
        }

        fn config_path(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn dropin(&self) -> PathBuf {
            self.dir.path().join("wp-content").join("object-cache.php")
        }

        fn options(&self) -> serde_json::Value {
            let path = self.dir.path().join("options.json");
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
        }

        fn run(&self, args: &[&str]) -> assert_cmd::assert::Assert {
            memdrop()
                .arg("--config")
                .arg(self.config_path())
                .args(args)
                .assert()
        }
    }

    fn exists(path: &Path) -> bool {
        path.is_file()
    }

    #[test]
    fn help_displays() {
        memdrop()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("dropin manager"));
    }

    #[test]
    fn version_displays() {
        memdrop()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("memdrop"));
    }

    #[test]
    fn config_path_follows_flag() {
        let site = Site::new();
        site.run(&["config", "path"])
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let site = Site::new();
        site.run(&["config", "show"])
            .success()
            .stdout(predicate::str::contains("[backend]"))
            .stdout(predicate::str::contains("alice"));
    }

    #[test]
    fn toggle_unknown_parameter() {
        let site = Site::new();
        site.run(&["toggle", "varnish"])
            .failure()
            .stderr(predicate::str::contains("Unknown parameter"));
    }

    #[test]
    fn enable_installs_dropin_and_saves_setting() {
        let port = fake_memcached::spawn(false);
        let site = Site::with_port(port);

        site.run(&["enable"]).success();

        let dropin = fs::read_to_string(site.dropin()).unwrap();
        assert!(dropin.contains(&format!("127.0.0.1:{}", port)));
        assert!(!dropin.contains("@changedefaults@"));
        assert_eq!(site.options()["enable_memcached"], 1);
    }

    #[test]
    fn enable_with_bad_backend_fails_closed() {
        let port = fake_memcached::spawn(true);
        let site = Site::with_port(port);

        site.run(&["enable"])
            .failure()
            .stderr(predicate::str::contains("did not return the test value"));

        assert!(!exists(&site.dropin()));
    }

    #[test]
    fn toggle_without_backend_reports_prior_state() {
        let site = Site::new();

        site.run(&["toggle", "memcached"])
            .failure()
            .stdout(predicate::str::starts_with("0"))
            .stderr(predicate::str::contains(
                "Please, first enable Memcached from your cPanel!",
            ));

        assert!(!exists(&site.dropin()));
    }

    #[test]
    fn toggle_on_then_off() {
        let port = fake_memcached::spawn(false);
        let site = Site::with_port(port);

        site.run(&["toggle", "memcached"])
            .success()
            .stdout(predicate::str::starts_with("1"));
        assert!(exists(&site.dropin()));

        site.run(&["toggle", "memcached"])
            .success()
            .stdout(predicate::str::starts_with("0"));
        assert!(!exists(&site.dropin()));
        assert_eq!(site.options()["enable_memcached"], 0);
    }

    #[test]
    fn disable_twice_succeeds() {
        let port = fake_memcached::spawn(false);
        let site = Site::with_port(port);
        site.run(&["enable"]).success();

        site.run(&["disable"]).success();
        site.run(&["disable"])
            .success()
            .stdout(predicate::str::contains("already disabled"));
        assert!(!exists(&site.dropin()));
    }

    #[test]
    fn reconcile_restores_deleted_dropin() {
        let port = fake_memcached::spawn(false);
        let site = Site::with_port(port);
        site.run(&["enable"]).success();
        fs::remove_file(site.dropin()).unwrap();

        site.run(&["reconcile"])
            .success()
            .stdout(predicate::str::contains("Corrected drift"));

        assert!(exists(&site.dropin()));
    }

    #[test]
    fn reconcile_degrades_setting_when_backend_vanishes() {
        let port = fake_memcached::spawn(false);
        let site = Site::with_port(port);
        site.run(&["enable"]).success();
        fs::remove_file(site.dropin()).unwrap();
        site.write_status("dynamic||on\n");

        site.run(&["reconcile"])
            .success()
            .stdout(predicate::str::contains("Setting changed to"));

        assert_eq!(site.options()["enable_memcached"], 0);
    }

    #[test]
    fn status_json_reports_drift() {
        let site = Site::with_port(11211);
        fs::write(site.dropin(), "<?php // stale").unwrap();

        let output = site
            .run(&["status", "--no-probe", "--format", "json"])
            .success()
            .get_output()
            .stdout
            .clone();
        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(report["desired"], false);
        assert_eq!(report["dropin"]["present"], true);
        assert_eq!(report["dropin"]["current"], false);
        assert_eq!(report["endpoint"], "127.0.0.1:11211");
        assert_eq!(report["converged"], false);
        assert!(report["probe"].is_null());
    }
}
