//! Integration tests for resonance-guard

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serde_json::Value;
    use std::collections::BTreeSet;
    use std::path::Path;
    use tempfile::TempDir;

    fn resonance(dir: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("resonance");
        cmd.current_dir(dir).env_remove("RESONANCE_LOG");
        cmd
    }

    /// Temp dir with three small text files under `docs/`
    fn workspace() -> TempDir {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("a.txt"), "the quick brown fox").unwrap();
        std::fs::write(docs.join("b.txt"), "jumps over the lazy dog").unwrap();
        std::fs::write(docs.join("c.txt"), "the slow fox sleeps").unwrap();
        std::fs::write(temp.path().join("reference.txt"), "the slow fox").unwrap();
        temp
    }

    fn report(stdout: &[u8]) -> Value {
        serde_json::from_slice(stdout).unwrap()
    }

    fn schema(version: &str) -> Value {
        let name = format!("metrics_v{}.schema.json", version.replace('.', "_"));
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas").join(name);
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn file_set(report: &Value) -> BTreeSet<(String, String, String)> {
        report["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| {
                (
                    f["path"].as_str().unwrap().to_string(),
                    f["score"].to_string(),
                    f["status"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }

    /// Report file entries keyed by path, with the trace removed
    fn without_trace(report: &Value) -> Vec<Value> {
        let mut files: Vec<Value> = report["files"]
            .as_array()
            .unwrap()
            .iter()
            .cloned()
            .map(|mut f| {
                f.as_object_mut().unwrap().remove("spectral_trace");
                f
            })
            .collect();
        files.sort_by(|a, b| a["path"].as_str().cmp(&b["path"].as_str()));
        files
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        resonance(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("batch resonance scoring"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        resonance(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("resonance"));
    }

    #[test]
    fn self_resonance_passes() {
        let temp = workspace();
        let out = resonance(temp.path())
            .args(["--input", "docs", "--seed", "1", "--no-cache"])
            .assert()
            .code(0)
            .get_output()
            .stdout
            .clone();

        let report = report(&out);
        assert_eq!(report["metrics_version"], "1.2");
        assert_eq!(report["overall"]["score"], 1.0);
        assert_eq!(report["overall"]["status"], "ok");
        assert_eq!(report["overall"]["threshold_source"], "Default");
        assert_eq!(report["files"].as_array().unwrap().len(), 3);

        let compiled = jsonschema::JSONSchema::compile(&schema("1.2")).unwrap();
        assert!(compiled.is_valid(&report));
    }

    #[test]
    fn below_threshold_fails() {
        let temp = workspace();
        resonance(temp.path())
            .args([
                "--input",
                "docs/c.txt",
                "--reference",
                "reference.txt",
                "--threshold",
                "0.99",
                "--no-cache",
            ])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("\"threshold_source\": \"CLI\""));
    }

    #[test]
    fn file_count_budget_aborts() {
        let temp = workspace();
        let out = resonance(temp.path())
            .args(["--input", "docs", "--max-file-count", "2"])
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let report = report(&out);
        assert_eq!(report["overall"]["status"], "budget_exceeded");
        assert!(report["files"].as_array().unwrap().is_empty());
        assert!(!temp.path().join(".rescache").exists());
    }

    #[test]
    fn total_bytes_budget_aborts() {
        let temp = workspace();
        resonance(temp.path())
            .args(["--input", "docs", "--max-total-bytes", "10"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("total byte budget (10) exceeded"));
    }

    #[test]
    fn oversized_file_is_skipped_individually() {
        let temp = workspace();
        let out = resonance(temp.path())
            .args(["--input", "docs", "--max-file-size-bytes", "19", "--no-cache"])
            .assert()
            .get_output()
            .stdout
            .clone();

        let report = report(&out);
        let statuses: Vec<&str> = report["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["status"].as_str().unwrap())
            .collect();
        assert_eq!(statuses, vec!["ok", "budget_exceeded", "ok"]);
        assert_eq!(report["overall"]["status"], "ok");
    }

    #[test]
    fn no_input_warns() {
        let temp = TempDir::new().unwrap();
        resonance(temp.path())
            .args(["--input", "missing"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("no_input"));
    }

    #[test]
    fn parallel_matches_sequential() {
        let temp = workspace();
        let run = |jobs: &str| {
            let out = resonance(temp.path())
                .args([
                    "--input",
                    "docs",
                    "--reference",
                    "reference.txt",
                    "--seed",
                    "99",
                    "--jobs",
                    jobs,
                    "--no-cache",
                ])
                .assert()
                .get_output()
                .stdout
                .clone();
            report(&out)
        };

        let sequential = run("1");
        let parallel = run("4");
        assert_eq!(sequential["overall"]["score"], parallel["overall"]["score"]);
        assert_eq!(
            sequential["overall"]["resonance_echo"],
            parallel["overall"]["resonance_echo"]
        );
        assert_eq!(file_set(&sequential), file_set(&parallel));
    }

    #[test]
    fn second_run_hits_cache() {
        let temp = workspace();
        let args = ["--input", "docs", "--seed", "3"];

        let first = report(&resonance(temp.path()).args(args).assert().get_output().stdout);
        let second = report(&resonance(temp.path()).args(args).assert().get_output().stdout);

        assert!(temp.path().join(".rescache").is_dir());
        assert_eq!(file_set(&first), file_set(&second));
        for file in second["files"].as_array().unwrap() {
            assert_eq!(file["spectral_trace"], "Cache hit.");
        }
        assert_eq!(without_trace(&first), without_trace(&second));
        assert_eq!(first["overall"]["score"], second["overall"]["score"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_environment_is_tolerated() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = workspace();
        resonance(temp.path())
            .args(["--input", "docs/a.txt", "--seed", "1", "--no-cache"])
            .env("JUNK", OsStr::from_bytes(b"\xff"))
            .env("RESONANCE_THRESHOLD", OsStr::from_bytes(b"0.\xff"))
            .assert()
            .code(0)
            .stdout(predicate::str::contains("\"threshold_source\": \"Default\""));
    }

    #[test]
    fn schema_change_misses_cache() {
        let temp = workspace();
        resonance(temp.path())
            .args(["--input", "docs", "--seed", "3"])
            .assert();
        let out = resonance(temp.path())
            .args(["--input", "docs", "--seed", "3", "--schema-version", "1.1"])
            .assert()
            .get_output()
            .stdout
            .clone();

        let report = report(&out);
        assert_eq!(report["metrics_version"], "1.1");
        for file in report["files"].as_array().unwrap() {
            assert_ne!(file["spectral_trace"], "Cache hit.");
            assert!(file.get("size_bytes").is_none());
        }
        let compiled = jsonschema::JSONSchema::compile(&schema("1.1")).unwrap();
        assert!(compiled.is_valid(&report));
    }

    #[test]
    fn seed_ten_selects_first_echo() {
        let temp = workspace();
        resonance(temp.path())
            .args(["--input", "docs", "--seed", "10", "--no-cache"])
            .assert()
            .stdout(predicate::str::contains("Silent code, unseen,"));
    }

    #[test]
    fn output_json_writes_file() {
        let temp = workspace();
        resonance(temp.path())
            .args(["--input", "docs", "--output-json", "out/report.json", "--no-cache"])
            .assert()
            .code(0)
            .stdout(predicate::str::is_empty());

        let written = std::fs::read_to_string(temp.path().join("out/report.json")).unwrap();
        assert!(written.contains("\"metrics_version\": \"1.2\""));
    }

    #[test]
    fn unsupported_schema_version_is_error() {
        let temp = workspace();
        resonance(temp.path())
            .args(["--input", "docs", "--schema-version", "9.9"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Unsupported schema version"));
    }

    #[test]
    fn bad_flag_value_is_error() {
        let temp = TempDir::new().unwrap();
        resonance(temp.path())
            .args(["--threshold", "high"])
            .assert()
            .code(3);
    }

    #[test]
    fn validate_schema_only() {
        let temp = TempDir::new().unwrap();
        for version in ["1.1", "1.2"] {
            resonance(temp.path())
                .args(["--validate-schema-only", "--schema-version", version])
                .assert()
                .code(0)
                .stdout(predicate::str::contains("Schema validation successful."));
        }
    }

    #[test]
    fn print_config_shows_defaults() {
        let temp = TempDir::new().unwrap();
        let out = resonance(temp.path())
            .arg("--print-config")
            .assert()
            .code(0)
            .get_output()
            .stdout
            .clone();

        let config: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(config["threshold"], 0.6);
        assert_eq!(config["jobs"], 1);
        assert_eq!(config["schema_version"], "1.2");
        assert_eq!(config["threshold_source"], "Default");
    }

    #[test]
    fn env_overrides_config_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".resonance.toml"),
            "threshold = 0.7\njobs = 2\n",
        )
        .unwrap();

        let out = resonance(temp.path())
            .arg("--print-config")
            .env("RESONANCE_THRESHOLD", "0.8")
            .env("RESONANCE_JOBS", "not-a-number")
            .assert()
            .code(0)
            .get_output()
            .stdout
            .clone();

        let config: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(config["threshold"], 0.8);
        assert_eq!(config["threshold_source"], "Environment");
        assert_eq!(config["jobs"], 2);
    }

    #[test]
    fn cli_overrides_config_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".resonance.toml"),
            "threshold = 0.7\ninclude_globs = [\"*.md\"]\n",
        )
        .unwrap();

        let out = resonance(temp.path())
            .args(["--print-config", "--threshold", "0.9"])
            .assert()
            .code(0)
            .get_output()
            .stdout
            .clone();

        let config: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(config["threshold"], 0.9);
        assert_eq!(config["threshold_source"], "CLI");
        assert_eq!(config["include_globs"][0], "*.md");
    }

    #[test]
    fn verbose_logs_config_layers() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".resonance.toml"), "threshold = 0.7\n").unwrap();

        resonance(temp.path())
            .args(["--print-config", "--verbose"])
            .env("RESONANCE_JOBS", "lots")
            .assert()
            .code(0)
            .stderr(predicate::str::contains("Found local config"))
            .stderr(predicate::str::contains("Ignoring environment override RESONANCE_JOBS"));
    }

    #[test]
    fn malformed_config_file_is_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".resonance.toml"), "threshold = [").unwrap();
        resonance(temp.path())
            .arg("--print-config")
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn verbose_prints_verdict_to_stderr() {
        let temp = workspace();
        resonance(temp.path())
            .args(["--input", "docs", "--seed", "10", "--verbose", "--no-cache"])
            .assert()
            .code(0)
            .stderr(predicate::str::contains("pass"))
            .stderr(predicate::str::contains("Silent code, unseen,"));
    }
}
