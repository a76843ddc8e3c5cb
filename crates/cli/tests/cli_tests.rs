// End-to-end tests for the `skucheck` binary.
// Run with: cargo test -p skucheck-cli --test cli_tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use skucheck_io::xlsx;
use skucheck_recon::{Table, Value};
use tempfile::{tempdir, TempDir};

const RECEIPTS: &str = "\
receipt_id,sku,response
1,A1,STORE_X
2,A1,
3,B1,STORE_X
4,Z9,МАРКЕТПЛЕЙС
5,Z9,STORE_X
";

const JOB: &str = r#"
[paths]
receipts = "in/receipts.csv"
partners = "in/partners.csv"
catalogue = ["ref/primary.xlsx", "ref/fallback.xlsx"]
output_dir = "out"
"#;

fn skucheck() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_skucheck"));
    cmd.env_remove("RUST_LOG")
        .env_remove("SKUCHECK_CONFIG")
        .env_remove("SKUCHECK_BASE_DIR");
    cmd
}

fn code(output: &Output) -> i32 {
    output.status.code().expect("exit code")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

struct Project {
    dir: TempDir,
}

impl Project {
    /// Receipts, partners and job config in place; no catalogue yet.
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("in")).unwrap();
        fs::create_dir_all(root.join("ref")).unwrap();
        fs::write(root.join("in/receipts.csv"), RECEIPTS).unwrap();
        fs::write(root.join("in/partners.csv"), "partner_id\np1\np2\n").unwrap();
        fs::write(root.join("job.toml"), JOB).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self) -> PathBuf {
        self.root().join("job.toml")
    }

    fn write_catalogue(&self, name: &str, columns: &[&str]) {
        let rows = vec![
            vec![Value::text("A1"), Value::text("frame"), Value::text("A1")],
            vec![Value::text("B1"), Value::text("lens"), Value::text("B2")],
        ]
        .into_iter()
        .map(|mut r| {
            r.truncate(columns.len());
            r
        })
        .collect();
        let table = Table::from_rows("catalogue", columns, rows).unwrap();
        xlsx::write_table(&table, &self.root().join("ref").join(name), "Sheet1").unwrap();
    }

    fn run(&self, extra: &[&str]) -> Output {
        skucheck()
            .arg("run")
            .arg("--config")
            .arg(self.config())
            .arg("--base-dir")
            .arg(self.root())
            .args(extra)
            .output()
            .unwrap()
    }
}

#[test]
fn run_writes_partitions_and_report() {
    let project = Project::new();
    project.write_catalogue("primary.xlsx", &["sku_code", "title", "corr_sku"]);

    let output = project.run(&[]);
    assert_eq!(code(&output), 0, "stderr: {}", stderr(&output));

    let out = project.root().join("out");
    assert!(out.join("result_not_null.csv").exists());
    assert!(out.join("result_null.csv").exists());
    assert!(out.join("stats_result_final.xlsx").exists());

    let report = xlsx::read_table(&out.join("stats_result_final.xlsx"), None).unwrap();
    assert_eq!(report.len(), 5);
    assert!(stderr(&output).contains("5 rows"));
}

#[test]
fn run_json_summary_on_stdout() {
    let project = Project::new();
    project.write_catalogue("fallback.xlsx", &["sku_code", "title", "corr_sku"]);

    let output = project.run(&["--json", "-q"]);
    assert_eq!(code(&output), 0, "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let summary = &json["summary"];
    assert_eq!(summary["input_rows"], 5);
    assert_eq!(summary["not_null_rows"], 4);
    assert_eq!(summary["null_rows"], 1);
    assert_eq!(summary["outcomes"]["1_1"], 2);
    assert_eq!(summary["outcomes"]["1_0"], 1);
    assert_eq!(summary["outcomes"]["0_1"], 1);
    assert_eq!(summary["outcomes"]["0_0"], 1);
    assert!(json["meta"]["engine_version"].is_string());
    assert!(json["paths"]["catalogue"]
        .as_str()
        .unwrap()
        .ends_with("fallback.xlsx"));
}

#[test]
fn missing_catalogue_exits_4() {
    let project = Project::new();

    let output = project.run(&[]);
    assert_eq!(code(&output), 4);
    let err = stderr(&output);
    assert!(err.contains("error:"));
    assert!(err.contains("hint:"));
    assert!(!project.root().join("out/stats_result_final.xlsx").exists());
}

#[test]
fn catalogue_without_corr_sku_exits_3() {
    let project = Project::new();
    project.write_catalogue("primary.xlsx", &["sku_code", "title"]);

    let output = project.run(&[]);
    assert_eq!(code(&output), 3);
    assert!(stderr(&output).contains("corr_sku"));

    let out = project.root().join("out");
    assert!(out.join("result_not_null.csv").exists());
    assert!(!out.join("stats_result_final.xlsx").exists());
}

#[test]
fn missing_partners_exits_4() {
    let project = Project::new();
    project.write_catalogue("primary.xlsx", &["sku_code", "title", "corr_sku"]);
    fs::remove_file(project.root().join("in/partners.csv")).unwrap();

    let output = project.run(&[]);
    assert_eq!(code(&output), 4);
    assert!(!project.root().join("out/result_not_null.csv").exists());
}

#[test]
fn bad_config_exits_7() {
    let project = Project::new();
    fs::write(project.config(), "[verify.channels]\nspecial = []\n").unwrap();

    let output = project.run(&[]);
    assert_eq!(code(&output), 7);
}

#[test]
fn missing_config_file_exits_7() {
    let dir = tempdir().unwrap();
    let output = skucheck()
        .args(["run", "--config"])
        .arg(dir.path().join("nope.toml"))
        .output()
        .unwrap();
    assert_eq!(code(&output), 7);
}

#[test]
fn paths_lists_resolved_locations() {
    let project = Project::new();
    project.write_catalogue("fallback.xlsx", &["sku_code", "title", "corr_sku"]);

    let output = skucheck()
        .arg("paths")
        .arg("--config")
        .arg(project.config())
        .arg("--base-dir")
        .arg(project.root())
        .output()
        .unwrap();
    assert_eq!(code(&output), 0, "stderr: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fallback.xlsx"));
    assert!(stdout.contains("stats_result_final.xlsx"));
}

#[test]
fn no_command_is_usage_error() {
    let output = skucheck().output().unwrap();
    assert_eq!(code(&output), 2);
}
