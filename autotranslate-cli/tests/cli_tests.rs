use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn autotranslate_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("autotranslate"));
    cmd.current_dir(dir)
        .env_remove("DEEPL_AUTH_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn android_project(dir: &Path) {
    write(
        &dir.join("res/values/strings.xml"),
        r#"<resources><string name="hello">Hello</string></resources>"#,
    );
    write(
        &dir.join("res/values-de/strings.xml"),
        r#"<resources><string name="hello">Hallo</string></resources>"#,
    );
    fs::create_dir_all(dir.join("res/values-fr")).unwrap();
}

#[test]
fn test_plan_lists_pending_files() {
    let temp_dir = TempDir::new().unwrap();
    android_project(temp_dir.path());
    write(
        &temp_dir.path().join("autotranslate.toml"),
        "source_language = \"en\"\n[strings_xml]\nres_directory = \"res\"\n",
    );

    let output = autotranslate_cmd(temp_dir.path())
        .arg("plan")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("values-fr"));
    assert!(!stdout.contains("values-de"));
    assert!(!temp_dir.path().join("res/values-fr/strings.xml").exists());
}

#[test]
fn test_plan_with_flags_only() {
    let temp_dir = TempDir::new().unwrap();
    android_project(temp_dir.path());

    let output = autotranslate_cmd(temp_dir.path())
        .args([
            "plan",
            "--res-directory",
            "res",
            "-s",
            "en",
            "-t",
            "de,it",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("values-it"));
    assert!(!stdout.contains("values-fr"));
}

#[test]
fn test_translate_without_provider_fails() {
    let temp_dir = TempDir::new().unwrap();
    android_project(temp_dir.path());

    let output = autotranslate_cmd(temp_dir.path())
        .args(["translate", "--res-directory", "res"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No [provider] configured"));
}

#[test]
fn test_translate_with_invalid_provider_fails_before_work() {
    let temp_dir = TempDir::new().unwrap();
    android_project(temp_dir.path());
    write(
        &temp_dir.path().join("autotranslate.toml"),
        "source_language = \"en\"\n[strings_xml]\nres_directory = \"res\"\n[provider]\ntype = \"deepl\"\n",
    );

    let output = autotranslate_cmd(temp_dir.path())
        .arg("translate")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("provider DeepL is invalid: 'auth_key' must be set"));
    assert!(!temp_dir.path().join("res/values-fr/strings.xml").exists());
}

#[test]
fn test_translate_with_missing_res_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir.path().join("config/custom.toml"),
        "[strings_xml]\nres_directory = \"does-not-exist\"\n[provider]\ntype = \"libre_translate\"\nbase_url = \"http://127.0.0.1:9\"\n",
    );

    let output = autotranslate_cmd(temp_dir.path())
        .args(["translate", "--config", "config/custom.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist"));
}

#[test]
fn test_translate_up_to_date_project_makes_no_requests() {
    let temp_dir = TempDir::new().unwrap();
    android_project(temp_dir.path());
    fs::remove_dir(temp_dir.path().join("res/values-fr")).unwrap();
    let before = fs::read(temp_dir.path().join("res/values-de/strings.xml")).unwrap();
    write(
        &temp_dir.path().join("autotranslate.toml"),
        "source_language = \"en\"\n[strings_xml]\nres_directory = \"res\"\n[provider]\ntype = \"libre_translate\"\nbase_url = \"http://127.0.0.1:9\"\n",
    );
    let report_path = temp_dir.path().join("report.json");

    let output = autotranslate_cmd(temp_dir.path())
        .args(["translate", "--report-json", report_path.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("up to date"));
    assert!(stdout.contains("Summary: 0 updated, 1 skipped, 0 failed, 0 cancelled"));
    assert_eq!(
        fs::read(temp_dir.path().join("res/values-de/strings.xml")).unwrap(),
        before
    );

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["strings_xml"]["locales"][0]["status"], "skipped");
}

#[test]
fn test_translate_reports_unreachable_provider_as_failed_locale() {
    let temp_dir = TempDir::new().unwrap();
    android_project(temp_dir.path());
    write(
        &temp_dir.path().join("autotranslate.toml"),
        "source_language = \"en\"\nrequest_timeout_secs = 2\n[strings_xml]\nres_directory = \"res\"\n[provider]\ntype = \"libre_translate\"\nbase_url = \"http://127.0.0.1:9\"\n",
    );

    let output = autotranslate_cmd(temp_dir.path())
        .arg("translate")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAILED"));
    assert!(stdout.contains("1 failed"));
    assert!(!temp_dir.path().join("res/values-fr/strings.xml").exists());
}

#[test]
fn test_verbose_plan_logs_configuration_file() {
    let temp_dir = TempDir::new().unwrap();
    android_project(temp_dir.path());
    write(
        &temp_dir.path().join("autotranslate.toml"),
        "[strings_xml]\nres_directory = \"res\"\n",
    );

    let output = autotranslate_cmd(temp_dir.path())
        .args(["plan", "--verbose"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loading configuration from autotranslate.toml"));
}

#[test]
fn test_translate_help_describes_interruption() {
    let temp_dir = TempDir::new().unwrap();

    let output = autotranslate_cmd(temp_dir.path())
        .args(["translate", "--help"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("only available to library callers"));
    assert!(stdout.contains("CancelToken"));
}
