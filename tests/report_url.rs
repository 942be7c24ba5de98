use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

fn devdiag_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_devdiag"));
    cmd.env("HOME", home);
    cmd.env_remove("DEVDIAG_CONFIG");
    cmd.env_remove("DEVDIAG_PACKAGE_NAME");
    cmd.env_remove("DEVDIAG_BUGS_URL");
    cmd.env_remove("DEVDIAG_UI_COLOR");
    cmd.env_remove("DEVDIAG_PROBE_TIMEOUT_SECS");
    cmd.env_remove("DEVDIAG_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    devdiag_cmd(home).args(args).output().expect("run devdiag")
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let home = std::env::temp_dir().join(format!("devdiag-report-test-{}-{seq}", std::process::id()));
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdirs");
    }
    std::fs::write(path, bytes).expect("write");
}

fn opened_url(out: &Output) -> String {
    let stdout = String::from_utf8_lossy(&out.stdout);
    stdout
        .lines()
        .find_map(|l| l.strip_prefix("dry-run: would open "))
        .expect("dry-run line")
        .to_string()
}

#[test]
fn feature_request_uses_configured_tracker() {
    let home = make_temp_home();
    write_file(
        home.join(".config/devdiag/config.toml").as_path(),
        b"[bugs]\nurl = \"https://github.com/acme/cli/issues\"\n",
    );
    let out = run(&home, &["--dry-run", "report", "-f"]);
    assert!(out.status.success());

    let url = opened_url(&out);
    assert!(
        url.starts_with("https://github.com/acme/cli/issues/new?labels=enhancement"),
        "url={url}"
    );
    assert!(!url.contains("body="));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn feature_request_without_tracker_falls_back() {
    let home = make_temp_home();
    let out = run(&home, &["--dry-run", "report", "--feature"]);
    assert!(out.status.success());
    assert!(opened_url(&out).contains("template=feature_request.md"));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn bug_report_embeds_diagnostics() {
    let home = make_temp_home();
    write_file(
        home.join(".config/devdiag/config.toml").as_path(),
        b"[bugs]\nurl = \"https://github.com/acme/cli/issues\"\n",
    );
    let out = run(&home, &["--dry-run", "--timeout", "5", "report"]);
    assert!(out.status.success());

    let url = opened_url(&out);
    assert!(url.contains("labels=bug"), "url={url}");
    assert!(url.contains("template=bug_report.md"));
    assert!(url.contains("&body="));
    assert!(url.contains("System%3A"), "url={url}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn relative_tracker_url_is_used_as_configured() {
    let home = make_temp_home();

    let out = devdiag_cmd(&home)
        .env("DEVDIAG_BUGS_URL", "some-link")
        .args(["--dry-run", "--timeout", "5", "report"])
        .output()
        .expect("run devdiag");
    assert!(out.status.success());
    let url = opened_url(&out);
    assert!(url.starts_with("some-link/new?labels=bug&"), "url={url}");
    assert!(url.contains("&body="));

    let out = devdiag_cmd(&home)
        .env("DEVDIAG_BUGS_URL", "some-link")
        .args(["--dry-run", "report", "-f"])
        .output()
        .expect("run devdiag");
    assert!(out.status.success());
    assert_eq!(
        opened_url(&out),
        "some-link/new?labels=enhancement&template=feature_request.md"
    );

    let _ = std::fs::remove_dir_all(&home);
}
