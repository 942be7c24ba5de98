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
    let home = std::env::temp_dir().join(format!("devdiag-info-test-{}-{seq}", std::process::id()));
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

const CONFIG: &[u8] = br#"
[package]
name = "@acme/cli"

[[plugins]]
name = "@acme/plugin-deploy"
version = "2.1.0"
type = "user"

[[plugins]]
name = "@acme/plugin-deploy-helpers"
version = "0.3.0"
type = "core"
parent = "@acme/plugin-deploy"

[[plugins]]
name = "@acme/plugin-auth"
version = "1.0.4"
type = "link"
"#;

fn home_with_plugins() -> PathBuf {
    let home = make_temp_home();
    write_file(home.join(".config/devdiag/config.toml").as_path(), CONFIG);
    home
}

#[test]
fn info_text_lists_top_level_plugins() {
    let home = home_with_plugins();
    let out = run(&home, &["--timeout", "5", "info"]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("  System:\n"), "stdout={stdout}");
    assert!(stdout.contains("  npmGlobalPackages:\n    @acme/cli: "));
    let plugins: Vec<&str> = stdout
        .lines()
        .skip_while(|l| *l != "  CLI plugins:")
        .skip(1)
        .collect();
    assert_eq!(
        plugins,
        vec![
            "    @acme/plugin-deploy 2.1.0 (user)",
            "    @acme/plugin-auth 1.0.4 (link)",
        ]
    );
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn info_json_has_cli_plugins_key() {
    let home = home_with_plugins();
    let out = run(&home, &["--timeout", "5", "info", "--json"]);
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    for key in ["System", "Binaries", "Virtualization", "npmGlobalPackages"] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    assert!(v["System"].get("OS").is_some());
    assert_eq!(
        v["CLI Plugins"],
        serde_json::json!([
            {"name": "@acme/plugin-deploy", "version": "2.1.0", "type": "user"},
            {"name": "@acme/plugin-auth", "version": "1.0.4", "type": "link"},
        ])
    );
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn info_yml_has_cli_plugins_key() {
    let home = home_with_plugins();
    let out = run(&home, &["--timeout", "5", "info", "-y"]);
    assert!(out.status.success());

    let v: serde_yaml::Value = serde_yaml::from_slice(&out.stdout).expect("parse yaml");
    let plugins = v["CLI Plugins"].as_sequence().expect("plugin list");
    assert_eq!(plugins.len(), 2);
    assert_eq!(plugins[0]["name"].as_str(), Some("@acme/plugin-deploy"));
    assert!(v["Binaries"].as_mapping().is_some());
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn info_without_config_lists_itself() {
    let home = make_temp_home();
    let out = run(&home, &["--timeout", "5", "info", "--json"]);
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    assert_eq!(v["CLI Plugins"][0]["name"], "devdiag");
    assert_eq!(v["CLI Plugins"][0]["type"], "core");
    let _ = std::fs::remove_dir_all(&home);
}
