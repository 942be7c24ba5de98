use std::io::{IsTerminal, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sysinfo::System;

use crate::core::{Category, DiagnosticReport, Item, ItemValue};
use crate::platform;
use crate::probe::{EnvironmentProbe, ProbeItem, ProbeOptions, ProbeOutput, ProbeRequest};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Inspects the machine the process runs on.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    timeout: Duration,
    show_progress: bool,
}

impl SystemProbe {
    pub fn new(timeout: Duration, show_progress: bool) -> Self {
        Self {
            timeout,
            show_progress,
        }
    }

    pub fn gather(&self, request: &ProbeRequest) -> DiagnosticReport {
        let mut sys = System::new();
        if request.any_item(|i| matches!(i, ProbeItem::Cpu)) {
            sys.refresh_cpu_all();
        }
        if request.any_item(|i| matches!(i, ProbeItem::Memory)) {
            sys.refresh_memory();
        }

        let categories = request
            .categories
            .iter()
            .map(|category| Category {
                name: category.name.clone(),
                items: category
                    .items
                    .iter()
                    .map(|item| Item {
                        name: item.label().to_string(),
                        value: self.probe_item(&sys, item),
                    })
                    .collect(),
            })
            .collect();

        DiagnosticReport { categories }
    }

    fn probe_item(&self, sys: &System, item: &ProbeItem) -> ItemValue {
        tracing::debug!(item = item.label(), "probing");
        match item {
            ProbeItem::Os => os_value(),
            ProbeItem::Cpu => cpu_value(sys),
            ProbeItem::Memory => memory_value(sys),
            ProbeItem::Shell => self.shell_value(),
            ProbeItem::Binary { program, .. } => self.binary_value(program),
            ProbeItem::GlobalPackage(name) => self.global_package_value(name),
        }
    }

    fn shell_value(&self) -> ItemValue {
        let Some(shell) = std::env::var_os("SHELL").filter(|s| !s.is_empty()) else {
            return ItemValue::NotFound;
        };
        let path = Path::new(&shell);
        self.version_of(path)
    }

    fn binary_value(&self, program: &str) -> ItemValue {
        match platform::locate(program) {
            Some(path) => self.version_of(&path),
            None => ItemValue::NotFound,
        }
    }

    fn version_of(&self, path: &Path) -> ItemValue {
        match platform::run_command(path, &["--version"], self.timeout) {
            Ok(out) if out.success() => {
                let version =
                    extract_version(&out.stdout).or_else(|| extract_version(&out.stderr));
                located_or_path(version, path)
            }
            Ok(out) => {
                tracing::warn!(
                    path = %path.display(),
                    exit_code = out.exit_code,
                    "version query failed"
                );
                ItemValue::NotFound
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "version query failed");
                ItemValue::NotFound
            }
        }
    }

    fn global_package_value(&self, name: &str) -> ItemValue {
        let Some(npm) = platform::locate("npm") else {
            return ItemValue::NotFound;
        };
        // `npm ls` exits 1 when the package is missing but still prints JSON.
        let out = match platform::run_command(
            &npm,
            &["ls", "-g", "--depth=0", "--json", name],
            self.timeout,
        ) {
            Ok(out) => out,
            Err(err) => {
                tracing::warn!(package = name, error = %err, "global package query failed");
                return ItemValue::NotFound;
            }
        };
        match global_package_version(&out.stdout, name) {
            Some(version) => ItemValue::Text(version),
            None => ItemValue::NotFound,
        }
    }
}

impl EnvironmentProbe for SystemProbe {
    fn run(&self, request: &ProbeRequest, options: &ProbeOptions) -> Result<ProbeOutput> {
        let progress_enabled = self.show_progress && std::io::stderr().is_terminal();
        let pb = if progress_enabled {
            let pb = indicatif::ProgressBar::new_spinner();
            pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            pb.set_message("Collecting environment info...");
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        let report = self.gather(request);

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let output = ProbeOutput::from_report(report, options);
        if options.console {
            let text = output.clone().into_text();
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
        }
        Ok(output)
    }
}

fn os_value() -> ItemValue {
    let name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| std::env::consts::OS.to_string());
    match System::kernel_version() {
        Some(kernel) if !name.contains(&kernel) => ItemValue::Text(format!("{name} ({kernel})")),
        _ => ItemValue::Text(name),
    }
}

fn cpu_value(sys: &System) -> ItemValue {
    let cpus = sys.cpus();
    let brand = cpus
        .first()
        .map(|c| c.brand().trim().to_string())
        .unwrap_or_default();
    let arch = std::env::consts::ARCH;
    if brand.is_empty() {
        ItemValue::Text(format!("({}) {arch}", cpus.len()))
    } else {
        ItemValue::Text(format!("({}) {arch} {brand}", cpus.len()))
    }
}

fn memory_value(sys: &System) -> ItemValue {
    let total = sys.total_memory();
    if total == 0 {
        return ItemValue::NotFound;
    }
    ItemValue::Text(format!(
        "{:.2} GB / {:.2} GB",
        sys.available_memory() as f64 / GIB,
        total as f64 / GIB
    ))
}

fn located_or_path(version: Option<String>, path: &Path) -> ItemValue {
    let path = path.display().to_string();
    match version {
        Some(version) => ItemValue::located(version, path),
        None => ItemValue::Text(path),
    }
}

fn global_package_version(npm_ls_json: &str, name: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(npm_ls_json).ok()?;
    v.get("dependencies")?
        .get(name)?
        .get("version")?
        .as_str()
        .map(ToOwned::to_owned)
}

/// Pulls the first dotted version number out of `--version` style output.
///
/// `"v20.11.0"` → `20.11.0`, `"Docker version 24.0.5, build ced0996"` →
/// `24.0.5`, `"GNU bash, version 5.2.15(1)-release"` → `5.2.15`.
fn extract_version(output: &str) -> Option<String> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let mut run = String::new();
    for ch in line.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() || (ch == '.' && !run.is_empty()) {
            run.push(ch);
            continue;
        }
        let candidate = run.trim_end_matches('.');
        if candidate.contains('.') {
            return Some(candidate.to_string());
        }
        run.clear();
    }
    None
}
