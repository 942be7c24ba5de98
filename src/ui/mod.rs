use anyhow::Error;
use std::io::{self, Write};

use crate::core::PluginDescriptor;

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub stderr_is_tty: bool,
    pub quiet: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "Error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "Caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "Next:");
    let _ = writeln!(stderr, "  - re-run with `--verbose` for more detail");
    let _ = writeln!(
        stderr,
        "  - see `devdiag --help` for available commands and options"
    );
}

pub const PLUGINS_HEADER: &str = "  CLI plugins:";

/// `    <name> <version> (<type>)`, with the version part de-emphasized.
pub fn format_plugin_line(plugin: &PluginDescriptor, color: bool) -> String {
    let detail = format!("{} ({})", plugin.version, plugin.plugin_type);
    format!("    {} {}", plugin.name, dim(&detail, color))
}

pub fn dim(s: &str, color: bool) -> String {
    if !color {
        return s.to_string();
    }
    format!("\x1b[90m{s}\x1b[0m")
}
