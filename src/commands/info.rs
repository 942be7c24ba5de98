use std::io::Write;

use crate::commands::{CommandContext, CommandError};
use crate::core::{DiagnosticReport, OutputMode, PluginDescriptor, PluginSummary};
use crate::probe::{EnvironmentProbe, ProbeOptions, ProbeRequest};

pub const PLUGINS_KEY: &str = "CLI Plugins";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoFlags {
    pub json: bool,
    pub yml: bool,
}

impl InfoFlags {
    pub fn output_mode(self) -> Result<OutputMode, CommandError> {
        OutputMode::from_flags(self.json, self.yml).ok_or(CommandError::ConflictingFormats)
    }
}

pub fn run(
    ctx: &CommandContext<'_, InfoFlags>,
    probe: &dyn EnvironmentProbe,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let mode = ctx.flags.output_mode()?;

    let request = ProbeRequest::standard(&ctx.host.package.name);
    let options = ProbeOptions {
        structured: mode.is_structured(),
        console: false,
        show_not_found: true,
    };
    let output = probe
        .run(&request, &options)
        .map_err(CommandError::Probe)?;
    let plugins = ctx.host.top_level_plugins();

    match mode {
        OutputMode::Text => {
            out.write_all(output.into_text().as_bytes())?;
            writeln!(out, "{}", crate::ui::PLUGINS_HEADER)?;
            for plugin in plugins {
                writeln!(out, "{}", crate::ui::format_plugin_line(plugin, ctx.color))?;
            }
        }
        OutputMode::Json | OutputMode::Yaml => {
            let report = output
                .into_report()
                .ok_or(CommandError::UnstructuredProbeOutput)?;
            let value = with_plugins(&report, &plugins)?;
            if mode == OutputMode::Yaml {
                out.write_all(serde_yaml::to_string(&value)?.as_bytes())?;
            } else {
                serde_json::to_writer_pretty(&mut *out, &value)?;
                out.write_all(b"\n")?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// The report as a JSON object with the plugin list appended under
/// [`PLUGINS_KEY`].
pub fn with_plugins(
    report: &DiagnosticReport,
    plugins: &[&PluginDescriptor],
) -> Result<serde_json::Value, CommandError> {
    let mut value = serde_json::to_value(report)?;
    let summaries: Vec<PluginSummary<'_>> = plugins.iter().map(|p| p.summary()).collect();
    if let Some(obj) = value.as_object_mut() {
        obj.insert(PLUGINS_KEY.to_string(), serde_json::to_value(summaries)?);
    }
    Ok(value)
}
