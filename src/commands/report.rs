use url::form_urlencoded;

use crate::browser::Browser;
use crate::commands::{CommandContext, CommandError};
use crate::probe::{EnvironmentProbe, ProbeOptions, ProbeRequest};

/// Issue tracker used for feature requests when the host configures none.
pub const DEFAULT_ISSUES_URL: &str = "https://github.com/devdiag/devdiag/issues";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFlags {
    pub feature: bool,
}

/// Builds the issue URL and opens it, returning what was opened.
///
/// The tracker URL is used as configured; only a missing or blank value
/// stops a bug report.
pub fn run(
    ctx: &CommandContext<'_, ReportFlags>,
    probe: &dyn EnvironmentProbe,
    browser: &dyn Browser,
) -> Result<String, CommandError> {
    let url = if ctx.flags.feature {
        feature_request_url(ctx.host.bugs_url().unwrap_or(DEFAULT_ISSUES_URL))
    } else {
        let tracker = ctx.host.bugs_url().ok_or(CommandError::BugsUrlMissing)?;
        let request = ProbeRequest::standard(&ctx.host.package.name);
        let options = ProbeOptions {
            structured: false,
            console: false,
            show_not_found: true,
        };
        let diagnostics = probe
            .run(&request, &options)
            .map_err(CommandError::Probe)?
            .into_text();
        bug_report_url(tracker, &diagnostics)
    };

    browser.open(&url).map_err(CommandError::Browser)?;
    Ok(url)
}

pub fn bug_report_url(tracker: &str, diagnostics: &str) -> String {
    let body = format!("```\n{}\n```", diagnostics.trim_matches('\n'));
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("labels", "bug")
        .append_pair("template", "bug_report.md")
        .append_pair("body", &body)
        .finish();
    new_issue_url(tracker, &query)
}

pub fn feature_request_url(tracker: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("labels", "enhancement")
        .append_pair("template", "feature_request.md")
        .finish();
    new_issue_url(tracker, &query)
}

fn new_issue_url(tracker: &str, query: &str) -> String {
    format!("{}/new?{query}", tracker.trim_end_matches('/'))
}
