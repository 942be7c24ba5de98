//! Command handlers.
//!
//! Each handler receives everything it needs through a [`CommandContext`] plus
//! its collaborators, and reports failure as a [`CommandError`].

use thiserror::Error;

use crate::config::HostConfig;
use crate::exit::ExitCode;

pub mod info;
pub mod report;

pub use info::InfoFlags;
pub use report::ReportFlags;

#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a, F> {
    pub flags: F,
    pub host: &'a HostConfig,
    pub color: bool,
}

impl<'a, F> CommandContext<'a, F> {
    pub fn new(flags: F, host: &'a HostConfig) -> Self {
        Self {
            flags,
            host,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("--json and --yml cannot be used together")]
    ConflictingFormats,
    #[error("cannot build report URL: bug tracker URL not configured")]
    BugsUrlMissing,
    #[error("failed to collect environment info")]
    Probe(#[source] anyhow::Error),
    #[error("environment probe returned text where structured output was requested")]
    UnstructuredProbeOutput,
    #[error("failed to format output as JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to format output as YAML")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to write output")]
    Io(#[from] std::io::Error),
    #[error("failed to open browser")]
    Browser(#[source] anyhow::Error),
}

impl CommandError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CommandError::ConflictingFormats => ExitCode::InvalidArgs,
            CommandError::BugsUrlMissing => ExitCode::ConfigInvalid,
            CommandError::Probe(_)
            | CommandError::UnstructuredProbeOutput
            | CommandError::Json(_)
            | CommandError::Yaml(_)
            | CommandError::Io(_) => ExitCode::CommandFailed,
            CommandError::Browser(_) => ExitCode::ExternalCommandFailed,
        }
    }

    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, CommandError::Io(err) if err.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};

    use anyhow::Result;

    use crate::browser::Browser;
    use crate::core::{Category, DiagnosticReport, Item, ItemValue};
    use crate::probe::{EnvironmentProbe, ProbeOptions, ProbeOutput, ProbeRequest};

    pub fn canned_report() -> DiagnosticReport {
        DiagnosticReport {
            categories: vec![
                Category {
                    name: "System".to_string(),
                    items: vec![Item {
                        name: "OS".to_string(),
                        value: ItemValue::text("Linux 6.1"),
                    }],
                },
                Category {
                    name: "Binaries".to_string(),
                    items: vec![Item {
                        name: "Node".to_string(),
                        value: ItemValue::located("20.11.0", "/usr/bin/node"),
                    }],
                },
            ],
        }
    }

    /// Returns [`canned_report`] in whatever form was asked for.
    #[derive(Default)]
    pub struct FakeProbe {
        pub calls: RefCell<Vec<(ProbeRequest, ProbeOptions)>>,
        pub fail: bool,
    }

    impl FakeProbe {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl EnvironmentProbe for FakeProbe {
        fn run(&self, request: &ProbeRequest, options: &ProbeOptions) -> Result<ProbeOutput> {
            self.calls.borrow_mut().push((request.clone(), *options));
            if self.fail {
                anyhow::bail!("probe exploded");
            }
            Ok(ProbeOutput::from_report(canned_report(), options))
        }
    }

    #[derive(Default)]
    pub struct RecordingBrowser {
        pub opened: RefCell<Vec<String>>,
        pub fail: Cell<bool>,
    }

    impl Browser for RecordingBrowser {
        fn open(&self, url: &str) -> Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            if self.fail.get() {
                anyhow::bail!("no display");
            }
            Ok(())
        }
    }
}
