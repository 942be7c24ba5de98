//! Environment inspection.
//!
//! Commands describe *what* to inspect with a [`ProbeRequest`] and receive a
//! [`ProbeOutput`]; the [`EnvironmentProbe`] trait is the seam that lets tests
//! substitute a canned probe for [`SystemProbe`].

use anyhow::Result;

use crate::core::DiagnosticReport;

mod system;

pub use system::SystemProbe;

pub trait EnvironmentProbe {
    fn run(&self, request: &ProbeRequest, options: &ProbeOptions) -> Result<ProbeOutput>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeItem {
    Os,
    Cpu,
    Memory,
    Shell,
    Binary { label: String, program: String },
    GlobalPackage(String),
}

impl ProbeItem {
    pub fn binary(label: impl Into<String>, program: impl Into<String>) -> Self {
        ProbeItem::Binary {
            label: label.into(),
            program: program.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProbeItem::Os => "OS",
            ProbeItem::Cpu => "CPU",
            ProbeItem::Memory => "Memory",
            ProbeItem::Shell => "Shell",
            ProbeItem::Binary { label, .. } => label,
            ProbeItem::GlobalPackage(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRequest {
    pub name: String,
    pub items: Vec<ProbeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub categories: Vec<CategoryRequest>,
}

impl ProbeRequest {
    /// The category list shared by `info` and `report`.
    pub fn standard(package_name: &str) -> Self {
        Self {
            categories: vec![
                CategoryRequest {
                    name: "System".to_string(),
                    items: vec![
                        ProbeItem::Os,
                        ProbeItem::Cpu,
                        ProbeItem::Memory,
                        ProbeItem::Shell,
                    ],
                },
                CategoryRequest {
                    name: "Binaries".to_string(),
                    items: vec![
                        ProbeItem::binary("Node", "node"),
                        ProbeItem::binary("Yarn", "yarn"),
                        ProbeItem::binary("npm", "npm"),
                    ],
                },
                CategoryRequest {
                    name: "Virtualization".to_string(),
                    items: vec![ProbeItem::binary("Docker", "docker")],
                },
                CategoryRequest {
                    name: "npmGlobalPackages".to_string(),
                    items: vec![ProbeItem::GlobalPackage(package_name.to_string())],
                },
            ],
        }
    }

    pub fn any_item(&self, f: impl Fn(&ProbeItem) -> bool) -> bool {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter())
            .any(f)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Return a [`DiagnosticReport`] instead of rendered text.
    pub structured: bool,
    /// Also echo the rendered text to stdout.
    pub console: bool,
    /// Keep items that could not be found, marked as "Not Found".
    pub show_not_found: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutput {
    Text(String),
    Structured(DiagnosticReport),
}

impl ProbeOutput {
    pub fn from_report(mut report: DiagnosticReport, options: &ProbeOptions) -> Self {
        if !options.show_not_found {
            for category in &mut report.categories {
                category.items.retain(|item| !item.value.is_not_found());
            }
        }
        if options.structured {
            ProbeOutput::Structured(report)
        } else {
            ProbeOutput::Text(report.to_text())
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ProbeOutput::Text(text) => text,
            ProbeOutput::Structured(report) => report.to_text(),
        }
    }

    pub fn into_report(self) -> Option<DiagnosticReport> {
        match self {
            ProbeOutput::Text(_) => None,
            ProbeOutput::Structured(report) => Some(report),
        }
    }
}
