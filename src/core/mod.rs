mod output;
mod plugin;
mod report;

pub use output::OutputMode;
pub use plugin::{PluginDescriptor, PluginSummary, top_level_plugins};
pub use report::{Category, DiagnosticReport, Item, ItemValue};
