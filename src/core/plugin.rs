use serde::{Deserialize, Serialize};

/// An installed extension of the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub plugin_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl PluginDescriptor {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        plugin_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            plugin_type: plugin_type.into(),
            parent: None,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    pub fn summary(&self) -> PluginSummary<'_> {
        PluginSummary {
            name: &self.name,
            version: &self.version,
            plugin_type: &self.plugin_type,
        }
    }
}

/// The `{name, version, type}` view written into info output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginSummary<'a> {
    pub name: &'a str,
    pub version: &'a str,
    #[serde(rename = "type")]
    pub plugin_type: &'a str,
}

pub fn top_level_plugins(plugins: &[PluginDescriptor]) -> Vec<&PluginDescriptor> {
    plugins.iter().filter(|p| p.is_top_level()).collect()
}
