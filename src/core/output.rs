#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputMode {
    /// Returns `None` when both structured formats are requested.
    pub const fn from_flags(json: bool, yml: bool) -> Option<Self> {
        match (json, yml) {
            (true, true) => None,
            (true, false) => Some(OutputMode::Json),
            (false, true) => Some(OutputMode::Yaml),
            (false, false) => Some(OutputMode::Text),
        }
    }

    pub const fn is_structured(self) -> bool {
        !matches!(self, OutputMode::Text)
    }
}
