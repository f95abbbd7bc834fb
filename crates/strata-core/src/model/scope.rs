use serde::{Deserialize, Serialize};

/// Visibility scope of a data node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Scenario,
    Cycle,
    Global,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Scenario => "scenario",
            Scope::Cycle => "cycle",
            Scope::Global => "global",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        [Scope::Scenario, Scope::Cycle, Scope::Global]
            .into_iter()
            .find(|s| s.as_str() == raw)
    }
}
