use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Basic,
    SchoolPro,
    OlPro,
    AlPro,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Basic => "basic",
            PlanType::SchoolPro => "school_pro",
            PlanType::OlPro => "ol_pro",
            PlanType::AlPro => "al_pro",
        }
    }

    /// Human readable name, used as the checkout item description.
    pub fn label(&self) -> &'static str {
        match self {
            PlanType::Basic => "Basic",
            PlanType::SchoolPro => "School Pro",
            PlanType::OlPro => "O/L Pro",
            PlanType::AlPro => "A/L Pro",
        }
    }

    /// Accepts both the storage form and the display label.
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim() {
            "basic" | "Basic" => Some(PlanType::Basic),
            "school_pro" | "School Pro" => Some(PlanType::SchoolPro),
            "ol_pro" | "O/L Pro" => Some(PlanType::OlPro),
            "al_pro" | "A/L Pro" => Some(PlanType::AlPro),
            _ => None,
        }
    }
}

impl Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_and_display_forms() {
        assert_eq!(PlanType::from_str("ol_pro"), Some(PlanType::OlPro));
        assert_eq!(PlanType::from_str("A/L Pro"), Some(PlanType::AlPro));
        assert_eq!(PlanType::from_str("gold"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&PlanType::SchoolPro).unwrap();
        assert_eq!(json, "\"school_pro\"");
        let parsed: PlanType = serde_json::from_str("\"al_pro\"").unwrap();
        assert_eq!(parsed, PlanType::AlPro);
    }
}
