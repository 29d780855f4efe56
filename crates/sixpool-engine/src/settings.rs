//! Rule toggles read by the resolver and the Edge actions.

use serde::{Deserialize, Deserializer, Serialize};

use crate::dice::MAX_EDGE;
use crate::edge::EdgeActionSet;
use crate::glitch::GlitchRule;

/// Caller-owned rule configuration. The engine only reads it.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// stored settings blob from an older version still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Every six rolled draws another die.
    pub rule_of_six: bool,
    /// Classify glitches after the pool draw.
    pub glitch_detection: bool,
    /// Edge balance a new roll starts with when none is given (0-7).
    ///
    /// Stored values outside `0..=7`, negative ones included, are clamped
    /// on load.
    #[serde(deserialize_with = "clamped_edge")]
    pub default_edge: u8,
    /// Formula used for regular glitches.
    pub glitch_rule: GlitchRule,
    /// Which Edge ruleset is active.
    pub edge_actions: EdgeActionSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rule_of_six: true,
            glitch_detection: true,
            default_edge: 0,
            glitch_rule: GlitchRule::default(),
            edge_actions: EdgeActionSet::default(),
        }
    }
}

impl Settings {
    /// Enable or disable the Rule of Six.
    pub fn with_rule_of_six(mut self, enabled: bool) -> Self {
        self.rule_of_six = enabled;
        self
    }

    /// Enable or disable glitch detection.
    pub fn with_glitch_detection(mut self, enabled: bool) -> Self {
        self.glitch_detection = enabled;
        self
    }

    /// Set the default Edge balance (clamped to 0-7).
    pub fn with_default_edge(mut self, edge: u8) -> Self {
        self.default_edge = edge.min(MAX_EDGE);
        self
    }

    /// Select the glitch formula.
    pub fn with_glitch_rule(mut self, rule: GlitchRule) -> Self {
        self.glitch_rule = rule;
        self
    }

    /// Select the active Edge ruleset.
    pub fn with_edge_actions(mut self, set: EdgeActionSet) -> Self {
        self.edge_actions = set;
        self
    }

    /// Clamp out-of-range values, e.g. after loading from storage.
    pub fn normalized(self) -> Self {
        let edge = self.default_edge;
        self.with_default_edge(edge)
    }
}

fn clamped_edge<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    let clamped = raw.clamp(0, i64::from(MAX_EDGE));
    Ok(u8::try_from(clamped).unwrap_or(MAX_EDGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert!(s.rule_of_six);
        assert!(s.glitch_detection);
        assert_eq!(s.default_edge, 0);
        assert_eq!(s.glitch_rule, GlitchRule::HalfDice);
        assert_eq!(s.edge_actions, EdgeActionSet::DieTargeted);
    }

    #[test]
    fn builder_methods() {
        let s = Settings::default()
            .with_rule_of_six(false)
            .with_glitch_detection(false)
            .with_default_edge(4)
            .with_glitch_rule(GlitchRule::OnesExceedHits)
            .with_edge_actions(EdgeActionSet::PoolWide);
        assert!(!s.rule_of_six);
        assert!(!s.glitch_detection);
        assert_eq!(s.default_edge, 4);
        assert_eq!(s.glitch_rule, GlitchRule::OnesExceedHits);
        assert_eq!(s.edge_actions, EdgeActionSet::PoolWide);
    }

    #[test]
    fn default_edge_clamped() {
        assert_eq!(Settings::default().with_default_edge(12).default_edge, 7);
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let s: Settings = serde_json::from_str(r#"{"rule_of_six": false, "default_edge": 9}"#)
            .unwrap();
        let s = s.normalized();
        assert!(!s.rule_of_six);
        assert!(s.glitch_detection);
        assert_eq!(s.default_edge, 7);
    }

    #[test]
    fn out_of_range_edge_is_clamped_on_load() {
        let s: Settings =
            serde_json::from_str(r#"{"rule_of_six": false, "default_edge": 300}"#).unwrap();
        assert_eq!(s.default_edge, 7);
        assert!(!s.rule_of_six);

        let s: Settings = serde_json::from_str(r#"{"default_edge": -1}"#).unwrap();
        assert_eq!(s.default_edge, 0);
    }
}
