//! Character sheet and dice pool calculator.
//!
//! A pool is built from one attribute, plus a second attribute or a skill
//! rating, plus a situational modifier. Skills are either custom skills
//! stored on the sheet or a rating typed in for a single roll.

pub mod transfer;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{TableError, TableResult};
use crate::store::{CHARACTER_KEY, KeyValueStore, load_json, save_json};

/// Lowest attribute rating.
pub const MIN_ATTRIBUTE: u8 = 1;
/// Highest attribute rating.
pub const MAX_ATTRIBUTE: u8 = 12;
/// Rating every attribute starts at.
pub const DEFAULT_ATTRIBUTE: u8 = 3;
/// Lowest skill rating.
pub const MIN_SKILL: u8 = 0;
/// Highest skill rating.
pub const MAX_SKILL: u8 = 12;
/// Lowest situational modifier.
pub const MIN_MODIFIER: i32 = -20;
/// Highest situational modifier.
pub const MAX_MODIFIER: i32 = 20;
/// Longest skill name kept, in characters.
pub const MAX_SKILL_NAME: usize = 100;

/// The eight physical and mental attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    /// Physical toughness.
    Body,
    /// Coordination and fine motor control.
    Agility,
    /// Reflexes.
    Reaction,
    /// Raw physical power.
    Strength,
    /// Mental fortitude.
    Willpower,
    /// Reasoning and memory.
    Logic,
    /// Instinct and awareness.
    Intuition,
    /// Presence and force of personality.
    Charisma,
}

impl Attribute {
    /// Every attribute, in sheet order.
    pub const ALL: [Attribute; 8] = [
        Self::Body,
        Self::Agility,
        Self::Reaction,
        Self::Strength,
        Self::Willpower,
        Self::Logic,
        Self::Intuition,
        Self::Charisma,
    ];

    /// Lowercase name, as stored.
    pub fn name(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Agility => "agility",
            Self::Reaction => "reaction",
            Self::Strength => "strength",
            Self::Willpower => "willpower",
            Self::Logic => "logic",
            Self::Intuition => "intuition",
            Self::Charisma => "charisma",
        }
    }

    /// Parse an attribute name, ignoring case.
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|a| a.name() == s)
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which parts of the sheet make up a dice pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolConfig {
    /// First attribute.
    #[serde(with = "optional_attribute")]
    pub attribute1: Option<Attribute>,
    /// Second attribute. Takes precedence over any skill.
    #[serde(with = "optional_attribute")]
    pub attribute2: Option<Attribute>,
    /// Skill to look up among the custom skills.
    pub skill_name: String,
    /// Rating used when `skill_name` is not a custom skill.
    pub skill_value: u8,
    /// Situational modifier.
    pub modifier: i32,
}

impl PoolConfig {
    /// Clamp the skill rating and modifier and cap the skill name length.
    pub fn normalized(mut self) -> Self {
        self.skill_name = self.skill_name.chars().take(MAX_SKILL_NAME).collect();
        self.skill_value = self.skill_value.min(MAX_SKILL);
        self.modifier = self.modifier.clamp(MIN_MODIFIER, MAX_MODIFIER);
        self
    }
}

/// Attributes stored as their name, with an empty string for "none".
mod optional_attribute {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Attribute;

    pub fn serialize<S: Serializer>(attr: &Option<Attribute>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(attr.map_or("", Attribute::name))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Attribute>, D::Error> {
        let name = Option::<String>::deserialize(d)?;
        Ok(name.as_deref().and_then(Attribute::from_name))
    }
}

/// Attribute ratings, custom skills, and the current pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    /// Rating per attribute.
    pub attributes: BTreeMap<Attribute, u8>,
    /// Custom skills by lowercase name.
    pub custom_skills: BTreeMap<String, u8>,
    /// How the calculated pool is assembled.
    pub pool_config: PoolConfig,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            attributes: Attribute::ALL
                .into_iter()
                .map(|a| (a, DEFAULT_ATTRIBUTE))
                .collect(),
            custom_skills: BTreeMap::new(),
            pool_config: PoolConfig::default(),
        }
    }
}

/// Trim, lowercase, and cap a skill name.
pub fn normalize_skill_name(name: &str) -> String {
    name.trim().to_lowercase().chars().take(MAX_SKILL_NAME).collect()
}

impl Character {
    /// Rating of `attr`. Attributes missing from the sheet read as the default.
    pub fn attribute(&self, attr: Attribute) -> u8 {
        self.attributes
            .get(&attr)
            .copied()
            .unwrap_or(DEFAULT_ATTRIBUTE)
    }

    /// Set an attribute rating.
    pub fn set_attribute(&mut self, attr: Attribute, value: u8) -> TableResult<()> {
        if !(MIN_ATTRIBUTE..=MAX_ATTRIBUTE).contains(&value) {
            return Err(TableError::InvalidCharacter(format!(
                "{attr} must be between {MIN_ATTRIBUTE} and {MAX_ATTRIBUTE}, got {value}"
            )));
        }
        self.attributes.insert(attr, value);
        Ok(())
    }

    /// Add or replace a custom skill. Returns the name it was stored under.
    pub fn add_skill(&mut self, name: &str, rating: u8) -> TableResult<String> {
        let key = normalize_skill_name(name);
        if key.is_empty() {
            return Err(TableError::InvalidSkill("skill name is empty".to_string()));
        }
        if rating > MAX_SKILL {
            return Err(TableError::InvalidSkill(format!(
                "{key} must be between {MIN_SKILL} and {MAX_SKILL}, got {rating}"
            )));
        }
        self.custom_skills.insert(key.clone(), rating);
        Ok(key)
    }

    /// Remove a custom skill. Returns false if it did not exist.
    pub fn remove_skill(&mut self, name: &str) -> bool {
        self.custom_skills
            .remove(&normalize_skill_name(name))
            .is_some()
    }

    /// Rating of a custom skill.
    pub fn skill(&self, name: &str) -> Option<u8> {
        self.custom_skills.get(&normalize_skill_name(name)).copied()
    }

    /// Replace the pool configuration, clamping its values.
    pub fn set_pool_config(&mut self, config: PoolConfig) {
        self.pool_config = config.normalized();
    }

    /// Pool size from the current configuration, never below zero.
    ///
    /// The second term is the second attribute if one is set, else the named
    /// custom skill, else the manual skill rating.
    pub fn calculated_pool(&self) -> u32 {
        let cfg = &self.pool_config;
        let mut pool = 0i32;
        if let Some(attr) = cfg.attribute1 {
            pool += i32::from(self.attribute(attr));
        }
        pool += match cfg.attribute2 {
            Some(attr) => i32::from(self.attribute(attr)),
            None => {
                let custom = Some(cfg.skill_name.trim())
                    .filter(|name| !name.is_empty())
                    .and_then(|name| self.skill(name));
                i32::from(custom.unwrap_or(cfg.skill_value))
            }
        };
        pool += cfg.modifier;
        pool.max(0) as u32
    }

    /// Load the stored character, or a fresh sheet if none is stored.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Character>(store, CHARACTER_KEY) {
            Ok(Some(character)) => character,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable character data");
                Self::default()
            }
        }
    }

    /// Persist the character.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> TableResult<()> {
        save_json(store, CHARACTER_KEY, self)
    }
}
