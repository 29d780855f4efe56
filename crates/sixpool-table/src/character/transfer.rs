//! Character export to and import from JSON files.
//!
//! Import is lenient: the three sections must be present, but entries that
//! are unknown or out of range are skipped and numbers are clamped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    Attribute, Character, MAX_ATTRIBUTE, MAX_MODIFIER, MAX_SKILL, MAX_SKILL_NAME, MIN_ATTRIBUTE,
    MIN_MODIFIER, MIN_SKILL, PoolConfig, normalize_skill_name,
};
use crate::error::{TableError, TableResult};

/// Format version written into every export.
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export<'a> {
    attributes: &'a std::collections::BTreeMap<Attribute, u8>,
    custom_skills: &'a std::collections::BTreeMap<String, u8>,
    pool_config: &'a PoolConfig,
    export_date: DateTime<Utc>,
    version: &'static str,
}

/// Serialize `character` as a pretty-printed export document.
pub fn export_json(character: &Character, now: DateTime<Utc>) -> TableResult<String> {
    let doc = Export {
        attributes: &character.attributes,
        custom_skills: &character.custom_skills,
        pool_config: &character.pool_config,
        export_date: now,
        version: EXPORT_VERSION,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Suggested file name for an export made at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("sixpool-character-{}.json", now.format("%Y-%m-%d"))
}

/// Build a character from an export document.
///
/// Valid attributes are merged over `current`; custom skills and the pool
/// configuration are replaced.
pub fn import_json(current: &Character, text: &str) -> TableResult<Character> {
    let value: Value = serde_json::from_str(text)?;
    let root = value
        .as_object()
        .ok_or_else(|| invalid("not a JSON object"))?;
    let attributes = section(root, "attributes")?;
    let skills = section(root, "customSkills")?;
    let pool = section(root, "poolConfig")?;

    let mut character = current.clone();

    for (name, rating) in attributes {
        let Some(attr) = Attribute::from_name(name) else {
            continue;
        };
        if let Some(rating) = rating.as_f64().filter(|r| {
            (f64::from(MIN_ATTRIBUTE)..=f64::from(MAX_ATTRIBUTE)).contains(r)
        }) {
            character.attributes.insert(attr, rating.floor() as u8);
        }
    }

    character.custom_skills.clear();
    for (name, rating) in skills {
        let key = normalize_skill_name(name);
        if key.is_empty() {
            continue;
        }
        if let Some(rating) = rating
            .as_f64()
            .filter(|r| (f64::from(MIN_SKILL)..=f64::from(MAX_SKILL)).contains(r))
        {
            character.custom_skills.insert(key, rating.floor() as u8);
        }
    }

    character.pool_config = PoolConfig {
        attribute1: pool_attribute(pool, "attribute1"),
        attribute2: pool_attribute(pool, "attribute2"),
        skill_name: pool
            .get("skillName")
            .and_then(Value::as_str)
            .map(|s| s.chars().take(MAX_SKILL_NAME).collect())
            .unwrap_or_default(),
        skill_value: clamped_number(pool, "skillValue", MIN_SKILL.into(), MAX_SKILL.into()) as u8,
        modifier: clamped_number(pool, "modifier", MIN_MODIFIER.into(), MAX_MODIFIER.into())
            as i32,
    };

    Ok(character)
}

fn invalid(msg: &str) -> TableError {
    TableError::InvalidCharacter(msg.to_string())
}

fn section<'a>(root: &'a Map<String, Value>, key: &str) -> TableResult<&'a Map<String, Value>> {
    root.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| invalid(&format!("missing or invalid {key}")))
}

fn pool_attribute(pool: &Map<String, Value>, key: &str) -> Option<Attribute> {
    pool.get(key)
        .and_then(Value::as_str)
        .and_then(Attribute::from_name)
}

/// Floor and clamp a numeric field; non-numbers read as zero.
fn clamped_number(pool: &Map<String, Value>, key: &str, min: f64, max: f64) -> f64 {
    pool.get(key)
        .and_then(Value::as_f64)
        .map_or(0.0, |n| n.floor().clamp(min, max))
}
