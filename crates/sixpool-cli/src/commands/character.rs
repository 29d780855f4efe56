use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use sixpool_table::character::transfer::{export_file_name, export_json, import_json};
use sixpool_table::{Attribute, Character, FileStore, KeyValueStore};

pub struct PoolArgs {
    pub attr1: Option<String>,
    pub attr2: Option<String>,
    pub skill: Option<String>,
    pub skill_value: Option<u8>,
    pub modifier: Option<i32>,
}

fn save(character: &Character, store: &mut dyn KeyValueStore) -> Result<(), String> {
    character.save(store).map_err(|e| e.to_string())
}

fn parse_attribute(name: &str) -> Result<Attribute, String> {
    Attribute::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = Attribute::ALL.iter().map(|a| a.name()).collect();
        format!("unknown attribute '{name}', use: {}", names.join(", "))
    })
}

/// `none` or an empty string clears the slot.
fn parse_optional_attribute(name: &str) -> Result<Option<Attribute>, String> {
    match name.trim().to_lowercase().as_str() {
        "" | "none" => Ok(None),
        _ => parse_attribute(name).map(Some),
    }
}

fn describe_pool(character: &Character) -> String {
    let cfg = &character.pool_config;
    let mut parts = Vec::new();
    if let Some(attr) = cfg.attribute1 {
        parts.push(format!("{attr} {}", character.attribute(attr)));
    }
    match cfg.attribute2 {
        Some(attr) => parts.push(format!("{attr} {}", character.attribute(attr))),
        None => {
            let name = cfg.skill_name.trim();
            match character.skill(name).filter(|_| !name.is_empty()) {
                Some(rating) => parts.push(format!("{name} {rating}")),
                None if cfg.skill_value > 0 => parts.push(format!("skill {}", cfg.skill_value)),
                None => {}
            }
        }
    }
    if cfg.modifier != 0 {
        parts.push(format!("modifier {:+}", cfg.modifier));
    }
    if parts.is_empty() {
        "nothing configured".to_string()
    } else {
        parts.join(" + ")
    }
}

pub fn show(dir: &Path) -> Result<(), String> {
    let store = FileStore::new(dir);
    let character = Character::load(&store);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Attribute", "Rating"]);
    for attr in Attribute::ALL {
        table.add_row(vec![attr.name().to_string(), character.attribute(attr).to_string()]);
    }
    println!("{table}");

    if character.custom_skills.is_empty() {
        println!("  No custom skills.");
    } else {
        println!("  {}", "Skills".bold());
        for (name, rating) in &character.custom_skills {
            println!("    {name}: {rating}");
        }
    }

    println!(
        "  Pool: {} ({})",
        character.calculated_pool().to_string().bold(),
        describe_pool(&character)
    );
    Ok(())
}

pub fn set(dir: &Path, attribute: &str, value: u8) -> Result<(), String> {
    let mut store = FileStore::new(dir);
    let mut character = Character::load(&store);
    let attr = parse_attribute(attribute)?;
    character
        .set_attribute(attr, value)
        .map_err(|e| e.to_string())?;
    save(&character, &mut store)?;
    println!("  {attr} = {value}");
    Ok(())
}

pub fn skill(dir: &Path, name: &str, rating: Option<u8>, remove: bool) -> Result<(), String> {
    let mut store = FileStore::new(dir);
    let mut character = Character::load(&store);

    if remove {
        if !character.remove_skill(name) {
            return Err(format!("no custom skill named '{}'", name.trim()));
        }
        save(&character, &mut store)?;
        println!("  Removed skill {}", name.trim().to_lowercase());
        return Ok(());
    }

    let Some(rating) = rating else {
        return Err("a rating is required unless --remove is given".to_string());
    };
    let key = character
        .add_skill(name, rating)
        .map_err(|e| e.to_string())?;
    save(&character, &mut store)?;
    println!("  {key} = {rating}");
    Ok(())
}

pub fn pool(dir: &Path, args: PoolArgs) -> Result<(), String> {
    let mut store = FileStore::new(dir);
    let mut character = Character::load(&store);
    let mut config = character.pool_config.clone();
    let mut changed = false;

    if let Some(name) = &args.attr1 {
        config.attribute1 = parse_optional_attribute(name)?;
        changed = true;
    }
    if let Some(name) = &args.attr2 {
        config.attribute2 = parse_optional_attribute(name)?;
        changed = true;
    }
    if let Some(skill) = args.skill {
        config.skill_name = skill;
        changed = true;
    }
    if let Some(value) = args.skill_value {
        config.skill_value = value;
        changed = true;
    }
    if let Some(modifier) = args.modifier {
        config.modifier = modifier;
        changed = true;
    }

    if changed {
        character.set_pool_config(config);
        save(&character, &mut store)?;
    }

    println!(
        "  Pool: {} ({})",
        character.calculated_pool().to_string().bold(),
        describe_pool(&character)
    );
    Ok(())
}

pub fn export(dir: &Path, output: Option<&Path>) -> Result<(), String> {
    let store = FileStore::new(dir);
    let character = Character::load(&store);
    let now = Utc::now();
    let json = export_json(&character, now).map_err(|e| e.to_string())?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            println!("  Exported character to {}", path.display());
        }
        None => {
            println!("{json}");
            tracing::debug!(suggested = %export_file_name(now), "exported character to stdout");
        }
    }
    Ok(())
}

pub fn import(dir: &Path, file: &Path) -> Result<(), String> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    let mut store = FileStore::new(dir);
    let current = Character::load(&store);
    let character = import_json(&current, &text).map_err(|e| e.to_string())?;
    save(&character, &mut store)?;
    println!(
        "  {} character: {} custom skills, pool {}",
        "Imported".bold(),
        character.custom_skills.len(),
        character.calculated_pool()
    );
    Ok(())
}
