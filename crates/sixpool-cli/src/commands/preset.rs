use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use sixpool_table::{Character, FileStore, PresetBook};

pub fn save(dir: &Path, name: &str, pool: u32, calc: bool) -> Result<(), String> {
    let mut store = FileStore::new(dir);
    let character = Character::load(&store);
    let mut book = PresetBook::load(&store);

    let id = book
        .add(name, pool, calc, character.pool_config.clone())
        .map_err(|e| e.to_string())?;
    book.save(&mut store).map_err(|e| e.to_string())?;

    let preset = book.get(&id).ok_or("preset vanished after saving")?;
    let pool = preset.pool_for(&character);
    println!("  {} preset '{}' ({pool} dice)", "Saved".bold(), preset.name);
    Ok(())
}

pub fn list(dir: &Path) -> Result<(), String> {
    let store = FileStore::new(dir);
    let character = Character::load(&store);
    let book = PresetBook::load(&store);

    if book.is_empty() {
        println!("  No presets saved.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Pool", "Source", "Id"]);
    for (id, preset) in book.list() {
        let source = if preset.use_calculated_pool {
            "calculated"
        } else {
            "fixed"
        };
        table.add_row(vec![
            preset.name.clone(),
            preset.pool_for(&character).to_string(),
            source.to_string(),
            id.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} presets", book.len());
    Ok(())
}

pub fn delete(dir: &Path, name: &str) -> Result<(), String> {
    let mut store = FileStore::new(dir);
    let mut book = PresetBook::load(&store);
    let removed = book.remove(name).map_err(|e| e.to_string())?;
    book.save(&mut store).map_err(|e| e.to_string())?;
    println!("  Deleted preset '{}'", removed.name);
    Ok(())
}

pub fn roll(dir: &Path, name: &str, edge: Option<u32>, seed: Option<u64>) -> Result<(), String> {
    let mut session = super::open_session(dir, seed);
    let settings = session.settings().clone();
    let (label, pool) = {
        let (_, preset) = session.presets().find(name).map_err(|e| e.to_string())?;
        (preset.name.clone(), preset.pool_for(session.character()))
    };

    let roll = session.roll(pool, edge).map_err(|e| e.to_string())?;
    println!("  {} {label} ({pool} dice)", "Rolling".bold());
    super::print_roll(roll, &settings);
    Ok(())
}
