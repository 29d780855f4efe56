use std::path::Path;

use colored::Colorize;

use sixpool_engine::Settings;
use sixpool_table::{FileStore, load_settings, save_settings};

pub struct SettingsArgs {
    pub rule_of_six: Option<bool>,
    pub glitch_detection: Option<bool>,
    pub default_edge: Option<u8>,
    pub glitch_rule: Option<String>,
    pub edge_set: Option<String>,
}

fn print_settings(settings: &Settings) {
    println!("  Rule of Six:      {}", settings.rule_of_six);
    println!("  Glitch detection: {}", settings.glitch_detection);
    println!("  Glitch rule:      {}", settings.glitch_rule);
    println!("  Default Edge:     {}", settings.default_edge);
    println!("  Edge actions:     {}", settings.edge_actions);
}

pub fn show(dir: &Path) -> Result<(), String> {
    let store = FileStore::new(dir);
    print_settings(&load_settings(&store));
    Ok(())
}

pub fn set(dir: &Path, args: SettingsArgs) -> Result<(), String> {
    let mut store = FileStore::new(dir);
    let mut settings = load_settings(&store);

    if let Some(on) = args.rule_of_six {
        settings = settings.with_rule_of_six(on);
    }
    if let Some(on) = args.glitch_detection {
        settings = settings.with_glitch_detection(on);
    }
    if let Some(edge) = args.default_edge {
        settings = settings.with_default_edge(edge);
    }
    if let Some(tag) = &args.glitch_rule {
        settings = settings.with_glitch_rule(super::parse_glitch_rule(tag)?);
    }
    if let Some(tag) = &args.edge_set {
        settings = settings.with_edge_actions(super::parse_edge_set(tag)?);
    }

    save_settings(&mut store, &settings).map_err(|e| e.to_string())?;
    println!("  {} settings", "Saved".bold());
    print_settings(&settings);
    Ok(())
}
