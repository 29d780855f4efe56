pub mod character;
pub mod history;
pub mod opposed;
pub mod play;
pub mod preset;
pub mod roll;
pub mod settings;

use std::path::Path;

use colored::Colorize;

use sixpool_engine::{Die, EdgeActionSet, GlitchRule, GlitchType, RollResult, Settings};
use sixpool_table::{FileStore, TableConfig, TableSession};

/// Open a session over the data directory.
fn open_session(dir: &Path, seed: Option<u64>) -> TableSession {
    let mut config = TableConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    TableSession::new(config, Box::new(FileStore::new(dir)))
}

fn parse_glitch_rule(tag: &str) -> Result<GlitchRule, String> {
    GlitchRule::from_str_tag(tag).ok_or_else(|| format!("unknown glitch rule '{tag}', use: half, hits"))
}

fn parse_edge_set(tag: &str) -> Result<EdgeActionSet, String> {
    EdgeActionSet::from_str_tag(tag)
        .ok_or_else(|| format!("unknown Edge ruleset '{tag}', use: targeted, pool"))
}

/// Color a die by outcome: hits green, ones red.
fn paint_die(die: &Die) -> String {
    let text = die.to_string();
    if die.is_hit() {
        text.green().bold().to_string()
    } else if die.is_one() {
        text.red().to_string()
    } else {
        text
    }
}

fn paint_dice(roll: &RollResult) -> String {
    let dice: Vec<String> = roll.dice.iter().map(paint_die).collect();
    format!("[{}]", dice.join(", "))
}

fn paint_glitch(glitch: GlitchType) -> String {
    match glitch {
        GlitchType::None => String::new(),
        GlitchType::Glitch => format!("{}!", glitch).yellow().bold().to_string(),
        GlitchType::CriticalGlitch => format!("{}!", glitch).red().bold().to_string(),
    }
}

/// Print a roll the way every command shows it.
fn print_roll(roll: &RollResult, settings: &Settings) {
    println!(
        "  {} = {}",
        paint_dice(roll),
        sixpool_engine::dice::hits_label(roll.hits).bold()
    );
    println!("  {}", roll.summary());
    if roll.glitch.is_glitch() {
        println!("  {}", paint_glitch(roll.glitch));
    }
    if roll.edge_points > 0 {
        let actions: Vec<String> = settings
            .edge_actions
            .actions()
            .iter()
            .filter(|a| a.cost() <= roll.edge_points)
            .map(|a| format!("{a} ({})", a.cost()))
            .collect();
        println!("  Edge: {} | {}", roll.edge_points, actions.join(", "));
    }
}
