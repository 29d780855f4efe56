use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use sixpool_table::config::{DEFAULT_FALLBACK_HISTORY, DEFAULT_HISTORY_LIMIT};
use sixpool_table::{FileStore, RollHistory};

pub fn run(dir: &Path, clear: bool, limit: usize) -> Result<(), String> {
    let mut store = FileStore::new(dir);
    let mut history = RollHistory::load(&store, DEFAULT_HISTORY_LIMIT, DEFAULT_FALLBACK_HISTORY);

    if clear {
        history.clear(&mut store).map_err(|e| e.to_string())?;
        println!("  Roll history cleared.");
        return Ok(());
    }

    if history.is_empty() {
        println!("  No rolls yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Time", "Pool", "Dice", "Hits", "Glitch", "Edge"]);

    for (i, roll) in history.rolls().iter().take(limit).enumerate() {
        let dice: Vec<String> = roll.dice.iter().map(|d| d.to_string()).collect();
        let glitch = if roll.glitch.is_glitch() {
            roll.glitch.to_string()
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            (i + 1).to_string(),
            roll.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            roll.dice_pool.to_string(),
            dice.join(" "),
            roll.hits.to_string(),
            glitch,
            roll.edge_points.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} of {} rolls",
        history.len().min(limit),
        history.len()
    );

    Ok(())
}
