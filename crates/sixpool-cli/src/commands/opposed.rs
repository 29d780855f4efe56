use std::path::Path;

use colored::Colorize;

use sixpool_engine::OpposedOutcome;

pub fn run(dir: &Path, attacker: u32, defender: u32, seed: Option<u64>) -> Result<(), String> {
    let mut session = super::open_session(dir, seed);
    let settings = session.settings().clone();

    let roll = session.roll_attacker(attacker).map_err(|e| e.to_string())?;
    println!("  {} ({attacker} dice)", "Attacker".bold());
    super::print_roll(roll, &settings);

    let roll = session.roll_defender(defender).map_err(|e| e.to_string())?;
    println!("  {} ({defender} dice)", "Defender".bold());
    super::print_roll(roll, &settings);

    let Some(result) = session.opposed_result() else {
        return Err("opposed roll incomplete".to_string());
    };
    let text = result.to_string();
    let text = match result.outcome {
        OpposedOutcome::Attacker => text.green().bold(),
        OpposedOutcome::Defender => text.red().bold(),
        OpposedOutcome::Tie => text.normal(),
    };
    println!();
    println!("  {text}");
    Ok(())
}
