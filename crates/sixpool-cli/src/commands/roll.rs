use std::path::Path;

use colored::Colorize;

pub struct RollArgs {
    pub pool: u32,
    pub edge: Option<u32>,
    pub seed: Option<u64>,
    pub rule_of_six: bool,
    pub glitch_detection: bool,
    pub glitch_rule: Option<String>,
    pub json: bool,
}

pub fn run(dir: &Path, args: RollArgs) -> Result<(), String> {
    let session = super::open_session(dir, args.seed);
    let mut settings = session.settings().clone();
    if !args.rule_of_six {
        settings = settings.with_rule_of_six(false);
    }
    if !args.glitch_detection {
        settings = settings.with_glitch_detection(false);
    }
    if let Some(tag) = &args.glitch_rule {
        settings = settings.with_glitch_rule(super::parse_glitch_rule(tag)?);
    }

    let mut session = session.with_settings(settings.clone());
    let roll = session
        .roll(args.pool, args.edge)
        .map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(roll).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    println!("  {} {} dice", "Rolling".bold(), args.pool);
    super::print_roll(roll, &settings);
    Ok(())
}
