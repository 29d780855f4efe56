//! CLI frontend for the Sixpool dice table.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sixpool",
    about = "Sixpool: d6 dice pools with exploding sixes, glitches, and Edge",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding settings, history, character, and presets
    #[arg(long, global = true, default_value = ".sixpool")]
    data_dir: PathBuf,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a dice pool
    Roll {
        /// Number of dice (1-99)
        pool: u32,

        /// Edge points available for the roll (0-7, default: from settings)
        #[arg(short, long)]
        edge: Option<u32>,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,

        /// Do not explode sixes
        #[arg(long)]
        no_rule_of_six: bool,

        /// Do not check for glitches
        #[arg(long)]
        no_glitch: bool,

        /// Glitch formula: half, hits
        #[arg(long)]
        glitch_rule: Option<String>,

        /// Print the roll as JSON
        #[arg(long)]
        json: bool,
    },

    /// Roll an opposed test and compare hits
    Opposed {
        /// Attacker's dice pool
        attacker: u32,

        /// Defender's dice pool
        defender: u32,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Start an interactive table session
    Play {
        /// Edge ruleset for this session: targeted, pool
        #[arg(long)]
        edge_set: Option<String>,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show recent rolls
    History {
        /// Delete the stored history
        #[arg(long)]
        clear: bool,

        /// Number of rolls to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Manage the character sheet and its calculated pool
    Character {
        #[command(subcommand)]
        action: CharacterAction,
    },

    /// Save, list, delete, and roll presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Show or change rule settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum CharacterAction {
    /// Show attributes, skills, and the calculated pool
    Show,

    /// Set an attribute rating (1-12)
    Set {
        /// Attribute name (body, agility, reaction, strength, willpower, logic, intuition, charisma)
        attribute: String,

        /// New rating
        value: u8,
    },

    /// Add, update, or remove a custom skill
    Skill {
        /// Skill name
        name: String,

        /// Rating (0-12)
        rating: Option<u8>,

        /// Remove the skill instead
        #[arg(long)]
        remove: bool,
    },

    /// Configure and show the calculated pool
    Pool {
        /// First attribute ("none" to clear)
        #[arg(long)]
        attr1: Option<String>,

        /// Second attribute ("none" to clear)
        #[arg(long)]
        attr2: Option<String>,

        /// Skill name
        #[arg(long)]
        skill: Option<String>,

        /// Manual skill rating
        #[arg(long)]
        skill_value: Option<u8>,

        /// Situational modifier (-20 to 20)
        #[arg(long, allow_hyphen_values = true)]
        modifier: Option<i32>,
    },

    /// Export the character as JSON
    Export {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a character from an exported JSON file
    Import {
        /// File to read
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// Save a preset
    Save {
        /// Preset name
        name: String,

        /// Fixed dice pool
        #[arg(short, long, default_value = "1")]
        pool: u32,

        /// Use the character's pool configuration instead of a fixed pool
        #[arg(long)]
        calc: bool,
    },

    /// List saved presets
    List,

    /// Delete a preset by name or id
    Delete {
        /// Preset name or id
        name: String,
    },

    /// Roll a preset
    Roll {
        /// Preset name or id
        name: String,

        /// Edge points available for the roll
        #[arg(short, long)]
        edge: Option<u32>,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the stored settings
    Show,

    /// Change stored settings
    Set {
        /// Explode sixes
        #[arg(long)]
        rule_of_six: Option<bool>,

        /// Check for glitches
        #[arg(long)]
        glitch_detection: Option<bool>,

        /// Default Edge for new rolls (0-7)
        #[arg(long)]
        default_edge: Option<u8>,

        /// Glitch formula: half, hits
        #[arg(long)]
        glitch_rule: Option<String>,

        /// Edge ruleset: targeted, pool
        #[arg(long)]
        edge_set: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let data_dir = cli.data_dir;

    let result = match cli.command {
        Commands::Roll {
            pool,
            edge,
            seed,
            no_rule_of_six,
            no_glitch,
            glitch_rule,
            json,
        } => commands::roll::run(
            &data_dir,
            commands::roll::RollArgs {
                pool,
                edge,
                seed,
                rule_of_six: !no_rule_of_six,
                glitch_detection: !no_glitch,
                glitch_rule,
                json,
            },
        ),
        Commands::Opposed {
            attacker,
            defender,
            seed,
        } => commands::opposed::run(&data_dir, attacker, defender, seed),
        Commands::Play { edge_set, seed } => {
            commands::play::run(&data_dir, edge_set.as_deref(), seed)
        }
        Commands::History { clear, limit } => commands::history::run(&data_dir, clear, limit),
        Commands::Character { action } => match action {
            CharacterAction::Show => commands::character::show(&data_dir),
            CharacterAction::Set { attribute, value } => {
                commands::character::set(&data_dir, &attribute, value)
            }
            CharacterAction::Skill {
                name,
                rating,
                remove,
            } => commands::character::skill(&data_dir, &name, rating, remove),
            CharacterAction::Pool {
                attr1,
                attr2,
                skill,
                skill_value,
                modifier,
            } => commands::character::pool(
                &data_dir,
                commands::character::PoolArgs {
                    attr1,
                    attr2,
                    skill,
                    skill_value,
                    modifier,
                },
            ),
            CharacterAction::Export { output } => {
                commands::character::export(&data_dir, output.as_deref())
            }
            CharacterAction::Import { file } => commands::character::import(&data_dir, &file),
        },
        Commands::Preset { action } => match action {
            PresetAction::Save { name, pool, calc } => {
                commands::preset::save(&data_dir, &name, pool, calc)
            }
            PresetAction::List => commands::preset::list(&data_dir),
            PresetAction::Delete { name } => commands::preset::delete(&data_dir, &name),
            PresetAction::Roll { name, edge, seed } => {
                commands::preset::roll(&data_dir, &name, edge, seed)
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&data_dir),
            SettingsAction::Set {
                rule_of_six,
                glitch_detection,
                default_edge,
                glitch_rule,
                edge_set,
            } => commands::settings::set(
                &data_dir,
                commands::settings::SettingsArgs {
                    rule_of_six,
                    glitch_detection,
                    default_edge,
                    glitch_rule,
                    edge_set,
                },
            ),
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
