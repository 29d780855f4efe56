//! Interactive table session.
//!
//! `TableSession` holds everything a roller touches between commands: the
//! rule settings, the current roll and its Edge selection state, the roll
//! history, and an opposed roll in progress. Text commands go through
//! [`TableSession::process`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use sixpool_engine::{
    EdgeAction, EdgeState, EngineError, OpposedResult, PendingSelection, RollResult, Settings,
    compare_opposed, edge, roll_checked,
};

use crate::character::Character;
use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::history::RollHistory;
use crate::preset::PresetBook;
use crate::settings::{load_settings, save_settings};
use crate::store::KeyValueStore;

/// Number of history entries shown by the `history` command.
const HISTORY_SHOWN: usize = 10;

/// An interactive dice table.
pub struct TableSession {
    settings: Settings,
    rng: StdRng,
    current: Option<RollResult>,
    edge: EdgeState,
    history: RollHistory,
    attacker: Option<RollResult>,
    defender: Option<RollResult>,
    character: Character,
    presets: PresetBook,
    store: Box<dyn KeyValueStore>,
}

impl TableSession {
    /// Open a session over `store`, loading settings, history, the character,
    /// and presets from it.
    pub fn new(config: TableConfig, store: Box<dyn KeyValueStore>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let settings = load_settings(store.as_ref());
        let history = RollHistory::load(
            store.as_ref(),
            config.history_limit,
            config.fallback_history,
        );
        let character = Character::load(store.as_ref());
        let presets = PresetBook::load(store.as_ref());

        Self {
            settings,
            rng,
            current: None,
            edge: EdgeState::Idle,
            history,
            attacker: None,
            defender: None,
            character,
            presets,
            store,
        }
    }

    /// Override the loaded settings for this session without saving them.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings.normalized();
        self
    }

    /// Get the active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings and persist them.
    pub fn set_settings(&mut self, settings: Settings) -> TableResult<()> {
        self.settings = settings.normalized();
        save_settings(self.store.as_mut(), &self.settings)
    }

    /// Get the current roll.
    pub fn current(&self) -> Option<&RollResult> {
        self.current.as_ref()
    }

    /// Get the Edge selection state.
    pub fn edge_state(&self) -> &EdgeState {
        &self.edge
    }

    /// Get the roll history.
    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    /// Get the character sheet.
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Get the saved presets.
    pub fn presets(&self) -> &PresetBook {
        &self.presets
    }

    /// Get the attacker's opposed roll.
    pub fn attacker(&self) -> Option<&RollResult> {
        self.attacker.as_ref()
    }

    /// Get the defender's opposed roll.
    pub fn defender(&self) -> Option<&RollResult> {
        self.defender.as_ref()
    }

    /// Compare the opposed rolls once both sides have rolled.
    pub fn opposed_result(&self) -> Option<OpposedResult> {
        match (&self.attacker, &self.defender) {
            (Some(a), Some(d)) => Some(compare_opposed(a, d)),
            _ => None,
        }
    }

    /// Roll a pool and make it the current roll.
    ///
    /// `edge` defaults to the settings' default Edge. Any pending die
    /// selection is abandoned. The roll is recorded in history; a failed
    /// history save does not fail the roll.
    pub fn roll(&mut self, pool: u32, edge: Option<u32>) -> TableResult<&RollResult> {
        let edge = edge.unwrap_or(u32::from(self.settings.default_edge));
        let roll = roll_checked(pool, edge, &self.settings, &mut self.rng)?;
        self.edge.cancel();
        self.history.record(roll.clone(), self.store.as_mut());
        Ok(&*self.current.insert(roll))
    }

    /// Spend Edge on an action that does not target a die.
    ///
    /// `amount` is the number of dice for Add Dice (`None` buys the most
    /// allowed) and is ignored by the other actions.
    pub fn spend_edge(
        &mut self,
        action: EdgeAction,
        amount: Option<usize>,
    ) -> TableResult<&RollResult> {
        if !self.edge.is_idle() {
            return Err(EngineError::SelectionPending.into());
        }
        let current = self.current.as_ref().ok_or(TableError::NoCurrentRoll)?;
        let updated = edge::apply(action, amount, current, &self.settings, &mut self.rng)?;
        Ok(self.replace_current(updated))
    }

    /// Start a die-targeted action on the current roll.
    pub fn begin_edge(&mut self, action: EdgeAction) -> TableResult<PendingSelection> {
        let current = self.current.as_ref().ok_or(TableError::NoCurrentRoll)?;
        Ok(self.edge.begin(action, current, &self.settings)?)
    }

    /// Finish the pending action on the die at `index` (zero-based).
    pub fn pick(&mut self, index: usize) -> TableResult<&RollResult> {
        let current = self.current.as_ref().ok_or(TableError::NoCurrentRoll)?;
        let updated = self
            .edge
            .select(index, current, &self.settings, &mut self.rng)?;
        Ok(self.replace_current(updated))
    }

    /// Abandon a pending die selection.
    pub fn cancel(&mut self) -> Option<EdgeAction> {
        self.edge.cancel()
    }

    /// Roll the attacker's side of an opposed test (no Edge).
    pub fn roll_attacker(&mut self, pool: u32) -> TableResult<&RollResult> {
        let roll = roll_checked(pool, 0, &self.settings, &mut self.rng)?;
        Ok(&*self.attacker.insert(roll))
    }

    /// Roll the defender's side of an opposed test (no Edge).
    pub fn roll_defender(&mut self, pool: u32) -> TableResult<&RollResult> {
        let roll = roll_checked(pool, 0, &self.settings, &mut self.rng)?;
        Ok(&*self.defender.insert(roll))
    }

    /// Clear both sides of the opposed test.
    pub fn reset_opposed(&mut self) {
        self.attacker = None;
        self.defender = None;
    }

    fn replace_current(&mut self, updated: RollResult) -> &RollResult {
        self.history
            .amend_latest(updated.clone(), self.store.as_mut());
        self.current.insert(updated)
    }

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> TableResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");
        debug!(%cmd, "table command");

        match cmd.as_str() {
            "roll" | "r" => self.do_roll(rest),
            "preset" => self.do_preset(rest),
            "reroll" => self.do_begin(EdgeAction::RerollOneDie),
            "boost" => self.do_begin(EdgeAction::AddOneToDie),
            "buy" => self.do_spend(EdgeAction::BuySuccess, None),
            "failures" => self.do_spend(EdgeAction::RerollFailures, None),
            "add" => {
                let amount = if rest.is_empty() {
                    None
                } else {
                    Some(parse_number(rest, "usage: add [dice]")? as usize)
                };
                self.do_spend(EdgeAction::AddDice, amount)
            }
            "push" => self.do_spend(EdgeAction::PushTheLimit, None),
            "pick" => self.do_pick(rest),
            "cancel" => Ok(match self.cancel() {
                Some(action) => format!("{action} cancelled."),
                None => "Nothing to cancel.".to_string(),
            }),
            "attacker" => self.do_opposed(rest, true),
            "defender" => self.do_opposed(rest, false),
            "reset" => {
                self.reset_opposed();
                Ok("Opposed roll reset.".to_string())
            }
            "history" => self.do_history(),
            "status" => self.do_status(),
            "help" => Ok(HELP.to_string()),
            "quit" | "q" => Ok("Goodbye!".to_string()),
            other => Err(TableError::UnknownCommand(other.to_string())),
        }
    }

    fn do_roll(&mut self, rest: &str) -> TableResult<String> {
        let mut args = rest.split_whitespace();
        let usage = "usage: roll <pool|calc> [edge]";
        let pool = match args.next() {
            Some("calc") => self.character.calculated_pool(),
            Some(n) => parse_number(n, usage)?,
            None => return Err(TableError::InvalidCommand(usage.to_string())),
        };
        let edge = args.next().map(|e| parse_number(e, usage)).transpose()?;
        self.roll(pool, edge)?;
        Ok(self.describe_current())
    }

    fn do_preset(&mut self, name: &str) -> TableResult<String> {
        if name.is_empty() {
            return Err(TableError::InvalidCommand(
                "usage: preset <name>".to_string(),
            ));
        }
        let (_, preset) = self.presets.find(name)?;
        let label = preset.name.clone();
        let pool = preset.pool_for(&self.character);
        self.roll(pool, None)?;
        Ok(format!("{label}\n{}", self.describe_current()))
    }

    fn do_begin(&mut self, action: EdgeAction) -> TableResult<String> {
        let pending = self.begin_edge(action)?;
        let mut out = format!(
            "{} (cost {}): pick a die with 'pick <n>' or 'cancel'\n",
            pending.action,
            pending.action.cost()
        );
        for (i, die) in pending.candidates.iter().enumerate() {
            out.push_str(&format!("  {}. {die}\n", i + 1));
        }
        Ok(out.trim_end().to_string())
    }

    fn do_pick(&mut self, rest: &str) -> TableResult<String> {
        let usage = "usage: pick <die number>";
        let n = parse_number(rest, usage)?;
        if n == 0 {
            return Err(TableError::InvalidCommand(usage.to_string()));
        }
        self.pick(n as usize - 1)?;
        Ok(self.describe_current())
    }

    fn do_spend(&mut self, action: EdgeAction, amount: Option<usize>) -> TableResult<String> {
        self.spend_edge(action, amount)?;
        Ok(format!("{action}\n{}", self.describe_current()))
    }

    fn do_opposed(&mut self, rest: &str, attacker: bool) -> TableResult<String> {
        let side = if attacker { "attacker" } else { "defender" };
        let pool = parse_number(rest, &format!("usage: {side} <pool>"))?;
        let roll = if attacker {
            self.roll_attacker(pool)?
        } else {
            self.roll_defender(pool)?
        };
        let mut out = format!(
            "{}: {roll}",
            if attacker { "Attacker" } else { "Defender" }
        );
        if let Some(result) = self.opposed_result() {
            out.push_str(&format!("\n{result}"));
        }
        Ok(out)
    }

    fn describe_current(&self) -> String {
        self.current
            .as_ref()
            .map(|roll| describe_roll(roll, &self.settings))
            .unwrap_or_default()
    }

    fn do_history(&self) -> TableResult<String> {
        if self.history.is_empty() {
            return Ok("No rolls yet.".to_string());
        }
        let shown = self.history.len().min(HISTORY_SHOWN);
        let mut out = format!(
            "History ({} rolls, showing last {shown}):\n",
            self.history.len()
        );
        for roll in &self.history.rolls()[..shown] {
            out.push_str(&format!(
                "  {} {} dice: {}",
                roll.timestamp.format("%H:%M:%S"),
                roll.dice_pool,
                sixpool_engine::dice::hits_label(roll.hits)
            ));
            if roll.glitch.is_glitch() {
                out.push_str(&format!(" ({})", roll.glitch));
            }
            out.push('\n');
        }
        Ok(out.trim_end().to_string())
    }

    fn do_status(&self) -> TableResult<String> {
        let s = &self.settings;
        let mut out = format!(
            "Rule of Six: {}\nGlitch detection: {} ({})\nEdge actions: {}\nDefault Edge: {}\n",
            on_off(s.rule_of_six),
            on_off(s.glitch_detection),
            s.glitch_rule,
            s.edge_actions,
            s.default_edge
        );
        match &self.current {
            Some(roll) => out.push_str(&format!(
                "Current roll: {roll} (Edge {})\n",
                roll.edge_points
            )),
            None => out.push_str("No current roll.\n"),
        }
        if let Some(pending) = self.edge.pending() {
            out.push_str(&format!("Waiting for a die: {}\n", pending.action));
        }
        out.push_str(&format!("History: {} rolls", self.history.len()));
        Ok(out)
    }
}

/// Multi-line description of a roll and the Edge actions it can still pay for.
pub fn describe_roll(roll: &RollResult, settings: &Settings) -> String {
    let mut out = format!("{roll}\n{}", roll.summary());
    if roll.glitch.is_glitch() {
        out.push_str(&format!("\n{}!", roll.glitch));
    }
    out.push_str(&format!("\nEdge: {}", roll.edge_points));
    let affordable: Vec<String> = settings
        .edge_actions
        .actions()
        .iter()
        .filter(|a| a.cost() <= roll.edge_points)
        .map(|a| format!("{} ({})", command_for(*a), a.cost()))
        .collect();
    if !affordable.is_empty() {
        out.push_str(&format!(" | {}", affordable.join(", ")));
    }
    out
}

fn command_for(action: EdgeAction) -> &'static str {
    match action {
        EdgeAction::RerollOneDie => "reroll",
        EdgeAction::AddOneToDie => "boost",
        EdgeAction::BuySuccess => "buy",
        EdgeAction::RerollFailures => "failures",
        EdgeAction::AddDice => "add",
        EdgeAction::PushTheLimit => "push",
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn parse_number(s: &str, usage: &str) -> TableResult<u32> {
    s.trim()
        .parse()
        .map_err(|_| TableError::InvalidCommand(usage.to_string()))
}

const HELP: &str = "\
Table Commands:
  roll <pool> [edge]            Roll a pool (1-99) with optional Edge (0-7)
  roll calc [edge]              Roll the character's calculated pool
  preset <name>                 Roll a saved preset

Edge (die-targeted):
  reroll                        Reroll one die (1 Edge)
  boost                         Add +1 to one die (2 Edge)
  buy                           Buy one success (3 Edge)
  pick <n>                      Choose the die for reroll/boost
  cancel                        Cancel a pending reroll/boost

Edge (pool-wide):
  failures                      Reroll every failed die (1 Edge)
  add [n]                       Add n dice, up to 5 (1 Edge each)
  push                          Push the Limit: reroll failures, sixes explode (2 Edge)

Opposed:
  attacker <pool>               Roll the attacker
  defender <pool>               Roll the defender
  reset                         Clear the opposed roll

  history                       Show recent rolls
  status                        Show settings and the current roll
  help                          Show this help
  quit                          Exit";
