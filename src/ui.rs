// UI layer: the interactive main menu and the dialoguer-backed operator.
// The menu loop dispatches to one flow at a time and only returns when the
// operator exits or an error is fatal.

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::inspect::inspect;
use crate::navigate::Navigator;
use crate::progress::TerminalWidth;
use crate::prompt::{ask_cid, ask_existing_path, Operator};
use crate::store::{ContentStore, EntryType, ListEntry};
use crate::upload::upload;
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

/// Top-level commands, in menu order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Save,
    Get,
    List,
    Exit,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Save, Command::Get, Command::List, Command::Exit];

    pub fn label(self) -> &'static str {
        match self {
            Command::Save => "Save file/dir to IPFS",
            Command::Get => "Get file/dir from IPFS",
            Command::List => "List in IPFS",
            Command::Exit => "Exit",
        }
    }
}

/// Operator talking to the real terminal. Keyboard-driven: arrow keys and
/// Enter pick from lists.
#[derive(Default)]
pub struct TerminalOperator {
    live: Option<ProgressBar>,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print above the live progress line when one is showing.
    fn emit(&self, line: String) {
        match &self.live {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }
}

fn live_line() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar
}

impl Operator for TerminalOperator {
    fn select(&mut self, prompt: &str, items: &[String]) -> CliResult<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(CliError::from_prompt)
    }

    fn input(&mut self, prompt: &str) -> CliResult<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(CliError::from_prompt)
    }

    fn info(&mut self, message: &str) {
        self.emit(format!("{}  {}", "ℹ".cyan(), message.cyan()));
    }

    fn warn(&mut self, message: &str) {
        self.emit(format!("{}  {}", "⚠".yellow(), message.yellow()));
    }

    fn error(&mut self, message: &str) {
        self.emit(format!("{}  {}", "✖".red().bold(), message.red().bold()));
    }

    fn success(&mut self, message: &str) {
        self.emit(format!("{}  {}", "✔".green().bold(), message));
    }

    fn log(&mut self, message: &str) {
        self.emit(message.to_string());
    }

    fn list_entry(&mut self, entry: &ListEntry) {
        let name = match entry.entry_type {
            EntryType::Directory => entry.name.as_str().green(),
            _ => entry.name.as_str().magenta(),
        };
        self.emit(format!("{} ({}) — {}", name, entry.entry_type, entry.cid));
    }

    fn progress(&mut self, line: &str) {
        let bar = self.live.get_or_insert_with(live_line);
        bar.set_message(format!("{}  {}", "ℹ".cyan(), line.cyan()));
    }

    fn finish_progress(&mut self) {
        if let Some(bar) = self.live.take() {
            bar.finish_and_clear();
        }
    }
}

/// Main interactive menu over the given store. Blocks until "Exit".
pub fn main_menu(store: &dyn ContentStore, config: &Config) -> anyhow::Result<()> {
    let mut operator = TerminalOperator::new();
    for warning in &config.warnings {
        operator.warn(warning);
    }
    menu_loop(store, &mut operator, config)?;
    Ok(())
}

/// The menu loop proper. Non-fatal errors are printed and the menu comes
/// back; fatal ones end the loop.
pub fn menu_loop(
    store: &dyn ContentStore,
    operator: &mut dyn Operator,
    config: &Config,
) -> CliResult<()> {
    let width = TerminalWidth::detect();
    let labels: Vec<String> = Command::ALL.iter().map(|c| c.label().to_string()).collect();
    loop {
        let picked = operator.select("What do you want to do?", &labels)?;
        let command = Command::ALL.get(picked).copied().unwrap_or(Command::Exit);
        if command == Command::Exit {
            operator.info("Exiting program...");
            log::info!("operator exit");
            return Ok(());
        }
        log::debug!("command {:?}", command);
        match run_command(command, store, operator, config, &width) {
            Ok(()) => {}
            Err(err) if err.is_fatal() => {
                operator.finish_progress();
                operator.error(&err.to_string());
                log::error!("{:?} ended the session: {}", command, err);
                return Err(err);
            }
            Err(err) => {
                log::warn!("{:?} failed: {}", command, err);
                operator.error(&err.to_string());
            }
        }
    }
}

fn run_command(
    command: Command,
    store: &dyn ContentStore,
    operator: &mut dyn Operator,
    config: &Config,
    width: &TerminalWidth,
) -> CliResult<()> {
    match command {
        Command::Save => {
            let path = ask_existing_path(operator, "Enter the path of the file to save: ")?;
            upload(store, operator, &path, &config.add_options(), width)?;
        }
        Command::Get => {
            let cid = ask_cid(operator, "Enter the CID of file/directory: ")?;
            inspect(store, operator, &cid)?;
        }
        Command::List => {
            let cid = ask_cid(operator, "Enter the CID to list: ")?;
            Navigator::new(store, cid).run(operator)?;
        }
        Command::Exit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, ScriptedOperator};

    fn config() -> Config {
        Config::from_lookup(|_| None)
    }

    #[test]
    fn exit_says_goodbye() {
        let store = MemoryStore::new();
        let mut op = ScriptedOperator::default().selecting(&[3]);
        menu_loop(&store, &mut op, &config()).unwrap();
        assert_eq!(op.lines, vec!["info: Exiting program..."]);
        assert_eq!(
            op.offered[0],
            vec!["Save file/dir to IPFS", "Get file/dir from IPFS", "List in IPFS", "Exit"]
        );
    }

    #[test]
    fn store_failure_returns_to_menu() {
        let store = MemoryStore::new();
        // List, unknown CID fails, then Exit.
        let mut op = ScriptedOperator::with_answers(&["QmMissing"]).selecting(&[2, 3]);
        menu_loop(&store, &mut op, &config()).unwrap();
        assert!(op
            .lines
            .iter()
            .any(|l| l.starts_with("error: store lookup failed") && l.contains("QmMissing")));
        assert_eq!(op.lines.last().unwrap(), "info: Exiting program...");
    }

    #[test]
    fn interrupt_is_fatal() {
        let store = MemoryStore::new().with_dir("D", &[("a", "QmA"), ("b", "QmB")]);
        // Get D, then the action prompt gets no answer.
        let mut op = ScriptedOperator::with_answers(&["D"]).selecting(&[1]);
        let err = menu_loop(&store, &mut op, &config()).unwrap_err();
        assert!(matches!(err, CliError::Interrupted));
        assert_eq!(op.lines.last().unwrap(), "error: interrupted by operator");
    }

    #[test]
    fn list_then_back_returns_to_menu() {
        let store = MemoryStore::new().with_dir("A", &[("b", "B")]).with_dir("B", &[]);
        // List A: Back (index 2) terminates; then Exit.
        let mut op = ScriptedOperator::with_answers(&["", "A"]).selecting(&[2, 2, 3]);
        menu_loop(&store, &mut op, &config()).unwrap();
        assert!(op.lines.iter().any(|l| l.starts_with("warn: Please enter a valid CID")));
        assert_eq!(store.ls_calls(), 1);
    }
}
