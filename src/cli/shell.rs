use std::{
    borrow::Cow,
    collections::BTreeMap,
    io::{self, BufRead},
    path::PathBuf,
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::warn;

use crate::cli::commands::config::KEYS as CONFIG_KEYS;
use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;
use crate::listing::schema::{FieldKind, SCHEMA};

pub const SCRIPT_ENV: &str = "LISTING_CORE_CLI_SCRIPT";
const HISTORY_FILE: &str = "history.txt";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history = history_path(context);
    // A missing history file just means a first run.
    let _ = editor.load_history(&history);
    output::info("Type `new` to start a listing or `help` for all commands.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                match context.execute_line(line) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Err(err) = editor.save_history(&history) {
        warn!(path = %history.display(), "could not save shell history: {err}");
    }
    Ok(())
}

/// Runs stdin line by line. Failing commands are reported with their line
/// number and the script carries on.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        if !context.running {
            break;
        }
        let line = line?;
        match context.execute_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => {
                output::warning(format!("Script line {}: `{}`", index + 1, line.trim()));
                context.report_error(err);
            }
        }
    }
    Ok(())
}

fn history_path(context: &ShellContext) -> PathBuf {
    context.config_manager.base_dir().join(HISTORY_FILE)
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}

/// What the word under the cursor should complete to.
enum Slot<'a> {
    Command,
    Field(fn(FieldKind) -> bool),
    Fixed(&'a [&'static str]),
    Nothing,
}

const CONFIG_ACTIONS: &[&str] = &["show", "set"];

fn slot_for<'a>(words: &[&str], commands: &'a [&'static str]) -> Slot<'a> {
    match words {
        [] => Slot::Command,
        [command] => match command.to_ascii_lowercase().as_str() {
            "set" | "get" => Slot::Field(|_| true),
            "toggle" => Slot::Field(|kind| kind == FieldKind::ToggleList),
            "add" | "remove" => Slot::Field(FieldKind::is_list),
            "help" => Slot::Fixed(commands),
            "config" => Slot::Fixed(CONFIG_ACTIONS),
            _ => Slot::Nothing,
        },
        [command, action] if command.eq_ignore_ascii_case("config") && *action == "set" => {
            Slot::Fixed(CONFIG_KEYS)
        }
        _ => Slot::Nothing,
    }
}

struct CommandHelper {
    commands: Vec<&'static str>,
    usages: BTreeMap<&'static str, &'static str>,
}

impl CommandHelper {
    fn new(context: &ShellContext) -> Self {
        let usages = context
            .registry
            .groups()
            .flat_map(|(_, entries)| entries.iter())
            .map(|entry| (entry.name, entry.usage))
            .collect();
        Self {
            commands: context.registry.names(),
            usages,
        }
    }

    fn candidates(&self, slot: Slot<'_>, needle: &str) -> Vec<Pair> {
        let names: Vec<&str> = match slot {
            Slot::Command => self.commands.clone(),
            Slot::Fixed(options) => options.to_vec(),
            Slot::Field(accepts) => SCHEMA
                .iter()
                .filter(|spec| accepts(spec.kind))
                .map(|spec| spec.path)
                .collect(),
            Slot::Nothing => Vec::new(),
        };
        names
            .into_iter()
            .filter(|name| name.starts_with(needle))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let finished: Vec<&str> = before[..start].split_whitespace().collect();
        let slot = slot_for(&finished, &self.commands);
        Ok((start, self.candidates(slot, &before[start..])))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    /// After `<command> ` shows the rest of its usage line.
    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos != line.len() {
            return None;
        }
        let command = line.strip_suffix(' ')?;
        let usage = self.usages.get(command.to_ascii_lowercase().as_str())?;
        usage
            .split_once(' ')
            .map(|(_, arguments)| arguments.to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {}
