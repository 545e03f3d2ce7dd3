//! Shell context behaviour: line execution, dispatch, and error reporting.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::ConfigManager,
    errors::{ListingError, StorageError, ValidationFailure},
    listing::DraftDefaults,
    storage::JsonRecordStore,
    utils::app_data_dir,
    wizard::{Step, WizardSession},
};

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::CommandRegistry;
use super::shell::parse_command_line;
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    /// Builds a context whose config and default record root live under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let store_root = config.resolve_store_root(config_manager.base_dir());
        let store = JsonRecordStore::new(store_root).map_err(ListingError::from)?;
        debug!(records = %store.root().display(), ?mode, "shell context ready");

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            store,
            session: None,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!(
                "listing[{}/{}]> ",
                session.current().number(),
                Step::LAST.number()
            ),
            None => "listing> ".into(),
        }
    }

    pub(crate) fn draft_defaults(&self) -> DraftDefaults {
        self.config.draft_defaults()
    }

    pub(crate) fn session(&self) -> Result<&WizardSession, CommandError> {
        self.session.as_ref().ok_or(CommandError::SessionNotOpen)
    }

    pub(crate) fn session_mut(&mut self) -> Result<&mut WizardSession, CommandError> {
        self.session.as_mut().ok_or(CommandError::SessionNotOpen)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Splits one input line and runs it. Blank lines and `#` comments are
    /// skipped; a line that fails to split is reported and skipped.
    pub(crate) fn execute_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(format!("Could not read the line: {err}"));
                return Ok(LoopControl::Continue);
            }
        };
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        if name.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(name, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    fn dispatch(&mut self, name: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.resolve(name).map(|entry| entry.handler) else {
            self.suggest_command(name);
            return Ok(LoopControl::Continue);
        };
        debug!(command = name, args = args.len(), "dispatching command");
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.closest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    /// Script runs never prompt; an interactive shell asks before dropping a draft.
    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script || self.session.is_none() {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(
            &self.theme,
            "Discard the open draft and exit?",
            false,
        )?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::SessionNotOpen => {
                output::error("No listing draft is open.");
                output::hint("Use `new` to start a listing or `edit <id>` to open one.");
            }
            CommandError::Listing(ListingError::Validation(failure)) => {
                output::error(format!("Cannot submit. {failure}"));
                output::hint(format!(
                    "Use `back` to return to {} and complete it.",
                    failure.step.title()
                ));
            }
            other => output::error(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No listing draft is open.")]
    SessionNotOpen,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Listing(#[from] ListingError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        CommandError::Listing(ListingError::Persistence(err))
    }
}

impl From<ValidationFailure> for CommandError {
    fn from(err: ValidationFailure) -> Self {
        CommandError::Listing(ListingError::Validation(err))
    }
}

/// Errors that stop the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ListingError),
    #[error("Input error: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Listing(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Listing(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        match app.execute_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}
