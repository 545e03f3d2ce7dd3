use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    storage::JsonRecordStore,
    wizard::WizardSession,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: JsonRecordStore,
    pub session: Option<WizardSession>,
    pub running: bool,
}
