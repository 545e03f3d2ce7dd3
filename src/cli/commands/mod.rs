pub mod config;
pub mod draft;
pub mod listing;
pub mod system;
pub mod wizard;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandGroup, CommandRegistry};

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandGroup::Listing, listing::definitions());
    registry.register(CommandGroup::Draft, draft::definitions());
    registry.register(CommandGroup::Wizard, wizard::definitions());
    registry.register(CommandGroup::Config, config::definitions());
    registry.register(CommandGroup::System, system::definitions());

    registry.alias("quit", "exit");
    registry.alias("save", "submit");
}

/// Returns `args[index]` or a usage error.
pub(crate) fn required<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}
