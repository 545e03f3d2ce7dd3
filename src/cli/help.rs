use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    for (group, entries) in registry.groups() {
        output::section(group.title());
        for entry in entries {
            output::info(format!("  {:<8} {}", entry.name, entry.description));
        }
    }
    output::hint("Use `help <command>` for usage. Field names complete with Tab.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
}
