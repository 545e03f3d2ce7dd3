use std::collections::BTreeMap;

use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Largest edit distance still offered as a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 3;

/// Help sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Listing,
    Draft,
    Wizard,
    Config,
    System,
}

impl CommandGroup {
    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Listing => "Listings",
            CommandGroup::Draft => "Draft fields",
            CommandGroup::Wizard => "Wizard steps",
            CommandGroup::Config => "Configuration",
            CommandGroup::System => "Shell",
        }
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands by group, plus a name index that also resolves aliases.
#[derive(Default)]
pub struct CommandRegistry {
    groups: BTreeMap<CommandGroup, Vec<CommandEntry>>,
    index: BTreeMap<&'static str, (CommandGroup, usize)>,
    aliases: BTreeMap<&'static str, &'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entries` under `group`. A later entry with the same name replaces
    /// the earlier one in the index.
    pub fn register(&mut self, group: CommandGroup, entries: Vec<CommandEntry>) {
        let bucket = self.groups.entry(group).or_default();
        for entry in entries {
            self.index.insert(entry.name, (group, bucket.len()));
            bucket.push(entry);
        }
    }

    pub fn alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    /// Looks up a command by name or alias, ignoring case.
    pub fn resolve(&self, name: &str) -> Option<&CommandEntry> {
        let name = name.to_ascii_lowercase();
        let name = self
            .aliases
            .get(name.as_str())
            .copied()
            .unwrap_or(name.as_str());
        let (group, position) = self.index.get(name)?;
        self.groups.get(group)?.get(*position)
    }

    pub fn groups(&self) -> impl Iterator<Item = (CommandGroup, &[CommandEntry])> + '_ {
        self.groups
            .iter()
            .map(|(group, entries)| (*group, entries.as_slice()))
    }

    /// Every command name and alias, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .index
            .keys()
            .chain(self.aliases.keys())
            .copied()
            .collect();
        names.sort_unstable();
        names
    }

    /// The closest command name to `input`, when one is near enough.
    pub fn closest(&self, input: &str) -> Option<&'static str> {
        let input = input.to_ascii_lowercase();
        self.index
            .keys()
            .map(|name| (levenshtein(name, &input), *name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(
            CommandGroup::System,
            vec![CommandEntry::new("exit", "Exit", "exit", noop)],
        );
        registry.register(
            CommandGroup::Listing,
            vec![
                CommandEntry::new("submit", "Save", "submit", noop),
                CommandEntry::new("new", "Start", "new", noop),
            ],
        );
        registry.alias("quit", "exit");
        registry
    }

    #[test]
    fn aliases_and_case_resolve_to_the_same_entry() {
        let registry = registry();
        assert_eq!(registry.resolve("QUIT").map(|entry| entry.name), Some("exit"));
        assert_eq!(registry.resolve("Submit").map(|entry| entry.name), Some("submit"));
        assert!(registry.resolve("save").is_none());
    }

    #[test]
    fn groups_follow_display_order() {
        let registry = registry();
        let order: Vec<CommandGroup> = registry.groups().map(|(group, _)| group).collect();
        assert_eq!(order, vec![CommandGroup::Listing, CommandGroup::System]);
        assert_eq!(registry.names(), vec!["exit", "new", "quit", "submit"]);
    }

    #[test]
    fn closest_ignores_distant_names() {
        let registry = registry();
        assert_eq!(registry.closest("submitt"), Some("submit"));
        assert_eq!(registry.closest("reconfigure"), None);
    }
}
