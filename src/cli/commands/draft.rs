use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::listing::{schema::SCHEMA, store::describe};

use super::required;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "set",
            "Set a field from text (empty clears it; lists take commas)",
            "set <field> <value>",
            cmd_set,
        ),
        CommandEntry::new(
            "toggle",
            "Select or deselect an option in a multi-select field",
            "toggle <field> <option>",
            cmd_toggle,
        ),
        CommandEntry::new(
            "add",
            "Append an item to a list field",
            "add <field> <item>",
            cmd_add,
        ),
        CommandEntry::new(
            "remove",
            "Remove an item from a list field",
            "remove <field> <item>",
            cmd_remove,
        ),
        CommandEntry::new("get", "Show one field or field group", "get <field>", cmd_get),
        CommandEntry::new("show", "Show every field of the draft", "show", cmd_show),
    ]
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = required(args, 0, "set <field> <value>")?;
    let value = args.get(1..).unwrap_or_default().join(" ");
    let draft = context.session_mut()?.draft_mut();
    draft.set_input(path, &value)?;
    output::success(format!("{path} = {}", describe(&draft.get(path)?)));
    Ok(())
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "toggle <field> <option>";
    let path = required(args, 0, usage)?;
    let option = required(args, 1, usage)?;
    if context.session_mut()?.draft_mut().toggle(path, option)? {
        output::success(format!("{option} selected in {path}."));
    } else {
        output::success(format!("{option} deselected in {path}."));
    }
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add <field> <item>";
    let path = required(args, 0, usage)?;
    let item = required(args, 1, usage)?;
    if context.session_mut()?.draft_mut().push(path, item)? {
        output::success(format!("Added {item} to {path}."));
    } else {
        output::info(format!("{item} is already in {path}."));
    }
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "remove <field> <item>";
    let path = required(args, 0, usage)?;
    let item = required(args, 1, usage)?;
    if context.session_mut()?.draft_mut().remove(path, item)? {
        output::success(format!("Removed {item} from {path}."));
    } else {
        output::info(format!("{item} was not in {path}."));
    }
    Ok(())
}

fn cmd_get(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = required(args, 0, "get <field>")?;
    let value = context.session()?.draft().get(path)?;
    output::info(format!("{path} = {}", describe(&value)));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let draft = context.session()?.draft();
    let mut section = None;
    for spec in SCHEMA {
        if section != Some(spec.section) {
            section = Some(spec.section);
            output::section(spec.section.title());
        }
        let value = draft.values().get(spec.path).map(describe).unwrap_or_default();
        output::info(format!("  {:<24} {}", spec.label, value));
    }
    Ok(())
}
