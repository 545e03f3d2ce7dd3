use uuid::Uuid;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{io, output};
use crate::cli::registry::CommandEntry;
use crate::storage::RecordStore;
use crate::wizard::{SessionMode, WizardSession};

use super::required;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("new", "Start a new listing draft", "new", cmd_new),
        CommandEntry::new(
            "edit",
            "Open a stored listing for editing",
            "edit <id>",
            cmd_edit,
        ),
        CommandEntry::new(
            "reload",
            "Discard local changes and reload the listing being edited",
            "reload",
            cmd_reload,
        ),
        CommandEntry::new("list", "List stored listings", "list", cmd_list),
        CommandEntry::new(
            "preview",
            "Show the description text a submit would store",
            "preview",
            cmd_preview,
        ),
        CommandEntry::new(
            "submit",
            "Validate every step and save the listing",
            "submit",
            cmd_submit,
        ),
    ]
}

fn cmd_new(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.is_some() {
        output::warning("Discarding the previous draft.");
    }
    context.session = Some(WizardSession::new(&context.draft_defaults()));
    output::success("New listing draft started.");
    super::wizard::print_step(context.session()?);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = required(args, 0, "edit <id>")?;
    let id = parse_id(raw)?;
    open(context, id)
}

fn cmd_reload(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session()?.mode() {
        SessionMode::Edit { id } => open(context, id),
        SessionMode::Create => Err(CommandError::InvalidArguments(
            "the draft has not been submitted yet; nothing to reload".into(),
        )),
    }
}

fn open(context: &mut ShellContext, id: Uuid) -> CommandResult {
    let session = WizardSession::open(&context.store, id, &context.draft_defaults())?;
    io::print_codec_warnings(session.warnings());
    output::success(format!("Loaded listing {id}."));
    context.session = Some(session);
    super::wizard::print_step(context.session()?);
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ids = context.store.list_ids()?;
    if ids.is_empty() {
        output::info("No listings stored yet.");
        return Ok(());
    }
    output::section("Listings");
    for id in ids {
        let Some(record) = context.store.fetch_by_id(id)? else {
            continue;
        };
        let title = if record.title.trim().is_empty() {
            "(untitled)"
        } else {
            record.title.as_str()
        };
        output::info(format!("  {id}  {title}  {}", record.city));
    }
    Ok(())
}

fn cmd_preview(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let preview = context.session()?.preview_description();
    output::section("Description preview");
    if preview.is_empty() {
        output::info("(empty)");
    } else {
        println!("{preview}");
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ShellContext { session, store, .. } = context;
    let session = session.as_mut().ok_or(CommandError::SessionNotOpen)?;
    let created = session.mode() == SessionMode::Create;
    let record = session.submit(&*store)?;
    if created {
        output::success(format!("Listing {} created.", record.id));
    } else {
        output::success(format!("Listing {} updated.", record.id));
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<Uuid, CommandError> {
    Uuid::parse_str(raw)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid listing id `{raw}`")))
}
