use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::wizard::{Step, WizardSession};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "step",
            "Show the current step and whether it is complete",
            "step",
            cmd_step,
        ),
        CommandEntry::new(
            "next",
            "Advance to the next step if the current one is complete",
            "next",
            cmd_next,
        ),
        CommandEntry::new("back", "Return to the previous step", "back", cmd_back),
    ]
}

pub(crate) fn print_step(session: &WizardSession) {
    let step = session.current();
    output::section(format!(
        "Step {} / {} ({}) {:.0}%",
        step.number(),
        Step::LAST.number(),
        step.title(),
        session.progress()
    ));
    output::info(step.description());
}

fn cmd_step(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?;
    print_step(session);
    match session.current().validate(session.draft()) {
        Ok(()) => output::success("This step is complete."),
        Err(failure) => output::warning(format!("Incomplete: {}", failure.reason)),
    }
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session_mut()?;
    match session.next() {
        Ok(_) => print_step(session),
        Err(failure) => output::warning(format!("Cannot continue. {failure}")),
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session_mut()?;
    session.back();
    print_step(session);
    Ok(())
}
