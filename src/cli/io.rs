use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::CommandError;
use crate::cli::output;
use crate::codec::CodecWarning;

/// Ask a yes/no question on the terminal.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Lists what the description decoder noticed while reading a listing back.
pub fn print_codec_warnings(warnings: &[CodecWarning]) {
    if warnings.is_empty() {
        return;
    }
    output::warning(warning_summary(warnings.len()));
    for warning in warnings {
        output::info(format!("  {warning}"));
    }
}

fn warning_summary(count: usize) -> String {
    format!(
        "{count} note(s) while reading the description. Unreadable lines stay in the \
         description text and repeated sections use their last copy."
    )
}
