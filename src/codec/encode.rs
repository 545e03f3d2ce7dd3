use super::token::{escape_text, Marker};
use super::{DescriptionParts, EmbeddedMetadata, StayPolicies};

/// Renders prose followed by every non-empty section, separated by blank lines.
pub fn encode(parts: &DescriptionParts) -> String {
    let mut blocks = Vec::new();

    let prose = parts.prose.trim();
    if !prose.is_empty() {
        blocks.push(escape_text(prose));
    }

    let details = detail_lines(&parts.policies, &parts.metadata);
    if !details.is_empty() {
        blocks.push(format!(
            "{}\n{}",
            Marker::PropertyDetails.label(),
            details.join("\n")
        ));
    }

    let arrival = parts.metadata.arrival_instructions.trim();
    if !arrival.is_empty() {
        blocks.push(format!(
            "{}\n{}",
            Marker::ArrivalInstructions.label(),
            escape_text(arrival)
        ));
    }

    let meal_plans = csv(&parts.metadata.meal_plans);
    if !meal_plans.is_empty() {
        blocks.push(format!("{} {}", Marker::MealPlans.label(), meal_plans));
    }

    let license = one_line(&parts.metadata.license_number);
    if !license.is_empty() {
        blocks.push(format!("{} {}", Marker::License.label(), license));
    }

    blocks.join("\n\n")
}

fn detail_lines(policies: &StayPolicies, metadata: &EmbeddedMetadata) -> Vec<String> {
    let mut lines = Vec::new();

    let check_in = one_line(&policies.check_in);
    let check_out = one_line(&policies.check_out);
    if !check_in.is_empty() || !check_out.is_empty() {
        lines.push(format!("Check-in: {check_in} | Check-out: {check_out}"));
    }
    if let Some(nights) = policies.minimum_stay {
        lines.push(format!("Minimum Stay: {nights} night(s)"));
    }
    let cancellation = one_line(&policies.cancellation_policy);
    if !cancellation.is_empty() {
        lines.push(format!("Cancellation Policy: {cancellation}"));
    }
    let payment = csv(&policies.payment_methods);
    if !payment.is_empty() {
        lines.push(format!("Payment Methods: {payment}"));
    }
    let contact = one_line(&metadata.contact_phone);
    if !contact.is_empty() {
        lines.push(format!("Contact: {contact}"));
    }

    lines
}

/// Collapses a value onto a single line.
fn one_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn csv(items: &[String]) -> String {
    items
        .iter()
        .map(|item| one_line(item))
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
