use std::collections::BTreeMap;

use chrono::NaiveTime;
use tracing::warn;

use super::reader::{read_blocks, Block, SectionBlock};
use super::token::{tokenize, unescape_line, Marker};
use super::{CodecWarning, DecodedDescription, DescriptionParts, StayPolicies};

/// Splits a stored description into prose, policies, and embedded metadata.
///
/// Each section is parsed on its own; a malformed one falls back to defaults
/// and its text is kept in the prose rather than dropped.
pub fn decode(text: &str) -> DecodedDescription {
    let tokens = tokenize(text);
    let mut decoder = Decoder::default();
    for block in read_blocks(&tokens) {
        match block {
            Block::Prose(lines) => decoder.keep(lines.into_iter().map(unescaped)),
            Block::Section(section) => match section.marker {
                Marker::PropertyDetails => decoder.details(&section),
                Marker::ArrivalInstructions => decoder.arrival(&section),
                Marker::MealPlans | Marker::License => decoder.single_line(&section),
            },
        }
    }
    decoder.finish()
}

#[derive(Default)]
struct Decoder {
    parts: DescriptionParts,
    chunks: Vec<Vec<String>>,
    seen: BTreeMap<Marker, usize>,
    warnings: Vec<CodecWarning>,
}

#[derive(Debug, PartialEq, Eq)]
enum DetailLine {
    Times { check_in: String, check_out: String },
    MinimumStay(u32),
    Cancellation(String),
    Payment(Vec<String>),
    Contact(String),
}

impl Decoder {
    fn keep(&mut self, lines: impl IntoIterator<Item = String>) {
        self.chunks.push(lines.into_iter().collect());
    }

    fn warn(&mut self, marker: Marker, line: usize, message: impl Into<String>) {
        self.warnings.push(CodecWarning::new(marker, line, message));
    }

    /// Records a well-formed section. A repeat means an older save left a copy
    /// behind; the later one wins.
    fn accept(&mut self, section: &SectionBlock<'_>) {
        if let Some(previous) = self.seen.insert(section.marker, section.line) {
            self.warn(
                section.marker,
                section.line,
                format!("section repeated (previous on line {previous}); using the later one"),
            );
        }
    }

    fn details(&mut self, section: &SectionBlock<'_>) {
        let mut candidates: Vec<(usize, &str)> = Vec::new();
        if !section.inline.is_empty() {
            candidates.push((section.line, section.inline));
        }
        candidates.extend(
            section
                .body
                .iter()
                .enumerate()
                .map(|(offset, text)| (section.line + 1 + offset, *text)),
        );

        let mut parsed = Vec::new();
        let mut leftovers = Vec::new();
        for (line, text) in candidates {
            if text.trim().is_empty() {
                leftovers.push(text.to_string());
                continue;
            }
            match parse_detail(text.trim()) {
                Ok(detail) => parsed.push(detail),
                Err(reason) => {
                    self.warn(section.marker, line, reason);
                    leftovers.push(text.to_string());
                }
            }
        }

        if parsed.is_empty() {
            self.warn(section.marker, section.line, "no recognizable detail lines");
            self.keep(section.raw_lines().into_iter().map(str::to_string));
            return;
        }

        // A repeat replaces the earlier copy whole, including keys it omits.
        let mut policies = StayPolicies::default();
        let mut contact = String::new();
        for detail in parsed {
            match detail {
                DetailLine::Times {
                    check_in,
                    check_out,
                } => {
                    policies.check_in = check_in;
                    policies.check_out = check_out;
                }
                DetailLine::MinimumStay(nights) => policies.minimum_stay = Some(nights),
                DetailLine::Cancellation(policy) => policies.cancellation_policy = policy,
                DetailLine::Payment(methods) => policies.payment_methods = methods,
                DetailLine::Contact(phone) => contact = phone,
            }
        }
        self.parts.policies = policies;
        self.parts.metadata.contact_phone = contact;
        self.accept(section);
        self.keep(leftovers);
    }

    fn arrival(&mut self, section: &SectionBlock<'_>) {
        let mut lines = Vec::new();
        if !section.inline.is_empty() {
            lines.push(unescaped(section.inline));
        }
        lines.extend(section.body.iter().map(|text| unescaped(text)));
        let instructions = lines.join("\n").trim().to_string();

        if instructions.is_empty() {
            self.warn(section.marker, section.line, "section has no instructions");
            self.keep([section.raw.to_string()]);
            return;
        }
        self.parts.metadata.arrival_instructions = instructions;
        self.accept(section);
    }

    fn single_line(&mut self, section: &SectionBlock<'_>) {
        let trailing = section.body.iter().map(|text| unescaped(text));
        let value = section.inline.trim();
        let parsed = match section.marker {
            Marker::MealPlans => {
                let plans = split_csv(value);
                (!plans.is_empty()).then(|| {
                    self.parts.metadata.meal_plans = plans;
                })
            }
            _ => (!value.is_empty()).then(|| {
                self.parts.metadata.license_number = value.to_string();
            }),
        };

        match parsed {
            Some(()) => {
                self.accept(section);
                self.keep(trailing);
            }
            None => {
                self.warn(section.marker, section.line, "marker has no value on its line");
                let raw = std::iter::once(section.raw.to_string());
                self.keep(raw.chain(trailing));
            }
        }
    }

    fn finish(self) -> DecodedDescription {
        let Decoder {
            mut parts,
            chunks,
            warnings,
            ..
        } = self;

        for warning in &warnings {
            warn!(
                section = %warning.marker,
                line = warning.line,
                "description decode: {}",
                warning.message
            );
        }

        parts.prose = chunks
            .into_iter()
            .filter_map(trim_blank_edges)
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string();

        DecodedDescription { parts, warnings }
    }
}

fn unescaped(line: &str) -> String {
    unescape_line(line).into_owned()
}

/// Drops leading and trailing blank lines. `None` when nothing remains.
fn trim_blank_edges(lines: Vec<String>) -> Option<String> {
    let start = lines.iter().position(|line| !line.trim().is_empty())?;
    let end = lines.iter().rposition(|line| !line.trim().is_empty())?;
    Some(lines[start..=end].join("\n"))
}

fn split_csv(text: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in text.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        if !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

/// A 24-hour `HH:MM` time, or empty when the slot was left blank.
fn clock_time(label: &str, raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| format!("{label} time `{raw}` is not HH:MM"))
}

fn parse_detail(text: &str) -> Result<DetailLine, String> {
    if let Some(rest) = text.strip_prefix("Check-in:") {
        let (check_in, rest) = rest
            .split_once('|')
            .ok_or("check-in line is missing the `|` separator")?;
        let check_out = rest
            .trim()
            .strip_prefix("Check-out:")
            .ok_or("check-in line is missing `Check-out:`")?;
        return Ok(DetailLine::Times {
            check_in: clock_time("check-in", check_in)?,
            check_out: clock_time("check-out", check_out)?,
        });
    }
    if let Some(rest) = text.strip_prefix("Minimum Stay:") {
        let raw = rest.trim();
        let count = ["night(s)", "nights", "night"]
            .iter()
            .find_map(|suffix| raw.strip_suffix(suffix))
            .unwrap_or(raw)
            .trim();
        return count
            .parse::<u32>()
            .map(DetailLine::MinimumStay)
            .map_err(|_| format!("minimum stay `{raw}` is not a whole number of nights"));
    }
    if let Some(rest) = text.strip_prefix("Cancellation Policy:") {
        return Ok(DetailLine::Cancellation(rest.trim().to_string()));
    }
    if let Some(rest) = text.strip_prefix("Payment Methods:") {
        return Ok(DetailLine::Payment(split_csv(rest)));
    }
    if let Some(rest) = text.strip_prefix("Contact:") {
        return Ok(DetailLine::Contact(rest.trim().to_string()));
    }
    Err(format!("unrecognized line `{text}`"))
}
