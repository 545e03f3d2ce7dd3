use tracing::warn;

use super::EmbeddedMetadata;

/// Values read from the record's dedicated columns, when it has them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedicatedColumns<'a> {
    pub contact_phone: Option<&'a str>,
    pub license_number: Option<&'a str>,
}

/// Merges decoded metadata with dedicated columns. A non-empty column is the
/// source of truth; the embedded copy only fills gaps.
pub fn reconcile(mut decoded: EmbeddedMetadata, columns: &DedicatedColumns<'_>) -> EmbeddedMetadata {
    prefer_column("contact_phone", &mut decoded.contact_phone, columns.contact_phone);
    prefer_column("license_number", &mut decoded.license_number, columns.license_number);
    decoded
}

fn prefer_column(field: &str, embedded: &mut String, column: Option<&str>) {
    let Some(column) = column.map(str::trim).filter(|value| !value.is_empty()) else {
        return;
    };
    if !embedded.is_empty() && embedded.as_str() != column {
        warn!(
            field,
            column,
            embedded = embedded.as_str(),
            "embedded value differs from dedicated column; using the column"
        );
    }
    *embedded = column.to_string();
}
