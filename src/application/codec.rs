//! CSV line format for persisted contacts.
//!
//! One contact per line: `id,name,phone,email`. Fields are not quoted or
//! escaped, so a comma inside a field does not survive a round trip.

use itertools::Itertools;

use crate::domain::{Contact, ContactId, DomainError};

pub const DELIMITER: char = ',';

pub fn format_line(contact: &Contact) -> String {
    let d = DELIMITER;
    format!(
        "{}{d}{}{d}{}{d}{}",
        contact.id, contact.name, contact.phone, contact.email
    )
}

/// Parses a contact id, tolerating surrounding whitespace.
pub fn parse_id(raw: &str) -> Result<ContactId, DomainError> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::InvalidId(raw.to_string()))
}

/// Parses one line. `line_no` is 1-based and only used for error messages.
///
/// Missing trailing fields become empty strings; anything after the fourth
/// field is ignored.
pub fn parse_line(line: &str, line_no: usize) -> Result<Contact, DomainError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split(DELIMITER);

    let raw_id = fields.next().unwrap_or_default();
    let id = parse_id(raw_id).map_err(|e| DomainError::MalformedRecord {
        line: line_no,
        reason: e.to_string(),
    })?;

    let mut next = || fields.next().unwrap_or_default().to_string();
    let name = next();
    let phone = next();
    let email = next();

    Ok(Contact {
        id,
        name,
        phone,
        email,
    })
}

/// Decodes a whole file, skipping blank lines.
pub fn decode(content: &str) -> Result<Vec<Contact>, DomainError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line, idx + 1))
        .collect()
}

/// Encodes contacts one per line, each line newline-terminated.
pub fn encode<'a, I>(contacts: I) -> String
where
    I: IntoIterator<Item = &'a Contact>,
{
    let mut out = contacts.into_iter().map(format_line).join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
