//! Address book record

use std::fmt;

/// Key type for contacts.
pub type ContactId = i64;

/// A single address book entry.
///
/// Only `id` takes part in ordering; the remaining fields are free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contact {
    /// Unique key
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Contact {
    pub fn new(
        id: ContactId,
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Phone: {}, Email: {}",
            self.id, self.name, self.phone, self.email
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_contact_when_displayed_then_lists_all_fields() {
        let contact = Contact::new(7, "Ada", "555-0100", "ada@example.com");
        assert_eq!(
            contact.to_string(),
            "ID: 7, Name: Ada, Phone: 555-0100, Email: ada@example.com"
        );
    }
}
