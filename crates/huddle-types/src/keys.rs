//! Identity keys: the minimal field combinations that decide whether two
//! records describe the same real-world person or event.
//!
//! Keys are what relationships and the selection state hold instead of
//! pointers. Snapshots are structural copies, so a reference is only
//! meaningful as "whoever in this snapshot matches this key".

use serde::{Deserialize, Serialize};

use crate::fields::{Email, Name, Phone};

/// Identity key for a [`Person`](crate::Person).
///
/// Two keys denote the same person when the names are equal and at least
/// one of phone or email is equal. This is weaker than field equality: an
/// edit that changes only the phone still refers to the same person.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonKey {
    /// The person's name.
    pub name: Name,
    /// The person's phone number.
    pub phone: Phone,
    /// The person's email address.
    pub email: Email,
}

impl PersonKey {
    /// Create a key from its three identity fields.
    pub const fn new(name: Name, phone: Phone, email: Email) -> Self {
        Self { name, phone, email }
    }

    /// Same name, and same phone or same email.
    pub fn same_person(&self, other: &Self) -> bool {
        self.name == other.name && (self.phone == other.phone || self.email == other.email)
    }
}

impl core::fmt::Display for PersonKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.phone, self.email)
    }
}

/// Identity key for an [`Event`](crate::Event): the event name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKey(pub Name);

impl EventKey {
    /// Same name.
    pub fn same_event(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl core::fmt::Display for EventKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key(name: &str, phone: &str, email: &str) -> PersonKey {
        PersonKey::new(
            Name::parse(name).unwrap(),
            Phone::parse(phone).unwrap(),
            Email::parse(email).unwrap(),
        )
    }

    #[test]
    fn same_name_and_phone_is_same_person() {
        let a = key("Alice", "9435", "alice@example.com");
        let b = key("Alice", "9435", "other@example.com");
        assert!(a.same_person(&b));
    }

    #[test]
    fn same_name_and_email_is_same_person() {
        let a = key("Alice", "9435", "alice@example.com");
        let b = key("Alice", "1111", "alice@example.com");
        assert!(a.same_person(&b));
    }

    #[test]
    fn different_name_is_different_person() {
        let a = key("Alice", "9435", "alice@example.com");
        let b = key("Bob", "9435", "alice@example.com");
        assert!(!a.same_person(&b));
    }

    #[test]
    fn same_name_only_is_different_person() {
        let a = key("Alice", "9435", "alice@example.com");
        let b = key("Alice", "1111", "other@example.com");
        assert!(!a.same_person(&b));
    }

    #[test]
    fn events_are_identified_by_name() {
        let a = EventKey(Name::parse("Picnic").unwrap());
        let b = EventKey(Name::parse("Picnic").unwrap());
        let c = EventKey(Name::parse("Hike").unwrap());
        assert!(a.same_event(&b));
        assert!(!a.same_event(&c));
    }
}
