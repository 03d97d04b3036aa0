//! The [`Person`] entity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::fields::{Address, Email, Interest, Name, Phone, Tag};
use crate::keys::PersonKey;

/// A person in the contact book.
///
/// Identity is decided by [`PersonKey`] (name plus phone or email); the
/// remaining fields are data. Friend entries are identity keys of other
/// people in the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Display name (identity).
    pub name: Name,
    /// Phone number (identity).
    pub phone: Phone,
    /// Email address (identity).
    pub email: Email,
    /// Home or contact address.
    pub address: Address,
    /// Interests used for filtering and matching.
    #[serde(default)]
    pub interests: BTreeSet<Interest>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    /// Keys of this person's friends, in the order they were added.
    #[serde(default)]
    pub friends: Vec<PersonKey>,
}

impl Person {
    /// Create a person with no friends.
    pub const fn new(
        name: Name,
        phone: Phone,
        email: Email,
        address: Address,
        interests: BTreeSet<Interest>,
        tags: BTreeSet<Tag>,
    ) -> Self {
        Self {
            name,
            phone,
            email,
            address,
            interests,
            tags,
            friends: Vec::new(),
        }
    }

    /// The identity key of this person.
    pub fn key(&self) -> PersonKey {
        PersonKey::new(self.name.clone(), self.phone.clone(), self.email.clone())
    }

    /// Whether `other` describes the same real-world person.
    pub fn is_same_person(&self, other: &Self) -> bool {
        self.matches(&other.key())
    }

    /// Whether this person is the one identified by `key`.
    pub fn matches(&self, key: &PersonKey) -> bool {
        self.name == key.name && (self.phone == key.phone || self.email == key.email)
    }

    /// Whether `friend` appears in this person's friend list.
    pub fn has_friend(&self, friend: &PersonKey) -> bool {
        self.friends.iter().any(|k| k.same_person(friend))
    }

    /// Append `friend` unless already present. Returns whether it was added.
    pub fn add_friend(&mut self, friend: PersonKey) -> bool {
        if self.has_friend(&friend) {
            return false;
        }
        self.friends.push(friend);
        true
    }

    /// Remove every entry matching `friend`. Returns whether any was removed.
    pub fn remove_friend(&mut self, friend: &PersonKey) -> bool {
        let before = self.friends.len();
        self.friends.retain(|k| !k.same_person(friend));
        self.friends.len() != before
    }

    /// Replace entries matching `old` with `new`.
    pub fn rekey_friend(&mut self, old: &PersonKey, new: &PersonKey) {
        for entry in &mut self.friends {
            if entry.same_person(old) {
                entry.clone_from(new);
            }
        }
    }
}

impl core::fmt::Display for Person {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} Phone: {} Email: {} Address: {} Interests: ",
            self.name, self.phone, self.email, self.address
        )?;
        for interest in &self.interests {
            write!(f, "[{interest}]")?;
        }
        f.write_str(" Tags: ")?;
        for tag in &self.tags {
            write!(f, "[{tag}]")?;
        }
        Ok(())
    }
}
