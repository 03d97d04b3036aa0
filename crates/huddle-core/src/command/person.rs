//! Person commands: adding, editing, finding, logging in and friendships.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use huddle_types::{Address, Email, Index, Interest, Name, Person, Phone, Tag};

use crate::error::{CommandError, EntityKind};
use crate::model::{CommandResult, Model};
use crate::view::PersonFilter;

/// Add a new person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPerson {
    /// Name.
    pub name: Name,
    /// Phone number.
    pub phone: Phone,
    /// Email address.
    pub email: Email,
    /// Address.
    pub address: Address,
    /// Interests.
    #[serde(default)]
    pub interests: BTreeSet<Interest>,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
}

impl AddPerson {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let person = Person::new(
            self.name,
            self.phone,
            self.email,
            self.address,
            self.interests,
            self.tags,
        );
        let feedback = format!("New person added: {person}");

        let mut working = model.store().clone();
        working.add_person(person)?;
        model.commit(working, "addPerson");
        Ok(CommandResult::committed(feedback))
    }
}

/// Delete the person at `index` in the person list, along with every
/// reference to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePerson {
    /// One-based position in the displayed person list.
    pub index: Index,
}

impl DeletePerson {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let target = model.view().person_at(model.store(), self.index)?.key();

        let mut working = model.store().clone();
        let removed = working.delete_person(&target)?;
        model.commit(working, "deletePerson");
        Ok(CommandResult::committed(format!("Deleted Person: {removed}")))
    }
}

/// Edit the person at `index` in the person list. Omitted fields keep
/// their value; friends are never edited here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPerson {
    /// One-based position in the displayed person list.
    pub index: Index,
    /// New name.
    #[serde(default)]
    pub name: Option<Name>,
    /// New phone number.
    #[serde(default)]
    pub phone: Option<Phone>,
    /// New email address.
    #[serde(default)]
    pub email: Option<Email>,
    /// New address.
    #[serde(default)]
    pub address: Option<Address>,
    /// Replacement interests.
    #[serde(default)]
    pub interests: Option<BTreeSet<Interest>>,
    /// Replacement tags.
    #[serde(default)]
    pub tags: Option<BTreeSet<Tag>>,
}

impl EditPerson {
    /// An edit of the person at `index` that changes nothing yet.
    pub const fn new(index: Index) -> Self {
        Self {
            index,
            name: None,
            phone: None,
            email: None,
            address: None,
            interests: None,
            tags: None,
        }
    }

    /// Whether no field would change.
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.interests.is_none()
            && self.tags.is_none()
    }

    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        if self.is_empty() {
            return Err(CommandError::NothingToEdit);
        }
        let target = model.view().person_at(model.store(), self.index)?;
        let old_key = target.key();

        let edited = Person {
            name: self.name.unwrap_or_else(|| target.name.clone()),
            phone: self.phone.unwrap_or_else(|| target.phone.clone()),
            email: self.email.unwrap_or_else(|| target.email.clone()),
            address: self.address.unwrap_or_else(|| target.address.clone()),
            interests: self.interests.unwrap_or_else(|| target.interests.clone()),
            tags: self.tags.unwrap_or_else(|| target.tags.clone()),
            friends: target.friends.clone(),
        };
        let new_key = edited.key();
        let feedback = format!("Edited Person: {edited}");

        let mut working = model.store().clone();
        working.update_person(&old_key, edited)?;
        model.commit_following(working, "editPerson", |selection| {
            selection.follow_person(&old_key, &new_key)
        });
        Ok(CommandResult::committed(feedback))
    }
}

/// Show people whose name contains any of the keywords as a whole word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindPerson {
    /// Keywords, matched case-insensitively.
    pub keywords: Vec<String>,
}

impl FindPerson {
    pub(crate) fn execute(self, model: &mut Model) -> CommandResult {
        model.set_person_filter(PersonFilter::NameKeywords(self.keywords));
        people_listed(model)
    }
}

/// Show the person with exactly this phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindUserByPhone {
    /// Phone number to match.
    pub phone: Phone,
}

impl FindUserByPhone {
    pub(crate) fn execute(self, model: &mut Model) -> CommandResult {
        model.set_person_filter(PersonFilter::Phone(self.phone));
        people_listed(model)
    }
}

fn people_listed(model: &Model) -> CommandResult {
    let shown = model.filtered_people().len();
    CommandResult::completed(format!("{shown} persons listed!"))
}

pub(crate) fn list_people(model: &mut Model) -> CommandResult {
    model.set_person_filter(PersonFilter::All);
    CommandResult::completed("Listed all persons")
}

/// Log in as the person at `index` in the person list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    /// One-based position in the displayed person list.
    pub index: Index,
}

impl Login {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let user = model.view().person_at(model.store(), self.index)?.key();
        let feedback = format!("Logged in as {}", user.name);

        model.selection_mut().login(user);
        model.selection_changed();
        Ok(CommandResult::completed(feedback))
    }
}

pub(crate) fn logout(model: &mut Model) -> Result<CommandResult, CommandError> {
    let user = model
        .selection_mut()
        .logout()
        .ok_or(CommandError::NoUserLoggedIn)?;
    model.selection_changed();
    Ok(CommandResult::completed(format!("Logged out {}", user.name)))
}

/// Make the logged-in user and the person at `index` friends of each
/// other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddFriend {
    /// One-based position in the displayed person list.
    pub index: Index,
}

impl AddFriend {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let store = model.store();
        let user = model.selection().resolve_user(store)?;
        let friend = model.view().person_at(store, self.index)?;
        if user.is_same_person(friend) {
            return Err(CommandError::CannotFriendSelf);
        }
        if user.has_friend(&friend.key()) {
            return Err(CommandError::DuplicateEntity {
                kind: EntityKind::Friendship,
                key: friend.key().to_string(),
            });
        }

        let mut new_user = user.clone();
        let mut new_friend = friend.clone();
        new_user.add_friend(friend.key());
        new_friend.add_friend(user.key());
        let feedback = format!("{} is now a friend of {}", friend.name, user.name);

        let mut working = store.clone();
        working.update_person_pair(&user.key(), new_user, &friend.key(), new_friend)?;
        model.commit(working, "addFriend");
        Ok(CommandResult::committed(feedback))
    }
}

/// End the friendship between the logged-in user and the person at
/// `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFriend {
    /// One-based position in the displayed person list.
    pub index: Index,
}

impl DeleteFriend {
    pub(crate) fn execute(self, model: &mut Model) -> Result<CommandResult, CommandError> {
        let store = model.store();
        let user = model.selection().resolve_user(store)?;
        let friend = model.view().person_at(store, self.index)?;
        if user.is_same_person(friend) {
            return Err(CommandError::CannotFriendSelf);
        }
        if !user.has_friend(&friend.key()) {
            return Err(CommandError::EntityNotFound {
                kind: EntityKind::Friendship,
                key: friend.key().to_string(),
            });
        }

        let mut new_user = user.clone();
        let mut new_friend = friend.clone();
        new_user.remove_friend(&friend.key());
        new_friend.remove_friend(&user.key());
        let feedback = format!("{} is no longer a friend of {}", friend.name, user.name);

        let mut working = store.clone();
        working.update_person_pair(&user.key(), new_user, &friend.key(), new_friend)?;
        model.commit(working, "deleteFriend");
        Ok(CommandResult::committed(feedback))
    }
}
