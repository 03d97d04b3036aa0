//! Selection state: who is logged in and which event is selected.
//!
//! Both are identity keys, never copies of the entities. They are resolved
//! against the live snapshot on every access and revalidated after every
//! snapshot transition, so a selection never outlives the entity it names.

use huddle_store::EntityStore;
use huddle_types::{Event, EventKey, Person, PersonKey};
use tracing::debug;

use crate::error::CommandError;

/// The logged-in user and the selected event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current_user: Option<PersonKey>,
    selected_event: Option<EventKey>,
}

impl Selection {
    /// Nobody logged in, nothing selected.
    pub const fn new() -> Self {
        Self {
            current_user: None,
            selected_event: None,
        }
    }

    /// Key of the logged-in user, if any.
    pub const fn current_user(&self) -> Option<&PersonKey> {
        self.current_user.as_ref()
    }

    /// Key of the selected event, if any.
    pub const fn selected_event(&self) -> Option<&EventKey> {
        self.selected_event.as_ref()
    }

    /// The logged-in user as stored in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NoUserLoggedIn`] when nobody is logged in or
    /// the user no longer exists.
    pub fn resolve_user<'s>(&self, store: &'s EntityStore) -> Result<&'s Person, CommandError> {
        self.current_user
            .as_ref()
            .and_then(|key| store.find_person(key))
            .ok_or(CommandError::NoUserLoggedIn)
    }

    /// The selected event as stored in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NoEventSelected`] when no event is selected
    /// or it no longer exists.
    pub fn resolve_event<'s>(&self, store: &'s EntityStore) -> Result<&'s Event, CommandError> {
        self.selected_event
            .as_ref()
            .and_then(|key| store.find_event(key))
            .ok_or(CommandError::NoEventSelected)
    }

    pub(crate) fn login(&mut self, user: PersonKey) {
        self.current_user = Some(user);
    }

    pub(crate) const fn logout(&mut self) -> Option<PersonKey> {
        self.current_user.take()
    }

    pub(crate) fn select_event(&mut self, event: EventKey) {
        self.selected_event = Some(event);
    }

    /// Point the user selection at `new` if it currently names `old`.
    /// Returns whether the selection changed.
    pub(crate) fn follow_person(&mut self, old: &PersonKey, new: &PersonKey) -> bool {
        match self.current_user.as_mut() {
            Some(user) if user.same_person(old) && user != new => {
                user.clone_from(new);
                true
            }
            _ => false,
        }
    }

    /// Point the event selection at `new` if it currently names `old`.
    /// Returns whether the selection changed.
    pub(crate) fn follow_event(&mut self, old: &EventKey, new: &EventKey) -> bool {
        match self.selected_event.as_mut() {
            Some(event) if event.same_event(old) && event != new => {
                event.clone_from(new);
                true
            }
            _ => false,
        }
    }

    /// Re-resolve both references against `store`.
    ///
    /// A reference that still resolves is re-keyed to the stored entity's
    /// current key; one that does not is cleared. Returns whether anything
    /// changed.
    pub(crate) fn revalidate(&mut self, store: &EntityStore) -> bool {
        let before = self.clone();

        self.current_user = self
            .current_user
            .take()
            .and_then(|key| store.find_person(&key))
            .map(Person::key);
        self.selected_event = self
            .selected_event
            .take()
            .and_then(|key| store.find_event(&key))
            .map(Event::key);

        let changed = *self != before;
        if changed {
            debug!(
                user = ?self.current_user.as_ref().map(ToString::to_string),
                event = ?self.selected_event.as_ref().map(ToString::to_string),
                "selection revalidated"
            );
        }
        changed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use huddle_types::{Address, Email, Name, Phone};

    use super::*;

    fn alice() -> Person {
        Person::new(
            Name::parse("Alice").unwrap(),
            Phone::parse("94351253").unwrap(),
            Email::parse("alice@example.com").unwrap(),
            Address::parse("1 Main St").unwrap(),
            BTreeSet::new(),
            BTreeSet::new(),
        )
    }

    fn picnic() -> Event {
        Event::new(
            Name::parse("Picnic").unwrap(),
            Address::parse("East Coast Park").unwrap(),
            BTreeSet::new(),
            None,
        )
    }

    fn store_with_both() -> EntityStore {
        EntityStore::from_parts(vec![alice()], vec![picnic()]).unwrap()
    }

    #[test]
    fn empty_selection_resolves_to_errors() {
        let selection = Selection::new();
        let store = store_with_both();
        assert_eq!(
            selection.resolve_user(&store).unwrap_err(),
            CommandError::NoUserLoggedIn
        );
        assert_eq!(
            selection.resolve_event(&store).unwrap_err(),
            CommandError::NoEventSelected
        );
    }

    #[test]
    fn revalidate_clears_missing_entities() {
        let mut selection = Selection::new();
        selection.login(alice().key());
        selection.select_event(picnic().key());

        assert!(!selection.revalidate(&store_with_both()));
        assert!(selection.current_user().is_some());

        assert!(selection.revalidate(&EntityStore::new()));
        assert!(selection.current_user().is_none());
        assert!(selection.selected_event().is_none());
    }

    #[test]
    fn revalidate_rekeys_to_stored_identity() {
        let mut selection = Selection::new();
        // Same name and phone, stale email: still Alice.
        let stale = PersonKey::new(
            Name::parse("Alice").unwrap(),
            Phone::parse("94351253").unwrap(),
            Email::parse("old@example.com").unwrap(),
        );
        selection.login(stale);
        assert!(selection.revalidate(&store_with_both()));
        assert_eq!(selection.current_user(), Some(&alice().key()));
    }

    #[test]
    fn follow_event_tracks_renames() {
        let mut selection = Selection::new();
        selection.select_event(picnic().key());
        let renamed = EventKey(Name::parse("Beach Picnic").unwrap());
        assert!(selection.follow_event(&picnic().key(), &renamed));
        assert_eq!(selection.selected_event(), Some(&renamed));
        assert!(!selection.follow_event(&renamed, &renamed));
    }

    #[test]
    fn follow_person_ignores_other_people() {
        let mut selection = Selection::new();
        selection.login(alice().key());
        let bob = PersonKey::new(
            Name::parse("Bob").unwrap(),
            Phone::parse("98765432").unwrap(),
            Email::parse("bob@example.com").unwrap(),
        );
        assert!(!selection.follow_person(&bob, &bob));
        assert_eq!(selection.current_user(), Some(&alice().key()));
    }
}
