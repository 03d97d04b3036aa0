//! Shared setup for command tests.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use huddle_types::{Address, Email, Index, Name, Phone};

use super::{AddEvent, AddPerson, Command, Login, SelectEvent};
use crate::model::{Model, ModelChange, ModelListener};

pub fn index(i: usize) -> Index {
    Index::from_one_based(i).unwrap()
}

pub fn add_person(name: &str, phone: &str, email: &str) -> Command {
    Command::AddPerson(AddPerson {
        name: Name::parse(name).unwrap(),
        phone: Phone::parse(phone).unwrap(),
        email: Email::parse(email).unwrap(),
        address: Address::parse("1 Main St").unwrap(),
        interests: BTreeSet::new(),
        tags: BTreeSet::new(),
    })
}

pub fn add_event(name: &str) -> Command {
    Command::AddEvent(AddEvent {
        name: Name::parse(name).unwrap(),
        address: Address::parse("Community Hall").unwrap(),
        tags: BTreeSet::new(),
    })
}

/// Alice, Bob and Carl, in that order, nobody logged in.
pub fn model_with_people() -> Model {
    let mut model = Model::new();
    model
        .execute(add_person("Alice", "94351253", "alice@example.com"))
        .unwrap();
    model
        .execute(add_person("Bob", "98765432", "bob@example.com"))
        .unwrap();
    model
        .execute(add_person("Carl", "95352563", "carl@example.com"))
        .unwrap();
    model
}

pub fn login(model: &mut Model, i: usize) {
    model
        .execute(Command::Login(Login { index: index(i) }))
        .unwrap();
}

/// Alice logged in, organising a selected "Picnic".
pub fn model_with_selected_event() -> Model {
    let mut model = model_with_people();
    login(&mut model, 1);
    model.execute(add_event("Picnic")).unwrap();
    model
        .execute(Command::SelectEvent(SelectEvent { index: index(1) }))
        .unwrap();
    model
}

/// Listener that records every change it sees.
pub struct Recorder(Rc<RefCell<Vec<ModelChange>>>);

impl ModelListener for Recorder {
    fn on_change(&mut self, change: &ModelChange, _model: &Model) {
        self.0.borrow_mut().push(change.clone());
    }
}

/// Install a [`Recorder`] on `model` and return its log.
pub fn record_changes(model: &mut Model) -> Rc<RefCell<Vec<ModelChange>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    model.add_listener(Box::new(Recorder(Rc::clone(&seen))));
    seen
}
