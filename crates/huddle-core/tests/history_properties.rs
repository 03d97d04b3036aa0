//! Integration tests for history and selection behaviour across whole
//! command sequences.
//!
//! Random sequences come from a seeded `SmallRng`, so every run replays the
//! same commands.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::arithmetic_side_effects,
    clippy::too_many_lines
)]

use std::collections::BTreeSet;

use chrono::NaiveTime;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use huddle_core::command::{
    AddEvent, AddFriend, AddPerson, AddPoll, AddPollOption, DeletePerson, EditEvent, EditPerson,
    JoinEvent, Login, SelectEvent, SetTime, Vote,
};
use huddle_core::{Command, CommandError, CommandStatus, EntityKind, Model};
use huddle_types::{Address, Email, Index, Label, Name, Phone};

fn index(i: usize) -> Index {
    Index::from_one_based(i).unwrap()
}

fn add_person(name: &str, phone: &str) -> Command {
    let handle: String = name.split_whitespace().collect();
    Command::AddPerson(AddPerson {
        name: Name::parse(name).unwrap(),
        phone: Phone::parse(phone).unwrap(),
        email: Email::parse(&format!("{}@example.com", handle.to_lowercase())).unwrap(),
        address: Address::parse("123, Jurong West Ave 6").unwrap(),
        interests: BTreeSet::new(),
        tags: BTreeSet::new(),
    })
}

fn add_event(name: &str) -> Command {
    Command::AddEvent(AddEvent {
        name: Name::parse(name).unwrap(),
        address: Address::parse("Community Hall").unwrap(),
        tags: BTreeSet::new(),
    })
}

fn set_time(start: &str, end: &str) -> Command {
    Command::SetTime(SetTime {
        start: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
        end: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
    })
}

/// A random command that commits when valid: adds, deletes, edits,
/// friendships, events, polls, votes and the occasional clear. Never moves
/// the history cursor.
fn random_edit(rng: &mut SmallRng, serial: usize, model: &Model) -> Command {
    let people = model.store().people().len().max(1);
    let events = model.store().events().len().max(1);
    let polls = model
        .selection()
        .resolve_event(model.store())
        .map_or(1, |event| event.polls.len().max(1));
    let option = Label::parse(&format!("Option {}", rng.random_range(0..3))).unwrap();

    match rng.random_range(0..40) {
        0..=5 => add_person(
            &format!("Person {serial}"),
            &rng.random_range(100..100_000).to_string(),
        ),
        6..=7 => Command::DeletePerson(DeletePerson {
            index: index(rng.random_range(1..=people)),
        }),
        8..=10 => Command::Login(Login {
            index: index(rng.random_range(1..=people)),
        }),
        11..=13 => Command::AddFriend(AddFriend {
            index: index(rng.random_range(1..=people)),
        }),
        14..=16 => Command::EditPerson(EditPerson {
            name: Some(Name::parse(&format!("Renamed {serial}")).unwrap()),
            ..EditPerson::new(index(rng.random_range(1..=people)))
        }),
        17..=19 => add_event(&format!("Event {serial}")),
        20..=21 => Command::EditEvent(EditEvent {
            name: Some(Name::parse(&format!("Moved {serial}")).unwrap()),
            ..EditEvent::new(index(rng.random_range(1..=events)))
        }),
        22..=24 => Command::JoinEvent(JoinEvent {
            index: index(rng.random_range(1..=events)),
        }),
        25..=27 => Command::SelectEvent(SelectEvent {
            index: index(rng.random_range(1..=events)),
        }),
        28..=29 => Command::AddPoll(AddPoll {
            name: Label::parse(&format!("Poll {serial}")).unwrap(),
        }),
        30..=32 => Command::AddPollOption(AddPollOption {
            poll: index(rng.random_range(1..=polls)),
            option,
        }),
        33..=35 => Command::Vote(Vote {
            poll: index(rng.random_range(1..=polls)),
            option,
        }),
        36 => Command::Clear,
        _ => set_time("09:00", "17:00"),
    }
}

/// A random edit, or an undo or redo.
fn random_step(rng: &mut SmallRng, serial: usize, model: &Model) -> Command {
    match rng.random_range(0..10) {
        0..=1 => Command::Undo,
        2 => Command::Redo,
        _ => random_edit(rng, serial, model),
    }
}

/// Run `steps` random edits and return how many committed.
fn run_random(model: &mut Model, rng: &mut SmallRng, steps: usize) -> usize {
    let mut commits = 0;
    for serial in 0..steps {
        let command = random_edit(rng, serial, model);
        if let Ok(result) = model.execute(command) {
            if result.status == CommandStatus::Committed {
                commits += 1;
            }
        }
    }
    commits
}

#[test]
fn n_commits_then_n_undos_restore_initial_snapshot() {
    for seed in [1, 7, 42, 1234] {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut model = Model::new();
        let initial = model.store().clone();

        let commits = run_random(&mut model, &mut rng, 60);
        assert_eq!(model.history().len(), commits + 1, "seed {seed}");

        for _ in 0..commits {
            model.execute(Command::Undo).unwrap();
        }
        assert_eq!(*model.store(), initial, "seed {seed}");
        assert_eq!(
            model.execute(Command::Undo).unwrap_err(),
            CommandError::NoPreviousState
        );
    }
}

#[test]
fn k_undos_then_k_redos_restore_the_same_snapshot() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut model = Model::new();
    let commits = run_random(&mut model, &mut rng, 80);
    assert!(commits > 3);

    let newest = model.store().clone();
    let k = rng.random_range(1..=commits);
    for _ in 0..k {
        model.execute(Command::Undo).unwrap();
    }
    for _ in 0..k {
        model.execute(Command::Redo).unwrap();
    }
    assert_eq!(*model.store(), newest);
    assert_eq!(
        model.execute(Command::Redo).unwrap_err(),
        CommandError::NoNextState
    );
}

#[test]
fn every_snapshot_keeps_references_resolvable() {
    for seed in [7, 99, 2024] {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut model = Model::new();
        run_random(&mut model, &mut rng, 120);

        for commit in model.history().commits() {
            commit.snapshot().verify_references().unwrap();
        }
    }
}

#[test]
fn interleaved_undo_redo_keeps_history_and_selection_consistent() {
    for seed in [3, 11, 512] {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut model = Model::new();

        for serial in 0..200 {
            let command = random_step(&mut rng, serial, &model);
            model.execute(command).ok();

            let history = model.history();
            assert!(history.pointer() < history.len(), "seed {seed}");
            assert_eq!(history.can_undo(), history.pointer() > 0, "seed {seed}");
            model.store().verify_references().unwrap();

            // The selection never names an entity missing from the snapshot.
            if let Some(user) = model.selection().current_user() {
                assert!(model.store().find_person(user).is_some(), "seed {seed}");
            }
            if let Some(event) = model.selection().selected_event() {
                assert!(model.store().find_event(event).is_some(), "seed {seed}");
            }
        }

        for commit in model.history().commits() {
            commit.snapshot().verify_references().unwrap();
        }
    }
}

#[test]
fn commit_after_undo_discards_redo() {
    let mut model = Model::new();
    model.execute(add_person("Alice", "94351253")).unwrap();
    model.execute(Command::Undo).unwrap();
    model.execute(add_person("Bob", "98765432")).unwrap();
    assert_eq!(
        model.execute(Command::Redo).unwrap_err(),
        CommandError::NoNextState
    );
}

#[test]
fn alice_scenario() {
    let mut model = Model::new();
    assert_eq!(model.history().len(), 1);
    assert_eq!(model.history().pointer(), 0);

    model.execute(add_person("Alice", "94351253")).unwrap();
    assert_eq!(model.history().len(), 2);
    assert_eq!(model.history().pointer(), 1);

    model.execute(Command::Undo).unwrap();
    assert_eq!(model.history().pointer(), 0);
    assert!(model.store().people().is_empty());

    model.execute(Command::Redo).unwrap();
    assert_eq!(model.history().pointer(), 1);
    let alice = model.store().people().first().unwrap();
    assert_eq!(alice.name.as_str(), "Alice");
}

#[test]
fn duplicate_adds_do_not_grow_history() {
    let mut model = Model::new();
    model.execute(add_person("Alice", "94351253")).unwrap();
    let err = model.execute(add_person("Alice", "94351253")).unwrap_err();
    assert!(matches!(
        err,
        CommandError::DuplicateEntity {
            kind: EntityKind::Person,
            ..
        }
    ));
    assert_eq!(model.history().len(), 2);

    model
        .execute(Command::Login(Login { index: index(1) }))
        .unwrap();
    model.execute(add_event("Picnic")).unwrap();
    assert!(model.execute(add_event("Picnic")).is_err());
    assert_eq!(model.history().len(), 3);
}

#[test]
fn person_deletion_cascades_in_one_commit() {
    let mut model = Model::new();
    model.execute(add_person("Alice", "94351253")).unwrap();
    model.execute(add_person("Bob", "98765432")).unwrap();
    model.execute(add_person("Carl", "95352563")).unwrap();

    // Bob befriends both others, organises an event, and votes in its poll.
    model
        .execute(Command::Login(Login { index: index(2) }))
        .unwrap();
    model
        .execute(Command::AddFriend(AddFriend { index: index(1) }))
        .unwrap();
    model
        .execute(Command::AddFriend(AddFriend { index: index(3) }))
        .unwrap();
    model.execute(add_event("Picnic")).unwrap();
    model
        .execute(Command::SelectEvent(SelectEvent { index: index(1) }))
        .unwrap();
    model
        .execute(Command::JoinEvent(JoinEvent { index: index(1) }))
        .unwrap();
    model
        .execute(Command::AddPoll(AddPoll {
            name: Label::parse("Date poll").unwrap(),
        }))
        .unwrap();
    model
        .execute(Command::AddPollOption(AddPollOption {
            poll: index(1),
            option: Label::parse("12 August").unwrap(),
        }))
        .unwrap();
    model
        .execute(Command::Vote(Vote {
            poll: index(1),
            option: Label::parse("12 August").unwrap(),
        }))
        .unwrap();

    let before = model.history().len();
    model
        .execute(Command::DeletePerson(DeletePerson { index: index(2) }))
        .unwrap();
    assert_eq!(model.history().len(), before + 1);

    let store = model.store();
    assert!(store.people().iter().all(|p| p.friends.is_empty()));
    let picnic = store.events().first().unwrap();
    assert!(picnic.organiser.is_none());
    assert!(picnic.participants.is_empty());
    assert_eq!(picnic.referenced_people().count(), 0);
    assert!(model.selection().current_user().is_none());

    // One undo brings back Bob and every reference to him.
    model.execute(Command::Undo).unwrap();
    let store = model.store();
    assert_eq!(store.people().len(), 3);
    assert!(store.people().iter().all(|p| !p.friends.is_empty()));
    assert!(store.events().first().unwrap().organiser.is_some());
}

#[test]
fn undo_past_event_creation_clears_selection() {
    let mut model = Model::new();
    model.execute(add_person("Alice", "94351253")).unwrap();
    model
        .execute(Command::Login(Login { index: index(1) }))
        .unwrap();
    model.execute(add_event("Picnic")).unwrap();
    model
        .execute(Command::SelectEvent(SelectEvent { index: index(1) }))
        .unwrap();
    assert!(model.selection().selected_event().is_some());

    model.execute(Command::Undo).unwrap();
    assert!(model.selection().selected_event().is_none());
    assert_eq!(
        model.execute(set_time("10:00", "12:00")).unwrap_err(),
        CommandError::NoEventSelected
    );

    // Redo brings the event back but not the selection.
    model.execute(Command::Redo).unwrap();
    assert!(model.selection().selected_event().is_none());
}

#[test]
fn set_time_end_before_start_does_not_commit() {
    let mut model = Model::new();
    model.execute(add_person("Alice", "94351253")).unwrap();
    model
        .execute(Command::Login(Login { index: index(1) }))
        .unwrap();
    model.execute(add_event("Picnic")).unwrap();
    model
        .execute(Command::SelectEvent(SelectEvent { index: index(1) }))
        .unwrap();

    let before = model.history().len();
    let err = model.execute(set_time("18:00", "09:00")).unwrap_err();
    assert!(matches!(err, CommandError::InvalidFieldValue(_)));
    assert_eq!(model.history().len(), before);
    assert!(model.store().events().first().unwrap().time.is_none());
}

#[test]
fn undo_restores_logged_in_user_only_if_still_present() {
    let mut model = Model::new();
    model.execute(add_person("Alice", "94351253")).unwrap();
    model
        .execute(Command::Login(Login { index: index(1) }))
        .unwrap();

    // Undoing Alice's creation logs her out; redo does not log her back in.
    model.execute(Command::Undo).unwrap();
    assert!(model.selection().current_user().is_none());
    model.execute(Command::Redo).unwrap();
    assert!(model.selection().current_user().is_none());
}
