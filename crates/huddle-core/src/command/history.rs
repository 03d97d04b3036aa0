//! History commands: undo, redo, clear and the command log.

use huddle_store::EntityStore;

use crate::error::CommandError;
use crate::model::{CommandResult, Model};

pub(crate) fn undo(model: &mut Model) -> Result<CommandResult, CommandError> {
    model.undo()?;
    Ok(CommandResult::committed("Undo success!"))
}

pub(crate) fn redo(model: &mut Model) -> Result<CommandResult, CommandError> {
    model.redo()?;
    Ok(CommandResult::committed("Redo success!"))
}

pub(crate) fn clear(model: &mut Model) -> CommandResult {
    model.commit(EntityStore::new(), "clear");
    CommandResult::committed("Address book has been cleared!")
}

pub(crate) fn list(model: &Model) -> CommandResult {
    let executed = model.executed_commands();
    if executed.is_empty() {
        return CommandResult::completed("You have not yet entered any commands.");
    }
    let mut words: Vec<&str> = executed.iter().map(String::as_str).collect();
    words.reverse();
    CommandResult::completed(format!(
        "Entered commands (from most recent to earliest):\n{}",
        words.join("\n")
    ))
}
