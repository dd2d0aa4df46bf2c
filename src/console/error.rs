use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::storage::StorageError;

/// A rejected command. The `Display` text is exactly the line printed to the
/// user, and a rejected command has no side effects.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("** class name missing **")]
    MissingClassName,

    #[error("** class doesn't exist **")]
    UnknownClass,

    #[error("** instance id missing **")]
    MissingId,

    #[error("** no instance found **")]
    UnknownInstance,

    #[error("** attribute name missing **")]
    MissingAttributeName,

    #[error("** value missing **")]
    MissingAttributeValue,

    #[error("** attribute is read-only **")]
    ReadOnlyAttribute,
}

/// Failures outside the command vocabulary: terminal I/O and persistence.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
