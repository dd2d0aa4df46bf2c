//! The interactive command interpreter.
//!
//! Each line goes through the canonical parser when it starts with a known
//! verb and through the dot-call parser otherwise, then is validated and
//! dispatched against the [`Registry`]. Create, update and destroy save the
//! registry before the next line is read.

mod command;
pub mod dotcall;
mod editor;
mod error;

pub use command::Command;
pub use editor::{LineEditor, ReadResult, RustylineEditor, ScriptEditor};
pub use error::{CommandError, ConsoleError};

use std::io::{self, Write};

use command::is_canonical;
use crate::config::ShellConfig;
use crate::models::{AttrValue, ClassName, Record, RESERVED_FIELDS};
use crate::storage::{FileStorage, Registry};

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

const HELP_TOPICS: [(&str, &str); 8] = [
    ("all", "Prints all instances, or all instances of a class: all [<class>]"),
    ("create", "Creates a new instance, saves it and prints its id: create <class>"),
    ("destroy", "Deletes an instance: destroy <class> <id>"),
    ("EOF", "Exit the program"),
    ("help", "List available commands with \"help\" or detailed help with \"help <command>\""),
    ("quit", "Quit command to exit the program"),
    ("show", "Prints an instance: show <class> <id>"),
    ("update", "Sets one attribute of an instance: update <class> <id> <attribute> <value>"),
];

pub struct Console<W: Write = io::Stdout> {
    registry: Registry,
    storage: FileStorage,
    prompt: String,
    out: W,
}

impl Console<io::Stdout> {
    /// Open the configured record file and print to stdout.
    ///
    /// # Errors
    ///
    /// Fails if the record file exists but cannot be read or is not a JSON
    /// object. Individual bad records are skipped instead.
    pub fn open(config: &ShellConfig) -> Result<Self, ConsoleError> {
        let storage = FileStorage::new(&config.storage_path);
        let mut registry = Registry::new();
        storage.reload(&mut registry)?;

        Ok(Self::with_output(registry, storage, io::stdout()).with_prompt(&config.prompt))
    }
}

impl<W: Write> Console<W> {
    pub fn with_output(registry: Registry, storage: FileStorage, out: W) -> Self {
        Self {
            registry,
            storage,
            prompt: ShellConfig::default().prompt,
            out,
        }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read and execute lines until `quit`, `EOF` or end of input.
    ///
    /// Save failures are reported on the console and the loop continues;
    /// only editor and output failures end it with an error.
    pub fn run<E: LineEditor>(&mut self, editor: &mut E) -> Result<(), ConsoleError> {
        loop {
            let line = match editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };

            if !line.trim().is_empty() {
                editor.add_history(&line);
            }

            match self.execute(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(ConsoleError::Storage(e)) => {
                    tracing::error!(error = %e, "failed to save records");
                    writeln!(self.out, "** {} **", e)?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Execute one input line.
    pub fn execute(&mut self, line: &str) -> Result<Flow, ConsoleError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = if is_canonical(line) {
            command::parse(line)
        } else {
            dotcall::parse(line)
        };

        match parsed {
            Some(command) => {
                tracing::debug!(?command, "dispatching");
                self.dispatch(command)
            }
            None => {
                tracing::debug!(line, "ignoring unrecognised line");
                Ok(Flow::Continue)
            }
        }
    }

    /// Run a parsed command, printing its result or validation error.
    pub fn dispatch(&mut self, command: Command) -> Result<Flow, ConsoleError> {
        let outcome = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Create { class } => self.create(class.as_deref()),
            Command::Show { class, id } => self.show(class.as_deref(), id.as_deref()),
            Command::Destroy { class, id } => self.destroy(class.as_deref(), id.as_deref()),
            Command::All { class } => self.all(class.as_deref()),
            Command::Update {
                class,
                id,
                attribute,
                value,
            } => self.update(
                class.as_deref(),
                id.as_deref(),
                attribute.as_deref(),
                value.as_deref(),
            ),
            Command::Count { class } => {
                writeln!(self.out, "{}", self.registry.count_class(&class))?;
                Ok(Ok(()))
            }
            Command::Help { topic } => {
                self.help(topic.as_deref())?;
                Ok(Ok(()))
            }
        };

        if let Err(e) = outcome? {
            writeln!(self.out, "{}", e)?;
        }
        Ok(Flow::Continue)
    }

    // Each handler returns the outer `Result` for I/O and storage failures and
    // the inner one for validation failures.

    fn create(&mut self, class: Option<&str>) -> Result<Result<(), CommandError>, ConsoleError> {
        let class = match resolve_class(class) {
            Ok(class) => class,
            Err(e) => return Ok(Err(e)),
        };

        let record = Record::new(class);
        let id = record.id.clone();
        self.registry.register(record);
        self.storage.save(&self.registry)?;
        tracing::info!(class = %class, id = %id, "created record");

        writeln!(self.out, "{}", id)?;
        Ok(Ok(()))
    }

    fn show(
        &mut self,
        class: Option<&str>,
        id: Option<&str>,
    ) -> Result<Result<(), CommandError>, ConsoleError> {
        let key = match self.resolve_key(class, id) {
            Ok(key) => key,
            Err(e) => return Ok(Err(e)),
        };
        if let Some(record) = self.registry.get(&key) {
            writeln!(self.out, "{}", record)?;
        }
        Ok(Ok(()))
    }

    fn destroy(
        &mut self,
        class: Option<&str>,
        id: Option<&str>,
    ) -> Result<Result<(), CommandError>, ConsoleError> {
        let key = match self.resolve_key(class, id) {
            Ok(key) => key,
            Err(e) => return Ok(Err(e)),
        };
        self.registry.remove(&key);
        self.storage.save(&self.registry)?;
        tracing::info!(key = %key, "destroyed record");
        Ok(Ok(()))
    }

    fn all(&mut self, class: Option<&str>) -> Result<Result<(), CommandError>, ConsoleError> {
        let listed: Vec<String> = match class {
            Some(name) => {
                if ClassName::from_str(name).is_none() {
                    return Ok(Err(CommandError::UnknownClass));
                }
                self.registry
                    .all_of(name)
                    .map(|record| record.to_string())
                    .collect()
            }
            None => self
                .registry
                .all()
                .map(|(_, record)| record.to_string())
                .collect(),
        };
        writeln!(self.out, "{:?}", listed)?;
        Ok(Ok(()))
    }

    fn update(
        &mut self,
        class: Option<&str>,
        id: Option<&str>,
        attribute: Option<&str>,
        value: Option<&str>,
    ) -> Result<Result<(), CommandError>, ConsoleError> {
        let key = match self.resolve_key(class, id) {
            Ok(key) => key,
            Err(e) => return Ok(Err(e)),
        };
        let Some(attribute) = attribute else {
            return Ok(Err(CommandError::MissingAttributeName));
        };
        let Some(value) = value else {
            return Ok(Err(CommandError::MissingAttributeValue));
        };
        if RESERVED_FIELDS.contains(&attribute) {
            return Ok(Err(CommandError::ReadOnlyAttribute));
        }

        let value = AttrValue::coerce(value);
        if let Some(record) = self.registry.get_mut(&key) {
            tracing::debug!(key = %key, attribute, kind = value.type_name(), "updating attribute");
            record.set(attribute, value);
            record.touch();
        }
        self.storage.save(&self.registry)?;
        Ok(Ok(()))
    }

    fn help(&mut self, topic: Option<&str>) -> io::Result<()> {
        match topic {
            None => {
                writeln!(self.out)?;
                writeln!(self.out, "Documented commands (type help <topic>):")?;
                writeln!(self.out, "========================================")?;
                let names: Vec<&str> = HELP_TOPICS.iter().map(|(name, _)| *name).collect();
                writeln!(self.out, "{}", names.join("  "))?;
                writeln!(self.out)
            }
            Some(topic) => match HELP_TOPICS.iter().find(|(name, _)| *name == topic) {
                Some((_, text)) => writeln!(self.out, "{}", text),
                None => writeln!(self.out, "*** No help on {}", topic),
            },
        }
    }

    /// Checks shared by show, destroy and update, in order: class given,
    /// class known, id given, record present.
    fn resolve_key(&self, class: Option<&str>, id: Option<&str>) -> Result<String, CommandError> {
        let class = resolve_class(class)?;
        let id = id.ok_or(CommandError::MissingId)?;
        let key = format!("{}.{}", class, id);
        if self.registry.contains(&key) {
            Ok(key)
        } else {
            Err(CommandError::UnknownInstance)
        }
    }
}

fn resolve_class(class: Option<&str>) -> Result<ClassName, CommandError> {
    let name = class.ok_or(CommandError::MissingClassName)?;
    ClassName::from_str(name).ok_or(CommandError::UnknownClass)
}
