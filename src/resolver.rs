//! Default command dispatch.

use crate::command::{Command, CommandResolver, Context};
use crate::commands::Alert;
use crate::config::AlertFn;
use tracing::{debug, trace};

static BUILTINS: &[&dyn Command] = &[&Alert];

/// The resolver used when [`Config::command_resolver`](crate::Config) is unset.
///
/// A line is a command candidate when it starts with the delimiter, or always
/// when there is no delimiter. The candidate is split at the first space into
/// a name and an argument. Known names run and consume their slot; anything
/// else (unknown name, no space) is left to be typed literally.
pub struct DefaultResolver {
    delimiter: Option<String>,
    commands: Vec<Box<dyn Command>>,
    ctx: Context,
}

impl DefaultResolver {
    pub fn new(delimiter: Option<String>, alert: Option<AlertFn>) -> Self {
        Self {
            delimiter,
            commands: Vec::new(),
            ctx: Context::new(alert),
        }
    }

    /// Register an extra command. Registered commands shadow built-ins of the
    /// same name.
    pub fn with_command(mut self, command: impl Command) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    fn find(&self, name: &str) -> Option<&dyn Command> {
        if let Some(cmd) = self.commands.iter().find(|cmd| cmd.name() == name) {
            return Some(cmd.as_ref());
        }
        BUILTINS.iter().copied().find(|cmd| cmd.name() == name)
    }

    /// Strip the delimiter, or `None` if the line is not a candidate.
    fn candidate<'a>(&self, value: &'a str) -> Option<&'a str> {
        match &self.delimiter {
            Some(delimiter) => value.strip_prefix(delimiter.as_str()),
            None => Some(value),
        }
    }
}

impl CommandResolver for DefaultResolver {
    fn resolve(&mut self, value: &str, index: usize) -> usize {
        let Some(body) = self.candidate(value) else {
            return index;
        };
        let Some((name, argument)) = body.split_once(' ') else {
            trace!(index, value, "no argument separator, treating as text");
            return index;
        };
        match self.find(name) {
            Some(cmd) => {
                debug!(index, command = name, "running command");
                index.saturating_add(cmd.execute(argument, &self.ctx))
            }
            None => {
                trace!(index, command = name, "unknown command, treating as text");
                index
            }
        }
    }
}
