use std::collections::HashMap;

use thiserror::Error;

use crate::app::{ConsoleCommandDesc, SceneConsoleCommand};

use super::ConsoleState;

/// Commands the loop must execute after the console has parsed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DebugCommand {
    Quit,
    Scene(SceneConsoleCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LocalAction {
    Help,
    Clear,
    Echo { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedCommand {
    Local(LocalAction),
    Queueable(DebugCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandParseError {
    reason: String,
    usage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum RegisterError {
    #[error("command name cannot be empty")]
    EmptyName,
    #[error("duplicate command registration: {0}")]
    Duplicate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Help,
    Clear,
    Echo,
    Quit,
    Scene,
}

#[derive(Debug, Clone)]
struct CommandSpec {
    name: String,
    help: String,
    arg_schema: String,
    kind: CommandKind,
}

impl CommandSpec {
    fn usage(&self) -> String {
        if self.arg_schema.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.arg_schema)
        }
    }

    fn parse(&self, args: &[String]) -> Result<ParsedCommand, CommandParseError> {
        match self.kind {
            CommandKind::Help => {
                self.require_no_args(args)?;
                Ok(ParsedCommand::Local(LocalAction::Help))
            }
            CommandKind::Clear => {
                self.require_no_args(args)?;
                Ok(ParsedCommand::Local(LocalAction::Clear))
            }
            CommandKind::Echo => {
                if args.is_empty() {
                    return Err(CommandParseError {
                        reason: "missing required argument <text...>".to_string(),
                        usage: self.usage(),
                    });
                }
                Ok(ParsedCommand::Local(LocalAction::Echo {
                    text: args.join(" "),
                }))
            }
            CommandKind::Quit => {
                self.require_no_args(args)?;
                Ok(ParsedCommand::Queueable(DebugCommand::Quit))
            }
            CommandKind::Scene => Ok(ParsedCommand::Queueable(DebugCommand::Scene(
                SceneConsoleCommand::new(self.name.clone(), args.to_vec()),
            ))),
        }
    }

    fn require_no_args(&self, args: &[String]) -> Result<(), CommandParseError> {
        if args.is_empty() {
            return Ok(());
        }
        Err(CommandParseError {
            reason: format!("expected no arguments, got {}", args.len()),
            usage: self.usage(),
        })
    }
}

/// Case-insensitive command table. `help` lists entries in registration
/// order.
pub(crate) struct ConsoleCommandRegistry {
    specs: Vec<CommandSpec>,
    lookup_by_lower_name: HashMap<String, usize>,
}

impl ConsoleCommandRegistry {
    pub(crate) fn with_engine_builtins() -> Self {
        let builtins = [
            ("help", "List commands", "", CommandKind::Help),
            ("clear", "Clear console output", "", CommandKind::Clear),
            ("echo", "Print text to console", "<text...>", CommandKind::Echo),
            ("quit", "Quit app", "", CommandKind::Quit),
        ];
        let mut registry = Self {
            specs: Vec::with_capacity(builtins.len()),
            lookup_by_lower_name: HashMap::new(),
        };
        for (name, help, arg_schema, kind) in builtins {
            registry.insert(CommandSpec {
                name: name.to_string(),
                help: help.to_string(),
                arg_schema: arg_schema.to_string(),
                kind,
            });
        }
        registry
    }

    pub(crate) fn register_scene_command(
        &mut self,
        desc: &ConsoleCommandDesc,
    ) -> Result<(), RegisterError> {
        let name = desc.name.trim();
        if name.is_empty() {
            return Err(RegisterError::EmptyName);
        }
        if self
            .lookup_by_lower_name
            .contains_key(&name.to_ascii_lowercase())
        {
            return Err(RegisterError::Duplicate(name.to_string()));
        }
        self.insert(CommandSpec {
            name: name.to_string(),
            help: desc.help.to_string(),
            arg_schema: desc.arg_schema.to_string(),
            kind: CommandKind::Scene,
        });
        Ok(())
    }

    fn insert(&mut self, spec: CommandSpec) {
        self.lookup_by_lower_name
            .insert(spec.name.to_ascii_lowercase(), self.specs.len());
        self.specs.push(spec);
    }

    fn lookup(&self, input_name: &str) -> Option<&CommandSpec> {
        let index = self
            .lookup_by_lower_name
            .get(&input_name.to_ascii_lowercase())?;
        self.specs.get(*index)
    }

    fn help_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.specs
            .iter()
            .map(|spec| format!("{} - {}", spec.usage(), spec.help))
    }
}

pub(crate) struct ConsoleCommandProcessor {
    registry: ConsoleCommandRegistry,
}

impl Default for ConsoleCommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleCommandProcessor {
    pub(crate) fn new() -> Self {
        Self {
            registry: ConsoleCommandRegistry::with_engine_builtins(),
        }
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ConsoleCommandRegistry {
        &mut self.registry
    }

    /// Runs local commands immediately and returns the rest, oldest first.
    pub(crate) fn process_pending_lines(&self, console: &mut ConsoleState) -> Vec<DebugCommand> {
        console
            .drain_pending_lines()
            .into_iter()
            .filter_map(|raw_line| self.process_line(console, &raw_line))
            .collect()
    }

    fn process_line(&self, console: &mut ConsoleState, raw_line: &str) -> Option<DebugCommand> {
        let tokens = match tokenize_line(raw_line.trim()) {
            Ok(tokens) => tokens,
            Err(reason) => {
                console.push_output(format!("error: {reason}. usage: help"));
                return None;
            }
        };
        let (command_name, args) = tokens.split_first()?;

        let Some(spec) = self.registry.lookup(command_name) else {
            console.push_output(format!("error: unknown command '{command_name}'. try: help"));
            return None;
        };

        match spec.parse(args) {
            Ok(ParsedCommand::Local(action)) => {
                self.apply_local_action(console, action);
                None
            }
            Ok(ParsedCommand::Queueable(command)) => Some(command),
            Err(error) => {
                console.push_output(format!("error: {}. usage: {}", error.reason, error.usage));
                None
            }
        }
    }

    fn apply_local_action(&self, console: &mut ConsoleState, action: LocalAction) {
        match action {
            LocalAction::Help => {
                for line in self.registry.help_lines() {
                    console.push_output(line);
                }
            }
            LocalAction::Clear => console.clear_output(),
            LocalAction::Echo { text } => console.push_output(text),
        }
    }
}

/// Splits on whitespace; double quotes group words and may produce an empty
/// token.
fn tokenize_line(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            _ => {
                current.push(ch);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted string".to_string());
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(console: &mut ConsoleState, line: &str) {
        if !console.is_open() {
            console.toggle_open();
        }
        console.type_and_submit(line);
    }

    fn output_after_echo(console: &ConsoleState) -> Vec<String> {
        console
            .output_lines()
            .filter(|line| !line.starts_with("> "))
            .map(str::to_string)
            .collect()
    }

    fn processor_with_scene_commands() -> ConsoleCommandProcessor {
        let mut processor = ConsoleCommandProcessor::new();
        for desc in [
            ConsoleCommandDesc {
                name: "size",
                help: "Resize the board",
                arg_schema: "<n:int>",
            },
            ConsoleCommandDesc {
                name: "reset",
                help: "New board",
                arg_schema: "",
            },
        ] {
            processor
                .registry_mut()
                .register_scene_command(&desc)
                .expect("register");
        }
        processor
    }

    #[test]
    fn help_lists_builtins_then_scene_commands() {
        let processor = processor_with_scene_commands();
        let mut console = ConsoleState::default();
        submit(&mut console, "help");

        assert!(processor.process_pending_lines(&mut console).is_empty());
        assert_eq!(
            output_after_echo(&console),
            vec![
                "help - List commands",
                "clear - Clear console output",
                "echo <text...> - Print text to console",
                "quit - Quit app",
                "size <n:int> - Resize the board",
                "reset - New board",
            ]
        );
    }

    #[test]
    fn unknown_command_reports_error() {
        let processor = ConsoleCommandProcessor::new();
        let mut console = ConsoleState::default();
        submit(&mut console, "fly away");

        processor.process_pending_lines(&mut console);
        assert_eq!(
            output_after_echo(&console),
            vec!["error: unknown command 'fly'. try: help"]
        );
    }

    #[test]
    fn builtin_argument_errors_show_usage() {
        let processor = ConsoleCommandProcessor::new();
        let mut console = ConsoleState::default();
        submit(&mut console, "quit now");
        submit(&mut console, "echo");

        assert!(processor.process_pending_lines(&mut console).is_empty());
        assert_eq!(
            output_after_echo(&console),
            vec![
                "error: expected no arguments, got 1. usage: quit",
                "error: missing required argument <text...>. usage: echo <text...>",
            ]
        );
    }

    #[test]
    fn scene_commands_are_queued_with_raw_args() {
        let processor = processor_with_scene_commands();
        let mut console = ConsoleState::default();
        submit(&mut console, "SIZE 7");
        submit(&mut console, "reset");
        submit(&mut console, "quit");

        let queued = processor.process_pending_lines(&mut console);
        assert_eq!(
            queued,
            vec![
                DebugCommand::Scene(SceneConsoleCommand::new("size", vec!["7".to_string()])),
                DebugCommand::Scene(SceneConsoleCommand::new("reset", Vec::new())),
                DebugCommand::Quit,
            ]
        );
    }

    #[test]
    fn local_commands_run_immediately() {
        let processor = ConsoleCommandProcessor::new();
        let mut console = ConsoleState::default();
        submit(&mut console, "echo \"hello there\" friend");
        assert!(processor.process_pending_lines(&mut console).is_empty());
        assert_eq!(output_after_echo(&console), vec!["hello there friend"]);

        submit(&mut console, "clear");
        processor.process_pending_lines(&mut console);
        assert_eq!(console.output_lines().count(), 0);
    }

    #[test]
    fn scene_registration_rejects_duplicates_and_blank_names() {
        let mut processor = ConsoleCommandProcessor::new();
        let clash = ConsoleCommandDesc {
            name: "Help",
            help: "",
            arg_schema: "",
        };
        assert_eq!(
            processor.registry_mut().register_scene_command(&clash),
            Err(RegisterError::Duplicate("Help".to_string()))
        );
        let blank = ConsoleCommandDesc {
            name: "  ",
            help: "",
            arg_schema: "",
        };
        assert_eq!(
            processor.registry_mut().register_scene_command(&blank),
            Err(RegisterError::EmptyName)
        );
    }

    #[test]
    fn tokenizer_handles_quotes() {
        assert_eq!(
            tokenize_line("echo \"a b\"  c"),
            Ok(vec!["echo".to_string(), "a b".to_string(), "c".to_string()])
        );
        assert_eq!(
            tokenize_line("echo \"\""),
            Ok(vec!["echo".to_string(), String::new()])
        );
        assert!(tokenize_line("echo \"open").is_err());
        assert_eq!(tokenize_line("   "), Ok(Vec::new()));
    }

    #[test]
    fn unterminated_quote_is_reported() {
        let processor = ConsoleCommandProcessor::new();
        let mut console = ConsoleState::default();
        submit(&mut console, "echo \"oops");
        processor.process_pending_lines(&mut console);
        assert_eq!(
            output_after_echo(&console),
            vec!["error: unterminated quoted string. usage: help"]
        );
    }
}
