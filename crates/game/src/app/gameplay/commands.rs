use engine::{ConsoleCommandDesc, SceneConsoleCommand};

use super::robot::Direction;

const COMMANDS: [ConsoleCommandDesc; 9] = [
    ConsoleCommandDesc {
        name: "size",
        help: "Set the board size and rebuild when valid",
        arg_schema: "<n>",
    },
    ConsoleCommandDesc {
        name: "reset",
        help: "Rebuild the board at the current size setting",
        arg_schema: "",
    },
    ConsoleCommandDesc {
        name: "swap",
        help: "Hand the turn to the other robot",
        arg_schema: "",
    },
    ConsoleCommandDesc {
        name: "move",
        help: "Move the active robot one row down",
        arg_schema: "<left|down|right>",
    },
    ConsoleCommandDesc {
        name: "auto",
        help: "Play both robots greedily to the end",
        arg_schema: "",
    },
    ConsoleCommandDesc {
        name: "step",
        help: "Advance autoplay by one move",
        arg_schema: "",
    },
    ConsoleCommandDesc {
        name: "stop",
        help: "Cancel a running autoplay",
        arg_schema: "",
    },
    ConsoleCommandDesc {
        name: "seed",
        help: "Reseed the board generator and rebuild",
        arg_schema: "<u64>",
    },
    ConsoleCommandDesc {
        name: "dump",
        help: "Print the game state as JSON",
        arg_schema: "",
    },
];

pub(crate) fn console_command_descs() -> Vec<ConsoleCommandDesc> {
    COMMANDS.to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GameCommand {
    /// Raw text; the size setting keeps whatever was typed.
    Size(String),
    Reset,
    Swap,
    Move(Direction),
    Auto,
    Step,
    Stop,
    Seed(u64),
    Dump,
}

impl GameCommand {
    pub(crate) fn parse(command: &SceneConsoleCommand) -> Result<Self, String> {
        let args = command.args.as_slice();
        match command.name.to_ascii_lowercase().as_str() {
            "size" => Ok(GameCommand::Size(single_arg("size", args)?.to_string())),
            "reset" => no_args("reset", args).map(|()| GameCommand::Reset),
            "swap" => no_args("swap", args).map(|()| GameCommand::Swap),
            "move" => {
                let raw = single_arg("move", args)?;
                Direction::parse(raw).map(GameCommand::Move).ok_or_else(|| {
                    format!("unknown direction '{raw}'. expected left, down or right")
                })
            }
            "auto" => no_args("auto", args).map(|()| GameCommand::Auto),
            "step" => no_args("step", args).map(|()| GameCommand::Step),
            "stop" => no_args("stop", args).map(|()| GameCommand::Stop),
            "seed" => {
                let raw = single_arg("seed", args)?;
                raw.parse::<u64>()
                    .map(GameCommand::Seed)
                    .map_err(|_| format!("seed '{raw}' is not an unsigned integer"))
            }
            "dump" => no_args("dump", args).map(|()| GameCommand::Dump),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

fn single_arg<'a>(name: &str, args: &'a [String]) -> Result<&'a str, String> {
    match args {
        [arg] => Ok(arg.as_str()),
        [] => Err(format!("{name}: missing argument")),
        _ => Err(format!("{name}: expected 1 argument, got {}", args.len())),
    }
}

fn no_args(name: &str, args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("{name}: expected no arguments, got {}", args.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, args: &[&str]) -> Result<GameCommand, String> {
        GameCommand::parse(&SceneConsoleCommand::new(
            name,
            args.iter().map(|arg| arg.to_string()).collect(),
        ))
    }

    #[test]
    fn every_descriptor_parses() {
        for desc in console_command_descs() {
            let args: Vec<&str> = match desc.name {
                "size" => vec!["4"],
                "move" => vec!["down"],
                "seed" => vec!["7"],
                _ => Vec::new(),
            };
            assert!(parse(desc.name, &args).is_ok(), "command={}", desc.name);
        }
    }

    #[test]
    fn size_keeps_raw_text_for_the_scene_to_validate() {
        assert_eq!(parse("size", &["abc"]), Ok(GameCommand::Size("abc".to_string())));
        assert!(parse("size", &[]).is_err());
        assert!(parse("size", &["1", "2"]).is_err());
    }

    #[test]
    fn move_parses_direction() {
        assert_eq!(parse("move", &["left"]), Ok(GameCommand::Move(Direction::Left)));
        assert_eq!(parse("MOVE", &["R"]), Ok(GameCommand::Move(Direction::Right)));
        let error = parse("move", &["up"]).expect_err("should fail");
        assert!(error.contains("unknown direction 'up'"));
    }

    #[test]
    fn seed_requires_unsigned_integer() {
        assert_eq!(parse("seed", &["42"]), Ok(GameCommand::Seed(42)));
        assert!(parse("seed", &["-1"]).is_err());
        assert!(parse("seed", &["x"]).is_err());
    }

    #[test]
    fn argument_free_commands_reject_extras() {
        assert_eq!(parse("swap", &[]), Ok(GameCommand::Swap));
        assert_eq!(
            parse("reset", &["now"]),
            Err("reset: expected no arguments, got 1".to_string())
        );
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(parse("fly", &[]).is_err());
    }
}
