//! Command parsing and status reporting for the garage shell
//!
//! One command per input line, whitespace-tokenized, case-sensitive keywords.
//! Extra trailing tokens are ignored.

use crate::error::{GarageError, Result};
use crate::garage::Garage;
use crate::validation::VehicleId;
use crate::vehicle::Vehicle;
use std::io::Write;
use tracing::debug;

/// Number of journal entries `history` prints when no count is given
pub const DEFAULT_HISTORY_LINES: usize = 10;

pub const COMMAND_HELP: &str = "\
Here are the commands you can use:
  add_machine <id> <type>        (e.g. add_machine ABC123 Car; type is Bike, Car or Truck)
  unpark_machine <id>            (e.g. unpark_machine ABC123)
  check_availability
  check_full
  locate_machine <id>            (e.g. locate_machine ABC123)
  list_machines                  (Show every parked machine)
  history [n]                    (Show the last n garage events, default 10)
  export                         (Print the garage state as JSON)
  commands                       (Show the list of commands again)
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddMachine { id: String, kind: String },
    UnparkMachine { id: String },
    CheckAvailability,
    CheckFull,
    LocateMachine { id: String },
    ListMachines,
    History { limit: usize },
    Export,
    Commands,
    Quit,
}

/// Whether the shell keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// - `UnknownCommand` for an unrecognized keyword
    /// - `MissingArgument` when a required argument is absent
    /// - `InvalidNumber` when the `history` count is not a number
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(None);
        };

        let mut arg = |command: &'static str, argument: &'static str| {
            tokens
                .next()
                .map(str::to_string)
                .ok_or(GarageError::MissingArgument { command, argument })
        };

        let command = match keyword {
            "add_machine" => {
                let id = arg("add_machine", "id")?;
                let kind = arg("add_machine", "type")?;
                Command::AddMachine { id, kind }
            }
            "unpark_machine" => Command::UnparkMachine {
                id: arg("unpark_machine", "id")?,
            },
            "check_availability" => Command::CheckAvailability,
            "check_full" => Command::CheckFull,
            "locate_machine" => Command::LocateMachine {
                id: arg("locate_machine", "id")?,
            },
            "list_machines" => Command::ListMachines,
            "history" => {
                let limit = match arg("history", "n") {
                    Ok(text) => text
                        .parse::<usize>()
                        .map_err(|_| GarageError::InvalidNumber(text))?,
                    Err(_) => DEFAULT_HISTORY_LINES,
                };
                Command::History { limit }
            }
            "export" => Command::Export,
            "commands" => Command::Commands,
            "quit" => Command::Quit,
            other => return Err(GarageError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }

    /// Run the command against `garage`, writing its status to `out`
    ///
    /// Garage-level failures are reported as status lines; only write
    /// failures are returned as errors.
    pub fn execute<W: Write>(&self, garage: &Garage, out: &mut W) -> Result<Flow> {
        debug!("Executing {:?}", self);

        match self {
            Command::AddMachine { id, kind } => {
                let vehicle = VehicleId::new(id.as_str())
                    .and_then(|id| {
                        garage
                            .parse_category(kind)
                            .map(|category| Vehicle::new(id, category))
                    })
                    .map_err(|err| garage.record_rejection(id, err));
                match vehicle.and_then(|v| garage.park(v)) {
                    Ok(location) => writeln!(
                        out,
                        "Successfully stored machine '{}' on Level {} in slot(s): {}",
                        id,
                        location.level,
                        location.slot_list()
                    )?,
                    Err(err) => writeln!(out, "{}", describe_error(&err))?,
                }
            }
            Command::UnparkMachine { id } => match garage.unpark(id) {
                Ok(location) => writeln!(
                    out,
                    "Machine '{}' has been removed from Level {}.",
                    id, location.level
                )?,
                Err(err) => writeln!(out, "{}", describe_error(&err))?,
            },
            Command::CheckAvailability => {
                writeln!(out, "=== Current Availability ===")?;
                for level in garage.availability() {
                    writeln!(out, "Level {}: {} slot(s) free.", level.level, level.free)?;
                }
            }
            Command::CheckFull => {
                if garage.is_full() {
                    writeln!(out, "The garage is completely full.")?;
                } else {
                    writeln!(out, "The garage still has space available.")?;
                }
            }
            Command::LocateMachine { id } => match garage.locate(id) {
                Ok(parked) => writeln!(
                    out,
                    "Machine '{}' ({}) is on Level {} occupying slot(s): {}",
                    parked.id,
                    parked.category,
                    parked.location.level,
                    parked.location.slot_list()
                )?,
                Err(GarageError::NotFound(_)) => {
                    writeln!(out, "Could not find machine ID {} in the garage.", id)?
                }
                Err(err) => writeln!(out, "{}", describe_error(&err))?,
            },
            Command::ListMachines => {
                let parked = garage.parked();
                if parked.is_empty() {
                    writeln!(out, "The garage is empty.")?;
                }
                for p in parked {
                    writeln!(
                        out,
                        "{} ({}): Level {} slot(s): {}",
                        p.id,
                        p.category,
                        p.location.level,
                        p.location.slot_list()
                    )?;
                }
            }
            Command::History { limit } => {
                let entries = garage.history(*limit);
                if entries.is_empty() {
                    writeln!(out, "No recorded events.")?;
                }
                for entry in entries {
                    writeln!(
                        out,
                        "#{} {} {}",
                        entry.sequence,
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
                        entry.event
                    )?;
                }
            }
            Command::Export => {
                let json = serde_json::to_string_pretty(&garage.snapshot())?;
                writeln!(out, "{}", json)?;
            }
            Command::Commands => writeln!(out, "{}", COMMAND_HELP)?,
            Command::Quit => {
                writeln!(out, "Exiting the Garage System. Have a great day!")?;
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }
}

/// Human-readable status line for a failed request
pub fn describe_error(err: &GarageError) -> String {
    match err {
        GarageError::AlreadyParked(id) => format!("Machine with ID {} is already parked.", id),
        GarageError::NoSuitableSpace { id, .. } => {
            format!("No suitable space found for machine ID: {}.", id)
        }
        GarageError::NotFound(id) => format!("Machine with ID {} not found in the garage.", id),
        GarageError::InconsistentRelease { id, level } => format!(
            "Could not remove machine '{}' from Level {}: garage records are inconsistent.",
            id, level
        ),
        GarageError::UnknownCategory(kind) => {
            format!("Unknown machine type '{}'. Use Bike, Car or Truck.", kind)
        }
        GarageError::UnknownCommand(_) => {
            "Sorry, I don't recognize that command. Type 'commands' for options.".to_string()
        }
        GarageError::MissingArgument { command, argument } => format!(
            "Missing <{}> for {}. Type 'commands' for usage.",
            argument, command
        ),
        other => format!("Error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(garage: &Garage, line: &str) -> String {
        let mut out = Vec::new();
        if let Some(cmd) = Command::parse(line).unwrap() {
            cmd.execute(garage, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("add_machine ABC123 Car").unwrap(),
            Some(Command::AddMachine {
                id: "ABC123".to_string(),
                kind: "Car".to_string()
            })
        );
        assert_eq!(
            Command::parse("  unpark_machine   X  ").unwrap(),
            Some(Command::UnparkMachine { id: "X".to_string() })
        );
        assert_eq!(Command::parse("check_full extra").unwrap(), Some(Command::CheckFull));
        assert_eq!(
            Command::parse("history").unwrap(),
            Some(Command::History {
                limit: DEFAULT_HISTORY_LINES
            })
        );
        assert_eq!(
            Command::parse("history 3").unwrap(),
            Some(Command::History { limit: 3 })
        );
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("Quit"),
            Err(GarageError::UnknownCommand(ref c)) if c == "Quit"
        ));
        assert!(matches!(
            Command::parse("add_machine ABC"),
            Err(GarageError::MissingArgument {
                command: "add_machine",
                argument: "type"
            })
        ));
        assert!(matches!(
            Command::parse("locate_machine"),
            Err(GarageError::MissingArgument { argument: "id", .. })
        ));
        assert!(matches!(
            Command::parse("history many"),
            Err(GarageError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_park_status_lines() {
        let garage = Garage::new(1, 2).unwrap();
        assert_eq!(
            run(&garage, "add_machine A1 Car"),
            "Successfully stored machine 'A1' on Level 0 in slot(s): 0\n"
        );
        assert_eq!(
            run(&garage, "add_machine A1 Car"),
            "Machine with ID A1 is already parked.\n"
        );
        assert_eq!(
            run(&garage, "add_machine B1 Truck"),
            "No suitable space found for machine ID: B1.\n"
        );

        let long_id = "x".repeat(VehicleId::MAX_LENGTH + 1);
        assert!(run(&garage, &format!("add_machine {} Car", long_id))
            .starts_with("Error: Invalid machine ID: identifier too long"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let garage = Garage::new(1, 2).unwrap();
        assert_eq!(
            run(&garage, "add_machine V1 Van"),
            "Unknown machine type 'Van'. Use Bike, Car or Truck.\n"
        );
        assert_eq!(garage.parked_count(), 0);

        let history = run(&garage, "history");
        assert!(history.contains("rejected V1: Unknown machine type: Van"));
    }

    #[test]
    fn test_invalid_id_is_rejected_and_journaled() {
        let garage = Garage::new(1, 2).unwrap();
        let long_id = "X".repeat(VehicleId::MAX_LENGTH + 1);

        let status = run(&garage, &format!("add_machine {} Car", long_id));
        assert!(status.starts_with("Error: Invalid machine ID: identifier too long"));
        assert_eq!(garage.parked_count(), 0);

        let history = garage.history(10);
        assert_eq!(history.len(), 1);
        assert!(matches!(
            history[0].event,
            crate::journal::GarageEvent::Rejected { ref id, .. } if *id == long_id
        ));
    }

    #[test]
    fn test_locate_and_unpark_status_lines() {
        let garage = Garage::new(1, 3).unwrap();
        run(&garage, "add_machine T1 Truck");
        assert_eq!(
            run(&garage, "locate_machine T1"),
            "Machine 'T1' (Truck) is on Level 0 occupying slot(s): 0 1\n"
        );
        assert_eq!(
            run(&garage, "unpark_machine T1"),
            "Machine 'T1' has been removed from Level 0.\n"
        );
        assert_eq!(
            run(&garage, "unpark_machine T1"),
            "Machine with ID T1 not found in the garage.\n"
        );
        assert_eq!(
            run(&garage, "locate_machine T1"),
            "Could not find machine ID T1 in the garage.\n"
        );
    }

    #[test]
    fn test_availability_and_full() {
        let garage = Garage::new(2, 1).unwrap();
        run(&garage, "add_machine X Bike");
        assert_eq!(
            run(&garage, "check_availability"),
            "=== Current Availability ===\nLevel 0: 0 slot(s) free.\nLevel 1: 1 slot(s) free.\n"
        );
        assert_eq!(
            run(&garage, "check_full"),
            "The garage still has space available.\n"
        );
        run(&garage, "add_machine Y Bike");
        assert_eq!(run(&garage, "check_full"), "The garage is completely full.\n");
    }

    #[test]
    fn test_quit_stops() {
        let garage = Garage::new(1, 1).unwrap();
        let mut out = Vec::new();
        let flow = Command::Quit.execute(&garage, &mut out).unwrap();
        assert_eq!(flow, Flow::Quit);

        let flow = Command::CheckFull.execute(&garage, &mut out).unwrap();
        assert_eq!(flow, Flow::Continue);
    }

    #[test]
    fn test_export_is_json() {
        let garage = Garage::new(1, 2).unwrap();
        run(&garage, "add_machine A Car");
        let value: serde_json::Value = serde_json::from_str(&run(&garage, "export")).unwrap();
        assert_eq!(value["free_slots"], 1);
        assert_eq!(value["vehicles"][0]["location"]["slots"][0], 0);
    }

    #[test]
    fn test_list_and_history() {
        let garage = Garage::new(1, 2).unwrap();
        assert_eq!(run(&garage, "list_machines"), "The garage is empty.\n");
        assert_eq!(run(&garage, "history"), "No recorded events.\n");

        run(&garage, "add_machine A Car");
        assert_eq!(run(&garage, "list_machines"), "A (Car): Level 0 slot(s): 0\n");

        let history = run(&garage, "history 1");
        assert!(history.starts_with("#0 "));
        assert!(history.trim_end().ends_with("parked A (Car) at level 0 slot(s) 0"));
    }
}
