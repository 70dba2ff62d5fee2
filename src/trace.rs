use std::str::FromStr;

use vm_manager::{BackingStore, MainMemory, VirtualMemoryManager};

use crate::SimulatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Read { address: u32 },
    Write { address: u32, value: u8 },
    Memory,
    Disk,
    Flush,
    Stats,
    Events,
}

/// Decimal, `0x` hexadecimal or `0b` binary.
fn parse_number(token: &str) -> Result<u32, SimulatorError> {
    let parsed = if let Some(hex) = token.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = token.strip_prefix("0b") {
        u32::from_str_radix(bin, 2)
    } else {
        token.parse()
    };
    parsed.map_err(|_| SimulatorError::Parse(format!("invalid number {:?}", token)))
}

impl FromStr for Command {
    type Err = SimulatorError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let command = match tokens.as_slice() {
            ["read" | "r", address] => Command::Read {
                address: parse_number(address)?,
            },
            ["write" | "w", address, value] => {
                let value = parse_number(value)?;
                Command::Write {
                    address: parse_number(address)?,
                    value: u8::try_from(value).map_err(|_| {
                        SimulatorError::Parse(format!("value {} does not fit in a byte", value))
                    })?,
                }
            }
            ["memory"] => Command::Memory,
            ["disk"] => Command::Disk,
            ["flush"] => Command::Flush,
            ["stats"] => Command::Stats,
            ["events"] => Command::Events,
            _ => {
                return Err(SimulatorError::Parse(format!(
                    "unrecognized command {:?}",
                    line.trim()
                )))
            }
        };
        Ok(command)
    }
}

impl Command {
    /// Runs the command and returns what should be shown to the user.
    pub fn execute<M: MainMemory, D: BackingStore>(
        self,
        vm: &mut VirtualMemoryManager<M, D>,
    ) -> Result<String, SimulatorError> {
        let output = match self {
            Command::Read { address } => {
                let value = vm.read_byte(address)?;
                format!("{} --> {}", address, value)
            }
            Command::Write { address, value } => {
                vm.write_byte(address, value)?;
                format!("{} <-- {}", address, value)
            }
            Command::Memory => vm.dump_memory()?.to_string(),
            Command::Disk => vm.dump_backing_store()?.to_string(),
            Command::Flush => {
                vm.flush_all()?;
                String::from("flushed")
            }
            Command::Stats => vm.statistics().to_string(),
            Command::Events => vm
                .take_events()
                .iter()
                .map(|event| event.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        };
        Ok(output)
    }
}

/// Runs a script of commands, one per line. Blank lines and lines starting
/// with `#` are skipped. Stops at the first error.
pub fn run_trace<M: MainMemory, D: BackingStore>(
    vm: &mut VirtualMemoryManager<M, D>,
    script: &str,
) -> Result<Vec<String>, SimulatorError> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.parse::<Command>()?.execute(vm))
        .collect()
}
