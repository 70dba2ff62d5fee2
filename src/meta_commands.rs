#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Help,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommandError {
    UnrecognizedCommand,
}

pub const HELP: &str = "\
read <addr>            read one byte
write <addr> <value>   write one byte
memory                 dump main memory
disk                   dump the backing store
flush                  write resident pages back
stats                  page faults and bytes transferred
events                 show and clear recorded events
.help                  this text
.exit                  flush and quit
addresses and values take decimal, 0x hex or 0b binary";

pub fn handle_meta_command(input: &str) -> Result<MetaCommand, MetaCommandError> {
    match input {
        ".exit" => Ok(MetaCommand::Exit),
        ".help" => Ok(MetaCommand::Help),
        _ => Err(MetaCommandError::UnrecognizedCommand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized() {
        assert_eq!(handle_meta_command(".exit"), Ok(MetaCommand::Exit));
        assert_eq!(handle_meta_command(".help"), Ok(MetaCommand::Help));
        assert_eq!(
            handle_meta_command(".quit"),
            Err(MetaCommandError::UnrecognizedCommand)
        );
    }
}
