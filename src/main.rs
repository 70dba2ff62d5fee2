use std::process::ExitCode;

use log::error;
use vm_simulator::{
    build_simulator,
    meta_commands::{handle_meta_command, MetaCommand, HELP},
    repl::REPL,
    Command, SimulatorConfig, SimulatorError,
};

fn run() -> Result<(), SimulatorError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulatorConfig::from_file(path)?,
        None => SimulatorConfig::default(),
    };
    let mut vm = build_simulator(&config)?;
    println!(
        "---- {} bytes of memory, {} bytes of backing store, {}-byte pages ----",
        config.memory_size, config.store_size, config.vm.page_size
    );

    let repl = REPL::new("vm> ");
    while let Some(line) = repl.read_line()? {
        if line.is_empty() {
            continue;
        }
        if line.starts_with('.') {
            match handle_meta_command(&line) {
                Ok(MetaCommand::Exit) => break,
                Ok(MetaCommand::Help) => println!("{}", HELP),
                Err(_) => println!("Unrecognized command '{}'", line),
            }
            continue;
        }
        match line.parse::<Command>().and_then(|command| command.execute(&mut vm)) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => println!("{}", output.trim_end()),
            Err(err) => println!("error: {}", err),
        }
    }

    vm.flush_all()?;
    println!("{}", vm.statistics());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
