//! modeldex CLI - entity index and locator resolution engine
//!
//! Usage: modeldex [OPTIONS] <COMMAND>
//!
//! Commands:
//!   validate-index    Load, validate and commit the index
//!   refresh-generate  Validate, then plan generation for stale entities
//!   lookup            Show one indexed entity
//!   dependents        List entities that reference an entity
//!   list              List indexed entities
//!   check-layer       Check whether a layer root holds entities
//!   resolve           Resolve a reference expression

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod logging;
mod ui;

use cli::Cli;
use ui::context::UiContext;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ui = UiContext::new(cli.json, cli.verbose);

    if let Err(err) = logging::init(cli.verbose, cli.log_format, logging::stderr_color()) {
        eprintln!("{}", err);
    }

    match commands::dispatch(&cli, &ui) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            ui::error::print_error(&err, &ui);
            ExitCode::FAILURE
        }
    }
}
