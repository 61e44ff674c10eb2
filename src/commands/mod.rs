//! Command handlers. Each returns the process exit code.

pub mod generate;
pub mod query;
mod solution;
pub mod validate;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::ui::context::UiContext;

pub fn dispatch(cli: &Cli, ui: &UiContext) -> Result<i32> {
    let solution = cli.solution.as_deref();
    match &cli.command {
        Commands::ValidateIndex { full } => {
            validate::cmd_validate_index(solution, *full, cli.strict, ui)
        }
        Commands::RefreshGenerate { full } => {
            generate::cmd_refresh_generate(solution, *full, cli.strict, ui)
        }
        Commands::Lookup { locator } => query::cmd_lookup(solution, locator, ui),
        Commands::Dependents {
            locator,
            transitive,
        } => query::cmd_dependents(solution, locator, *transitive, ui),
        Commands::Dependencies { locator } => query::cmd_dependencies(solution, locator, ui),
        Commands::List { layer } => query::cmd_list(solution, *layer, ui),
        Commands::CheckLayer { layer } => query::cmd_check_layer(solution, *layer, ui),
        Commands::Resolve { reference, from } => {
            query::cmd_resolve(solution, reference, from, ui)
        }
    }
}
