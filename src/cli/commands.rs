//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{Script, TreeView};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::Root;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show) => _show(&container(cli)?),
        Some(Commands::Run { script, ids }) => _run(&container(cli)?, script, *ids),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "no command given, try 'seltree --help'".into(),
        )),
    }
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.config.as_deref())?;
    Ok(ServiceContainer::new(settings)?)
}

fn print_tree(container: &ServiceContainer, root: &Root) {
    output::info(&root.to_tree_view(&container.settings.render));
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer) -> CliResult<()> {
    print_tree(container, &container.selection.snapshot());
    Ok(())
}

#[instrument(skip(container))]
fn _run(container: &ServiceContainer, path: &Path, ids_only: bool) -> CliResult<()> {
    if !container.fs.exists(path) {
        return Err(CliError::InvalidArgs(format!(
            "script not found: {}",
            path.display()
        )));
    }
    let content = container
        .fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read script {}", path.display()), e))?;
    let script = Script::parse(&content)?;
    debug!("running {} steps from {}", script.len(), path.display());

    let root = script.run(&container.selection)?;

    if ids_only {
        for id in root.checked_companies() {
            output::info(&format!("company {}", id));
        }
        for id in root.checked_environments() {
            output::info(&format!("environment {}", id));
        }
    } else {
        print_tree(container, &root);
        output::success(&format!("applied {} steps", script.len()));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Global config");
            match global_config_path() {
                Some(p) if p.exists() => output::detail(&p.display()),
                Some(p) => output::detail(&format!("{} (not present)", p.display())),
                None => output::detail("no config directory on this platform"),
            }
            if let Some(explicit) = &cli.config {
                output::header("Explicit config");
                output::detail(&explicit.display());
            }
        }
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
