//! Command dispatch
//!
//! Every command loads the roster afresh, applies its edit to the in-memory
//! hierarchy and prints the result; nothing is written back.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DomainError, Employee, OrgTree, SuccessionPolicy};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    // these must keep working when a config file is broken
    match command {
        Commands::Completion { shell } => _completion(*shell),
        Commands::Config {
            command: ConfigCommands::Path,
        } => _config_path(&RealFileSystem, &project_dir(cli)?),
        command => {
            let container = build_container(cli)?;
            dispatch(&container, cli, command)
        }
    }
}

fn dispatch(container: &ServiceContainer, cli: &Cli, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Completion { shell } => _completion(*shell),
        Commands::Config { command } => _config(container, &project_dir(cli)?, command),
        Commands::Show => {
            let tree = load_tree(container, cli)?;
            output::info(&tree);
            Ok(())
        }
        Commands::Hire {
            name,
            boss,
            title,
            salary,
        } => _hire(container, cli, name, boss, title, salary),
        Commands::Fire { name } => _fire(container, cli, name),
        Commands::Promote { name } => _promote(container, cli, name),
        Commands::Demote {
            employee,
            subordinate,
        } => _demote(container, cli, employee, subordinate),
        Commands::Boss { name } => _boss(container, cli, name),
        Commands::Subordinates { name } => _subordinates(container, cli, name),
        Commands::Lowest => _lowest(container, cli),
        Commands::Run { script } => _run(container, cli, script),
        Commands::Check => _check(container, cli),
    }
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let dir = project_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(seed) = cli.seed {
        // a seed only makes sense for random succession
        settings.succession = SuccessionPolicy::Random;
        settings.succession_seed = Some(seed);
    }
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

fn load_tree(container: &ServiceContainer, cli: &Cli) -> CliResult<OrgTree> {
    Ok(container.org_service.load_tree(cli.roster.as_deref())?)
}

fn print_result(tree: &OrgTree, message: &str) {
    output::success(message);
    println!();
    output::info(tree);
}

#[instrument(skip(container, cli))]
fn _hire(
    container: &ServiceContainer,
    cli: &Cli,
    name: &str,
    boss: &str,
    title: &str,
    salary: &str,
) -> CliResult<()> {
    let mut tree = load_tree(container, cli)?;
    let message = tree.hire(Employee::new(name, title, salary, Some(boss)), boss)?;
    print_result(&tree, &message);
    Ok(())
}

#[instrument(skip(container, cli))]
fn _fire(container: &ServiceContainer, cli: &Cli, name: &str) -> CliResult<()> {
    let mut tree = load_tree(container, cli)?;
    let mut picker = container.org_service.succession();
    let firing = tree.fire(name, picker.as_mut())?;
    print_result(&tree, &firing.to_string());
    Ok(())
}

#[instrument(skip(container, cli))]
fn _promote(container: &ServiceContainer, cli: &Cli, name: &str) -> CliResult<()> {
    let mut tree = load_tree(container, cli)?;
    let promotion = tree.promote(name)?;
    print_result(&tree, &promotion.to_string());
    Ok(())
}

#[instrument(skip(container, cli))]
fn _demote(
    container: &ServiceContainer,
    cli: &Cli,
    employee: &str,
    subordinate: &str,
) -> CliResult<()> {
    let mut tree = load_tree(container, cli)?;
    let demotion = tree.demote(employee, subordinate)?;
    print_result(&tree, &demotion.to_string());
    Ok(())
}

#[instrument(skip(container, cli))]
fn _boss(container: &ServiceContainer, cli: &Cli, name: &str) -> CliResult<()> {
    let tree = load_tree(container, cli)?;
    if tree.find_node(name).is_none() {
        return Err(DomainError::NoSuchEmployee(name.to_string()).into());
    }
    match tree.find_boss(name) {
        Some(boss) => output::action(&format!("{name}'s boss"), tree.name(boss)),
        None => output::info(&format!("{name} is at the top of the hierarchy")),
    }
    Ok(())
}

#[instrument(skip(container, cli))]
fn _subordinates(container: &ServiceContainer, cli: &Cli, name: &str) -> CliResult<()> {
    let tree = load_tree(container, cli)?;
    let names = tree
        .subordinate_names(name)
        .ok_or_else(|| DomainError::NoSuchEmployee(name.to_string()))?;
    if names.is_empty() {
        output::info(&format!("{name} has no subordinates"));
    } else {
        output::action(&format!("{name}'s subordinates"), &names.iter().join(", "));
    }
    Ok(())
}

#[instrument(skip(container, cli))]
fn _lowest(container: &ServiceContainer, cli: &Cli) -> CliResult<()> {
    let tree = load_tree(container, cli)?;
    let Some((idx, depth)) = tree.lowest_employee() else {
        return Ok(());
    };
    let name = tree.name(idx);
    output::action("Lowest level employee", &format!("{name} (depth {depth})"));
    if let Some(path) = tree.path_to(name) {
        output::detail(&path.into_iter().map(|i| tree.name(i)).join(" -> "));
    }
    Ok(())
}

#[instrument(skip(container, cli))]
fn _run(container: &ServiceContainer, cli: &Cli, script_path: &Path) -> CliResult<()> {
    let service = &container.org_service;
    let mut tree = load_tree(container, cli)?;
    let script = service.load_script(script_path)?;
    if script.steps.is_empty() {
        output::warning(&format!("{} has no steps", script_path.display()));
    }
    let mut picker = service.succession();
    output::header(&format!("Running {}", script_path.display()));
    let report = service.run_script(&mut tree, &script, picker.as_mut())?;
    for line in &report {
        output::success(line);
    }
    println!();
    output::info(&tree);
    Ok(())
}

#[instrument(skip(container, cli))]
fn _check(container: &ServiceContainer, cli: &Cli) -> CliResult<()> {
    let tree = load_tree(container, cli)?;
    tree.check_invariants()?;
    output::success(&format!(
        "{} employees, {} levels, {} without reports",
        tree.len(),
        tree.depth(),
        tree.leaf_names().len()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn _config(container: &ServiceContainer, dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => _config_path(container.fs.as_ref(), dir),
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn _config_path(fs: &dyn FileSystem, dir: &Path) -> CliResult<()> {
    let local = local_config_path(dir);
    match global_config_path() {
        Some(global) => output::action(
            "global",
            &format!("{} ({})", global.display(), presence(fs, &global)),
        ),
        None => output::action("global", "unavailable (no home directory)"),
    }
    output::action(
        "local",
        &format!("{} ({})", local.display(), presence(fs, &local)),
    );
    Ok(())
}

fn presence(fs: &dyn FileSystem, path: &Path) -> &'static str {
    if fs.exists(path) {
        "exists"
    } else {
        "not found"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn broken_config_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(local_config_path(dir.path()), "succession = [").unwrap();
        dir
    }

    fn run(dir: &Path, args: &[&str]) -> CliResult<()> {
        let mut argv = vec!["orgtree", "-C", dir.to_str().unwrap()];
        argv.extend_from_slice(args);
        execute_command(&Cli::parse_from(argv))
    }

    #[test]
    fn given_broken_config_when_showing_config_path_then_still_succeeds() {
        let dir = broken_config_dir();
        assert!(run(dir.path(), &["config", "path"]).is_ok());
    }

    #[test]
    fn given_broken_config_when_generating_completion_then_still_succeeds() {
        let dir = broken_config_dir();
        assert!(run(dir.path(), &["completion", "bash"]).is_ok());
    }

    #[test]
    fn given_broken_config_when_showing_tree_then_fails_with_config_error() {
        let dir = broken_config_dir();

        let err = run(dir.path(), &["show"]).unwrap_err();

        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }

    #[test]
    fn given_blank_name_when_hiring_then_rejects_as_data_error() {
        let dir = TempDir::new().unwrap();
        let roster = dir.path().join("employees.json");
        fs::write(&roster, r#"{ "employees": [ { "name": "sarah" } ] }"#).unwrap();

        let err = run(
            dir.path(),
            &["-r", roster.to_str().unwrap(), "hire", "  ", "Sarah"],
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }
}
