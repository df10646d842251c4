//! Command dispatch: each subcommand maps onto the hierarchy service.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{Hierarchy, HierarchyService, TreeStats};
use crate::application::{MemberTree, TreeRender};
use crate::cli::args::{Cli, Commands, Order};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{Placement, Side};

/// Settings from files and environment, with command line flags on top.
pub fn effective_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(field) = &cli.parent_field {
        settings.parent_field = field.clone();
    }
    if let Some(field) = &cli.label_field {
        settings.label_field = field.clone();
    }
    if let Some(start) = cli.start {
        settings.starting_parent_id = start;
    }
    if cli.no_sort {
        settings.sort_first = false;
    }
    if cli.ascend_to_level {
        settings.ascend = "to_level".into();
    }
    Ok(settings)
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = effective_settings(cli)?;
    debug!(?settings, "effective settings");
    let service = HierarchyService::new(settings.record_fields(), settings.build_options()?);

    match command {
        Commands::Build { file } => _build(&service, file),
        Commands::Walk { file, order } => _walk(&service, file, *order),
        Commands::Stats { file, node } => _stats(&service, file, *node),
        Commands::Insert {
            file,
            labels,
            natural,
            at,
        } => {
            let placement = if *natural {
                Placement::Natural
            } else {
                settings.placement()
            };
            _insert(&service, file, labels, placement, *at)
        }
        Commands::LevelSort { file } => _level_sort(&service, file),
        Commands::Config => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        Commands::Completion { .. } => Ok(()),
    }
}

fn print_tree(service: &HierarchyService, tree: &MemberTree) {
    let fields = service.fields();
    output::info(&tree.to_termtree(|record| fields.label(record)));
}

fn load(service: &HierarchyService, file: &Path) -> CliResult<Hierarchy> {
    let hierarchy = service.load(file)?;
    for orphan in &hierarchy.orphans {
        output::warning(&format!(
            "record {} ({}) is not connected to the hierarchy",
            orphan.id,
            service.fields().label(orphan)
        ));
    }
    Ok(hierarchy)
}

#[instrument(skip(service))]
fn _build(service: &HierarchyService, file: &Path) -> CliResult<()> {
    let tree = load(service, file)?.tree;
    print_tree(service, &tree);
    Ok(())
}

#[instrument(skip(service))]
fn _walk(service: &HierarchyService, file: &Path, order: Order) -> CliResult<()> {
    let tree = load(service, file)?.tree;
    for label in service.walk(&tree, order.into()) {
        match label {
            Some(label) => output::line(&label),
            None => output::gap(),
        }
    }
    Ok(())
}

#[instrument(skip(service))]
fn _stats(service: &HierarchyService, file: &Path, node: Option<i64>) -> CliResult<()> {
    let tree = load(service, file)?.tree;
    let start = node
        .map(|id| service.node_by_id(&tree, id))
        .transpose()?;
    let TreeStats {
        label,
        size,
        depth,
        height,
        min_height,
        full,
        complete,
        break_label,
    } = service.stats(&tree, start);

    output::header(&label.unwrap_or_else(|| "(empty tree)".to_string()));
    output::action("nodes", &size);
    output::action("depth", &depth);
    output::action("height", &height);
    output::action("min height", &min_height);
    output::action("full", &full);
    output::action("complete", &complete);
    output::action("break node", &break_label.unwrap_or_else(|| "-".to_string()));
    Ok(())
}

#[instrument(skip(service))]
fn _insert(
    service: &HierarchyService,
    file: &Path,
    labels: &[String],
    placement: Placement,
    at: Option<i64>,
) -> CliResult<()> {
    if labels.iter().any(|label| label.trim().is_empty()) {
        return Err(CliError::InvalidArgs("member labels must not be blank".into()));
    }
    let mut hierarchy = load(service, file)?;
    let start = at
        .map(|id| service.node_by_id(&hierarchy.tree, id))
        .transpose()?;

    let placed = service.insert_members(&mut hierarchy, labels, start, placement)?;
    output::header(&format!("placement: {}", placement));
    for insertion in &placed {
        let position = match (&insertion.parent, insertion.side) {
            (Some(parent), Some(Side::Left)) => format!("left of {}", parent),
            (Some(parent), Some(Side::Right)) => format!("right of {}", parent),
            _ => "root".to_string(),
        };
        output::action(&insertion.label, &format!("id {} -> {}", insertion.id, position));
    }
    print_tree(service, &hierarchy.tree);
    Ok(())
}

#[instrument(skip(service))]
fn _level_sort(service: &HierarchyService, file: &Path) -> CliResult<()> {
    let records = service.level_sorted(file)?;
    let line = records
        .iter()
        .map(|record| format!("{}:{}", record.id, service.fields().label(record)))
        .join(" ");
    output::line(&line);
    for record in &records {
        output::detail(&format!("{} <- {}", record.id, record.parent_id));
    }
    Ok(())
}
