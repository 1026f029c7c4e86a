//! Command dispatch

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::Shell;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::{NetworkService, NetworkSnapshot};
use crate::application::ApplicationError;
use crate::cli::args::{BuildArgs, Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{AuditReport, EntryFilter, IntegrityReport, TreeNode};
use crate::infrastructure::traits::RealFileSystem;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let command = match &cli.command {
        // Completions must work even with a broken config
        Some(Commands::Completion { shell }) => return cmd_completion(*shell),
        Some(command) => command,
        None => {
            return Err(CliError::Usage(
                "no command given, see --help".to_string(),
            ))
        }
    };

    let settings = Settings::load(cli.config.as_deref())?;
    if cli.no_color || !settings.color {
        colored::control::set_override(false);
    }

    match command {
        Commands::Tree { build, json, stats } => cmd_tree(&settings, build, *json, *stats),
        Commands::Filter {
            build,
            search,
            regex,
            qualifies,
            case_sensitive,
            json,
        } => {
            let filter = entry_filter(
                &settings,
                search.as_deref(),
                regex.as_deref(),
                *qualifies,
                *case_sensitive,
            )?;
            cmd_filter(&settings, build, &filter, *json)
        }
        Commands::Audit { build, id, json } => cmd_audit(&settings, build, id.as_deref(), *json),
        Commands::Check { file, json } => cmd_check(&settings, file, *json),
        Commands::Branches { build } => cmd_branches(&settings, build),
        Commands::Leaves { build } => cmd_leaves(&settings, build),
        Commands::Config { command } => cmd_config(&settings, command, cli),
        Commands::Completion { shell } => cmd_completion(*shell),
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}

/// Settings with command line overrides applied.
fn effective_settings(settings: &Settings, build: &BuildArgs) -> Settings {
    let mut effective = settings.clone();
    if let Some(max_depth) = build.max_depth {
        effective.max_depth = max_depth;
    }
    if let Some(policy) = build.depth_policy {
        effective.depth_policy = policy;
    }
    effective
}

fn network_service(settings: &Settings, file: &Path) -> NetworkService {
    let container = ServiceContainer::with_deps(settings.clone(), Arc::new(RealFileSystem));
    container.network_service(file)
}

fn snapshot(settings: &Settings, build: &BuildArgs) -> CliResult<NetworkSnapshot> {
    let service = network_service(&effective_settings(settings, build), &build.file);
    debug!(
        "max_depth={} depth_policy={}",
        service.builder().max_depth(),
        service.builder().policy()
    );
    Ok(service.snapshot()?)
}

fn entry_filter(
    settings: &Settings,
    search: Option<&str>,
    regex: Option<&str>,
    qualifies: Option<bool>,
    case_sensitive: bool,
) -> CliResult<EntryFilter> {
    let mut filter = EntryFilter::new().qualifies(qualifies);
    if let Some(pattern) = regex {
        filter = filter.pattern(pattern).map_err(ApplicationError::from)?;
    } else if let Some(text) = search {
        filter = if case_sensitive || settings.search_case_sensitive {
            filter.search_case_sensitive(text)
        } else {
            filter.search(text)
        };
    }
    if filter.is_empty() {
        return Err(CliError::InvalidArgs(
            "give at least one of --search, --regex, --qualifies".to_string(),
        ));
    }
    Ok(filter)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        InfraError::io("serialize output", std::io::Error::other(e))
    })?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text).map_err(|e| InfraError::io("write stdout", e))?;
    Ok(())
}

fn print_forest(forest: &[TreeNode]) {
    if forest.is_empty() {
        output::warning("no entries to show");
        return;
    }
    for root in forest {
        output::info(root.to_tree_string());
    }
}

#[instrument(skip(settings))]
fn cmd_tree(settings: &Settings, build: &BuildArgs, json: bool, stats: bool) -> CliResult<()> {
    let snapshot = snapshot(settings, build)?;
    if json {
        return print_json(&snapshot.forest);
    }
    print_forest(&snapshot.forest);
    if stats {
        let s = snapshot.stats();
        output::header("Stats");
        output::detail(format!("roots:     {}", s.roots));
        output::detail(format!("nodes:     {} of {} entries", s.nodes, snapshot.entries.len()));
        output::detail(format!("leaves:    {}", s.leaves));
        output::detail(format!("max depth: {}", s.max_depth));
    }
    Ok(())
}

#[instrument(skip(settings, filter))]
fn cmd_filter(
    settings: &Settings,
    build: &BuildArgs,
    filter: &EntryFilter,
    json: bool,
) -> CliResult<()> {
    let snapshot = snapshot(settings, build)?;
    let filtered = snapshot.filtered(filter);
    if json {
        return print_json(&filtered);
    }
    print_forest(&filtered);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_audit(settings: &Settings, build: &BuildArgs, id: Option<&str>, json: bool) -> CliResult<()> {
    let snapshot = snapshot(settings, build)?;
    let reports = match id {
        Some(id) => vec![snapshot.audit(id)],
        None => snapshot.audit_roots(),
    };

    if json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            print_audit(report);
        }
    }

    let mismatched = reports.iter().filter(|r| r.mismatch).map(|r| &r.target_id).join(", ");
    if mismatched.is_empty() {
        Ok(())
    } else {
        Err(CliError::Mismatch(format!("downline mismatch: {}", mismatched)))
    }
}

fn print_audit(report: &AuditReport) {
    output::header(format!("Audit {}", report.target_id));
    if !report.found {
        output::failure("entry not found");
        return;
    }
    let line = |label: &str, relation: usize, tree: usize| {
        let msg = format!("{:<7} relation {:>4}  tree {:>4}", label, relation, tree);
        if relation == tree {
            output::success_detail(msg);
        } else {
            output::failure(msg);
        }
    };
    line("direct", report.direct_by_relation, report.direct_by_tree);
    line("total", report.total_by_relation, report.total_by_tree);
    if !report.direct_list.is_empty() {
        output::detail(format!(
            "direct referrals: {}",
            report.direct_list.iter().map(|e| e.id.as_str()).join(", ")
        ));
    }
}

#[instrument(skip(settings))]
fn cmd_check(settings: &Settings, file: &Path, json: bool) -> CliResult<()> {
    let report = network_service(settings, file).integrity()?;
    if json {
        print_json(&report)?;
    } else {
        print_integrity(&report);
    }
    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::DataIssues(format!(
            "{} data quality issues found",
            report.issue_count()
        )))
    }
}

fn print_integrity(report: &IntegrityReport) {
    output::header(format!("Checked {} entries", report.entries));
    let section = |label: &str, items: Vec<String>| {
        if items.is_empty() {
            output::success_detail(format!("{}: none", label));
        } else {
            output::failure(format!("{}: {}", label, items.join(", ")));
        }
    };
    section("duplicate ids", report.duplicate_ids.clone());
    section("self referrals", report.self_referrals.clone());
    section(
        "dangling referrers",
        report
            .dangling_referrers
            .iter()
            .map(|(id, referrer)| format!("{} -> {}", id, referrer))
            .collect(),
    );
    section("cycle members", report.cycle_members.clone());
    section("missing levels", report.missing_levels.clone());
}

#[instrument(skip(settings))]
fn cmd_branches(settings: &Settings, build: &BuildArgs) -> CliResult<()> {
    let snapshot = snapshot(settings, build)?;
    output::info(format!("Found {} trees:\n", snapshot.forest.len()));
    for root in &snapshot.forest {
        output::header(format!("Tree Root: {}", root.id()));
        for branch in root.branches() {
            output::detail(branch.join(" -> "));
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_leaves(settings: &Settings, build: &BuildArgs) -> CliResult<()> {
    let snapshot = snapshot(settings, build)?;
    for root in &snapshot.forest {
        for leaf in root.leaf_ids() {
            output::info(leaf);
        }
    }
    Ok(())
}

fn cmd_config(settings: &Settings, command: &ConfigCommands, cli: &Cli) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not present)" };
                    output::action("global", format!("{}{}", path.display(), state));
                }
                None => output::warning("no config directory for this platform"),
            }
            if let Some(local) = &cli.config {
                output::action("local", local.display());
            }
        }
    }
    Ok(())
}
