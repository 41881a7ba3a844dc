//! Command dispatch: maps parsed arguments onto services and prints results.

use std::io;
use std::path::Path;

use chrono::Utc;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{
    BannerCommands, Cli, CohortCommands, Commands, ConfigCommands, CurriculumCommands,
    FilterArgs, IssueCommands, TopicCommands,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{CohortProgress, Countdown, FilterCriteria, SortOrder, Tag, TreeDisplay};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given (see learnpath --help)".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            completion(*shell);
            Ok(())
        }
        Commands::Config { command } => config(command, cli.content_dir.as_deref()),
        _ => {
            let settings = Settings::load(cli.content_dir.as_deref())?;
            let container = ServiceContainer::new(settings);
            dispatch(&container, command)
        }
    }
}

fn dispatch(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Topics { command } => topics(container, command),
        Commands::Curricula { command } => curricula(container, command),
        Commands::Issues { command } => issues(container, command),
        Commands::Cohort { command } => cohort(container, command),
        Commands::Banner { command } => banner(container, command),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[instrument(level = "debug", skip(container))]
fn topics(container: &ServiceContainer, command: &TopicCommands) -> CliResult<()> {
    let forest = container
        .content
        .build_forest(&container.settings.topics_path())?;

    match command {
        TopicCommands::Tree => {
            for tree in forest.to_tree_string() {
                output::info(&tree);
            }
        }
        TopicCommands::Order => {
            for (position, link) in forest.reading_order().iter().enumerate() {
                output::info(&format!("{:>3}. {}", position + 1, link));
            }
        }
        TopicCommands::Show { slug } => {
            let page = container.content.page(&forest, slug)?;
            output::header(&page.link.title);
            output::muted(&page.breadcrumbs.iter().map(|l| &l.title).join(" › "));
            if !page.body.trim().is_empty() {
                output::info("");
                output::info(page.body.trim_end());
                output::info("");
            }
            for child in &page.children {
                output::detail(&format!("- {child}"));
            }
            if let Some(previous) = &page.navigation.previous {
                output::action("previous", previous);
            }
            if let Some(next) = &page.navigation.next {
                output::action("next", next);
            }
        }
    }
    Ok(())
}

fn base_criteria(filter: &FilterArgs, default_sort: SortOrder) -> FilterCriteria {
    FilterCriteria {
        search: filter.search.clone(),
        difficulty: filter.difficulty.map(|d| d.as_str().to_string()),
        sort: filter.sort.unwrap_or(default_sort),
        ..FilterCriteria::default()
    }
}

fn curricula(container: &ServiceContainer, command: &CurriculumCommands) -> CliResult<()> {
    let CurriculumCommands::List { filter, tags } = command;
    let criteria = FilterCriteria {
        tags: tags.iter().map(|t| t.as_str().to_string()).collect(),
        ..base_criteria(filter, container.settings.default_sort)
    };

    let items = container
        .catalog
        .curricula(&container.settings.curricula_path(), &criteria)?;
    if items.is_empty() {
        output::muted(&"no matching resources");
    }
    for item in items {
        output::header(&item.title);
        let tags = item.tags.iter().map(Tag::as_str).join(", ");
        let difficulty = item.difficulty.map(|d| d.as_str()).unwrap_or("-");
        output::detail(&format!("{} [{}] {}", item.slug, difficulty, tags));
        if let Some(url) = &item.url {
            output::muted(url);
        }
    }
    Ok(())
}

fn issues(container: &ServiceContainer, command: &IssueCommands) -> CliResult<()> {
    let IssueCommands::List {
        filter,
        labels,
        language,
    } = command;
    let criteria = FilterCriteria {
        tags: labels.iter().cloned().collect(),
        language: language.clone(),
        ..base_criteria(filter, container.settings.default_sort)
    };

    let issues = container
        .catalog
        .issues(&container.settings.issues_path(), &criteria)?;
    if issues.is_empty() {
        output::muted(&"no matching issues");
    }
    for issue in issues {
        output::header(&format!("{} #{}", issue.repository, issue.id));
        output::detail(&issue.title);
        let facets = [
            issue.language.as_deref(),
            issue.difficulty.map(|d| d.as_str()),
        ]
        .into_iter()
        .flatten()
        .chain(issue.labels.iter().map(String::as_str))
        .join(", ");
        if !facets.is_empty() {
            output::muted(&facets);
        }
    }
    Ok(())
}

fn cohort(container: &ServiceContainer, command: &CohortCommands) -> CliResult<()> {
    let CohortCommands::Status { name, at } = command;
    let now = at.unwrap_or_else(Utc::now);

    let statuses =
        container
            .cohorts
            .status(&container.settings.cohorts_path(), name.as_deref(), now)?;
    for status in statuses {
        output::header(&status.cohort.name);
        match status.progress {
            CohortProgress::NotStarted { starts_in } => {
                output::detail(&format!("starts in {starts_in}"));
            }
            CohortProgress::InProgress {
                week,
                total_weeks,
                percent,
            } => {
                output::detail(&format!("week {week} of {total_weeks} ({percent:.0}%)"));
            }
            CohortProgress::Finished => output::detail(&"finished"),
        }
        match status.next_call {
            Some(call) if call.is_live(now) => output::action("call", &"live now"),
            Some(call) => output::action(
                "next call",
                &format!(
                    "{} (in {})",
                    call.starts_at.format("%a %Y-%m-%d %H:%M UTC"),
                    Countdown::until(call.starts_at, now)
                ),
            ),
            None => output::muted(&"no upcoming calls"),
        }
    }
    Ok(())
}

fn banner(container: &ServiceContainer, command: &BannerCommands) -> CliResult<()> {
    match command {
        BannerCommands::Status { id } => match container.banners.dismissed_at(id)? {
            Some(at) => output::info(&format!("{id}: dismissed at {}", at.to_rfc3339())),
            None => output::info(&format!("{id}: visible")),
        },
        BannerCommands::Dismiss { id } => {
            container.banners.dismiss(id, Utc::now())?;
            output::success(&format!("dismissed {id}"));
        }
        BannerCommands::Reset { id } => {
            container.banners.reset(id)?;
            output::success(&format!("reset {id}"));
        }
    }
    Ok(())
}

fn config(command: &ConfigCommands, content_dir: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(content_dir)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                let settings = Settings::load(content_dir)?;
                local_config_path(&settings.content_dir)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            write_template(&path)?;
            output::success(&format!("created {}", path.display()));
        }
        ConfigCommands::Path => {
            let settings = Settings::load(content_dir)?;
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            output::action("global", &global);
            output::action("local", &local_config_path(&settings.content_dir).display());
            output::action("state", &settings.state_path().display());
        }
    }
    Ok(())
}

fn write_template(path: &Path) -> CliResult<()> {
    debug!("write config template: {}", path.display());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| InfraError::write(path, e))?;
    }
    std::fs::write(path, Settings::template())
        .map_err(|e| InfraError::write(path, e))?;
    Ok(())
}
