//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::{Difficulty, SortOrder, Tag};

/// Browse the learning content: topic trees, curricula, issues and cohorts
#[derive(Parser, Debug)]
#[command(name = "learnpath")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Content directory (default: from config, then ./content)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub content_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Navigate the topic tree
    Topics {
        #[command(subcommand)]
        command: TopicCommands,
    },

    /// Browse curated resources
    Curricula {
        #[command(subcommand)]
        command: CurriculumCommands,
    },

    /// Browse open-source issues
    Issues {
        #[command(subcommand)]
        command: IssueCommands,
    },

    /// Cohort schedule
    Cohort {
        #[command(subcommand)]
        command: CohortCommands,
    },

    /// Dismissible banners
    Banner {
        #[command(subcommand)]
        command: BannerCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum TopicCommands {
    /// Show the topic hierarchy as tree
    Tree,

    /// List all topics in reading order
    Order,

    /// Show one topic with breadcrumbs and previous/next links
    Show {
        /// Topic slug
        slug: String,
    },
}

/// Facets shared by curricula and issues
#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive text search in title and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Difficulty: easy, medium, hard
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Sort: relevance, newest, oldest (default: from config)
    #[arg(long)]
    pub sort: Option<SortOrder>,
}

#[derive(Subcommand, Debug)]
pub enum CurriculumCommands {
    /// List resources matching the filters
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Tag to include (repeatable, any match)
        #[arg(short, long = "tag")]
        tags: Vec<Tag>,
    },
}

#[derive(Subcommand, Debug)]
pub enum IssueCommands {
    /// List issues matching the filters
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Label to include (repeatable, any match)
        #[arg(short, long = "label")]
        labels: Vec<String>,

        /// Programming language
        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CohortCommands {
    /// Show progress and the next call
    Status {
        /// Cohort name (default: all)
        #[arg(short, long)]
        name: Option<String>,

        /// Evaluate at this instant (RFC3339) instead of now
        #[arg(long)]
        at: Option<chrono::DateTime<chrono::Utc>>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BannerCommands {
    /// Show whether a banner was dismissed
    Status {
        /// Banner id
        id: String,
    },

    /// Dismiss a banner
    Dismiss {
        /// Banner id
        id: String,
    },

    /// Show a dismissed banner again
    Reset {
        /// Banner id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
