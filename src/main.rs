use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

use suggestbox::commands;
use suggestbox::config::{self, Context, LogFormat, DATA_DIR_NAME, DEFAULT_PROJECT};
use suggestbox::i18n::Language;
use suggestbox::models::{Direction, RoadmapStatus};
use suggestbox::roadmap::StatusFilter;
use suggestbox::settings::Theme;
use suggestbox::store::SortOrder;

#[derive(Parser)]
#[command(name = "suggestbox")]
#[command(about = "Submit ideas, vote on them, and follow the roadmap")]
#[command(version)]
struct Cli {
    /// Project slug to work on
    #[arg(long, global = true, env = "SUGGESTBOX_PROJECT", default_value = DEFAULT_PROJECT)]
    project: String,

    /// Data directory (defaults to the nearest .suggestbox directory)
    #[arg(long, global = true, env = "SUGGESTBOX_DIR")]
    data_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize suggestbox in the current directory
    Init {
        /// Reset settings even if already initialized
        #[arg(short, long)]
        force: bool,
    },

    /// List suggestions
    List {
        /// Sort order (votes, recent)
        #[arg(short, long, default_value = "votes")]
        sort: SortOrder,
        /// Number of pages to load
        #[arg(long, conflicts_with = "all")]
        pages: Option<usize>,
        /// Load every page
        #[arg(long)]
        all: bool,
    },

    /// Show suggestion details
    Show {
        /// Suggestion ID
        id: String,
    },

    /// Vote on a suggestion; voting the same way again removes the vote
    Vote {
        /// Suggestion ID
        id: String,
        /// Direction (up, down)
        direction: Direction,
    },

    /// Submit a new suggestion
    Submit {
        /// Suggestion title
        title: String,
        /// Suggestion description
        #[arg(short, long)]
        description: Option<String>,
        /// Private contact for follow-up questions
        #[arg(short, long)]
        contact: Option<String>,
    },

    /// Show the project roadmap
    Roadmap {
        /// Filter by status (all, planned, todo, doing, done)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
    },

    /// Client settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },

    /// Store administration
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Set the display language (bg, en)
    Language { language: Language },
    /// Set the theme (light, dark, system)
    Theme { theme: Theme },
    /// Forget the voter identity
    ResetVoter,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create a project
    Project {
        /// URL-safe project name
        slug: String,
    },
    /// List projects
    Projects,
    /// Add a roadmap item to the current project
    RoadmapAdd {
        /// Item title
        title: String,
        /// Item description
        #[arg(short, long)]
        description: Option<String>,
        /// Status (planned, todo, doing, done)
        #[arg(short, long, default_value = "planned")]
        status: RoadmapStatus,
        /// Position on the roadmap, ascending
        #[arg(short, long, default_value_t = 0)]
        order: i64,
    },
    /// Change the status of a roadmap item
    RoadmapStatus {
        /// Roadmap item ID
        id: String,
        /// New status (planned, todo, doing, done)
        status: RoadmapStatus,
    },
}

fn main() -> Result<()> {
    let Cli {
        project,
        data_dir,
        log_format,
        command,
    } = Cli::parse();
    config::init_logging(log_format);

    let context = || Context::resolve(data_dir.clone(), &project);

    match command {
        Commands::Init { force } => {
            let dir = match &data_dir {
                Some(dir) => dir.clone(),
                None => env::current_dir()?.join(DATA_DIR_NAME),
            };
            commands::init::run(&dir, force)
        }

        Commands::List { sort, pages, all } => {
            let ctx = context()?;
            let db = ctx.open_db()?;
            let settings = ctx.load_settings()?;
            let max_pages = if all { None } else { Some(pages.unwrap_or(1)) };
            commands::list::run(&db, &settings, &ctx.project, sort, max_pages)
        }

        Commands::Show { id } => {
            let ctx = context()?;
            let db = ctx.open_db()?;
            let settings = ctx.load_settings()?;
            commands::show::run(&db, &settings, &id)
        }

        Commands::Vote { id, direction } => {
            let ctx = context()?;
            let db = ctx.open_db()?;
            let mut settings = ctx.load_settings()?;
            let had_voter = settings.voter_id.is_some();
            let result = commands::vote::run(&db, &mut settings, &id, direction);
            if !had_voter && settings.voter_id.is_some() {
                ctx.save_settings(&settings)?;
            }
            result.map(|_| ())
        }

        Commands::Submit {
            title,
            description,
            contact,
        } => {
            let ctx = context()?;
            let db = ctx.open_db()?;
            let settings = ctx.load_settings()?;
            commands::submit::run(
                &db,
                &settings,
                &ctx.project,
                &title,
                description.as_deref(),
                contact.as_deref(),
            )?;
            Ok(())
        }

        Commands::Roadmap { status } => {
            let ctx = context()?;
            let db = ctx.open_db()?;
            let settings = ctx.load_settings()?;
            commands::roadmap::run(&db, &settings, &ctx.project, status)
        }

        Commands::Settings { action } => {
            let ctx = context()?;
            let mut settings = ctx.load_settings()?;
            match action {
                SettingsCommands::Show => commands::settings::show(&settings, &ctx.project),
                SettingsCommands::Language { language } => {
                    commands::settings::set_language(&mut settings, language)?;
                    ctx.save_settings(&settings)
                }
                SettingsCommands::Theme { theme } => {
                    commands::settings::set_theme(&mut settings, theme)?;
                    ctx.save_settings(&settings)
                }
                SettingsCommands::ResetVoter => {
                    commands::settings::reset_voter(&mut settings)?;
                    ctx.save_settings(&settings)
                }
            }
        }

        Commands::Admin { action } => {
            let ctx = context()?;
            let db = ctx.open_db()?;
            match action {
                AdminCommands::Project { slug } => commands::admin::project(&db, &slug),
                AdminCommands::Projects => commands::admin::list_projects(&db),
                AdminCommands::RoadmapAdd {
                    title,
                    description,
                    status,
                    order,
                } => {
                    commands::admin::roadmap_add(
                        &db,
                        &ctx.project,
                        &title,
                        description.as_deref(),
                        status,
                        order,
                    )?;
                    Ok(())
                }
                AdminCommands::RoadmapStatus { id, status } => {
                    commands::admin::roadmap_status(&db, &id, status)
                }
            }
        }
    }
}
