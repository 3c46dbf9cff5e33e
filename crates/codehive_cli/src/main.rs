//! Command-line front end for the project catalog.
//!
//! # Responsibility
//! - Parse user commands and forward them to `codehive_core`.
//! - Print catalog listings and every propagated error.
//!
//! # Invariants
//! - One database connection is opened per process and dropped at exit.

use clap::{Parser, Subcommand};
use codehive_core::db::open_db;
use codehive_core::{
    default_config_dir, default_log_level, get_project_name, init_logging, read_project_readme,
    AppConfig, EditorCommand, EditorLauncher, NewProjectRequest, Project, ProjectId,
    ProjectIntake, ProjectService, SqliteProjectRepository,
};
use serde_json::{Map, Value};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "codehive", version, about = "Catalog and open local code projects")]
struct Cli {
    /// Directory holding `config.json`; defaults to the platform config dir.
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every project in the catalog.
    List,
    /// Filter projects by name or description.
    Search { query: String },
    /// Show one project with its README.
    Show { id: ProjectId },
    /// Register a directory as a project.
    Add {
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// File whose content becomes the project's README.md.
        #[arg(long)]
        readme_file: Option<PathBuf>,
    },
    /// Detect and register projects under the given directories.
    Import { paths: Vec<PathBuf> },
    /// Open a project in the editor.
    Open { id: ProjectId },
    /// Remove a project from the catalog. Files are left on disk.
    Remove { id: ProjectId },
    /// Associate a README file with a project.
    Readme { id: ProjectId, file: PathBuf },
    /// Change configuration values.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Set one key; JSON values are accepted, anything else is a string.
    Set { key: String, value: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => default_config_dir()?,
    };
    let mut config = AppConfig::load_or_init(&config_dir)?;
    init_logging(default_log_level(), config_dir.join("logs"))?;

    if let Command::Config { action } = &cli.command {
        return apply_config_action(&mut config, &config_dir, action);
    }

    let conn = open_db(&config.database_path)?;
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn)?);

    match cli.command {
        Command::List => print_projects(&service.list_projects()?),
        Command::Search { query } => {
            let projects = if query.trim().is_empty() {
                service.list_projects()?
            } else {
                service.search_projects(&query)?
            };
            print_projects(&projects);
        }
        Command::Show { id } => {
            let project = service.get_project(id)?;
            print_project(&project);
            match read_project_readme(&project) {
                Ok(content) => println!("\n{content}"),
                Err(_) if !project.has_readme() => println!("\nNo README loaded"),
                Err(err) => println!("\nError reading README: {err}"),
            }
        }
        Command::Add {
            path,
            name,
            description,
            readme_file,
        } => {
            let path = std::path::absolute(path)?.to_string_lossy().into_owned();
            let name = name.unwrap_or_else(|| get_project_name(&path));
            let readme = match readme_file {
                Some(file) => Some(std::fs::read_to_string(file)?),
                None => None,
            };
            let project = ProjectIntake::new(&service).create_from_directory(&NewProjectRequest {
                path,
                name,
                description,
                readme,
            })?;
            println!("added project {}", project.id);
        }
        Command::Import { paths } => {
            let bases: Vec<PathBuf> = if paths.is_empty() {
                config
                    .default_project_paths
                    .iter()
                    .map(PathBuf::from)
                    .filter(|path| path.is_dir())
                    .collect()
            } else {
                paths
                    .into_iter()
                    .map(std::path::absolute)
                    .collect::<Result<_, _>>()?
            };
            let report = ProjectIntake::new(&service).import_from(&bases)?;
            println!("imported {} project(s)", report.imported.len());
            if let Some(summary) = report.summary() {
                eprint!("{summary}");
                return Err("import finished with failures".into());
            }
        }
        Command::Open { id } => {
            let mut project = service.get_project(id)?;
            let launcher =
                EditorLauncher::new(&service, EditorCommand::from_config(&config.vscode_path));
            let outcome = launcher.open_project(&mut project)?;
            if !outcome.last_opened_recorded {
                eprintln!("warning: could not record last-opened time");
            }
        }
        Command::Remove { id } => {
            service.delete_project(id)?;
            println!("removed project {id}");
        }
        Command::Readme { id, file } => {
            let file = std::path::absolute(file)?;
            let project =
                ProjectIntake::new(&service).attach_readme(id, &file.to_string_lossy())?;
            println!("attached {} to project {}", project.readme_path, project.id);
        }
        // Handled before the database is opened.
        Command::Config { .. } => {}
    }

    Ok(())
}

fn apply_config_action(
    config: &mut AppConfig,
    config_dir: &Path,
    action: &ConfigAction,
) -> Result<(), Box<dyn Error>> {
    let ConfigAction::Set { key, value } = action;
    let parsed =
        serde_json::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.clone()));
    let mut updates = Map::new();
    updates.insert(key.clone(), parsed);

    let ignored = config.apply_updates(&updates);
    if !ignored.is_empty() {
        eprintln!("ignored config keys: {}", ignored.join(", "));
    }
    config.save(config_dir)?;
    Ok(())
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("no projects");
        return;
    }
    for project in projects {
        let tags = if project.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", project.tags.join(", "))
        };
        println!("{:>4}  {}{}  {}", project.id, project.name, tags, project.path);
    }
}

fn print_project(project: &Project) {
    println!("id:          {}", project.id);
    println!("name:        {}", project.name);
    println!("path:        {}", project.path);
    println!("description: {}", project.description);
    println!("tags:        {}", project.tags.join(", "));
    match project.last_opened {
        Some(ms) => println!("last opened: {ms} (epoch ms)"),
        None => println!("last opened: never"),
    }
}
