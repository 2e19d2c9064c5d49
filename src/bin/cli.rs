//! GearGuard CLI
//!
//! Command-line front end for the maintenance board:
//! - Show the status board
//! - Move requests between columns (with scrap confirmation)
//! - Create requests, equipment and teams
//! - Sign in and out

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use gearguard::board::{BoardEvent, CardMoved, ConfirmationPrompt, MoveOutcome, StatusBoard};
use gearguard::client::{ApiClient, MaintenanceApi};
use gearguard::config::{generate_default_config, Config};
use gearguard::model::{
    flexible_datetime, NewEquipment, NewMaintenanceRequest, NewTeam, RequestStatus,
};
use gearguard::session::SessionContext;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gearguard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Equipment maintenance board")]
#[command(long_about = "GearGuard tracks maintenance requests for your equipment.\nMove requests across the New, In Progress, Repaired and Scrap columns.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the status board
    Board,

    /// Move a request to another column
    Move {
        /// Request ID
        id: String,
        /// Target status (new, in_progress, repaired, scrap)
        status: String,
        /// Skip the scrap confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Maintenance requests
    Request {
        #[command(subcommand)]
        command: RequestCommands,
    },

    /// Equipment
    Equipment {
        #[command(subcommand)]
        command: EquipmentCommands,
    },

    /// Maintenance teams
    Teams {
        #[command(subcommand)]
        command: TeamCommands,
    },

    /// Sign in
    Login { email: String, password: String },

    /// Create an account and sign in
    Signup {
        email: String,
        password: String,
        /// Display name
        #[arg(long)]
        name: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum RequestCommands {
    /// Create a maintenance request
    New {
        subject: String,
        /// Equipment ID
        equipment_id: String,
        /// Request type (corrective, preventive)
        #[arg(short = 't', long = "type", default_value = "corrective")]
        request_type: String,
        /// Scheduled date, e.g. 2024-07-01 or 2024-07-01T09:00:00
        #[arg(short, long)]
        scheduled: Option<String>,
        /// Technician (default: the equipment's technician)
        #[arg(long)]
        technician: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EquipmentCommands {
    /// List equipment
    List,
    /// Register equipment
    Add {
        name: String,
        serial_number: String,
        #[arg(long, default_value = "")]
        department: String,
        /// Owning team ID
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        technician: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TeamCommands {
    /// List teams
    List,
    /// Create a team
    Add {
        name: String,
        /// Technician names
        #[arg(short, long)]
        member: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = &cli.api_url {
        config.client.base_url = url.clone();
    }
    config.logging.init();

    let json = cli.format == "json";

    match cli.command {
        Commands::Board => {
            let board = open_board(&config).await?;
            let columns = board.columns().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&columns)?);
            } else {
                print!("{}", gearguard::board::render_text(&columns));
            }
        }

        Commands::Move { id, status, yes } => {
            let to: RequestStatus = status.parse()?;
            let board = open_board(&config).await?;

            let from = match board.get(&id.as_str().into()).await {
                Some(request) => request.status,
                None => bail!("Request {} is not on the board", id),
            };

            let mut outcome = board.card_moved(CardMoved::new(id.as_str(), from, to)).await;

            if let MoveOutcome::AwaitingConfirmation(prompt) = &outcome {
                let confirmed = yes || confirm_scrap(prompt);

                let event = if confirmed {
                    BoardEvent::ConfirmPending
                } else {
                    BoardEvent::CancelPending
                };
                outcome = board.dispatch(event).await;
            }

            print_outcome(&outcome, json)?;
            if matches!(outcome, MoveOutcome::Reverted { .. }) {
                std::process::exit(1);
            }
        }

        Commands::Request { command } => match command {
            RequestCommands::New {
                subject,
                equipment_id,
                request_type,
                scheduled,
                technician,
            } => {
                let mut request =
                    NewMaintenanceRequest::new(subject, equipment_id.as_str(), request_type);
                if let Some(raw) = scheduled {
                    let when = flexible_datetime::parse(&raw)
                        .with_context(|| format!("Invalid scheduled date: {}", raw))?;
                    request = request.scheduled(when);
                }
                if let Some(tech) = technician {
                    request = request.technician(tech);
                }

                let client = api_client(&config)?;
                let created = client.create_request(&request).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&created)?);
                } else {
                    println!("Created request {}: {}", created.id, created.subject);
                    if let Some(tech) = &created.technician {
                        println!("  Technician: {}", tech);
                    }
                }
            }
        },

        Commands::Equipment { command } => {
            let client = api_client(&config)?;
            match command {
                EquipmentCommands::List => {
                    let equipment = client.fetch_equipment().await?;

                    if json {
                        println!("{}", serde_json::to_string_pretty(&equipment)?);
                    } else if equipment.is_empty() {
                        println!("No equipment registered yet.");
                    } else {
                        println!(
                            "{:<38} {:<22} {:<16} {:<16} {}",
                            "ID", "Name", "Serial", "Department", "Scrapped"
                        );
                        println!("{}", "-".repeat(100));
                        for item in equipment {
                            println!(
                                "{:<38} {:<22} {:<16} {:<16} {}",
                                item.id,
                                item.name,
                                item.serial_number,
                                item.department,
                                if item.is_scrapped { "yes" } else { "no" }
                            );
                        }
                    }
                }
                EquipmentCommands::Add {
                    name,
                    serial_number,
                    department,
                    team,
                    technician,
                    location,
                } => {
                    let mut equipment =
                        NewEquipment::new(name, serial_number).department(department);
                    if let Some(team) = team {
                        equipment = equipment.team(team);
                    }
                    if let Some(tech) = technician {
                        equipment = equipment.default_technician(tech);
                    }
                    if let Some(location) = location {
                        equipment = equipment.location(location);
                    }

                    let created = client.create_equipment(&equipment).await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&created)?);
                    } else {
                        println!("Registered {} ({})", created.name, created.id);
                    }
                }
            }
        }

        Commands::Teams { command } => {
            let client = api_client(&config)?;
            match command {
                TeamCommands::List => {
                    let teams = client.fetch_teams().await?;

                    if json {
                        println!("{}", serde_json::to_string_pretty(&teams)?);
                    } else if teams.is_empty() {
                        println!("No teams defined yet.");
                    } else {
                        println!("{:<38} {:<20} {}", "ID", "Name", "Members");
                        println!("{}", "-".repeat(80));
                        for team in teams {
                            println!(
                                "{:<38} {:<20} {}",
                                team.id,
                                team.name,
                                team.members.join(", ")
                            );
                        }
                    }
                }
                TeamCommands::Add { name, member } => {
                    let mut team = NewTeam::new(name);
                    for m in member {
                        team = team.member(m);
                    }

                    let created = client.create_team(&team).await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&created)?);
                    } else {
                        println!("Created team {} ({})", created.name, created.id);
                    }
                }
            }
        }

        Commands::Login { email, password } => {
            let mut session = SessionContext::init(&config.session.file);
            let user = session.login(&email, &password)?;
            println!("Signed in as {} <{}>", user.full_name, user.email);
        }

        Commands::Signup {
            email,
            password,
            name,
        } => {
            let mut session = SessionContext::init(&config.session.file);
            let user = session.signup(&email, &password, &name)?;
            println!("Welcome, {}", user.full_name);
        }

        Commands::Logout => {
            let mut session = SessionContext::init(&config.session.file);
            session.logout()?;
            println!("Signed out.");
        }

        Commands::Whoami => {
            let session = SessionContext::init(&config.session.file);
            match session.user() {
                Some(user) if json => println!("{}", serde_json::to_string_pretty(user)?),
                Some(user) => println!("{} <{}>", user.full_name, user.email),
                None => {
                    println!("Not signed in.");
                    println!("  gearguard login <email> <password>");
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            if let Some(path) = output {
                std::fs::write(&path, &content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            } else {
                println!("{}", content);
            }
        }
    }

    Ok(())
}

/// Ask before scrapping; anything but an explicit yes cancels
fn confirm_scrap(prompt: &ConfirmationPrompt) -> bool {
    println!("{}", prompt.title);
    println!("{}", prompt.description);

    match Confirm::new()
        .with_prompt(prompt.confirm_label)
        .default(false)
        .interact_opt()
    {
        Ok(answer) => answer.unwrap_or(false),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot prompt for confirmation, cancelling");
            eprintln!("No terminal to confirm on; pass --yes to scrap without a prompt");
            false
        }
    }
}

fn api_client(config: &Config) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::new(config.client.to_client_config())?)
}

/// Build a board and load it, failing when the API cannot be reached
async fn open_board(config: &Config) -> anyhow::Result<StatusBoard<ApiClient>> {
    let client = api_client(config)?;
    let board = StatusBoard::new(Arc::new(client));

    if let Err(e) = board.load().await {
        eprintln!("Cannot load requests from {}", config.client.base_url);
        eprintln!();
        eprintln!("Make sure the GearGuard API server is running:");
        eprintln!("  cargo run --bin gearguard-api -- --seed");
        return Err(e.into());
    }

    Ok(board)
}

fn print_outcome(outcome: &MoveOutcome, json: bool) -> anyhow::Result<()> {
    let (result, message) = match outcome {
        MoveOutcome::Unchanged => ("unchanged", "Request is already in that column".to_string()),
        MoveOutcome::AwaitingConfirmation(_) => {
            ("awaiting_confirmation", "Move is waiting for confirmation".to_string())
        }
        MoveOutcome::Cancelled(pending) => (
            "cancelled",
            format!("Move of {} to {} cancelled", pending.id, pending.to.title()),
        ),
        MoveOutcome::NothingPending => ("nothing_pending", "No move was waiting".to_string()),
        MoveOutcome::Committed { id, status } => {
            ("committed", format!("Moved {} to {}", id, status.title()))
        }
        MoveOutcome::Reverted { id, status, error } => (
            "reverted",
            format!(
                "Failed to move {} to {}: {} (board reloaded)",
                id,
                status.title(),
                error
            ),
        ),
    };

    if json {
        let body = serde_json::json!({ "result": result, "message": message });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if result == "reverted" {
        eprintln!("{}", message);
    } else {
        println!("{}", message);
    }
    Ok(())
}
