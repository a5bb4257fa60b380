//! `tracker`: command-line client for the team tracker API.
//!
//! # Usage
//!
//! ```text
//! tracker --url http://localhost:8080 locations --available
//! tracker --lang ko teams list
//! tracker record-visit --location 3 --team 1 --preached --notes "second floor"
//! tracker plan --team 1 --date 2025-03-09 3 4 5
//! ```

mod client;
mod labels;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use client::ApiClient;
use labels::Language;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracker_core::{team::TeamInput, visit::NewVisit};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tracker", about = "Command-line client for the team tracker")]
struct Args {
  /// Path to a TOML config file (url, lang).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the tracker server (default: http://localhost:8080).
  #[arg(long, env = "TRACKER_URL")]
  url: Option<String>,

  /// Interface language.
  #[arg(long, env = "TRACKER_LANG", value_enum)]
  lang: Option<Language>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List locations.
  Locations {
    /// Only locations nobody has preached at yet.
    #[arg(long)]
    available: bool,
  },
  /// Per-location visit status.
  Status,
  /// Visits to one location, newest first.
  Visits { location_id: i64 },
  /// Every visit with team and location names.
  History,
  /// Record a visit.
  RecordVisit {
    #[arg(long)]
    location: i64,
    #[arg(long)]
    team:     i64,
    #[arg(long)]
    preached: bool,
    #[arg(long, default_value = "")]
    notes:    String,
    /// When the visit happened (RFC 3339). Defaults to now.
    #[arg(long)]
    at:       Option<DateTime<Utc>>,
  },
  /// Manage teams.
  Teams {
    #[command(subcommand)]
    action: TeamAction,
  },
  /// Plan visits for a team on a date.
  Plan {
    #[arg(long)]
    team:         i64,
    #[arg(long)]
    date:         NaiveDate,
    #[arg(required = true)]
    location_ids: Vec<i64>,
  },
  /// A team's upcoming planned visits.
  Planned {
    #[arg(long)]
    team: i64,
  },
  /// Assign locations to a team.
  Assign {
    #[arg(long)]
    team:         i64,
    #[arg(required = true)]
    location_ids: Vec<i64>,
  },
  /// A team's assignments.
  Assignments {
    #[arg(long)]
    team: i64,
  },
  /// Mark an assignment completed (or not, with --undo).
  Complete {
    #[arg(long)]
    team:          i64,
    assignment_id: i64,
    #[arg(long)]
    undo:          bool,
  },
  /// Aggregate counters.
  Stats,
}

#[derive(Subcommand, Debug)]
enum TeamAction {
  List,
  Add {
    name:   String,
    #[arg(long, default_value = "")]
    leader: String,
  },
  Update {
    id:     i64,
    name:   String,
    #[arg(long, default_value = "")]
    leader: String,
  },
  Remove {
    id: i64,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:  String,
  #[serde(default)]
  lang: Option<Language>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8080".to_string());
  let lang = args.lang.or(file_cfg.lang).unwrap_or_default();
  tracing::debug!(%base_url, ?lang, "resolved client settings");

  let client = ApiClient::new(base_url)?;
  run(&client, args.command, lang).await
}

async fn run(client: &ApiClient, command: Command, lang: Language) -> Result<()> {
  let l = lang.labels();
  let text = match command {
    Command::Locations { available } => output::locations(l, &client.locations(available).await?),
    Command::Status => output::statuses(l, &client.location_statuses().await?),
    Command::Visits { location_id } => {
      output::visits(l, &client.location_visits(location_id).await?)
    }
    Command::History => output::history(l, &client.visit_history().await?),
    Command::RecordVisit { location, team, preached, notes, at } => {
      let visit = client
        .record_visit(&NewVisit {
          location_id: location,
          team_id: team,
          visit_date: at,
          is_preached: preached,
          notes,
        })
        .await?;
      output::visits(l, &[visit])
    }
    Command::Teams { action } => match action {
      TeamAction::List => output::teams(l, &client.teams().await?),
      TeamAction::Add { name, leader } => {
        let team = client.add_team(&TeamInput { name, leader }).await?;
        output::teams(l, &[team])
      }
      TeamAction::Update { id, name, leader } => {
        let team = client.update_team(id, &TeamInput { name, leader }).await?;
        output::teams(l, &[team])
      }
      TeamAction::Remove { id } => output::ack(&client.delete_team(id).await?),
    },
    Command::Plan { team, date, location_ids } => {
      output::ack(&client.plan(team, &location_ids, date).await?)
    }
    Command::Planned { team } => output::planned(l, &client.planned(team).await?),
    Command::Assign { team, location_ids } => {
      output::ack(&client.assign(team, &location_ids).await?)
    }
    Command::Assignments { team } => output::assignments(l, &client.assignments(team).await?),
    Command::Complete { team, assignment_id, undo } => {
      output::ack(&client.set_completed(team, assignment_id, !undo).await?)
    }
    Command::Stats => output::statistics(l, &client.statistics().await?),
  };
  print!("{text}");
  Ok(())
}
