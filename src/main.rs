use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idl_league::api::{build_router, state::AppState};
use idl_league::bracket::BracketBuilder;
use idl_league::calculate::{
    clamp_week, matches_for_week, max_week, rank_teams, week_has_knockout, StandingsCalculator,
};
use idl_league::config::AppConfig;
use idl_league::models::{Bracket, LftPlayer, Player, Standing, Team, TeamId, TeamNames};
use idl_league::storage::{SeasonData, SeasonStore, StorageConfig, TeamRegistration};

#[derive(Parser)]
#[command(name = "idl-league")]
#[command(about = "Irish Dota League standings, brackets and season data")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a division's standings table
    Standings {
        #[arg(long)]
        season: u32,

        #[arg(long)]
        division: u32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print a division's knockout bracket
    Bracket {
        #[arg(long)]
        season: u32,

        #[arg(long)]
        division: u32,

        /// Seed from the stored team records instead of computed standings
        #[arg(long)]
        from_teams: bool,

        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Print one week of fixtures
    Matches {
        #[arg(long)]
        season: u32,

        #[arg(long)]
        division: u32,

        #[arg(long, default_value = "1")]
        week: u32,
    },

    /// List registered bracket templates
    Templates,

    /// Load a season's data files and report problems
    Validate {
        #[arg(long)]
        season: u32,
    },

    /// Recompute team records from the match file into teams.jsonl
    RefreshTeams {
        #[arg(long)]
        season: u32,

        /// Print the new records without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace a season's teams.jsonl with a JSON array of team rows
    ImportTeams {
        #[arg(long)]
        season: u32,

        /// JSON export to read
        #[arg(long)]
        file: PathBuf,
    },

    /// Register a new team with its captain
    RegisterTeam {
        #[arg(long)]
        season: u32,

        #[arg(long, default_value = "1")]
        division: u32,

        /// Team name
        #[arg(long)]
        name: String,

        /// Extension of the logo to be uploaded (png, jpg)
        #[arg(long)]
        logo: Option<String>,

        #[command(flatten)]
        captain: PlayerArgs,

        #[arg(long)]
        country: Option<String>,
    },

    /// Add a player to a team's roster
    JoinTeam {
        #[arg(long)]
        season: u32,

        /// Team id, as given by the captain
        #[arg(long)]
        team: String,

        #[command(flatten)]
        player: PlayerArgs,

        #[arg(long)]
        country: Option<String>,
    },

    /// Sign up as a player looking for a team
    LftSignup {
        #[command(flatten)]
        player: PlayerArgs,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Start the API server
    Serve {
        /// Bind address (defaults to the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct PlayerArgs {
    /// Player name
    #[arg(long)]
    player: String,

    /// Account id of the signed-in player
    #[arg(long)]
    auth_id: String,

    #[arg(long)]
    rank: Option<String>,

    /// Positions, comma separated (Carry, Mid, Offlane, Support, Hard Support)
    #[arg(long, value_delimiter = ',')]
    positions: Vec<String>,

    #[arg(long)]
    steam: Option<String>,

    #[arg(long)]
    dotabuff: Option<String>,
}

impl PlayerArgs {
    fn into_player(self, country: Option<String>) -> (Player, String) {
        let mut player = Player::new(self.player);
        player.rank = self.rank;
        player.roles = self.positions;
        player.steam_profile = self.steam;
        player.dotabuff_profile = self.dotabuff;
        player.country = country;
        (player, self.auth_id)
    }

    fn into_lft(self, notes: Option<String>) -> (LftPlayer, String) {
        let mut player = LftPlayer::new(self.player);
        player.rank = self.rank;
        player.roles = self.positions;
        player.steam_profile = self.steam;
        player.dotabuff_profile = self.dotabuff;
        player.notes = notes;
        (player, self.auth_id)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = PathBuf::from(&cli.config);
    let config_found = config_path.exists();
    let mut config = AppConfig::load(config_found.then_some(config_path.as_path()))
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }

    // Initialize tracing
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting idl-league v{}", env!("CARGO_PKG_VERSION"));
    if !config_found {
        tracing::warn!("No config file at {}, using defaults", cli.config);
    }

    let store = SeasonStore::new(StorageConfig::new(config.data_dir.clone()));
    let calculator = StandingsCalculator::new(config.league.participant_rules());

    match cli.command {
        Commands::Standings {
            season,
            division,
            json,
        } => {
            let data = load_season(&store, &config, season)?;
            let table = data.standings(&calculator, division);
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print_standings(&table);
            }
        }
        Commands::Bracket {
            season,
            division,
            from_teams,
            json,
        } => {
            let builder = BracketBuilder::with_templates_dir(&config.templates_dir())?;
            let data = load_season(&store, &config, season)?;
            let ranked: Vec<Team> = if from_teams {
                rank_teams(&data.teams, division)
            } else {
                data.standings(&calculator, division)
                    .into_iter()
                    .map(Team::from)
                    .collect()
            };

            let bracket = builder.build(&ranked, season, division);
            if json {
                println!("{}", serde_json::to_string_pretty(&bracket)?);
            } else {
                print_bracket(&bracket);
            }
        }
        Commands::Matches {
            season,
            division,
            week,
        } => {
            let data = load_season(&store, &config, season)?;
            let all = data.division_matches(division);
            let week = clamp_week(all, week);

            println!(
                "Season {} division {}, week {} of {}{}",
                season,
                division,
                week,
                max_week(all),
                if week_has_knockout(all, week) {
                    " (knockout)"
                } else {
                    ""
                }
            );
            for m in matches_for_week(all, week) {
                let score = match (m.completed, m.score) {
                    (true, Some((s1, s2))) => format!("{} - {}", s1, s2),
                    _ => "vs".to_string(),
                };
                let date = m.date.map(|d| d.to_string()).unwrap_or_default();
                println!(
                    "  {:<28} {:^7} {:<28} {}",
                    data.names.display_name(&m.team1_id),
                    score,
                    data.names.display_name(&m.team2_id),
                    date
                );
            }
        }
        Commands::Templates => {
            let builder = BracketBuilder::with_templates_dir(&config.templates_dir())?;
            for template in builder.registry().iter() {
                println!(
                    "season {:>2} division {:>2}  {:<32} {} teams, {} slots{}",
                    template.season,
                    template.division,
                    template.name,
                    template.team_count,
                    template.slots.len(),
                    if template.is_literal() { ", fixed names" } else { "" }
                );
            }
        }
        Commands::Validate { season } => {
            store.require(season)?;
            let data = load_season(&store, &config, season)?;

            for diagnostic in &data.diagnostics {
                println!("{}", diagnostic);
            }
            let fixtures: usize = data.matches.values().map(Vec::len).sum();
            println!(
                "Season {}: {} divisions, {} fixtures, {} teams, {} problems",
                season,
                data.divisions().len(),
                fixtures,
                data.teams.len(),
                data.diagnostics.len()
            );

            if !data.diagnostics.is_empty() {
                bail!("{} data problems in season {}", data.diagnostics.len(), season);
            }
        }
        Commands::RefreshTeams { season, dry_run } => {
            store.require(season)?;
            let data = load_season(&store, &config, season)?;
            let teams = data.refreshed_teams(&calculator);

            if dry_run {
                for division in data.divisions() {
                    println!("Division {}", division);
                    let ranked = rank_teams(&teams, division);
                    let table: Vec<Standing> = ranked
                        .into_iter()
                        .map(|team| Standing {
                            matches_played: team.record.games(),
                            team,
                        })
                        .collect();
                    print_standings(&table);
                }
            } else {
                let count = store.write_teams(season, &teams)?;
                tracing::info!("Wrote {} team records for season {}", count, season);
            }
        }
        Commands::ImportTeams { season, file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = store.import_teams(season, &contents)?;
            for diagnostic in &report.diagnostics {
                println!("{}", diagnostic);
            }
            println!(
                "Imported {} teams into season {} ({} problems)",
                report.value,
                season,
                report.diagnostics.len()
            );
        }
        Commands::RegisterTeam {
            season,
            division,
            name,
            logo,
            captain,
            country,
        } => {
            let (captain, auth_id) = captain.into_player(country);
            let registration = TeamRegistration {
                name,
                division_id: division,
                captain,
                logo_extension: logo,
            };
            let team = store.register_team(season, registration, &auth_id)?;

            println!(
                "Registered {} in season {} division {}; team id for joining: {}",
                team.name, season, team.division_id, team.id
            );
            if let Some(path) = &team.local_image {
                println!("Save the team logo under the image directory as {}", path);
            }
        }
        Commands::JoinTeam {
            season,
            team,
            player,
            country,
        } => {
            let (player, auth_id) = player.into_player(country);
            let team = store.join_team(season, &TeamId::from(team), player, &auth_id)?;

            println!("{} roster:", team.name);
            for p in &team.players {
                println!("  {:<24} {:<10} {}", p.name, p.rank_label(), p.roles.join(", "));
            }
        }
        Commands::LftSignup { player, notes } => {
            let (player, auth_id) = player.into_lft(notes);
            let player = store.add_lft_player(player, &auth_id)?;
            println!("{} listed as looking for a team ({})", player.name, player.roles_label());
        }
        Commands::Serve { host, port } => {
            let builder = BracketBuilder::with_templates_dir(&config.templates_dir())?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(config, builder);
            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn load_season(store: &SeasonStore, config: &AppConfig, season: u32) -> Result<SeasonData> {
    let names = config
        .league
        .season(season)
        .map(|s| s.team_names.clone())
        .unwrap_or_else(TeamNames::new);
    store
        .load(season, &names)
        .with_context(|| {
            format!(
                "Failed to load season {} from {}",
                season,
                store.config().data_dir.display()
            )
        })
}

fn print_standings(table: &[Standing]) {
    println!(
        "{:>3}  {:<32} {:>3} {:>3} {:>3} {:>3} {:>4}",
        "#", "Team", "P", "W", "D", "L", "Pts"
    );
    for (i, row) in table.iter().enumerate() {
        let r = &row.team.record;
        println!(
            "{:>3}  {:<32} {:>3} {:>3} {:>3} {:>3} {:>4}",
            i + 1,
            row.name(),
            row.matches_played,
            r.wins,
            r.draws,
            r.losses,
            r.points
        );
    }
}

fn print_bracket(bracket: &Bracket) {
    let Some(template) = &bracket.template else {
        println!(
            "No bracket for season {} division {}",
            bracket.season, bracket.division
        );
        return;
    };

    println!("{}", template);
    for node in &bracket.nodes {
        let winner = node
            .winner
            .as_deref()
            .map(|w| format!("  (won: {})", w))
            .unwrap_or_default();
        println!(
            "  {:<10} {:<28} {}{}",
            node.id,
            node.label,
            node.display_names().join(" vs "),
            winner
        );
    }
    for edge in &bracket.edges {
        println!("  {} -> {}", edge.source, edge.target);
    }
}
