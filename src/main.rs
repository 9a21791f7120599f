use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::env;

mod agg;
mod browse;
mod config;
mod feed;
mod follow;
mod ingestion;
mod init;
mod scheduler;
mod session;
mod store;
mod telemetry;
mod user;
mod util;

use config::Config;
use session::Session;

#[derive(Parser)]
#[command(name = "gator", about = "RSS feed aggregator CLI")]
struct Cli {
    /// Postgres connection string; overrides DATABASE_URL and the settings file
    #[arg(global = true, short, long)]
    dsn: Option<String>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Init,
    /// Create a user and log in as them
    Register(user::RegisterCmd),
    /// Switch the current user
    Login(user::LoginCmd),
    /// List users
    Users,
    /// Delete all users, feeds, follows and posts
    Reset,
    /// Add a feed and follow it
    Addfeed(feed::AddFeedCmd),
    /// List all feeds
    Feeds,
    /// Follow an existing feed by URL
    Follow(follow::FollowCmd),
    /// List feeds the current user follows
    Following,
    /// Stop following a feed
    Unfollow(follow::UnfollowCmd),
    /// Show the newest posts from followed feeds
    Browse(browse::BrowseCmd),
    /// Poll feeds forever, one per interval
    Agg(agg::AggCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);
    telemetry::config::init_tracing();

    // settings are required up front; a missing file is a startup error
    let config_path = Config::default_path()?;
    let config = Config::read_from(&config_path)?;

    let dsn = cli
        .dsn
        .or_else(|| env::var("DATABASE_URL").ok())
        .or_else(|| Some(config.db_url.clone()).filter(|s| !s.is_empty()))
        .context("no database URL: pass --dsn, set DATABASE_URL, or set db_url in the settings file")?;

    let pool = init::connect(&dsn).await?;
    let mut session = Session::new(pool, config, config_path);

    match cli.command {
        Commands::Init => init::run(session.pool()).await?,
        Commands::Register(args) => user::register(&mut session, args).await?,
        Commands::Login(args) => user::login(&mut session, args).await?,
        Commands::Users => user::list(&session).await?,
        Commands::Reset => user::reset(&session).await?,
        Commands::Addfeed(args) => feed::add_feed(&session, args).await?,
        Commands::Feeds => feed::list_feeds(&session).await?,
        Commands::Follow(args) => follow::follow(&session, args).await?,
        Commands::Following => follow::following(&session).await?,
        Commands::Unfollow(args) => follow::unfollow(&session, args).await?,
        Commands::Browse(args) => browse::run(&session, args).await?,
        Commands::Agg(args) => agg::run(&session, args).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_agg_with_interval_and_timeout() {
        let cli = Cli::try_parse_from(["gator", "agg", "1m", "--timeout-secs", "5"]).unwrap();
        match cli.command {
            Commands::Agg(a) => {
                assert_eq!(a.interval, std::time::Duration::from_secs(60));
                assert_eq!(a.timeout_secs, 5);
            }
            _ => panic!("expected agg"),
        }
    }

    #[test]
    fn invalid_interval_fails_at_parse_time() {
        assert!(Cli::try_parse_from(["gator", "agg", "soon"]).is_err());
        assert!(Cli::try_parse_from(["gator", "agg", "0s"]).is_err());
        assert!(Cli::try_parse_from(["gator", "agg", "0.1ns"]).is_err());
        assert!(Cli::try_parse_from(["gator", "agg", "99999999999999999999999h"]).is_err());
        assert!(Cli::try_parse_from(["gator", "agg"]).is_err());
    }

    #[test]
    fn browse_limit_defaults_and_must_be_positive() {
        let cli = Cli::try_parse_from(["gator", "browse"]).unwrap();
        assert!(matches!(cli.command, Commands::Browse(b) if b.limit == browse::DEFAULT_LIMIT));
        assert!(Cli::try_parse_from(["gator", "browse", "0"]).is_err());
    }

    #[test]
    fn addfeed_requires_name_and_url() {
        assert!(Cli::try_parse_from(["gator", "addfeed", "only-name"]).is_err());
        let cli = Cli::try_parse_from(["gator", "addfeed", "Boot", "https://blog.boot.dev/index.xml"]).unwrap();
        assert!(matches!(cli.command, Commands::Addfeed(a) if a.name == "Boot"));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["gator", "frobnicate"]).is_err());
    }
}
