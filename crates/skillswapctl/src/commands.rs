//! Command execution
//!
//! Each command opens the file-backed app, runs one operation, prints the
//! result and any gamification events it produced.

use crate::cli::{Cli, Commands};
use crate::output;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use skillswap_common::progression::level_table;
use skillswap_common::provider::{DataProvider, MockProvider};
use skillswap_common::{ActivityType, FileStore, SkillSwap, SkillswapConfig};
use tracing::debug;
use uuid::Uuid;

pub type App = SkillSwap<FileStore, MockProvider>;

/// Open the app for the configured user and data directory
pub fn open(config: &SkillswapConfig) -> Result<App> {
    let dir = config.user_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    debug!("Using data directory {}", dir.display());

    Ok(SkillSwap::open(
        FileStore::new(dir),
        MockProvider::new(),
        &config.user_id,
        config.notifications.clone(),
    ))
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
        None => Ok(Local::now().date_naive()),
    }
}

fn flush_events(app: &mut App) {
    output::print_events(&app.take_events());
}

/// Run one parsed invocation. Global flags override `config` for this run only.
pub fn run(cli: Cli, mut config: SkillswapConfig) -> Result<()> {
    let command = cli.command;
    if let Commands::Config { set } = command {
        return config_command(&mut config, set);
    }

    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(user) = cli.user {
        config.user_id = user;
    }

    let mut app = open(&config)?;
    let today = Local::now().date_naive();

    match command {
        Commands::Status { json } => {
            let status = app.status();
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                output::print_status(&status);
            }
        }
        Commands::Login { date } => {
            let day = parse_date(date.as_deref())?;
            let outcome = app.login(day);
            if outcome.counted {
                println!("Logged in for {} (streak {})", day, outcome.streak);
            } else {
                println!("Already logged in for {}", day);
            }
            flush_events(&mut app);
        }
        Commands::Activity { activity, quality, date } => {
            let activity: ActivityType = activity.parse()?;
            let day = parse_date(date.as_deref())?;
            let xp = app.record_activity(activity, quality, day);
            println!("{}: +{} XP", activity, xp);
            flush_events(&mut app);
        }
        Commands::Points { amount, reason } => {
            let balance = app.add_points(amount, &reason);
            println!("Balance: {}", balance);
            flush_events(&mut app);
        }
        Commands::Achievements => output::print_achievements(app.engine().achievements()),
        Commands::Unlock { id } => {
            if !app.unlock_achievement(&id)? {
                println!("{} is already unlocked", id);
            }
            flush_events(&mut app);
        }
        Commands::Rewards => output::print_rewards(app.engine().rewards(), app.engine().points()),
        Commands::Claim { id } => {
            let outcome = app.claim_reward(&id)?;
            output::print_claim(&outcome);
            flush_events(&mut app);
        }
        Commands::Levels { max } => output::print_levels(&level_table(max)),
        Commands::Match { user, other } => {
            let breakdown = app.match_between(&user, &other)?;
            output::print_match(&user, &other, &breakdown);
        }
        Commands::Suggest { limit } => {
            let suggestions = app.suggest_matches(&config.user_id, limit)?;
            output::print_suggestions(&suggestions);
        }
        Commands::Notifications { read, read_all, clear } => {
            if let Some(id) = read {
                let id = Uuid::parse_str(&id).with_context(|| format!("Invalid notification id '{}'", id))?;
                if !app.mark_notification_read(id) {
                    anyhow::bail!("No notification {}", id);
                }
            } else if read_all {
                println!("Marked {} as read", app.mark_all_notifications_read());
            } else if clear {
                app.clear_notifications();
                println!("Cleared");
            } else {
                output::print_notifications(app.notifications().items());
            }
        }
        Commands::Feed => output::print_feed(&app.feed()),
        Commands::Like { post } => {
            let liked = app.toggle_like(&post, today);
            println!("{} {}", if liked { "Liked" } else { "Unliked" }, post);
            flush_events(&mut app);
        }
        Commands::Save { post } => {
            let saved = app.toggle_save(&post);
            println!("{} {}", if saved { "Saved" } else { "Unsaved" }, post);
        }
        Commands::Communities => {
            output::print_communities(&app.provider().list_communities(), app.communities().joined());
        }
        Commands::Join { id } => {
            if app.join_community(&id, today)? {
                println!("Joined {}", id);
            } else {
                println!("Already a member of {}", id);
            }
            flush_events(&mut app);
        }
        Commands::Leave { id } => {
            if app.leave_community(&id) {
                println!("Left {}", id);
            } else {
                println!("Not a member of {}", id);
            }
        }
        Commands::Challenges => {
            app.refresh_challenges(today);
            let streak = app.challenges().streak().current_as_of(today);
            output::print_challenges(app.challenges().challenges(), streak);
        }
        Commands::Challenge { id, amount } => {
            let progress = app.advance_challenge(&id, amount, today)?;
            output::print_challenge_progress(&progress);
            flush_events(&mut app);
        }
        Commands::Send { partner, text } => {
            let outcome = app.send_message(&partner, &text, today)?;
            output::print_send(&outcome);
            flush_events(&mut app);
        }
        Commands::Config { .. } => {}
    }
    Ok(())
}

fn config_command(config: &mut SkillswapConfig, set: Option<String>) -> Result<()> {
    if let Some(assignment) = set {
        let path = SkillswapConfig::config_path()?;
        config.set(&assignment)?;
        config.save_to(&path)?;
        println!("Saved {}", path.display());
    }
    print!("{}", toml::to_string_pretty(config).context("Failed to serialize configuration")?);
    Ok(())
}
