//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SkillSwap CLI
#[derive(Parser)]
#[command(name = "skillswapctl")]
#[command(about = "SkillSwap - points, levels and matches for skill exchange", long_about = None)]
#[command(version = env!("SKILLSWAP_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// State directory (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Act as this user (overrides the config file)
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show points, level and streak
    Status {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Record today's login
    Login {
        /// Login date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record an activity and earn XP
    Activity {
        /// Activity type, e.g. session_completed
        activity: String,

        /// Rating 1-5
        #[arg(long, default_value_t = 1)]
        quality: u8,

        /// Activity date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Grant points directly
    Points {
        amount: u64,

        #[arg(long, default_value = "manual")]
        reason: String,
    },

    /// List achievements
    Achievements,

    /// Unlock an achievement
    Unlock { id: String },

    /// List rewards
    Rewards,

    /// Claim a reward with points
    Claim { id: String },

    /// Show the level curve
    Levels {
        #[arg(long, default_value_t = 20)]
        max: u32,
    },

    /// Match percentage between two users
    Match { user: String, other: String },

    /// Suggest matches for the current user
    Suggest {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// List or manage notifications
    Notifications {
        /// Mark one notification as read
        #[arg(long)]
        read: Option<String>,

        /// Mark all notifications as read
        #[arg(long, conflicts_with = "read")]
        read_all: bool,

        /// Delete all notifications
        #[arg(long, conflicts_with_all = ["read", "read_all"])]
        clear: bool,
    },

    /// Show the feed
    Feed,

    /// Like or unlike a post
    Like { post: String },

    /// Save or unsave a post
    Save { post: String },

    /// List communities
    Communities,

    /// Join a community
    Join { id: String },

    /// Leave a community
    Leave { id: String },

    /// List challenges
    Challenges,

    /// Advance a challenge
    Challenge {
        id: String,

        #[arg(long, default_value_t = 1)]
        amount: u32,
    },

    /// Send a chat message
    Send { partner: String, text: String },

    /// Show or change configuration
    Config {
        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}
