//! Output formatting - plain ASCII terminal output with color accents

use owo_colors::OwoColorize;
use skillswap_common::achievements::Achievement;
use skillswap_common::challenges::{Challenge, ChallengeProgress};
use skillswap_common::chat::SendOutcome;
use skillswap_common::matching::{ComponentScore, MatchBreakdown};
use skillswap_common::notifications::Notification;
use skillswap_common::progression::LevelRow;
use skillswap_common::provider::Community;
use skillswap_common::rewards::{ClaimOutcome, Reward, RewardStatus};
use skillswap_common::{FeedItem, GamificationEvent, MatchSuggestion, StatusSnapshot};

const BAR_WIDTH: usize = 20;

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn section(title: &str) {
    println!();
    println!("{}", format!("[{}]", title).bold());
}

pub fn print_status(status: &StatusSnapshot) {
    section("PROFILE");
    println!("  User:          {}", status.user_id.cyan());
    println!(
        "  Level:         {} ({})",
        status.level.to_string().bright_green(),
        status.title
    );
    println!(
        "  Progress:      {} {:.0}%  ({} XP to next)",
        bar(status.level_progress),
        status.level_progress,
        status.xp_to_next_level
    );
    println!("  Points:        {}", status.points);
    println!("  Login streak:  {} day(s)", status.streak);

    section("ACTIVITY");
    println!(
        "  Achievements:  {}/{}",
        status.achievements_unlocked, status.achievements_total
    );
    println!("  Rewards:       {} claimed", status.rewards_claimed);
    println!("  Communities:   {}", status.communities);
    println!("  Best challenge streak: {}", status.best_challenge_streak);
    if status.unread_notifications > 0 {
        println!(
            "  {}",
            format!("{} unread notification(s)", status.unread_notifications).yellow()
        );
    }
}

/// One line per event, skipping noise
pub fn print_events(events: &[GamificationEvent]) {
    for event in events {
        match event {
            GamificationEvent::PointsAwarded { amount, reason, balance } => {
                println!("  +{} XP ({}) -> {}", amount.bright_green(), reason, balance);
            }
            GamificationEvent::LevelUp { to, .. } => {
                println!("  {} Level {}!", "[LEVEL UP]".bright_magenta(), to);
            }
            GamificationEvent::AchievementUnlocked { name, points, .. } => {
                println!("  {} {} (+{})", "[ACHIEVEMENT]".bright_yellow(), name, points);
            }
            GamificationEvent::RewardClaimed { name, cost, .. } => {
                println!("  {} {} (-{})", "[REWARD]".cyan(), name, cost);
            }
            GamificationEvent::StreakUpdated { streak } => {
                println!("  Streak: {} day(s)", streak);
            }
        }
    }
}

pub fn print_achievements(achievements: &[Achievement]) {
    section("ACHIEVEMENTS");
    for ach in achievements {
        let mark = if ach.unlocked { "[x]".bright_green().to_string() } else { "[ ]".dimmed().to_string() };
        let progress = match (ach.progress, ach.max_progress) {
            (Some(p), Some(max)) if !ach.unlocked => format!("  {}/{}", p, max),
            _ => String::new(),
        };
        println!(
            "  {} {:<20} {:>4} XP  {}{}",
            mark,
            ach.name,
            ach.points,
            ach.description.dimmed(),
            progress
        );
    }
}

pub fn print_rewards(rewards: &[Reward], balance: u64) {
    section("REWARDS");
    println!("  Balance: {} points", balance);
    for reward in rewards {
        let status = reward.status(balance);
        let label = match status {
            RewardStatus::Claimable => status.label().bright_green().to_string(),
            RewardStatus::Claimed => status.label().cyan().to_string(),
            RewardStatus::Locked | RewardStatus::Unavailable => status.label().dimmed().to_string(),
        };
        println!("  {:<18} {:>5}  {:<10} {}", reward.id, reward.cost, label, reward.name);
    }
}

pub fn print_claim(outcome: &ClaimOutcome) {
    if outcome.is_claimed() {
        println!("{}", outcome.message().bright_green());
    } else {
        println!("{}", outcome.message().yellow());
    }
}

pub fn print_levels(rows: &[LevelRow]) {
    section("LEVELS");
    for row in rows {
        println!("  {:>3}  {:>12} XP  {}", row.level, row.required_xp, row.title);
    }
}

fn component(name: &str, score: &ComponentScore) {
    println!("  {:<13} {:>3}/{:<3} {}", name, score.points, score.max, bar(score.ratio() * 100.0));
}

pub fn print_match(user: &str, other: &str, breakdown: &MatchBreakdown) {
    section("MATCH");
    println!("  {} -> {}: {}%", user, other, breakdown.percentage().to_string().bright_green());
    component("Skills", &breakdown.skills);
    component("Reciprocal", &breakdown.reciprocal);
    component("Interests", &breakdown.interests);
    component("Location", &breakdown.location);
    component("Availability", &breakdown.availability);
}

pub fn print_suggestions(suggestions: &[MatchSuggestion]) {
    section("SUGGESTED MATCHES");
    if suggestions.is_empty() {
        println!("  No matches yet");
    }
    for s in suggestions {
        println!("  {:>3}%  {:<16} ({})", s.percentage, s.name, s.user_id.dimmed());
    }
}

pub fn print_notifications(items: &[Notification]) {
    section("NOTIFICATIONS");
    if items.is_empty() {
        println!("  Nothing new");
    }
    for n in items {
        let title = if n.read { n.title.dimmed().to_string() } else { n.title.bold().to_string() };
        println!("  {}  {}  {}", n.id.to_string().dimmed(), title, n.body);
    }
}

pub fn print_feed(items: &[FeedItem]) {
    section("FEED");
    for item in items {
        let like = if item.liked { "<3".bright_red().to_string() } else { "  ".to_string() };
        let saved = if item.saved { "[saved]" } else { "" };
        println!(
            "  {:<3} {} {:>3} likes  {}: {} {}",
            item.post.id,
            like,
            item.likes,
            item.post.author_id.cyan(),
            item.post.content,
            saved.dimmed()
        );
    }
}

pub fn print_communities(communities: &[Community], joined: &[String]) {
    section("COMMUNITIES");
    for c in communities {
        let mark = if joined.contains(&c.id) { "[joined]".bright_green().to_string() } else { String::new() };
        println!("  {:<18} {:<20} {:>5} members {}", c.id, c.name, c.members, mark);
    }
}

pub fn print_challenges(challenges: &[Challenge], streak: u32) {
    section("CHALLENGES");
    for c in challenges {
        let mark = if c.completed { "[x]".bright_green().to_string() } else { "[ ]".to_string() };
        println!(
            "  {} {:<16} {:<7} {}/{}  +{} XP  {}",
            mark,
            c.id,
            c.cadence.as_str(),
            c.progress,
            c.target,
            c.xp_reward,
            c.description.dimmed()
        );
    }
    println!("  Challenge streak: {} day(s)", streak);
}

pub fn print_challenge_progress(progress: &ChallengeProgress) {
    if progress.completed_now {
        println!(
            "{} {} complete (+{} XP)",
            "[DONE]".bright_green(),
            progress.id,
            progress.xp_reward
        );
    } else {
        println!("{}: {}/{}", progress.id, progress.progress, progress.target);
    }
}

pub fn print_send(outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Sent(message) => println!("Sent at {}", message.sent_at.format("%H:%M")),
        SendOutcome::Blocked { notice } => println!("{}", notice.yellow()),
        SendOutcome::Empty => println!("{}", "Nothing to send".dimmed()),
    }
}
