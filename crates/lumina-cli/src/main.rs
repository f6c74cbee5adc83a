//! Lumina CLI - Book recommendations and reading progression
//!
//! Thin client for the Lumina API.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};

use api::{ActionResponse, Character, LuminaClient, MarkReadRequest, ProfileRequest, Recommendation};
use config::Config;

#[derive(Parser)]
#[command(name = "lumina")]
#[command(about = "Lumina CLI - Book recommendations and reading progression", long_about = None)]
#[command(version)]
struct Cli {
    /// User to act as (overrides the saved default)
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
        /// Server URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Set the default user
    Use {
        user_id: String,
    },

    /// Manage the stored reading profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Recommend books
    ///
    /// Without --tags, uses the stored profile and claims the daily bonus.
    Recommend {
        /// Interest tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        /// entertain, learn, habit, productivity, emotional
        #[arg(short, long)]
        goal: Option<String>,
        /// Prefer books under 400 pages
        #[arg(long)]
        short: bool,
        /// Highest acceptable difficulty (1-5)
        #[arg(long)]
        max_difficulty: Option<u8>,
    },

    /// List the book catalog
    Books,

    /// Character operations
    Character {
        #[command(subcommand)]
        action: CharacterAction,
    },

    /// Mark a book as read
    Read {
        book_id: String,
        /// Title (only for books outside the catalog)
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long)]
        difficulty: Option<u8>,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Equip an owned item
    Equip {
        /// hat, glasses or beard
        slot: String,
        item_id: String,
    },

    /// Clear an equipment slot
    Unequip {
        slot: String,
    },

    /// Show badges
    Badges,

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Create or replace the profile
    Set {
        /// Interest tags (comma-separated; will prompt if not provided)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(short, long)]
        goal: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        /// Daily reading time in minutes
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        short: bool,
        #[arg(long)]
        max_difficulty: Option<u8>,
    },
    /// Show the stored profile
    Show,
}

#[derive(Subcommand)]
enum CharacterAction {
    /// Create the character
    Create {
        /// Name, 2-20 characters (will prompt if not provided)
        name: Option<String>,
        #[arg(short, long)]
        avatar: Option<String>,
    },
    /// Show the character
    Show,
    /// Change name or avatar
    Edit {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        avatar: Option<String>,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// List items on sale
    List,
    /// Buy an item
    Buy { item_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let user = cli.user;

    match cli.command {
        Commands::Login { key, url } => cmd_login(key, url).await,
        Commands::Use { user_id } => cmd_use(user_id),
        Commands::Profile { action } => cmd_profile(user, action).await,
        Commands::Recommend { tags, goal, short, max_difficulty } => {
            cmd_recommend(user, tags, goal, short, max_difficulty).await
        }
        Commands::Books => cmd_books().await,
        Commands::Character { action } => cmd_character(user, action).await,
        Commands::Read { book_id, title, author, pages, difficulty } => {
            let meta = MarkReadRequest { title, author, pages, difficulty };
            cmd_read(user, book_id, meta).await
        }
        Commands::Store { action } => cmd_store(user, action).await,
        Commands::Equip { slot, item_id } => cmd_equip(user, slot, Some(item_id)).await,
        Commands::Unequip { slot } => cmd_equip(user, slot, None).await,
        Commands::Badges => cmd_badges(user).await,
        Commands::Config => cmd_config(),
    }
}

fn client(config: &Config) -> LuminaClient {
    LuminaClient::new(&config.base_url, config.api_key.as_deref())
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = url {
        config.base_url = url;
    }

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    let client = LuminaClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => println!("{}", "OK".green()),
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not reach Lumina API at {}", config.base_url);
        }
    }

    config.api_key = Some(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    if config.user_id.is_none() {
        println!("\n{}", "Tip: set a default user:".yellow());
        println!("  lumina use <USER_ID>");
    }

    Ok(())
}

fn cmd_use(user_id: String) -> Result<()> {
    let mut config = Config::load()?;
    config.user_id = Some(user_id.clone());
    config.save()?;
    println!("{} Default user set to '{}'", "✓".green(), user_id);
    Ok(())
}

async fn cmd_profile(user: Option<String>, action: ProfileAction) -> Result<()> {
    let config = Config::load()?;
    let user_id = config.resolve_user(user.as_deref())?;
    let client = client(&config);

    let profile = match action {
        ProfileAction::Set { tags, goal, age, minutes, short, max_difficulty } => {
            let tags = if tags.is_empty() {
                let raw: String = Input::new()
                    .with_prompt("Interest tags (comma-separated)")
                    .interact_text()
                    .context("Failed to read input")?;
                split_tags(&raw)
            } else {
                tags
            };

            let request = ProfileRequest {
                age,
                minutes_per_day: minutes,
                goal,
                prefers_short: short,
                difficulty_max: max_difficulty,
                tags,
            };
            let saved = client.put_profile(&user_id, &request).await?;
            println!("{} Profile saved", "✓".green());
            saved
        }
        ProfileAction::Show => client.get_profile(&user_id).await?,
    };

    println!("{}", "Profile:".bold());
    println!("  Tags: {}", profile.tags.join(", ").cyan());
    println!("  Goal: {}", profile.goal);
    println!("  Age: {}  Minutes/day: {}", profile.age, profile.minutes_per_day);
    println!(
        "  Max difficulty: {}  Prefers short: {}",
        profile.difficulty_max, profile.prefers_short
    );

    Ok(())
}

async fn cmd_recommend(
    user: Option<String>,
    tags: Vec<String>,
    goal: Option<String>,
    short: bool,
    max_difficulty: Option<u8>,
) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    if !tags.is_empty() {
        let request = ProfileRequest {
            goal,
            prefers_short: short,
            difficulty_max: max_difficulty,
            tags,
            ..Default::default()
        };
        let resp = client.recommend(&request).await?;
        print_recommendations(&resp.recommendations);
        return Ok(());
    }

    let user_id = config.resolve_user(user.as_deref())?;
    let resp = client.recommend_for_user(&user_id).await?;
    print_recommendations(&resp.recommendations);

    if resp.bonus_granted {
        println!("\n{} +{} XP daily bonus", "✨".yellow(), resp.xp_gained);
    }
    if let Some(character) = &resp.character {
        print_status_line(character);
    }

    Ok(())
}

async fn cmd_books() -> Result<()> {
    let config = Config::load()?;
    let books = client(&config).list_books().await?;

    println!("{}", "Catalog:".bold());
    for book in books {
        println!(
            "  {} {} - {} {}",
            book.id.dimmed(),
            book.title.cyan(),
            book.author,
            format!(
                "[{}p, d{}] {}",
                book.pages.map_or("?".to_string(), |p| p.to_string()),
                book.difficulty.map_or("?".to_string(), |d| d.to_string()),
                book.tags.join(", ")
            )
            .dimmed()
        );
    }

    Ok(())
}

async fn cmd_character(user: Option<String>, action: CharacterAction) -> Result<()> {
    let config = Config::load()?;
    let user_id = config.resolve_user(user.as_deref())?;
    let client = client(&config);

    let character = match action {
        CharacterAction::Create { name, avatar } => {
            let name = match name {
                Some(n) => n,
                None => Input::new()
                    .with_prompt("Character name")
                    .interact_text()
                    .context("Failed to read input")?,
            };
            let created = client
                .create_character(&user_id, &name, avatar.as_deref())
                .await?;
            println!("{} Character created", "✓".green());
            created
        }
        CharacterAction::Show => client.get_character(&user_id).await?,
        CharacterAction::Edit { name, avatar } => {
            if name.is_none() && avatar.is_none() {
                bail!("Nothing to change. Use --name and/or --avatar.");
            }
            client
                .update_character(&user_id, name.as_deref(), avatar.as_deref())
                .await?
        }
    };

    print_character(&character);
    Ok(())
}

async fn cmd_read(user: Option<String>, book_id: String, meta: MarkReadRequest) -> Result<()> {
    let config = Config::load()?;
    let user_id = config.resolve_user(user.as_deref())?;

    let resp = client(&config).mark_read(&user_id, &book_id, &meta).await?;
    print_action(&resp);
    Ok(())
}

async fn cmd_store(user: Option<String>, action: StoreAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    match action {
        StoreAction::List => {
            let items = client.list_store().await?;
            println!("{}", "Emporium:".bold());
            for item in items {
                println!(
                    "  {} {} {} {} {}",
                    format!("{:>5}", item.price).yellow(),
                    item.id.dimmed(),
                    item.name.cyan(),
                    format!("[{} / {}]", item.category, item.rarity).dimmed(),
                    item.description
                );
            }
        }
        StoreAction::Buy { item_id } => {
            let user_id = config.resolve_user(user.as_deref())?;
            let resp = client.purchase(&user_id, &item_id).await?;
            print_action(&resp);
        }
    }

    Ok(())
}

async fn cmd_equip(user: Option<String>, slot: String, item_id: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let user_id = config.resolve_user(user.as_deref())?;

    let resp = client(&config)
        .equip(&user_id, &slot, item_id.as_deref())
        .await?;
    print_action(&resp);
    Ok(())
}

async fn cmd_badges(user: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let user_id = config.resolve_user(user.as_deref())?;

    let badges = client(&config).badges(&user_id).await?;
    println!("{}", "Badges:".bold());
    for badge in badges {
        if badge.unlocked {
            println!("  {} {}", badge.emoji, badge.name.green());
        } else {
            println!("  🔒 {}", badge.name.dimmed());
        }
    }
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() { "Set".green() } else { "Not set".red() }
    );
    println!(
        "  Default User: {}",
        config.user_id.as_deref().unwrap_or("None").cyan()
    );

    Ok(())
}

// ============================================
// Output helpers
// ============================================

fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("No recommendations.");
        return;
    }

    println!("{}", "Recommended for you:".bold());
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "  {:>2}. {} - {} {}",
            i + 1,
            rec.title.cyan().bold(),
            rec.author,
            format!("(score {})", rec.score).yellow()
        );
        println!(
            "      {} {}",
            rec.id.dimmed(),
            format!(
                "{} | {}p, d{}",
                rec.why,
                rec.pages.map_or("?".to_string(), |p| p.to_string()),
                rec.difficulty.map_or("?".to_string(), |d| d.to_string())
            )
            .dimmed()
        );
    }
}

fn print_action(resp: &ActionResponse) {
    if resp.success {
        println!("{} {}", "✓".green(), resp.message);
    } else {
        let code = resp.code.as_deref().unwrap_or("rejected");
        println!("{} {} {}", "✗".red(), resp.message, format!("[{}]", code).dimmed());
    }
    print_status_line(&resp.character);
}

fn print_status_line(c: &Character) {
    println!(
        "  {} {} Lv.{} {} {} coins",
        c.avatar,
        c.name.cyan(),
        c.level,
        progress_bar(c.level_progress, 20).green(),
        c.coins.to_string().yellow()
    );
}

fn print_character(c: &Character) {
    print_status_line(c);
    println!("  XP: {}/{}", c.xp, c.xp_to_next_level);
    println!("  Books read: {}", c.books_read_count);

    if !c.equipped.is_empty() {
        let worn: Vec<String> = c
            .equipped
            .iter()
            .map(|(slot, item)| format!("{}={}", slot, item))
            .collect();
        println!("  Equipped: {}", worn.join(", "));
    }
    if !c.inventory.is_empty() {
        println!("  Inventory: {}", c.inventory.join(", ").dimmed());
    }
    for entry in c.books_history.iter().rev().take(5) {
        println!(
            "    {} {} {}",
            entry.id.dimmed(),
            entry.title,
            format!("+{} XP", entry.xp_gained).green()
        );
    }
}

/// Text progress bar for a fraction in `0.0..=1.0`
fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(0.5, 4), "[##--]");
        assert_eq!(progress_bar(1.7, 4), "[####]");
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(" misterio, ,Terror "), vec!["misterio", "Terror"]);
    }

    #[test]
    fn test_cli_parses_global_user() {
        let cli = Cli::try_parse_from(["lumina", "read", "b004", "--user", "ada"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("ada"));
        assert!(matches!(cli.command, Commands::Read { ref book_id, .. } if book_id == "b004"));
    }
}
