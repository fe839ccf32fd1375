use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::Url;

use photofeed::auth::{authorization_url, extract_code};
use photofeed::config::Config;
use photofeed::feed::PageOutcome;
use photofeed::logging::init_tracing;
use photofeed::Session;

#[derive(Parser)]
#[command(name = "photofeed", version, about = "Photo feed client for the Unsplash API")]
struct Cli {
    /// Path to config file (default: ~/.config/photofeed/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the URL to open in a browser to authorize this client
    AuthorizeUrl,
    /// Exchange an authorization code (or the redirect URL holding it) for a token
    Login { code: String },
    /// List photos from the feed
    Feed {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Like a photo
    Like { photo_id: String },
    /// Remove a like from a photo
    Unlike { photo_id: String },
    /// Show a profile (the signed-in user's when no username is given)
    Profile { username: Option<String> },
    /// Forget the stored token
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    let session = Session::from_config(&config)?;

    match cli.command {
        Command::AuthorizeUrl => {
            println!("{}", authorization_url(&config.api)?);
        }
        Command::Login { code } => {
            let code = match Url::parse(&code) {
                Ok(url) => extract_code(&url).context("URL does not carry an authorization code")?,
                Err(_) => code,
            };
            session.auth().exchange_code(&code).await?;
            println!("Logged in.");
        }
        Command::Feed { pages } => {
            for _ in 0..pages {
                match session.feed().fetch_next_page().await {
                    Ok(PageOutcome::Loaded { inserted, .. }) if inserted.is_empty() => break,
                    Ok(PageOutcome::Loaded { .. }) => {}
                    Ok(PageOutcome::AlreadyLoading | PageOutcome::Discarded) => break,
                    // Show what already arrived; a rerun retries the page.
                    Err(e) if e.is_network() && !session.feed().is_empty() => {
                        eprintln!("Warning: stopped paging: {}", e);
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            for photo in session.feed().photos() {
                let heart = if photo.liked { "♥" } else { " " };
                let date = photo
                    .created_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!(
                    "{} {:<12} {:>10} {:>5}x{:<5} {}",
                    heart,
                    photo.id,
                    date,
                    photo.width,
                    photo.height,
                    photo.description.as_deref().unwrap_or("")
                );
            }
        }
        Command::Like { photo_id } => {
            let liked = session.feed().change_like(&photo_id, true).await?;
            println!("{} liked: {}", photo_id, liked);
        }
        Command::Unlike { photo_id } => {
            let liked = session.feed().change_like(&photo_id, false).await?;
            println!("{} liked: {}", photo_id, liked);
        }
        Command::Profile { username } => {
            let profile = match username {
                Some(username) => session.profile().fetch_profile(&username).await?,
                None => session.profile().fetch_current_profile().await?,
            };
            let avatar = session.avatar().fetch_avatar_url(&profile.username).await?;
            println!("{}", if profile.name.is_empty() { "-" } else { profile.name.as_str() });
            println!("{}", profile.login_name);
            if let Some(bio) = &profile.bio {
                println!("{}", bio);
            }
            println!("{}", avatar);
        }
        Command::Logout => {
            let report = session.logout();
            if !report.is_clean() {
                for (step, message) in &report.failures {
                    eprintln!("Warning: {:?} failed: {}", step, message);
                }
                bail!("Logout finished with errors");
            }
            println!("Logged out.");
        }
    }

    Ok(())
}
