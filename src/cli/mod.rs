//! Command-line interface for soulscribe.
//!
//! Provides commands for recording brain dumps, browsing the vault,
//! editing and deleting entries, and viewing streak/mood insights.

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::adapters::{DeepgramClient, OpenAiClient};
use crate::capture::{CommandBackend, Recorder};
use crate::config;
use crate::domain::entry::{now_timestamp, parse_timestamp};
use crate::domain::UserProfile;
use crate::insights::{current_streak, weekly_feels};
use crate::pipeline::{BrainDumpPipeline, PipelineError, StageOutcome};
use crate::session::{CachedSession, Session, SessionCache};
use crate::store::{JournalStore, SqliteStore};

/// soulscribe - voice journaling engine
#[derive(Parser, Debug)]
#[command(name = "soulscribe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a brain dump and save it to the vault
    Record {
        /// User the entry belongs to
        #[arg(short, long, env = "SOULSCRIBE_USER")]
        user: String,

        /// Use a pre-recorded audio file instead of the microphone
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Browse a month of vault entries
    Vault {
        #[arg(short, long, env = "SOULSCRIBE_USER")]
        user: String,

        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// Edit an entry's text
    Edit {
        /// Entry ID
        id: String,

        /// Replacement content
        content: String,
    },

    /// Delete an entry permanently
    Delete {
        /// Entry ID
        id: String,

        /// Confirm the deletion (refused without this)
        #[arg(long)]
        yes: bool,
    },

    /// Show the consecutive-day journaling streak
    Streak {
        #[arg(short, long, env = "SOULSCRIBE_USER")]
        user: String,
    },

    /// Show the 7-day weekly feels row
    Feels {
        #[arg(short, long, env = "SOULSCRIBE_USER")]
        user: String,
    },

    /// Show or update the user profile
    Profile {
        #[arg(short, long, env = "SOULSCRIBE_USER")]
        user: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Record { user, input } => record(&user, input).await,
            Commands::Vault { user, year, month } => vault(&user, year, month).await,
            Commands::Edit { id, content } => edit(&id, &content).await,
            Commands::Delete { id, yes } => delete(&id, yes).await,
            Commands::Streak { user } => streak(&user).await,
            Commands::Feels { user } => feels(&user).await,
            Commands::Profile {
                user,
                first_name,
                last_name,
                email,
            } => profile(&user, first_name, last_name, email).await,
            Commands::Config => show_config(),
        }
    }
}

fn open_store() -> Result<Arc<SqliteStore>> {
    let cfg = config::config()?;
    let store = SqliteStore::open(&cfg.db_path()).context("Failed to open journal store")?;
    Ok(Arc::new(store))
}

fn build_pipeline(store: Arc<SqliteStore>) -> Result<BrainDumpPipeline> {
    let cfg = config::config()?;

    let transcriber = DeepgramClient::with_base_url(
        cfg.deepgram.api_key.clone(),
        cfg.deepgram.base_url.clone(),
    );
    let enhancer = OpenAiClient::with_base_url(
        cfg.openai.api_key.clone(),
        cfg.openai.base_url.clone(),
        cfg.openai.model.clone(),
        cfg.openai.temperature,
        cfg.openai.max_tokens,
    );

    Ok(BrainDumpPipeline::new(
        Arc::new(transcriber),
        Arc::new(enhancer),
        store,
    ))
}

async fn record(user: &str, input: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let store = open_store()?;
    let session =
        Session::new(user)?.with_profile(store.get_profile(user).await.ok().flatten());
    let pipeline = build_pipeline(store.clone())?;

    if let Some(profile) = &session.profile {
        println!("Recording for {} {}", profile.first_name, profile.last_name);
    }

    let audio = match input {
        Some(path) => path,
        None => {
            let backend =
                CommandBackend::new(cfg.capture.command.clone(), cfg.capture.args.clone());
            let mut recorder = Recorder::new(backend, cfg.recordings_dir());

            recorder.start().await?;
            print!("Recording... press Enter to stop ");
            io::stdout().flush().ok();

            let mut line = String::new();
            tokio::task::spawn_blocking(move || {
                io::stdin().lock().read_line(&mut line)
            })
            .await
            .context("stdin read task failed")?
            .context("Failed to read stdin")?;

            recorder
                .stop()
                .await?
                .context("Recording produced no audio")?
        }
    };

    println!("Transcribing and enhancing...");
    match pipeline.process_audio(&session, &audio).await {
        Ok(outcome) => {
            if let StageOutcome::Degraded(why) = &outcome.transcription {
                println!("  (transcription degraded: {why})");
            }
            if let StageOutcome::Degraded(why) = &outcome.enhancement {
                println!("  (enhancement degraded: {why})");
            }

            println!("Saved entry {}", outcome.entry.id);
            if !outcome.entry.mood.is_empty() {
                println!(
                    "  mood: {} ({:+.2}, {})",
                    outcome.entry.mood, outcome.entry.mood_score, outcome.entry.sentiment
                );
            }
            println!("  {}", outcome.entry.content);

            // Mirror the session for startup display.
            SessionCache::new(cfg.cache_path())
                .store(&CachedSession {
                    user_id: session.user_id.clone(),
                    profile: session.profile.clone(),
                })
                .await;

            Ok(())
        }
        Err(PipelineError::Store {
            source,
            pending_content,
        }) => {
            // Keep the user's words visible so nothing is lost.
            eprintln!("Save failed: {source}");
            eprintln!("Your entry text (not saved):\n{pending_content}");
            anyhow::bail!("entry was not saved");
        }
    }
}

async fn vault(user: &str, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let store = open_store()?;
    let session = Session::new(user)?;

    let today = Local::now();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());

    let entries = store.list_by_month(&session.user_id, year, month).await?;
    if entries.is_empty() {
        println!("No entries for {year}-{month:02}");
        return Ok(());
    }

    for entry in entries {
        let when = parse_timestamp(&entry.created_at)
            .map(|t| {
                t.with_timezone(&Local)
                    .format("%B %-d, %Y %-I:%M %p")
                    .to_string()
            })
            .unwrap_or_else(|| entry.created_at.clone());

        println!("{}  [{}]", when, entry.id);
        if !entry.mood.is_empty() {
            println!("  mood: {} ({:+.2})", entry.mood, entry.mood_score);
        }
        println!("  {}\n", entry.content);
    }

    Ok(())
}

async fn edit(id: &str, content: &str) -> Result<()> {
    let store = open_store()?;
    let id = Uuid::parse_str(id).context("Invalid entry ID")?;

    store.update_content(id, content).await?;
    println!("Updated entry {id}");
    Ok(())
}

async fn delete(id: &str, yes: bool) -> Result<()> {
    let store = open_store()?;
    let id = Uuid::parse_str(id).context("Invalid entry ID")?;

    let entry = store.get(id).await?;
    if !yes {
        println!("Would delete entry from {}:", entry.created_at);
        println!("  {}", entry.content);
        println!("Deletion is permanent. Re-run with --yes to confirm.");
        return Ok(());
    }

    store.delete(id).await?;
    println!("Deleted entry {id}");
    Ok(())
}

async fn streak(user: &str) -> Result<()> {
    let store = open_store()?;
    let session = Session::new(user)?;

    let today = Local::now().date_naive();
    let days = current_streak(store.as_ref(), &session.user_id, today).await?;

    match days {
        0 => println!("No active streak. Record a dump today to start one."),
        1 => println!("1 day streak."),
        n => println!("{n} day streak."),
    }
    Ok(())
}

async fn feels(user: &str) -> Result<()> {
    let store = open_store()?;
    let session = Session::new(user)?;

    let today = Local::now().date_naive();
    let slots = weekly_feels(store.as_ref(), &session.user_id, today).await?;

    for slot in slots {
        let tier = slot.tier();
        let snippet: String = slot.entry.chars().take(48).collect();
        println!(
            "{}  {}  {:>7}  {}  {}",
            slot.date,
            tier.emoji(),
            format!("{:+.2}", slot.mood),
            tier.color(),
            snippet
        );
    }
    Ok(())
}

async fn profile(
    user: &str,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let cfg = config::config()?;
    let store = open_store()?;
    let session = Session::new(user)?;

    let existing = store.get_profile(&session.user_id).await?;

    let updating = first_name.is_some() || last_name.is_some() || email.is_some();
    let profile = if updating {
        let base = existing.unwrap_or(UserProfile {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            created_at: now_timestamp(),
        });
        let updated = UserProfile {
            first_name: first_name.unwrap_or(base.first_name),
            last_name: last_name.unwrap_or(base.last_name),
            email: email.unwrap_or(base.email),
            created_at: base.created_at,
        };
        store.put_profile(&session.user_id, &updated).await?;
        println!("Profile updated.");
        Some(updated)
    } else {
        existing
    };

    let session = session.with_profile(profile);
    match &session.profile {
        Some(p) => {
            println!("Name:   {} {}", p.first_name, p.last_name);
            println!("Email:  {}", p.email);
            println!("Since:  {}", p.created_at);
        }
        None => println!("No profile for user {user}."),
    }

    SessionCache::new(cfg.cache_path())
        .store(&CachedSession {
            user_id: session.user_id,
            profile: session.profile,
        })
        .await;

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("home:        {}", cfg.home.display());
    match &cfg.config_file {
        Some(path) => println!("config file: {}", path.display()),
        None => println!("config file: (none found)"),
    }
    println!("database:    {}", cfg.db_path().display());
    println!("deepgram:    {} (key {})", cfg.deepgram.base_url, mask(&cfg.deepgram.api_key));
    println!(
        "openai:      {} model={} temp={} max_tokens={} (key {})",
        cfg.openai.base_url,
        cfg.openai.model,
        cfg.openai.temperature,
        cfg.openai.max_tokens,
        mask(&cfg.openai.api_key)
    );
    println!("capture:     {} {:?}", cfg.capture.command, cfg.capture.args);
    Ok(())
}

/// Never print credentials.
fn mask(key: &str) -> &'static str {
    if key.is_empty() {
        "unset"
    } else {
        "set"
    }
}
