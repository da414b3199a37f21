use anyhow::Context as _;
use clap::Parser as _;
use dotenvy::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

mod db;
mod modules;
mod services;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Publish commands. If no guild ID is provided, publish globally.
    #[arg(long, num_args = 0..)]
    publish: Option<Vec<u64>>,

    /// Clear all commands instead of publishing them.
    #[arg(long)]
    clear: bool,

    /// Rollback the specified number of migrations and run all migrations again.
    #[arg(long, num_args = 0..=1, default_missing_value = "1")]
    refresh_migrations: Option<u32>,
}

// Custom user data passed to all command functions
pub struct Data {
    pub records: Arc<services::records::RecordService>,
    pub punishment: Arc<services::punishment::PunishmentService>,
    pub trust: Arc<services::trust::TrustService>,
    pub ban_votes: Arc<services::ban_vote::BanVoteService>,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting quorum-guard...");

    // Establish database connection
    let db = db::establish_connection()
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    if let Some(depth) = args.refresh_migrations {
        info!("Refreshing migrations (down {}, then up)...", depth);
        db::migrations::Migrator::down(&db, Some(depth))
            .await
            .context("Failed to rollback migration")?;
    }

    db::migrations::Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;

    if args.refresh_migrations.is_some() {
        info!("Migrations refreshed successfully.");
        std::process::exit(0);
    }

    let token = serenity::Token::from_env("DISCORD_TOKEN").expect("missing DISCORD_TOKEN");
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MODERATION
        | serenity::GatewayIntents::GUILD_MEMBERS;

    // Initialize record sink
    let records = Arc::new(services::records::RecordService::new(db.clone()));

    // Initialize direct action executor
    let punishment = Arc::new(services::punishment::PunishmentService::new(records.clone()));

    // Initialize trust model
    let trust = Arc::new(services::trust::TrustService::new());

    // Initialize ban-request consensus engine
    let ban_votes = Arc::new(services::ban_vote::BanVoteService::new(
        trust.clone(),
        punishment.clone(),
    ));

    let framework_options = poise::FrameworkOptions {
        commands: modules::commands(),
        ..Default::default()
    };

    // Handle command registration if requested
    if let Some(publish_args) = args.publish {
        let http = serenity::HttpBuilder::new(token.clone()).build();
        let bot_user = http
            .get_current_user()
            .await
            .context("Failed to fetch bot user info")?;
        let application_id = bot_user.id;

        info!("Fetched Application ID: {}", application_id);

        let http = serenity::HttpBuilder::new(token.clone())
            .application_id(serenity::ApplicationId::new(application_id.get()))
            .build();

        let empty_commands = vec![];
        let commands = if args.clear {
            &empty_commands
        } else {
            &framework_options.commands
        };

        if publish_args.is_empty() {
            if args.clear {
                info!("Clearing commands globally...");
            } else {
                info!("Registering commands globally...");
            }

            if let Err(e) = poise::builtins::register_globally(&http, commands).await {
                error!("Failed to register commands globally: {}", e);
            } else {
                info!("Global command operation successful");
            }
        } else {
            for guild_id in publish_args {
                if args.clear {
                    info!("Clearing commands in guild {}...", guild_id);
                } else {
                    info!("Registering commands in guild {}...", guild_id);
                }

                if let Err(e) = poise::builtins::register_in_guild(
                    &http,
                    commands,
                    serenity::GuildId::new(guild_id),
                )
                .await
                {
                    error!("Failed to register commands in guild {}: {}", guild_id, e);
                } else {
                    info!("Guild command operation successful for guild {}", guild_id);
                }
            }
        }
        std::process::exit(0);
    }

    // Start liveness endpoint
    let liveness_port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    services::liveness::spawn(liveness_port);

    // Create the poise framework
    let framework = poise::Framework::new(framework_options);

    // Build the client with both poise framework and custom event handler
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(Box::new(framework))
        .event_handler(Arc::new(services::event_manager::Handler))
        .data(Arc::new(Data {
            records,
            punishment,
            trust,
            ban_votes,
        }) as _)
        .await
        .context("Failed to create client")?;

    info!("Bot is ready!");
    client.start().await.context("Client error")?;

    Ok(())
}
