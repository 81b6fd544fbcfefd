use chrono::Local;
use clap::Parser;
use react_on_role::{
    Args, commands::Data, config::BotCfg, database::BotDatabase, framework::framework,
};
use serenity::{Client, all::GatewayIntents};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter,
    fmt::{format::Writer, time::FormatTime},
};

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %Z"))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(true)
        .with_timer(LocalTime)
        .init();

    let args = Args::parse();
    let cfg = BotCfg::read(&args.config).expect("Failed to read configuration");
    let db = BotDatabase::new(&args.db)
        .await
        .expect("Failed to initialize database");
    info!("Database ready at {}", args.db.display());

    // Member updates need GUILD_MEMBERS and prefix commands need MESSAGE_CONTENT,
    // both privileged.
    let intents = GatewayIntents::non_privileged() | GatewayIntents::privileged();

    let token = cfg.token.to_owned();
    let mut client = Client::builder(&token, intents)
        .framework(framework(Data::new(db, cfg)))
        .await
        .expect("Err creating client");

    // Shards will automatically attempt to reconnect, and will perform exponential backoff until
    // it reconnects.
    if let Err(why) = client.start().await {
        error!("Client error: {why:?}");
    }
}
