use std::path::Path;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

pub struct BotDatabase {
    db: DatabaseConnection,
}

impl BotDatabase {
    /// Opens (creating if needed) the SQLite file at `path` and brings its schema up to date.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, DbErr> {
        let database_url = format!("sqlite://{}?mode=rwc", path.as_ref().display());
        let db = Database::connect(&database_url).await?;
        Migrator::up(&db, None).await?;

        Ok(BotDatabase { db })
    }

    pub async fn new_memory() -> Result<Self, DbErr> {
        // every connection to `sqlite::memory:` would see its own empty database
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await?;
        Migrator::up(&db, None).await?;
        Ok(BotDatabase { db })
    }

    pub fn inner(&self) -> &DatabaseConnection {
        &self.db
    }
}
