use snafu::Snafu;

#[derive(Snafu, Debug)]
pub enum BotError {
    #[snafu(transparent)]
    SerenityError { source: serenity::Error },
    #[snafu(transparent)]
    StorageError { source: sea_orm::DbErr },
    #[snafu(display("`{emote}` is not a valid reaction emote"), visibility(pub(crate)))]
    InvalidEmote { emote: String },
    #[snafu(whatever, display("{message}"))]
    GenericError {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
