use poise::serenity_prelude as serenity;
use thiserror::Error;

/// Failure outcomes of moderation operations, reported privately to the
/// caller. Vote rejections (already voted, ineligible) are not errors; they
/// live in [`crate::services::ban_vote::VoteOutcome`].
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("caller lacks the required trust tier")]
    Unauthorized,

    #[error("invalid duration {0:?}, expected e.g. 10s, 5m, 1h, 2d")]
    InvalidDuration(String),

    #[error("the platform refused the action")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Platform(#[from] serenity::Error),
}

impl ModerationError {
    /// Message shown to the invoking user as a private response.
    pub fn user_message(&self) -> String {
        match self {
            ModerationError::Unauthorized => {
                "You don't have permission to do that.".to_string()
            }
            ModerationError::InvalidDuration(input) => {
                format!("`{}` is not a valid duration. Use e.g. `10s`, `5m`, `1h`, `2d`.", input)
            }
            ModerationError::Forbidden => {
                "I don't have permission to perform that action.".to_string()
            }
            ModerationError::NotFound(what) => format!("{}.", what),
            ModerationError::Database(_) | ModerationError::Platform(_) => {
                "Something went wrong, please try again later.".to_string()
            }
        }
    }
}
