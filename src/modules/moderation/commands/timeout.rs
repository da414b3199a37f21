use crate::modules::moderation::commands::{resolve_caller, say_ephemeral};
use crate::modules::moderation::duration_parser::parse_duration;
use crate::services::error::ModerationError;
use crate::services::trust::Issuer;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Timeout a user
#[poise::command(slash_command, guild_only)]
pub async fn timeout(
    ctx: Context<'_>,
    #[description = "User to timeout"] user: serenity::User,
    #[description = "Duration of the timeout (e.g. 10s, 5m, 1h, 2d)"] duration: String,
    #[description = "Reason for the timeout"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();

    let Some(caller) = resolve_caller(&ctx).await else {
        return say_ephemeral(&ctx, "You don't have permission to timeout users.").await;
    };

    // Parsed before any side effect.
    let Some(dur) = parse_duration(&duration) else {
        return say_ephemeral(&ctx, ModerationError::InvalidDuration(duration).user_message())
            .await;
    };

    let timeout_reason = reason.unwrap_or_else(|| "No reason provided".to_string());

    match ctx
        .data()
        .punishment
        .timeout(
            ctx.http(),
            guild_id,
            user.id,
            dur,
            &timeout_reason,
            &Issuer::Member(caller),
        )
        .await
    {
        Ok(()) => {
            say_ephemeral(
                &ctx,
                format!(
                    "<@{}> has been timed out for {} seconds.",
                    user.id,
                    dur.num_seconds()
                ),
            )
            .await
        }
        Err(e) => say_ephemeral(&ctx, e.user_message()).await,
    }
}
