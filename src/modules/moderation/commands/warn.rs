use crate::modules::moderation::commands::{resolve_caller, say_ephemeral};
use crate::services::trust::Issuer;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Warn a user with a reason
#[poise::command(slash_command, guild_only)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "User to warn"] user: serenity::User,
    #[description = "Reason for the warning"] reason: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();

    let Some(caller) = resolve_caller(&ctx).await else {
        return say_ephemeral(&ctx, "You don't have permission to warn users.").await;
    };

    match ctx
        .data()
        .punishment
        .warn(
            ctx.http(),
            guild_id,
            user.id,
            &reason,
            &Issuer::Member(caller),
        )
        .await
    {
        Ok(()) => say_ephemeral(&ctx, format!("<@{}> has been warned.", user.id)).await,
        Err(e) => say_ephemeral(&ctx, e.user_message()).await,
    }
}
