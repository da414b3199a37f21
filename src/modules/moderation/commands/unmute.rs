use crate::modules::moderation::commands::{resolve_caller, say_ephemeral};
use crate::services::trust::Issuer;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Unmute a user
#[poise::command(slash_command, guild_only)]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "User to unmute"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();

    let Some(caller) = resolve_caller(&ctx).await else {
        return say_ephemeral(&ctx, "You don't have permission to unmute users.").await;
    };

    match ctx
        .data()
        .punishment
        .unmute(ctx.http(), guild_id, user.id, &Issuer::Member(caller))
        .await
    {
        Ok(()) => say_ephemeral(&ctx, format!("<@{}> has been unmuted.", user.id)).await,
        Err(e) => say_ephemeral(&ctx, e.user_message()).await,
    }
}
