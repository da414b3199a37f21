use crate::modules::moderation::commands::{resolve_caller, say_ephemeral};
use crate::services::trust::Issuer;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Ban a user with a reason
#[poise::command(slash_command, guild_only)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "User to ban"] user: serenity::User,
    #[description = "Reason for the ban"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();

    let Some(caller) = resolve_caller(&ctx).await else {
        return say_ephemeral(&ctx, "You don't have permission to ban users.").await;
    };

    let ban_reason = reason.unwrap_or_else(|| "No reason provided".to_string());

    match ctx
        .data()
        .punishment
        .ban(
            ctx.http(),
            guild_id,
            user.id,
            &ban_reason,
            &Issuer::Member(caller),
        )
        .await
    {
        Ok(()) => say_ephemeral(&ctx, format!("<@{}> has been banned.", user.id)).await,
        Err(e) => say_ephemeral(&ctx, e.user_message()).await,
    }
}
