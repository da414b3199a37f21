use crate::modules::moderation::commands::{resolve_caller, say_ephemeral};
use crate::services::ban_vote::QUORUM;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Request a ban that must be ratified by weighted vote
#[poise::command(slash_command, guild_only)]
pub async fn banrequest(
    ctx: Context<'_>,
    #[description = "User to ban"] user: serenity::User,
    #[description = "Reason for the ban request"] reason: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();

    let allowed = resolve_caller(&ctx).await.is_some_and(|c| c.is_recognized());
    if !allowed {
        return say_ephemeral(&ctx, "You don't have permission to open ban requests.").await;
    }

    ctx.data().ban_votes.open_request(
        ctx.serenity_context(),
        guild_id,
        ctx.channel_id().get(),
        ctx.author().id,
        user.id,
        reason,
    );

    say_ephemeral(
        &ctx,
        format!(
            "Ban request against <@{}> opened. Eligible voters are being prompted; weight {} on either side resolves it.",
            user.id, QUORUM
        ),
    )
    .await
}
