use crate::modules::moderation::commands::{resolve_caller, say_ephemeral};
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// View or edit a user's punishment history
#[poise::command(slash_command, guild_only, subcommands("view", "remove"))]
pub async fn logs(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// See all punishments for a user
#[poise::command(slash_command, guild_only)]
pub async fn view(
    ctx: Context<'_>,
    #[description = "User to view logs for"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();

    let allowed = resolve_caller(&ctx).await.is_some_and(|c| c.is_recognized());
    if !allowed {
        return say_ephemeral(&ctx, "You don't have permission to view punishment logs.").await;
    }

    let rows = ctx.data().records.for_user(guild_id, user.id).await?;
    if rows.is_empty() {
        return say_ephemeral(&ctx, "No logs found for this user.").await;
    }

    let entries = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            format!(
                "{}. **{}** — {} _(by {})_",
                i + 1,
                row.action_label(),
                row.reason,
                row.issuer
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    say_ephemeral(
        &ctx,
        format!("**Punishment log for <@{}>**\n{}", user.id, entries),
    )
    .await
}

/// Remove a punishment log entry by number
#[poise::command(slash_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "The user to edit logs for"] user: serenity::User,
    #[description = "The log number to remove (starts at 1)"] entry_number: u32,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();

    let allowed = resolve_caller(&ctx).await.is_some_and(|c| c.is_recognized());
    if !allowed {
        return say_ephemeral(&ctx, "You don't have permission to edit punishment logs.").await;
    }

    match ctx
        .data()
        .records
        .remove_entry(guild_id, user.id, entry_number)
        .await
    {
        Ok(row) => {
            say_ephemeral(
                &ctx,
                format!(
                    "Removed log entry #{} for <@{}>: {} - {}",
                    entry_number,
                    user.id,
                    row.action_label(),
                    row.reason
                ),
            )
            .await
        }
        Err(e) => say_ephemeral(&ctx, e.user_message()).await,
    }
}
