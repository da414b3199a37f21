use crate::Error;
use poise::serenity_prelude as serenity;

/// Greets a new member. Delivery is best-effort: members with closed DMs
/// are simply not greeted.
pub async fn handle_member_join(
    ctx: &serenity::Context,
    member: &serenity::Member,
) -> Result<(), Error> {
    let _ = member
        .user
        .id
        .direct_message(
            &ctx.http,
            serenity::CreateMessage::new().content(format!(
                "Welcome to the server, {}! Please take a moment to read the rules.",
                member.user.name
            )),
        )
        .await;
    Ok(())
}
