pub mod ban;
pub mod banrequest;
pub mod logs;
pub mod timeout;
pub mod unban;
pub mod unmute;
pub mod warn;

pub use ban::*;
pub use banrequest::*;
pub use logs::*;
pub use timeout::*;
pub use unban::*;
pub use unmute::*;
pub use warn::*;

use crate::services::trust::Caller;
use crate::{Context, Error};

/// Resolves the invoking member's authority: trust tier plus the
/// ADMINISTRATOR permission override.
pub(crate) async fn resolve_caller(ctx: &Context<'_>) -> Option<Caller> {
    let guild_id = ctx.guild_id()?;
    let member = ctx.author_member().await?;
    Some(
        ctx.data()
            .trust
            .caller(ctx.serenity_context(), guild_id, &member)
            .await,
    )
}

/// Private (non-broadcast) response to the invoker.
pub(crate) async fn say_ephemeral(
    ctx: &Context<'_>,
    content: impl Into<String>,
) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content.into())
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
