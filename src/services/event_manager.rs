use crate::Data;
use poise::serenity_prelude as serenity;
use tracing::{error, info};

/// Custom event handler for non-command Discord events
pub struct Handler;

#[serenity::async_trait]
impl serenity::EventHandler for Handler {
    async fn dispatch(&self, ctx: &serenity::Context, event: &serenity::FullEvent) {
        match event {
            serenity::FullEvent::Ready { data_about_bot, .. } => {
                info!("Logged in as {}", data_about_bot.user.name);
            }
            serenity::FullEvent::GuildCreate { guild, is_new, .. } => {
                if is_new.unwrap_or(false) {
                    info!("Joined new guild: {} ({})", guild.name, guild.id);
                }
            }
            serenity::FullEvent::GuildDelete { incomplete, .. } => {
                info!("Left guild: {}", incomplete.id);
            }
            serenity::FullEvent::GuildMemberAddition { new_member, .. } => {
                if let Err(e) =
                    crate::modules::welcome::events::handle_member_join(ctx, new_member).await
                {
                    error!("Error handling member join: {:?}", e);
                }
            }
            serenity::FullEvent::InteractionCreate { interaction, .. } => {
                handle_interactions(ctx, interaction).await;
            }
            _ => {}
        }
    }
}

async fn handle_interactions(ctx: &serenity::Context, interaction: &serenity::Interaction) {
    if let serenity::Interaction::Component(component_interaction) = interaction {
        let data = ctx.data::<Data>().clone();
        let ctx = ctx.clone();
        let component_interaction = component_interaction.clone();

        tokio::spawn(async move {
            let custom_id = &component_interaction.data.custom_id;

            if custom_id.starts_with("banvote_") {
                if let Err(e) = crate::services::ban_vote::handle_interaction(
                    &ctx,
                    &component_interaction,
                    &data,
                )
                .await
                {
                    error!("Error handling ban-vote interaction: {:?}", e);
                }
            }
        });
    }
}
