use crate::db::entities::punishments::ActionKind;
use crate::services::error::ModerationError;
use crate::services::records::RecordService;
use crate::services::trust::{Elevation, Issuer};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::warn;

/// Executes direct punitive actions: authorization check, best-effort DM
/// notice, history record, then the platform primitive. The record is
/// written before the primitive is confirmed, so a refused action keeps
/// its history entry.
pub struct PunishmentService {
    records: Arc<RecordService>,
}

impl PunishmentService {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }

    /// Best-effort notice to the target; delivery failures never surface.
    async fn notify(
        &self,
        http: &serenity::Http,
        user_id: serenity::UserId,
        title: &str,
        reason: &str,
    ) {
        let _ = user_id
            .direct_message(
                http,
                serenity::CreateMessage::new().content(format!("**{}**\nReason: {}", title, reason)),
            )
            .await;
    }

    pub async fn ban(
        &self,
        http: &serenity::Http,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
        issuer: &Issuer,
    ) -> Result<(), ModerationError> {
        issuer.authorize(Elevation::Elevated)?;

        self.notify(http, user_id, "You have been banned", reason).await;
        self.records
            .append(guild_id, user_id, ActionKind::Ban, None, reason, &issuer.label())
            .await?;

        guild_id
            .ban(http, user_id, 0, Some(reason))
            .await
            .map_err(|e| {
                warn!("Platform refused ban of {}: {:?}", user_id, e);
                ModerationError::Forbidden
            })?;
        Ok(())
    }

    /// Ban primitive for a resolved quorum vote; the vote already
    /// authorized the action.
    pub async fn quorum_ban(
        &self,
        http: &serenity::Http,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
        requester: serenity::UserId,
    ) -> Result<(), ModerationError> {
        self.ban(http, guild_id, user_id, reason, &Issuer::Quorum { requester })
            .await
    }

    pub async fn timeout(
        &self,
        http: &serenity::Http,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        duration: chrono::Duration,
        reason: &str,
        issuer: &Issuer,
    ) -> Result<(), ModerationError> {
        issuer.authorize(Elevation::Recognized)?;

        self.notify(
            http,
            user_id,
            &format!("You have been timed out for {} seconds", duration.num_seconds()),
            reason,
        )
        .await;
        self.records
            .append(
                guild_id,
                user_id,
                ActionKind::Timeout,
                Some(duration.num_seconds()),
                reason,
                &issuer.label(),
            )
            .await?;

        let mut member = guild_id.member(http, user_id).await?;
        member
            .disable_communication_until(http, (Utc::now() + duration).into())
            .await
            .map_err(|e| {
                warn!("Platform refused timeout of {}: {:?}", user_id, e);
                ModerationError::Forbidden
            })?;
        Ok(())
    }

    pub async fn warn(
        &self,
        http: &serenity::Http,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
        issuer: &Issuer,
    ) -> Result<(), ModerationError> {
        issuer.authorize(Elevation::Recognized)?;

        self.notify(http, user_id, "You have been warned", reason).await;
        self.records
            .append(guild_id, user_id, ActionKind::Warn, None, reason, &issuer.label())
            .await?;
        Ok(())
    }

    /// Lifts a ban. NotFound when the user is not in the guild's ban list.
    pub async fn unban(
        &self,
        http: &serenity::Http,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        issuer: &Issuer,
    ) -> Result<(), ModerationError> {
        issuer.authorize(Elevation::Elevated)?;

        let bans = guild_id.bans(http, None, None).await?;
        if !bans.iter().any(|ban| ban.user.id == user_id) {
            return Err(ModerationError::NotFound("User not found in ban list"));
        }

        guild_id
            .unban(http, user_id, Some("Unbanned by moderator"))
            .await
            .map_err(|e| {
                warn!("Platform refused unban of {}: {:?}", user_id, e);
                ModerationError::Forbidden
            })?;
        Ok(())
    }

    /// Clears a communication timeout. NotFound when the member is not
    /// currently timed out.
    pub async fn unmute(
        &self,
        http: &serenity::Http,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        issuer: &Issuer,
    ) -> Result<(), ModerationError> {
        issuer.authorize(Elevation::Recognized)?;

        let mut member = guild_id.member(http, user_id).await?;
        let timed_out = member
            .communication_disabled_until
            .is_some_and(|until| until > serenity::Timestamp::now());
        if !timed_out {
            return Err(ModerationError::NotFound("User is not timed out"));
        }

        member.enable_communication(http).await.map_err(|e| {
            warn!("Platform refused unmute of {}: {:?}", user_id, e);
            ModerationError::Forbidden
        })?;
        Ok(())
    }
}
