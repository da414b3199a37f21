use crate::db::entities::punishments::{self, ActionKind};
use crate::services::error::ModerationError;
use chrono::Utc;
use poise::serenity_prelude as serenity;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Thin adapter over the punishment history store: append, query by
/// target, delete by position.
pub struct RecordService {
    db: DatabaseConnection,
}

impl RecordService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn append(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        action: ActionKind,
        duration_secs: Option<i64>,
        reason: &str,
        issuer: &str,
    ) -> Result<(), ModerationError> {
        let model = punishments::ActiveModel {
            guild_id: Set(guild_id.get() as i64),
            user_id: Set(user_id.get() as i64),
            action: Set(action),
            duration_secs: Set(duration_secs),
            reason: Set(reason.to_string()),
            issuer: Set(issuer.to_string()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    /// Full punishment history for a user, oldest first.
    pub async fn for_user(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<Vec<punishments::Model>, ModerationError> {
        let rows = punishments::Entity::find()
            .filter(punishments::Column::GuildId.eq(guild_id.get() as i64))
            .filter(punishments::Column::UserId.eq(user_id.get() as i64))
            .order_by_asc(punishments::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Removes the entry at a 1-based position within the user's ordered
    /// log and returns it.
    pub async fn remove_entry(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        entry_number: u32,
    ) -> Result<punishments::Model, ModerationError> {
        let rows = self.for_user(guild_id, user_id).await?;
        if entry_number == 0 || entry_number as usize > rows.len() {
            return Err(ModerationError::NotFound("Invalid log entry number"));
        }

        let row = rows[entry_number as usize - 1].clone();
        punishments::Entity::delete_by_id(row.id)
            .exec(&self.db)
            .await?;
        Ok(row)
    }
}
