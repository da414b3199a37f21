use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ActionKind {
    #[sea_orm(string_value = "ban")]
    Ban,
    #[sea_orm(string_value = "timeout")]
    Timeout,
    #[sea_orm(string_value = "warn")]
    Warn,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Ban => write!(f, "Ban"),
            ActionKind::Timeout => write!(f, "Timeout"),
            ActionKind::Warn => write!(f, "Warn"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Eq)]
#[sea_orm(table_name = "punishments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    pub user_id: i64,
    pub action: ActionKind,
    /// Set only for timeouts.
    pub duration_secs: Option<i64>,
    pub reason: String,
    pub issuer: String,
    pub created_at: DateTime,
}

impl Model {
    /// Human-readable action label, e.g. "Timeout (600s)".
    pub fn action_label(&self) -> String {
        match (self.action, self.duration_secs) {
            (ActionKind::Timeout, Some(secs)) => format!("Timeout ({}s)", secs),
            (action, _) => action.to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_label_includes_timeout_duration() {
        let model = Model {
            id: 1,
            guild_id: 1,
            user_id: 2,
            action: ActionKind::Timeout,
            duration_secs: Some(600),
            reason: "spam".into(),
            issuer: "<@3>".into(),
            created_at: chrono::NaiveDateTime::default(),
        };
        assert_eq!(model.action_label(), "Timeout (600s)");
    }

    #[test]
    fn action_label_plain_for_ban_and_warn() {
        let model = Model {
            id: 1,
            guild_id: 1,
            user_id: 2,
            action: ActionKind::Ban,
            duration_secs: None,
            reason: "spam".into(),
            issuer: "<@3>".into(),
            created_at: chrono::NaiveDateTime::default(),
        };
        assert_eq!(model.action_label(), "Ban");
    }
}
