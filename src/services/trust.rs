use crate::services::error::ModerationError;
use poise::serenity_prelude as serenity;

const OWNER_ROLE: &str = "owner";
const ADMINISTRATOR_ROLE: &str = "administrator";
const MODERATOR_ROLE: &str = "moderator";
const TRAINEE_ROLE: &str = "trainee";

/// Trust tier derived from a member's role set. Trainee is recognized but
/// carries no vote weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrustTier {
    Unrecognized,
    Trainee,
    Moderator,
    Administrator,
    Owner,
}

impl TrustTier {
    /// Vote weight carried by this tier.
    pub fn weight(self) -> u32 {
        match self {
            TrustTier::Owner => 3,
            TrustTier::Administrator => 2,
            TrustTier::Moderator => 1,
            TrustTier::Trainee | TrustTier::Unrecognized => 0,
        }
    }

    fn from_role_name(name: &str) -> TrustTier {
        match name.to_lowercase().as_str() {
            OWNER_ROLE => TrustTier::Owner,
            ADMINISTRATOR_ROLE => TrustTier::Administrator,
            MODERATOR_ROLE => TrustTier::Moderator,
            TRAINEE_ROLE => TrustTier::Trainee,
            _ => TrustTier::Unrecognized,
        }
    }
}

/// Maps a role set to a trust tier. Highest-ranking qualifying role wins;
/// unrecognized roles contribute nothing.
pub fn tier_for_role_names<I, S>(names: I) -> TrustTier
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| TrustTier::from_role_name(name.as_ref()))
        .max()
        .unwrap_or(TrustTier::Unrecognized)
}

/// A command invoker's authority: trust tier plus the platform
/// ADMINISTRATOR permission override.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub id: serenity::UserId,
    pub tier: TrustTier,
    pub admin_override: bool,
}

impl Caller {
    /// Sufficient for direct ban/unban.
    pub fn is_elevated(&self) -> bool {
        self.admin_override || self.tier >= TrustTier::Moderator
    }

    /// Sufficient for warn/timeout/unmute and for opening a ban request.
    pub fn is_recognized(&self) -> bool {
        self.admin_override || self.tier >= TrustTier::Trainee
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    Recognized,
    Elevated,
}

/// Who a punitive action is issued by. Quorum issuance bypasses the tier
/// check: the vote already authorized the action.
#[derive(Debug, Clone)]
pub enum Issuer {
    Member(Caller),
    Quorum { requester: serenity::UserId },
}

impl Issuer {
    pub fn authorize(&self, required: Elevation) -> Result<(), ModerationError> {
        match self {
            Issuer::Quorum { .. } => Ok(()),
            Issuer::Member(caller) => {
                let allowed = match required {
                    Elevation::Elevated => caller.is_elevated(),
                    Elevation::Recognized => caller.is_recognized(),
                };
                if allowed {
                    Ok(())
                } else {
                    Err(ModerationError::Unauthorized)
                }
            }
        }
    }

    /// Label recorded in the punishment log.
    pub fn label(&self) -> String {
        match self {
            Issuer::Member(caller) => format!("<@{}>", caller.id),
            Issuer::Quorum { requester } => {
                format!("quorum (requested by <@{}>)", requester)
            }
        }
    }
}

pub struct TrustService;

impl TrustService {
    pub fn new() -> Self {
        Self
    }

    /// Resolves a member's trust tier from their current guild roles,
    /// cache-first with an HTTP fallback. Weight is always live: a
    /// promotion or demotion takes effect on the next vote.
    pub async fn member_tier(
        &self,
        ctx: &serenity::Context,
        guild_id: serenity::GuildId,
        member: &serenity::Member,
    ) -> TrustTier {
        // The cache guard must not be held across the HTTP fallback.
        let cached = ctx.cache.guild(guild_id).map(|g| g.roles.clone());
        let roles = match cached {
            Some(roles) => roles,
            None => guild_id.roles(&ctx.http).await.unwrap_or_default(),
        };

        let names: Vec<String> = member
            .roles
            .iter()
            .filter_map(|r| roles.get(r))
            .map(|role| role.name.to_string())
            .collect();

        tier_for_role_names(&names)
    }

    /// Resolves a command invoker's full authority.
    pub async fn caller(
        &self,
        ctx: &serenity::Context,
        guild_id: serenity::GuildId,
        member: &serenity::Member,
    ) -> Caller {
        let tier = self.member_tier(ctx, guild_id, member).await;
        let admin_override = member
            .permissions
            .map_or(false, |p| p.contains(serenity::Permissions::ADMINISTRATOR));

        Caller {
            id: member.user.id,
            tier,
            admin_override,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(tier: TrustTier) -> Caller {
        Caller {
            id: serenity::UserId::new(1),
            tier,
            admin_override: false,
        }
    }

    #[test]
    fn highest_ranking_role_wins() {
        assert_eq!(
            tier_for_role_names(["trainee", "moderator", "administrator"]),
            TrustTier::Administrator
        );
        assert_eq!(tier_for_role_names(["owner", "moderator"]), TrustTier::Owner);
    }

    #[test]
    fn role_names_match_case_insensitively() {
        assert_eq!(tier_for_role_names(["Moderator"]), TrustTier::Moderator);
        assert_eq!(tier_for_role_names(["OWNER"]), TrustTier::Owner);
    }

    #[test]
    fn unrecognized_roles_contribute_nothing() {
        assert_eq!(tier_for_role_names(["member", "vip"]), TrustTier::Unrecognized);
        assert_eq!(tier_for_role_names(Vec::<&str>::new()), TrustTier::Unrecognized);
    }

    #[test]
    fn weights_follow_tier_precedence() {
        assert_eq!(TrustTier::Owner.weight(), 3);
        assert_eq!(TrustTier::Administrator.weight(), 2);
        assert_eq!(TrustTier::Moderator.weight(), 1);
        assert_eq!(TrustTier::Trainee.weight(), 0);
        assert_eq!(TrustTier::Unrecognized.weight(), 0);
    }

    #[test]
    fn trainee_is_recognized_but_not_elevated() {
        let c = caller(TrustTier::Trainee);
        assert!(c.is_recognized());
        assert!(!c.is_elevated());
    }

    #[test]
    fn admin_override_grants_elevation_without_roles() {
        let mut c = caller(TrustTier::Unrecognized);
        assert!(!c.is_recognized());
        c.admin_override = true;
        assert!(c.is_elevated());
    }

    #[test]
    fn trainee_issuer_cannot_ban_directly() {
        let issuer = Issuer::Member(caller(TrustTier::Trainee));
        assert!(matches!(
            issuer.authorize(Elevation::Elevated),
            Err(ModerationError::Unauthorized)
        ));
        assert!(issuer.authorize(Elevation::Recognized).is_ok());
    }

    #[test]
    fn quorum_issuer_bypasses_tier_check() {
        let issuer = Issuer::Quorum {
            requester: serenity::UserId::new(42),
        };
        assert!(issuer.authorize(Elevation::Elevated).is_ok());
        assert_eq!(issuer.label(), "quorum (requested by <@42>)");
    }
}
