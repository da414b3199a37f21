use crate::services::punishment::PunishmentService;
use crate::services::trust::{self, TrustService};
use crate::{Data, Error};
use futures::StreamExt as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{info, warn};

pub mod session;

pub use session::{QUORUM, SessionState, VoteChoice, VoteOutcome, VotingSession};

/// How many vote prompts are in flight at once during fan-out.
const FAN_OUT_CONCURRENCY: usize = 8;

/// Owns every active ban-request voting session. All interaction with a
/// session goes through this service; nothing else reads or mutates vote
/// state.
pub struct BanVoteService {
    sessions: session::SessionTable,
    trust: Arc<TrustService>,
    punishment: Arc<PunishmentService>,
}

impl BanVoteService {
    pub fn new(trust: Arc<TrustService>, punishment: Arc<PunishmentService>) -> Self {
        Self {
            sessions: session::SessionTable::new(),
            trust,
            punishment,
        }
    }

    /// Opens a ban request and fans out vote prompts in the background.
    /// Returns as soon as the session exists; prompt delivery is
    /// best-effort, bounded, and isolated per member.
    pub fn open_request(
        &self,
        ctx: &serenity::Context,
        guild_id: serenity::GuildId,
        channel_id: u64,
        requester: serenity::UserId,
        target: serenity::UserId,
        reason: String,
    ) -> VotingSession {
        let session = self.sessions.open(
            guild_id.get(),
            channel_id,
            requester.get(),
            target.get(),
            reason,
        );

        let ctx = ctx.clone();
        let fan_out_session = session.clone();
        tokio::spawn(async move {
            fan_out(ctx, fan_out_session).await;
        });

        session
    }

    /// Applies a vote event from a prompt interaction. The voter's weight
    /// is resolved live, before the session lock is touched.
    pub async fn vote(
        &self,
        ctx: &serenity::Context,
        target: u64,
        session_id: u64,
        voter: serenity::UserId,
        choice: VoteChoice,
    ) -> VoteOutcome {
        let Some(snapshot) = self.sessions.get(target) else {
            return VoteOutcome::Closed;
        };
        if snapshot.id != session_id {
            return VoteOutcome::Closed;
        }

        let guild_id = serenity::GuildId::new(snapshot.guild_id);
        let weight = match guild_id.member(&ctx.http, voter).await {
            Ok(member) => self.trust.member_tier(ctx, guild_id, &member).await.weight(),
            // No longer a guild member: no say in the vote.
            Err(_) => 0,
        };

        self.sessions
            .cast_vote(target, session_id, voter.get(), weight, choice)
    }

    /// Performs the terminal action for a resolved session and broadcasts
    /// the outcome to the channel the request was opened in. The session
    /// is already gone from the table; a failed platform ban only changes
    /// the notice.
    pub async fn finalize(&self, ctx: &serenity::Context, session: VotingSession) {
        let target = serenity::UserId::new(session.target);

        let notice = match session.state {
            SessionState::Executed => {
                let result = self
                    .punishment
                    .quorum_ban(
                        &ctx.http,
                        serenity::GuildId::new(session.guild_id),
                        target,
                        &session.reason,
                        serenity::UserId::new(session.requester),
                    )
                    .await;

                match result {
                    Ok(()) => format!(
                        "The ban request against <@{}> passed with weight {}. They have been banned.\nReason: {}",
                        target, session.ban_weight, session.reason
                    ),
                    Err(e) => {
                        warn!("Quorum ban of {} failed: {:?}", target, e);
                        format!(
                            "The ban request against <@{}> passed, but the ban could not be executed.",
                            target
                        )
                    }
                }
            }
            SessionState::Cancelled => format!(
                "The ban request against <@{}> was cancelled with weight {}.",
                target, session.cancel_weight
            ),
            SessionState::Open => return,
        };

        let channel_id = serenity::ChannelId::new(session.channel_id);
        let message = serenity::CreateMessage::new().content(notice);
        if let Err(e) = ctx
            .http
            .send_message(channel_id.into(), Vec::new(), &message)
            .await
        {
            warn!("Failed to broadcast ban-vote resolution: {:?}", e);
        }
    }
}

/// Sends the vote prompt to every guild member with a positive trust
/// weight. One member's undeliverable inbox never aborts the rest.
async fn fan_out(ctx: serenity::Context, session: VotingSession) {
    let guild_id = serenity::GuildId::new(session.guild_id);

    let members = match guild_id.members(&ctx.http, None, None).await {
        Ok(members) => members,
        Err(e) => {
            warn!("Failed to list members for ban-vote fan-out: {:?}", e);
            return;
        }
    };

    // The cache guard must not be held across the HTTP fallback.
    let cached = ctx.cache.guild(guild_id).map(|g| g.roles.clone());
    let roles = match cached {
        Some(roles) => roles,
        None => guild_id.roles(&ctx.http).await.unwrap_or_default(),
    };

    let eligible: Vec<serenity::UserId> = members
        .iter()
        .filter(|member| !member.user.bot())
        .filter(|member| {
            let names: Vec<String> = member
                .roles
                .iter()
                .filter_map(|r| roles.get(r))
                .map(|role| role.name.to_string())
                .collect();
            trust::tier_for_role_names(&names).weight() > 0
        })
        .map(|member| member.user.id)
        .collect();

    info!(
        "Ban request {} for user {}: prompting {} eligible voters",
        session.id,
        session.target,
        eligible.len()
    );

    futures::stream::iter(eligible)
        .for_each_concurrent(FAN_OUT_CONCURRENCY, |user_id| {
            let session = &session;
            let http = &ctx.http;
            async move {
                let buttons = vec![
                    serenity::CreateButton::new(format!(
                        "banvote_approve_{}_{}",
                        session.target, session.id
                    ))
                    .label("Approve ban")
                    .style(serenity::ButtonStyle::Danger),
                    serenity::CreateButton::new(format!(
                        "banvote_reject_{}_{}",
                        session.target, session.id
                    ))
                    .label("Reject")
                    .style(serenity::ButtonStyle::Secondary),
                ];

                let message = serenity::CreateMessage::new()
                    .content(format!(
                        "**Ban request**\n<@{}> requests a ban of <@{}>.\nReason: {}\nThe request resolves once either side reaches weight {}.",
                        session.requester, session.target, session.reason, QUORUM
                    ))
                    .components(vec![serenity::CreateComponent::ActionRow(
                        serenity::CreateActionRow::Buttons(buttons.into()),
                    )]);

                let _ = user_id.direct_message(http, message).await;
            }
        })
        .await;
}

/// Routes a `banvote_` component interaction: casts the vote, answers the
/// voter privately, then performs any terminal action. Broadcast happens
/// after the voter response, never under the session lock.
pub async fn handle_interaction(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let custom_id = &interaction.data.custom_id;
    let Some(rest) = custom_id.strip_prefix("banvote_") else {
        return Ok(());
    };
    let (choice, token) = if let Some(token) = rest.strip_prefix("approve_") {
        (VoteChoice::Approve, token)
    } else if let Some(token) = rest.strip_prefix("reject_") {
        (VoteChoice::Reject, token)
    } else {
        return Ok(());
    };
    let Some((target, session_id)) = parse_vote_token(token) else {
        return Ok(());
    };

    let outcome = data
        .ban_votes
        .vote(ctx, target, session_id, interaction.user.id, choice)
        .await;

    let content = match &outcome {
        VoteOutcome::Closed => "This ban vote is no longer active.".to_string(),
        VoteOutcome::AlreadyVoted => "You have already voted on this request.".to_string(),
        VoteOutcome::Ineligible => "You are not eligible to vote on ban requests.".to_string(),
        VoteOutcome::Progress {
            ban_weight,
            cancel_weight,
        } => format!(
            "Vote recorded. Ban {}/{}, cancel {}/{}.",
            ban_weight, QUORUM, cancel_weight, QUORUM
        ),
        VoteOutcome::Resolved(_) => "Vote recorded. The request has been resolved.".to_string(),
    };

    interaction
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new().content(content),
            ),
        )
        .await?;

    if let VoteOutcome::Resolved(session) = outcome {
        data.ban_votes.finalize(ctx, session).await;
    }

    Ok(())
}

fn parse_vote_token(token: &str) -> Option<(u64, u64)> {
    let (target, session_id) = token.split_once('_')?;
    Some((target.parse().ok()?, session_id.parse().ok()?))
}
