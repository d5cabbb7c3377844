//! Miscellaneous convenience methods

use crate::context::Context;
use anyhow::Result;
use serenity::all::{
    ButtonStyle, ChannelId, CreateActionRow, CreateButton, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditMessage, GuildId, Message, RoleId, UserId,
};
use std::{collections::HashMap, future::IntoFuture, time::Duration};
use tokio::sync::Mutex;

/// How long confirmation buttons wait for an answer
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

const CONFIRM_ID: &str = "afd:confirm";
const CANCEL_ID: &str = "afd:cancel";

#[serenity::async_trait]
pub trait UserIdHelper {
    async fn nick_in_guild(&self, ctx: &Context, guild_id: Option<GuildId>) -> String;
    async fn has_role(&self, ctx: &Context, guild_id: Option<GuildId>, role_id: RoleId) -> bool;
}

#[serenity::async_trait]
impl UserIdHelper for serenity::all::UserId {
    async fn nick_in_guild(&self, ctx: &Context, guild_id: Option<GuildId>) -> String {
        let user = match self.to_user(ctx.cache_http).await {
            Ok(user) => user,
            Err(_) => return format!("<unknown-user-{}>", *self),
        };

        user.nick_in_guild(ctx, guild_id).await
    }

    async fn has_role(&self, ctx: &Context, guild_id: Option<GuildId>, role_id: RoleId) -> bool {
        // Roles only exist within a guild
        let Some(guild_id) = guild_id else {
            return false;
        };

        match guild_id.member(ctx.cache_http, *self).await {
            Ok(member) => member.roles.contains(&role_id),
            Err(_) => false,
        }
    }
}

#[serenity::async_trait]
pub trait UserHelper {
    async fn nick_in_guild(&self, ctx: &Context, guild_id: Option<GuildId>) -> String;
    async fn is_owner(&self, ctx: &Context) -> bool;
}

#[serenity::async_trait]
impl UserHelper for serenity::all::User {
    async fn nick_in_guild(&self, ctx: &Context, guild_id: Option<GuildId>) -> String {
        let nick_in_guild = match guild_id {
            Some(guild_id) => self.nick_in(ctx.cache_http, guild_id).await,
            None => None,
        };

        // May not be in a guild, e.g. DM.  Fall back to global username.
        match nick_in_guild {
            Some(nick_in_guild) => nick_in_guild,
            None => self.name.clone(),
        }
    }

    async fn is_owner(&self, ctx: &Context) -> bool {
        ctx.cfg.read().await.general.bot_owners.contains(&self.name)
    }
}

#[serenity::async_trait]
pub trait MessageHelper {
    async fn human_format_content(&self, ctx: &Context) -> Result<String>;
    async fn is_from_owner(&self, ctx: &Context) -> bool;
    async fn is_from_admin(&self, ctx: &Context) -> bool;
    async fn is_from_participant(&self, ctx: &Context) -> bool;
}

#[serenity::async_trait]
impl MessageHelper for serenity::all::Message {
    /// Convert discord-formatted message content, which may contain non-user-friendly markup, to a
    /// human-friendly format.
    ///
    /// Serenity provides a message.content_safe() method which uses global discord names rather
    /// than our preferred per-server names.  Thus, we're reimplementing the logic here with the
    /// preferred name.
    async fn human_format_content(&self, ctx: &Context) -> Result<String> {
        let mut content = self.content.clone();

        // Create a mapping from mention strings to their names
        let mut mention_map: HashMap<String, String> = HashMap::new();

        // Map user mentions (e.g. `<@!1234567890>`)
        for user in &self.mentions {
            let name = user.id.nick_in_guild(ctx, self.guild_id).await;
            mention_map.insert(format!("<@!{}>", user.id), name.clone());
            mention_map.insert(format!("<@{}>", user.id), name);
        }

        if let Some(guild) = self.guild(ctx.cache) {
            // Map role mentions (e.g. `<@&1234567890>`)
            for role_id in &self.mention_roles {
                let mention = format!("<@&{}>", role_id);

                if let Some(role) = guild.roles.get(role_id) {
                    mention_map.insert(mention, format!("@{}", role.name));
                } else {
                    mention_map.insert(mention, "@UnknownRole".to_string());
                }
            }
        }

        // Replace all mentions with their human-facing names
        for (mention, name) in mention_map {
            content = content.replace(&mention, &name);
        }

        Ok(content)
    }

    async fn is_from_owner(&self, ctx: &Context) -> bool {
        self.author.is_owner(ctx).await
    }

    async fn is_from_admin(&self, ctx: &Context) -> bool {
        let admin_role_id = ctx.cfg.read().await.afd.admin_role_id;
        self.author
            .id
            .has_role(ctx, self.guild_id, admin_role_id)
            .await
    }

    /// Event participants, plus bot owners so they can test
    async fn is_from_participant(&self, ctx: &Context) -> bool {
        let participant_role_id = ctx.cfg.read().await.afd.participant_role_id;
        self.is_from_owner(ctx).await
            || self
                .author
                .id
                .has_role(ctx, self.guild_id, participant_role_id)
                .await
    }
}

/// Ask the author of `msg` to confirm with buttons.  Only the author can answer.  Returns false
/// on cancel or timeout.
pub async fn confirm(ctx: &Context<'_>, msg: &Message, prompt: CreateEmbed) -> Result<bool> {
    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(CONFIRM_ID)
            .label("Confirm")
            .style(ButtonStyle::Success),
        CreateButton::new(CANCEL_ID)
            .label("Cancel")
            .style(ButtonStyle::Danger),
    ]);

    let mut question = msg
        .channel_id
        .send_message(
            ctx.cache_http,
            CreateMessage::new()
                .embed(prompt)
                .components(vec![buttons])
                .reference_message(msg),
        )
        .await?;

    let answer = question
        .await_component_interaction(ctx.cache_http)
        .author_id(msg.author.id)
        .timeout(CONFIRM_TIMEOUT)
        .await;

    let Some(answer) = answer else {
        question
            .edit(
                ctx.cache_http,
                EditMessage::new().content("Timed out.").components(vec![]),
            )
            .await?;
        return Ok(false);
    };

    let confirmed = answer.data.custom_id == CONFIRM_ID;
    answer
        .create_response(
            ctx.cache_http,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .content(if confirmed { "Confirmed." } else { "Cancelled." })
                    .components(vec![]),
            ),
        )
        .await?;

    Ok(confirmed)
}

/// DM `user_id`, falling back to a mention in `fallback` if their DMs are closed.  Returns
/// whether the DM went through.
pub async fn notify(
    ctx: &Context<'_>,
    user_id: UserId,
    fallback: ChannelId,
    content: &str,
) -> Result<bool> {
    let dm = user_id
        .direct_message(ctx.cache_http, CreateMessage::new().content(content))
        .await;

    if dm.is_ok() {
        return Ok(true);
    }

    fallback
        .say(
            ctx.cache_http,
            format!("<@{}> {} (Unable to DM)", user_id, content),
        )
        .await?;
    Ok(false)
}

/// Run `wait` while holding `lock`.  The lock is released however `wait` ends.
pub async fn with_prompt_lock<F: IntoFuture>(lock: &Mutex<()>, wait: F) -> F::Output {
    let _guard = lock.lock().await;
    wait.await
}

/// Wait for the next message `user_id` sends in `channel_id` and delete it.  Only one prompt
/// waits at a time, so a reply cannot be taken by the wrong prompt.
pub async fn await_next_message(
    ctx: &Context<'_>,
    user_id: UserId,
    channel_id: ChannelId,
    timeout: Duration,
) -> Result<Option<String>> {
    let lock = ctx.vstate.read().await.prompt_lock.clone();
    let reply = with_prompt_lock(
        &lock,
        channel_id
            .await_reply(ctx.cache_http)
            .author_id(user_id)
            .timeout(timeout),
    )
    .await;

    let Some(reply) = reply else {
        return Ok(None);
    };
    if let Err(err) = reply.delete(ctx.cache_http).await {
        eprintln!("Could not delete prompt reply: {}", err);
    }
    Ok(Some(reply.content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn prompts_wait_their_turn() {
        let lock = Arc::new(Mutex::new(()));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let first = tokio::spawn({
            let lock = lock.clone();
            async move { with_prompt_lock(&lock, rx).await.is_ok() }
        });
        tokio::task::yield_now().await;
        while lock.try_lock().is_ok() {
            tokio::task::yield_now().await;
        }

        // A second prompt cannot start while the first waits
        let second = with_prompt_lock(&lock, async { "second" });
        assert!(tokio::time::timeout(Duration::from_millis(50), second)
            .await
            .is_err());

        tx.send(()).unwrap();
        assert!(first.await.unwrap());
        assert_eq!(with_prompt_lock(&lock, async { "second" }).await, "second");
    }

    #[tokio::test]
    async fn timed_out_prompt_releases_the_lock() {
        let lock = Mutex::new(());
        let (_tx, rx) = tokio::sync::oneshot::channel::<()>();
        let waited = tokio::time::timeout(Duration::from_millis(20), async {
            with_prompt_lock(&lock, rx).await
        })
        .await;
        assert!(waited.is_err());
        assert!(lock.try_lock().is_ok());
    }
}
