use crate::{event::*, plugin::*};
use anyhow::Result;
use serenity::all::{CreateEmbed, CreateEmbedFooter, CreateMessage};

/// Lists every command
pub struct Help;

#[serenity::async_trait]
impl Plugin for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{}{} - show this help message",
            prefix,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, _)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        // Usage lines can contain markdown characters, so keep them in a code block
        let mut embed = CreateEmbed::new().title("Commands");
        for plugin in crate::plugin::plugins() {
            if let Some(usage) = plugin.usage(ctx).await {
                embed = embed.field(plugin.name(), format!("```\n{}\n```", usage), false);
            }
        }
        embed = embed.footer(CreateEmbedFooter::new(
            "Arguments in <> are required, arguments in [] are optional",
        ));

        msg.channel_id
            .send_message(
                ctx.cache_http,
                CreateMessage::new().embed(embed).reference_message(msg),
            )
            .await?;
        Ok(EventHandled::Yes)
    }
}
