use crate::helper::MessageHelper;
use crate::{event::*, log_internal, plugin::*};
use anyhow::Result;

pub struct Reload;

#[serenity::async_trait]
impl Plugin for Reload {
    fn name(&self) -> &'static str {
        "reload"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{}{} - reload config and claim sheet (bot owner only)",
            prefix,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, _)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        let response = if msg.is_from_owner(ctx).await {
            ctx.cfg.write().await.reload().await?;
            ctx.sheet.write().await.refresh().await?;
            log_internal!("Reloaded configuration and claim sheet");
            "Configuration reloaded successfully"
        } else {
            "Only bot owners can reload the configuration"
        };

        msg.reply(ctx.cache_http, response).await?;
        Ok(EventHandled::Yes)
    }
}
