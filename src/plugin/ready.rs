use crate::{event::*, log_internal, plugin::*};
use anyhow::Result;

/// Checks shared state once the connection to Discord is ready.
pub struct Ready;

#[serenity::async_trait]
impl Plugin for Ready {
    fn name(&self) -> &'static str {
        "ready"
    }

    async fn usage(&self, _ctx: &Context) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Ready(_) = event else {
            return Ok(EventHandled::No);
        };

        // Pick up edits made to the sheet while the bot was offline
        let mut sheet = ctx.sheet.write().await;
        sheet.refresh().await?;
        log_internal!("Claim sheet has {} pokemon", sheet.rows().len());

        Ok(EventHandled::Yes)
    }
}
