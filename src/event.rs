//! The Serenity crate we're using for the Discord API is designed around callbacks to handle
//! events.  However, this does not mesh well with our plugin framework here.  To resolve this,
//! the handler translates the callbacks into a distinct Event enum.

use crate::context::Context;
use serenity::all::{Interaction, Message, Ready};

/// A Discord event
pub enum Event {
    Ready(Ready),
    Message(Message),
    /// Button presses and select menu choices
    Interaction(Interaction),
}

impl Event {
    // When an event occurs, iterate over all the plugins to see if any can/should handle it.
    pub async fn handle(self, ctx: Context<'_>) {
        for plugin in crate::plugin::plugins() {
            match plugin.handle(&ctx, &self).await {
                Ok(EventHandled::Yes) => return,
                Ok(EventHandled::No) => continue,
                Err(err) => eprintln!("Error in plugin {}: {}", plugin.name(), err),
            }
        }
    }

    // Check if a message should be interpreted as a special bot command.
    //
    // These are prefixed with the configured prefix, e. g. `;cmd foo bar baz`.  Returns the message
    // and the remaining whitespace-separated arguments.
    pub async fn is_bot_cmd(&self, ctx: &Context<'_>, cmd: &str) -> Option<(&Message, Vec<&str>)> {
        let Event::Message(msg) = self else {
            return None;
        };

        let mut words = msg.content.split_ascii_whitespace();
        let first = words.next()?;
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        if first.strip_prefix(prefix.as_str()) != Some(cmd) {
            return None;
        }

        Some((msg, words.collect()))
    }
}

pub enum EventHandled {
    Yes,
    No,
}
