use crate::event::EventHandled;
pub use crate::context::Context;
use anyhow::Result;

mod afd;
mod debug;
mod draw;
mod help;
mod ignore_bots;
mod ready;
mod reload;
mod timer;

#[serenity::async_trait]
pub trait Plugin: Sync + Send {
    /// Plugin name.  Used for debug and as the command name
    fn name(&self) -> &'static str;
    /// Help message line.  None if no help message
    async fn usage(&self, ctx: &Context) -> Option<String>;
    /// Potentially handle event.  Returns:
    /// - Ok(EventHandled::Yes) if the event has been handled and no other plugin should attempt to
    /// handle it
    /// - Ok(EventHandled::No) if another plugin should attempt to handle the event
    /// - Err if an error occurred
    async fn handle(&self, ctx: &Context, event: &crate::event::Event) -> Result<EventHandled>;
}

/// Ordered list of available plugins
pub fn plugins() -> Vec<Box<dyn Plugin>> {
    use crate::plugin::*;

    vec![
        // Core bot operations
        Box::new(debug::Debug),
        Box::new(ignore_bots::IgnoreBots),
        Box::new(ready::Ready),
        Box::new(help::Help),
        Box::new(reload::Reload),
        // Event and games
        Box::new(afd::Afd),
        Box::new(draw::Draw),
        Box::new(timer::Timer),
    ]
}
