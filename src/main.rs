mod afd;
mod config;
mod context;
mod draw;
mod error;
mod event;
mod handler;
mod helper;
mod logging;
mod plugin;
mod volatile_state;

use serenity::{all::GatewayIntents, Client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = crate::config::Config::load().await?;
    let token = cfg.general.discord_token.clone();
    let store = crate::afd::store::FileStore::new(cfg.sheet_path()?);
    let sheet = crate::afd::Sheet::load(Box::new(store)).await?;
    let vstate = crate::volatile_state::VolatileState::new().await;
    let handler = handler::Handler::new(cfg, sheet, vstate);

    // Things we want discord to tell us about.
    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_EMOJIS_AND_STICKERS
        | GatewayIntents::MESSAGE_CONTENT;

    Client::builder(&token, intents)
        .event_handler(handler)
        .await?
        .start()
        .await
        .map_err(Into::into)
}
