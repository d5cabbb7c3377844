use crate::{event::*, log_internal, logging::*, plugin::*};
use anyhow::Result;
use serenity::all::{
    ButtonStyle, ComponentInteraction, CreateActionRow, CreateButton, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditMessage, Interaction, Message,
    ReactionType,
};
use std::{ops::RangeInclusive, time::Duration};
use tokio::sync::oneshot;

/// Countdown timers with a Stop button
pub struct Timer;

const SECONDS: RangeInclusive<u64> = 1..=600;
const STOP_ID: &str = "timer:stop";

#[serenity::async_trait]
impl Plugin for Timer {
    fn name(&self) -> &'static str {
        "timer"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{prefix}timer start <seconds> - count down, at most {} seconds, one per user\n\
             {prefix}timer stop - stop your running timer",
            SECONDS.end()
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        if let Event::Interaction(Interaction::Component(component)) = event {
            if component.data.custom_id != STOP_ID {
                return Ok(EventHandled::No);
            }
            stop_button(ctx, component).await?;
            return Ok(EventHandled::Yes);
        }

        let Some((msg, args)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        match args.as_slice() {
            ["start", seconds] => match seconds.parse::<u64>() {
                Ok(seconds) if SECONDS.contains(&seconds) => start(ctx, msg, seconds).await?,
                _ => {
                    msg.reply(
                        ctx.cache_http,
                        format!(
                            "Timer can be set for {} to {} seconds (max **{}** minutes).",
                            SECONDS.start(),
                            SECONDS.end(),
                            minutes(*SECONDS.end())
                        ),
                    )
                    .await?;
                }
            },
            ["stop"] => stop(ctx, msg).await?,
            _ => {
                let prefix = ctx.cfg.read().await.general.command_prefix.clone();
                msg.reply(
                    ctx.cache_http,
                    format!("Usage: `{0}timer start <seconds>` or `{0}timer stop`", prefix),
                )
                .await?;
            }
        }

        Ok(EventHandled::Yes)
    }
}

/// Minutes rounded to two decimals, for messages
fn minutes(seconds: u64) -> f64 {
    (seconds as f64 / 60.0 * 100.0).round() / 100.0
}

fn stopped_text(user: &str, remaining: u64, total: u64) -> String {
    format!(
        "{} timer stopped! Stopped at {}mins/{}seconds **out of** {}mins/{}seconds",
        user,
        minutes(remaining),
        remaining,
        minutes(total),
        total
    )
}

fn finished_text(user: &str, total: u64) -> String {
    format!(
        "{} time's up! ({}mins or {}seconds)",
        user,
        minutes(total),
        total
    )
}

async fn start(ctx: &Context<'_>, msg: &Message, seconds: u64) -> Result<()> {
    if ctx.vstate.read().await.timers.is_running(msg.author.id) {
        msg.reply(
            ctx.cache_http,
            "You already have a timer running. Stop it first.",
        )
        .await?;
        return Ok(());
    }

    let stop_button = CreateActionRow::Buttons(vec![CreateButton::new(STOP_ID)
        .label("Stop")
        .style(ButtonStyle::Danger)]);
    let mut countdown = msg
        .channel_id
        .send_message(
            ctx.cache_http,
            CreateMessage::new()
                .content(format!("Timer: {} seconds.", seconds))
                .components(vec![stop_button]),
        )
        .await?;

    let (stop_tx, stop_rx) = oneshot::channel();
    // Another start may have slipped in while the message was being sent
    if !ctx
        .vstate
        .write()
        .await
        .timers
        .start(msg.author.id, countdown.id, stop_tx)
    {
        countdown.delete(ctx.cache_http).await?;
        return Ok(());
    }

    log_internal!(
        "{} started a {} second timer",
        msg.author.color(),
        seconds
    );

    let result = count_down(ctx, msg, &mut countdown, seconds, stop_rx).await;
    ctx.vstate
        .write()
        .await
        .timers
        .finish(msg.author.id, countdown.id);
    result
}

async fn count_down(
    ctx: &Context<'_>,
    msg: &Message,
    countdown: &mut Message,
    seconds: u64,
    mut stop_rx: oneshot::Receiver<()>,
) -> Result<()> {
    let mention = format!("<@{}>", msg.author.id);
    let mut remaining = seconds;

    let text = loop {
        tokio::select! {
            _ = &mut stop_rx => break stopped_text(&mention, remaining, seconds),
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
        }

        remaining -= 1;
        if remaining == 0 {
            break finished_text(&mention, seconds);
        }

        countdown
            .edit(
                ctx.cache_http,
                EditMessage::new().content(format!("Timer: {} seconds.", remaining)),
            )
            .await?;
    };

    countdown
        .edit(ctx.cache_http, EditMessage::new().content(text).components(vec![]))
        .await?;
    Ok(())
}

async fn stop(ctx: &Context<'_>, msg: &Message) -> Result<()> {
    if ctx.vstate.write().await.timers.stop(msg.author.id) {
        msg.react(ctx.cache_http, ReactionType::Unicode("👍".to_owned()))
            .await?;
    } else {
        msg.reply(
            ctx.cache_http,
            "There isn't a `timer` running that belongs to you.",
        )
        .await?;
    }
    Ok(())
}

async fn stop_button(ctx: &Context<'_>, component: &ComponentInteraction) -> Result<()> {
    let mut vstate = ctx.vstate.write().await;
    let owner = vstate.timers.owner_of(component.message.id);

    let response = if owner == Some(component.user.id) {
        vstate.timers.stop(component.user.id);
        CreateInteractionResponse::Acknowledge
    } else {
        CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content("This timer does not belong to you.")
                .ephemeral(true),
        )
    };
    drop(vstate);

    component.create_response(ctx.cache_http, response).await?;
    Ok(())
}
