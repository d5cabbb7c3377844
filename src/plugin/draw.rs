use crate::{
    draw::{
        palette::{is_base_colour, is_emoji, parse_emojis, ADD_EMOJI_VALUE, BASE_COLOURS},
        render, rendered_paint, Board, CursorMap, DrawAction, DrawSession, Palette, PaletteEntry,
        Rgba,
    },
    error::{Error, Unauthorized},
    event::*,
    helper::await_next_message,
    log_internal,
    logging::*,
    plugin::*,
    volatile_state::Idle,
};
use anyhow::Result;
use serenity::all::{
    ActionRowComponent, ButtonStyle, ChannelId, ComponentInteraction,
    ComponentInteractionDataKind, CreateActionRow, CreateButton, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, CreateSelectMenu, CreateSelectMenuKind,
    CreateSelectMenuOption, EditInteractionResponse, EditMessage, Interaction, Message,
    MessageId, ReactionType, UserId,
};
use std::time::Duration;
use tokio::time::Instant;

/// Pixel art with buttons and a palette menu
pub struct Draw;

const ID_PREFIX: &str = "draw:";
const PALETTE_ID: &str = "draw:palette";
const DEFAULT_SIZE: usize = 9;
const BOARD_TITLE: &str = "drawing board";

/// Button grid under the palette.  Empty names are disabled spacers.
const LAYOUT: [[&str; 5]; 4] = [
    ["stop", "clear", "", "", "fill"],
    ["", "up_left", "up", "up_right", ""],
    ["erase", "left", "auto", "right", ""],
    ["paint", "down_left", "down", "down_right", "goto"],
];

/// What a button does
#[derive(Debug, Clone, PartialEq, Eq)]
enum Press {
    Stop,
    /// Asks which cell to move to
    Goto,
    Action(DrawAction),
}

fn press(name: &str) -> Option<Press> {
    let step = |d_row, d_col| Some(Press::Action(DrawAction::Move { d_row, d_col }));
    match name {
        "stop" => Some(Press::Stop),
        "goto" => Some(Press::Goto),
        "clear" => Some(Press::Action(DrawAction::Clear)),
        "fill" => Some(Press::Action(DrawAction::ToggleFill)),
        "erase" => Some(Press::Action(DrawAction::Erase)),
        "auto" => Some(Press::Action(DrawAction::ToggleAutoPaint)),
        "paint" => Some(Press::Action(DrawAction::Paint)),
        "up_left" => step(-1, -1),
        "up" => step(-1, 0),
        "up_right" => step(-1, 1),
        "left" => step(0, -1),
        "right" => step(0, 1),
        "down_left" => step(1, -1),
        "down" => step(1, 0),
        "down_right" => step(1, 1),
        _ => None,
    }
}

fn button(name: &str, spacer: usize, session: &DrawSession) -> CreateButton {
    let (emoji, style) = match name {
        "stop" => ("⏹️", ButtonStyle::Danger),
        "clear" => ("🗑️", ButtonStyle::Danger),
        "fill" if session.is_filling() => ("🪣", ButtonStyle::Success),
        "fill" => ("🪣", ButtonStyle::Secondary),
        "auto" if session.is_auto_painting() => ("🖱️", ButtonStyle::Success),
        "auto" => ("🖱️", ButtonStyle::Secondary),
        "erase" => ("🧽", ButtonStyle::Secondary),
        "paint" => ("🖌️", ButtonStyle::Success),
        "goto" => ("🔠", ButtonStyle::Primary),
        "up_left" => ("↖️", ButtonStyle::Primary),
        "up" => ("⬆️", ButtonStyle::Primary),
        "up_right" => ("↗️", ButtonStyle::Primary),
        "left" => ("⬅️", ButtonStyle::Primary),
        "right" => ("➡️", ButtonStyle::Primary),
        "down_left" => ("↙️", ButtonStyle::Primary),
        "down" => ("⬇️", ButtonStyle::Primary),
        "down_right" => ("↘️", ButtonStyle::Primary),
        _ => {
            return CreateButton::new(format!("{}blank{}", ID_PREFIX, spacer))
                .label("\u{200b}")
                .style(ButtonStyle::Secondary)
                .disabled(true)
        }
    };

    CreateButton::new(format!("{}{}", ID_PREFIX, name))
        .emoji(ReactionType::Unicode(emoji.to_owned()))
        .style(style)
}

fn palette_menu(palette: &Palette) -> CreateSelectMenu {
    let options: Vec<CreateSelectMenuOption> = palette
        .entries()
        .iter()
        .map(|entry| {
            let option = CreateSelectMenuOption::new(&entry.label, &entry.value);
            if entry.value == ADD_EMOJI_VALUE {
                return option.emoji('➕');
            }
            if !is_emoji(&entry.value) {
                return option;
            }
            match ReactionType::try_from(entry.value.as_str()) {
                Ok(emoji) => option.emoji(emoji),
                Err(_) => option,
            }
        })
        .collect();
    let max_values = options.len() as u8;

    CreateSelectMenu::new(PALETTE_ID, CreateSelectMenuKind::String { options })
        .placeholder("🎨 Palette (pick several to mix)")
        .max_values(max_values)
}

fn components(session: &DrawSession) -> Vec<CreateActionRow> {
    let mut rows = vec![CreateActionRow::SelectMenu(palette_menu(session.palette()))];
    let mut spacer = 0;
    for line in LAYOUT {
        let buttons = line
            .iter()
            .map(|name| {
                if name.is_empty() {
                    spacer += 1;
                }
                button(name, spacer, session)
            })
            .collect();
        rows.push(CreateActionRow::Buttons(buttons));
    }
    rows
}

fn board_embed(session: &DrawSession, cursor: &CursorMap, owner: &str, show_cursor: bool) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("{}'s {}", owner, BOARD_TITLE))
        .description(render(session, cursor, show_cursor))
}

/// Drawing settings from the configuration
struct Settings {
    cursor: CursorMap,
    session_timeout: Duration,
    prompt_timeout: Duration,
    max_chars: usize,
}

async fn settings(ctx: &Context<'_>) -> Result<Settings> {
    let cfg = ctx.cfg.read().await;
    Ok(Settings {
        cursor: CursorMap::with_overrides(&cfg.draw.cursor)?,
        session_timeout: Duration::from_secs(cfg.draw.session_timeout_seconds),
        prompt_timeout: Duration::from_secs(cfg.draw.prompt_timeout_seconds),
        max_chars: cfg.draw.max_render_chars,
    })
}

#[serenity::async_trait]
impl Plugin for Draw {
    fn name(&self) -> &'static str {
        "draw"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{prefix}draw [height] [width] [background] - make pixel art, sizes 5 to 17\n\
             {prefix}draw copy - reply to a drawing board to continue from it"
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        if let Event::Interaction(Interaction::Component(component)) = event {
            let Some(name) = component.data.custom_id.strip_prefix(ID_PREFIX) else {
                return Ok(EventHandled::No);
            };
            on_component(ctx, component, name).await?;
            return Ok(EventHandled::Yes);
        }

        let Some((msg, args)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        if args.first() == Some(&"copy") {
            copy(ctx, msg).await?;
        } else {
            new_board(ctx, msg, &args).await?;
        }
        Ok(EventHandled::Yes)
    }
}

/// Parse `[height] [width] [background]`
fn board_args(args: &[&str]) -> std::result::Result<Board, Error> {
    let size = |i: usize, what: &str| match args.get(i) {
        Some(arg) => arg
            .parse::<usize>()
            .map_err(|_| Error::InvalidArgument(format!("{} must be a whole number", what))),
        None => Ok(DEFAULT_SIZE),
    };
    let height = size(0, "Height")?;
    let width = size(1, "Width")?;

    let background = args.get(2).copied().unwrap_or("⬜");
    if !is_base_colour(background) {
        let choices: Vec<&str> = BASE_COLOURS.iter().map(|(_, value, _)| *value).collect();
        return Err(Error::InvalidArgument(format!(
            "Background must be one of {}",
            choices.join(" ")
        )));
    }

    Board::new(background, height, width)
}

async fn new_board(ctx: &Context<'_>, msg: &Message, args: &[&str]) -> Result<()> {
    let board = match board_args(args) {
        Ok(board) => board,
        Err(err) => {
            msg.reply(ctx.cache_http, err.to_string()).await?;
            return Ok(());
        }
    };

    let session = DrawSession::new(msg.author.id, board);
    open(ctx, msg, session).await
}

/// Post a board and start taking button presses for it
async fn open(ctx: &Context<'_>, msg: &Message, session: DrawSession) -> Result<()> {
    let settings = settings(ctx).await?;
    let shown = msg
        .channel_id
        .send_message(
            ctx.cache_http,
            CreateMessage::new()
                .embed(board_embed(&session, &settings.cursor, &msg.author.name, true))
                .components(components(&session)),
        )
        .await?;

    {
        let mut vstate = ctx.vstate.write().await;
        vstate
            .draw_sessions
            .insert(shown.id, session, Instant::now());
        log_internal!(
            "{} opened a drawing board ({} open)",
            msg.author.color(),
            vstate.draw_sessions.len()
        );
    }

    watch(ctx, shown.channel_id, shown.id, &msg.author.name, &settings).await
}

/// Close the board on `message_id` once nobody has touched it for the session timeout
async fn watch(
    ctx: &Context<'_>,
    channel_id: ChannelId,
    message_id: MessageId,
    owner: &str,
    settings: &Settings,
) -> Result<()> {
    loop {
        let idle = ctx.vstate.write().await.draw_sessions.check_idle(
            message_id,
            Instant::now(),
            settings.session_timeout,
        );

        let session = match idle {
            Idle::Until(deadline) => {
                tokio::time::sleep_until(deadline).await;
                continue;
            }
            Idle::Closed => return Ok(()),
            Idle::Expired(session) => session,
        };

        log_internal!("Drawing board of {} timed out", owner);
        let prefix = ctx.cfg.read().await.general.command_prefix.clone();
        channel_id
            .edit_message(
                ctx.cache_http,
                message_id,
                EditMessage::new()
                    .embed(board_embed(&session, &settings.cursor, owner, false))
                    .components(vec![timed_out_row(&prefix)]),
            )
            .await?;
        return Ok(());
    }
}

/// Rebuild a session from a board message the bot posted earlier
fn session_from_message(
    owner: UserId,
    source: &Message,
    me: UserId,
    cursor: &CursorMap,
) -> std::result::Result<DrawSession, Error> {
    let invalid = || {
        Error::InvalidArgument(
            "Invalid message, make sure it's a draw embed and a message from the bot.".to_owned(),
        )
    };

    let embed = source.embeds.first().ok_or_else(invalid)?;
    let is_board = embed
        .title
        .as_deref()
        .is_some_and(|title| title.contains(BOARD_TITLE));
    if source.author.id != me || !is_board {
        return Err(invalid());
    }

    let options = source
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::SelectMenu(menu) => Some(
                menu.options
                    .iter()
                    .map(|option| (option.label.clone(), option.value.clone()))
                    .collect(),
            ),
            _ => None,
        })
        .unwrap_or_default();

    let description = embed.description.as_deref().ok_or_else(invalid)?;
    copied_session(owner, description, options, cursor)
}

/// Session continuing from a rendered board and its palette menu's `(label, value)` options
fn copied_session(
    owner: UserId,
    description: &str,
    options: Vec<(String, String)>,
    cursor: &CursorMap,
) -> std::result::Result<DrawSession, Error> {
    let background = options
        .iter()
        .find(|(label, _)| label.ends_with(" (base)"))
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| "⬜".to_owned());

    let board = Board::parse(description, cursor, &background)?;

    let mut palette = Palette::new(&background);
    for (label, value) in options {
        if !palette.contains(&value) {
            palette.add(PaletteEntry {
                colour: Rgba::from_hex(&label),
                label,
                value,
            });
        }
    }

    let mut session = DrawSession::with_palette(owner, board, palette);
    if let Some(paint) = rendered_paint(description) {
        // A paint that left the palette is not worth failing the copy over
        let _ = session.set_paint_value(paint);
    }
    Ok(session)
}

async fn copy(ctx: &Context<'_>, msg: &Message) -> Result<()> {
    let Some(source) = &msg.referenced_message else {
        let prefix = ctx.cfg.read().await.general.command_prefix.clone();
        msg.reply(
            ctx.cache_http,
            format!("Reply to a drawing board with `{}draw copy` to copy it.", prefix),
        )
        .await?;
        return Ok(());
    };

    let settings = settings(ctx).await?;
    let me = ctx.cache.current_user().id;
    match session_from_message(msg.author.id, source, me, &settings.cursor) {
        Ok(session) => open(ctx, msg, session).await,
        Err(err) => {
            msg.reply(ctx.cache_http, err.to_string()).await?;
            Ok(())
        }
    }
}

async fn respond(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    response: CreateInteractionResponse,
) -> Result<()> {
    component.create_response(ctx.cache_http, response).await?;
    Ok(())
}

fn ephemeral(content: impl Into<String>) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

async fn on_component(ctx: &Context<'_>, component: &ComponentInteraction, name: &str) -> Result<()> {
    let settings = settings(ctx).await?;
    let message_id = component.message.id;

    let owner = ctx
        .vstate
        .write()
        .await
        .draw_sessions
        .get_mut(message_id, Instant::now(), settings.session_timeout)
        .map(|session| session.owner);

    match owner {
        None => return expired(ctx, component).await,
        Some(owner) if owner != component.user.id => {
            let prefix = ctx.cfg.read().await.general.command_prefix.clone();
            let text = format!(
                "{}, use the `{}draw` command to create your own instance.",
                Error::Unauthorized(Unauthorized::NotSessionOwner),
                prefix
            );
            return respond(ctx, component, ephemeral(text)).await;
        }
        Some(_) => {}
    }

    if name == "palette" {
        let values = match &component.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => values.clone(),
            _ => Vec::new(),
        };
        return palette_choice(ctx, component, &settings, values).await;
    }

    match press(name) {
        Some(Press::Stop) => stop(ctx, component, &settings).await,
        Some(Press::Goto) => goto(ctx, component, &settings).await,
        Some(Press::Action(action)) => act(ctx, component, &settings, action).await,
        None => respond(ctx, component, CreateInteractionResponse::Acknowledge).await,
    }
}

/// Disabled notice that replaces the controls of a board nobody is editing anymore
fn timed_out_row(prefix: &str) -> CreateActionRow {
    CreateActionRow::Buttons(vec![CreateButton::new(format!("{}expired", ID_PREFIX))
        .label(format!(
            "This interaction has timed out. Use {}draw for a new one.",
            prefix
        ))
        .style(ButtonStyle::Secondary)
        .disabled(true)])
}

async fn expired(ctx: &Context<'_>, component: &ComponentInteraction) -> Result<()> {
    let prefix = ctx.cfg.read().await.general.command_prefix.clone();
    respond(
        ctx,
        component,
        CreateInteractionResponse::UpdateMessage(
            CreateInteractionResponseMessage::new().components(vec![timed_out_row(&prefix)]),
        ),
    )
    .await
}

/// Apply `action` to the session behind this message.  Returns the updated board, `None` if
/// nothing visible changed.
async fn apply(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    settings: &Settings,
    action: DrawAction,
) -> Result<std::result::Result<Option<(CreateEmbed, Vec<CreateActionRow>)>, Error>> {
    let mut vstate = ctx.vstate.write().await;
    let Some(session) = vstate.draw_sessions.get_mut(
        component.message.id,
        Instant::now(),
        settings.session_timeout,
    ) else {
        return Ok(Err(Error::InvalidArgument(
            "This drawing session has ended.".to_owned(),
        )));
    };

    Ok(session
        .apply(action, &settings.cursor, settings.max_chars)
        .map(|changed| {
            changed.then(|| {
                (
                    board_embed(session, &settings.cursor, &component.user.name, true),
                    components(session),
                )
            })
        }))
}

async fn act(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    settings: &Settings,
    action: DrawAction,
) -> Result<()> {
    let response = match apply(ctx, component, settings, action).await? {
        Ok(Some((embed, rows))) => CreateInteractionResponse::UpdateMessage(
            CreateInteractionResponseMessage::new()
                .embed(embed)
                .components(rows),
        ),
        Ok(None) => CreateInteractionResponse::Acknowledge,
        Err(err) => ephemeral(err.to_string()),
    };
    respond(ctx, component, response).await
}

/// Edit the board after a deferred response
async fn redraw(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    board: Option<(CreateEmbed, Vec<CreateActionRow>)>,
) -> Result<()> {
    if let Some((embed, rows)) = board {
        component
            .edit_response(
                ctx.cache_http,
                EditInteractionResponse::new().embed(embed).components(rows),
            )
            .await?;
    }
    Ok(())
}

async fn stop(ctx: &Context<'_>, component: &ComponentInteraction, settings: &Settings) -> Result<()> {
    let session = ctx
        .vstate
        .write()
        .await
        .draw_sessions
        .remove(component.message.id);
    let Some(session) = session else {
        return expired(ctx, component).await;
    };

    log_internal!("{} closed a drawing board", component.user.color());
    respond(
        ctx,
        component,
        CreateInteractionResponse::UpdateMessage(
            CreateInteractionResponseMessage::new()
                .embed(board_embed(&session, &settings.cursor, &component.user.name, false))
                .components(vec![]),
        ),
    )
    .await
}

/// Acknowledge, then post a private question under the board
async fn ask(ctx: &Context<'_>, component: &ComponentInteraction, question: &str) -> Result<MessageId> {
    respond(ctx, component, CreateInteractionResponse::Acknowledge).await?;
    let followup = component
        .create_followup(
            ctx.cache_http,
            CreateInteractionResponseFollowup::new()
                .content(question)
                .ephemeral(true),
        )
        .await?;
    Ok(followup.id)
}

async fn answer(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    followup: MessageId,
    content: impl Into<String>,
) -> Result<()> {
    component
        .edit_followup(
            ctx.cache_http,
            followup,
            CreateInteractionResponseFollowup::new().content(content),
        )
        .await?;
    Ok(())
}

async fn goto(ctx: &Context<'_>, component: &ComponentInteraction, settings: &Settings) -> Result<()> {
    let followup = ask(
        ctx,
        component,
        "Please type the cell you want to move the cursor to. e.g. \"A1\", \"a1\", \"A10\", \"A\", \"10\", etc.",
    )
    .await?;

    let Some(cell) = await_next_message(
        ctx,
        component.user.id,
        component.channel_id,
        settings.prompt_timeout,
    )
    .await?
    else {
        return answer(ctx, component, followup, "Timed out.").await;
    };

    let cell = cell.trim().to_uppercase();
    match apply(ctx, component, settings, DrawAction::Goto(cell.clone())).await? {
        Ok(board) => {
            redraw(ctx, component, board).await?;
            answer(ctx, component, followup, format!("Moved cursor to **{}**", cell)).await
        }
        Err(err) => answer(ctx, component, followup, err.to_string()).await,
    }
}

async fn palette_choice(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    settings: &Settings,
    values: Vec<String>,
) -> Result<()> {
    if values.iter().any(|value| value == ADD_EMOJI_VALUE) {
        return add_emojis(ctx, component, settings).await;
    }

    match values.as_slice() {
        [value] => {
            act(
                ctx,
                component,
                settings,
                DrawAction::SetPaintValue(value.clone()),
            )
            .await
        }
        _ => mix(ctx, component, settings, values).await,
    }
}

async fn add_emojis(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    settings: &Settings,
) -> Result<()> {
    let followup = ask(
        ctx,
        component,
        "Please send a message containing the emojis you want to add to your palette. E.g. `😎 I like turtles 🐢`",
    )
    .await?;

    let Some(content) = await_next_message(
        ctx,
        component.user.id,
        component.channel_id,
        settings.prompt_timeout,
    )
    .await?
    else {
        return answer(ctx, component, followup, "Timed out.").await;
    };

    let backup = ctx
        .vstate
        .write()
        .await
        .draw_sessions
        .get_mut(component.message.id, Instant::now(), settings.session_timeout)
        .map(|session| session.clone());
    let Some(backup) = backup else {
        return answer(ctx, component, followup, "This drawing session has ended.").await;
    };

    let mut report = Vec::new();
    let mut board = None;
    for emoji in parse_emojis(&content) {
        let status = {
            let mut vstate = ctx.vstate.write().await;
            let Some(session) = vstate.draw_sessions.get_mut(
                component.message.id,
                Instant::now(),
                settings.session_timeout,
            ) else {
                break;
            };

            if session.palette().contains(&emoji) {
                "Already exists.".to_owned()
            } else {
                let evicted = session.palette().next_eviction().map(|entry| entry.value.clone());
                let action = DrawAction::AddPaletteEntry(PaletteEntry::emoji(&emoji));
                match session.apply(action, &settings.cursor, settings.max_chars) {
                    Ok(_) => {
                        board = Some((
                            board_embed(session, &settings.cursor, &component.user.name, true),
                            components(session),
                        ));
                        match evicted {
                            Some(old) => format!("Added (replaced {}).", old),
                            None => "Added.".to_owned(),
                        }
                    }
                    Err(err) => err.to_string(),
                }
            }
        };
        report.push(format!("{} - {}", emoji, status));
    }

    // Discord may still refuse the new menu.  Then the palette goes back to what it was.
    if let Err(err) = redraw(ctx, component, board).await {
        if let Some(session) = ctx.vstate.write().await.draw_sessions.get_mut(
            component.message.id,
            Instant::now(),
            settings.session_timeout,
        ) {
            *session = backup;
        }
        return answer(ctx, component, followup, format!("Could not add emojis: {}", err)).await;
    }

    let text = if report.is_empty() {
        "Aborted.".to_owned()
    } else {
        report.join("\n")
    };
    answer(ctx, component, followup, text).await
}

/// A guild emoji named after the colour's hex code, from the configured guilds
async fn colour_emoji(ctx: &Context<'_>, colour: Rgba) -> Option<String> {
    let guild_ids = ctx.cfg.read().await.draw.emoji_guild_ids.clone();
    let name = colour.hex();
    for guild_id in guild_ids {
        let Ok(emojis) = guild_id.emojis(ctx.http).await else {
            continue;
        };
        if let Some(emoji) = emojis.into_iter().find(|emoji| emoji.name == name) {
            return Some(emoji.to_string());
        }
    }
    None
}

async fn mix(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    settings: &Settings,
    values: Vec<String>,
) -> Result<()> {
    let mixed = {
        let mut vstate = ctx.vstate.write().await;
        match vstate.draw_sessions.get_mut(
            component.message.id,
            Instant::now(),
            settings.session_timeout,
        ) {
            Some(session) => session.mix(&values),
            None => return expired(ctx, component).await,
        }
    };
    let colour = match mixed {
        Ok(colour) => colour,
        Err(err) => return respond(ctx, component, ephemeral(err.to_string())).await,
    };

    respond(ctx, component, CreateInteractionResponse::Acknowledge).await?;
    let entry = PaletteEntry::mixed(colour, colour_emoji(ctx, colour).await);
    let marker = entry.value.clone();

    match apply(ctx, component, settings, DrawAction::AddPaletteEntry(entry)).await? {
        Ok(board) => {
            redraw(ctx, component, board).await?;
            component
                .create_followup(
                    ctx.cache_http,
                    CreateInteractionResponseFollowup::new().content(format!(
                        "Mixed colours:\n{} = {} ({})",
                        values.join(" + "),
                        marker,
                        colour
                    )),
                )
                .await?;
        }
        Err(err) => {
            component
                .create_followup(
                    ctx.cache_http,
                    CreateInteractionResponseFollowup::new()
                        .content(err.to_string())
                        .ephemeral(true),
                )
                .await?;
        }
    }
    Ok(())
}
