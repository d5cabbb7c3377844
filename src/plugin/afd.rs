use crate::{
    afd::{stats::progress_bar, ClaimRow, Participant, Sheet, Status},
    error::{Error, Precondition, Result as DomainResult, Unauthorized},
    event::*,
    helper::*,
    log_internal,
    logging::*,
    plugin::*,
};
use anyhow::Result;
use serenity::all::{
    ButtonStyle, Colour, ComponentInteraction, CreateActionRow, CreateButton, CreateEmbed,
    CreateEmbedAuthor, CreateEmbedFooter, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, CreateMessage,
    EditInteractionResponse, Interaction, Message, User, UserId,
};

/// April Fools drawing event: claim a Pokemon, draw it, submit it, get it approved.
pub struct Afd;

const INVALID: Colour = Colour::new(0xe74c3c);

fn status_colour(status: Status) -> Colour {
    Colour::new(match status {
        Status::Unclaimed => 0x99aab5,
        Status::Claimed => 0x3498db,
        Status::Submitted => 0xf1c40f,
        Status::CorrectionPending => 0xe67e22,
        Status::Completed => 0x2ecc71,
    })
}

#[serenity::async_trait]
impl Plugin for Afd {
    fn name(&self) -> &'static str {
        "afd"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        let name = self.name();
        Some(format!(
            "{prefix}{name} [info] - event rules and community progress\n\
             {prefix}{name} view <pokemon> - show a pokemon's claim\n\
             {prefix}{name} list [@user] - pokemon claimed by you or someone else\n\
             {prefix}{name} claim|unclaim <pokemon> - take or give back a pokemon\n\
             {prefix}{name} submit <pokemon> <image-url> - submit your drawing\n\
             {prefix}{name} unsubmit <pokemon> - withdraw your drawing\n\
             {prefix}{name} approve|unapprove <pokemon> - review a drawing (admin only)\n\
             {prefix}{name} comment <pokemon> <text> - ask for a correction (admin only)\n\
             {prefix}{name} forceclaim [@user] <pokemon> - claim on behalf of someone (admin only)\n\
             {prefix}{name} forceunclaim <pokemon> - remove anyone's claim (admin only)\n\
             {prefix}{name} remind <pokemon> - remind the claimer (admin only)"
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        if let Event::Interaction(Interaction::Component(component)) = event {
            let id = component.data.custom_id.as_str();
            if id.starts_with(VIEW_PREFIX) {
                on_view_button(ctx, component).await?;
            } else if id.starts_with(LIST_PREFIX) {
                on_list_button(ctx, component).await?;
            } else {
                return Ok(EventHandled::No);
            }
            return Ok(EventHandled::Yes);
        }

        let Some((msg, args)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        if !msg.is_from_participant(ctx).await {
            let err = Error::Unauthorized(Unauthorized::NotParticipant);
            reply(ctx, msg, error_embed(&describe(&err, "", msg.author.id))).await?;
            return Ok(EventHandled::Yes);
        }

        let (sub, rest) = match args.split_first() {
            Some((sub, rest)) => (*sub, rest),
            None => ("info", &[][..]),
        };

        let admin_only = matches!(
            sub,
            "approve" | "unapprove" | "comment" | "forceclaim" | "forceunclaim" | "remind"
        );
        if admin_only && !msg.is_from_admin(ctx).await {
            let err = Error::Unauthorized(Unauthorized::NotAdmin);
            reply(ctx, msg, error_embed(&describe(&err, "", msg.author.id))).await?;
            return Ok(EventHandled::Yes);
        }

        let pokemon = rest.join(" ");
        match sub {
            "info" => info(ctx, msg).await?,
            "view" => view(ctx, msg, &pokemon).await?,
            "list" => list(ctx, msg).await?,
            "claim" => claim(ctx, msg, &pokemon).await?,
            "unclaim" => unclaim(ctx, msg, &pokemon).await?,
            "submit" => match rest.split_last() {
                Some((url, name)) if !name.is_empty() => {
                    submit(ctx, msg, &name.join(" "), url).await?
                }
                _ => usage_error(ctx, msg, "submit <pokemon> <image-url>").await?,
            },
            "unsubmit" => unsubmit(ctx, msg, &pokemon).await?,
            "approve" => approve(ctx, msg, &pokemon).await?,
            "unapprove" => unapprove(ctx, msg, &pokemon).await?,
            "comment" => match rest.split_first() {
                Some((name, text)) if !text.is_empty() => {
                    comment(ctx, msg, name, &text.join(" ")).await?
                }
                _ => usage_error(ctx, msg, "comment <pokemon> <text>").await?,
            },
            "forceclaim" => {
                let name: Vec<&str> = rest
                    .iter()
                    .copied()
                    .filter(|word| !is_user_mention(word))
                    .collect();
                let target = msg.mentions.first().unwrap_or(&msg.author);
                force_claim(ctx, msg, target, &name.join(" ")).await?
            }
            "forceunclaim" => force_unclaim(ctx, msg, &pokemon).await?,
            "remind" => remind(ctx, msg, &pokemon).await?,
            _ => usage_error(ctx, msg, SUBCOMMANDS).await?,
        }

        Ok(EventHandled::Yes)
    }
}

const SUBCOMMANDS: &str = "[info|view|list|claim|unclaim|submit|unsubmit|approve|unapprove|\
                           comment|forceclaim|forceunclaim|remind]";

fn is_user_mention(word: &str) -> bool {
    word.starts_with("<@") && word.ends_with('>') && !word.starts_with("<@&")
}

fn participant(user: &User) -> Participant {
    Participant {
        id: user.id,
        name: user.name.clone(),
    }
}

/// Turn a failed operation on `pokemon` into a reply for `actor`
fn describe(err: &Error, pokemon: &str, actor: UserId) -> String {
    match err {
        Error::PreconditionFailed(Precondition::AlreadyClaimed { by_self: true, .. }) => {
            format!("**{}** is already claimed by **you**!", pokemon)
        }
        Error::PreconditionFailed(Precondition::AlreadyClaimed { owner, .. }) => {
            format!("**{}** is already claimed by **{}**!", pokemon, owner)
        }
        Error::PreconditionFailed(Precondition::NotClaimed) => {
            format!("**{}** is not claimed.", pokemon)
        }
        Error::PreconditionFailed(Precondition::NotSubmitted) => {
            format!("**{}** has not been submitted yet.", pokemon)
        }
        Error::PreconditionFailed(Precondition::AlreadyApproved) => {
            format!("**{}** is already approved.", pokemon)
        }
        Error::PreconditionFailed(Precondition::NotApproved) => {
            format!("**{}** is not approved.", pokemon)
        }
        Error::PreconditionFailed(Precondition::ClaimLimitReached(max)) => {
            format!("You already have the max number ({}) of pokemon claimed!", max)
        }
        Error::Unauthorized(Unauthorized::NotOwner(owner)) => {
            format!("**{}** is claimed by **{}**!", pokemon, owner)
        }
        Error::Unauthorized(Unauthorized::NotAdmin) => {
            format!("<@{}>, this requires the AFD admin role.", actor)
        }
        Error::Unauthorized(Unauthorized::NotParticipant) => {
            format!("<@{}>, this requires the AFD participant role.", actor)
        }
        other => other.to_string(),
    }
}

fn error_embed(description: &str) -> CreateEmbed {
    CreateEmbed::new().description(description).colour(INVALID)
}

/// Short embed about one row, with its drawing when there is one
fn row_embed(description: impl Into<String>, row: &ClaimRow) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .description(description)
        .colour(status_colour(row.status()));
    match &row.image {
        Some(image) => embed.image(image),
        None => embed,
    }
}

async fn reply(ctx: &Context<'_>, msg: &Message, embed: CreateEmbed) -> Result<Message> {
    Ok(msg
        .channel_id
        .send_message(
            ctx.cache_http,
            CreateMessage::new().embed(embed).reference_message(msg),
        )
        .await?)
}

async fn usage_error(ctx: &Context<'_>, msg: &Message, expected: &str) -> Result<()> {
    let prefix = ctx.cfg.read().await.general.command_prefix.clone();
    let text = format!("Usage: `{}afd {}`", prefix, expected);
    reply(ctx, msg, error_embed(&text)).await?;
    Ok(())
}

/// Announce an activity in the configured log channel, if any
async fn log_activity(ctx: &Context<'_>, embed: CreateEmbed) -> Result<()> {
    let Some(channel_id) = ctx.cfg.read().await.afd.log_channel_id else {
        return Ok(());
    };
    channel_id
        .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
        .await?;
    Ok(())
}

/// Look up a row from fresh sheet data, replying to the user if it does not exist
async fn fresh_row(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<Option<ClaimRow>> {
    let mut sheet = ctx.sheet.write().await;
    sheet.refresh().await?;
    match sheet.row(key) {
        Ok(row) => Ok(Some(row)),
        Err(err) => {
            drop(sheet);
            reply(ctx, msg, error_embed(&describe(&err, key, msg.author.id))).await?;
            Ok(None)
        }
    }
}

/// A mutation of one row, run as: check, confirm, check again on fresh data, write.  `apply`
/// sees the whole sheet for checks that span rows.
struct Transition<'a, F> {
    key: &'a str,
    apply: F,
    question: fn(&ClaimRow) -> String,
}

/// Look up `key` on fresh data and try `apply` on it.  Returns the row as it was before
/// `apply`, or the reason it cannot happen.
fn attempt<F>(sheet: &Sheet, key: &str, apply: &F) -> DomainResult<(ClaimRow, ClaimRow)>
where
    F: Fn(&Sheet, &mut ClaimRow) -> DomainResult<()>,
{
    let before = sheet.row(key)?;
    let mut after = before.clone();
    apply(sheet, &mut after)?;
    Ok((before, after))
}

/// Run `transition`, replying to the user along the way.  Returns the row as written, or `None`
/// if the transition was refused or cancelled.
async fn run<F>(
    ctx: &Context<'_>,
    msg: &Message,
    transition: Transition<'_, F>,
) -> Result<Option<ClaimRow>>
where
    F: Fn(&Sheet, &mut ClaimRow) -> DomainResult<()> + Send + Sync,
{
    // Refuse early instead of asking a question that cannot succeed
    let checked = {
        let mut sheet = ctx.sheet.write().await;
        sheet.refresh().await?;
        attempt(&sheet, transition.key, &transition.apply)
    };
    let row = match checked {
        Ok((before, _)) => before,
        Err(err) => {
            refuse(ctx, msg, transition.key, &err).await?;
            return Ok(None);
        }
    };

    let question = row_embed((transition.question)(&row), &row);
    if !confirm(ctx, msg, question).await? {
        return Ok(None);
    }

    // Someone may have changed the sheet while the question was open.  Hold it until the write
    // lands.
    let mut sheet = ctx.sheet.write().await;
    sheet.refresh().await?;
    let row = match attempt(&sheet, &row.pokemon, &transition.apply) {
        Ok((_, after)) => after,
        Err(err) => {
            drop(sheet);
            refuse(ctx, msg, &row.pokemon, &err).await?;
            return Ok(None);
        }
    };
    sheet.update_row(&row).await?;
    drop(sheet);

    Ok(Some(row))
}

async fn refuse(ctx: &Context<'_>, msg: &Message, key: &str, err: &Error) -> Result<()> {
    let name = match err {
        Error::InvalidItem(_) => key.to_owned(),
        _ => ctx
            .sheet
            .read()
            .await
            .row(key)
            .map(|row| row.pokemon)
            .unwrap_or_else(|_| key.to_owned()),
    };
    reply(ctx, msg, error_embed(&describe(err, &name, msg.author.id))).await?;
    Ok(())
}

/// Tell the user it worked, tell the log channel, and DM whoever is affected
async fn announce(
    ctx: &Context<'_>,
    msg: &Message,
    row: &ClaimRow,
    done: String,
    verb: &str,
    notify_user: Option<UserId>,
) -> Result<()> {
    log_internal!("{} {} {}", msg.author.color(), verb, row.color());

    let sent = reply(ctx, msg, row_embed(done.clone(), row)).await?;
    let activity = format!(
        "**{}** has {} **{}**.\n[Go to message]({})",
        msg.author.name,
        verb,
        row.pokemon,
        sent.link()
    );
    log_activity(ctx, row_embed(activity, row)).await?;

    if let Some(user_id) = notify_user {
        notify(ctx, user_id, msg.channel_id, &done).await?;
    }
    Ok(())
}

async fn info(ctx: &Context<'_>, msg: &Message) -> Result<()> {
    let mut sheet = ctx.sheet.write().await;
    sheet.refresh().await?;
    let event = sheet.event().clone();
    let stats = sheet.stats();
    drop(sheet);

    let description = format!(
        "**Topic:** {}\n\n**Deadline**: {}\n**Max claimed (unfinished) pokemon**: {}\n\
         **Max unapproved pokemon**: {}",
        event.topic, event.deadline, event.claim_max, event.unapproved_max
    );

    let bar = |label: &str, value: usize| {
        format!(
            "**{}**\n{} {}/{}",
            label,
            progress_bar(value, stats.total),
            value,
            stats.total
        )
    };
    let progress = [
        bar("Completed", stats.completed),
        bar("Submitted", stats.submitted),
        bar("Claimed", stats.claimed),
    ]
    .join("\n");

    let mut embed = CreateEmbed::new()
        .title("Welcome to the April Fools community project!")
        .description(description);
    if !event.rules.is_empty() {
        embed = embed.field("Rules", event.formatted_rules(), false);
    }
    embed = embed.field("Community Stats", progress, false);

    reply(ctx, msg, embed).await?;
    Ok(())
}

/// Full embed of one row
fn view_embed(row: &ClaimRow) -> CreateEmbed {
    let status = row.status();
    let mut embed = CreateEmbed::new()
        .title(format!("#{} - {}", row.dex, row.pokemon))
        .colour(status_colour(status));

    if let Some(owner) = &row.owner {
        embed = embed.author(CreateEmbedAuthor::new(format!("{} ({})", owner.name, owner.id)));
    }
    if let Some(image) = &row.image {
        embed = embed.image(image);
    }
    if let Some(comment) = &row.comment {
        embed = embed.field("Comment", format!("{}\n- <@{}>", comment.text, comment.by), false);
    }

    if let Some(approver) = row.approved_by {
        embed = embed.field("Approved by", format!("<@{}>", approver), true);
    }
    embed.footer(CreateEmbedFooter::new(status.to_string()))
}

async fn view(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<()> {
    let Some(row) = fresh_row(ctx, msg, key).await? else {
        return Ok(());
    };
    let admin = msg.is_from_admin(ctx).await;
    let view = CreateMessage::new()
        .embed(view_embed(&row))
        .components(view_components(&row, msg.author.id, admin))
        .reference_message(msg);
    msg.channel_id.send_message(ctx.cache_http, view).await?;
    Ok(())
}

const VIEW_PREFIX: &str = "afd:view:";
const LIST_PREFIX: &str = "afd:list:";

/// Shortcut buttons under a row's view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewAction {
    Claim,
    Unclaim,
    Submit,
    Remind,
    Approve,
    Unapprove,
}

impl ViewAction {
    const ALL: [ViewAction; 6] = [
        ViewAction::Claim,
        ViewAction::Unclaim,
        ViewAction::Submit,
        ViewAction::Remind,
        ViewAction::Approve,
        ViewAction::Unapprove,
    ];

    fn name(self) -> &'static str {
        match self {
            ViewAction::Claim => "claim",
            ViewAction::Unclaim => "unclaim",
            ViewAction::Submit => "submit",
            ViewAction::Remind => "remind",
            ViewAction::Approve => "approve",
            ViewAction::Unapprove => "unapprove",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    fn admin_only(self) -> bool {
        matches!(
            self,
            ViewAction::Remind | ViewAction::Approve | ViewAction::Unapprove
        )
    }

    fn button(self, row: &ClaimRow, viewer: UserId) -> CreateButton {
        let (label, style) = match self {
            ViewAction::Claim => ("Claim", ButtonStyle::Primary),
            ViewAction::Unclaim => ("Unclaim", ButtonStyle::Danger),
            ViewAction::Submit if row.image.is_some() => ("Edit submission", ButtonStyle::Primary),
            ViewAction::Submit => ("Submit", ButtonStyle::Primary),
            ViewAction::Remind => ("Remind", ButtonStyle::Secondary),
            ViewAction::Approve => ("Approve", ButtonStyle::Success),
            ViewAction::Unapprove => ("Unapprove", ButtonStyle::Danger),
        };
        CreateButton::new(view_id(self, row.dex, viewer))
            .label(label)
            .style(style)
    }
}

/// Which shortcuts `viewer` gets for `row` in its current state
fn view_actions(row: &ClaimRow, viewer: UserId, admin: bool) -> Vec<ViewAction> {
    let status = row.status();
    if status == Status::Unclaimed {
        return vec![ViewAction::Claim];
    }

    let mut actions = Vec::new();
    if row.is_claimed_by(viewer) {
        actions.extend([ViewAction::Unclaim, ViewAction::Submit]);
    }
    if admin {
        match status {
            Status::Completed => actions.push(ViewAction::Unapprove),
            Status::Submitted | Status::CorrectionPending => actions.push(ViewAction::Approve),
            _ => {}
        }
        if matches!(status, Status::Claimed | Status::CorrectionPending) {
            actions.push(ViewAction::Remind);
        }
    }
    actions
}

fn view_components(row: &ClaimRow, viewer: UserId, admin: bool) -> Vec<CreateActionRow> {
    let buttons: Vec<CreateButton> = view_actions(row, viewer, admin)
        .into_iter()
        .map(|action| action.button(row, viewer))
        .collect();
    if buttons.is_empty() {
        Vec::new()
    } else {
        vec![CreateActionRow::Buttons(buttons)]
    }
}

fn view_id(action: ViewAction, dex: u32, viewer: UserId) -> String {
    format!("{}{}:{}:{}", VIEW_PREFIX, action.name(), dex, viewer)
}

fn parse_user_id(text: &str) -> Option<UserId> {
    text.parse::<u64>().ok().filter(|id| *id != 0).map(UserId::new)
}

fn parse_view_id(id: &str) -> Option<(ViewAction, u32, UserId)> {
    let mut parts = id.strip_prefix(VIEW_PREFIX)?.split(':');
    let action = ViewAction::from_name(parts.next()?)?;
    let dex = parts.next()?.parse().ok()?;
    let viewer = parse_user_id(parts.next()?)?;
    match parts.next() {
        Some(_) => None,
        None => Some((action, dex, viewer)),
    }
}

fn ephemeral(content: impl Into<String>) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

/// The command that opened a view, standing in for a fresh one when a button is pressed
fn invocation(component: &ComponentInteraction) -> Option<Message> {
    let mut msg = component.message.referenced_message.as_deref()?.clone();
    msg.guild_id = msg.guild_id.or(component.guild_id);
    Some(msg)
}

async fn on_view_button(ctx: &Context<'_>, component: &ComponentInteraction) -> Result<()> {
    let Some((action, dex, viewer)) = parse_view_id(&component.data.custom_id) else {
        component
            .create_response(ctx.cache_http, CreateInteractionResponse::Acknowledge)
            .await?;
        return Ok(());
    };
    if component.user.id != viewer {
        let response = ephemeral("You can't use this!");
        component.create_response(ctx.cache_http, response).await?;
        return Ok(());
    }
    let Some(invocation) = invocation(component).filter(|msg| msg.author.id == viewer) else {
        let response = ephemeral("This view has expired, look the pokemon up again.");
        component.create_response(ctx.cache_http, response).await?;
        return Ok(());
    };

    // Roles may have changed since the view was sent
    let admin = invocation.is_from_admin(ctx).await;
    if action.admin_only() && !admin {
        let err = Error::Unauthorized(Unauthorized::NotAdmin);
        let response = ephemeral(describe(&err, "", viewer));
        component.create_response(ctx.cache_http, response).await?;
        return Ok(());
    }

    let row = {
        let mut sheet = ctx.sheet.write().await;
        sheet.refresh().await?;
        sheet.row_by_dex(dex)
    };
    let Some(row) = row else {
        let err = Error::InvalidItem(format!("#{}", dex));
        let response = ephemeral(describe(&err, "", viewer));
        component.create_response(ctx.cache_http, response).await?;
        return Ok(());
    };

    component
        .create_response(ctx.cache_http, CreateInteractionResponse::Acknowledge)
        .await?;
    log_internal!(
        "{} pressed {} on {}",
        component.user.color(),
        action.name(),
        row.color()
    );

    let key = row.pokemon.as_str();
    match action {
        ViewAction::Claim => claim(ctx, &invocation, key).await?,
        ViewAction::Unclaim => unclaim(ctx, &invocation, key).await?,
        ViewAction::Submit => submit_from_view(ctx, component, &invocation, key).await?,
        ViewAction::Remind => remind(ctx, &invocation, key).await?,
        ViewAction::Approve => approve(ctx, &invocation, key).await?,
        ViewAction::Unapprove => unapprove(ctx, &invocation, key).await?,
    }

    // Show the row as it stands now
    let row = {
        let mut sheet = ctx.sheet.write().await;
        sheet.refresh().await?;
        sheet.row_by_dex(dex)
    };
    if let Some(row) = row {
        let updated = EditInteractionResponse::new()
            .embed(view_embed(&row))
            .components(view_components(&row, viewer, admin));
        component.edit_response(ctx.cache_http, updated).await?;
    }
    Ok(())
}

/// Ask for the drawing's link, then submit it like the command would
async fn submit_from_view(
    ctx: &Context<'_>,
    component: &ComponentInteraction,
    invocation: &Message,
    key: &str,
) -> Result<()> {
    let question = CreateInteractionResponseFollowup::new()
        .content(format!(
            "Send the image URL of your drawing of **{}** in this channel.",
            key
        ))
        .ephemeral(true);
    let asked = component.create_followup(ctx.cache_http, question).await?;

    let answer =
        await_next_message(ctx, component.user.id, component.channel_id, CONFIRM_TIMEOUT).await?;
    let text = match &answer {
        Some(_) => "Got it.",
        None => "Timed out.",
    };
    let edited = CreateInteractionResponseFollowup::new().content(text);
    component
        .edit_followup(ctx.cache_http, asked.id, edited)
        .await?;

    match answer {
        Some(url) => submit(ctx, invocation, key, url.trim()).await,
        None => Ok(()),
    }
}

/// One line per row for listings
fn list_line(row: &ClaimRow) -> String {
    format!("- #{} **{}**: {}", row.dex, row.pokemon, row.status())
}

const PAGE_LINES: usize = 15;
/// Discord's limit on embed descriptions
const PAGE_CHARS: usize = 4096;

/// Split listing lines into embed-sized pages.  Always at least one page.
fn pages(lines: &[String]) -> Vec<String> {
    let mut pages = Vec::new();
    let mut page = String::new();
    let mut count = 0;
    for line in lines {
        let full = count == PAGE_LINES
            || (count > 0 && page.chars().count() + 1 + line.chars().count() > PAGE_CHARS);
        if full {
            pages.push(std::mem::take(&mut page));
            count = 0;
        }
        if count > 0 {
            page.push('\n');
        }
        page.push_str(line);
        count += 1;
    }
    if count > 0 || pages.is_empty() {
        pages.push(page);
    }
    pages
}

fn list_id(target: UserId, page: usize, viewer: UserId) -> String {
    format!("{}{}:{}:{}", LIST_PREFIX, target, page, viewer)
}

fn parse_list_id(id: &str) -> Option<(UserId, usize, UserId)> {
    let mut parts = id.strip_prefix(LIST_PREFIX)?.split(':');
    let target = parse_user_id(parts.next()?)?;
    let page = parts.next()?.parse().ok()?;
    let viewer = parse_user_id(parts.next()?)?;
    match parts.next() {
        Some(_) => None,
        None => Some((target, page, viewer)),
    }
}

/// Listing rows of the user `target` as of now
async fn list_lines(ctx: &Context<'_>, target: UserId) -> Result<Vec<String>> {
    let mut sheet = ctx.sheet.write().await;
    sheet.refresh().await?;
    Ok(sheet.rows_of(target).into_iter().map(list_line).collect())
}

/// Page `page` of a listing, with buttons to the neighbouring pages when there are any
fn list_page(
    name: &str,
    target: UserId,
    lines: &[String],
    page: usize,
    viewer: UserId,
) -> (CreateEmbed, Vec<CreateActionRow>) {
    let embed = CreateEmbed::new().title(format!("Pokemon claimed by {}", name));
    if lines.is_empty() {
        return (embed.description("No pokemon claimed."), Vec::new());
    }

    let pages = pages(lines);
    let last = pages.len() - 1;
    let page = page.min(last);
    let embed = embed.description(pages[page].as_str());
    if last == 0 {
        return (embed, Vec::new());
    }

    let embed = embed.footer(CreateEmbedFooter::new(format!(
        "Page {}/{}",
        page + 1,
        pages.len()
    )));
    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(list_id(target, page.saturating_sub(1), viewer))
            .label("Previous")
            .style(ButtonStyle::Secondary)
            .disabled(page == 0),
        CreateButton::new(list_id(target, page + 1, viewer))
            .label("Next")
            .style(ButtonStyle::Secondary)
            .disabled(page == last),
    ]);
    (embed, vec![buttons])
}

async fn list(ctx: &Context<'_>, msg: &Message) -> Result<()> {
    let user = msg.mentions.first().unwrap_or(&msg.author);
    let lines = list_lines(ctx, user.id).await?;

    let (embed, components) = list_page(&user.name, user.id, &lines, 0, msg.author.id);
    let listing = CreateMessage::new()
        .embed(embed)
        .components(components)
        .reference_message(msg);
    msg.channel_id.send_message(ctx.cache_http, listing).await?;
    Ok(())
}

async fn on_list_button(ctx: &Context<'_>, component: &ComponentInteraction) -> Result<()> {
    let Some((target, page, viewer)) = parse_list_id(&component.data.custom_id) else {
        component
            .create_response(ctx.cache_http, CreateInteractionResponse::Acknowledge)
            .await?;
        return Ok(());
    };
    if component.user.id != viewer {
        let response = ephemeral("You can't use this!");
        component.create_response(ctx.cache_http, response).await?;
        return Ok(());
    }

    let name = match target.to_user(ctx.cache_http).await {
        Ok(user) => user.name,
        Err(_) => target.to_string(),
    };
    let lines = list_lines(ctx, target).await?;
    let (embed, components) = list_page(&name, target, &lines, page, viewer);
    let response = CreateInteractionResponse::UpdateMessage(
        CreateInteractionResponseMessage::new()
            .embed(embed)
            .components(components),
    );
    component.create_response(ctx.cache_http, response).await?;
    Ok(())
}

async fn claim(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<()> {
    let actor = participant(&msg.author);
    // Admins are exempt from the claim limit
    let limited = !msg.is_from_admin(ctx).await;

    let transition = Transition {
        key,
        apply: |sheet: &Sheet, row: &mut ClaimRow| {
            if limited && row.owner.is_none() {
                sheet.check_claim_limit(actor.id)?;
            }
            row.claim(&actor)
        },
        question: |row| format!("Are you sure you want to claim **{}**?", row.pokemon),
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    announce(
        ctx,
        msg,
        &row,
        format!("You have successfully claimed **{}**, have fun! :D", row.pokemon),
        "claimed",
        Some(actor.id),
    )
    .await
}

async fn unclaim(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<()> {
    let actor = msg.author.id;
    let transition = Transition {
        key,
        apply: |_: &Sheet, row: &mut ClaimRow| row.unclaim(actor),
        question: |row| match row.image {
            Some(_) => format!(
                "Are you sure you want to unclaim **{}**? You have already submitted a drawing \
                 which will be removed.",
                row.pokemon
            ),
            None => format!("Are you sure you want to unclaim **{}**?", row.pokemon),
        },
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    announce(
        ctx,
        msg,
        &row,
        format!("You have successfully unclaimed **{}**.", row.pokemon),
        "unclaimed",
        Some(actor),
    )
    .await
}

/// Submissions must be web links to the drawing
fn check_image_url(text: &str) -> DomainResult<String> {
    let text = text.trim_start_matches('<').trim_end_matches('>');
    match url::Url::parse(text) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(Error::InvalidArgument(format!(
            "`{}` is not a valid image URL.",
            text
        ))),
    }
}

async fn submit(ctx: &Context<'_>, msg: &Message, key: &str, url: &str) -> Result<()> {
    let image = match check_image_url(url) {
        Ok(image) => image,
        Err(err) => {
            reply(ctx, msg, error_embed(&err.to_string())).await?;
            return Ok(());
        }
    };

    let actor = msg.author.id;
    let transition = Transition {
        key,
        apply: |_: &Sheet, row: &mut ClaimRow| row.submit(actor, image.clone()),
        question: |row| match row.image {
            Some(_) => format!(
                "Are you sure you want to replace your submission for **{}**?",
                row.pokemon
            ),
            None => format!("Are you sure you want to submit **{}**?", row.pokemon),
        },
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    announce(
        ctx,
        msg,
        &row,
        format!("You have successfully submitted **{}**.", row.pokemon),
        "submitted",
        None,
    )
    .await
}

async fn unsubmit(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<()> {
    let actor = msg.author.id;
    let transition = Transition {
        key,
        apply: |_: &Sheet, row: &mut ClaimRow| row.unsubmit(actor),
        question: |row| {
            format!(
                "Are you sure you want to withdraw your submission for **{}**?",
                row.pokemon
            )
        },
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    announce(
        ctx,
        msg,
        &row,
        format!("You have successfully unsubmitted **{}**.", row.pokemon),
        "unsubmitted",
        None,
    )
    .await
}

async fn approve(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<()> {
    let approver = msg.author.id;
    let transition = Transition {
        key,
        apply: |_: &Sheet, row: &mut ClaimRow| row.approve(approver),
        question: |row| format!("Are you sure you want to approve **{}**?", row.pokemon),
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    announce(
        ctx,
        msg,
        &row,
        format!("**{}** has been approved. Thank you for drawing!", row.pokemon),
        "approved",
        row.owner.as_ref().map(|owner| owner.id),
    )
    .await
}

async fn unapprove(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<()> {
    let transition = Transition {
        key,
        apply: |_: &Sheet, row: &mut ClaimRow| row.unapprove(),
        question: |row| format!("Are you sure you want to unapprove **{}**?", row.pokemon),
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    announce(
        ctx,
        msg,
        &row,
        format!("**{}** is no longer approved.", row.pokemon),
        "unapproved",
        row.owner.as_ref().map(|owner| owner.id),
    )
    .await
}

async fn comment(ctx: &Context<'_>, msg: &Message, key: &str, text: &str) -> Result<()> {
    let reviewer = msg.author.id;
    let transition = Transition {
        key,
        apply: |_: &Sheet, row: &mut ClaimRow| row.request_correction(reviewer, text),
        question: |row| {
            format!(
                "Are you sure you want to request a correction for **{}**?",
                row.pokemon
            )
        },
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    announce(
        ctx,
        msg,
        &row,
        format!(
            "A correction has been requested for **{}**:\n> {}",
            row.pokemon, text
        ),
        "requested a correction for",
        row.owner.as_ref().map(|owner| owner.id),
    )
    .await
}

async fn force_claim(ctx: &Context<'_>, msg: &Message, target: &User, key: &str) -> Result<()> {
    let target = participant(target);

    let over_limit = {
        let mut sheet = ctx.sheet.write().await;
        sheet.refresh().await?;
        !sheet.can_claim(target.id)
    };

    let transition = Transition {
        key,
        apply: |_: &Sheet, row: &mut ClaimRow| row.force_claim(&target),
        question: |row| match &row.owner {
            Some(owner) => format!(
                "**{}** is claimed by **{}**. Are you sure you want to force claim it?",
                row.pokemon, owner.name
            ),
            None => format!("Are you sure you want to force claim **{}**?", row.pokemon),
        },
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    let mut done = format!(
        "**{}** has been claimed for **{}**.",
        row.pokemon, target.name
    );
    if over_limit {
        done.push_str(&format!(
            "\nNote: **{}** is already at the claim limit.",
            target.name
        ));
    }

    announce(
        ctx,
        msg,
        &row,
        done,
        "force claimed",
        Some(target.id),
    )
    .await
}

async fn force_unclaim(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<()> {
    // Who held it before, so they hear about it
    let Some(before) = fresh_row(ctx, msg, key).await? else {
        return Ok(());
    };

    let transition = Transition {
        key,
        apply: |_: &Sheet, row: &mut ClaimRow| row.force_unclaim(),
        question: |row| match &row.owner {
            Some(owner) => format!(
                "Are you sure you want to force unclaim **{}** from **{}**?",
                row.pokemon, owner.name
            ),
            None => format!("Are you sure you want to force unclaim **{}**?", row.pokemon),
        },
    };
    let Some(row) = run(ctx, msg, transition).await? else {
        return Ok(());
    };

    announce(
        ctx,
        msg,
        &row,
        format!("**{}** has been force unclaimed.", row.pokemon),
        "force unclaimed",
        before.owner.map(|owner| owner.id),
    )
    .await
}

/// Reminder text listing a participant's unfinished rows
fn reminder_text(rows: &[&ClaimRow], deadline: &str) -> String {
    let mut text = String::from(
        "**AFD Reminder**\nYour following claimed Pokémon have not been completed yet:\n",
    );
    for row in rows {
        text.push_str(&format!("- {}", row.pokemon));
        if let Some(comment) = &row.comment {
            text.push_str(&format!(" (`{}`)", comment.text));
        }
        text.push('\n');
    }
    if !deadline.is_empty() {
        text.push_str(&format!("**Deadline**: {}\n", deadline));
    }
    text.push_str("Please draw them or unclaim any you think you cannot finish. Thank you!");
    text
}

async fn remind(ctx: &Context<'_>, msg: &Message, key: &str) -> Result<()> {
    let Some(row) = fresh_row(ctx, msg, key).await? else {
        return Ok(());
    };

    let Some(owner) = &row.owner else {
        let err = Error::PreconditionFailed(Precondition::NotClaimed);
        reply(ctx, msg, error_embed(&describe(&err, &row.pokemon, msg.author.id))).await?;
        return Ok(());
    };

    let text = {
        let sheet = ctx.sheet.read().await;
        let pending: Vec<&ClaimRow> = sheet
            .rows_of(owner.id)
            .into_iter()
            .filter(|row| matches!(row.status(), Status::Claimed | Status::CorrectionPending))
            .collect();
        if pending.is_empty() {
            None
        } else {
            Some(reminder_text(&pending, &sheet.event().deadline))
        }
    };

    let Some(text) = text else {
        let done = format!("**{}** has nothing left to draw.", owner.name);
        reply(ctx, msg, row_embed(done, &row)).await?;
        return Ok(());
    };

    let via = if notify(ctx, owner.id, msg.channel_id, &text).await? {
        "DM"
    } else {
        "channel"
    };
    log_internal!(
        "Reminded {} about {} by {}",
        owner.name,
        row.color(),
        via
    );
    reply(ctx, msg, row_embed(format!("Reminded **{}**.", owner.name), &row)).await?;
    Ok(())
}
