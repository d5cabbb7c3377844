//! Logging to the terminal with colors

use serenity::all::{ChannelId, GuildId, Http};
use std::fmt::Display;
use std::io::IsTerminal;
use std::sync::{Arc, LazyLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Event,
    Internal,
    User,
    Channel,
    Guild,
    /// Pokemon and other sheet rows
    Item,
    Glue,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Default => "\x1b[0m",
            Color::Event => "\x1b[33m",
            Color::Internal => "\x1b[35m",
            Color::User => "\x1b[32m",
            Color::Channel => "\x1b[36m",
            Color::Guild => "\x1b[38;5;33m",
            Color::Item => "\x1b[38;5;208m",
            Color::Glue => "\x1b[90m",
        }
    }
}

/// Colors only go to a terminal.  Whether stdout is one won't change while we run.
static STDOUT_IS_TERMINAL: LazyLock<bool> = LazyLock::new(|| std::io::stdout().is_terminal());

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if *STDOUT_IS_TERMINAL {
            f.write_str(self.code())
        } else {
            Ok(())
        }
    }
}

fn styled(color: Color, text: impl Display, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", color.code(), text, Color::Default.code())
    } else {
        text.to_string()
    }
}

/// `text` in `color`, reset afterwards
pub fn paint(color: Color, text: impl Display) -> String {
    styled(color, text, *STDOUT_IS_TERMINAL)
}

/// One log line: a colored marker, then the message
#[doc(hidden)]
#[macro_export]
macro_rules! log_line {
    ($color:ident, $marker:literal, $fmtstr:expr) => {{
        println!(
            concat!("{}", $marker, "{} ", $fmtstr),
            $crate::logging::Color::$color,
            $crate::logging::Color::Default
        )
    }};

    ($color:ident, $marker:literal, $fmtstr:expr, $($args:expr),* $(,)?) => {{
        println!(
            concat!("{}", $marker, "{} ", $fmtstr),
            $crate::logging::Color::$color,
            $crate::logging::Color::Default,
            $($args),*
        )
    }};
}

/// Something happened on Discord
#[macro_export]
macro_rules! log_event {
    ($($line:tt)*) => {
        $crate::log_line!(Event, "*", $($line)*)
    };
}

/// Something the bot did on its own
#[macro_export]
macro_rules! log_internal {
    ($($line:tt)*) => {
        $crate::log_line!(Internal, "+", $($line)*)
    };
}

pub trait PrintColor {
    fn color(&self) -> String;
}

/// For things whose printable name has to be fetched first
#[serenity::async_trait]
pub trait AsyncPrintColor {
    async fn color(&self, http: &Arc<Http>) -> String;
}

// Field separator
pub struct Glue;
impl PrintColor for Glue {
    fn color(&self) -> String {
        paint(Color::Glue, ":")
    }
}

impl PrintColor for crate::afd::ClaimRow {
    fn color(&self) -> String {
        paint(Color::Item, format!("#{} {}", self.dex, self.pokemon))
    }
}

impl PrintColor for serenity::all::CurrentUser {
    fn color(&self) -> String {
        paint(Color::User, &self.name)
    }
}

impl PrintColor for serenity::all::User {
    fn color(&self) -> String {
        paint(Color::User, &self.name)
    }
}

#[serenity::async_trait]
impl AsyncPrintColor for ChannelId {
    async fn color(&self, http: &Arc<Http>) -> String {
        let name = self
            .name(http)
            .await
            .unwrap_or_else(|_| "<unknown-channel>".to_owned());
        paint(Color::Channel, name)
    }
}

#[serenity::async_trait]
impl AsyncPrintColor for Option<GuildId> {
    async fn color(&self, http: &Arc<Http>) -> String {
        let name = match self {
            Some(guild_id) => guild_id
                .to_partial_guild(http)
                .await
                .map(|guild| guild.name)
                .unwrap_or_else(|_| "<unknown-guild>".to_owned()),
            None => "<direct-message>".to_owned(),
        };
        paint(Color::Guild, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_wrap_text_only_when_enabled() {
        assert_eq!(
            styled(Color::Item, "#133 Eevee", true),
            "\x1b[38;5;208m#133 Eevee\x1b[0m"
        );
        assert_eq!(styled(Color::Item, "#133 Eevee", false), "#133 Eevee");
    }

    #[test]
    fn rows_print_with_their_dex_number() {
        let row = crate::afd::ClaimRow::new(133, "Eevee");
        assert_eq!(row.color(), paint(Color::Item, "#133 Eevee"));
    }
}
