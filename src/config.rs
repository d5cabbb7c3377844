use anyhow::{anyhow, Result};
use serenity::all::{ChannelId, GuildId, RoleId};
use std::{collections::HashMap, path::PathBuf};
use tokio::io::AsyncReadExt;

const CONFIG_DIR_REL_HOME: &str = ".config/afdbot";
const CONFIG_FILE: &str = "config.toml";

/// Bot configuration
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub general: General,
    pub afd: Afd,
    #[serde(default)]
    pub draw: Draw,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct General {
    pub discord_token: String,
    pub bot_owners: Vec<String>,
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct Afd {
    pub admin_role_id: RoleId,
    pub participant_role_id: RoleId,
    /// Where claim activity is announced
    pub log_channel_id: Option<ChannelId>,
    /// Relative to the configuration directory
    #[serde(default = "default_sheet_file")]
    pub sheet_file: PathBuf,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Draw {
    pub session_timeout_seconds: u64,
    pub prompt_timeout_seconds: u64,
    pub max_render_chars: usize,
    /// Guilds searched for emojis named after a mixed colour's hex code
    pub emoji_guild_ids: Vec<GuildId>,
    /// Overrides of the default cursor, base value to highlighted value
    pub cursor: HashMap<String, String>,
}

impl Default for Draw {
    fn default() -> Self {
        Self {
            session_timeout_seconds: 600,
            prompt_timeout_seconds: 30,
            max_render_chars: 4096,
            emoji_guild_ids: Vec::new(),
            cursor: HashMap::new(),
        }
    }
}

fn default_prefix() -> String {
    ";".to_owned()
}

fn default_sheet_file() -> PathBuf {
    PathBuf::from("sheet.json")
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_DIR_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        let path = Self::config_dir()?.join(CONFIG_FILE);

        let mut file = tokio::fs::File::open(&path).await.map_err(|e| {
            anyhow!(
                "Could not open configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Self::parse(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        // Reject a bad cursor table at load time rather than on the first drawing
        crate::draw::CursorMap::with_overrides(&config.draw.cursor)?;
        Ok(config)
    }

    pub async fn reload(&mut self) -> Result<()> {
        let new = Self::load().await?;
        *self = new;
        Ok(())
    }

    /// Absolute location of the claim sheet
    pub fn sheet_path(&self) -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(&self.afd.sheet_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[general]
discord_token = "token"
bot_owners = ["owner"]

[afd]
admin_role_id = 1
participant_role_id = 2
"#;

    #[test]
    fn defaults_fill_optional_sections() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.general.command_prefix, ";");
        assert_eq!(config.afd.sheet_file, PathBuf::from("sheet.json"));
        assert_eq!(config.afd.log_channel_id, None);
        assert_eq!(config.draw.max_render_chars, 4096);
        assert_eq!(config.draw.session_timeout_seconds, 600);
        assert!(config.draw.cursor.is_empty());
    }

    #[test]
    fn cursor_overrides_are_validated() {
        let good = format!("{}\n[draw.cursor]\n\"🟥\" = \"❤️\"\n", MINIMAL);
        let config = Config::parse(&good).unwrap();
        assert_eq!(config.draw.cursor.get("🟥").map(String::as_str), Some("❤️"));

        // Orange's cursor reused for red
        let bad = format!("{}\n[draw.cursor]\n\"🟥\" = \"🟠\"\n", MINIMAL);
        assert!(Config::parse(&bad).is_err());
    }
}
