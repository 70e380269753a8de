//! Process configuration read from the environment (and `.env`).

use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use url::Url;

use crate::error::ConfigError;

const OBFUSCATED_KEY_PREFIX: &str = "gpt:";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub openai: OpenAiConfig,
    pub assets: Assets,
    pub webhook: Option<Webhook>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
    pub proxy: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Assets {
    pub quiz_image: PathBuf,
    pub talk_image: PathBuf,
    pub characters_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Webhook {
    pub url: Url,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = var("TELOXIDE_TOKEN").ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;
        let api_key = var("CHATGPT_TOKEN")
            .or_else(|| var("OPENAI_API_KEY"))
            .map(|key| decode_api_key(&key))
            .ok_or(ConfigError::Missing("CHATGPT_TOKEN"))?;

        let openai = OpenAiConfig {
            api_key,
            base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com/v1".into()),
            model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
            max_tokens: parse_or("OPENAI_MAX_TOKENS", var("OPENAI_MAX_TOKENS"), 3000)?,
            temperature: parse_or("OPENAI_TEMPERATURE", var("OPENAI_TEMPERATURE"), 0.9)?,
            timeout: Duration::from_secs(parse_or(
                "OPENAI_TIMEOUT_SECS",
                var("OPENAI_TIMEOUT_SECS"),
                60,
            )?),
            proxy: var("OPENAI_PROXY"),
        };

        let assets = Assets {
            quiz_image: var("QUIZ_IMAGE")
                .unwrap_or_else(|| "data/images/quiz.png".into())
                .into(),
            talk_image: var("TALK_IMAGE")
                .unwrap_or_else(|| "data/images/talk.png".into())
                .into(),
            characters_dir: var("CHARACTERS_DIR")
                .unwrap_or_else(|| "prompts/characters".into())
                .into(),
        };

        let webhook = match (var("NGROK_URL"), var("NGROK_ADDR")) {
            (Some(url), Some(addr)) => Some(Webhook {
                url: parse("NGROK_URL", &url)?,
                addr: parse("NGROK_ADDR", &addr)?,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("NGROK_ADDR")),
            (None, Some(_)) => return Err(ConfigError::Missing("NGROK_URL")),
        };

        Ok(Self {
            bot_token,
            openai,
            assets,
            webhook,
        })
    }
}

/// Keys stored as `gpt:<reversed tail>` expand to `sk-proj-<tail>`.
pub fn decode_api_key(raw: &str) -> String {
    match raw.trim().strip_prefix(OBFUSCATED_KEY_PREFIX) {
        Some(reversed) => format!("sk-proj-{}", reversed.chars().rev().collect::<String>()),
        None => raw.trim().to_owned(),
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        var,
        reason: err.to_string(),
    })
}

fn parse_or<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |value| parse(var, &value))
}
