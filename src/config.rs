use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub database_url: Option<String>,
    /// `None` only when `MESSAGING_IN_MEMORY` opts into the local backend.
    pub messaging_api_url: Option<String>,
    pub messaging_api_key: Option<String>,
    pub messaging_timeout: Duration,
    pub fallback_interval: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();

        let messaging_api_url = optional("MESSAGING_API_URL");
        let messaging_in_memory = flag(optional("MESSAGING_IN_MEMORY").as_deref())
            .ok_or("MESSAGING_IN_MEMORY env param must be `true` or `false`")?;
        if messaging_api_url.is_none() && !messaging_in_memory {
            return Err("MESSAGING_API_URL env param is required unless MESSAGING_IN_MEMORY=true");
        }

        Ok(Config {
            port: var("PORT")
                .map_err(|_| "An error occured while getting PORT env param")?
                .parse::<u16>()
                .map_err(|_| "An error occured while parsing PORT env param")?,
            scheme: var("SCHEME").map_err(|_| "An error occured while getting SCHEME env param")?,
            host: var("HOST").map_err(|_| "An error occured while getting HOST env param")?,
            database_url: optional("DATABASE_URL"),
            messaging_api_url,
            messaging_api_key: optional("MESSAGING_API_KEY"),
            messaging_timeout: Duration::from_secs(
                optional("MESSAGING_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .map_err(|_| "An error occured while parsing MESSAGING_TIMEOUT_SECS env param")?
                    .unwrap_or(30),
            ),
            fallback_interval: Duration::from_millis(
                optional("DISPATCH_FALLBACK_INTERVAL_MS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .map_err(|_| {
                        "An error occured while parsing DISPATCH_FALLBACK_INTERVAL_MS env param"
                    })?
                    .unwrap_or(0),
            ),
            log_format: match optional("LOG_FORMAT").as_deref() {
                None | Some("pretty") => LogFormat::Pretty,
                Some("json") => LogFormat::Json,
                Some(_) => return Err("LOG_FORMAT env param must be `pretty` or `json`"),
            },
        })
    }
}

fn optional(name: &str) -> Option<String> {
    var(name).ok().filter(|v| !v.trim().is_empty())
}

fn flag(value: Option<&str>) -> Option<bool> {
    match value {
        None | Some("false") | Some("0") => Some(false),
        Some("true") | Some("1") => Some(true),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::flag;

    #[test]
    fn in_memory_flag_defaults_to_off() {
        assert_eq!(flag(None), Some(false));
        assert_eq!(flag(Some("true")), Some(true));
        assert_eq!(flag(Some("1")), Some(true));
        assert_eq!(flag(Some("yes")), None);
    }
}
