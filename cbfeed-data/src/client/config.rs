use url::Url;

use crate::error::ConfigError;

/*----- */
// Feed config
/*----- */
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedConfig<Channel> {
    pub url: Url,
    pub channels: Vec<Channel>,
}

impl<Channel> FeedConfig<Channel> {
    pub fn new(url: &str, channels: Vec<Channel>) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|error| ConfigError::InvalidUrl {
            url: url.to_string(),
            error,
        })?;

        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(ConfigError::UnsupportedScheme {
                url: url.to_string(),
                scheme: parsed.scheme().to_string(),
            });
        }

        if channels.is_empty() {
            return Err(ConfigError::EmptyChannels);
        }

        Ok(Self {
            url: parsed,
            channels,
        })
    }
}
