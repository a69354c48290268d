//! Share links — where tokens meet URLs.
//!
//! DESIGN
//! ======
//! A link is the configured base URL with the token in one query parameter.
//! Opening a link without that parameter means "start a new draw" (host
//! mode). A parameter that fails to decode is an invalid link, reported to
//! the caller and never a crash.

use tracing::warn;
use url::Url;

use crate::codec::StateCodec;
use crate::config::DrawConfig;
use crate::state::DrawState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("cannot publish a link for an empty token")]
    EmptyToken,
}

/// How an incoming link should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// No token present: seed a fresh draw.
    Host(DrawState),
    /// Token decoded to a state held by this participant.
    Participant(DrawState),
    /// Token present but unrecognized.
    Invalid,
}

impl LinkMode {
    /// The state to act on, if the link was usable.
    #[must_use]
    pub fn state(&self) -> Option<DrawState> {
        match self {
            Self::Host(state) | Self::Participant(state) => Some(*state),
            Self::Invalid => None,
        }
    }
}

/// Builds and parses share links for one base URL and parameter name.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: Url,
    param: String,
}

impl LinkBuilder {
    #[must_use]
    pub fn new(base_url: Url, param: impl Into<String>) -> Self {
        Self {
            base_url,
            param: param.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &DrawConfig) -> Self {
        Self::new(config.base_url.clone(), config.query_param.clone())
    }

    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Embed `token` in the base URL, replacing any earlier token.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::EmptyToken`] when `token` is empty, which is how
    /// the codec reports an encoding failure.
    pub fn link_for(&self, token: &str) -> Result<Url, LinkError> {
        if token.is_empty() {
            return Err(LinkError::EmptyToken);
        }

        let mut url = self.base_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != self.param.as_str())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(&self.param, token);
        Ok(url)
    }

    /// Encode `state` in the compact grammar and build its link.
    ///
    /// # Errors
    ///
    /// See [`LinkBuilder::link_for`].
    pub fn publish(&self, codec: &StateCodec, state: &DrawState) -> Result<Url, LinkError> {
        self.link_for(&codec.encode(state))
    }

    /// Pull the token out of a full link, or accept `input` as a bare token.
    ///
    /// `None` means `input` is a URL without the token parameter.
    #[must_use]
    pub fn token_from(&self, input: &str) -> Option<String> {
        let input = input.trim();
        match Url::parse(input) {
            Ok(url) => url
                .query_pairs()
                .find(|(key, _)| key == self.param.as_str())
                .map(|(_, value)| value.into_owned()),
            Err(_) => Some(input.to_owned()),
        }
    }

    /// Decide how to treat an incoming link or token.
    ///
    /// `now_ms` stamps the fresh state in host mode.
    #[must_use]
    pub fn resolve(&self, codec: &StateCodec, input: Option<&str>, now_ms: u64) -> LinkMode {
        let Some(token) = input.and_then(|raw| self.token_from(raw)) else {
            return LinkMode::Host(DrawState::fresh(codec.pool(), Some(now_ms)));
        };

        match codec.decode(&token) {
            Some(state) => LinkMode::Participant(state),
            None => {
                warn!(param = %self.param, "link carries an unrecognized token");
                LinkMode::Invalid
            }
        }
    }
}

#[cfg(test)]
#[path = "link_test.rs"]
mod tests;
