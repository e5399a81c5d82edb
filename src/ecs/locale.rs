//! ECS regional endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplaces served by the E-Commerce Service, each with its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Us,
    Uk,
    De,
    Fr,
    Ca,
    Jp,
    It,
    Es,
    Cn,
}

impl Locale {
    /// Returns the API host for this locale.
    pub fn host(&self) -> &'static str {
        match self {
            Locale::Us => "ecs.amazonaws.com",
            Locale::Uk => "ecs.amazonaws.co.uk",
            Locale::De => "ecs.amazonaws.de",
            Locale::Fr => "ecs.amazonaws.fr",
            Locale::Ca => "ecs.amazonaws.ca",
            Locale::Jp => "ecs.amazonaws.jp",
            Locale::It => "webservices.amazon.it",
            Locale::Es => "webservices.amazon.es",
            Locale::Cn => "webservices.amazon.cn",
        }
    }

    /// Returns the storefront domain whose catalogue this endpoint searches.
    pub fn marketplace(&self) -> &'static str {
        match self {
            Locale::Us => "amazon.com",
            Locale::Uk => "amazon.co.uk",
            Locale::De => "amazon.de",
            Locale::Fr => "amazon.fr",
            Locale::Ca => "amazon.ca",
            Locale::Jp => "amazon.co.jp",
            Locale::It => "amazon.it",
            Locale::Es => "amazon.es",
            Locale::Cn => "amazon.cn",
        }
    }

    pub fn all() -> &'static [Locale] {
        &[
            Locale::Us,
            Locale::Uk,
            Locale::De,
            Locale::Fr,
            Locale::Ca,
            Locale::Jp,
            Locale::It,
            Locale::Es,
            Locale::Cn,
        ]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Locale::Us => "us",
            Locale::Uk => "uk",
            Locale::De => "de",
            Locale::Fr => "fr",
            Locale::Ca => "ca",
            Locale::Jp => "jp",
            Locale::It => "it",
            Locale::Es => "es",
            Locale::Cn => "cn",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Locale::Us),
            "uk" | "gb" | "united kingdom" => Ok(Locale::Uk),
            "de" | "germany" => Ok(Locale::De),
            "fr" | "france" => Ok(Locale::Fr),
            "ca" | "canada" => Ok(Locale::Ca),
            "jp" | "japan" => Ok(Locale::Jp),
            "it" | "italy" => Ok(Locale::It),
            "es" | "spain" => Ok(Locale::Es),
            "cn" | "china" => Ok(Locale::Cn),
            _ => Err(LocaleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocaleParseError(String);

impl fmt::Display for LocaleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown locale '{}'. Valid locales: us, uk, de, fr, ca, jp, it, es, cn",
            self.0
        )
    }
}

impl std::error::Error for LocaleParseError {}
