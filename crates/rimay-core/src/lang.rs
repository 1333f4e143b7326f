use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TranslateError;

/// One of the two languages the system translates between.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Spanish.
    Es,
    /// Kichwa.
    Qu,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::Qu => "qu",
        }
    }

    pub fn complement(self) -> Self {
        match self {
            Self::Es => Self::Qu,
            Self::Qu => Self::Es,
        }
    }

    /// Direction of a translation that starts from this language.
    pub fn direction_from(self) -> Direction {
        match self {
            Self::Es => Direction::EsToQu,
            Self::Qu => Direction::QuToEs,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Self::Es),
            "qu" => Ok(Self::Qu),
            other => Err(TranslateError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// A supported translation direction. The pair is always complementary.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    EsToQu,
    QuToEs,
}

impl Direction {
    pub fn source(self) -> Language {
        match self {
            Self::EsToQu => Language::Es,
            Self::QuToEs => Language::Qu,
        }
    }

    pub fn target(self) -> Language {
        self.source().complement()
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::EsToQu => Self::QuToEs,
            Self::QuToEs => Self::EsToQu,
        }
    }

    /// Build a direction from raw language codes, rejecting anything other
    /// than `es`→`qu` and `qu`→`es`.
    pub fn from_codes(src: &str, dest: &str) -> Result<Self, TranslateError> {
        let unsupported = || TranslateError::UnsupportedPair {
            src: src.to_string(),
            dest: dest.to_string(),
        };
        let source: Language = src.parse().map_err(|_| unsupported())?;
        let target: Language = dest.parse().map_err(|_| unsupported())?;
        Self::from_pair(source, target).ok_or_else(unsupported)
    }

    pub fn from_pair(source: Language, target: Language) -> Option<Self> {
        match (source, target) {
            (Language::Es, Language::Qu) => Some(Self::EsToQu),
            (Language::Qu, Language::Es) => Some(Self::QuToEs),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source(), self.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        assert_eq!("es".parse::<Language>().unwrap(), Language::Es);
        assert_eq!(" QU ".parse::<Language>().unwrap(), Language::Qu);
        assert_eq!(Language::Es.code(), "es");
        assert_eq!(Language::Qu.to_string(), "qu");
    }

    #[test]
    fn unknown_language_rejected() {
        let err = "en".parse::<Language>().unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedLanguage(code) if code == "en"));
    }

    #[test]
    fn complement_is_involutive() {
        assert_eq!(Language::Es.complement(), Language::Qu);
        assert_eq!(Language::Qu.complement().complement(), Language::Qu);
    }

    #[test]
    fn direction_from_codes() {
        assert_eq!(Direction::from_codes("es", "qu").unwrap(), Direction::EsToQu);
        assert_eq!(Direction::from_codes("qu", "es").unwrap(), Direction::QuToEs);
    }

    #[test]
    fn same_language_pair_rejected() {
        let err = Direction::from_codes("es", "es").unwrap_err();
        assert!(matches!(
            err,
            TranslateError::UnsupportedPair { ref src, ref dest } if src == "es" && dest == "es"
        ));
    }

    #[test]
    fn foreign_language_pair_rejected() {
        assert!(Direction::from_codes("en", "qu").is_err());
        assert!(Direction::from_codes("es", "auto").is_err());
    }

    #[test]
    fn direction_endpoints() {
        assert_eq!(Direction::EsToQu.source(), Language::Es);
        assert_eq!(Direction::EsToQu.target(), Language::Qu);
        assert_eq!(Direction::QuToEs.reversed(), Direction::EsToQu);
        assert_eq!(Language::Qu.direction_from(), Direction::QuToEs);
        assert_eq!(Direction::QuToEs.to_string(), "qu->es");
    }
}
