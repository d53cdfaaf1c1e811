//! Source options and their validation rules.

use serde::{Deserialize, Serialize};

/// Locale segment meaning "no locale prefix" (`www.trustpilot.com`).
pub const DEFAULT_COUNTRY: &str = "www";
/// Business fetched when none is configured.
pub const DEFAULT_BUSINESS: &str = "trustpilot.com";
/// Language filter meaning "every language".
pub const DEFAULT_LANGUAGES: &str = "all";
/// Every star rating.
pub const ALL_STARS: [u8; 5] = [1, 2, 3, 4, 5];

/// Errors raised while loading or validating [`SourceOptions`].
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// `country` is neither the default sentinel nor a two-letter code.
    #[error("Invalid country '{value}': expected a 2-letter code or 'www'")]
    InvalidCountry {
        /// The rejected value.
        value: String,
    },

    /// `languages` is neither the default sentinel nor a two-letter code.
    #[error("Invalid languages '{value}': expected a 2-letter code or 'all'")]
    InvalidLanguages {
        /// The rejected value.
        value: String,
    },

    /// `stars` contains a value outside 1..=5.
    #[error("Invalid star rating {value}: expected 1 through 5")]
    InvalidStar {
        /// The rejected value.
        value: u8,
    },

    /// `business` has no usable first segment or would not stay a single
    /// path segment of the review URL.
    #[error("Invalid business identifier '{value}'")]
    InvalidBusiness {
        /// The rejected value.
        value: String,
    },

    /// The options file is not valid TOML for this schema.
    #[error("Options parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// What to fetch from the review site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceOptions {
    /// Site locale segment for users visiting review pages.
    #[serde(default = "default_country")]
    pub country: String,
    /// Dotted business identifier (its domain on the review site).
    #[serde(default = "default_business")]
    pub business: String,
    /// Only fetch reviews written in this language.
    #[serde(default = "default_languages")]
    pub languages: String,
    /// Star ratings to fetch.
    #[serde(default = "default_stars")]
    pub stars: Vec<u8>,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_business() -> String {
    DEFAULT_BUSINESS.to_string()
}

fn default_languages() -> String {
    DEFAULT_LANGUAGES.to_string()
}

fn default_stars() -> Vec<u8> {
    ALL_STARS.to_vec()
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            country: default_country(),
            business: default_business(),
            languages: default_languages(),
            stars: default_stars(),
        }
    }
}

impl SourceOptions {
    /// Parses options from a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Toml`] on malformed input or unknown keys.
    pub fn from_toml_str(input: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(input)?)
    }

    /// Checks every option against the accepted shapes.
    ///
    /// # Errors
    ///
    /// Returns the first [`OptionsError`] found.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.country != DEFAULT_COUNTRY && !is_two_letter_code(&self.country) {
            return Err(OptionsError::InvalidCountry {
                value: self.country.clone(),
            });
        }

        if self.languages != DEFAULT_LANGUAGES && !is_two_letter_code(&self.languages) {
            return Err(OptionsError::InvalidLanguages {
                value: self.languages.clone(),
            });
        }

        if let Some(&value) = self.stars.iter().find(|star| !(1..=5).contains(*star)) {
            return Err(OptionsError::InvalidStar { value });
        }

        if !is_path_segment(&self.business) {
            return Err(OptionsError::InvalidBusiness {
                value: self.business.clone(),
            });
        }
        crate::BusinessNames::from_business(&self.business)?;

        Ok(())
    }
}

fn is_two_letter_code(value: &str) -> bool {
    value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic())
}

/// No separators, query or fragment markers, escapes or dot segments.
fn is_path_segment(value: &str) -> bool {
    !matches!(value, "." | "..")
        && !value.chars().any(|c| {
            matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_everything() {
        let options = SourceOptions::default();
        assert_eq!(options.country, "www");
        assert_eq!(options.business, "trustpilot.com");
        assert_eq!(options.languages, "all");
        assert_eq!(options.stars, vec![1, 2, 3, 4, 5]);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn toml_fills_missing_keys_with_defaults() {
        let options = SourceOptions::from_toml_str(
            r#"
            business = "acme.co.uk"
            stars = [4, 5]
            "#,
        )
        .unwrap();
        assert_eq!(options.business, "acme.co.uk");
        assert_eq!(options.stars, vec![4, 5]);
        assert_eq!(options.country, "www");
        assert_eq!(options.languages, "all");
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(SourceOptions::from_toml_str("pages = 3").is_err());
    }

    #[test]
    fn accepts_two_letter_codes() {
        let options = SourceOptions {
            country: "dk".to_string(),
            languages: "da".to_string(),
            ..SourceOptions::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn rejects_long_country() {
        let options = SourceOptions {
            country: "usa".to_string(),
            ..SourceOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::InvalidCountry { .. })
        ));
    }

    #[test]
    fn rejects_bad_languages() {
        let options = SourceOptions {
            languages: "e1".to_string(),
            ..SourceOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::InvalidLanguages { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_star() {
        let options = SourceOptions {
            stars: vec![1, 6],
            ..SourceOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::InvalidStar { value: 6 })
        ));

        let options = SourceOptions {
            stars: vec![0],
            ..SourceOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn rejects_empty_business() {
        let options = SourceOptions {
            business: ".com".to_string(),
            ..SourceOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::InvalidBusiness { .. })
        ));
    }

    #[test]
    fn rejects_business_that_escapes_its_path_segment() {
        for business in [
            "acme.com?stars=9",
            "acme.com#top",
            "acme.com/../admin",
            "acme.com\\x",
            "acme%2Ecom",
            "acme .com",
            "..",
        ] {
            let options = SourceOptions {
                business: business.to_string(),
                ..SourceOptions::default()
            };
            assert!(
                matches!(options.validate(), Err(OptionsError::InvalidBusiness { .. })),
                "{business} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_hyphenated_multi_label_business() {
        let options = SourceOptions {
            business: "acme-shop.co.uk".to_string(),
            ..SourceOptions::default()
        };
        assert!(options.validate().is_ok());
    }
}
