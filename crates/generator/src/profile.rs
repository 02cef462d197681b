//! Generation profile: probabilities and value overrides.
//!
//! Every field has a default, so an empty YAML document is a valid profile.
//!
//! ## YAML Format
//!
//! ```yaml
//! variable_chance: 0.5
//! sale_chance: 0.3
//! gallery_chance: 0.1
//! currency: EUR
//! overrides:
//!   height: 20
//!   weight: { min: 1, max: 5 }
//!   price: { min: 10, max: 99 }
//!   is_virtual: false
//! ```

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use smoothgen_core::CurrencyCode;
use thiserror::Error;
use tracing::instrument;

/// Default share of variable products.
pub const DEFAULT_VARIABLE_CHANCE: f64 = 0.3;
/// Default share of products on sale.
pub const DEFAULT_SALE_CHANCE: f64 = 0.3;
/// Default share of products with an image gallery.
pub const DEFAULT_GALLERY_CHANCE: f64 = 0.1;

/// Errors that can occur when loading a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Failed to read the profile file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The YAML did not match the profile shape.
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The profile parsed but contains unusable values.
    #[error("{} validation errors: {}", .0.len(), .0.join("; "))]
    Invalid(Vec<String>),
}

/// A whole number, either fixed or drawn from an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberSpec {
    Fixed(u32),
    Between { min: u32, max: u32 },
}

impl NumberSpec {
    /// Draw a value. Reversed bounds are swapped.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        match *self {
            Self::Fixed(value) => value,
            Self::Between { min, max } => {
                let (low, high) = if min <= max { (min, max) } else { (max, min) };
                rng.random_range(low..=high)
            }
        }
    }

    /// Smallest value this can produce.
    #[must_use]
    pub const fn lower_bound(&self) -> u32 {
        match *self {
            Self::Fixed(value) => value,
            Self::Between { min, max } => {
                if min <= max {
                    min
                } else {
                    max
                }
            }
        }
    }
}

/// Values forced onto generated products instead of random draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProductOverrides {
    pub height: Option<NumberSpec>,
    pub width: Option<NumberSpec>,
    pub length: Option<NumberSpec>,
    pub weight: Option<NumberSpec>,
    /// Whole-currency-unit price.
    pub price: Option<NumberSpec>,
    pub is_virtual: bool,
}

/// Tunables for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorProfile {
    /// Probability that `generate` produces a variable product.
    pub variable_chance: f64,
    /// Probability that a product gets a sale price.
    pub sale_chance: f64,
    /// Probability that a product gets an image gallery.
    pub gallery_chance: f64,
    pub currency: CurrencyCode,
    pub overrides: ProductOverrides,
}

impl Default for GeneratorProfile {
    fn default() -> Self {
        Self {
            variable_chance: DEFAULT_VARIABLE_CHANCE,
            sale_chance: DEFAULT_SALE_CHANCE,
            gallery_chance: DEFAULT_GALLERY_CHANCE,
            currency: CurrencyCode::default(),
            overrides: ProductOverrides::default(),
        }
    }
}

impl GeneratorProfile {
    /// Parse a profile from YAML.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Yaml` if the document does not match.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProfileError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a profile file. Does not validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ProfileError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }

    /// Check the profile for values the generator cannot use.
    ///
    /// Returns one message per problem; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("variable_chance", self.variable_chance),
            ("sale_chance", self.sale_chance),
            ("gallery_chance", self.gallery_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be between 0 and 1, got {value}"));
            }
        }

        let dimensions = [
            ("height", self.overrides.height),
            ("width", self.overrides.width),
            ("length", self.overrides.length),
            ("weight", self.overrides.weight),
            ("price", self.overrides.price),
        ];
        for (name, spec) in dimensions {
            if let Some(NumberSpec::Between { min, max }) = spec {
                if min > max {
                    errors.push(format!("{name}: min ({min}) is greater than max ({max})"));
                }
            }
        }

        if self.overrides.price.is_some_and(|price| price.lower_bound() == 0) {
            errors.push("price must be at least 1".to_string());
        }

        errors
    }

    /// Validate, turning problems into an error.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Invalid` listing every problem found.
    pub fn validated(self) -> Result<Self, ProfileError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ProfileError::Invalid(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_parse_yaml_profile() {
        let yaml = r"
variable_chance: 0.5
currency: EUR
overrides:
  height: 20
  weight: { min: 1, max: 5 }
  is_virtual: true
";

        let profile = GeneratorProfile::from_yaml_str(yaml).expect("valid YAML");
        assert!((profile.variable_chance - 0.5).abs() < f64::EPSILON);
        assert!((profile.sale_chance - DEFAULT_SALE_CHANCE).abs() < f64::EPSILON);
        assert_eq!(profile.currency, CurrencyCode::EUR);
        assert_eq!(profile.overrides.height, Some(NumberSpec::Fixed(20)));
        assert_eq!(
            profile.overrides.weight,
            Some(NumberSpec::Between { min: 1, max: 5 })
        );
        assert_eq!(profile.overrides.price, None);
        assert!(profile.overrides.is_virtual);
        assert!(profile.validate().is_empty());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let profile = GeneratorProfile::from_yaml_str("  \n").expect("empty is fine");
        assert_eq!(profile, GeneratorProfile::default());
    }

    #[test]
    fn test_rejects_unknown_shape() {
        let result = GeneratorProfile::from_yaml_str("variable_chance: [1, 2]");
        assert!(matches!(result, Err(ProfileError::Yaml(_))));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let profile = GeneratorProfile {
            variable_chance: 1.5,
            gallery_chance: -0.1,
            overrides: ProductOverrides {
                width: Some(NumberSpec::Between { min: 9, max: 3 }),
                price: Some(NumberSpec::Fixed(0)),
                ..ProductOverrides::default()
            },
            ..GeneratorProfile::default()
        };

        let errors = profile.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("variable_chance")));
        assert!(errors.iter().any(|e| e.contains("gallery_chance")));
        assert!(errors.iter().any(|e| e.starts_with("width")));
        assert!(errors.iter().any(|e| e.contains("price must be at least 1")));
    }

    #[test]
    fn test_validated_wraps_errors() {
        let profile = GeneratorProfile {
            sale_chance: f64::NAN,
            ..GeneratorProfile::default()
        };
        let err = profile.validated().expect_err("NaN is invalid");
        assert!(err.to_string().starts_with("1 validation errors"));
    }

    #[test]
    fn test_number_spec_sample() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(NumberSpec::Fixed(12).sample(&mut rng), 12);
        for _ in 0..100 {
            let v = NumberSpec::Between { min: 5, max: 8 }.sample(&mut rng);
            assert!((5..=8).contains(&v));
            let swapped = NumberSpec::Between { min: 8, max: 5 }.sample(&mut rng);
            assert!((5..=8).contains(&swapped));
        }
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = GeneratorProfile::load("/nonexistent/profile.yaml").await;
        assert!(matches!(result, Err(ProfileError::Io { .. })));
    }
}
