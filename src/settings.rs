//! User-facing configuration: which size tier each category uses, and how large the tiers are.
//!
//! Settings are validated as they are built or deserialized,
//! so a [`StackSettings`] value is always safe to hand to the stack size pass.

use bevy::ecs::system::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::StackCategory;

/// How much larger stacks of a category become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SizeTier {
    /// Stack limits are left untouched.
    #[default]
    Default,
    /// Stack limits are multiplied by [`StackSettings::large`].
    #[serde(alias = "XL")]
    Large,
    /// Stack limits are multiplied by [`StackSettings::extra_large`].
    #[serde(alias = "XXL")]
    ExtraLarge,
}

/// A stack size multiplier of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Magnitude(f64);

impl Magnitude {
    /// Leaves stack sizes unchanged.
    pub const ONE: Magnitude = Magnitude(1.0);

    /// Validates a multiplier.
    ///
    /// # Example
    ///
    /// ```
    /// use stack_xxl::settings::Magnitude;
    ///
    /// assert!(Magnitude::new(2.5).is_ok());
    /// assert!(Magnitude::new(0.5).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, SettingsError> {
        if !value.is_finite() {
            Err(SettingsError::NonFiniteMagnitude(value))
        } else if value < 1.0 {
            Err(SettingsError::MagnitudeBelowOne(value))
        } else {
            Ok(Magnitude(value))
        }
    }

    /// The multiplier.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Magnitude {
    type Error = SettingsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Magnitude::new(value)
    }
}

impl From<Magnitude> for f64 {
    fn from(magnitude: Magnitude) -> Self {
        magnitude.0
    }
}

/// The size tier chosen for every [`StackCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCategoryTiers")]
pub struct CategoryTiers {
    /// Silver.
    pub silver: SizeTier,
    /// Manufactured goods, raw resources, stone blocks and medicine.
    pub resources: SizeTier,
    /// Leathers and textiles.
    pub textiles: SizeTier,
    /// Drugs.
    pub drugs: SizeTier,
    /// Raw meat.
    pub meat: SizeTier,
    /// Raw food, plant matter, animal products, feed, eggs and cooking supplies.
    pub raw: SizeTier,
    /// Meals and other prepared food.
    pub meals: SizeTier,
    /// Prostheses, organs and other body parts.
    pub body_parts: SizeTier,
    /// Anything else that already stacks.
    pub other_stackable: SizeTier,
    /// Anything else that does not stack yet.
    pub other_single: SizeTier,
}

impl CategoryTiers {
    /// The tier chosen for `category`.
    pub fn tier(&self, category: StackCategory) -> SizeTier {
        match category {
            StackCategory::Silver => self.silver,
            StackCategory::Resources => self.resources,
            StackCategory::Textiles => self.textiles,
            StackCategory::Drugs => self.drugs,
            StackCategory::Meat => self.meat,
            StackCategory::Raw => self.raw,
            StackCategory::Meals => self.meals,
            StackCategory::BodyParts => self.body_parts,
            StackCategory::OtherStackable => self.other_stackable,
            StackCategory::OtherSingle => self.other_single,
        }
    }

    /// Uses the same tier for every category.
    pub fn uniform(tier: SizeTier) -> Self {
        CategoryTiers {
            silver: tier,
            resources: tier,
            textiles: tier,
            drugs: tier,
            meat: tier,
            raw: tier,
            meals: tier,
            body_parts: tier,
            other_stackable: tier,
            other_single: tier,
        }
    }
}

impl Default for CategoryTiers {
    fn default() -> Self {
        RawCategoryTiers::default().into()
    }
}

/// Deserialization shape of [`CategoryTiers`].
///
/// Silver follows the resources tier unless it is set explicitly.
#[derive(Deserialize)]
#[serde(default)]
struct RawCategoryTiers {
    #[serde(deserialize_with = "explicit_tier")]
    silver: Option<SizeTier>,
    resources: SizeTier,
    textiles: SizeTier,
    drugs: SizeTier,
    meat: SizeTier,
    raw: SizeTier,
    meals: SizeTier,
    body_parts: SizeTier,
    other_stackable: SizeTier,
    other_single: SizeTier,
}

/// Reads a bare tier such as `silver: Large`, without a `Some(..)` wrapper.
fn explicit_tier<'de, D>(deserializer: D) -> Result<Option<SizeTier>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    SizeTier::deserialize(deserializer).map(Some)
}

impl Default for RawCategoryTiers {
    fn default() -> Self {
        RawCategoryTiers {
            silver: None,
            resources: SizeTier::Large,
            textiles: SizeTier::Large,
            drugs: SizeTier::Large,
            meat: SizeTier::Large,
            raw: SizeTier::Large,
            meals: SizeTier::Large,
            body_parts: SizeTier::Default,
            other_stackable: SizeTier::Large,
            other_single: SizeTier::Default,
        }
    }
}

impl From<RawCategoryTiers> for CategoryTiers {
    fn from(raw: RawCategoryTiers) -> Self {
        CategoryTiers {
            silver: raw.silver.unwrap_or(raw.resources),
            resources: raw.resources,
            textiles: raw.textiles,
            drugs: raw.drugs,
            meat: raw.meat,
            raw: raw.raw,
            meals: raw.meals,
            body_parts: raw.body_parts,
            other_stackable: raw.other_stackable,
            other_single: raw.other_single,
        }
    }
}

/// Configuration of the stack size pass.
///
/// Inserted as a resource by [`StackXxlPlugin`](crate::plugin::StackXxlPlugin), and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize)]
#[serde(try_from = "RawStackSettings")]
pub struct StackSettings {
    /// The tier chosen for each category.
    pub tiers: CategoryTiers,
    /// The multiplier of [`SizeTier::Large`], shared by all categories.
    pub large: Magnitude,
    /// The multiplier of [`SizeTier::ExtraLarge`], shared by all categories.
    pub extra_large: Magnitude,
    /// Logs the category detected for every adjusted definition.
    pub debug_logging: bool,
    /// When false, stack sizes are left alone.
    pub enabled: bool,
}

impl Default for StackSettings {
    fn default() -> Self {
        StackSettings {
            tiers: CategoryTiers::default(),
            large: Magnitude(DEFAULT_LARGE),
            extra_large: Magnitude(DEFAULT_EXTRA_LARGE),
            debug_logging: false,
            enabled: true,
        }
    }
}

const DEFAULT_LARGE: f64 = 10.0;
const DEFAULT_EXTRA_LARGE: f64 = 20.0;

impl StackSettings {
    /// Default settings with the given tier magnitudes.
    pub fn with_magnitudes(large: f64, extra_large: f64) -> Result<Self, SettingsError> {
        Ok(StackSettings {
            large: Magnitude::new(large)?,
            extra_large: Magnitude::new(extra_large)?,
            ..Default::default()
        })
    }

    /// The stack size multiplier of `tier`.
    pub fn multiplier_for(&self, tier: SizeTier) -> f64 {
        match tier {
            SizeTier::Default => Magnitude::ONE.get(),
            SizeTier::Large => self.large.get(),
            SizeTier::ExtraLarge => self.extra_large.get(),
        }
    }

    /// The stack size multiplier configured for `category`.
    pub fn multiplier_for_category(&self, category: StackCategory) -> f64 {
        self.multiplier_for(self.tiers.tier(category))
    }

    /// Parses and validates settings written in RON.
    ///
    /// Omitted fields keep their default values.
    #[cfg(feature = "ron")]
    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }
}

/// Deserialization shape of [`StackSettings`], before validation.
#[derive(Deserialize)]
#[serde(default)]
struct RawStackSettings {
    tiers: CategoryTiers,
    large: f64,
    extra_large: f64,
    debug_logging: bool,
    enabled: bool,
}

impl Default for RawStackSettings {
    fn default() -> Self {
        RawStackSettings {
            tiers: CategoryTiers::default(),
            large: DEFAULT_LARGE,
            extra_large: DEFAULT_EXTRA_LARGE,
            debug_logging: false,
            enabled: true,
        }
    }
}

impl TryFrom<RawStackSettings> for StackSettings {
    type Error = SettingsError;

    fn try_from(raw: RawStackSettings) -> Result<Self, Self::Error> {
        Ok(StackSettings {
            tiers: raw.tiers,
            large: Magnitude::new(raw.large)?,
            extra_large: Magnitude::new(raw.extra_large)?,
            debug_logging: raw.debug_logging,
            enabled: raw.enabled,
        })
    }
}

/// An error raised while building or reading [`StackSettings`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// Multipliers must be at least 1.
    #[error("The stack size multiplier {0} is below 1.")]
    MagnitudeBelowOne(f64),
    /// Multipliers must be finite numbers.
    #[error("The stack size multiplier {0} is not a finite number.")]
    NonFiniteMagnitude(f64),
    /// The settings text could not be parsed.
    #[cfg(feature = "ron")]
    #[error("Could not parse stack settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
