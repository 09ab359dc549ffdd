//! The stack size pass: rescales the stack limit of every eligible item definition, once.

use std::num::NonZeroU32;

use bevy::ecs::prelude::*;
use bevy::log::info;
use bevy::utils::HashMap;

use crate::category::{classify, is_eligible, StackCategory};
use crate::item_def::{ItemDef, ItemDefManifest};
use crate::settings::StackSettings;

/// The outcome of the stack size pass.
///
/// Once this resource exists, the pass has run and will not run again.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct AdjustmentReport {
    /// How many definitions were looked at.
    pub scanned: usize,
    /// How many definitions had their stack limit rescaled.
    pub adjusted: usize,
    /// How many adjusted definitions fell into each category.
    pub per_category: HashMap<StackCategory, usize>,
}

impl AdjustmentReport {
    /// How many adjusted definitions fell into `category`.
    pub fn count(&self, category: StackCategory) -> usize {
        self.per_category.get(&category).copied().unwrap_or(0)
    }
}

/// Multiplies the stack limit of `def` by `multiplier` in place.
///
/// The result is rounded half away from zero and never drops below 1.
/// Applying this twice compounds.
pub fn apply_multiplier(def: &mut ItemDef, multiplier: f64) {
    // Float to int casts saturate, so huge products clamp to `u32::MAX`.
    let scaled = (def.stack_limit.get() as f64 * multiplier).round() as u32;
    def.stack_limit = NonZeroU32::new(scaled).unwrap_or(NonZeroU32::MIN);
}

/// Rescales every eligible definition in `manifest` according to `settings`.
///
/// When [`StackSettings::debug_logging`] is set, one line per eligible definition is logged,
/// naming the definition, its first category label and the category it was sorted into.
pub fn adjust_stack_sizes(
    manifest: &mut ItemDefManifest,
    settings: &StackSettings,
) -> AdjustmentReport {
    let mut report = AdjustmentReport::default();

    for def in manifest.iter_mut() {
        report.scanned += 1;
        if !is_eligible(def) {
            continue;
        }

        let category = classify(def);
        if settings.debug_logging {
            info!(
                "{} {} {}",
                def.def_name,
                def.first_category().unwrap_or_default(),
                category
            );
        }

        apply_multiplier(def, settings.multiplier_for_category(category));
        report.adjusted += 1;
        *report.per_category.entry(category).or_default() += 1;
    }

    report
}

/// A system which runs [`adjust_stack_sizes`] on the [`ItemDefManifest`] resource,
/// then stores the [`AdjustmentReport`].
///
/// When [`StackSettings::enabled`] is false, stack limits are left alone and an empty report is stored.
pub fn apply_stack_settings(
    mut commands: Commands,
    mut manifest: ResMut<ItemDefManifest>,
    settings: Res<StackSettings>,
) {
    let report = if settings.enabled {
        let report = adjust_stack_sizes(&mut manifest, &settings);
        info!(
            "Stack sizes adjusted for {} of {} item definitions.",
            report.adjusted, report.scanned
        );
        report
    } else {
        info!("Stack size adjustment is disabled, leaving item definitions unchanged.");
        AdjustmentReport {
            scanned: manifest.len(),
            ..Default::default()
        }
    };

    commands.insert_resource(report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_def::RawItemDef;
    use crate::settings::{CategoryTiers, SizeTier};

    fn raw(name: &str, label: &str, stack_limit: u32) -> RawItemDef {
        RawItemDef {
            def_name: name.to_string(),
            categories: vec![label.to_string()],
            stack_limit,
            ..Default::default()
        }
    }

    fn def(name: &str, label: &str, stack_limit: u32) -> ItemDef {
        ItemDef::try_from(raw(name, label, stack_limit)).unwrap()
    }

    #[test]
    fn multiplier_rounds_half_away_from_zero() {
        let mut item = def("Steel", "ResourcesRaw", 5);
        apply_multiplier(&mut item, 1.5);
        // 7.5
        assert_eq!(item.stack_limit.get(), 8);

        let mut item = def("Steel", "ResourcesRaw", 3);
        apply_multiplier(&mut item, 1.1);
        // 3.3
        assert_eq!(item.stack_limit.get(), 3);
    }

    #[test]
    fn multiplier_compounds() {
        let mut item = def("Steel", "ResourcesRaw", 7);
        apply_multiplier(&mut item, 10.0);
        apply_multiplier(&mut item, 10.0);
        assert_eq!(item.stack_limit.get(), 700);
    }

    #[test]
    fn multiplier_of_one_is_identity() {
        for limit in [1, 2, 75, 500] {
            let mut item = def("Steel", "ResourcesRaw", limit);
            apply_multiplier(&mut item, 1.0);
            assert_eq!(item.stack_limit.get(), limit);
        }
    }

    #[test]
    fn multiplier_saturates() {
        let mut item = def("Steel", "ResourcesRaw", u32::MAX / 2);
        apply_multiplier(&mut item, 20.0);
        assert_eq!(item.stack_limit.get(), u32::MAX);
    }

    #[test]
    fn pass_skips_ineligible_defs() {
        let mut manifest = ItemDefManifest::from_raw_items([
            raw("Silver", "ResourcesRaw", 75),
            RawItemDef {
                is_apparel: true,
                ..raw("Parka", "Apparel", 20)
            },
        ])
        .unwrap();
        let settings = StackSettings {
            tiers: CategoryTiers {
                silver: SizeTier::ExtraLarge,
                ..Default::default()
            },
            ..Default::default()
        };

        let report = adjust_stack_sizes(&mut manifest, &settings);

        assert_eq!(report.scanned, 2);
        assert_eq!(report.adjusted, 1);
        assert_eq!(report.count(StackCategory::Silver), 1);
        assert_eq!(report.count(StackCategory::Resources), 0);
        assert_eq!(manifest.get("Silver").unwrap().stack_limit.get(), 1500);
        assert_eq!(manifest.get("Parka").unwrap().stack_limit.get(), 20);
    }

    #[test]
    fn leathers_use_the_textiles_tier() {
        let mut manifest =
            ItemDefManifest::from_raw_items([raw("Leather_Plain", "Leathers", 50)]).unwrap();
        let settings = StackSettings {
            tiers: CategoryTiers {
                textiles: SizeTier::Large,
                ..CategoryTiers::uniform(SizeTier::Default)
            },
            ..Default::default()
        };

        adjust_stack_sizes(&mut manifest, &settings);

        let leather = manifest.get("Leather_Plain").unwrap();
        assert_eq!(leather.stack_limit.get(), 500);
    }

    #[test]
    fn unmatched_single_items_keep_their_limit() {
        let mut syringe = raw("Syringe", "MedicalSupplies", 1);
        syringe.is_stuff = true;
        let mut manifest = ItemDefManifest::from_raw_items([syringe]).unwrap();

        let report = adjust_stack_sizes(&mut manifest, &StackSettings::default());

        assert_eq!(report.count(StackCategory::OtherSingle), 1);
        assert_eq!(manifest.get("Syringe").unwrap().stack_limit.get(), 1);
    }

    #[test]
    fn running_twice_compounds() {
        let mut manifest =
            ItemDefManifest::from_raw_items([raw("Steel", "ResourcesRaw", 75)]).unwrap();
        let settings = StackSettings::with_magnitudes(2.0, 4.0).unwrap();

        adjust_stack_sizes(&mut manifest, &settings);
        adjust_stack_sizes(&mut manifest, &settings);

        assert_eq!(manifest.get("Steel").unwrap().stack_limit.get(), 300);
    }
}
