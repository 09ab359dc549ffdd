//! Sorting item definitions into the categories that share a stack size tier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::item_def::{ItemDef, ItemKind};

/// Name of the definition whose stacks are sized by [`CategoryTiers::silver`](crate::settings::CategoryTiers::silver).
pub const SILVER: &str = "Silver";

/// The bucket an item definition is sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StackCategory {
    /// The silver currency.
    Silver,
    /// Manufactured goods, raw resources, stone blocks and medicine.
    Resources,
    /// Leathers and textiles.
    Textiles,
    /// Drugs.
    Drugs,
    /// Raw meat.
    Meat,
    /// Raw food, plant matter, animal products, feed, eggs and cooking supplies.
    Raw,
    /// Meals and other prepared food.
    Meals,
    /// Prostheses, organs and other body parts.
    BodyParts,
    /// Uncategorized, with a stack limit above 1.
    OtherStackable,
    /// Uncategorized, with a stack limit of 1.
    OtherSingle,
}

impl StackCategory {
    /// Every category, in the order they are tested.
    pub const ALL: [StackCategory; 10] = [
        StackCategory::Silver,
        StackCategory::Resources,
        StackCategory::Textiles,
        StackCategory::Drugs,
        StackCategory::Meat,
        StackCategory::Raw,
        StackCategory::Meals,
        StackCategory::BodyParts,
        StackCategory::OtherStackable,
        StackCategory::OtherSingle,
    ];

    /// The name printed in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            StackCategory::Silver => "silver",
            StackCategory::Resources => "resources",
            StackCategory::Textiles => "textiles",
            StackCategory::Drugs => "drugs",
            StackCategory::Meat => "meat",
            StackCategory::Raw => "raw",
            StackCategory::Meals => "meals",
            StackCategory::BodyParts => "bodyParts",
            StackCategory::OtherStackable => "othersStackable",
            StackCategory::OtherSingle => "othersSingle",
        }
    }
}

impl fmt::Display for StackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if the stack limit of `def` may be changed.
///
/// Materials and body parts always qualify, even when they do not stack yet.
/// Other definitions must be ordinary, already stackable items that are not
/// unfinished, corpses, destroyed on drop, ranged weapons or apparel.
/// Definitions without any category label never qualify.
pub fn is_eligible(def: &ItemDef) -> bool {
    if def.categories.is_empty() {
        return false;
    }

    def.is_stuff
        || def.is_body_part_or_implant
        || (def.kind == ItemKind::Item
            && !def.is_unfinished
            && !def.is_corpse
            && !def.destroy_on_drop
            && !def.is_ranged_weapon
            && !def.is_apparel
            && def.stack_limit.get() > 1)
}

/// Named rules, tested in order. The first match wins.
const RULES: [(StackCategory, fn(&ItemDef) -> bool); 8] = [
    (StackCategory::Silver, is_silver),
    (StackCategory::Resources, is_resources),
    (StackCategory::Textiles, is_textiles),
    (StackCategory::Drugs, is_drugs),
    (StackCategory::Meat, is_meat),
    (StackCategory::Raw, is_raw),
    (StackCategory::Meals, is_meals),
    (StackCategory::BodyParts, is_body_parts),
];

fn is_silver(def: &ItemDef) -> bool {
    def.def_name == SILVER
}

fn is_resources(def: &ItemDef) -> bool {
    label_matches(def, |label| {
        matches!(
            label,
            "Manufactured" | "ResourcesRaw" | "StoneBlocks" | "Medicine"
        )
    })
}

fn is_textiles(def: &ItemDef) -> bool {
    label_matches(def, |label| matches!(label, "Leathers" | "Textiles"))
}

fn is_drugs(def: &ItemDef) -> bool {
    label_matches(def, |label| label == "Drugs")
}

fn is_meat(def: &ItemDef) -> bool {
    label_matches(def, |label| label == "MeatRaw")
}

fn is_raw(def: &ItemDef) -> bool {
    label_matches(def, |label| {
        label.ends_with("FoodRaw")
            || label.starts_with("Eggs")
            || matches!(
                label,
                "PlantMatter" | "AnimalProductRaw" | "AnimalFeed" | "CookingSupplies"
            )
    })
}

fn is_meals(def: &ItemDef) -> bool {
    label_matches(def, |label| label.ends_with("Meals") || label == "Foods")
}

fn is_body_parts(def: &ItemDef) -> bool {
    label_matches(def, |label| {
        label.ends_with("Prostheses") || label.ends_with("Organs") || label.starts_with("BodyParts")
    })
}

/// Only the first category label is ever inspected.
fn label_matches(def: &ItemDef, predicate: impl Fn(&str) -> bool) -> bool {
    def.first_category().is_some_and(predicate)
}

/// Sorts `def` into exactly one [`StackCategory`].
///
/// Definitions that match no named rule fall back on [`StackCategory::OtherStackable`]
/// or [`StackCategory::OtherSingle`], depending on their current stack limit.
pub fn classify(def: &ItemDef) -> StackCategory {
    RULES
        .iter()
        .find(|(_, matches)| matches(def))
        .map(|&(category, _)| category)
        .unwrap_or(if def.stack_limit.get() > 1 {
            StackCategory::OtherStackable
        } else {
            StackCategory::OtherSingle
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_def::RawItemDef;

    fn def(name: &str, label: &str, stack_limit: u32) -> ItemDef {
        ItemDef::try_from(RawItemDef {
            def_name: name.to_string(),
            categories: vec![label.to_string()],
            stack_limit,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn uncategorized_defs_are_never_eligible() {
        let mut steel = def("Steel", "ResourcesRaw", 75);
        steel.categories.clear();
        steel.is_stuff = true;

        assert!(!is_eligible(&steel));
    }

    #[test]
    fn ordinary_stackable_items_are_eligible() {
        assert!(is_eligible(&def("Chemfuel", "Manufactured", 150)));
    }

    #[test]
    fn ordinary_single_items_are_not_eligible() {
        assert!(!is_eligible(&def("Beer", "Drugs", 1)));
    }

    #[test]
    fn excluded_traits_block_eligibility() {
        let exclusions: [fn(&mut ItemDef); 6] = [
            |d| d.is_unfinished = true,
            |d| d.is_corpse = true,
            |d| d.destroy_on_drop = true,
            |d| d.is_ranged_weapon = true,
            |d| d.is_apparel = true,
            |d| d.kind = ItemKind::Building,
        ];

        for exclude in exclusions {
            let mut item = def("Thing", "Manufactured", 20);
            exclude(&mut item);
            assert!(!is_eligible(&item), "{item:?}");
        }
    }

    #[test]
    fn materials_and_body_parts_qualify_even_when_single() {
        let mut wood = def("WoodLog", "ResourcesRaw", 1);
        wood.is_stuff = true;
        wood.is_apparel = true;
        assert!(is_eligible(&wood));

        let mut arm = def("BionicArm", "BodyPartsBionic", 1);
        arm.is_body_part_or_implant = true;
        assert!(is_eligible(&arm));
    }

    #[test]
    fn silver_wins_over_resources() {
        assert_eq!(
            classify(&def("Silver", "ResourcesRaw", 500)),
            StackCategory::Silver
        );
        assert_eq!(
            classify(&def("Gold", "ResourcesRaw", 500)),
            StackCategory::Resources
        );
    }

    #[test]
    fn silver_is_matched_by_name_not_hash() {
        // Shares a polynomial string hash with "Silver".
        assert_eq!(
            classify(&def("EJPAaacZ", "Manufactured", 75)),
            StackCategory::Resources
        );
        assert_eq!(
            classify(&def("silver", "Manufactured", 75)),
            StackCategory::Resources
        );
    }

    #[test]
    fn labels_map_to_categories() {
        let cases = [
            ("Manufactured", StackCategory::Resources),
            ("StoneBlocks", StackCategory::Resources),
            ("Medicine", StackCategory::Resources),
            ("Leathers", StackCategory::Textiles),
            ("Textiles", StackCategory::Textiles),
            ("Drugs", StackCategory::Drugs),
            ("MeatRaw", StackCategory::Meat),
            ("PlantFoodRaw", StackCategory::Raw),
            ("PlantMatter", StackCategory::Raw),
            ("AnimalProductRaw", StackCategory::Raw),
            ("AnimalFeed", StackCategory::Raw),
            ("EggsFertilized", StackCategory::Raw),
            ("CookingSupplies", StackCategory::Raw),
            ("FoodMeals", StackCategory::Meals),
            ("Foods", StackCategory::Meals),
            ("BodyPartsNatural", StackCategory::BodyParts),
            ("BionicProstheses", StackCategory::BodyParts),
            ("NaturalOrgans", StackCategory::BodyParts),
            ("Unrelated", StackCategory::OtherStackable),
        ];

        for (label, expected) in cases {
            assert_eq!(classify(&def("Thing", label, 10)), expected, "{label}");
        }
    }

    #[test]
    fn fallback_depends_on_stack_limit() {
        assert_eq!(
            classify(&def("Syringe", "MedicalSupplies", 1)),
            StackCategory::OtherSingle
        );
        assert_eq!(
            classify(&def("Syringe", "MedicalSupplies", 2)),
            StackCategory::OtherStackable
        );
    }

    #[test]
    fn only_the_first_label_is_inspected() {
        let mut kibble = def("Kibble", "Unrelated", 75);
        kibble.categories.push("AnimalFeed".to_string());

        assert_eq!(classify(&kibble), StackCategory::OtherStackable);
    }

    #[test]
    fn classification_is_deterministic() {
        let meal = def("MealFine", "FoodMeals", 10);
        assert_eq!(classify(&meal), classify(&meal.clone()));
    }
}
