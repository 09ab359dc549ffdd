//! Item definitions: the static description of each *kind* of item the game knows about.
//!
//! These are read from disk as a [`RawItemDefManifest`], converted into an [`ItemDefManifest`] resource,
//! and then have their stack limits rescaled once by [`adjust_stack_sizes`](crate::adjust::adjust_stack_sizes).

use std::num::NonZeroU32;

use bevy::{asset::Asset, ecs::system::Resource, reflect::TypePath, utils::HashMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The general kind of a definition.
///
/// Only [`ItemKind::Item`] counts as an ordinary item; the others describe things
/// that are never carried around in stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    /// An ordinary item that can be hauled and stored.
    #[default]
    Item,
    /// A constructed structure.
    Building,
    /// A living creature.
    Pawn,
    /// A plant growing in the world.
    Plant,
    /// A projectile in flight.
    Projectile,
    /// Dirt, blood and similar.
    Filth,
    /// A visual effect.
    Mote,
    /// Exists without a physical presence.
    Ethereal,
    /// Anything else.
    Other,
}

/// The on-disk form of an [`ItemDef`].
///
/// Every trait flag defaults to `false`, so definition files only need to mention the flags that are set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItemDef {
    /// Unique name of the definition.
    pub def_name: String,
    /// Category labels, most specific first.
    pub categories: Vec<String>,
    /// General kind.
    pub kind: ItemKind,
    /// Maximum number of items per stack. Must be positive.
    pub stack_limit: u32,
    /// The item is a crafting material.
    pub is_stuff: bool,
    /// The item is a body part or an implant.
    pub is_body_part_or_implant: bool,
    /// The item is an unfinished work in progress.
    pub is_unfinished: bool,
    /// The item is a corpse.
    pub is_corpse: bool,
    /// The item is destroyed when dropped.
    pub destroy_on_drop: bool,
    /// The item is a ranged weapon.
    pub is_ranged_weapon: bool,
    /// The item is worn.
    pub is_apparel: bool,
}

/// A processed item definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDef {
    /// Unique name of the definition.
    pub def_name: String,
    /// Category labels, most specific first.
    pub categories: Vec<String>,
    /// General kind.
    pub kind: ItemKind,
    /// Maximum number of items per stack.
    pub stack_limit: NonZeroU32,
    /// The item is a crafting material.
    pub is_stuff: bool,
    /// The item is a body part or an implant.
    pub is_body_part_or_implant: bool,
    /// The item is an unfinished work in progress.
    pub is_unfinished: bool,
    /// The item is a corpse.
    pub is_corpse: bool,
    /// The item is destroyed when dropped.
    pub destroy_on_drop: bool,
    /// The item is a ranged weapon.
    pub is_ranged_weapon: bool,
    /// The item is worn.
    pub is_apparel: bool,
}

impl ItemDef {
    /// The first category label, if there is one.
    ///
    /// This is the only label consulted when sorting definitions into stack categories.
    pub fn first_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

impl TryFrom<RawItemDef> for ItemDef {
    type Error = ItemDefError;

    fn try_from(raw: RawItemDef) -> Result<Self, Self::Error> {
        let Some(stack_limit) = NonZeroU32::new(raw.stack_limit) else {
            return Err(ItemDefError::ZeroStackLimit(raw.def_name));
        };

        Ok(ItemDef {
            def_name: raw.def_name,
            categories: raw.categories,
            kind: raw.kind,
            stack_limit,
            is_stuff: raw.is_stuff,
            is_body_part_or_implant: raw.is_body_part_or_implant,
            is_unfinished: raw.is_unfinished,
            is_corpse: raw.is_corpse,
            destroy_on_drop: raw.destroy_on_drop,
            is_ranged_weapon: raw.is_ranged_weapon,
            is_apparel: raw.is_apparel,
        })
    }
}

/// An error raised while converting raw item definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemDefError {
    /// A definition declared a stack limit of zero.
    #[error("The item definition {0} has a stack limit of 0.")]
    ZeroStackLimit(String),
    /// Two definitions share the same name.
    #[error("The item definition name {0} is used more than once.")]
    DuplicateDefName(String),
}

/// The file format of the item definition file.
///
/// Each format sits behind the cargo feature of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    #[cfg(feature = "ron")]
    /// Rusty Object Notation, plays nicely with enums.
    Ron,
    #[cfg(feature = "json")]
    /// JSON.
    Json,
    #[cfg(feature = "yaml")]
    /// YAML.
    Yaml,
    #[cfg(feature = "toml")]
    /// TOML.
    Toml,
    /// Your own format.
    ///
    /// Register your own [`bevy::asset::AssetLoader`] for [`RawItemDefManifest`].
    Custom,
}

/// The on-disk list of item definitions.
#[derive(Debug, Asset, TypePath, Serialize, Deserialize, PartialEq, Default)]
pub struct RawItemDefManifest {
    /// The raw definitions, in file order.
    pub items: Vec<RawItemDef>,
}

/// Every item definition in the game, keyed by definition name.
///
/// Definitions are shared by the whole game. The only sanctioned mutation is the stack size pass,
/// which runs once before the definitions are declared ready.
#[derive(Debug, Resource, PartialEq, Default)]
pub struct ItemDefManifest {
    items: HashMap<String, ItemDef>,
}

impl ItemDefManifest {
    /// The format the definition file is read in, picked from the enabled cargo features.
    #[cfg(feature = "ron")]
    pub const FORMAT: ManifestFormat = ManifestFormat::Ron;
    /// The format the definition file is read in, picked from the enabled cargo features.
    #[cfg(all(feature = "json", not(feature = "ron")))]
    pub const FORMAT: ManifestFormat = ManifestFormat::Json;
    /// The format the definition file is read in, picked from the enabled cargo features.
    #[cfg(all(feature = "yaml", not(any(feature = "ron", feature = "json"))))]
    pub const FORMAT: ManifestFormat = ManifestFormat::Yaml;
    /// The format the definition file is read in, picked from the enabled cargo features.
    #[cfg(all(
        feature = "toml",
        not(any(feature = "ron", feature = "json", feature = "yaml"))
    ))]
    pub const FORMAT: ManifestFormat = ManifestFormat::Toml;
    /// The format the definition file is read in, picked from the enabled cargo features.
    #[cfg(not(any(feature = "ron", feature = "json", feature = "yaml", feature = "toml")))]
    pub const FORMAT: ManifestFormat = ManifestFormat::Custom;

    /// Converts a list of raw definitions, rejecting zero stack limits and duplicate names.
    pub fn from_raw_items(
        raw_items: impl IntoIterator<Item = RawItemDef>,
    ) -> Result<Self, ItemDefError> {
        let mut items = HashMap::default();

        for raw_item in raw_items {
            let item = ItemDef::try_from(raw_item)?;
            if items.contains_key(&item.def_name) {
                return Err(ItemDefError::DuplicateDefName(item.def_name));
            }
            items.insert(item.def_name.clone(), item);
        }

        Ok(ItemDefManifest { items })
    }

    /// Gets a definition by its name.
    pub fn get(&self, name: &str) -> Option<&ItemDef> {
        self.items.get(name)
    }

    /// The number of definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no definitions.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over all definitions, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    /// Mutably iterates over all definitions, in no particular order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ItemDef> {
        self.items.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, stack_limit: u32) -> RawItemDef {
        RawItemDef {
            def_name: name.to_string(),
            categories: vec!["Manufactured".to_string()],
            stack_limit,
            ..Default::default()
        }
    }

    #[test]
    fn zero_stack_limit_is_rejected() {
        assert_eq!(
            ItemDef::try_from(raw("Broken", 0)),
            Err(ItemDefError::ZeroStackLimit("Broken".to_string()))
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = ItemDefManifest::from_raw_items([raw("Steel", 75), raw("Steel", 10)]);
        assert_eq!(
            result,
            Err(ItemDefError::DuplicateDefName("Steel".to_string()))
        );
    }

    #[test]
    fn lookup_by_name() {
        let manifest =
            ItemDefManifest::from_raw_items([raw("Steel", 75), raw("Plasteel", 75)]).unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("Plasteel").unwrap().def_name, "Plasteel");
        assert!(manifest.get("Uranium").is_none());
    }

    #[test]
    fn names_with_equal_hashes_are_distinct_defs() {
        // "EJPAaacZ" and "Silver" share a polynomial string hash.
        let manifest =
            ItemDefManifest::from_raw_items([raw("Silver", 500), raw("EJPAaacZ", 75)]).unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("Silver").unwrap().stack_limit.get(), 500);
        assert_eq!(manifest.get("EJPAaacZ").unwrap().stack_limit.get(), 75);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let raw: RawItemDef = ron::from_str(r#"(def_name: "Chunk", stack_limit: 1)"#).unwrap();

        assert!(raw.categories.is_empty());
        assert_eq!(raw.kind, ItemKind::Item);
        assert!(!raw.is_apparel);
    }
}
