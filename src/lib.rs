#![doc = include_str!("../README.md")]

pub mod adjust;
pub mod asset_state;
pub mod category;
pub mod item_def;
pub mod plugin;
pub mod settings;

/// Everything needed to add stack size rescaling to an app.
pub mod prelude {
    pub use crate::adjust::{adjust_stack_sizes, apply_multiplier, AdjustmentReport};
    pub use crate::asset_state::{DefLoadingState, SimpleDefState};
    pub use crate::category::{classify, is_eligible, StackCategory};
    pub use crate::item_def::{ItemDef, ItemDefManifest, ItemKind, RawItemDef};
    pub use crate::plugin::StackXxlPlugin;
    pub use crate::settings::{CategoryTiers, Magnitude, SizeTier, StackSettings};
}
