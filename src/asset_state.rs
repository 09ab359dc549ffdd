use bevy::state::state::{FreelyMutableState, States};

/// Maps your own [`States`] enum onto the phases of loading item definitions.
///
/// The stack size pass runs between [`PROCESSING`](DefLoadingState::PROCESSING) and [`READY`](DefLoadingState::READY):
/// once your app reaches `READY`, every stack limit in the [`ItemDefManifest`](crate::item_def::ItemDefManifest) has been rescaled.
pub trait DefLoadingState: FreelyMutableState {
    /// The definition file is being read from disk.
    const LOADING: Self;
    /// The definitions are on hand and are being converted and rescaled.
    const PROCESSING: Self;
    /// Definitions are converted and their stack limits adjusted.
    const READY: Self;
    /// Loading or conversion failed.
    ///
    /// The reason is in the logs.
    const FAILED: Self;
}

/// A ready-made [`States`] enum for apps that have nothing else to coordinate with.
#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy, Default, States)]
pub enum SimpleDefState {
    /// The definition file is being read from disk.
    #[default]
    Loading,
    /// The definitions are being converted and rescaled.
    Processing,
    /// Definitions are ready to use.
    Ready,
    /// Loading or conversion failed.
    Failed,
}

impl DefLoadingState for SimpleDefState {
    const LOADING: Self = SimpleDefState::Loading;
    const PROCESSING: Self = SimpleDefState::Processing;
    const READY: Self = SimpleDefState::Ready;
    const FAILED: Self = SimpleDefState::Failed;
}
