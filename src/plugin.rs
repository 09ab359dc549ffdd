use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use bevy::app::{App, Plugin, PreUpdate, Update};
use bevy::asset::{AssetApp, AssetLoadFailedEvent, AssetServer, Assets, Handle, LoadState};
use bevy::ecs::prelude::*;
use bevy::ecs::system::SystemState;
use bevy::log::{debug, error, error_once, info};
use bevy::state::app::AppExtStates;
use bevy::state::condition::in_state;
use bevy::state::state::NextState;

use crate::adjust::{apply_stack_settings, AdjustmentReport};
use crate::asset_state::DefLoadingState;
use crate::item_def::{ItemDefManifest, ManifestFormat, RawItemDefManifest};
use crate::settings::StackSettings;

/// A plugin that loads the item definitions, rescales their stack limits once, and declares them ready.
///
/// The app starts in [`DefLoadingState::LOADING`] and moves through
/// [`PROCESSING`](DefLoadingState::PROCESSING), where the raw definitions are converted into an
/// [`ItemDefManifest`] and the stack size pass runs, before reaching [`READY`](DefLoadingState::READY).
/// If the file cannot be loaded or converted, the app moves to [`FAILED`](DefLoadingState::FAILED) instead.
///
/// [`AssetPlugin`](bevy::asset::AssetPlugin) **must** be added before this plugin, as loading starts while it is built.
#[derive(Debug)]
pub struct StackXxlPlugin<S: DefLoadingState> {
    /// The validated settings of the stack size pass.
    ///
    /// Inserted as a resource.
    pub settings: StackSettings,
    /// Path of the item definition file, relative to the asset folder.
    ///
    /// The file extension must be `items.<format>`, e.g. `vanilla.items.ron`.
    pub defs_path: PathBuf,
    /// If true, the app will automatically transition between loading states.
    /// If false, you must manually transition between states using the [`NextState`] resource.
    ///
    /// Defaults to `true`.
    pub automatically_advance_states: bool,
    /// Whether the plugin should set the initial state to `S::LOADING`.
    ///
    /// Defaults to `true`.
    pub set_initial_state: bool,
    /// A phantom data field to satisfy the type system.
    pub _phantom: PhantomData<S>,
}

impl<S: DefLoadingState> StackXxlPlugin<S> {
    /// Loads the definitions at `defs_path` and rescales them according to `settings`.
    pub fn new(defs_path: impl Into<PathBuf>, settings: StackSettings) -> Self {
        Self {
            settings,
            defs_path: defs_path.into(),
            automatically_advance_states: true,
            set_initial_state: true,
            _phantom: PhantomData,
        }
    }
}

impl<S: DefLoadingState> Plugin for StackXxlPlugin<S> {
    fn build(&self, app: &mut App) {
        if self.set_initial_state {
            app.insert_state(S::LOADING);
        }

        app.insert_resource(self.settings.clone())
            .configure_sets(PreUpdate, ItemDefSet.run_if(in_state(S::PROCESSING)))
            .add_systems(
                Update,
                report_failed_item_def_loading
                    .run_if(on_event::<AssetLoadFailedEvent<RawItemDefManifest>>()),
            )
            .add_systems(
                PreUpdate,
                (
                    process_item_defs.run_if(not(resource_exists::<ItemDefManifest>)),
                    apply_stack_settings
                        .run_if(resource_exists::<ItemDefManifest>)
                        .run_if(not(resource_exists::<AdjustmentReport>)),
                )
                    .chain()
                    .in_set(ItemDefSet),
            );

        if self.automatically_advance_states {
            app.add_systems(
                Update,
                check_if_item_defs_have_loaded::<S>.run_if(in_state(S::LOADING)),
            )
            .add_systems(
                Update,
                check_if_item_defs_are_processed::<S>.run_if(in_state(S::PROCESSING)),
            );
        }

        register_loader(app);

        let handle = app
            .world()
            .resource::<AssetServer>()
            .load::<RawItemDefManifest>(self.defs_path.clone());
        app.insert_resource(ItemDefTracker {
            path: self.defs_path.clone(),
            handle,
            processing_status: ProcessingStatus::Pending,
        });
    }
}

/// Adds the `bevy_common_assets` loader matching [`ItemDefManifest::FORMAT`].
fn register_loader(app: &mut App) {
    match ItemDefManifest::FORMAT {
        #[cfg(feature = "ron")]
        ManifestFormat::Ron => {
            app.add_plugins(bevy_common_assets::ron::RonAssetPlugin::<
                RawItemDefManifest,
            >::new(&["items.ron"]));
        }
        #[cfg(feature = "json")]
        ManifestFormat::Json => {
            app.add_plugins(bevy_common_assets::json::JsonAssetPlugin::<
                RawItemDefManifest,
            >::new(&["items.json"]));
        }
        #[cfg(feature = "yaml")]
        ManifestFormat::Yaml => {
            app.add_plugins(bevy_common_assets::yaml::YamlAssetPlugin::<
                RawItemDefManifest,
            >::new(&["items.yaml"]));
        }
        #[cfg(feature = "toml")]
        ManifestFormat::Toml => {
            app.add_plugins(bevy_common_assets::toml::TomlAssetPlugin::<
                RawItemDefManifest,
            >::new(&["items.toml"]));
        }
        // Users must register their own asset loader for custom formats.
        ManifestFormat::Custom => {
            app.init_asset::<RawItemDefManifest>();
        }
    }
}

/// Groups the systems that convert and rescale item definitions,
/// so they only run in [`DefLoadingState::PROCESSING`].
#[derive(SystemSet, PartialEq, Eq, Hash, Debug, Clone)]
struct ItemDefSet;

/// Keeps track of the item definition file and its progress.
#[derive(Resource, Debug)]
pub struct ItemDefTracker {
    path: PathBuf,
    handle: Handle<RawItemDefManifest>,
    processing_status: ProcessingStatus,
}

/// How far the conversion of the raw definitions has progressed.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ProcessingStatus {
    /// The raw definitions have not been converted yet.
    #[default]
    Pending,
    /// The raw definitions were converted into an [`ItemDefManifest`].
    Converted,
    /// The raw definitions could not be converted.
    Failed,
}

impl ItemDefTracker {
    /// The path of the item definition file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current load state of the item definition file.
    ///
    /// Returns [`None`] if the asset server does not know about the file.
    pub fn load_state(&self, asset_server: &AssetServer) -> Option<LoadState> {
        asset_server.get_load_state(&self.handle)
    }

    /// Returns the [`ProcessingStatus`] of the raw definitions.
    pub fn processing_status(&self) -> ProcessingStatus {
        self.processing_status
    }
}

/// Moves to [`DefLoadingState::PROCESSING`] once the definition file has loaded,
/// or to [`DefLoadingState::FAILED`] if it could not be loaded.
pub fn check_if_item_defs_have_loaded<S: DefLoadingState>(
    asset_server: Res<AssetServer>,
    tracker: Res<ItemDefTracker>,
    mut next_state: ResMut<NextState<S>>,
) {
    match tracker.load_state(asset_server.as_ref()) {
        Some(LoadState::Failed(_)) => {
            error!(
                "The item definitions at {:?} failed to load.",
                tracker.path()
            );
            next_state.set(S::FAILED);
        }
        Some(LoadState::Loaded) => {
            info!("Item definitions loaded from {:?}.", tracker.path());
            next_state.set(S::PROCESSING);
        }
        _ => (),
    }
}

/// Moves to [`DefLoadingState::READY`] once the definitions are converted and rescaled,
/// or to [`DefLoadingState::FAILED`] if conversion failed.
pub fn check_if_item_defs_are_processed<S: DefLoadingState>(
    tracker: Res<ItemDefTracker>,
    report: Option<Res<AdjustmentReport>>,
    mut next_state: ResMut<NextState<S>>,
) {
    match tracker.processing_status() {
        ProcessingStatus::Failed => {
            error!("The item definitions could not be processed.");
            next_state.set(S::FAILED);
        }
        ProcessingStatus::Converted if report.is_some() => {
            info!("Item definitions are ready.");
            next_state.set(S::READY);
        }
        _ => (),
    }
}

/// Reports why the item definition file failed to load.
pub fn report_failed_item_def_loading(
    mut events: EventReader<AssetLoadFailedEvent<RawItemDefManifest>>,
) {
    for event in events.read() {
        error_once!(
            "Failed to load item definitions at {} due to {:?}",
            event.path,
            event.error
        );
    }
}

/// Converts the raw definitions into an [`ItemDefManifest`] resource.
///
/// The raw manifest is removed from its [`Assets`] collection in the process.
pub fn process_item_defs(
    world: &mut World,
    system_state: &mut SystemState<(Res<ItemDefTracker>, ResMut<Assets<RawItemDefManifest>>)>,
) {
    debug!("Processing item definitions.");

    let (tracker, mut assets) = system_state.get_mut(world);
    if tracker.processing_status() != ProcessingStatus::Pending {
        return;
    }
    let Some(raw_manifest) = assets.remove(&tracker.handle) else {
        error_once!("The raw item definitions were not found in the asset collection.");
        return;
    };

    let status = match ItemDefManifest::from_raw_items(raw_manifest.items) {
        Ok(manifest) => {
            debug!("Converted {} item definitions.", manifest.len());
            world.insert_resource(manifest);
            ProcessingStatus::Converted
        }
        Err(err) => {
            error_once!("Failed to process item definitions: {}", err);
            ProcessingStatus::Failed
        }
    };

    // The tracker borrow above has to end before the manifest can be built.
    world.resource_mut::<ItemDefTracker>().processing_status = status;
}
