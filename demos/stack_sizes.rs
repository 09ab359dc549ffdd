//! Loads the vanilla item definitions, rescales their stack limits with the settings in
//! `assets/stack_settings.ron`, and prints the result.
//!
//! Debug logging is switched on in those settings, so each adjusted definition is logged
//! together with the category it was sorted into.

use bevy::{app::AppExit, log::LogPlugin, prelude::*, state::app::StatesPlugin};
use stack_xxl::prelude::*;

fn main() {
    let settings = match StackSettings::from_ron(include_str!("../assets/stack_settings.ron")) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Invalid stack settings: {err}");
            return;
        }
    };

    App::new()
        // `AssetPlugin` and `StatesPlugin` must come before `StackXxlPlugin`.
        .add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            LogPlugin::default(),
            StatesPlugin,
        ))
        .add_plugins(StackXxlPlugin::<SimpleDefState>::new(
            "vanilla.items.ron",
            settings,
        ))
        .add_systems(OnEnter(SimpleDefState::Ready), list_stack_limits)
        .add_systems(OnEnter(SimpleDefState::Failed), exit)
        .run();
}

fn list_stack_limits(
    manifest: Res<ItemDefManifest>,
    report: Res<AdjustmentReport>,
    mut app_exit_events: EventWriter<AppExit>,
) {
    let mut defs: Vec<_> = manifest.iter().collect();
    defs.sort_by(|a, b| a.def_name.cmp(&b.def_name));

    for def in defs {
        info!("{}: {}", def.def_name, def.stack_limit);
    }
    for category in StackCategory::ALL {
        info!("{category}: {} definitions", report.count(category));
    }

    app_exit_events.send_default();
}

fn exit(mut app_exit_events: EventWriter<AppExit>) {
    error!("Item definitions could not be loaded.");
    app_exit_events.send(AppExit::from_code(1));
}
