use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use commotion::resources::{ResetSimulation, SimConfig};
use commotion::scenario::Galaxy;
use commotion::systems::*;
use commotion::{SimError, Simulation};

fn main() -> Result<(), SimError> {
    let simulation = Simulation::new(SimConfig::default(), Galaxy::default())?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "commotion".into(),
                resolution: WindowResolution::new(1000, 1000),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(simulation)
        .init_resource::<ResetSimulation>()
        .add_systems(EguiPrimaryContextPass, ui_controls)
        .add_systems(Startup, setup_scene)
        .add_systems(
            Update,
            (
                keyboard_controls,
                apply_reset_request,
                drive_simulation,
                sync_body_sprites,
                update_camera_follow,
                camera_zoom,
                draw_drag_preview,
                draw_selection_overlays,
            )
                .chain(),
        )
        .run();

    Ok(())
}
