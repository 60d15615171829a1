use bevy::input::mouse::MouseWheel;
use bevy::prelude::MessageReader;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::input::EguiWantsInput;

use crate::components::BodySprite;
use crate::interaction::PointerInput;
use crate::resources::ResetSimulation;
use crate::simulation::Simulation;

/// Spawns the 2D camera. Body sprites are created by [`sync_body_sprites`].
pub fn setup_scene(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Space toggles pause, R requests a reset.
pub fn keyboard_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut simulation: ResMut<Simulation>,
    mut reset: ResMut<ResetSimulation>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        simulation.toggle_pause();
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        reset.pending = true;
    }
}

/// Responds to a pending reset by clearing and re-seeding the simulation.
pub fn apply_reset_request(
    mut reset: ResMut<ResetSimulation>,
    mut simulation: ResMut<Simulation>,
) {
    if !reset.pending {
        return;
    }
    reset.pending = false;

    if let Err(err) = simulation.reset() {
        error!("reset failed: {}", err);
    }
}

/// Feeds the real frame delta and world-space pointer state into the simulation.
pub fn drive_simulation(
    time: Res<Time<Real>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    egui_input: Res<EguiWantsInput>,
    mut simulation: ResMut<Simulation>,
) {
    let cursor_world = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|cursor| {
            let (camera, camera_transform) = cameras.single().ok()?;
            camera.viewport_to_world_2d(camera_transform, cursor).ok()
        });

    let pointer = PointerInput {
        pressed: mouse.just_pressed(MouseButton::Left) && !egui_input.wants_any_pointer_input(),
        released: mouse.just_released(MouseButton::Left),
        position: cursor_world.map(|p| p.as_dvec2()),
    };

    simulation.frame(time.delta_secs_f64(), &pointer);
}

/// Keeps one sprite per body. Sprites are rebuilt whenever the store is cleared or grows.
pub fn sync_body_sprites(
    mut commands: Commands,
    simulation: Res<Simulation>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut spawned_for: Local<Option<(u32, usize)>>,
    mut sprites: Query<(Entity, &BodySprite, &mut Transform)>,
) {
    let store = simulation.store();
    let key = (store.generation(), store.len());

    if *spawned_for != Some(key) {
        for (entity, _, _) in sprites.iter() {
            commands.entity(entity).despawn();
        }
        for (handle, body) in store.iter() {
            commands.spawn((
                Mesh2d(meshes.add(Circle::new(body.radius))),
                MeshMaterial2d(materials.add(ColorMaterial::from(body.color))),
                Transform::from_translation(body.position().as_vec2().extend(0.0)),
                BodySprite(handle.index()),
            ));
        }
        *spawned_for = Some(key);
        return;
    }

    for (_, sprite, mut transform) in sprites.iter_mut() {
        if let Some(body) = store.bodies().get(**sprite) {
            transform.translation = body.position().as_vec2().extend(0.0);
        }
    }
}

/// Moves the camera toward the follow target, if any.
pub fn update_camera_follow(
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
    simulation: Res<Simulation>,
    time: Res<Time>,
) {
    let Some(body) = simulation
        .follow_target()
        .and_then(|handle| simulation.body(handle))
    else {
        return;
    };

    if let Ok(mut cam_transform) = camera_query.single_mut() {
        let target = body.position().as_vec2().extend(cam_transform.translation.z);
        let smooth_speed = (5.0 * time.delta_secs()).min(1.0);
        cam_transform.translation = cam_transform.translation.lerp(target, smooth_speed);
    }
}

/// Mouse wheel zoom, unless egui has the pointer.
pub fn camera_zoom(
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut query: Query<&mut Transform, With<Camera2d>>,
    egui_input: Res<EguiWantsInput>,
) {
    if egui_input.wants_any_pointer_input() {
        return;
    }

    if let Ok(mut transform) = query.single_mut() {
        let mut scale = transform.scale.x;
        for event in mouse_wheel.read() {
            if event.y.abs() == 0.0 {
                continue;
            }
            let zoom_factor = 1.1;
            if event.y > 0.0 {
                scale /= zoom_factor;
            } else {
                scale *= zoom_factor;
            }
        }
        scale = scale.clamp(0.1, 10.0);
        transform.scale = Vec3::splat(scale);
    }
}

/// Faded preview of where a dragged body will land on release.
pub fn draw_drag_preview(mut gizmos: Gizmos, simulation: Res<Simulation>) {
    if !simulation.is_paused() {
        return;
    }
    let drag = simulation.drag();
    let (Some(handle), Some(candidate)) = (drag.target(), drag.candidate()) else {
        return;
    };
    if let Some(body) = simulation.body(handle) {
        gizmos.circle_2d(
            Isometry2d::from_translation(candidate.as_vec2()),
            body.radius,
            body.color.with_alpha(0.5),
        );
    }
}

/// Ring drawn around the followed body: world-space center and radius.
pub fn follow_ring(simulation: &Simulation) -> Option<(Vec2, f32)> {
    let body = simulation
        .follow_target()
        .and_then(|handle| simulation.body(handle))?;
    Some((body.position().as_vec2(), body.radius * 1.5 + 2.0))
}

/// Magenta frame over the view while paused, and a ring around the followed body.
pub fn draw_selection_overlays(
    mut gizmos: Gizmos,
    simulation: Res<Simulation>,
    cameras: Query<(&Camera, &Transform), With<Camera2d>>,
) {
    if simulation.is_paused()
        && let Ok((camera, transform)) = cameras.single()
        && let Some(viewport) = camera.logical_viewport_size()
    {
        let size = viewport * transform.scale.truncate() * 0.98;
        gizmos.rect_2d(
            Isometry2d::from_translation(transform.translation.truncate()),
            size,
            Color::srgba(1.0, 0.0, 1.0, 0.35),
        );
    }
    if let Some((center, radius)) = follow_ring(&simulation) {
        gizmos.circle_2d(
            Isometry2d::from_translation(center),
            radius,
            Color::srgb(1.0, 1.0, 0.2),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    use crate::resources::SimConfig;
    use crate::scenario::BinaryOrbit;

    fn world_with_simulation() -> World {
        let mut world = World::new();
        world.insert_resource(
            Simulation::new(SimConfig::default(), BinaryOrbit::default())
                .expect("default simulation builds"),
        );
        world.insert_resource(ResetSimulation::default());
        world
    }

    #[test]
    fn keyboard_toggles_pause_and_requests_reset() {
        let mut world = world_with_simulation();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::Space);
        keyboard.press(KeyCode::KeyR);
        world.insert_resource(keyboard);

        let mut system_state: SystemState<(
            Res<ButtonInput<KeyCode>>,
            ResMut<Simulation>,
            ResMut<ResetSimulation>,
        )> = SystemState::new(&mut world);

        {
            let (keyboard, simulation, reset) = system_state.get_mut(&mut world);
            keyboard_controls(keyboard, simulation, reset);
        }
        system_state.apply(&mut world);

        assert!(world.resource::<Simulation>().is_paused());
        assert!(world.resource::<ResetSimulation>().pending);
    }

    #[test]
    fn reset_request_reseeds_and_clears_flag() {
        let mut world = world_with_simulation();
        {
            let mut simulation = world.resource_mut::<Simulation>();
            simulation.advance(25);
            assert!(simulation.t() > 0.0);
        }
        world.resource_mut::<ResetSimulation>().pending = true;
        let generation = world.resource::<Simulation>().store().generation();

        let mut system_state: SystemState<(ResMut<ResetSimulation>, ResMut<Simulation>)> =
            SystemState::new(&mut world);
        {
            let (reset, simulation) = system_state.get_mut(&mut world);
            apply_reset_request(reset, simulation);
        }
        system_state.apply(&mut world);

        let simulation = world.resource::<Simulation>();
        assert!(!world.resource::<ResetSimulation>().pending);
        assert_eq!(simulation.t(), 0.0);
        assert_eq!(simulation.store().len(), 2);
        assert_eq!(simulation.store().generation(), generation + 1);
    }

    #[test]
    fn idle_reset_request_does_nothing() {
        let mut world = world_with_simulation();
        world.resource_mut::<Simulation>().advance(3);

        let mut system_state: SystemState<(ResMut<ResetSimulation>, ResMut<Simulation>)> =
            SystemState::new(&mut world);
        {
            let (reset, simulation) = system_state.get_mut(&mut world);
            apply_reset_request(reset, simulation);
        }

        assert!(world.resource::<Simulation>().t() > 0.0);
    }

    #[test]
    fn follow_ring_tracks_the_followed_body() {
        let mut world = world_with_simulation();
        assert_eq!(follow_ring(world.resource::<Simulation>()), None);

        let mut simulation = world.resource_mut::<Simulation>();
        let handle = simulation
            .nearest_to(crate::math::Vec2::new(100.0, 0.0))
            .expect("binary orbit has bodies");
        simulation.set_follow_target(Some(handle));
        simulation.advance(5);

        let body = simulation.body(handle).expect("handle is live");
        let (center, radius) = follow_ring(&simulation).expect("a body is followed");
        assert_eq!(center, body.position().as_vec2());
        assert!(radius > body.radius);

        simulation.reset().expect("reset succeeds");
        assert_eq!(follow_ring(&simulation), None);
    }
}
