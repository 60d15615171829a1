use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_egui::egui;

use crate::resources::{DEFAULT_THETA, ForceModel, ResetSimulation};
use crate::simulation::Simulation;

pub fn ui_controls(
    mut contexts: EguiContexts,
    mut simulation: ResMut<Simulation>,
    mut frames_rendered: Local<usize>,
    mut reset: ResMut<ResetSimulation>,
) {
    if *frames_rendered < 5 {
        *frames_rendered += 1;
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Window::new("Simulation Controls")
            .default_pos(egui::pos2(10.0, 10.0))
            .max_size([320.0, 360.0])
            .vscroll(true)
            .show(ctx, |ui| {
                ui.heading("Simulation");
                ui.label(format!("t = {:.2}", simulation.t()));
                ui.label(format!("Bodies: {}", simulation.store().len()));
                ui.label(format!("Steps last frame: {}", simulation.last_frame().steps));
                ui.label(format!("Total energy: {:.4e}", simulation.total_energy()));

                let mut time_scale = simulation.config().time_scale;
                if ui
                    .add(egui::Slider::new(&mut time_scale, 0.0..=50.0).text("Time Scale"))
                    .changed()
                    && let Err(err) = simulation.set_time_scale(time_scale)
                {
                    warn!("{}", err);
                }
                let mut g = simulation.config().g;
                if ui
                    .add(egui::Slider::new(&mut g, 1.0..=500.0).text("G (Gravity)"))
                    .changed()
                    && let Err(err) = simulation.set_gravity(g)
                {
                    warn!("{}", err);
                }

                let force_model = simulation.config().force_model;
                let mut barnes_hut = matches!(force_model, ForceModel::BarnesHut { .. });
                if ui.checkbox(&mut barnes_hut, "Barnes-Hut").changed() {
                    let model = if barnes_hut {
                        ForceModel::BarnesHut {
                            theta: DEFAULT_THETA,
                        }
                    } else {
                        ForceModel::Direct
                    };
                    if let Err(err) = simulation.set_force_model(model) {
                        warn!("{}", err);
                    }
                }
                if let ForceModel::BarnesHut { mut theta } = force_model
                    && ui
                        .add(egui::Slider::new(&mut theta, 0.0..=1.5).text("Theta"))
                        .changed()
                    && let Err(err) = simulation.set_force_model(ForceModel::BarnesHut { theta })
                {
                    warn!("{}", err);
                }

                let mut paused = simulation.is_paused();
                if ui.checkbox(&mut paused, "Paused (Space)").changed() {
                    simulation.set_paused(paused);
                }
                if ui.button("Reset Simulation (R)").clicked() {
                    reset.pending = true;
                }

                ui.separator();
                ui.heading("Selected Body");
                match simulation
                    .follow_target()
                    .and_then(|handle| simulation.body(handle))
                {
                    Some(body) => {
                        ui.label(format!("Mass: {:.2}", body.mass()));
                        let p = body.position();
                        ui.label(format!("Position: ({:.1}, {:.1})", p.x, p.y));
                        let v = body.velocity();
                        ui.label(format!("Velocity: ({:.2}, {:.2})", v.x, v.y));
                    }
                    None => {
                        ui.label("Click a body while running to follow it");
                    }
                }
                if let Some(candidate) = simulation.drag().candidate() {
                    ui.label(format!(
                        "Dragging to ({:.1}, {:.1})",
                        candidate.x, candidate.y
                    ));
                }

                ui.separator();
                ui.heading("Controls");
                ui.label("Pause: Space / Reset: R");
                ui.label("Drag bodies while paused");
                ui.label("Zoom: Scroll Wheel");
            });
    }
}
