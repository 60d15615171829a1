//! The simulation aggregate: store, clock, interaction state and configuration.
//!
//! One `Simulation` owns everything the frame loop mutates. The windowing layer feeds it the
//! wall-clock delta and world-space pointer state once per frame and reads bodies back for
//! drawing.

use bevy::log::info;
use bevy::prelude::Resource;

use crate::body::Body;
use crate::clock::SimulationClock;
use crate::error::SimError;
use crate::forces::apply_forces;
use crate::integrator::integrate_all;
use crate::interaction::{DragState, Interaction, PointerInput};
use crate::math::{Real, Vec2};
use crate::resources::{ForceModel, SimConfig};
use crate::scenario::Scenario;
use crate::store::{BodyHandle, BodyStore};

/// What one call to [`Simulation::frame`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed steps executed this frame.
    pub steps: u32,
    /// Owed simulated time discarded by the catch-up cap.
    pub dropped: Real,
}

#[derive(Resource)]
pub struct Simulation {
    config: SimConfig,
    store: BodyStore,
    clock: SimulationClock,
    interaction: Interaction,
    scenario: Box<dyn Scenario>,
    paused: bool,
    last_frame: FrameReport,
}

impl Simulation {
    /// Validates `config` and seeds the store from `scenario`. Starts running at `t = 0`.
    pub fn new(config: SimConfig, scenario: impl Scenario + 'static) -> Result<Self, SimError> {
        config.validate()?;
        let mut simulation = Self {
            store: BodyStore::with_capacity(config.capacity),
            clock: SimulationClock::new(config.dt, config.max_steps_per_frame),
            interaction: Interaction::default(),
            scenario: Box::new(scenario),
            paused: false,
            last_frame: FrameReport::default(),
            config,
        };
        simulation.seed()?;
        Ok(simulation)
    }

    fn seed(&mut self) -> Result<(), SimError> {
        self.scenario.populate(&mut self.store, &self.config)?;
        info!(
            "seeded {} bodies from {} scenario",
            self.store.len(),
            self.scenario.name()
        );
        Ok(())
    }

    /// Runs one rendered frame: accumulate owed time, catch up in fixed steps, then apply
    /// pointer input once.
    pub fn frame(&mut self, elapsed: Real, pointer: &PointerInput) -> FrameReport {
        let mut report = FrameReport::default();

        if !self.paused {
            self.clock.accumulate(elapsed, self.config.time_scale);
            let budget = self.clock.max_steps_per_frame();
            while report.steps < budget && self.clock.try_consume_step() {
                self.run_step();
                report.steps += 1;
            }
            if report.steps == budget {
                report.dropped = self.clock.drop_backlog();
            }
        }

        self.interaction
            .handle_pointer(&mut self.store, pointer, self.paused);

        self.last_frame = report;
        report
    }

    /// Executes exactly one fixed step, ignoring pause state and the accumulator.
    pub fn step(&mut self) {
        self.clock.force_step();
        self.run_step();
    }

    pub fn advance(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Scenario hook, then every force from the current positions, then integration.
    fn run_step(&mut self) {
        let dt = self.clock.dt();
        self.scenario.on_step(self.clock.t(), dt, &mut self.store);
        apply_forces(self.store.bodies_mut(), &self.config);
        integrate_all(self.store.bodies_mut(), dt);
    }

    /// Clears the store, re-seeds the scenario and zeroes simulated time. Pause state is kept.
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.store.clear();
        self.interaction.clear();
        self.clock.reset();
        info!("simulation reset");
        self.seed()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pausing drops the follow target; resuming cancels an uncommitted drag.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        if paused {
            self.interaction.set_follow_target(None);
        } else {
            self.interaction.cancel_drag();
        }
        info!("simulation {}", if paused { "paused" } else { "resumed" });
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    pub fn nearest_to(&self, point: Vec2) -> Option<BodyHandle> {
        self.store.nearest_to(point)
    }

    /// Pointer-down at a world-space point, as the frame loop would apply it.
    pub fn pointer_pressed(&mut self, point: Vec2) {
        self.interaction
            .pointer_pressed(&self.store, point, self.paused);
    }

    /// Starts dragging the body nearest to `point`. Only possible while paused.
    pub fn begin_drag(&mut self, point: Vec2) -> Option<BodyHandle> {
        if !self.paused {
            return None;
        }
        let handle = self.store.nearest_to(point)?;
        self.interaction
            .begin_drag(&self.store, handle)
            .then_some(handle)
    }

    pub fn update_drag(&mut self, point: Vec2) {
        self.interaction.update_drag(point);
    }

    pub fn commit_drag(&mut self) -> bool {
        self.interaction.commit_drag(&mut self.store)
    }

    pub fn cancel_drag(&mut self) {
        self.interaction.cancel_drag();
    }

    pub fn drag(&self) -> &DragState {
        self.interaction.drag()
    }

    pub fn follow_target(&self) -> Option<BodyHandle> {
        self.interaction.follow_target()
    }

    pub fn set_follow_target(&mut self, target: Option<BodyHandle>) {
        self.interaction.set_follow_target(target);
    }

    pub fn store(&self) -> &BodyStore {
        &self.store
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.store.get(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.store.iter()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn t(&self) -> Real {
        self.clock.t()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn last_frame(&self) -> FrameReport {
        self.last_frame
    }

    pub fn total_energy(&self) -> Real {
        self.store
            .total_energy(self.config.g, self.config.min_separation)
    }

    pub fn set_time_scale(&mut self, time_scale: Real) -> Result<(), SimError> {
        let config = SimConfig {
            time_scale,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_gravity(&mut self, g: Real) -> Result<(), SimError> {
        let config = SimConfig {
            g,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Switches force evaluation between the direct sum and Barnes-Hut.
    pub fn set_force_model(&mut self, force_model: ForceModel) -> Result<(), SimError> {
        let config = SimConfig {
            force_model,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }
}
