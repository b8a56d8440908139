//! Scene composition: one clock, one morph driver, every renderer.
//!
//! The composer is the only owner of the shared morph progress. Each frame it
//! advances the clock, steps the driver, and then hands the same
//! [`FrameContext`] to every system, so no renderer can observe a progress
//! value from a different frame than its siblings.

use crate::attributes::{generate, OrnamentClass, Role};
use crate::config::SceneConfig;
use crate::morph::MorphDriver;
use crate::shader::LightUniforms;
use crate::spawn::SpawnContext;
use crate::systems::{
    FoliageSystem, FrameContext, OrnamentSystem, ParticleSystem, SnowSystem, SpiralSystem,
    TopperStar,
};
use crate::time::FrameClock;

/// Owns the frame clock, the morph driver and all particle systems.
pub struct SceneComposer {
    clock: FrameClock,
    driver: MorphDriver,
    foliage: FoliageSystem,
    spirals: SpiralSystem,
    ornaments: Vec<OrnamentSystem>,
    snow: SnowSystem,
    topper: TopperStar,
}

impl SceneComposer {
    /// Generate every attribute set and wire up the systems.
    pub fn new(config: &SceneConfig, mut ctx: SpawnContext) -> Self {
        let mut driver = MorphDriver::new(config.morph.rate);
        driver.set_formed(config.morph.start_formed);

        let smoothing = &config.smoothing;
        let foliage = FoliageSystem::new(
            generate(Role::Foliage, Role::Foliage.default_count(), &mut ctx),
            smoothing.foliage,
        );
        let spirals = SpiralSystem::new(
            generate(Role::Spiral, Role::Spiral.default_count(), &mut ctx),
            smoothing.spirals,
        );
        let ornaments = OrnamentClass::ALL
            .iter()
            .map(|&class| {
                let role = Role::Ornament(class);
                OrnamentSystem::new(class, generate(role, role.default_count(), &mut ctx), smoothing.ornaments)
            })
            .collect();
        let snow = SnowSystem::new(generate(Role::Snow, Role::Snow.default_count(), &mut ctx));

        let composer = Self {
            clock: FrameClock::new(),
            driver,
            foliage,
            spirals,
            ornaments,
            snow,
            topper: TopperStar::new(),
        };
        log::info!(
            "scene composed: {} systems, {} particles",
            composer.system_count(),
            composer.particle_count()
        );
        composer
    }

    /// Advance by wall time. Call once per displayed frame.
    pub fn frame(&mut self) -> FrameContext {
        let (elapsed, delta) = self.clock.tick();
        self.run(elapsed, delta)
    }

    /// Advance by an explicit delta.
    pub fn step(&mut self, delta: f32) -> FrameContext {
        let (elapsed, delta) = self.clock.advance(delta);
        self.run(elapsed, delta)
    }

    fn run(&mut self, elapsed: f32, delta: f32) -> FrameContext {
        let progress = self.driver.update(delta);
        let frame = FrameContext::new(elapsed, delta, progress, self.driver.is_formed());
        for system in self.systems_mut() {
            system.update(&frame);
        }
        frame
    }

    fn systems_mut(&mut self) -> Vec<&mut dyn ParticleSystem> {
        let mut systems: Vec<&mut dyn ParticleSystem> = Vec::with_capacity(4 + self.ornaments.len());
        systems.push(&mut self.foliage);
        systems.push(&mut self.spirals);
        for ornament in &mut self.ornaments {
            systems.push(ornament);
        }
        systems.push(&mut self.snow);
        systems.push(&mut self.topper);
        systems
    }

    /// Flip between the scattered cloud and the assembled tree.
    pub fn toggle(&mut self) -> bool {
        let formed = self.driver.toggle();
        log::info!("{}", if formed { "assembling tree" } else { "scattering elements" });
        formed
    }

    pub fn set_formed(&mut self, formed: bool) {
        self.driver.set_formed(formed);
    }

    pub fn is_formed(&self) -> bool {
        self.driver.is_formed()
    }

    /// Shared progress after the last frame.
    pub fn progress(&self) -> f32 {
        self.driver.progress()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn driver(&self) -> &MorphDriver {
        &self.driver
    }

    pub fn foliage(&self) -> &FoliageSystem {
        &self.foliage
    }

    pub fn spirals(&self) -> &SpiralSystem {
        &self.spirals
    }

    /// One system per ornament class, in [`OrnamentClass::ALL`] order.
    pub fn ornaments(&self) -> &[OrnamentSystem] {
        &self.ornaments
    }

    pub fn snow(&self) -> &SnowSystem {
        &self.snow
    }

    pub fn topper(&self) -> &TopperStar {
        &self.topper
    }

    /// Scene lights for the current topper state.
    pub fn lights(&self) -> LightUniforms {
        LightUniforms::new(self.topper.light_position(), self.topper.light_intensity())
    }

    pub fn system_count(&self) -> usize {
        4 + self.ornaments.len()
    }

    /// Points plus mesh instances drawn each frame.
    pub fn particle_count(&self) -> usize {
        self.foliage.len()
            + self.spirals.len()
            + self.ornaments.iter().map(|o| o.len()).sum::<usize>()
            + self.snow.len()
            + self.topper.len()
    }
}
