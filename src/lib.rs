//! # Tinsel
//!
//! A GPU particle tree that morphs between a scattered cloud and an
//! assembled tree.
//!
//! Roughly 85 000 particles in four groups (foliage needles, two golden
//! spiral ribbons, five ornament classes, and falling snow) are generated
//! once at startup. Each particle knows where it sits in the scattered cloud
//! and where it belongs on the tree. A single shared progress value moves
//! between 0 (scattered) and 1 (assembled), and every renderer derives its
//! particles' positions from it each frame.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tinsel::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     TreeScene::new()
//!         .with_seed(2024)
//!         .formed(true)
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Attribute sets
//!
//! [`attributes::generate`] produces a [`ParticleAttributeSet`] per role:
//! parallel arrays of scatter position, target position, colour, size and a
//! per-particle seed in `[0, 1)`. Sets are immutable after generation.
//!
//! ### Morph progress
//!
//! [`MorphDriver`] owns the shared progress and approaches the target
//! arrangement at a fixed rate. Renderers may follow it with extra lag
//! through a [`morph::ProgressFollower`], and stagger individual particles
//! with [`morph::local_progress`] so that low-seed particles move first.
//!
//! ### Systems
//!
//! Each renderer's CPU half implements [`ParticleSystem`]. Point clouds
//! (foliage, spirals, snow) expose a uniform block; the vertex shader does the
//! morph. Ornaments and the tree topper compute their instance transforms on
//! the CPU. [`SceneComposer`] steps the driver and then every system with
//! the same frame context.
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | Space / Enter | Toggle between scattered and assembled |
//! | Left drag | Orbit |
//! | Wheel | Zoom |
//! | Escape | Quit |

pub mod attributes;
mod composer;
pub mod config;
pub mod easing;
pub mod error;
pub mod gpu;
pub mod morph;
mod scene;
pub mod shader;
pub mod spawn;
pub mod systems;
pub mod time;

pub use attributes::{AttributeArrays, OrnamentClass, ParticleAttributeSet, Role};
pub use bytemuck;
pub use composer::SceneComposer;
pub use config::SceneConfig;
pub use easing::Easing;
pub use error::{AttributeError, ConfigError, GpuError, SceneError};
pub use glam::{Mat4, Vec2, Vec3};
pub use morph::{MorphDriver, MorphState};
pub use scene::{action_hint, TreeScene};
pub use spawn::SpawnContext;
pub use systems::{FrameContext, ParticleSystem};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use tinsel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attributes::{generate, AttributeArrays, OrnamentClass, ParticleAttributeSet, Role};
    pub use crate::composer::SceneComposer;
    pub use crate::config::SceneConfig;
    pub use crate::easing::Easing;
    pub use crate::error::SceneError;
    pub use crate::morph::{MorphDriver, ProgressFollower};
    pub use crate::scene::TreeScene;
    pub use crate::spawn::SpawnContext;
    pub use crate::systems::{FrameContext, ParticleSystem};
    pub use crate::{Vec2, Vec3};
}
