#![deny(unsafe_code)]
//! Core simulation for the pointer-reactive vector field.
//!
//! Provides the geometry primitives and anchor lattice, the attractor field
//! evaluator, the particle store (spawn, integrate, cull), the `Simulation` and
//! `Renderer` traits, `Session`, `TickClock`, `Xorshift64` and `Seed`.

pub mod clock;
pub mod error;
pub mod field;
pub mod geometry;
pub mod params;
pub mod particle;
pub mod prng;
pub mod seed;
pub mod session;
pub mod simulation;

pub use clock::{FrameInputs, TickClock};
pub use error::SimError;
pub use field::{FieldConfig, Vector, VectorField};
pub use geometry::{AnchorGrid, Point};
pub use particle::{Particle, ParticleConfig, ParticleStore, ABSENT_ATTRACTOR};
pub use prng::Xorshift64;
pub use seed::Seed;
pub use session::Session;
pub use simulation::{Frame, Renderer, Simulation};
