//! Brain simulator: hormone-modulated spiking network behind journals.
//!
//! The binary wires four owned subsystems — hormone system, neuron bank,
//! synapse fabric, plasticity — into a fixed-timestep scheduler that
//! ingests commands from and publishes activity to append-only JSONL
//! journals. Everything stateful lives on [`Brain`]; there are no
//! process-wide globals.

pub mod brain;
pub mod scheduler;

pub use brain::{Brain, BrainConfig, CommandEffect};
pub use scheduler::{run, RunOptions, MAX_STEPS_PER_FRAME};
