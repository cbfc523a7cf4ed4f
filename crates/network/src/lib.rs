/*!
# Spiking Network Core

**Purpose:** The leaky-integrate-and-fire population, the synapse fabric
that carries spikes between its members, and the plasticity rule that
reshapes the fabric's weights.

The three parts are deliberately separate structs wired together by the
scheduler: the neuron bank owns membrane state, the fabric owns
connectivity and the delay ring, plasticity owns the eligibility traces.
All writes happen in serial tick order; there is no intra-tick
parallelism in the contract.

**Determinism guarantees:**
- Construction and noise draw exclusively from per-subsystem ChaCha
  streams derived from one genesis seed.
- No wall-clock time enters any state transition.
- Identical seeds and command streams produce bit-identical state, which
  [`state_digest`] condenses for cheap comparison.
*/

pub mod fabric;
pub mod neurons;
pub mod plasticity;
pub mod seeds;

pub use fabric::{BuildError, Fabric, FabricConfig, Synapse};
pub use neurons::NeuronBank;
pub use plasticity::{Stdp, StdpParams};
pub use seeds::subsystem_rng;

use synaptica_hormones::HormoneSet;

/// Digest of the mutable simulation state: membrane potentials, synaptic
/// weights, and hormone levels. Two runs from the same seed must produce
/// identical digest streams.
pub fn state_digest(neurons: &NeuronBank, fabric: &Fabric, hormones: &HormoneSet) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for &v in &neurons.v {
        hasher.update(&v.to_le_bytes());
    }
    for syn in fabric.synapses() {
        hasher.update(&syn.w.to_le_bytes());
    }
    for (_, level) in hormones.named_levels() {
        hasher.update(&level.to_le_bytes());
    }
    *hasher.finalize().as_bytes()
}
