//! Synapse fabric: static adjacency, delay ring, signal routing.
//!
//! Connectivity is built once from seeded streams and never changes shape
//! afterwards; only weights move (plasticity). The adjacency is stored
//! CSR-style: synapse indices sorted by presynaptic neuron with an offset
//! array, so routing one neuron's spike walks a contiguous slice.
//!
//! Delays double as a hop-count proxy: a synapse's contribution is
//! attenuated exponentially with its delay and dropped entirely past the
//! propagation depth limit. That conflation caps cascade energy in the
//! recurrent random graph and is load-bearing for stability; the decay
//! and depth constants are tuned together.

use rand::Rng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Construction parameters for the fabric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Population size.
    pub n: usize,
    /// Incoming synapse candidates drawn per neuron.
    pub fan_in: usize,
    /// Input neurons occupy `[0, n_inputs)`.
    pub n_inputs: usize,
    /// Output neurons occupy `[n - n_outputs, n)`.
    pub n_outputs: usize,
    /// Delay ring capacity in ticks.
    pub ring_slots: u16,
    /// Delays are drawn uniformly from `[0, delay_slots)`.
    pub delay_slots: u16,
    /// Contributions with delay beyond this are dropped.
    pub max_propagation_depth: u16,
    /// Per-hop exponential attenuation base.
    pub spike_decay_per_hop: f32,
    /// Per-tick background noise probability, input neurons only.
    pub noise_p: f32,
    /// Background noise current amplitude.
    pub noise_amp: f32,
    /// Leading fraction of the population wired inhibitory.
    pub inhibitory_fraction: f32,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            n: 1000,
            fan_in: 30,
            n_inputs: 120,
            n_outputs: 120,
            ring_slots: 16,
            delay_slots: 4,
            max_propagation_depth: 5,
            spike_decay_per_hop: 0.1,
            noise_p: 0.0002,
            noise_amp: 0.05,
            inhibitory_fraction: 0.2,
        }
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("population of {n} cannot hold {n_inputs} inputs plus {n_outputs} outputs")]
    LayersExceedPopulation {
        n: usize,
        n_inputs: usize,
        n_outputs: usize,
    },
    #[error("population must be non-empty")]
    EmptyPopulation,
    #[error("delay_slots {delay_slots} exceeds ring capacity {ring_slots}")]
    DelayExceedsRing { delay_slots: u16, ring_slots: u16 },
}

/// One directed connection. Weights carry the sign: excitatory synapses
/// live in `[0, w_max]`, inhibitory ones are negative and frozen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    pub pre: u32,
    pub post: u32,
    pub w: f32,
    /// Arrival delay in ticks; also the hop-depth used for attenuation.
    pub delay: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fabric {
    cfg: FabricConfig,
    syn: Vec<Synapse>,

    /// Synapse indices sorted by (pre, post).
    syn_by_pre: Vec<u32>,
    /// `syn_by_pre[pre_offsets[p]..pre_offsets[p+1]]` is neuron p's slice.
    pre_offsets: Vec<u32>,

    is_input: Vec<bool>,
    is_output: Vec<bool>,

    /// Flat `[n * ring_slots]` buffer of scheduled currents.
    ring: Vec<f32>,
    /// Write head; the slot read (and then zeroed) this tick.
    rpos: u16,

    /// One-shot external stimulus over the input prefix.
    pattern: Vec<u8>,
    pattern_armed: bool,
}

impl Fabric {
    /// Build the static topology from the seeded streams.
    ///
    /// Per postsynaptic neuron, `fan_in` presynaptic candidates are drawn
    /// uniformly; self-loops and output-neuron sources are rejected
    /// (outputs are terminal). Duplicate pairs are kept and stack.
    pub fn build(
        cfg: FabricConfig,
        topology_rng: &mut ChaCha12Rng,
        delay_rng: &mut ChaCha12Rng,
    ) -> Result<Self, BuildError> {
        if cfg.n == 0 {
            return Err(BuildError::EmptyPopulation);
        }
        if cfg.n_inputs + cfg.n_outputs > cfg.n {
            return Err(BuildError::LayersExceedPopulation {
                n: cfg.n,
                n_inputs: cfg.n_inputs,
                n_outputs: cfg.n_outputs,
            });
        }
        if cfg.delay_slots > cfg.ring_slots {
            return Err(BuildError::DelayExceedsRing {
                delay_slots: cfg.delay_slots,
                ring_slots: cfg.ring_slots,
            });
        }

        let mut is_input = vec![false; cfg.n];
        for flag in is_input.iter_mut().take(cfg.n_inputs) {
            *flag = true;
        }
        let mut is_output = vec![false; cfg.n];
        for flag in is_output.iter_mut().skip(cfg.n - cfg.n_outputs) {
            *flag = true;
        }

        // Leading fraction is inhibitory, inputs excluded. Inhibitory
        // status only flips the initial weight sign.
        let n_inh = (cfg.inhibitory_fraction * cfg.n as f32) as usize;
        let mut is_inhibitory = vec![false; cfg.n];
        for flag in is_inhibitory.iter_mut().take(n_inh) {
            *flag = true;
        }
        for flag in is_inhibitory.iter_mut().take(cfg.n_inputs) {
            *flag = false;
        }

        let mut syn = Vec::with_capacity(cfg.n * cfg.fan_in);
        for post in 0..cfg.n {
            for _ in 0..cfg.fan_in {
                let pre = topology_rng.gen_range(0..cfg.n);
                if pre == post {
                    continue;
                }
                if is_output[pre] {
                    continue;
                }

                let mut w = 0.1 + 0.2 * topology_rng.gen::<f32>();
                if is_inhibitory[pre] {
                    w *= -2.0;
                }

                syn.push(Synapse {
                    pre: pre as u32,
                    post: post as u32,
                    w,
                    delay: 0,
                });
            }
        }

        for s in &mut syn {
            s.delay = delay_rng.gen_range(0..cfg.delay_slots);
        }

        let mut syn_by_pre: Vec<u32> = (0..syn.len() as u32).collect();
        syn_by_pre.sort_by_key(|&i| {
            let s = &syn[i as usize];
            (s.pre, s.post)
        });

        let mut pre_offsets = vec![0u32; cfg.n + 1];
        for &idx in &syn_by_pre {
            pre_offsets[syn[idx as usize].pre as usize + 1] += 1;
        }
        for p in 1..=cfg.n {
            pre_offsets[p] += pre_offsets[p - 1];
        }

        debug!(
            n = cfg.n,
            synapses = syn.len(),
            inhibitory = n_inh,
            "fabric built"
        );

        Ok(Self {
            ring: vec![0.0; cfg.n * cfg.ring_slots as usize],
            rpos: 0,
            syn,
            syn_by_pre,
            pre_offsets,
            is_input,
            is_output,
            pattern: Vec::new(),
            pattern_armed: false,
            cfg,
        })
    }

    pub fn config(&self) -> &FabricConfig {
        &self.cfg
    }

    pub fn synapses(&self) -> &[Synapse] {
        &self.syn
    }

    pub fn synapses_mut(&mut self) -> &mut [Synapse] {
        &mut self.syn
    }

    pub fn is_input(&self, i: usize) -> bool {
        self.is_input[i]
    }

    pub fn is_output(&self, i: usize) -> bool {
        self.is_output[i]
    }

    pub fn rpos(&self) -> u16 {
        self.rpos
    }

    pub fn pattern_armed(&self) -> bool {
        self.pattern_armed
    }

    /// Indices (into [`Fabric::synapses`]) of `pre`'s outgoing synapses.
    pub fn outgoing(&self, pre: usize) -> &[u32] {
        let lo = self.pre_offsets[pre] as usize;
        let hi = self.pre_offsets[pre + 1] as usize;
        &self.syn_by_pre[lo..hi]
    }

    /// Arm a one-shot stimulus; anything beyond the input prefix is dropped.
    pub fn arm_pattern(&mut self, pattern: &[u8]) {
        let take = pattern.len().min(self.cfg.n_inputs);
        self.pattern.clear();
        self.pattern.extend_from_slice(&pattern[..take]);
        self.pattern_armed = !self.pattern.is_empty();
    }

    /// Deposit external currents: the armed pattern (consumed here) plus
    /// background noise on input neurons only.
    pub fn inject_inputs(&mut self, isyn: &mut [f32], noise_rng: &mut ChaCha12Rng) {
        if self.pattern_armed {
            for (i, &bit) in self.pattern.iter().enumerate() {
                if bit != 0 {
                    isyn[i] += 1.0;
                }
            }
            self.pattern_armed = false;
        }

        for i in 0..self.cfg.n_inputs {
            if noise_rng.gen::<f32>() < self.cfg.noise_p {
                isyn[i] += self.cfg.noise_amp;
            }
        }
    }

    /// Enqueue the previous tick's spikes into the delay ring.
    ///
    /// Input and output neurons never route: inputs act on the network
    /// through injected currents only, outputs are sinks.
    pub fn route_spikes(&mut self, spk: &[u8]) {
        let slots = self.cfg.ring_slots;
        for pre in 0..self.cfg.n {
            if spk[pre] == 0 || self.is_output[pre] || self.is_input[pre] {
                continue;
            }

            let lo = self.pre_offsets[pre] as usize;
            let hi = self.pre_offsets[pre + 1] as usize;
            for &sidx in &self.syn_by_pre[lo..hi] {
                let s = &self.syn[sidx as usize];

                let depth = s.delay;
                if depth > self.cfg.max_propagation_depth {
                    continue;
                }
                let val = s.w * self.cfg.spike_decay_per_hop.powi(i32::from(depth));

                let slot = (self.rpos + s.delay) % slots;
                self.ring[s.post as usize * slots as usize + slot as usize] += val;
            }
        }
    }

    /// Drain the head slot into the current buffer and zero it.
    pub fn collect_delayed(&mut self, isyn: &mut [f32]) {
        let slots = self.cfg.ring_slots as usize;
        let slot = self.rpos as usize;
        for (i, current) in isyn.iter_mut().enumerate().take(self.cfg.n) {
            let cell = &mut self.ring[i * slots + slot];
            *current += *cell;
            *cell = 0.0;
        }
    }

    /// Advance the write head; called once per tick, after routing.
    pub fn advance_ring(&mut self) {
        self.rpos = (self.rpos + 1) % self.cfg.ring_slots;
    }

    /// Sum of magnitudes sitting in the head slot. Zero after a collect.
    pub fn head_slot_total(&self) -> f32 {
        let slots = self.cfg.ring_slots as usize;
        (0..self.cfg.n)
            .map(|i| self.ring[i * slots + self.rpos as usize].abs())
            .sum()
    }
}
