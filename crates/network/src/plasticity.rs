//! Pair-based STDP with neuromodulated learning rate.
//!
//! Each synapse carries a pre- and a post-trace: exponentially decaying
//! memories of recent spikes on either side. A postsynaptic spike
//! potentiates by the pre-trace (pre fired recently, then post: LTP); a
//! presynaptic spike depresses by the post-trace (post fired first: LTD).
//! Dopamine amplifies and cortisol dampens the update through a shared
//! modulator; the modulator may go negative under high cortisol, which
//! inverts learning polarity. That inversion is part of the contract.
//!
//! Inhibitory synapses (negative weight) are frozen.

use crate::fabric::Synapse;
use serde::{Deserialize, Serialize};
use synaptica_hormones::HormoneSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StdpParams {
    /// Global learning rate.
    pub lr: f32,
    /// Potentiation amplitude.
    pub a_plus: f32,
    /// Depression amplitude.
    pub a_minus: f32,
    /// Pre-trace time constant (seconds).
    pub tau_pre: f32,
    /// Post-trace time constant (seconds).
    pub tau_post: f32,
    /// Weight clamp for excitatory synapses.
    pub w_min: f32,
    pub w_max: f32,
}

impl Default for StdpParams {
    fn default() -> Self {
        Self {
            lr: 0.005,
            a_plus: 0.0001,
            a_minus: 0.00012,
            tau_pre: 0.020,
            tau_post: 0.020,
            w_min: 0.0,
            w_max: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stdp {
    params: StdpParams,
    pre_trace: Vec<f32>,
    post_trace: Vec<f32>,
}

impl Stdp {
    pub fn new(params: StdpParams, n_synapses: usize) -> Self {
        Self {
            params,
            pre_trace: vec![0.0; n_synapses],
            post_trace: vec![0.0; n_synapses],
        }
    }

    pub fn params(&self) -> &StdpParams {
        &self.params
    }

    pub fn pre_trace(&self, synapse: usize) -> f32 {
        self.pre_trace[synapse]
    }

    pub fn post_trace(&self, synapse: usize) -> f32 {
        self.post_trace[synapse]
    }

    /// Decay every trace by one tick. Runs for all synapses, frozen ones
    /// included; their traces simply never get bumped.
    pub fn decay_traces(&mut self, dt: f32) {
        let dp = (-dt / self.params.tau_pre).exp();
        let dq = (-dt / self.params.tau_post).exp();
        for t in &mut self.pre_trace {
            *t *= dp;
        }
        for t in &mut self.post_trace {
            *t *= dq;
        }
    }

    /// Bump traces from this tick's spikes and apply weight updates.
    pub fn apply_updates(&mut self, syn: &mut [Synapse], spk: &[u8], h: &HormoneSet) {
        let modulator = 1.0 + 0.5 * h.dopamine - 0.3 * h.cortisol;

        for (si, s) in syn.iter_mut().enumerate() {
            if s.w < 0.0 {
                continue;
            }

            let pre_sp = spk[s.pre as usize] != 0;
            let post_sp = spk[s.post as usize] != 0;

            if pre_sp {
                self.pre_trace[si] += 1.0;
            }
            if post_sp {
                self.post_trace[si] += 1.0;
            }

            let mut dw = 0.0;
            if post_sp {
                dw += self.params.lr * self.params.a_plus * self.pre_trace[si] * modulator;
            }
            if pre_sp {
                dw -= self.params.lr * self.params.a_minus * self.post_trace[si] * modulator;
            }

            s.w = (s.w + dw).clamp(self.params.w_min, self.params.w_max);
        }
    }
}
