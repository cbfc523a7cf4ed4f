//! The simulator object: owned subsystems plus the per-tick pipeline.

use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

use synaptica_events::Command;
use synaptica_hormones::{HormoneSystem, Personality};
use synaptica_network::{
    state_digest, subsystem_rng, BuildError, Fabric, FabricConfig, NeuronBank, Stdp, StdpParams,
};

/// Everything needed to construct a brain deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrainConfig {
    pub fabric: FabricConfig,
    pub stdp: StdpParams,
    /// Tick size in seconds.
    pub dt: f32,
    /// Genesis seed; every subsystem stream derives from it.
    pub seed: u64,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            fabric: FabricConfig::default(),
            stdp: StdpParams::default(),
            dt: 0.001,
            seed: 42,
        }
    }
}

/// What a dispatched command did, for the scheduler's status records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    HormoneDrivesUpdated,
    PatternArmed,
    ExitRequested,
}

/// The complete simulator state.
///
/// Subsystem fields are public: tests and tooling may inspect (or inject
/// into) membrane state directly, the way the scenario suite drives
/// specific neurons.
pub struct Brain {
    pub hormones: HormoneSystem,
    pub neurons: NeuronBank,
    pub fabric: Fabric,
    pub stdp: Stdp,
    /// Completed ticks since construction.
    pub tick: u64,

    mood_rng: ChaCha12Rng,
    noise_rng: ChaCha12Rng,
}

impl Brain {
    pub fn new(cfg: &BrainConfig) -> Result<Self, BuildError> {
        let mut topology_rng = subsystem_rng(cfg.seed, "topology");
        let mut delay_rng = subsystem_rng(cfg.seed, "delays");

        let fabric = Fabric::build(cfg.fabric, &mut topology_rng, &mut delay_rng)?;
        let neurons = NeuronBank::new(cfg.fabric.n, cfg.fabric.n_inputs, cfg.dt);
        let stdp = Stdp::new(cfg.stdp, fabric.synapses().len());

        Ok(Self {
            hormones: HormoneSystem::new(Personality::default()),
            neurons,
            fabric,
            stdp,
            tick: 0,
            mood_rng: subsystem_rng(cfg.seed, "mood"),
            noise_rng: subsystem_rng(cfg.seed, "noise"),
        })
    }

    /// Dispatch one ingested command.
    pub fn apply_command(&mut self, cmd: &Command) -> CommandEffect {
        match cmd {
            Command::SetHormones {
                dopamine,
                cortisol,
                adrenaline,
            } => {
                if let Some(v) = dopamine {
                    self.hormones.set_dopamine_drive(*v);
                }
                if let Some(v) = cortisol {
                    self.hormones.set_cortisol_drive(*v);
                }
                if let Some(v) = adrenaline {
                    self.hormones.set_adrenaline_drive(*v);
                }
                CommandEffect::HormoneDrivesUpdated
            }
            Command::InputPattern { pattern } => {
                self.fabric.arm_pattern(pattern);
                CommandEffect::PatternArmed
            }
            Command::Exit => CommandEffect::ExitRequested,
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// The order is the observable contract: delayed currents collected
    /// before injection, routing reads the *previous* tick's spikes, and
    /// plasticity sees the new ones. The ring head advances last.
    pub fn step(&mut self) {
        let dt = self.neurons.dt;

        self.hormones.update(dt, &mut self.mood_rng);
        let levels = *self.hormones.levels();

        self.neurons.apply_hormones(&levels);
        self.fabric.collect_delayed(&mut self.neurons.isyn);
        self.fabric.inject_inputs(&mut self.neurons.isyn, &mut self.noise_rng);
        self.fabric.route_spikes(&self.neurons.spk);
        self.neurons.step();

        self.stdp.decay_traces(dt);
        self.stdp
            .apply_updates(self.fabric.synapses_mut(), &self.neurons.spk, &levels);

        self.fabric.advance_ring();
        self.tick += 1;
    }

    /// Digest of the mutable state, for determinism verification.
    pub fn state_digest(&self) -> [u8; 32] {
        state_digest(&self.neurons, &self.fabric, self.hormones.levels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> BrainConfig {
        BrainConfig {
            fabric: FabricConfig {
                n: 100,
                fan_in: 10,
                n_inputs: 10,
                n_outputs: 10,
                ..FabricConfig::default()
            },
            ..BrainConfig::default()
        }
    }

    #[test]
    fn construction_is_seed_deterministic() {
        let a = Brain::new(&small_config()).unwrap();
        let b = Brain::new(&small_config()).unwrap();
        assert_eq!(a.state_digest(), b.state_digest());
    }

    #[test]
    fn set_hormones_command_clamps_drives() {
        let mut brain = Brain::new(&small_config()).unwrap();
        let effect = brain.apply_command(&Command::SetHormones {
            dopamine: Some(10.0),
            cortisol: None,
            adrenaline: None,
        });
        assert_eq!(effect, CommandEffect::HormoneDrivesUpdated);
        assert_eq!(brain.hormones.dopamine_drive(), 2.0);
    }

    #[test]
    fn input_pattern_command_arms_fabric() {
        let mut brain = Brain::new(&small_config()).unwrap();
        let effect = brain.apply_command(&Command::InputPattern {
            pattern: vec![1, 0, 1],
        });
        assert_eq!(effect, CommandEffect::PatternArmed);
        assert!(brain.fabric.pattern_armed());
        brain.step();
        assert!(!brain.fabric.pattern_armed(), "pattern is one-shot");
    }

    #[test]
    fn tick_counter_advances() {
        let mut brain = Brain::new(&small_config()).unwrap();
        for _ in 0..5 {
            brain.step();
        }
        assert_eq!(brain.tick, 5);
    }
}
