//! End-to-end behavioral scenarios (seed 42, 100-neuron population).

use synaptica_brain::{Brain, BrainConfig};
use synaptica_events::Command;
use synaptica_network::FabricConfig;

fn scenario_config() -> BrainConfig {
    BrainConfig {
        fabric: FabricConfig {
            n: 100,
            fan_in: 10,
            n_inputs: 10,
            n_outputs: 10,
            ..FabricConfig::default()
        },
        seed: 42,
        ..BrainConfig::default()
    }
}

fn idle_brain() -> Brain {
    Brain::new(&scenario_config()).expect("build")
}

/// S1: no commands, bounded activity, hormones inside the clamp.
#[test]
fn s1_idle_activity_is_bounded() {
    let mut brain = idle_brain();
    let mut total_spikes: u64 = 0;
    for _ in 0..1000 {
        brain.step();
        total_spikes += u64::from(brain.neurons.spike_count());
        for (name, level) in brain.hormones.levels().named_levels() {
            assert!((0.01..=0.99).contains(&level), "{name} out of range");
        }
    }
    // Far below saturation (100 neurons x 1000 ticks).
    assert!(
        total_spikes < 10_000,
        "idle network too active: {total_spikes}"
    );
}

/// S2: a dopamine drive lifts both the hormone level and the spike rate.
#[test]
fn s2_dopamine_drive_raises_level_and_rate() {
    let mut idle = idle_brain();
    let mut driven = idle_brain();
    let baseline = driven.hormones.levels().dopamine;

    driven.apply_command(&Command::SetHormones {
        dopamine: Some(1.0),
        cortisol: None,
        adrenaline: None,
    });

    let mut idle_spikes: u64 = 0;
    let mut driven_spikes: u64 = 0;
    for t in 0..6000 {
        idle.step();
        driven.step();
        idle_spikes += u64::from(idle.neurons.spike_count());
        driven_spikes += u64::from(driven.neurons.spike_count());
        if t == 1999 {
            assert!(
                driven.hormones.levels().dopamine > baseline,
                "dopamine did not rise: {} <= {}",
                driven.hormones.levels().dopamine,
                baseline
            );
        }
    }

    // The drive lowers thresholds faster, so excitation sets in earlier
    // and the driven run accumulates strictly more spikes.
    assert!(
        driven_spikes > idle_spikes,
        "drive should excite: {driven_spikes} <= {idle_spikes}"
    );

    // Long horizon: the drive saturates the level near the upper clamp.
    for _ in 0..60_000 {
        driven.step();
    }
    assert!(
        driven.hormones.levels().dopamine > 0.9,
        "dopamine should saturate near the clamp: {}",
        driven.hormones.levels().dopamine
    );
}

/// S3: an armed input pattern deposits +1.0 once, then disarms.
#[test]
fn s3_input_pattern_is_applied_once() {
    let mut brain = idle_brain();
    brain.apply_command(&Command::InputPattern {
        pattern: vec![1, 0, 1, 0, 1, 0, 1, 0, 1, 0],
    });

    // Reproduce the tick prefix up to injection and inspect Isyn before
    // integration consumes it.
    brain.fabric.collect_delayed(&mut brain.neurons.isyn);
    {
        // Noise draws are rare (p = 2e-4) but allowed for; the pattern
        // contribution must dominate exactly.
        let mut noise = synaptica_network::subsystem_rng(7, "scratch-noise");
        brain.fabric.inject_inputs(&mut brain.neurons.isyn, &mut noise);
    }
    for i in 0..10 {
        let expected = if i % 2 == 0 { 1.0 } else { 0.0 };
        let got = brain.neurons.isyn[i];
        assert!(
            (got - expected).abs() < 0.06,
            "neuron {i}: Isyn {got}, expected about {expected}"
        );
    }
    assert!(!brain.fabric.pattern_armed(), "pattern must be consumed");

    // Next injection pass adds nothing from the pattern.
    let mut isyn = vec![0.0f32; 100];
    let mut noise = synaptica_network::subsystem_rng(8, "scratch-noise");
    brain.fabric.inject_inputs(&mut isyn, &mut noise);
    for (i, &c) in isyn.iter().enumerate() {
        assert!(c < 0.06, "neuron {i}: pattern re-applied ({c})");
    }
}

/// S4: a cortisol drive suppresses serotonin relative to the idle run.
#[test]
fn s4_cortisol_suppresses_serotonin() {
    let mut idle = idle_brain();
    let mut stressed = idle_brain();
    stressed.apply_command(&Command::SetHormones {
        dopamine: None,
        cortisol: Some(1.0),
        adrenaline: None,
    });

    // Settle, then compare over a 1000-tick window.
    for _ in 0..30_000 {
        idle.step();
        stressed.step();
    }
    let mut idle_sum = 0.0f64;
    let mut stressed_sum = 0.0f64;
    for _ in 0..1000 {
        idle.step();
        stressed.step();
        idle_sum += f64::from(idle.hormones.levels().serotonin);
        stressed_sum += f64::from(stressed.hormones.levels().serotonin);
    }

    assert!(
        stressed_sum < idle_sum * 0.7,
        "serotonin not suppressed enough: {stressed_sum} vs {idle_sum}"
    );
}

/// Find a hidden-to-hidden synapse whose weight has headroom both ways.
fn plastic_pair(brain: &Brain) -> (usize, usize, usize) {
    for (si, s) in brain.fabric.synapses().iter().enumerate() {
        let (pre, post) = (s.pre as usize, s.post as usize);
        let hidden = |i: usize| !brain.fabric.is_input(i) && !brain.fabric.is_output(i);
        if hidden(pre) && hidden(post) && s.w > 0.05 && s.w < 0.19 {
            return (si, pre, post);
        }
    }
    panic!("no suitable excitatory hidden synapse found");
}

/// Fire `first` then `second` one tick apart, then let traces relax.
fn run_pairings(brain: &mut Brain, first: usize, second: usize, pairings: usize) {
    for _ in 0..pairings {
        brain.neurons.isyn[first] = 10.0;
        brain.step();
        brain.neurons.isyn[second] = 10.0;
        brain.step();
        for _ in 0..19 {
            brain.step();
        }
    }
}

/// S5: repeated pre-then-post pairing potentiates the connecting synapse.
#[test]
fn s5_pre_post_pairing_potentiates() {
    let mut brain = idle_brain();
    brain.apply_command(&Command::SetHormones {
        dopamine: Some(1.0),
        cortisol: None,
        adrenaline: None,
    });
    let (si, pre, post) = plastic_pair(&brain);
    let w0 = brain.fabric.synapses()[si].w;

    run_pairings(&mut brain, pre, post, 80);

    let w1 = brain.fabric.synapses()[si].w;
    assert!(
        w1 > w0 + 5e-6,
        "pre→post pairing should potentiate: {w0} -> {w1}"
    );
}

/// S6: the reversed ordering depresses the same synapse.
#[test]
fn s6_post_pre_pairing_depresses() {
    let mut brain = idle_brain();
    brain.apply_command(&Command::SetHormones {
        dopamine: Some(1.0),
        cortisol: None,
        adrenaline: None,
    });
    let (si, pre, post) = plastic_pair(&brain);
    let w0 = brain.fabric.synapses()[si].w;

    run_pairings(&mut brain, post, pre, 80);

    let w1 = brain.fabric.synapses()[si].w;
    assert!(
        w1 < w0 - 5e-6,
        "post→pre pairing should depress: {w0} -> {w1}"
    );
}
