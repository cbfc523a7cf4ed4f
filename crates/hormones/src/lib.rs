/*!
# Hormone System

**Purpose:** Ten-hormone neuromodulatory state for the spiking network.

The system tracks a current concentration vector that relaxes toward a
moving target. The target is rewritten by three sources: the personality
baseline, randomly scheduled mood events, and exogenous drives written by
the coach. A lerp-to-target integrator is used instead of a stiff ODE:
fixed relaxation speed gives settling in about a second without
single-tick oscillation, which is what the downstream excitability
modulation needs.

**Determinism:** every random draw flows through the caller-supplied
ChaCha stream, in tick order. Two systems updated with identically seeded
streams stay bit-identical.
*/

use rand::Rng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

pub mod mood;

pub use mood::MoodEvent;

/// Lower clamp for every concentration.
pub const LEVEL_MIN: f32 = 0.01;
/// Upper clamp for every concentration.
pub const LEVEL_MAX: f32 = 0.99;
/// Relaxation speed of the lerp integrator (per second).
pub const RELAX_SPEED: f32 = 0.05;
/// Exogenous drives saturate here.
pub const DRIVE_MAX: f32 = 2.0;
/// Drives below this are treated as absent.
const DRIVE_EPSILON: f32 = 0.01;

/// The ten modeled concentrations.
///
/// Field order is the canonical reporting order used by the spike log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HormoneSet {
    pub dopamine: f32,
    pub serotonin: f32,
    pub cortisol: f32,
    pub adrenaline: f32,
    pub oxytocin: f32,
    pub melatonin: f32,
    pub noradrenaline: f32,
    pub endorphin: f32,
    pub acetylcholine: f32,
    pub testosterone: f32,
}

impl HormoneSet {
    /// All ten concentrations at zero.
    pub const ZERO: HormoneSet = HormoneSet {
        dopamine: 0.0,
        serotonin: 0.0,
        cortisol: 0.0,
        adrenaline: 0.0,
        oxytocin: 0.0,
        melatonin: 0.0,
        noradrenaline: 0.0,
        endorphin: 0.0,
        acetylcholine: 0.0,
        testosterone: 0.0,
    };

    fn for_each_mut(&mut self, mut f: impl FnMut(&mut f32)) {
        f(&mut self.dopamine);
        f(&mut self.serotonin);
        f(&mut self.cortisol);
        f(&mut self.adrenaline);
        f(&mut self.oxytocin);
        f(&mut self.melatonin);
        f(&mut self.noradrenaline);
        f(&mut self.endorphin);
        f(&mut self.acetylcholine);
        f(&mut self.testosterone);
    }

    /// Move every component toward `target` by `speed * dt` of the gap.
    fn lerp_toward(&mut self, target: &HormoneSet, speed: f32, dt: f32) {
        let step = |cur: f32, tgt: f32| cur + (tgt - cur) * speed * dt;
        self.dopamine = step(self.dopamine, target.dopamine);
        self.serotonin = step(self.serotonin, target.serotonin);
        self.cortisol = step(self.cortisol, target.cortisol);
        self.adrenaline = step(self.adrenaline, target.adrenaline);
        self.oxytocin = step(self.oxytocin, target.oxytocin);
        self.melatonin = step(self.melatonin, target.melatonin);
        self.noradrenaline = step(self.noradrenaline, target.noradrenaline);
        self.endorphin = step(self.endorphin, target.endorphin);
        self.acetylcholine = step(self.acetylcholine, target.acetylcholine);
        self.testosterone = step(self.testosterone, target.testosterone);
    }

    /// Clamp every component into `[LEVEL_MIN, LEVEL_MAX]`.
    fn clamp_levels(&mut self) {
        self.for_each_mut(|x| *x = x.clamp(LEVEL_MIN, LEVEL_MAX));
    }

    /// Component values in reporting order, paired with their names.
    pub fn named_levels(&self) -> [(&'static str, f32); 10] {
        [
            ("dopamine", self.dopamine),
            ("serotonin", self.serotonin),
            ("cortisol", self.cortisol),
            ("adrenaline", self.adrenaline),
            ("oxytocin", self.oxytocin),
            ("melatonin", self.melatonin),
            ("noradrenaline", self.noradrenaline),
            ("endorphin", self.endorphin),
            ("acetylcholine", self.acetylcholine),
            ("testosterone", self.testosterone),
        ]
    }
}

/// Baseline configuration the target keeps returning to.
///
/// The default matches the reference character profile: low boredom-level
/// dopamine, high self-assured serotonin, near-zero social bonding, maximal
/// cognitive tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub baseline: HormoneSet,
    /// Seconds until the first mood event fires.
    pub first_event_delay: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            baseline: HormoneSet {
                dopamine: 0.30,
                serotonin: 0.70,
                cortisol: 0.10,
                adrenaline: 0.20,
                oxytocin: 0.05,
                melatonin: 0.05,
                noradrenaline: 0.40,
                endorphin: 0.10,
                acetylcholine: 0.85,
                testosterone: 0.60,
            },
            first_event_delay: 2.0,
        }
    }
}

/// The hormone dynamical system.
///
/// All state is owned here; consumers read the authoritative concentration
/// vector through [`HormoneSystem::levels`].
#[derive(Debug, Clone, PartialEq)]
pub struct HormoneSystem {
    current: HormoneSet,
    base: HormoneSet,
    target: HormoneSet,
    /// Seconds until the next mood event.
    event_timer: f32,

    drive_dopamine: f32,
    drive_cortisol: f32,
    drive_adrenaline: f32,
}

impl HormoneSystem {
    pub fn new(personality: Personality) -> Self {
        Self {
            current: personality.baseline,
            base: personality.baseline,
            target: personality.baseline,
            event_timer: personality.first_event_delay,
            drive_dopamine: 0.0,
            drive_cortisol: 0.0,
            drive_adrenaline: 0.0,
        }
    }

    /// The current concentration vector.
    pub fn levels(&self) -> &HormoneSet {
        &self.current
    }

    /// The drift target currently in effect (before drives are added).
    pub fn target(&self) -> &HormoneSet {
        &self.target
    }

    pub fn set_dopamine_drive(&mut self, v: f32) {
        self.drive_dopamine = v.clamp(0.0, DRIVE_MAX);
    }

    pub fn set_cortisol_drive(&mut self, v: f32) {
        self.drive_cortisol = v.clamp(0.0, DRIVE_MAX);
    }

    pub fn set_adrenaline_drive(&mut self, v: f32) {
        self.drive_adrenaline = v.clamp(0.0, DRIVE_MAX);
    }

    pub fn dopamine_drive(&self) -> f32 {
        self.drive_dopamine
    }

    pub fn cortisol_drive(&self) -> f32 {
        self.drive_cortisol
    }

    pub fn adrenaline_drive(&self) -> f32 {
        self.drive_adrenaline
    }

    /// Advance the system by one tick of `dt` seconds.
    ///
    /// Order per tick: mood-event scheduling, drive application onto the
    /// target, cortisol-serotonin antagonism, relaxation, clamp. The
    /// integrator is total; there is no failure mode.
    pub fn update(&mut self, dt: f32, rng: &mut ChaCha12Rng) {
        self.event_timer -= dt;
        if self.event_timer <= 0.0 {
            self.event_timer = rng.gen_range(2.0..7.0);
            self.roll_mood_event(rng);
        }

        // Drives add on top of the target so they boost without erasing
        // the personality drift.
        let mut effective = self.target;
        if self.drive_dopamine > DRIVE_EPSILON {
            effective.dopamine += self.drive_dopamine;
        }
        if self.drive_adrenaline > DRIVE_EPSILON {
            effective.adrenaline += self.drive_adrenaline;
        }
        if self.drive_cortisol > DRIVE_EPSILON {
            effective.cortisol += self.drive_cortisol;
        }

        // Stress suppresses mood: the one cross-coupling downstream
        // behavior depends on.
        if effective.cortisol > 0.5 {
            effective.serotonin *= 0.5;
        }

        self.current.lerp_toward(&effective, RELAX_SPEED, dt);
        self.current.clamp_levels();
    }

    /// Resolve an expired event timer into a new drift target.
    fn roll_mood_event(&mut self, rng: &mut ChaCha12Rng) {
        let dice: f32 = rng.gen_range(0.0..1.0);

        if dice < 0.4 {
            // Settle back to the personality baseline.
            self.target = self.base;
            trace!("mood event: reset to baseline");
        } else if dice < 0.7 {
            // Day-to-day variation around the baseline.
            self.target.dopamine = self.base.dopamine + rng.gen_range(-0.1..0.2);
            self.target.serotonin = self.base.serotonin + rng.gen_range(-0.1..0.1);
            self.target.adrenaline = self.base.adrenaline + rng.gen_range(-0.05..0.2);
            self.target.acetylcholine = self.base.acetylcholine + rng.gen_range(-0.1..0.1);
            trace!("mood event: baseline perturbation");
        } else {
            let mood = MoodEvent::from_index(rng.gen_range(0..MoodEvent::COUNT));
            mood.overwrite_target(&mut self.target);
            trace!(?mood, "mood event: micro-mood");
        }
    }
}
