//! Fixed-timestep scheduling over the brain.
//!
//! Non-realtime mode runs ticks back-to-back. Realtime mode accumulates
//! wall-clock deltas and burns whole `dt` quanta, capped per frame so a
//! stalled process cannot death-spiral trying to catch up. Wall-clock
//! time paces the loop but never enters simulation state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use synaptica_journal::{CommandReader, JournalWriter};

use crate::brain::{Brain, CommandEffect};

/// Catch-up bound per realtime frame.
pub const MAX_STEPS_PER_FRAME: u32 = 2000;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Tick budget; `None` runs until stopped.
    pub steps: Option<u64>,
    pub realtime: bool,
    /// Simulation-time logging cadence in milliseconds (min 1).
    pub print_every_ms: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            steps: Some(2000),
            realtime: false,
            print_every_ms: 100,
        }
    }
}

/// Drive the brain until the budget runs out or `running` goes false.
/// Returns the number of ticks executed.
pub fn run(
    brain: &mut Brain,
    journal: &JournalWriter,
    commands: &mut CommandReader,
    opts: &RunOptions,
    running: &AtomicBool,
) -> u64 {
    let dt = brain.neurons.dt;
    let sim_dt = Duration::from_secs_f64(f64::from(dt));
    let print_every_steps =
        ((opts.print_every_ms.max(1) as f64 / 1000.0) / f64::from(dt)).round().max(1.0) as u64;

    let mut executed = 0u64;
    let budget_left = |executed: u64| opts.steps.map_or(true, |budget| executed < budget);

    let mut last = Instant::now();
    let mut acc = Duration::ZERO;

    info!(
        realtime = opts.realtime,
        print_every_steps, "scheduler started"
    );

    while running.load(Ordering::SeqCst) && budget_left(executed) {
        if opts.realtime {
            let now = Instant::now();
            acc += now - last;
            last = now;

            let mut frame_steps = 0u32;
            while acc >= sim_dt
                && frame_steps < MAX_STEPS_PER_FRAME
                && running.load(Ordering::SeqCst)
                && budget_left(executed)
            {
                tick_once(brain, journal, commands, print_every_steps, running);
                executed += 1;
                acc -= sim_dt;
                frame_steps += 1;
            }

            // Accumulator drained; yield until the next quantum is due.
            if acc < sim_dt {
                std::thread::sleep(sim_dt - acc);
            }
        } else {
            tick_once(brain, journal, commands, print_every_steps, running);
            executed += 1;
        }
    }

    debug!(executed, "scheduler stopped");
    executed
}

/// One tick: drain commands, step, log on cadence.
fn tick_once(
    brain: &mut Brain,
    journal: &JournalWriter,
    commands: &mut CommandReader,
    print_every_steps: u64,
    running: &AtomicBool,
) {
    for result in commands.poll() {
        match result {
            Ok(cmd) => match brain.apply_command(&cmd) {
                CommandEffect::HormoneDrivesUpdated => {
                    journal.log_status("Hormone drives updated via command");
                    let levels = brain.hormones.levels();
                    journal.log_hormone("dopamine", levels.dopamine);
                    journal.log_hormone("cortisol", levels.cortisol);
                    journal.log_hormone("adrenaline", levels.adrenaline);
                }
                CommandEffect::PatternArmed => {
                    journal.log_status("External input pattern applied");
                }
                CommandEffect::ExitRequested => {
                    journal.log_status("Exit command received");
                    running.store(false, Ordering::SeqCst);
                }
            },
            Err(e) => {
                journal.log_error(&format!("Command parse error: {e}"));
            }
        }
    }

    let t = brain.tick;
    brain.step();

    if t % print_every_steps == 0 {
        journal.log_spike_matrix(&brain.neurons.spk, t);
        journal.log_spike(brain.hormones.levels(), t, brain.neurons.spike_count());
    }
}
