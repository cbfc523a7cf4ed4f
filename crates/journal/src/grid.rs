//! ASCII spike-grid rendering for the stats journal.

/// Render the population's spike flags as a square glyph grid.
///
/// `▲` input spike, `■` output spike, `×` hidden spike, `·` silent; a
/// vertical bar marks the input/hidden and hidden/output boundaries.
pub fn render_spike_grid(spikes: &[u8], timestep: u64, n_inputs: usize, n_outputs: usize) -> String {
    let total = spikes.len();
    let side = (total as f64).sqrt().ceil() as usize;
    let input_end = n_inputs.min(total);
    let output_start = total.saturating_sub(n_outputs);

    let mut out = format!("Timestep {timestep}  (N={total}, Grid={side}×{side})\n");
    for row in 0..side {
        let mut line = String::new();
        for col in 0..side {
            let i = row * side + col;
            if i >= total {
                break;
            }

            if i == input_end || i == output_start {
                line.push_str(" | ");
            }

            let fired = spikes[i] != 0;
            line.push(if i < input_end {
                if fired {
                    '▲'
                } else {
                    '·'
                }
            } else if i >= output_start {
                if fired {
                    '■'
                } else {
                    '·'
                }
            } else if fired {
                '×'
            } else {
                '·'
            });

            if col < side - 1 {
                line.push_str("  ");
            }
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}
