//! Deterministic text → input-pattern generation.

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Turn a piece of text into a 0/1 stimulus over the input neurons.
///
/// The RNG is seeded from the text itself, so the same utterance always
/// lights the same neurons; longer text fires more densely, bounded to
/// keep the stimulus sparse.
pub fn text_to_pattern(text: &str, n_inputs: usize) -> Vec<u8> {
    let mut rng = ChaCha12Rng::from_seed(*blake3::hash(text.as_bytes()).as_bytes());
    let density = (0.10 + 0.15 * (text.len() as f32 / 100.0)).clamp(0.05, 0.35);
    (0..n_inputs)
        .map(|_| u8::from(rng.gen::<f32>() < density))
        .collect()
}
