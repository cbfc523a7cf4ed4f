//! Prompt construction and reply classification.
//!
//! The coach never talks to the language model itself; it renders the
//! hormonal state into a system prompt for whoever does, then grades the
//! reply text into a reward/punish/neutral verdict with an intensity.

use synaptica_hormones::HormoneSet;

/// Verdict over one model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub feedback: Feedback,
    /// Strength of the verdict in `[0, 1]`.
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Reward,
    Punish,
    None,
}

/// Render the current hormone snapshot into a system prompt.
///
/// The wording steers the model to express the state through tone rather
/// than by reciting numbers.
pub fn build_prompt(h: &HormoneSet) -> String {
    let mut p = String::new();
    p.push_str(
        "You are a character whose mood and wording are driven entirely by \
         ten biochemical levels. Do not mention the numbers; let them shape \
         your tone, pace, and patience.\n\n",
    );
    p.push_str("Current levels (0.01 = depleted, 0.99 = saturated):\n");
    for (name, level) in h.named_levels() {
        p.push_str(&format!("- {name}: {level:.2}\n"));
    }
    p.push_str(
        "\nGuidance: high serotonin with low oxytocin reads as aloof \
         confidence; high cortisol with low endorphin reads as irritation; \
         high acetylcholine with high noradrenaline reads as clipped \
         precision; high melatonin drifts and rambles. When levels \
         conflict, the one farthest from 0.5 wins. Answer in character.\n",
    );
    p
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "thanks", "thank", "love", "like", "nice", "happy", "glad", "wonderful",
    "awesome", "cool", "fun", "yay", "ok", "okay", "sure", "excellent",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "sad", "hate", "angry", "fear", "afraid", "fail", "error", "tired", "stress", "worry",
    "annoy", "broken", "terrible", "awful", "boring", "useless", "waste",
];

/// Grade a reply into a verdict.
///
/// Word-list hits push an emotional score up or down, exclamations
/// amplify, a pile of questions reads as confusion. The score is clamped
/// to `[-3, 3]`; its sign picks the feedback, its magnitude (plus reply
/// volume) sets the intensity.
pub fn classify_reply(raw: &str) -> Option<Verdict> {
    if raw.is_empty() {
        return None;
    }
    let text = raw.to_lowercase();

    let mut score: i32 = 0;
    for word in POSITIVE_WORDS {
        if text.contains(word) {
            score += 1;
        }
    }
    for word in NEGATIVE_WORDS {
        if text.contains(word) {
            score -= 1;
        }
    }

    let exclaims = text.matches('!').count() as i32;
    let questions = text.matches('?').count() as i32;
    score += exclaims;
    if questions > 2 {
        score -= 1;
    }
    score = score.clamp(-3, 3);

    let feedback = match score.signum() {
        1 => Feedback::Reward,
        -1 => Feedback::Punish,
        _ => Feedback::None,
    };

    let base = (score.unsigned_abs() as f32 / 3.0).clamp(0.0, 1.0);
    let size_factor = (raw.len() as f32 / 100.0).clamp(0.0, 1.0);
    let exclaim_bonus = if exclaims > 0 { 1.0 } else { 0.0 };
    let intensity = (0.4 * base + 0.3 * size_factor + 0.3 * exclaim_bonus).clamp(0.0, 1.0);

    Some(Verdict {
        feedback,
        intensity,
    })
}
