//! Crossfade blending
//!
//! Pure mapping from the master fader scalar (plus optional per-channel
//! opacity overrides) to per-channel opacity and stacking order. Rendering
//! consumes [`BlendOutput`]; nothing in here touches a display surface, so
//! the math is testable on its own.

use serde::{Deserialize, Serialize};

/// Blend algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Symmetric fader weights composed with per-channel opacity overrides.
    /// The back channel stays solid; the front channel's partial opacity
    /// does the mixing.
    #[default]
    WeightedOpacity,
    /// One side always fully opaque, the other faded toward the edges
    BinaryThreshold,
}

/// Which channel stacks on top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Front {
    /// Deck 0 or 1 renders in front
    Deck(usize),
    /// Balanced weights; deck 0 stacks on top by the `>=` tie-break
    Tie,
}

/// Result of one blend evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendOutput {
    pub front: Front,
    /// Rendered opacity per deck, in [0, 1]
    pub opacity: [f64; 2],
    /// Stacking order per deck (1 = front, 0 = back)
    pub z_index: [u8; 2],
}

/// Compute opacity and stacking for both channels from the fader scalar
///
/// `crossfader` is clamped to [-1, 1] (-1 = deck 0 only, +1 = deck 1 only);
/// `overrides` are the per-channel manual opacity multipliers in [0, 1]
/// (1.0 = no override). Pure and idempotent: identical inputs always yield
/// identical output.
pub fn blend(mode: BlendMode, crossfader: f64, overrides: [f64; 2]) -> BlendOutput {
    let crossfader = crossfader.clamp(-1.0, 1.0);
    let overrides = [overrides[0].clamp(0.0, 1.0), overrides[1].clamp(0.0, 1.0)];

    match mode {
        BlendMode::WeightedOpacity => weighted_opacity(crossfader, overrides),
        BlendMode::BinaryThreshold => binary_threshold(crossfader, overrides),
    }
}

fn weighted_opacity(crossfader: f64, overrides: [f64; 2]) -> BlendOutput {
    let cf_weight = crossfader.abs() / 2.0;
    let weight0 = overrides[0] * (0.5 + if crossfader > 0.0 { 0.0 } else { cf_weight });
    let weight1 = overrides[1] * (0.5 + if crossfader < 0.0 { 0.0 } else { cf_weight });

    let front = if weight0 > weight1 {
        Front::Deck(0)
    } else if weight1 > weight0 {
        Front::Deck(1)
    } else {
        Front::Tie
    };

    // A weight of exactly 0.5 renders fully opaque, otherwise the balanced
    // midpoint would wash both channels out.
    let render = |w: f64| if w == 0.5 { 1.0 } else { w };

    BlendOutput {
        front,
        opacity: [render(weight0), render(weight1)],
        z_index: [(weight0 >= weight1) as u8, (weight1 > weight0) as u8],
    }
}

fn binary_threshold(crossfader: f64, overrides: [f64; 2]) -> BlendOutput {
    let strength = 1.0 - crossfader.abs();

    if crossfader < 0.0 {
        BlendOutput {
            front: Front::Deck(0),
            opacity: [overrides[0], overrides[1] * strength * 0.5],
            z_index: [1, 0],
        }
    } else {
        BlendOutput {
            front: Front::Deck(1),
            opacity: [overrides[0] * strength * 0.5, overrides[1]],
            z_index: [0, 1],
        }
    }
}
