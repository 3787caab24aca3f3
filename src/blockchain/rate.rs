//! Stochastic KSC -> EUR exchange-rate oscillator.
//!
//! Every mining cycle the rate moves by a compound percentage: a base
//! perturbation that always applies, three rarer and wider perturbations
//! gated by a probability, and a demand term driven by the pending queue.

use rand::Rng;

/// Lowest rate the oscillator will ever produce.
pub const MIN_RATE: f64 = 0.01;

/// Pending transactions per +1% demand pressure.
pub const DEMAND_DIVISOR: f64 = 100.0;

/// One probability-gated perturbation: uniform in `[-span, +span]`,
/// drawn with chance `probability`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub name: &'static str,
    pub span: f64,
    pub probability: f64,
}

pub const TIERS: [Tier; 4] = [
    Tier { name: "base", span: 0.02, probability: 1.0 },
    Tier { name: "rare", span: 0.06, probability: 0.1 },
    Tier { name: "very_rare", span: 0.10, probability: 0.01 },
    Tier { name: "extremely_rare", span: 0.20, probability: 0.001 },
];

impl Tier {
    /// Draw this tier's contribution (0 when the gate does not fire).
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let enabled = self.probability >= 1.0 || rng.gen_bool(self.probability);
        if enabled {
            rng.gen_range(-self.span..=self.span)
        } else {
            0.0
        }
    }
}

/// Outcome of one adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct RateAdjustment {
    pub old_rate: f64,
    pub new_rate: f64,
    /// Per-tier draws, in `TIERS` order.
    pub draws: [f64; 4],
    pub demand: f64,
    /// Sum of all draws plus demand.
    pub total_delta: f64,
}

impl RateAdjustment {
    /// Pure combination step: `old * (1 + sum(draws) + demand)`, floored.
    pub fn from_draws(old_rate: f64, draws: [f64; 4], pending_len: usize) -> Self {
        let demand = pending_len as f64 / DEMAND_DIVISOR;
        let total_delta = draws.iter().sum::<f64>() + demand;
        let new_rate = (old_rate * (1.0 + total_delta)).max(MIN_RATE);
        Self {
            old_rate,
            new_rate,
            draws,
            demand,
            total_delta,
        }
    }
}

/// Draw every tier from `rng` and combine with the demand signal.
pub fn adjust_rate<R: Rng + ?Sized>(old_rate: f64, pending_len: usize, rng: &mut R) -> RateAdjustment {
    let mut draws = [0.0; 4];
    for (slot, tier) in draws.iter_mut().zip(TIERS.iter()) {
        *slot = tier.draw(rng);
    }
    RateAdjustment::from_draws(old_rate, draws, pending_len)
}
