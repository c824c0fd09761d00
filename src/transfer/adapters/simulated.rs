//! Random settlement outcome, standing in for a real bank call

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::traits::{SettlementBackend, SettlementResult};
use crate::formatter::mask_account;
use crate::transfer::types::TransferRequest;

pub const DEFAULT_SUCCESS_RATE: f64 = 0.8;
pub const DECLINED_MESSAGE: &str = "Transaksi gagal diproses. Silakan coba lagi.";

pub struct SimulatedSettlement<R: Rng = StdRng> {
    success_rate: f64,
    rng: R,
}

impl SimulatedSettlement<StdRng> {
    pub fn new(success_rate: f64) -> Self {
        Self::with_rng(success_rate, StdRng::from_entropy())
    }

    /// Reproducible sequence for tests and demos
    pub fn seeded(success_rate: f64, seed: u64) -> Self {
        Self::with_rng(success_rate, StdRng::seed_from_u64(seed))
    }
}

impl Default for SimulatedSettlement<StdRng> {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_RATE)
    }
}

impl<R: Rng> SimulatedSettlement<R> {
    pub fn with_rng(success_rate: f64, rng: R) -> Self {
        // gen_bool panics outside [0, 1]
        let success_rate = if success_rate.is_nan() { 0.0 } else { success_rate.clamp(0.0, 1.0) };
        Self { success_rate, rng }
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl<R: Rng> SettlementBackend for SimulatedSettlement<R> {
    fn settle(&mut self, request: &TransferRequest) -> SettlementResult {
        let ok = self.rng.gen_bool(self.success_rate);
        log::debug!(
            "[simulated] settle(account={}, amount={}) -> {}",
            mask_account(&request.target_account),
            request.amount,
            if ok { "settled" } else { "declined" }
        );
        if ok {
            SettlementResult::Settled
        } else {
            SettlementResult::Declined(DECLINED_MESSAGE.to_string())
        }
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TransferRequest {
        TransferRequest::new("1234567890", 50_000, None)
    }

    #[test]
    fn test_rate_one_always_settles() {
        let mut backend = SimulatedSettlement::seeded(1.0, 7);
        for _ in 0..200 {
            assert_eq!(backend.settle(&request()), SettlementResult::Settled);
        }
    }

    #[test]
    fn test_rate_zero_always_declines() {
        let mut backend = SimulatedSettlement::seeded(0.0, 7);
        for _ in 0..200 {
            assert!(matches!(backend.settle(&request()), SettlementResult::Declined(_)));
        }
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(SimulatedSettlement::seeded(1.5, 1).success_rate(), 1.0);
        assert_eq!(SimulatedSettlement::seeded(-0.5, 1).success_rate(), 0.0);
        assert_eq!(SimulatedSettlement::seeded(f64::NAN, 1).success_rate(), 0.0);
        assert_eq!(SimulatedSettlement::<StdRng>::default().success_rate(), DEFAULT_SUCCESS_RATE);
    }

    #[test]
    fn test_default_rate_mostly_settles() {
        let mut backend = SimulatedSettlement::seeded(DEFAULT_SUCCESS_RATE, 42);
        let settled = (0..1000)
            .filter(|_| backend.settle(&request()) == SettlementResult::Settled)
            .count();
        assert!((700..=900).contains(&settled), "settled {}", settled);
    }
}
