//! Dispatcher provider: the facade the driver allocates through.

use fleet_core::DispatcherRecord;

use crate::error::PlacementResult;
use crate::strategy::{ProvidingStrategy, StrategyKind, StrategyState};

/// Holds exactly one providing strategy and delegates to it.
pub struct DispatcherProvider {
    strategy: Box<dyn ProvidingStrategy>,
}

impl DispatcherProvider {
    /// Provider backed by the block strategy.
    pub fn new(dispatchers: Vec<DispatcherRecord>, num_jobs: usize) -> PlacementResult<Self> {
        Self::with_kind(StrategyKind::default(), dispatchers, num_jobs)
    }

    pub fn with_kind(
        kind: StrategyKind,
        dispatchers: Vec<DispatcherRecord>,
        num_jobs: usize,
    ) -> PlacementResult<Self> {
        Ok(Self::with_strategy(kind.build(dispatchers, num_jobs)?))
    }

    /// Use a caller-supplied strategy.
    pub fn with_strategy(strategy: Box<dyn ProvidingStrategy>) -> Self {
        Self { strategy }
    }

    pub fn provide(&mut self) -> PlacementResult<&DispatcherRecord> {
        self.strategy.provide()
    }

    pub fn report(&self) {
        self.strategy.report()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn state(&self) -> StrategyState {
        self.strategy.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlacementError;

    fn dispatchers(n: usize) -> Vec<DispatcherRecord> {
        (0..n)
            .map(|i| DispatcherRecord::new(format!("d{i}"), "rA", "rB"))
            .collect()
    }

    /// Always hands out the last dispatcher.
    struct LastOnly {
        dispatchers: Vec<DispatcherRecord>,
        remaining: usize,
    }

    impl ProvidingStrategy for LastOnly {
        fn name(&self) -> &'static str {
            "last-only"
        }

        fn provide(&mut self) -> PlacementResult<&DispatcherRecord> {
            if self.remaining == 0 {
                return Err(PlacementError::ExhaustedAllocation { num_jobs: 0 });
            }
            self.remaining -= 1;
            self.dispatchers
                .last()
                .ok_or(PlacementError::NoDispatchers { num_jobs: 1 })
        }

        fn report(&self) {}

        fn state(&self) -> StrategyState {
            StrategyState::Fresh
        }
    }

    #[test]
    fn defaults_to_block_strategy() {
        let mut p = DispatcherProvider::new(dispatchers(2), 3).unwrap();
        assert_eq!(p.strategy_name(), "block");
        assert_eq!(p.provide().unwrap().service_name, "d0");
        assert_eq!(p.provide().unwrap().service_name, "d0");
        assert_eq!(p.provide().unwrap().service_name, "d1");
        assert_eq!(p.state(), StrategyState::Exhausted);
        assert!(p.provide().is_err());
    }

    #[test]
    fn selects_round_robin_by_kind() {
        let mut p = DispatcherProvider::with_kind(StrategyKind::RoundRobin, dispatchers(2), 3).unwrap();
        assert_eq!(p.strategy_name(), "round-robin");
        assert_eq!(p.provide().unwrap().service_name, "d0");
        assert_eq!(p.provide().unwrap().service_name, "d1");
        assert_eq!(p.provide().unwrap().service_name, "d0");
    }

    #[test]
    fn accepts_custom_strategy() {
        let mut p = DispatcherProvider::with_strategy(Box::new(LastOnly {
            dispatchers: dispatchers(3),
            remaining: 2,
        }));
        assert_eq!(p.strategy_name(), "last-only");
        assert_eq!(p.provide().unwrap().service_name, "d2");
        assert_eq!(p.provide().unwrap().service_name, "d2");
        assert!(p.provide().is_err());
    }

    #[test]
    fn rejects_empty_dispatcher_list() {
        assert!(matches!(
            DispatcherProvider::new(vec![], 2),
            Err(PlacementError::NoDispatchers { num_jobs: 2 })
        ));
    }
}
