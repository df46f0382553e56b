//! Providing strategies.
//!
//! Every strategy is a precomputed, lazily-evaluated sequence of dispatcher
//! indices capped at the number of planned jobs. Strategies only differ in
//! the shape of that sequence:
//!
//! ```text
//! block        d0 d0 d0 d1 d1 d1 d2      (3 dispatchers, 7 jobs, cap 3)
//! round-robin  d0 d1 d2 d0 d1 d2 d0
//! ```

use std::fmt;
use std::str::FromStr;

use fleet_core::DispatcherRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PlacementError, PlacementResult};

/// A policy mapping the ordinal position of a job to a dispatcher.
pub trait ProvidingStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Return the dispatcher for the next job.
    ///
    /// Fails with [`PlacementError::ExhaustedAllocation`] once every planned
    /// job has been assigned.
    fn provide(&mut self) -> PlacementResult<&DispatcherRecord>;

    /// Log a human-readable summary of the allocation plan.
    fn report(&self);

    fn state(&self) -> StrategyState;
}

/// Observable allocation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyState {
    Fresh,
    /// `k` dispatchers handed out so far.
    Providing(usize),
    Exhausted,
}

/// A finite, on-demand sequence of dispatcher indices.
///
/// The underlying iterator may be longer than `limit` (or infinite); slots
/// beyond `limit` are never handed out.
pub struct SlotSequence {
    slots: Box<dyn Iterator<Item = usize>>,
    limit: usize,
    provided: usize,
}

impl SlotSequence {
    pub fn new(slots: impl Iterator<Item = usize> + 'static, limit: usize) -> Self {
        Self {
            slots: Box::new(slots),
            limit,
            provided: 0,
        }
    }

    /// Take the next slot index.
    pub fn next_slot(&mut self) -> PlacementResult<usize> {
        let exhausted = PlacementError::ExhaustedAllocation { num_jobs: self.limit };
        if self.provided >= self.limit {
            return Err(exhausted);
        }
        let slot = self.slots.next().ok_or(exhausted)?;
        self.provided += 1;
        Ok(slot)
    }

    pub fn provided(&self) -> usize {
        self.provided
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn state(&self) -> StrategyState {
        if self.provided >= self.limit {
            StrategyState::Exhausted
        } else if self.provided == 0 {
            StrategyState::Fresh
        } else {
            StrategyState::Providing(self.provided)
        }
    }
}

fn require_dispatchers(dispatchers: &[DispatcherRecord], num_jobs: usize) -> PlacementResult<()> {
    if dispatchers.is_empty() && num_jobs > 0 {
        return Err(PlacementError::NoDispatchers { num_jobs });
    }
    Ok(())
}

fn report_dispatchers(dispatchers: &[DispatcherRecord]) {
    let listing = dispatchers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    info!("Dispatchers:\n{listing}");
}

/// Fills dispatchers serially, `cap = ⌈num_jobs / num_dispatchers⌉` jobs at
/// a time, so related jobs tend to land on the same dispatcher. The last
/// dispatchers in the list may receive fewer than `cap` jobs, or none.
pub struct BlockStrategy {
    dispatchers: Vec<DispatcherRecord>,
    avg_jobs_per_dispatcher: f64,
    max_jobs_per_dispatcher: usize,
    slots: SlotSequence,
}

impl BlockStrategy {
    pub fn new(dispatchers: Vec<DispatcherRecord>, num_jobs: usize) -> PlacementResult<Self> {
        require_dispatchers(&dispatchers, num_jobs)?;

        let count = dispatchers.len();
        let (avg, cap) = if count == 0 {
            (0.0, 0)
        } else {
            (num_jobs as f64 / count as f64, num_jobs.div_ceil(count))
        };
        let sequence = (0..count).flat_map(move |idx| std::iter::repeat_n(idx, cap));

        Ok(Self {
            dispatchers,
            avg_jobs_per_dispatcher: avg,
            max_jobs_per_dispatcher: cap,
            slots: SlotSequence::new(sequence, num_jobs),
        })
    }

    pub fn avg_jobs_per_dispatcher(&self) -> f64 {
        self.avg_jobs_per_dispatcher
    }

    pub fn max_jobs_per_dispatcher(&self) -> usize {
        self.max_jobs_per_dispatcher
    }
}

impl ProvidingStrategy for BlockStrategy {
    fn name(&self) -> &'static str {
        "block"
    }

    fn provide(&mut self) -> PlacementResult<&DispatcherRecord> {
        let slot = self.slots.next_slot()?;
        Ok(&self.dispatchers[slot])
    }

    fn report(&self) {
        info!("Providing strategy: {}", self.name());
        info!("Average number of jobs per dispatcher: {}", self.avg_jobs_per_dispatcher);
        info!("Will run at most {} jobs per dispatcher", self.max_jobs_per_dispatcher);
        report_dispatchers(&self.dispatchers);
    }

    fn state(&self) -> StrategyState {
        self.slots.state()
    }
}

/// Deals jobs out one dispatcher at a time, wrapping around the list.
pub struct RoundRobinStrategy {
    dispatchers: Vec<DispatcherRecord>,
    slots: SlotSequence,
}

impl RoundRobinStrategy {
    pub fn new(dispatchers: Vec<DispatcherRecord>, num_jobs: usize) -> PlacementResult<Self> {
        require_dispatchers(&dispatchers, num_jobs)?;
        let sequence = (0..dispatchers.len()).cycle();
        Ok(Self {
            dispatchers,
            slots: SlotSequence::new(sequence, num_jobs),
        })
    }
}

impl ProvidingStrategy for RoundRobinStrategy {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn provide(&mut self) -> PlacementResult<&DispatcherRecord> {
        let slot = self.slots.next_slot()?;
        Ok(&self.dispatchers[slot])
    }

    fn report(&self) {
        info!("Providing strategy: {}", self.name());
        info!(
            "Will cycle {} jobs over {} dispatchers",
            self.slots.limit(),
            self.dispatchers.len()
        );
        report_dispatchers(&self.dispatchers);
    }

    fn state(&self) -> StrategyState {
        self.slots.state()
    }
}

/// Selectable strategy variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    Block,
    RoundRobin,
}

impl StrategyKind {
    pub fn build(
        self,
        dispatchers: Vec<DispatcherRecord>,
        num_jobs: usize,
    ) -> PlacementResult<Box<dyn ProvidingStrategy>> {
        Ok(match self {
            StrategyKind::Block => Box::new(BlockStrategy::new(dispatchers, num_jobs)?),
            StrategyKind::RoundRobin => Box::new(RoundRobinStrategy::new(dispatchers, num_jobs)?),
        })
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::Block => "block",
            StrategyKind::RoundRobin => "round-robin",
        })
    }
}

impl FromStr for StrategyKind {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(StrategyKind::Block),
            "round-robin" => Ok(StrategyKind::RoundRobin),
            other => Err(PlacementError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatchers(n: usize) -> Vec<DispatcherRecord> {
        (0..n)
            .map(|i| DispatcherRecord::new(format!("d{i}"), "driver", "executor"))
            .collect()
    }

    fn drain(strategy: &mut dyn ProvidingStrategy, n: usize) -> Vec<String> {
        (0..n)
            .map(|_| strategy.provide().unwrap().service_name.clone())
            .collect()
    }

    #[test]
    fn block_three_dispatchers_seven_jobs() {
        let mut s = BlockStrategy::new(dispatchers(3), 7).unwrap();
        assert_eq!(s.max_jobs_per_dispatcher(), 3);
        assert_eq!(
            drain(&mut s, 7),
            vec!["d0", "d0", "d0", "d1", "d1", "d1", "d2"]
        );
    }

    #[test]
    fn block_exhaustion_after_num_jobs() {
        let mut s = BlockStrategy::new(dispatchers(3), 7).unwrap();
        drain(&mut s, 7);
        assert_eq!(s.state(), StrategyState::Exhausted);
        assert!(matches!(
            s.provide(),
            Err(PlacementError::ExhaustedAllocation { num_jobs: 7 })
        ));
    }

    #[test]
    fn block_state_transitions() {
        let mut s = BlockStrategy::new(dispatchers(2), 3).unwrap();
        assert_eq!(s.state(), StrategyState::Fresh);
        s.provide().unwrap();
        assert_eq!(s.state(), StrategyState::Providing(1));
        s.provide().unwrap();
        assert_eq!(s.state(), StrategyState::Providing(2));
        s.provide().unwrap();
        assert_eq!(s.state(), StrategyState::Exhausted);
    }

    #[test]
    fn block_fewer_jobs_than_dispatchers() {
        let mut s = BlockStrategy::new(dispatchers(5), 2).unwrap();
        assert_eq!(s.max_jobs_per_dispatcher(), 1);
        assert_eq!(drain(&mut s, 2), vec!["d0", "d1"]);
        assert!(s.provide().is_err());
    }

    #[test]
    fn block_fills_in_input_order_and_respects_cap() {
        for d in 1..=6 {
            for j in 0..=25 {
                let mut s = BlockStrategy::new(dispatchers(d), j).unwrap();
                let cap = s.max_jobs_per_dispatcher();
                let assigned = drain(&mut s, j);

                let mut counts = vec![0usize; d];
                let mut last_idx = 0;
                for name in &assigned {
                    let idx: usize = name[1..].parse().unwrap();
                    assert!(idx >= last_idx, "d={d} j={j}: not filled in order");
                    last_idx = idx;
                    counts[idx] += 1;
                }

                assert_eq!(counts.iter().sum::<usize>(), j);
                assert!(counts.iter().all(|&c| c <= cap), "d={d} j={j}: {counts:?}");
                // Every dispatcher before the last used one is filled to cap.
                let used = counts.iter().rposition(|&c| c > 0).map_or(0, |p| p + 1);
                assert!(counts[..used.saturating_sub(1)].iter().all(|&c| c == cap));
                assert!(s.provide().is_err());
            }
        }
    }

    #[test]
    fn block_even_split_has_no_spread() {
        let mut s = BlockStrategy::new(dispatchers(4), 8).unwrap();
        assert_eq!(s.avg_jobs_per_dispatcher(), 2.0);
        assert_eq!(
            drain(&mut s, 8),
            vec!["d0", "d0", "d1", "d1", "d2", "d2", "d3", "d3"]
        );
    }

    #[test]
    fn empty_dispatchers_rejected_when_jobs_planned() {
        assert!(matches!(
            BlockStrategy::new(vec![], 3),
            Err(PlacementError::NoDispatchers { num_jobs: 3 })
        ));
        assert!(matches!(
            RoundRobinStrategy::new(vec![], 1),
            Err(PlacementError::NoDispatchers { num_jobs: 1 })
        ));
    }

    #[test]
    fn empty_dispatchers_allowed_with_zero_jobs() {
        let mut s = BlockStrategy::new(vec![], 0).unwrap();
        assert_eq!(s.max_jobs_per_dispatcher(), 0);
        assert!(matches!(
            s.provide(),
            Err(PlacementError::ExhaustedAllocation { num_jobs: 0 })
        ));
    }

    #[test]
    fn round_robin_cycles_through_dispatchers() {
        let mut s = RoundRobinStrategy::new(dispatchers(3), 7).unwrap();
        assert_eq!(
            drain(&mut s, 7),
            vec!["d0", "d1", "d2", "d0", "d1", "d2", "d0"]
        );
        assert!(matches!(
            s.provide(),
            Err(PlacementError::ExhaustedAllocation { .. })
        ));
    }

    #[test]
    fn slot_sequence_caps_infinite_iterator() {
        let mut seq = SlotSequence::new(std::iter::repeat(0), 2);
        assert_eq!(seq.next_slot().unwrap(), 0);
        assert_eq!(seq.next_slot().unwrap(), 0);
        assert!(seq.next_slot().is_err());
        assert_eq!(seq.provided(), 2);
    }

    #[test]
    fn slot_sequence_short_iterator_is_exhausted() {
        let mut seq = SlotSequence::new(0..1, 5);
        assert!(seq.next_slot().is_ok());
        assert!(matches!(
            seq.next_slot(),
            Err(PlacementError::ExhaustedAllocation { num_jobs: 5 })
        ));
    }

    #[test]
    fn strategy_kind_parses_and_displays() {
        assert_eq!("block".parse::<StrategyKind>().unwrap(), StrategyKind::Block);
        assert_eq!(
            "round-robin".parse::<StrategyKind>().unwrap(),
            StrategyKind::RoundRobin
        );
        assert!("weighted".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::RoundRobin.to_string(), "round-robin");
        assert_eq!(StrategyKind::default(), StrategyKind::Block);
    }

    #[test]
    fn strategy_kind_serde_is_kebab_case() {
        let json = serde_json::to_string(&StrategyKind::RoundRobin).unwrap();
        assert_eq!(json, "\"round-robin\"");
    }
}
