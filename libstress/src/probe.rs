/*
 * Created on Tue Sep 08 2026
 *
 * This file is a part of cql-bench
 * cql-bench is a free and open-source, configuration-driven load generator
 * for CQL (Cassandra-compatible) database clusters such as ScyllaDB,
 * Apache Cassandra, AstraDB and CosmosDB.
 *
 * Copyright (c) 2026, the cql-bench developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

use {
    crate::stats::WorkerStats,
    std::time::{Duration, Instant},
};

/// A timing probe owned by a single worker
///
/// Only the section between [`Probe::start`] and [`Probe::stop`] is measured, which lets a
/// workload keep data generation out of the recorded latencies.
#[derive(Debug)]
pub struct Probe {
    deadline: Instant,
    current: Option<Instant>,
    samples: Vec<u64>,
}

impl Probe {
    const DEFAULT_CAPACITY: usize = 1024;
    /// Used when `duration` does not fit into an [`Instant`]. About a century
    const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);
    /// Create a new probe that expires `duration` from now
    pub fn new(duration: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(duration)
            .or_else(|| now.checked_add(Self::FAR_FUTURE))
            .unwrap_or(now);
        Self {
            deadline,
            current: None,
            samples: Vec::with_capacity(Self::DEFAULT_CAPACITY),
        }
    }
    /// Mark the beginning of a timed section
    pub fn start(&mut self) {
        self.current = Some(Instant::now());
    }
    /// Mark the end of a timed section. Returns true if the probe has expired and the worker
    /// should stop
    pub fn stop(&mut self) -> bool {
        let now = Instant::now();
        if let Some(start) = self.current.take() {
            let elapsed = now.duration_since(start).as_nanos();
            self.samples.push(u64::try_from(elapsed).unwrap_or(u64::MAX));
        }
        now >= self.deadline
    }
    /// Returns the number of recorded calls
    pub fn calls(&self) -> usize {
        self.samples.len()
    }
    pub(crate) fn into_stats(self, worker: usize) -> WorkerStats {
        WorkerStats::from_samples(worker, self.samples)
    }
}

#[test]
fn probe_records_only_closed_sections() {
    let mut probe = Probe::new(Duration::from_secs(60));
    probe.start();
    assert!(!probe.stop());
    // unmatched stop
    assert!(!probe.stop());
    assert_eq!(probe.calls(), 1);
}

#[test]
fn probe_expires() {
    let mut probe = Probe::new(Duration::ZERO);
    probe.start();
    assert!(probe.stop());
    assert_eq!(probe.into_stats(0).calls, 1);
}

#[test]
fn probe_saturates_huge_durations() {
    let mut probe = Probe::new(Duration::from_secs(u64::MAX));
    probe.start();
    assert!(!probe.stop());
}
