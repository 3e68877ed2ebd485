/*
 * Created on Wed Sep 09 2026
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
    crate::Bulk,
    rayon::slice::ParallelSliceMut,
    serde::Serialize,
};

const NANOS_PER_SECOND: f64 = 1_000_000_000_f64;

fn per_second(calls: u64, busy_nanos: u64) -> f64 {
    if busy_nanos == 0 {
        0.0
    } else {
        calls as f64 / (busy_nanos as f64 / NANOS_PER_SECOND)
    }
}

/// Nearest-rank percentile over an ascending slice
fn percentile(sorted: &[u64], pct: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Statistics for a single worker
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStats {
    pub worker: usize,
    pub calls: u64,
    /// sum of all timed sections
    pub busy_nanos: u64,
    pub min_nanos: u64,
    pub max_nanos: u64,
    pub avg_nanos: f64,
    #[serde(skip)]
    samples: Vec<u64>,
}

impl WorkerStats {
    /// Build the stats of `worker` from its per-call latency samples (in nanoseconds)
    pub fn from_samples(worker: usize, samples: Vec<u64>) -> Self {
        let calls = samples.len() as u64;
        let busy_nanos = samples.iter().fold(0u64, |acc, s| acc.saturating_add(*s));
        let min_nanos = samples.iter().copied().min().unwrap_or(0);
        let max_nanos = samples.iter().copied().max().unwrap_or(0);
        let avg_nanos = if calls == 0 {
            0.0
        } else {
            busy_nanos as f64 / calls as f64
        };
        Self {
            worker,
            calls,
            busy_nanos,
            min_nanos,
            max_nanos,
            avg_nanos,
            samples,
        }
    }
    /// Returns the number of calls per second this worker achieved while busy
    pub fn calls_per_sec(&self) -> f64 {
        per_second(self.calls, self.busy_nanos)
    }
}

/// Aggregated statistics for a single executor run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    pub workers: usize,
    pub calls: u64,
    /// sum of every timed call
    pub total_nanos: u64,
    pub avg_nanos: f64,
    pub std_nanos: f64,
    pub min_nanos: u64,
    pub max_nanos: u64,
    pub p50_nanos: u64,
    pub p90_nanos: u64,
    pub p99_nanos: u64,
    /// sum of every worker's calls per busy second
    pub calls_per_sec: f64,
    /// `calls_per_sec` scaled by the number of rows in a bulk
    pub rows_per_sec: f64,
}

impl RunStats {
    /// Fold the stats of every worker into a single report
    pub fn aggregate(workers: &[WorkerStats], bulk: Bulk) -> Self {
        let mut merged: Vec<u64> = workers
            .iter()
            .flat_map(|w| w.samples.iter().copied())
            .collect();
        merged.par_sort_unstable();
        let calls = merged.len() as u64;
        let total_nanos = merged.iter().fold(0u64, |acc, s| acc.saturating_add(*s));
        let (avg_nanos, std_nanos) = if merged.is_empty() {
            (0.0, 0.0)
        } else {
            let n = merged.len() as f64;
            let avg = merged.iter().map(|s| *s as f64).sum::<f64>() / n;
            let var = merged
                .iter()
                .map(|s| {
                    let d = *s as f64 - avg;
                    d * d
                })
                .sum::<f64>()
                / n;
            (avg, var.sqrt())
        };
        let calls_per_sec: f64 = workers.iter().map(WorkerStats::calls_per_sec).sum();
        Self {
            workers: workers.len(),
            calls,
            total_nanos,
            avg_nanos,
            std_nanos,
            min_nanos: merged.first().copied().unwrap_or(0),
            max_nanos: merged.last().copied().unwrap_or(0),
            p50_nanos: percentile(&merged, 50.0),
            p90_nanos: percentile(&merged, 90.0),
            p99_nanos: percentile(&merged, 99.0),
            calls_per_sec,
            rows_per_sec: calls_per_sec * bulk.rows as f64,
        }
    }
}
