/*
 * Created on Mon Sep 07 2026
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

//! # libstress
//!
//! A duration-bounded parallel executor used to drive load against a database. An executor run
//! takes a matrix of [`Bulk`] shapes and [`ExecutorSpec`]s and, for every combination, spins up
//! `processes` worker runtimes with `threads` workers each. All workers are initialized first,
//! then released together through a shared start gate, after which each of them loops over its
//! [`Workload`] until the configured duration elapses. Every call is timed with a [`Probe`] and
//! the samples are folded into [`RunStats`] once the run completes.

#![deny(unused_crate_dependencies)]
#![deny(unused_imports)]

#[macro_use]
extern crate log;

mod executor;
mod probe;
mod stats;

pub use {
    executor::{ExecutorError, ExecutorResult, ParallelExecutor, RunReport},
    probe::Probe,
    stats::{RunStats, WorkerStats},
};

use {
    serde::Serialize,
    std::{fmt, future::Future, time::Duration},
};

/// The shape of one batch of synthetic data: `rows` rows having `columns` columns each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bulk {
    pub rows: usize,
    pub columns: usize,
}

impl Bulk {
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }
}

impl fmt::Display for Bulk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// One executor configuration: `processes` worker runtimes (each on its own OS thread), each
/// driving `threads` concurrent workers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutorSpec {
    pub threads: usize,
    pub processes: usize,
    pub label: String,
}

impl ExecutorSpec {
    pub fn new(threads: usize, processes: usize, label: impl Into<String>) -> Self {
        Self {
            threads,
            processes,
            label: label.into(),
        }
    }
    /// Returns the total number of workers for this executor
    pub fn workers(&self) -> usize {
        self.threads * self.processes
    }
}

impl fmt::Display for ExecutorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.threads, self.processes)?;
        if !self.label.is_empty() {
            write!(f, " ({})", self.label)?;
        }
        Ok(())
    }
}

/// Timing setup shared by every run of an executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSetup {
    /// how long each worker keeps calling its workload
    pub duration: Duration,
    /// how long each worker waits after the start gate opens
    pub start_delay: Duration,
}

impl RunSetup {
    pub const fn new(duration: Duration, start_delay: Duration) -> Self {
        Self {
            duration,
            start_delay,
        }
    }
    pub const fn from_secs(duration: u64, start_delay: u64) -> Self {
        Self::new(
            Duration::from_secs(duration),
            Duration::from_secs(start_delay),
        )
    }
}

/// A workload driven by the [`ParallelExecutor`]
///
/// The executor calls [`Workload::prepare`] once per bulk (or once per executor run, see
/// [`ParallelExecutor::new`]), then [`Workload::worker_init`] once in every worker. Each worker
/// then repeatedly generates a task (untimed) and drives it (timed) until the run duration
/// elapses. Workers run on a single-threaded runtime, so none of the futures need to be `Send`.
pub trait Workload: Send + Sync + 'static {
    /// Per-worker state, for example a session and its prepared statements
    type Worker;
    /// A unit of work generated outside the timed section
    type Task;
    /// Errors raised while preparing, initializing or driving
    type Error: fmt::Display + Send + 'static;
    /// Prepare shared state (for example a schema) for the given bulk
    fn prepare(&self, bulk: Bulk) -> impl Future<Output = Result<(), Self::Error>>;
    /// Initialize a worker for the given bulk
    fn worker_init(&self, bulk: Bulk) -> impl Future<Output = Result<Self::Worker, Self::Error>>;
    /// Generate the next task. This is not timed
    fn generate_task(&self, worker: &mut Self::Worker) -> Self::Task;
    /// Drive a single task. This is timed
    fn drive(
        &self,
        worker: &mut Self::Worker,
        task: Self::Task,
    ) -> impl Future<Output = Result<(), Self::Error>>;
}
