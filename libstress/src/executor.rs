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
    crate::{Bulk, ExecutorSpec, Probe, RunSetup, RunStats, WorkerStats, Workload},
    crossbeam_channel::{unbounded, Receiver, Sender},
    serde::Serialize,
    std::{
        fmt, io,
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        thread::{self, JoinHandle},
    },
    tokio::{
        runtime,
        sync::RwLock,
        task::{JoinSet, LocalSet},
    },
};

pub type ExecutorResult<T, E> = Result<T, ExecutorError<E>>;

/*
    errors
*/

#[derive(Debug)]
pub enum ExecutorError<E> {
    /// the executor spec has no workers
    NoWorkers(ExecutorSpec),
    /// shared preparation for a bulk failed
    Prepare(E),
    /// a worker failed to initialize
    Init(E),
    /// a worker failed while driving its workload
    Task(E),
    /// a worker runtime could not be started
    Runtime(io::Error),
    /// a worker panicked
    WorkerCrashed(String),
    /// all workers went offline before reporting
    AllWorkersOffline,
}

impl<E: fmt::Display> fmt::Display for ExecutorError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers(spec) => write!(f, "executor `{spec}` has no workers"),
            Self::Prepare(e) => write!(f, "workload preparation failed. {e}"),
            Self::Init(e) => write!(f, "worker init failed. {e}"),
            Self::Task(e) => write!(f, "worker task failed. {e}"),
            Self::Runtime(e) => write!(f, "failed to start worker runtime. {e}"),
            Self::WorkerCrashed(e) => write!(f, "worker crashed. {e}"),
            Self::AllWorkersOffline => write!(
                f,
                "run failed because all workers went offline indicating catastrophic failure"
            ),
        }
    }
}

/*
    state mgmt
*/

/// State shared by all workers of a single run
#[derive(Debug)]
struct StartGate {
    okay: AtomicBool,
    start_sig: RwLock<()>,
}

impl StartGate {
    fn new() -> Self {
        Self {
            okay: AtomicBool::new(true),
            start_sig: RwLock::new(()),
        }
    }
    async fn wait_for_global_begin(&self) {
        drop(self.start_sig.read().await)
    }
    fn post_failure(&self) {
        self.okay.store(false, Ordering::Release)
    }
    fn load_okay(&self) -> bool {
        self.okay.load(Ordering::Acquire)
    }
}

enum WorkerEvent<E> {
    Ready,
    InitFailed(E),
    RuntimeFailed(io::Error),
    Completed(WorkerStats),
    Errored(E),
    Crashed(String),
}

/*
    worker
*/

struct WorkerCtx<W: Workload> {
    bulk: Bulk,
    setup: RunSetup,
    workload: Arc<W>,
    gate: Arc<StartGate>,
    tx: Sender<WorkerEvent<W::Error>>,
}

impl<W: Workload> Clone for WorkerCtx<W> {
    fn clone(&self) -> Self {
        Self {
            bulk: self.bulk,
            setup: self.setup,
            workload: self.workload.clone(),
            gate: self.gate.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<W: Workload> WorkerCtx<W> {
    fn report(&self, event: WorkerEvent<W::Error>) {
        if self.tx.send(event).is_err() {
            error!("worker failed to report because the coordinator exited");
        }
    }
}

/// Runs `threads` workers on a dedicated single-threaded runtime. This is one "process" of an
/// executor
fn process_svc<W: Workload>(threads: usize, first_id: usize, ctx: WorkerCtx<W>) {
    let rt = match runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            ctx.gate.post_failure();
            ctx.report(WorkerEvent::RuntimeFailed(e));
            return;
        }
    };
    let local = LocalSet::new();
    local.block_on(&rt, async move {
        let mut workers = JoinSet::new();
        for id in first_id..first_id + threads {
            workers.spawn_local(worker_svc(id, ctx.clone()));
        }
        // workers parked on the gate never finish, so a crash must be seen in completion order
        while let Some(ret) = workers.join_next().await {
            if let Err(e) = ret {
                error!("worker crashed: {e}");
                ctx.gate.post_failure();
                ctx.report(WorkerEvent::Crashed(e.to_string()));
            }
        }
    });
}

async fn worker_svc<W: Workload>(id: usize, ctx: WorkerCtx<W>) {
    let mut worker = match ctx.workload.worker_init(ctx.bulk).await {
        Ok(w) => w,
        Err(e) => {
            ctx.gate.post_failure();
            ctx.report(WorkerEvent::InitFailed(e));
            return;
        }
    };
    ctx.report(WorkerEvent::Ready);
    // wait for the coordinator to release everyone
    ctx.gate.wait_for_global_begin().await;
    if !ctx.gate.load_okay() {
        return;
    }
    if !ctx.setup.start_delay.is_zero() {
        tokio::time::sleep(ctx.setup.start_delay).await;
    }
    let mut probe = Probe::new(ctx.setup.duration);
    loop {
        if !ctx.gate.load_okay() {
            // some other worker failed
            return;
        }
        let task = ctx.workload.generate_task(&mut worker);
        probe.start();
        let ret = ctx.workload.drive(&mut worker, task).await;
        let expired = probe.stop();
        if let Err(e) = ret {
            ctx.gate.post_failure();
            ctx.report(WorkerEvent::Errored(e));
            return;
        }
        if expired {
            break;
        }
    }
    trace!("worker-{id} finished with {} calls", probe.calls());
    ctx.report(WorkerEvent::Completed(probe.into_stats(id)));
}

/*
    executor
*/

/// The result of running one executor spec against one bulk
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub bulk: Bulk,
    pub executor: ExecutorSpec,
    pub stats: RunStats,
    pub workers: Vec<WorkerStats>,
}

#[derive(Debug)]
pub struct ParallelExecutor {
    label: String,
    init_each_bulk: bool,
}

impl ParallelExecutor {
    /// Create a new executor. If `init_each_bulk` is set, [`Workload::prepare`] runs before
    /// every bulk; otherwise it runs only before the first one
    pub fn new(label: impl Into<String>, init_each_bulk: bool) -> Self {
        Self {
            label: label.into(),
            init_each_bulk,
        }
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Run every executor spec against every bulk, returning one report per combination in
    /// order
    pub fn run_bulk_executor<W: Workload>(
        &self,
        bulks: &[Bulk],
        executors: &[ExecutorSpec],
        setup: RunSetup,
        workload: Arc<W>,
    ) -> ExecutorResult<Vec<RunReport>, W::Error> {
        let mut reports = Vec::with_capacity(bulks.len() * executors.len());
        for (i, bulk) in bulks.iter().enumerate() {
            if self.init_each_bulk || i == 0 {
                debug!("{}: preparing workload for bulk {bulk}", self.label);
                let rt = runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(ExecutorError::Runtime)?;
                rt.block_on(workload.prepare(*bulk))
                    .map_err(ExecutorError::Prepare)?;
            }
            for spec in executors {
                info!(
                    "{}: running bulk {bulk} with executor {spec} for {}s",
                    self.label,
                    setup.duration.as_secs()
                );
                reports.push(self.run_executor(*bulk, spec, setup, &workload)?);
            }
        }
        Ok(reports)
    }
    fn run_executor<W: Workload>(
        &self,
        bulk: Bulk,
        spec: &ExecutorSpec,
        setup: RunSetup,
        workload: &Arc<W>,
    ) -> ExecutorResult<RunReport, W::Error> {
        let total = spec.workers();
        if total == 0 {
            return Err(ExecutorError::NoWorkers(spec.clone()));
        }
        let gate = Arc::new(StartGate::new());
        let (tx, rx) = unbounded();
        // hold the workers until all of them are online
        let paused = gate.start_sig.blocking_write();
        let mut handles = Vec::with_capacity(spec.processes);
        for pid in 0..spec.processes {
            let ctx = WorkerCtx {
                bulk,
                setup,
                workload: workload.clone(),
                gate: gate.clone(),
                tx: tx.clone(),
            };
            let threads = spec.threads;
            let spawned = thread::Builder::new()
                .name(format!("{}-proc-{pid}", self.label))
                .spawn(move || process_svc(threads, pid * threads, ctx));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    gate.post_failure();
                    drop(paused);
                    join_all(handles);
                    return Err(ExecutorError::Runtime(e));
                }
            }
        }
        drop(tx);
        // wait for everyone to come online
        let failure = wait_ready(&rx, total);
        if failure.is_some() {
            gate.post_failure();
        }
        // now let them begin!
        drop(paused);
        if let Some(e) = failure {
            join_all(handles);
            return Err(e);
        }
        trace!("{}: all {total} workers online", self.label);
        let collected = collect(&rx, total);
        join_all(handles);
        let mut workers = collected?;
        workers.sort_by_key(|w| w.worker);
        Ok(RunReport {
            bulk,
            executor: spec.clone(),
            stats: RunStats::aggregate(&workers, bulk),
            workers,
        })
    }
}

fn wait_ready<E>(rx: &Receiver<WorkerEvent<E>>, total: usize) -> Option<ExecutorError<E>> {
    let mut ready = 0;
    while ready != total {
        match rx.recv() {
            Ok(WorkerEvent::Ready) => ready += 1,
            Ok(WorkerEvent::InitFailed(e)) => return Some(ExecutorError::Init(e)),
            Ok(WorkerEvent::RuntimeFailed(e)) => return Some(ExecutorError::Runtime(e)),
            Ok(WorkerEvent::Errored(e)) => return Some(ExecutorError::Task(e)),
            Ok(WorkerEvent::Crashed(e)) => return Some(ExecutorError::WorkerCrashed(e)),
            Ok(WorkerEvent::Completed(_)) => {}
            Err(_) => return Some(ExecutorError::AllWorkersOffline),
        }
    }
    None
}

fn collect<E>(rx: &Receiver<WorkerEvent<E>>, total: usize) -> ExecutorResult<Vec<WorkerStats>, E> {
    let mut workers = Vec::with_capacity(total);
    while workers.len() != total {
        match rx.recv() {
            Ok(WorkerEvent::Completed(stats)) => workers.push(stats),
            Ok(WorkerEvent::Errored(e)) => return Err(ExecutorError::Task(e)),
            Ok(WorkerEvent::InitFailed(e)) => return Err(ExecutorError::Init(e)),
            Ok(WorkerEvent::RuntimeFailed(e)) => return Err(ExecutorError::Runtime(e)),
            Ok(WorkerEvent::Crashed(e)) => return Err(ExecutorError::WorkerCrashed(e)),
            Ok(WorkerEvent::Ready) => {}
            Err(_) => return Err(ExecutorError::AllWorkersOffline),
        }
    }
    Ok(workers)
}

fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if handle.join().is_err() {
            error!("a worker process panicked");
        }
    }
}
