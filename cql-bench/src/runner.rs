/*
 * Created on Mon Sep 21 2026
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

//! Running every enabled adapter of one or more environments

use {
    crate::{
        config::{
            resolve_adapter, resolve_global, Adapter, AdapterParams, DiagnoseLevel, GlobalParams,
            RawConfig,
        },
        diagnose,
        error::BenchResult,
        report::{self, OutputName, ReportWriter},
        session,
        workload::CqlWorkload,
    },
    chrono::Local,
    libstress::ParallelExecutor,
    std::{
        path::{Path, PathBuf},
        sync::Arc,
        thread,
        time::Duration,
    },
    tokio::runtime,
};

const CONFIG_DIR: &str = "config";
const OUTPUT_DIR: &str = "output";

/// What to do with every enabled adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// diagnose (at the configured level) then run the performance tests
    Run,
    /// only diagnose, at the given level
    Diagnose(DiagnoseLevel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// name of the first environment file under `<dir>/config`
    pub env: String,
    /// base directory
    pub dir: PathBuf,
    pub task: Task,
}

/// Appends `.env` unless the name already carries it
pub fn env_file_name(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".env") {
        name.to_owned()
    } else {
        format!("{name}.env")
    }
}

fn env_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(CONFIG_DIR).join(env_file_name(name))
}

/// State shared by every adapter of a run
struct RunContext<'a> {
    dir: &'a Path,
    global: &'a GlobalParams,
    /// appended to the label of every output file
    run_id: String,
    date: String,
}

pub fn run(opts: &RunOptions) -> BenchResult<()> {
    let first = RawConfig::from_env_file(env_path(&opts.dir, &opts.env))?;
    let now = Local::now();
    let date = now.format("%Y-%m-%d").to_string();
    match resolve_global(&first, false)? {
        Some(mut global) => {
            apply_task(&mut global, opts.task);
            let ctx = RunContext {
                dir: &opts.dir,
                global: &global,
                run_id: now.format("-%H%M%S").to_string(),
                date,
            };
            let total = global.multiple_env.len();
            for (i, env) in global.multiple_env.iter().enumerate() {
                if i != 0 && global.multiple_env_delay != 0 {
                    thread::sleep(Duration::from_secs(global.multiple_env_delay));
                }
                let name = env_file_name(env);
                info!("environment switch {}/{total}: '{name}'", i + 1);
                let raw = RawConfig::from_env_file(env_path(&opts.dir, &name))?;
                exec_config(&raw, &ctx)?;
            }
        }
        None => {
            let mut global = GlobalParams::resolve(&first)?;
            apply_task(&mut global, opts.task);
            let ctx = RunContext {
                dir: &opts.dir,
                global: &global,
                run_id: String::new(),
                date,
            };
            exec_config(&first, &ctx)?;
        }
    }
    Ok(())
}

fn apply_task(global: &mut GlobalParams, task: Task) {
    if let Task::Diagnose(level) = task {
        global.cluster_diagnose = level;
        global.cluster_diagnose_only = true;
    }
}

/// Run every enabled adapter of one environment, in order
fn exec_config(raw: &RawConfig, ctx: &RunContext) -> BenchResult<()> {
    for adapter in Adapter::ALL.iter().copied() {
        let Some(params) = resolve_adapter(raw, adapter, Some(ctx.global), ctx.dir)? else {
            continue;
        };
        info!(
            "{}: {} test against {:?} (keyspace `{}`, label `{}`)",
            adapter.label(),
            params.test_type.tag(),
            params.ip,
            params.keyspace,
            params.label
        );
        if ctx.global.cluster_diagnose != DiagnoseLevel::Off {
            run_diagnose(&params, ctx.global.cluster_diagnose)?;
        }
        if !ctx.global.cluster_diagnose_only {
            run_perf(params, ctx)?;
        }
    }
    Ok(())
}

fn run_diagnose(params: &AdapterParams, level: DiagnoseLevel) -> BenchResult<()> {
    let rt = runtime::Builder::new_current_thread().enable_all().build()?;
    rt.block_on(async {
        let session = session::connect(params).await?;
        diagnose::diagnose(&session, params, level);
        BenchResult::Ok(())
    })
}

fn run_perf(params: AdapterParams, ctx: &RunContext) -> BenchResult<()> {
    let params = Arc::new(params);
    let workload = Arc::new(CqlWorkload::new(params.clone()));
    let executor = ParallelExecutor::new(
        params.adapter.label().to_ascii_lowercase(),
        workload.init_each_bulk(),
    );
    let reports = executor.run_bulk_executor(
        &params.bulk_list,
        &ctx.global.executors,
        ctx.global.run_setup(),
        workload,
    )?;
    report::print_table(params.adapter.label(), &reports);
    let name = OutputName::new(&params, &ctx.run_id, ctx.date.clone());
    let output_dir = ctx.dir.join(OUTPUT_DIR);
    for path in ReportWriter::new(&output_dir, name).write(&params, ctx.global, &reports)? {
        info!("wrote `{}`", path.display());
    }
    Ok(())
}
