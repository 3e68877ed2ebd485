/*
 * Created on Sun Sep 20 2026
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
    crate::{
        config::{types::consistency_name, AdapterParams, GlobalParams},
        error::BenchResult,
    },
    libstress::{Bulk, ExecutorSpec, RunReport, RunSetup},
    serde::Serialize,
    std::{
        fs::{self, File},
        io::{BufWriter, Write},
        path::{Path, PathBuf},
    },
};

const NANOS_PER_MILLI: f64 = 1_000_000.0;

fn ms(nanos: f64) -> f64 {
    nanos / NANOS_PER_MILLI
}

/*
    console
*/

pub fn print_table(adapter: &str, reports: &[RunReport]) {
    let rule =
        "+------------+----------+----------------------+-------------+-------------+-----------+-----------+";
    println!("{rule}");
    println!(
        "| Adapter    | Bulk     | Executor             |     Calls/s |      Rows/s |  Avg (ms) |  P99 (ms) |"
    );
    println!("{rule}");
    for RunReport {
        bulk,
        executor,
        stats,
        ..
    } in reports
    {
        println!(
            "| {:<10} | {:<8} | {:<20} | {:>11.2} | {:>11.2} | {:>9.3} | {:>9.3} |",
            adapter,
            bulk.to_string(),
            executor.to_string(),
            stats.calls_per_sec,
            stats.rows_per_sec,
            ms(stats.avg_nanos),
            ms(stats.p99_nanos as f64)
        );
    }
    println!("{rule}");
}

/*
    output files
*/

/// Name parts shared by every file written for one adapter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    pub adapter: String,
    /// `R` or `W`
    pub tag: &'static str,
    pub label: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

impl OutputName {
    pub fn new(params: &AdapterParams, label_suffix: &str, date: String) -> Self {
        Self {
            adapter: params.adapter.label().to_owned(),
            tag: params.test_type.tag(),
            label: format!("{}{label_suffix}", params.label),
            date,
        }
    }
    /// Adapter and label are lower-cased in file names, the test tag is not
    fn stem(&self) -> String {
        let mut stem = format!("{}-{}", self.adapter.to_lowercase(), self.tag);
        if !self.label.is_empty() {
            stem.push('-');
            stem.push_str(&self.label.to_lowercase());
        }
        stem.push('-');
        stem.push_str(&self.date);
        stem
    }
    /// `prf_<adapter>-<R|W>[-<label>]-<date>.txt`
    pub fn perf_file(&self) -> String {
        format!("prf_{}.txt", self.stem())
    }
    pub fn graph_perf_file(&self) -> String {
        format!("graph-perf-{}.json", self.stem())
    }
    pub fn graph_exec_file(&self) -> String {
        format!("graph-exec-{}.json", self.stem())
    }
}

#[derive(Serialize)]
struct Header<'a> {
    label: &'a str,
    adapter: &'a str,
    test_type: &'a str,
    consistency: &'a str,
    duration_secs: u64,
    start_delay_secs: u64,
    bulk_list: &'a [Bulk],
    executors: &'a [ExecutorSpec],
}

#[derive(Serialize)]
#[serde(untagged)]
enum Line<'a> {
    Detailed(&'a RunReport),
    Summary {
        bulk: Bulk,
        executor: &'a ExecutorSpec,
        stats: &'a libstress::RunStats,
    },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PerfPoint {
    pub bulk: String,
    pub executor: String,
    pub workers: usize,
    pub calls_per_sec: f64,
    pub avg_ms: f64,
    pub p99_ms: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ExecPoint {
    pub bulk: String,
    pub executor: String,
    pub worker: usize,
    pub calls: u64,
    pub calls_per_sec: f64,
    pub avg_ms: f64,
}

pub fn perf_series(reports: &[RunReport]) -> Vec<PerfPoint> {
    reports
        .iter()
        .map(|r| PerfPoint {
            bulk: r.bulk.to_string(),
            executor: r.executor.to_string(),
            workers: r.executor.workers(),
            calls_per_sec: r.stats.calls_per_sec,
            avg_ms: ms(r.stats.avg_nanos),
            p99_ms: ms(r.stats.p99_nanos as f64),
        })
        .collect()
}

pub fn exec_series(reports: &[RunReport]) -> Vec<ExecPoint> {
    reports
        .iter()
        .flat_map(|r| {
            r.workers.iter().map(move |w| ExecPoint {
                bulk: r.bulk.to_string(),
                executor: r.executor.to_string(),
                worker: w.worker,
                calls: w.calls,
                calls_per_sec: w.calls_per_sec(),
                avg_ms: ms(w.avg_nanos),
            })
        })
        .collect()
}

/// Writes every result file for one adapter run under `output_dir`
pub struct ReportWriter<'a> {
    output_dir: &'a Path,
    name: OutputName,
}

impl<'a> ReportWriter<'a> {
    pub fn new(output_dir: &'a Path, name: OutputName) -> Self {
        Self { output_dir, name }
    }
    /// Write the perf file and any requested graph data. Returns the written paths
    pub fn write(
        &self,
        params: &AdapterParams,
        global: &GlobalParams,
        reports: &[RunReport],
    ) -> BenchResult<Vec<PathBuf>> {
        fs::create_dir_all(self.output_dir)?;
        let mut written = vec![self.write_perf(params, global, reports)?];
        if global.generate_graph.perf() {
            written.push(self.write_json(&self.name.graph_perf_file(), &perf_series(reports))?);
        }
        if global.generate_graph.exec() {
            written.push(self.write_json(&self.name.graph_exec_file(), &exec_series(reports))?);
        }
        Ok(written)
    }
    fn write_perf(
        &self,
        params: &AdapterParams,
        global: &GlobalParams,
        reports: &[RunReport],
    ) -> BenchResult<PathBuf> {
        let path = self.output_dir.join(self.name.perf_file());
        let mut out = BufWriter::new(File::create(&path)?);
        let RunSetup {
            duration,
            start_delay,
        } = global.run_setup();
        let header = Header {
            label: &self.name.label,
            adapter: &self.name.adapter,
            test_type: self.name.tag,
            consistency: consistency_name(params.consistency_level),
            duration_secs: duration.as_secs(),
            start_delay_secs: start_delay.as_secs(),
            bulk_list: &params.bulk_list,
            executors: &global.executors,
        };
        serde_json::to_writer(&mut out, &header)?;
        out.write_all(b"\n")?;
        for report in reports {
            let line = if global.detail_output {
                Line::Detailed(report)
            } else {
                Line::Summary {
                    bulk: report.bulk,
                    executor: &report.executor,
                    stats: &report.stats,
                }
            };
            serde_json::to_writer(&mut out, &line)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(path)
    }
    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> BenchResult<PathBuf> {
        let path = self.output_dir.join(file);
        let mut out = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut out, value)?;
        out.flush()?;
        Ok(path)
    }
}
