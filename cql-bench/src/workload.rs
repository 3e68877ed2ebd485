/*
 * Created on Thu Sep 17 2026
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

//! Synthetic read and write workloads

use {
    crate::{
        config::{AdapterParams, TestType},
        error::{BenchError, BenchResult},
        session::{self, column_names},
    },
    libstress::{Bulk, Workload},
    rand::{rngs::StdRng, Rng, SeedableRng},
    scylla::{
        batch::{Batch, BatchType},
        prepared_statement::PreparedStatement,
        Session,
    },
    std::sync::Arc,
};

/// Upper bound (exclusive) for generated values
pub const MAX_GENERATED_VALUE: i32 = 999_999;

pub fn insert_cql(params: &AdapterParams, bulk: Bulk) -> String {
    let columns = column_names(bulk.columns);
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        session::qualified_table(params),
        columns.join(", "),
        vec!["?"; bulk.columns].join(", ")
    )
}

pub fn select_cql(params: &AdapterParams, bulk: Bulk) -> String {
    let keys = vec!["?"; bulk.rows].join(", ");
    format!(
        "SELECT {} FROM {} WHERE fn0 IN ({keys}) AND fn1 IN ({keys})",
        column_names(bulk.columns).join(", "),
        session::qualified_table(params),
    )
}

fn generate(rng: &mut StdRng, count: usize) -> Vec<i32> {
    (0..count)
        .map(|_| rng.gen_range(0..MAX_GENERATED_VALUE))
        .collect()
}

/// A workload that either inserts or selects synthetic rows, depending on the test type
#[derive(Debug)]
pub struct CqlWorkload {
    params: Arc<AdapterParams>,
}

impl CqlWorkload {
    pub fn new(params: Arc<AdapterParams>) -> Self {
        Self { params }
    }
    /// Returns true if the schema is recreated before every bulk
    pub fn init_each_bulk(&self) -> bool {
        self.params.test_type == TestType::Write
    }
}

enum Statement {
    Insert(Batch),
    Select(PreparedStatement),
}

pub struct CqlWorker {
    session: Session,
    statement: Statement,
    bulk: Bulk,
    rng: StdRng,
}

/// Bound values for one call: a row per statement of an insert batch, or a single row of
/// `2 × rows` keys for a select
pub struct CqlTask {
    rows: Vec<Vec<i32>>,
}

impl CqlTask {
    fn generate(test_type: TestType, bulk: Bulk, rng: &mut StdRng) -> Self {
        let rows = match test_type {
            TestType::Write => (0..bulk.rows)
                .map(|_| generate(rng, bulk.columns))
                .collect(),
            TestType::Read => vec![generate(rng, bulk.rows * 2)],
        };
        Self { rows }
    }
}

impl Workload for CqlWorkload {
    type Worker = CqlWorker;
    type Task = CqlTask;
    type Error = BenchError;
    async fn prepare(&self, bulk: Bulk) -> BenchResult<()> {
        if self.params.test_type == TestType::Write {
            let session = session::connect(&self.params).await?;
            session::create_model(&session, &self.params, bulk).await?;
        }
        Ok(())
    }
    async fn worker_init(&self, bulk: Bulk) -> BenchResult<CqlWorker> {
        let session = session::connect(&self.params).await?;
        let statement = match self.params.test_type {
            TestType::Write => {
                let mut prepared = session.prepare(insert_cql(&self.params, bulk)).await?;
                prepared.set_consistency(self.params.consistency_level);
                let mut batch = Batch::new(BatchType::Unlogged);
                batch.set_consistency(self.params.consistency_level);
                for _ in 0..bulk.rows {
                    batch.append_statement(prepared.clone());
                }
                Statement::Insert(batch)
            }
            TestType::Read => {
                let mut prepared = session.prepare(select_cql(&self.params, bulk)).await?;
                prepared.set_consistency(self.params.consistency_level);
                Statement::Select(prepared)
            }
        };
        Ok(CqlWorker {
            session,
            statement,
            bulk,
            rng: StdRng::from_entropy(),
        })
    }
    fn generate_task(&self, worker: &mut CqlWorker) -> CqlTask {
        CqlTask::generate(self.params.test_type, worker.bulk, &mut worker.rng)
    }
    async fn drive(&self, worker: &mut CqlWorker, task: CqlTask) -> BenchResult<()> {
        match &worker.statement {
            Statement::Insert(batch) => {
                worker.session.batch(batch, task.rows).await?;
            }
            Statement::Select(prepared) => {
                for keys in task.rows {
                    worker.session.execute_unpaged(prepared, keys).await?;
                }
            }
        }
        Ok(())
    }
}
