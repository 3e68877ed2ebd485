/*
 * Created on Wed Sep 16 2026
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

//! Opening driver sessions and provisioning the benchmark schema

use {
    crate::{
        config::AdapterParams,
        error::{BenchError, BenchResult},
    },
    libstress::Bulk,
    scylla::{
        transport::{
            execution_profile::ExecutionProfileHandle, load_balancing::DefaultPolicy,
            ExecutionProfile,
        },
        CloudSessionBuilder, Session, SessionBuilder,
    },
    std::{path::Path, time::Duration},
};

/// The table every workload reads from and writes to
pub const TABLE: &str = "t01";
/// Timeout for connecting and for every request
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Open a session for the given adapter. A cloud bundle takes precedence over contact points
///
/// Cloud sessions authenticate with the credentials carried by the bundle, so `username` and
/// `password` only apply to contact point sessions.
pub async fn connect(params: &AdapterParams) -> BenchResult<Session> {
    let policy = DefaultPolicy::builder()
        .prefer_datacenter(params.local_dc.clone())
        .token_aware(true)
        .build();
    let profile = ExecutionProfile::builder()
        .consistency(params.consistency_level)
        .request_timeout(Some(TIMEOUT))
        .load_balancing_policy(policy)
        .build()
        .into_handle();
    let session = match &params.secure_connect_bundle {
        Some(bundle) => {
            debug!("{}: connecting through `{}`", params.adapter.label(), bundle.display());
            cloud_builder(bundle, profile)?.build().await?
        }
        None => {
            let contact_points = params.contact_points();
            debug!("{}: connecting to {contact_points:?}", params.adapter.label());
            SessionBuilder::new()
                .known_nodes(contact_points)
                .user(&params.username, &params.password)
                .default_execution_profile_handle(profile)
                .connection_timeout(TIMEOUT)
                .build()
                .await?
        }
    };
    Ok(session)
}

fn cloud_builder(
    bundle: &Path,
    profile: ExecutionProfileHandle,
) -> BenchResult<CloudSessionBuilder> {
    let builder =
        CloudSessionBuilder::new(bundle).map_err(|e| BenchError::Cloud(e.to_string()))?;
    Ok(builder
        .default_execution_profile_handle(profile)
        .connection_timeout(TIMEOUT))
}

/// Returns `fn0, fn1, ..` for the given number of columns
pub fn column_names(columns: usize) -> Vec<String> {
    (0..columns).map(|i| format!("fn{i}")).collect()
}

pub fn qualified_table(params: &AdapterParams) -> String {
    format!("{}.{TABLE}", params.keyspace)
}

pub fn create_keyspace_cql(params: &AdapterParams) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': '{}', 'replication_factor': {}}}",
        params.keyspace, params.replication_class, params.replication_factor
    )
}

pub fn create_table_cql(params: &AdapterParams, bulk: Bulk) -> String {
    let columns: Vec<String> = column_names(bulk.columns)
        .into_iter()
        .map(|c| format!("{c} int"))
        .collect();
    let mut cql = format!(
        "CREATE TABLE IF NOT EXISTS {} ({}, PRIMARY KEY (fn0, fn1))",
        qualified_table(params),
        columns.join(", ")
    );
    if let Some(compaction) = &params.compaction {
        cql.push_str(&format!(" WITH compaction = {{'class': '{compaction}'"));
        if let Some(extra) = &params.compaction_params {
            cql.push_str(", ");
            cql.push_str(extra);
        }
        cql.push('}');
    }
    cql
}

/// Drop and recreate the keyspace and the benchmark table sized for `bulk`
///
/// Keyspaces are left alone for adapters that manage them outside CQL.
pub async fn create_model(
    session: &Session,
    params: &AdapterParams,
    bulk: Bulk,
) -> BenchResult<()> {
    if !params.adapter.manages_keyspaces() {
        session
            .query_unpaged(format!("DROP KEYSPACE IF EXISTS {}", params.keyspace), ())
            .await?;
        session
            .query_unpaged(create_keyspace_cql(params), ())
            .await?;
    }
    session
        .query_unpaged(format!("DROP TABLE IF EXISTS {}", qualified_table(params)), ())
        .await?;
    session
        .query_unpaged(create_table_cql(params, bulk), ())
        .await?;
    info!(
        "{}: created {} with {} columns",
        params.adapter.label(),
        qualified_table(params),
        bulk.columns
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::config::{resolve_adapter, Adapter, RawConfig},
        std::path::Path,
    };

    fn params(pairs: &[(&str, &str)]) -> AdapterParams {
        let raw = RawConfig::from_pairs(pairs.iter().copied());
        resolve_adapter(&raw, Adapter::ScyllaDB, None, Path::new("."))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn keyspace_cql() {
        let p = params(&[("SCYLLADB", "On"), ("KEYSPACE", "bench")]);
        assert_eq!(
            create_keyspace_cql(&p),
            "CREATE KEYSPACE IF NOT EXISTS bench WITH replication = \
             {'class': 'NetworkTopologyStrategy', 'replication_factor': 3}"
        );
    }

    #[test]
    fn table_cql() {
        let p = params(&[("SCYLLADB", "On")]);
        assert_eq!(
            create_table_cql(&p, Bulk::new(10, 3)),
            "CREATE TABLE IF NOT EXISTS prftest.t01 (fn0 int, fn1 int, fn2 int, PRIMARY KEY (fn0, fn1))"
        );
    }

    #[test]
    fn cloud_builder_needs_a_readable_bundle() {
        let profile = ExecutionProfile::builder().build().into_handle();
        let ret = cloud_builder(Path::new("/nonexistent/secure-connect.yaml"), profile);
        assert!(matches!(ret, Err(BenchError::Cloud(_))));
    }

    #[test]
    fn table_cql_with_compaction() {
        let p = params(&[
            ("SCYLLADB", "On"),
            ("SCYLLADB_COMPACTION", "LeveledCompactionStrategy"),
            ("SCYLLADB_COMPACTION_PARAMS", "'sstable_size_in_mb': 160"),
        ]);
        assert_eq!(
            create_table_cql(&p, Bulk::new(1, 2)),
            "CREATE TABLE IF NOT EXISTS prftest.t01 (fn0 int, fn1 int, PRIMARY KEY (fn0, fn1)) \
             WITH compaction = {'class': 'LeveledCompactionStrategy', 'sstable_size_in_mb': 160}"
        );
    }
}
