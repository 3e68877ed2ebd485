/*
 * Created on Fri Sep 11 2026
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

//! The settings registry: every recognized key along with its compiled-in default

macro_rules! settings {
    (@default) => { None };
    (@default $default:literal) => { Some($default) };
    ($($(#[$attr:meta])* $key:ident $(= $default:literal)?),* $(,)?) => {
        $(
            $(#[$attr])*
            pub const $key: &str = stringify!($key);
        )*
        /// Every key known to the registry, in declaration order
        pub const KEYS: &[&str] = &[$($key),*];
        /// Returns the compiled-in default for `key`, if it has one
        pub fn lookup(key: &str) -> Option<&'static str> {
            match key {
                $($key => settings!(@default $($default)?),)*
                _ => None,
            }
        }
    };
}

settings! {
    /// comma separated list of environment files to run in turn
    MULTIPLE_ENV,
    /// seconds to wait between two environments
    MULTIPLE_ENV_DELAY = "0",
    /// list of `[threads, processes, label]`
    EXECUTORS = "[[1, 1, '1x threads'], [2, 1, '1x threads']]",
    DETAIL_OUTPUT = "True",
    GENERATE_GRAPH = "Perf",
    EXECUTOR_DURATION = "5",
    EXECUTOR_START_DELAY = "0",
    CLUSTER_DIAGNOSE = "Short",
    KEYSPACE = "prftest",
    /// list of `[rows, columns]`
    BULK_LIST = "[[200, 10]]",
    BULK_LIST_R = "[[1, 10]]",
    BULK_LIST_W = "[[200, 10]]",
    TEST_TYPE = "W",
    IP = "localhost",
    PORT = "9042",
    SECURE_CONNECT_BUNDLE,
    USERNAME = "cassandra",
    PASSWORD = "cassandra",
    REPLICATION_CLASS = "NetworkTopologyStrategy",
    REPLICATION_FACTOR = "3",
    COMPACTION,
    COMPACTION_PARAMS,
    CONSISTENCY_LEVEL = "LOCAL_QUORUM",
    LB_LOCAL_DC = "datacenter1",
    LABEL = "local",
}

#[test]
fn registry_defaults() {
    assert_eq!(lookup(EXECUTOR_DURATION), Some("5"));
    assert_eq!(lookup(CONSISTENCY_LEVEL), Some("LOCAL_QUORUM"));
    assert_eq!(lookup(REPLICATION_FACTOR), Some("3"));
    assert_eq!(lookup(BULK_LIST_R), Some("[[1, 10]]"));
    assert_eq!(lookup(BULK_LIST_W), Some("[[200, 10]]"));
    assert_eq!(lookup(MULTIPLE_ENV), None);
    assert_eq!(lookup(COMPACTION), None);
    assert_eq!(lookup("NOT_A_KEY"), None);
    assert_eq!(KEYS.len(), 25);
    assert_eq!(KEYS[0], "MULTIPLE_ENV");
}
