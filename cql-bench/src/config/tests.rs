/*
 * Created on Mon Sep 14 2026
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
    super::*,
    std::{fs, process},
};

fn raw<const N: usize>(pairs: [(&str, &str); N]) -> RawConfig {
    RawConfig::from_pairs(pairs)
}

fn here() -> &'static Path {
    Path::new(".")
}

fn resolve(raw: &RawConfig, adapter: Adapter, global: Option<&GlobalParams>) -> AdapterParams {
    resolve_adapter(raw, adapter, global, here())
        .unwrap()
        .expect("adapter should be enabled")
}

/// A scratch directory unique to this test process and `name`
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cql-bench-{}-{name}", process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

mod truthy {
    use super::*;
    #[test]
    fn truthy_tokens() {
        for v in ["True", "true", "TRUE", "1", "Yes", "yes", "On", "ON", " on "] {
            assert!(is_truthy(Some(v)), "{v}");
        }
    }
    #[test]
    fn falsy_tokens() {
        for v in ["False", "0", "no", "off", "", "enabled", "2"] {
            assert!(!is_truthy(Some(v)), "{v}");
        }
        assert!(!is_truthy(None));
    }
}

mod gate {
    use super::*;
    #[test]
    fn disabled_adapters_resolve_to_nothing() {
        let raw = raw([
            ("CASSANDRA", "Off"),
            ("CASSANDRA_IP", "10.1.1.1"),
            ("CASSANDRA_PORT", "9999"),
            ("CASSANDRA_KEYSPACE", "ks"),
            ("CASSANDRA_CONSISTENCY_LEVEL", "ONE"),
            ("CASSANDRA_PASSWORD", "/does/not/exist"),
            ("CASSANDRA_BULK_LIST", "[[1, 2]]"),
        ]);
        assert!(resolve_adapter(&raw, Adapter::Cassandra, None, here())
            .unwrap()
            .is_none());
    }
    #[test]
    fn gate_ignores_broken_fields() {
        // nothing is validated for a disabled adapter
        let raw = raw([
            ("SCYLLADB", "no"),
            ("SCYLLADB_CONSISTENCY_LEVEL", "BOGUS"),
        ]);
        assert!(resolve_adapter(&raw, Adapter::ScyllaDB, None, here())
            .unwrap()
            .is_none());
    }
    #[test]
    fn only_enabled_adapters_resolve() {
        let raw = raw([("SCYLLADB", "On"), ("ASTRADB", "1")]);
        let enabled: Vec<Adapter> = Adapter::ALL
            .iter()
            .copied()
            .filter(|a| {
                resolve_adapter(&raw, *a, None, here())
                    .unwrap()
                    .is_some()
            })
            .collect();
        assert_eq!(enabled, vec![Adapter::ScyllaDB, Adapter::AstraDB]);
    }
}

mod precedence {
    use super::*;

    fn keyspace(pairs: &[(&str, &str)], global_keyspace: Option<&str>) -> String {
        let raw = RawConfig::from_pairs(
            [("SCYLLADB", "On")]
                .into_iter()
                .chain(pairs.iter().copied()),
        );
        let global = global_keyspace.map(|ks| GlobalParams {
            keyspace: ks.to_owned(),
            ..GlobalParams::resolve(&RawConfig::default()).unwrap()
        });
        resolve(&raw, Adapter::ScyllaDB, global.as_ref()).keyspace
    }

    #[test]
    fn keyspace_chain() {
        // adapter key wins over everything
        assert_eq!(
            keyspace(&[("SCYLLADB_KEYSPACE", "own"), ("KEYSPACE", "raw")], Some("global")),
            "own"
        );
        // then the global tier
        assert_eq!(keyspace(&[("KEYSPACE", "raw")], Some("global")), "global");
        // then the un-prefixed key
        assert_eq!(keyspace(&[("KEYSPACE", "raw")], None), "raw");
        // then the default
        assert_eq!(keyspace(&[], None), "prftest");
        // another adapter's key is never used
        assert_eq!(keyspace(&[("CASSANDRA_KEYSPACE", "other")], None), "prftest");
    }

    #[test]
    fn replication_factor_chain() {
        let rf = |pairs: &[(&str, &str)]| {
            let raw = RawConfig::from_pairs(
                [("CASSANDRA", "yes")]
                    .into_iter()
                    .chain(pairs.iter().copied()),
            );
            resolve(&raw, Adapter::Cassandra, None).replication_factor
        };
        assert_eq!(
            rf(&[("CASSANDRA_REPLICATION_FACTOR", "5"), ("REPLICATION_FACTOR", "1")]),
            "5"
        );
        assert_eq!(rf(&[("REPLICATION_FACTOR", "1")]), "1");
        assert_eq!(rf(&[]), "3");
        // blank values count as missing
        assert_eq!(rf(&[("CASSANDRA_REPLICATION_FACTOR", "  ")]), "3");
    }

    #[test]
    fn consistency_chain() {
        let cl = |pairs: &[(&str, &str)]| {
            let raw = RawConfig::from_pairs(
                [("COSMOSDB", "True")]
                    .into_iter()
                    .chain(pairs.iter().copied()),
            );
            resolve(&raw, Adapter::CosmosDB, None).consistency_level
        };
        assert_eq!(
            cl(&[("COSMOSDB_CONSISTENCY_LEVEL", "one"), ("CONSISTENCY_LEVEL", "ALL")]),
            Consistency::One
        );
        assert_eq!(cl(&[("CONSISTENCY_LEVEL", "all")]), Consistency::All);
        assert_eq!(cl(&[]), Consistency::LocalQuorum);
    }

    #[test]
    fn unknown_consistency_fails() {
        let own = raw([("SCYLLADB", "On"), ("SCYLLADB_CONSISTENCY_LEVEL", "BOGUS")]);
        assert!(matches!(
            resolve_adapter(&own, Adapter::ScyllaDB, None, here()),
            Err(ConfigError::UnknownConsistency(ref name)) if name == "BOGUS"
        ));
        let shared = raw([("SCYLLADB", "On"), ("CONSISTENCY_LEVEL", "bogus")]);
        assert!(matches!(
            resolve_adapter(&shared, Adapter::ScyllaDB, None, here()),
            Err(ConfigError::UnknownConsistency(ref name)) if name == "BOGUS"
        ));
    }
}

mod bulk_lists {
    use super::*;

    fn global() -> GlobalParams {
        GlobalParams::resolve(&raw([
            ("BULK_LIST_R", "[[10, 2]]"),
            ("BULK_LIST_W", "[[300, 8], [100, 4]]"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_type_selects_list() {
        let global = global();
        let read = resolve(
            &raw([("SCYLLADB", "On"), ("TEST_TYPE", "R")]),
            Adapter::ScyllaDB,
            Some(&global),
        );
        let write = resolve(
            &raw([("SCYLLADB", "On"), ("TEST_TYPE", "w")]),
            Adapter::ScyllaDB,
            Some(&global),
        );
        assert_eq!(read.test_type, TestType::Read);
        assert_eq!(read.bulk_list, vec![Bulk::new(10, 2)]);
        assert_eq!(write.test_type, TestType::Write);
        assert_eq!(write.bulk_list, vec![Bulk::new(300, 8), Bulk::new(100, 4)]);
        assert_ne!(read.bulk_list, write.bulk_list);
    }

    #[test]
    fn adapter_override_wins() {
        let global = global();
        let params = resolve(
            &raw([
                ("SCYLLADB", "On"),
                ("TEST_TYPE", "r"),
                ("SCYLLADB_BULK_LIST", "[[7, 3]]"),
            ]),
            Adapter::ScyllaDB,
            Some(&global),
        );
        assert_eq!(params.bulk_list, vec![Bulk::new(7, 3)]);
    }

    #[test]
    fn defaults_per_test_type() {
        let read = resolve(
            &raw([("SCYLLADB", "On"), ("TEST_TYPE", "r")]),
            Adapter::ScyllaDB,
            None,
        );
        let write = resolve(&raw([("SCYLLADB", "On")]), Adapter::ScyllaDB, None);
        assert_eq!(read.bulk_list, vec![Bulk::new(1, 10)]);
        assert_eq!(write.test_type, TestType::Write);
        assert_eq!(write.bulk_list, vec![Bulk::new(200, 10)]);
    }

    #[test]
    fn malformed_lists_fail() {
        let raw = raw([("SCYLLADB", "On"), ("SCYLLADB_BULK_LIST", "[[200, 10]")]);
        assert!(matches!(
            resolve_adapter(&raw, Adapter::ScyllaDB, None, here()),
            Err(ConfigError::Literal(ref key, _)) if key == "SCYLLADB_BULK_LIST"
        ));
    }

    #[test]
    fn bad_test_type_fails() {
        let raw = raw([("SCYLLADB", "On"), ("TEST_TYPE", "rw")]);
        assert!(matches!(
            resolve_adapter(&raw, Adapter::ScyllaDB, None, here()),
            Err(ConfigError::BadValue { ref key, .. }) if key == "TEST_TYPE"
        ));
    }
}

mod global_tier {
    use super::*;

    #[test]
    fn single_env_is_absent() {
        assert!(resolve_global(&RawConfig::default(), false)
            .unwrap()
            .is_none());
        assert!(resolve_global(&raw([("MULTIPLE_ENV", " ")]), false)
            .unwrap()
            .is_none());
    }

    #[test]
    fn forced_defaults() {
        let global = resolve_global(&RawConfig::default(), true)
            .unwrap()
            .unwrap();
        assert_eq!(
            global,
            GlobalParams {
                multiple_env: vec![],
                multiple_env_delay: 0,
                executors: vec![
                    ExecutorSpec::new(1, 1, "1x threads"),
                    ExecutorSpec::new(2, 1, "1x threads")
                ],
                detail_output: true,
                generate_graph: GraphScope::Perf,
                executor_duration: 5,
                executor_start_delay: 0,
                cluster_diagnose: DiagnoseLevel::Short,
                cluster_diagnose_only: false,
                keyspace: "prftest".to_owned(),
                bulk_list_r: vec![Bulk::new(1, 10)],
                bulk_list_w: vec![Bulk::new(200, 10)],
            }
        );
        assert!(!global.is_multi_env());
        assert_eq!(global.run_setup(), RunSetup::from_secs(5, 0));
    }

    #[test]
    fn multi_env() {
        let global = resolve_global(
            &raw([
                ("MULTIPLE_ENV", "a.env, b ,,c.env"),
                ("MULTIPLE_ENV_DELAY", "3"),
                ("EXECUTORS", "[[4, 2, 'big']]"),
                ("DETAIL_OUTPUT", "off"),
                ("GENERATE_GRAPH", "all"),
                ("EXECUTOR_DURATION", "30"),
                ("CLUSTER_DIAGNOSE", "extra"),
                ("KEYSPACE", "bench"),
            ]),
            false,
        )
        .unwrap()
        .unwrap();
        assert_eq!(global.multiple_env, vec!["a.env", "b", "c.env"]);
        assert_eq!(global.multiple_env_delay, 3);
        assert_eq!(global.executors, vec![ExecutorSpec::new(4, 2, "big")]);
        assert!(!global.detail_output);
        assert_eq!(global.generate_graph, GraphScope::All);
        assert_eq!(global.executor_duration, 30);
        assert_eq!(global.cluster_diagnose, DiagnoseLevel::Extra);
        assert_eq!(global.keyspace, "bench");
        assert!(global.is_multi_env());
    }

    #[test]
    fn bad_values_name_their_key() {
        for (key, value) in [
            ("EXECUTOR_DURATION", "five"),
            ("MULTIPLE_ENV_DELAY", "-1"),
            ("GENERATE_GRAPH", "Pretty"),
            ("CLUSTER_DIAGNOSE", "Verbose"),
        ] {
            let ret = GlobalParams::resolve(&raw([(key, value)]));
            assert!(
                matches!(ret, Err(ConfigError::BadValue { key: ref k, .. }) if k == key),
                "{key}"
            );
        }
        assert!(matches!(
            GlobalParams::resolve(&raw([("EXECUTORS", "[[1, 1, '1x']")])),
            Err(ConfigError::Literal(ref k, _)) if k == "EXECUTORS"
        ));
    }
}

mod secrets {
    use super::*;

    #[test]
    fn password_from_file() {
        let dir = scratch_dir("password");
        fs::write(dir.join("scylla.txt"), "s3cret\r\nsecond line\n").unwrap();
        let raw = raw([
            ("SCYLLADB", "On"),
            ("SCYLLADB_PASSWORD", "scylla.txt"),
            ("SCYLLADB_SECURE_CONNECT_BUNDLE", "bundle.zip"),
        ]);
        let params = resolve_adapter(&raw, Adapter::ScyllaDB, None, &dir)
            .unwrap()
            .unwrap();
        assert_eq!(params.password, "s3cret");
        assert_eq!(params.secure_connect_bundle, Some(dir.join("bundle.zip")));
        // absolute paths are kept
        let absolute = dir.join("scylla.txt");
        let raw = RawConfig::from_pairs([
            ("SCYLLADB", "On".to_owned()),
            ("SCYLLADB_PASSWORD", absolute.display().to_string()),
        ]);
        let params = resolve_adapter(&raw, Adapter::ScyllaDB, None, here())
            .unwrap()
            .unwrap();
        assert_eq!(params.password, "s3cret");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn default_password_is_literal() {
        let params = resolve(&raw([("ASTRADB", "On")]), Adapter::AstraDB, None);
        assert_eq!(params.password, "cassandra");
        assert_eq!(params.username, "cassandra");
        assert!(format!("{params:?}").contains("<redacted>"));
    }

    #[test]
    fn missing_secrets_file_fails() {
        let dir = scratch_dir("missing");
        let raw = raw([("CASSANDRA", "On"), ("CASSANDRA_PASSWORD", "nope.txt")]);
        match resolve_adapter(&raw, Adapter::Cassandra, None, &dir) {
            Err(ConfigError::SecretsFile(path, e)) => {
                assert_eq!(path, dir.join("nope.txt"));
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected a secrets file error, got {other:?}"),
        }
        fs::remove_dir_all(dir).unwrap();
    }
}

mod env_file {
    use super::*;

    #[test]
    fn load_dotenv_file() {
        let dir = scratch_dir("envfile");
        let path = dir.join("cass.env");
        fs::write(
            &path,
            concat!(
                "# local cluster\n",
                "CASSANDRA=On\n",
                "CASSANDRA_IP=127.0.0.1\n",
                "KEYSPACE=\"bench\"\n",
                "BULK_LIST_W=\"[[5, 2], [1, 3]]\"\n",
                "EXECUTORS=\"[[1, 1, '1x threads']]\"\n",
                "LABEL=\n",
            ),
        )
        .unwrap();
        let raw = RawConfig::from_env_file(&path).unwrap();
        assert_eq!(raw.get("CASSANDRA"), Some("On"));
        assert_eq!(raw.get("KEYSPACE"), Some("bench"));
        let global = GlobalParams::resolve(&raw).unwrap();
        assert_eq!(global.bulk_list_w, vec![Bulk::new(5, 2), Bulk::new(1, 3)]);
        assert_eq!(global.executors, vec![ExecutorSpec::new(1, 1, "1x threads")]);
        assert_eq!(raw.get("LABEL"), None);
        assert_eq!(raw.get("MISSING"), None);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_env_file() {
        let path = scratch_dir("noenv").join("absent.env");
        assert!(matches!(
            RawConfig::from_env_file(&path),
            Err(ConfigError::EnvFile(ref p, _)) if *p == path
        ));
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn scylla_read_without_globals() {
        let raw = raw([
            ("SCYLLADB", "On"),
            ("SCYLLADB_IP", "10.0.0.1,10.0.0.2"),
            ("TEST_TYPE", "r"),
            ("BULK_LIST_R", "[[5,2]]"),
        ]);
        let params = resolve(&raw, Adapter::ScyllaDB, None);
        assert_eq!(params.adapter, Adapter::ScyllaDB);
        assert_eq!(params.ip, vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(params.test_type, TestType::Read);
        assert_eq!(params.bulk_list, vec![Bulk::new(5, 2)]);
        assert_eq!(params.consistency_level, Consistency::LocalQuorum);
        assert_eq!(params.replication_factor, "3");
        // remaining defaults
        assert_eq!(params.port, 9042);
        assert_eq!(params.keyspace, "prftest");
        assert_eq!(params.replication_class, "NetworkTopologyStrategy");
        assert_eq!(params.local_dc, "datacenter1");
        assert_eq!(params.label, "local");
        assert_eq!(params.secure_connect_bundle, None);
        assert_eq!(params.compaction, None);
        assert_eq!(
            params.contact_points(),
            vec!["10.0.0.1:9042", "10.0.0.2:9042"]
        );
    }

    #[test]
    fn cassandra_off_with_everything_set() {
        let raw = raw([
            ("CASSANDRA", "Off"),
            ("CASSANDRA_IP", "10.0.0.9"),
            ("CASSANDRA_PORT", "9043"),
            ("CASSANDRA_SECURE_CONNECT_BUNDLE", "b.zip"),
            ("CASSANDRA_USERNAME", "u"),
            ("CASSANDRA_PASSWORD", "p.txt"),
            ("CASSANDRA_REPLICATION_CLASS", "SimpleStrategy"),
            ("CASSANDRA_REPLICATION_FACTOR", "1"),
            ("CASSANDRA_COMPACTION", "LeveledCompactionStrategy"),
            ("CASSANDRA_COMPACTION_PARAMS", "'sstable_size_in_mb': 160"),
            ("CASSANDRA_CONSISTENCY_LEVEL", "ONE"),
            ("CASSANDRA_LB_LOCAL_DC", "dc2"),
            ("CASSANDRA_LABEL", "x"),
            ("CASSANDRA_BULK_LIST", "[[1, 2]]"),
        ]);
        assert!(resolve_adapter(&raw, Adapter::Cassandra, None, here())
            .unwrap()
            .is_none());
    }

    #[test]
    fn full_adapter_override() {
        let raw = raw([
            ("ASTRADB", "On"),
            ("ASTRADB_PORT", "29042"),
            ("ASTRADB_USERNAME", "token"),
            ("ASTRADB_REPLICATION_CLASS", "SimpleStrategy"),
            ("ASTRADB_COMPACTION", "LeveledCompactionStrategy"),
            ("ASTRADB_COMPACTION_PARAMS", "'sstable_size_in_mb': 160"),
            ("ASTRADB_LB_LOCAL_DC", "eu-west-1"),
            ("ASTRADB_LABEL", "astra"),
            ("ASTRADB_PORT_IGNORED", "1"),
        ]);
        let params = resolve(&raw, Adapter::AstraDB, None);
        assert_eq!(params.port, 29042);
        assert_eq!(params.username, "token");
        assert_eq!(params.replication_class, "SimpleStrategy");
        assert_eq!(params.compaction.as_deref(), Some("LeveledCompactionStrategy"));
        assert_eq!(
            params.compaction_params.as_deref(),
            Some("'sstable_size_in_mb': 160")
        );
        assert_eq!(params.local_dc, "eu-west-1");
        assert_eq!(params.label, "astra");
    }

    #[test]
    fn bad_port() {
        let raw = raw([("SCYLLADB", "On"), ("SCYLLADB_PORT", "70000")]);
        assert!(matches!(
            resolve_adapter(&raw, Adapter::ScyllaDB, None, here()),
            Err(ConfigError::BadValue { ref key, .. }) if key == "SCYLLADB_PORT"
        ));
    }
}
