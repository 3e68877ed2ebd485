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

//! Configuration loading and resolution
//!
//! An environment file is loaded into a [`RawConfig`] and then resolved in two tiers. The global
//! tier ([`GlobalParams`]) holds settings shared by every adapter of a run. The adapter tier
//! ([`AdapterParams`]) is resolved once per enabled adapter and looks every field up in the
//! following order, stopping at the first hit:
//!
//! 1. `<ADAPTER>_<FIELD>`
//! 2. the global value, for fields the global tier carries (keyspace and bulk lists)
//! 3. the un-prefixed `<FIELD>`
//! 4. the compiled-in default from [`settings`]

mod cfgerr;
pub mod literal;
pub mod settings;
pub mod types;
#[cfg(test)]
mod tests;

pub use {
    cfgerr::ConfigError,
    types::{Adapter, DiagnoseLevel, GraphScope, TestType},
};

use {
    libstress::{Bulk, ExecutorSpec, RunSetup},
    scylla::statement::Consistency,
    settings::*,
    std::{
        collections::HashMap,
        fmt,
        fs::File,
        io::{BufRead, BufReader},
        path::{Path, PathBuf},
        str::FromStr,
    },
};

pub type CfgResult<T> = Result<T, ConfigError>;

/// Returns true if the value is one of `true`, `1`, `yes` or `on` (in any case). A missing value is
/// false
pub fn is_truthy(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim();
            ["true", "1", "yes", "on"]
                .iter()
                .any(|t| t.eq_ignore_ascii_case(v))
        }
        None => false,
    }
}

/*
    raw config
*/

/// The unresolved key/value pairs of a single environment file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    map: HashMap<String, String>,
}

impl RawConfig {
    /// Load a dotenv style file. The process environment is not touched
    pub fn from_env_file(path: impl AsRef<Path>) -> CfgResult<Self> {
        let path = path.as_ref();
        let iter =
            dotenvy::from_path_iter(path).map_err(|e| ConfigError::EnvFile(path.to_owned(), e))?;
        let mut map = HashMap::new();
        for pair in iter {
            let (key, value) = pair.map_err(|e| ConfigError::EnvFile(path.to_owned(), e))?;
            map.insert(key, value);
        }
        debug!("loaded {} keys from `{}`", map.len(), path.display());
        Ok(Self { map })
    }
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
    /// Returns the trimmed value of `key`. Blank values are treated as missing
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
    /// Returns the value of `key` or its compiled-in default
    fn get_or_default<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        self.get(key).or_else(|| settings::lookup(key))
    }
}

fn parse_num<T: FromStr>(key: &str, value: &str, expected: &'static str) -> CfgResult<T> {
    value.parse().map_err(|_| ConfigError::BadValue {
        key: key.to_owned(),
        value: value.to_owned(),
        expected,
    })
}

fn parse_named<T>(
    key: &str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
    expected: &'static str,
) -> CfgResult<T> {
    parse(value).ok_or_else(|| ConfigError::BadValue {
        key: key.to_owned(),
        value: value.to_owned(),
        expected,
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/*
    global tier
*/

/// Settings shared by every adapter of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalParams {
    /// environment files to run in turn. empty in single environment mode
    pub multiple_env: Vec<String>,
    /// seconds between two environments
    pub multiple_env_delay: u64,
    pub executors: Vec<ExecutorSpec>,
    pub detail_output: bool,
    pub generate_graph: GraphScope,
    /// seconds
    pub executor_duration: u64,
    /// seconds
    pub executor_start_delay: u64,
    pub cluster_diagnose: DiagnoseLevel,
    /// only diagnose clusters and skip the performance tests
    pub cluster_diagnose_only: bool,
    pub keyspace: String,
    pub bulk_list_r: Vec<Bulk>,
    pub bulk_list_w: Vec<Bulk>,
}

impl GlobalParams {
    /// Resolve the global tier from `raw`, falling back to defaults for every missing key
    pub fn resolve(raw: &RawConfig) -> CfgResult<Self> {
        let value = |key: &'static str| raw.get_or_default(key).unwrap_or_default();
        Ok(Self {
            multiple_env: split_list(value(MULTIPLE_ENV)),
            multiple_env_delay: parse_num(MULTIPLE_ENV_DELAY, value(MULTIPLE_ENV_DELAY), SECONDS)?,
            executors: literal::parse_executors(EXECUTORS, value(EXECUTORS))?,
            detail_output: is_truthy(raw.get_or_default(DETAIL_OUTPUT)),
            generate_graph: parse_named(
                GENERATE_GRAPH,
                value(GENERATE_GRAPH),
                GraphScope::parse,
                GraphScope::expected(),
            )?,
            executor_duration: parse_num(EXECUTOR_DURATION, value(EXECUTOR_DURATION), SECONDS)?,
            executor_start_delay: parse_num(
                EXECUTOR_START_DELAY,
                value(EXECUTOR_START_DELAY),
                SECONDS,
            )?,
            cluster_diagnose: parse_named(
                CLUSTER_DIAGNOSE,
                value(CLUSTER_DIAGNOSE),
                DiagnoseLevel::parse,
                DiagnoseLevel::expected(),
            )?,
            cluster_diagnose_only: false,
            keyspace: value(KEYSPACE).to_owned(),
            bulk_list_r: literal::parse_bulks(BULK_LIST_R, value(BULK_LIST_R))?,
            bulk_list_w: literal::parse_bulks(BULK_LIST_W, value(BULK_LIST_W))?,
        })
    }
    /// Returns the bulk list used by the given test type
    pub fn bulk_list(&self, test_type: TestType) -> &[Bulk] {
        match test_type {
            TestType::Read => &self.bulk_list_r,
            TestType::Write => &self.bulk_list_w,
        }
    }
    pub fn is_multi_env(&self) -> bool {
        !self.multiple_env.is_empty()
    }
    pub fn run_setup(&self) -> RunSetup {
        RunSetup::from_secs(self.executor_duration, self.executor_start_delay)
    }
}

const SECONDS: &str = "a whole number of seconds";

/// Resolve the global tier. Returns `None` if `MULTIPLE_ENV` is not set and `force_default` is
/// false, in which case the caller runs in single environment mode
pub fn resolve_global(raw: &RawConfig, force_default: bool) -> CfgResult<Option<GlobalParams>> {
    if raw.get(MULTIPLE_ENV).is_none() && !force_default {
        return Ok(None);
    }
    GlobalParams::resolve(raw).map(Some)
}

/*
    adapter tier
*/

/// Fully resolved settings for one enabled adapter
#[derive(Clone, PartialEq)]
pub struct AdapterParams {
    pub adapter: Adapter,
    pub test_type: TestType,
    pub bulk_list: Vec<Bulk>,
    pub keyspace: String,
    pub ip: Vec<String>,
    pub port: u16,
    /// cloud bundle. when set, contact points are ignored
    pub secure_connect_bundle: Option<PathBuf>,
    pub username: String,
    pub password: String,
    pub replication_class: String,
    /// kept verbatim since it may be a per-datacenter map fragment
    pub replication_factor: String,
    pub compaction: Option<String>,
    pub compaction_params: Option<String>,
    pub consistency_level: Consistency,
    pub local_dc: String,
    pub label: String,
}

impl AdapterParams {
    /// Returns `host:port` for every contact point
    pub fn contact_points(&self) -> Vec<String> {
        self.ip
            .iter()
            .map(|host| format!("{host}:{}", self.port))
            .collect()
    }
}

impl fmt::Debug for AdapterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterParams")
            .field("adapter", &self.adapter)
            .field("test_type", &self.test_type)
            .field("bulk_list", &self.bulk_list)
            .field("keyspace", &self.keyspace)
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("secure_connect_bundle", &self.secure_connect_bundle)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("replication_class", &self.replication_class)
            .field("replication_factor", &self.replication_factor)
            .field("compaction", &self.compaction)
            .field("compaction_params", &self.compaction_params)
            .field("consistency_level", &self.consistency_level)
            .field("local_dc", &self.local_dc)
            .field("label", &self.label)
            .finish()
    }
}

/// Per-field lookups for a single adapter
struct AdapterScope<'a> {
    raw: &'a RawConfig,
    adapter: Adapter,
    global: Option<&'a GlobalParams>,
}

impl<'a> AdapterScope<'a> {
    fn key(&self, field: &str) -> String {
        format!("{}_{field}", self.adapter.prefix())
    }
    /// Returns the adapter specific value along with its key
    fn own(&self, field: &str) -> Option<(String, &'a str)> {
        let key = self.key(field);
        self.raw.get(&key).map(|v| (key, v))
    }
    /// Returns the un-prefixed value or the default for `field`
    fn shared(&self, field: &'static str) -> Option<(String, &'a str)> {
        self.raw
            .get(field)
            .or_else(|| settings::lookup(field))
            .map(|v| (field.to_owned(), v))
    }
    /// Walk the full chain for a field the global tier does not carry
    fn lookup(&self, field: &'static str) -> Option<(String, &'a str)> {
        self.own(field).or_else(|| self.shared(field))
    }
    fn string(&self, field: &'static str) -> String {
        self.lookup(field)
            .map(|(_, v)| v.to_owned())
            .unwrap_or_default()
    }
    fn optional(&self, field: &'static str) -> Option<String> {
        self.lookup(field).map(|(_, v)| v.to_owned())
    }
    fn keyspace(&self) -> String {
        match (self.own(KEYSPACE), self.global) {
            (Some((_, v)), _) => v.to_owned(),
            (None, Some(global)) => global.keyspace.clone(),
            (None, None) => self.string(KEYSPACE),
        }
    }
    fn bulk_list(&self, test_type: TestType) -> CfgResult<Vec<Bulk>> {
        if let Some((key, v)) = self.own(BULK_LIST) {
            return literal::parse_bulks(&key, v);
        }
        if let Some(global) = self.global {
            return Ok(global.bulk_list(test_type).to_vec());
        }
        let field = match test_type {
            TestType::Read => BULK_LIST_R,
            TestType::Write => BULK_LIST_W,
        };
        let (key, v) = self.shared(field).unwrap_or_default();
        literal::parse_bulks(&key, v)
    }
    fn password(&self, base_dir: &Path) -> CfgResult<String> {
        match self.own(PASSWORD) {
            Some((_, file)) => read_first_line(&resolve_path(base_dir, file)),
            None => Ok(settings::lookup(PASSWORD).unwrap_or_default().to_owned()),
        }
    }
    fn consistency(&self) -> CfgResult<Consistency> {
        let name = self
            .lookup(CONSISTENCY_LEVEL)
            .map(|(_, v)| v.to_ascii_uppercase())
            .unwrap_or_default();
        types::consistency(&name).ok_or(ConfigError::UnknownConsistency(name))
    }
    fn port(&self) -> CfgResult<u16> {
        let (key, v) = self.lookup(PORT).unwrap_or_default();
        parse_num(&key, v, "a port number")
    }
}

/// Join `value` onto `base_dir` unless it is already absolute
fn resolve_path(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_owned()
    } else {
        base_dir.join(path)
    }
}

fn read_first_line(path: &Path) -> CfgResult<String> {
    let mut line = String::new();
    File::open(path)
        .and_then(|f| BufReader::new(f).read_line(&mut line))
        .map_err(|e| ConfigError::SecretsFile(path.to_owned(), e))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Resolve the settings of `adapter`. Returns `None` if the adapter is not enabled
///
/// `global` is the global tier of the current run, if any. Secrets files and cloud bundles are
/// looked up relative to `base_dir`.
pub fn resolve_adapter(
    raw: &RawConfig,
    adapter: Adapter,
    global: Option<&GlobalParams>,
    base_dir: &Path,
) -> CfgResult<Option<AdapterParams>> {
    if !is_truthy(raw.get(adapter.prefix())) {
        debug!("adapter {} is disabled", adapter.label());
        return Ok(None);
    }
    let scope = AdapterScope {
        raw,
        adapter,
        global,
    };
    let test_type = {
        let v = raw.get_or_default(TEST_TYPE).unwrap_or_default();
        parse_named(TEST_TYPE, v, TestType::parse, TestType::expected())?
    };
    Ok(Some(AdapterParams {
        adapter,
        test_type,
        bulk_list: scope.bulk_list(test_type)?,
        keyspace: scope.keyspace(),
        ip: split_list(&scope.string(IP)),
        port: scope.port()?,
        secure_connect_bundle: scope
            .optional(SECURE_CONNECT_BUNDLE)
            .map(|bundle| resolve_path(base_dir, &bundle)),
        username: scope.string(USERNAME),
        password: scope.password(base_dir)?,
        replication_class: scope.string(REPLICATION_CLASS),
        replication_factor: scope.string(REPLICATION_FACTOR),
        compaction: scope.optional(COMPACTION),
        compaction_params: scope.optional(COMPACTION_PARAMS),
        consistency_level: scope.consistency()?,
        local_dc: scope.string(LB_LOCAL_DC),
        label: scope.string(LABEL),
    }))
}
