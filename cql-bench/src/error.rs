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

use {
    crate::config::ConfigError,
    libstress::ExecutorError,
    scylla::transport::errors::{NewSessionError, QueryError},
    std::{fmt, io},
};

pub type BenchResult<T> = Result<T, BenchError>;

/// Benchmark tool errors
#[derive(Debug)]
pub enum BenchError {
    /// An error originating from the configuration
    Config(ConfigError),
    /// The driver failed to open a session
    Session(NewSessionError),
    /// The cloud bundle could not be used
    Cloud(String),
    /// A statement failed
    Query(QueryError),
    /// The executor failed
    Executor(Box<ExecutorError<BenchError>>),
    /// An I/O error
    Io(io::Error),
    /// A report could not be serialized
    Report(serde_json::Error),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Session(e) => write!(f, "failed to connect: {e}"),
            Self::Cloud(e) => write!(f, "cloud bundle error: {e}"),
            Self::Query(e) => write!(f, "query failed: {e}"),
            Self::Executor(e) => write!(f, "executor error: {e}"),
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Report(e) => write!(f, "report error: {e}"),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for BenchError {
                fn from(e: $ty) -> Self {
                    Self::$variant(e)
                }
            }
        )*
    };
}

impl_from! {
    ConfigError => Config,
    NewSessionError => Session,
    QueryError => Query,
    io::Error => Io,
    serde_json::Error => Report,
}

impl From<ExecutorError<BenchError>> for BenchError {
    fn from(e: ExecutorError<BenchError>) -> Self {
        Self::Executor(Box::new(e))
    }
}
