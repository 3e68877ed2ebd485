/*
 * Created on Sun Sep 13 2026
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
    super::literal::LiteralError,
    std::{fmt, io, path::PathBuf},
};

/// An error raised while loading or resolving a configuration
#[derive(Debug)]
pub enum ConfigError {
    /// the environment file could not be read or parsed
    EnvFile(PathBuf, dotenvy::Error),
    /// a list-valued key holds a malformed literal
    Literal(String, LiteralError),
    /// a key holds a value of the wrong shape
    BadValue {
        key: String,
        value: String,
        expected: &'static str,
    },
    /// the consistency level name is not known to the driver
    UnknownConsistency(String),
    /// the secrets file named by a password key could not be read
    SecretsFile(PathBuf, io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvFile(path, e) => {
                write!(f, "failed to load environment file `{}`: {e}", path.display())
            }
            Self::Literal(key, e) => write!(f, "syntax error in `{key}`: {e}"),
            Self::BadValue {
                key,
                value,
                expected,
            } => write!(f, "bad value `{value}` for `{key}`. expected {expected}"),
            Self::UnknownConsistency(name) => write!(f, "unknown consistency level `{name}`"),
            Self::SecretsFile(path, e) => {
                write!(f, "failed to read secrets file `{}`: {e}", path.display())
            }
        }
    }
}
