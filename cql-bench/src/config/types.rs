/*
 * Created on Sat Sep 12 2026
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

use {scylla::statement::Consistency, std::fmt};

/// Generates a closed enum whose variants are spelled by a fixed name, parsed case-insensitively
macro_rules! named_enum {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vattr:meta])* $variant:ident = $repr:literal),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vattr])* $variant),*
        }
        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $repr),*
                }
            }
            pub fn parse(s: &str) -> Option<Self> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($repr) {
                        return Some(Self::$variant);
                    }
                )*
                None
            }
            /// Returns the accepted spellings joined by `|`
            pub fn expected() -> &'static str {
                concat!($($repr, "|"),*).trim_end_matches('|')
            }
        }
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_enum! {
    /// A target database product. The declaration order is the order in which adapters are run
    pub enum Adapter {
        CosmosDB = "COSMOSDB",
        ScyllaDB = "SCYLLADB",
        Cassandra = "CASSANDRA",
        AstraDB = "ASTRADB",
    }
}

impl Adapter {
    /// Returns the key prefix used by this adapter's settings
    pub const fn prefix(&self) -> &'static str {
        self.name()
    }
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CosmosDB => "CosmosDB",
            Self::ScyllaDB => "ScyllaDB",
            Self::Cassandra => "Cassandra",
            Self::AstraDB => "AstraDB",
        }
    }
    /// Returns true if keyspaces for this adapter are managed outside CQL
    pub const fn manages_keyspaces(&self) -> bool {
        matches!(self, Self::AstraDB)
    }
}

named_enum! {
    pub enum TestType {
        Read = "r",
        Write = "w",
    }
}

impl TestType {
    /// The tag used in output file names
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Read => "R",
            Self::Write => "W",
        }
    }
}

named_enum! {
    /// What graph data is written after a run
    pub enum GraphScope {
        Off = "Off",
        Perf = "Perf",
        Exec = "Exec",
        All = "All",
    }
}

impl GraphScope {
    pub const fn perf(&self) -> bool {
        matches!(self, Self::Perf | Self::All)
    }
    pub const fn exec(&self) -> bool {
        matches!(self, Self::Exec | Self::All)
    }
}

named_enum! {
    /// How much is printed about a cluster before it is tested
    pub enum DiagnoseLevel {
        Off = "Off",
        Short = "Short",
        Full = "Full",
        Extra = "Extra",
    }
}

/*
    consistency levels
*/

const CONSISTENCY_LEVELS: [(&str, Consistency); 11] = [
    ("ANY", Consistency::Any),
    ("ONE", Consistency::One),
    ("TWO", Consistency::Two),
    ("THREE", Consistency::Three),
    ("QUORUM", Consistency::Quorum),
    ("ALL", Consistency::All),
    ("LOCAL_QUORUM", Consistency::LocalQuorum),
    ("EACH_QUORUM", Consistency::EachQuorum),
    ("SERIAL", Consistency::Serial),
    ("LOCAL_SERIAL", Consistency::LocalSerial),
    ("LOCAL_ONE", Consistency::LocalOne),
];

/// Look up a consistency level by name. The name is matched case-insensitively
pub fn consistency(name: &str) -> Option<Consistency> {
    let name = name.trim();
    CONSISTENCY_LEVELS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, c)| *c)
}

/// Returns the canonical name of a consistency level
pub fn consistency_name(level: Consistency) -> &'static str {
    CONSISTENCY_LEVELS
        .iter()
        .find(|(_, c)| *c == level)
        .map(|(n, _)| *n)
        .unwrap_or("UNKNOWN")
}
