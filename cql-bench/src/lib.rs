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

//! # cql-bench
//!
//! A configuration-driven load generator for CQL clusters. Environment files are resolved into
//! typed per-adapter settings (see [`config`]), after which every enabled adapter is diagnosed
//! and benchmarked with synthetic reads or writes driven by [`libstress`].

#[macro_use]
extern crate log;

pub mod cli;
pub mod config;
pub mod diagnose;
pub mod error;
pub mod report;
pub mod runner;
pub mod session;
pub mod workload;
