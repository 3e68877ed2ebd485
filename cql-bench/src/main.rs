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

#[macro_use]
extern crate log;

use {
    clap::Parser,
    cql_bench::{cli::Cli, runner},
    env_logger::Builder,
    std::{env, process},
};

fn main() {
    Builder::new()
        .parse_filters(&env::var("CQLBENCH_LOG").unwrap_or_else(|_| "info".to_owned()))
        .init();
    println!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let opts = Cli::parse().command.into_options();
    if let Err(e) = runner::run(&opts) {
        error!("cql-bench failed with: {e}");
        process::exit(0x01);
    }
    info!("finished");
}
