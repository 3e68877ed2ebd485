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

use {
    crate::{
        config::DiagnoseLevel,
        runner::{RunOptions, Task},
    },
    clap::{Args, Parser, Subcommand},
    std::path::PathBuf,
};

const HELP_TEMPLATE: &str = r#"
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
"#;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about=None, help_template=HELP_TEMPLATE)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the performance tests of every enabled adapter
    Run(EnvArgs),
    /// Only print cluster diagnostics for every enabled adapter
    Diagnose {
        #[command(flatten)]
        env: EnvArgs,
        #[arg(
            short,
            long,
            help = "Sets the diagnostic level (off, short, full or extra)",
            value_name = "LEVEL",
            default_value = "short",
            value_parser = parse_level
        )]
        level: DiagnoseLevel,
    },
}

#[derive(Args, Debug, PartialEq)]
pub struct EnvArgs {
    #[arg(
        short,
        long,
        help = "Sets the environment file to load from <DIR>/config",
        value_name = "FILE",
        default_value = "cass.env"
    )]
    pub env: String,
    #[arg(
        short,
        long,
        help = "Sets the base directory holding config/ and output/",
        value_name = "DIR",
        default_value = "."
    )]
    pub dir: PathBuf,
}

fn parse_level(s: &str) -> Result<DiagnoseLevel, String> {
    DiagnoseLevel::parse(s)
        .ok_or_else(|| format!("expected one of {}", DiagnoseLevel::expected()))
}

impl Command {
    pub fn into_options(self) -> RunOptions {
        match self {
            Self::Run(EnvArgs { env, dir }) => RunOptions {
                env,
                dir,
                task: Task::Run,
            },
            Self::Diagnose {
                env: EnvArgs { env, dir },
                level,
            } => RunOptions {
                env,
                dir,
                task: Task::Diagnose(level),
            },
        }
    }
}
