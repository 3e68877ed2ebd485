/*
 * Created on Sat Sep 19 2026
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
    crate::config::{AdapterParams, DiagnoseLevel},
    scylla::{transport::topology::Strategy, Session},
    std::collections::BTreeSet,
};

/// A printable summary of a cluster's topology and schema
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClusterSummary {
    pub nodes: Vec<NodeSummary>,
    pub keyspaces: Vec<KeyspaceSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    pub address: String,
    pub datacenter: Option<String>,
    pub rack: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyspaceSummary {
    pub name: String,
    pub strategy: String,
    pub tables: usize,
}

impl ClusterSummary {
    /// Take a snapshot of the cluster metadata known to `session`
    pub fn collect(session: &Session) -> Self {
        let data = session.get_cluster_data();
        let nodes = data
            .get_nodes_info()
            .iter()
            .map(|node| NodeSummary {
                address: format!("{}:{}", node.address.ip(), node.address.port()),
                datacenter: node.datacenter.clone(),
                rack: node.rack.clone(),
            })
            .collect();
        let mut keyspaces: Vec<KeyspaceSummary> = data
            .get_keyspace_info()
            .iter()
            .map(|(name, ks)| KeyspaceSummary {
                name: name.clone(),
                strategy: describe_strategy(&ks.strategy),
                tables: ks.tables.len(),
            })
            .collect();
        keyspaces.sort_by(|a, b| a.name.cmp(&b.name));
        Self { nodes, keyspaces }
    }
    pub fn datacenters(&self) -> BTreeSet<&str> {
        self.nodes
            .iter()
            .filter_map(|n| n.datacenter.as_deref())
            .collect()
    }
    /// Render the summary at the given level. `Off` renders nothing
    pub fn render(&self, adapter: &str, level: DiagnoseLevel) -> Vec<String> {
        let mut lines = Vec::new();
        if level == DiagnoseLevel::Off {
            return lines;
        }
        let dcs: Vec<&str> = self.datacenters().into_iter().collect();
        lines.push(format!(
            "{adapter}: {} node(s) in datacenter(s) [{}]",
            self.nodes.len(),
            dcs.join(", ")
        ));
        if matches!(level, DiagnoseLevel::Full | DiagnoseLevel::Extra) {
            for node in &self.nodes {
                lines.push(format!(
                    "  node {} dc={} rack={}",
                    node.address,
                    node.datacenter.as_deref().unwrap_or("?"),
                    node.rack.as_deref().unwrap_or("?")
                ));
            }
        }
        if level == DiagnoseLevel::Extra {
            for ks in &self.keyspaces {
                lines.push(format!(
                    "  keyspace {} {} tables={}",
                    ks.name, ks.strategy, ks.tables
                ));
            }
        }
        lines
    }
}

fn describe_strategy(strategy: &Strategy) -> String {
    match strategy {
        Strategy::SimpleStrategy { replication_factor } => {
            format!("SimpleStrategy(rf={replication_factor})")
        }
        Strategy::NetworkTopologyStrategy {
            datacenter_repfactors,
        } => {
            let mut dcs: Vec<String> = datacenter_repfactors
                .iter()
                .map(|(dc, rf)| format!("{dc}={rf}"))
                .collect();
            dcs.sort();
            format!("NetworkTopologyStrategy({})", dcs.join(", "))
        }
        Strategy::LocalStrategy => "LocalStrategy".to_owned(),
        Strategy::Other { name, .. } => name.clone(),
    }
}

/// Print a cluster summary for `params` at `level`
pub fn diagnose(session: &Session, params: &AdapterParams, level: DiagnoseLevel) {
    for line in ClusterSummary::collect(session).render(params.adapter.label(), level) {
        info!("{line}");
    }
}
