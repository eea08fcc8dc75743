//! The stock: every concrete asset, constructed once and wired by handle
//!
//! Families are established in dependency order so each one can only refer
//! to handles that already exist in the graph.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::ports::Provisioner;
use crate::domain::services::AssetGraph;
use crate::domain::value_objects::{AssetId, Environment, Target};

use super::cluster::ClusterStock;
use super::ignition::{Bootstrap, BootstrapDeps};
use super::installconfig::InstallConfigStock;
use super::kubeconfig::KubeconfigStock;
use super::tls::TlsStock;

/// External collaborators the stock hands to its assets
#[derive(Clone)]
pub struct StockContext {
    pub environment: Arc<Environment>,
    pub provisioner: Arc<dyn Provisioner>,
    pub templates_dir: Option<PathBuf>,
}

/// Fixed asset graph for one run
pub struct Stock {
    graph: AssetGraph,
    pub install_config: InstallConfigStock,
    pub tls: TlsStock,
    pub kubeconfig: KubeconfigStock,
    pub bootstrap: AssetId,
    pub cluster: ClusterStock,
}

impl Stock {
    pub fn establish(context: StockContext) -> Self {
        let mut graph = AssetGraph::new();

        let install_config = InstallConfigStock::establish(&mut graph, &context.environment);
        let ic = install_config.install_config;
        let tls = TlsStock::establish(&mut graph, ic);
        let kubeconfig = KubeconfigStock::establish(&mut graph, ic, &tls);
        let bootstrap = graph.add(Bootstrap::new(BootstrapDeps {
            install_config: ic,
            tls,
            kubeconfigs: kubeconfig,
        }));
        let cluster = ClusterStock::establish(
            &mut graph,
            ic,
            bootstrap,
            kubeconfig.admin,
            context.provisioner,
            context.templates_dir,
        );

        tracing::debug!(assets = graph.len(), "established asset stock");

        Self {
            graph,
            install_config,
            tls,
            kubeconfig,
            bootstrap,
            cluster,
        }
    }

    pub fn graph(&self) -> &AssetGraph {
        &self.graph
    }

    /// Root assets to resolve for `target`
    pub fn roots(&self, target: Target) -> Vec<AssetId> {
        match target {
            Target::InstallConfig => vec![self.install_config.install_config],
            Target::Tls => self.tls.all().to_vec(),
            Target::Kubeconfig => vec![self.kubeconfig.admin, self.kubeconfig.kubelet],
            Target::Ignition => vec![self.bootstrap],
            Target::Cluster => vec![self.cluster.cluster],
        }
    }
}

impl std::fmt::Debug for Stock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stock")
            .field("graph", &self.graph)
            .field("bootstrap", &self.bootstrap)
            .finish_non_exhaustive()
    }
}
