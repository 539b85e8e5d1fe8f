use anyhow::Context;
use cograph_core::config::AppConfig;
use cograph_core::entities::EntityDirectory;
use cograph_core::model::NetworkKind;
use ingestion::{load_documents, BuilderConfig, CooccurrenceBuilder};
use storage::{CentralityMeasure, CentralityScores, SnapshotStore};
use tracing::info;

const TOP_NODES: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Network kinds to build; all of them when none are named.
    let mut kinds = std::env::args()
        .skip(1)
        .map(|arg| arg.parse::<NetworkKind>())
        .collect::<Result<Vec<_>, _>>()?;
    if kinds.is_empty() {
        kinds = NetworkKind::ALL.to_vec();
    }

    let config = AppConfig::load().context("loading configuration")?;
    cograph_core::init_tracing(config.logging.json);

    let directory = EntityDirectory::load(&config.ingestion.entities_file)
        .with_context(|| format!("loading entities from {}", config.ingestion.entities_file))?;
    let documents = load_documents(&config.ingestion.documents_file)
        .with_context(|| format!("loading documents from {}", config.ingestion.documents_file))?;
    info!(
        "Loaded {} entities and {} documents",
        directory.len(),
        documents.len()
    );

    let builder = CooccurrenceBuilder::new(
        directory.all_entities(),
        BuilderConfig::from(&config.ingestion),
    );
    let store = SnapshotStore::new(&config.storage.data_dir);

    for (kind, graph) in builder.build_kinds(&kinds, &documents) {
        let centrality = CentralityScores::of(&graph);
        for measure in CentralityMeasure::ALL {
            let top: Vec<String> = centrality
                .top_nodes(measure, TOP_NODES)
                .into_iter()
                .map(|(id, score)| format!("{} ({:.4})", id, score))
                .collect();
            info!("Top {} {} centrality: {}", kind, measure, top.join(", "));
        }

        let path = store
            .save(kind, &graph)
            .await
            .with_context(|| format!("writing {} network", kind))?;
        info!("Wrote {} network to {}", kind, path.display());
    }

    Ok(())
}
