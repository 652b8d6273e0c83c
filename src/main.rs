use anyhow::{Context, Result};
use notegraph::{DocumentRecord, Engine, EngineConfig, EngineEvent, LayoutKind};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let snapshot_path = args.next();
    let config = match args.next() {
        Some(path) => EngineConfig::load(&path).context("loading engine config")?,
        None => EngineConfig::default(),
    };

    let records: Vec<DocumentRecord> = match snapshot_path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading snapshot {path}"))?;
            serde_json::from_str(&text).context("parsing snapshot")?
        }
        None => demo_snapshot(),
    };

    let (engine, mut events) = Engine::new(config);
    let report = engine.rebuild(&records).await?;

    println!("notegraph v{}", notegraph::version());
    println!("==========================================");
    println!("Nodes:          {}", report.assignments.len());
    println!("Communities:    {}", report.community_count);
    println!("Modularity:     {:.4}", report.modularity);
    println!(
        "Moves:          {} across {} level(s)",
        report.move_count, report.level_count
    );
    println!("Delta computations: {}", report.delta_computations);
    println!("Resolution:     {}", report.resolution);

    if let Some(bounds) = engine.fit_request().await {
        println!("Layout bounds:  {:.1} x {:.1}", bounds.width(), bounds.height());
    }

    let centrality = engine.centrality_report().await;
    println!();
    println!("Top hubs:");
    for (key, score) in centrality.hubs.iter().take(5) {
        println!("  {key}: {score:.4}");
    }

    // Let overlap removal settle before exporting
    engine.start_layout(LayoutKind::Noverlap).await?;
    while let Some(event) = events.recv().await {
        if matches!(
            event,
            EngineEvent::LayoutStopped {
                kind: LayoutKind::Noverlap,
                ..
            }
        ) {
            break;
        }
    }

    println!();
    println!("{}", engine.export_graph().await?);
    engine.close().await;
    Ok(())
}

// A small sample collection for running without arguments
fn demo_snapshot() -> Vec<DocumentRecord> {
    let record = |id: &str, category: Option<&str>, links: &[&str]| DocumentRecord {
        id: id.to_string(),
        title: id.trim_end_matches(".md").rsplit('/').next().unwrap_or(id).to_string(),
        parent_category: category.map(str::to_string),
        is_all_caps_token: false,
        is_journal: false,
        link_targets: links.iter().map(|s| s.to_string()).collect(),
    };

    vec![
        record("People/alice.md", Some("People"), &["notes/graphs.md", "People/bob.md"]),
        record("People/bob.md", Some("People"), &["notes/graphs.md"]),
        record("notes/graphs.md", Some("notes"), &["notes/layouts.md", "notes/communities.md"]),
        record("notes/layouts.md", Some("notes"), &["notes/graphs.md"]),
        record("notes/communities.md", Some("notes"), &["notes/graphs.md", "notes/modularity.md"]),
        record("notes/modularity.md", Some("notes"), &["notes/communities.md"]),
        record("journal/2026-08-06.md", Some("journal"), &["People/alice.md", "notes/graphs.md"]),
    ]
}
