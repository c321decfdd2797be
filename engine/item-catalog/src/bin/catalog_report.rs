use item_catalog::ItemCatalog;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let catalog = match std::env::args().nth(1) {
        Some(path) => ItemCatalog::load_from_file(path).await?,
        None => ItemCatalog::builtin()?,
    };

    info!("Catalog loaded with {} items", catalog.len());

    println!("\nTop 10 Items by Standard Value:");
    println!("Rank Name                 Rarity     Demand Standard       Permanent");
    println!("----------------------------------------------------------------------");

    for (i, item) in catalog.top_items(10).iter().enumerate() {
        println!(
            "{:4} {:20} {:10} {:6} {:14} {:14}",
            i + 1,
            item.name,
            item.rarity.to_string(),
            item.demand,
            item.standard_value,
            item.permanent_value
        );
    }

    println!("\nIn stock:");
    for item in catalog.in_stock() {
        println!("  {} ({})", item.name, item.rarity);
    }

    Ok(())
}
