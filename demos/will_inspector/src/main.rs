//! Will Inspector
//!
//! Decodes a JSON dump of raw contract wills and prints them as the will
//! list would show them.
//!
//! ```text
//! will_inspector [WILLS_JSON] [SEARCH]
//! ```
//!
//! `WILLCHAIN_CONFIG` points at a RON config file; `RUST_LOG` controls
//! decode warnings (e.g. `RUST_LOG=willchain_core=warn`).

use std::env;
use std::error::Error;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;
use willchain_core::{ChainWillStruct, WillNormalizer, WillQuery, WillStatus, WillchainConfig};

const DEFAULT_WILLS: &str = "demos/will_inspector/data/wills.json";

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let wills_path = args.next().unwrap_or_else(|| DEFAULT_WILLS.to_string());
    let search = args.next();

    let config = match env::var("WILLCHAIN_CONFIG") {
        Ok(path) => {
            info!(%path, "loading config");
            WillchainConfig::load_file(&path)?
        }
        Err(_) => WillchainConfig::default(),
    };

    let raws: Vec<ChainWillStruct> = serde_json::from_str(&fs::read_to_string(&wills_path)?)?;
    let normalizer = WillNormalizer::new(config);
    let book = normalizer.decode_all(&raws);
    info!(count = book.len(), path = %wills_path, "decoded wills");

    let mut query = WillQuery::new();
    if let Some(search) = search {
        query = query.with_search(search);
    }

    println!("=== Will Inspector ===\n");
    println!(
        "{:<8} {:<16} {:<14} {:<18} {:<10} Beneficiaries",
        "ID", "Asset", "Category", "Release", "Status"
    );
    for will in book.query(&query) {
        let beneficiaries: Vec<String> = will
            .beneficiaries
            .iter()
            .map(|b| format!("{} {}%", b.name, b.share))
            .collect();
        println!(
            "{:<8} {:<16} {:<14} {:<18} {:<10} {}",
            will.will_id.raw(),
            will.asset_name,
            will.asset_category,
            will.release_display,
            will.status.label(),
            beneficiaries.join(", "),
        );
    }

    println!();
    for status in [
        WillStatus::Active,
        WillStatus::Pending,
        WillStatus::Executed,
        WillStatus::Verified,
    ] {
        println!("{:<9} {}", format!("{status}:"), book.count_by_status(status));
    }
    if book.requires_registrar_review() {
        println!("\nAt least one will needs registrar review.");
    }

    Ok(())
}
