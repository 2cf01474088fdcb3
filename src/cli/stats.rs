use anyhow::Result;

use crate::models::Dossier;
use crate::store::DossierStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionStats {
    pub count: usize,
    /// Mean over dossiers with friendliness above 0, one decimal
    pub average_friendliness: Option<f64>,
    pub with_photo: usize,
}

pub fn collection_stats(dossiers: &[Dossier]) -> CollectionStats {
    let levels: Vec<u8> = dossiers
        .iter()
        .filter_map(|d| d.friendliness_level)
        .filter(|&n| n > 0)
        .collect();

    let average_friendliness = if levels.is_empty() {
        None
    } else {
        let sum: u32 = levels.iter().map(|&n| u32::from(n)).sum();
        let mean = f64::from(sum) / levels.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    CollectionStats {
        count: dossiers.len(),
        average_friendliness,
        with_photo: dossiers.iter().filter(|d| d.has_photo()).count(),
    }
}

/// Execute the stats command
pub fn run_stats(store: &dyn DossierStore) -> Result<()> {
    let stats = collection_stats(&store.load()?);

    println!("dossiers: {}", stats.count);
    match stats.average_friendliness {
        Some(avg) => println!("average friendliness: {:.1}", avg),
        None => println!("average friendliness: —"),
    }
    println!("with photo: {}", stats.with_photo);
    Ok(())
}
