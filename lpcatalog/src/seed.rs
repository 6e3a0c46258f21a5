//! Chargement initial du catalogue depuis un fichier CSV.
//!
//! Format : une ligne d'en-tête ignorée, puis une ligne `Titre,Artiste` par
//! morceau. Les virgules entre guillemets ne séparent pas les champs.

use std::path::Path;

use anyhow::{Context, bail};
use tracing::{info, warn};

use crate::catalog::SongCatalog;
use crate::song::{Song, SongMetadata};

/// Découpe une ligne CSV en respectant les guillemets
///
/// Les guillemets sont retirés et chaque champ est débarrassé des espaces
/// en bordure. Un dernier champ vide n'est pas retourné.
fn quote_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut buffer = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut buffer).trim().to_string()),
            _ => buffer.push(c),
        }
    }

    if !buffer.trim().is_empty() {
        fields.push(buffer.trim().to_string());
    }
    fields
}

/// Lit le contenu CSV et retourne les morceaux dans l'ordre du fichier
pub fn parse_songs_csv(content: &str) -> anyhow::Result<Vec<SongMetadata>> {
    let mut songs = Vec::new();

    for (number, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields = quote_split(line);
        let [title, artist] = fields.as_slice() else {
            bail!(
                "Invalid CSV line {}: expected 2 fields, found {}",
                number + 1,
                fields.len()
            );
        };
        songs.push(SongMetadata::new(artist.clone(), title.clone()));
    }

    Ok(songs)
}

/// Charge les morceaux du fichier dans le catalogue
///
/// Retourne le nombre de morceaux ajoutés. Un fichier absent n'est pas une
/// erreur : le catalogue reste vide.
pub async fn seed_songs(catalog: &SongCatalog, path: &Path) -> anyhow::Result<usize> {
    if !path.exists() {
        warn!(file = %path.display(), "Songs file not found, catalog left empty");
        return Ok(0);
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read songs file {}", path.display()))?;
    let rows = parse_songs_csv(&content)
        .with_context(|| format!("Cannot parse songs file {}", path.display()))?;

    let mut count = 0;
    for metadata in rows {
        if catalog.create(Song::new(metadata)).await {
            count += 1;
        }
    }

    info!(file = %path.display(), count, "Songs loaded");
    Ok(count)
}
