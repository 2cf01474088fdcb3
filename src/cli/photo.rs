use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::cli::display::photo_summary;
use crate::cli::ui::find_dossier;
use crate::store::DossierStore;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Execute the photo command - set or clear a dossier's photo
pub fn run_photo(
    store: &dyn DossierStore,
    identifier: &str,
    image_path: Option<&Path>,
    url: Option<&str>,
    clear: bool,
) -> Result<()> {
    if identifier.trim().is_empty() {
        return Err(anyhow!("Dossier identifier cannot be empty."));
    }

    let Some(mut dossier) = find_dossier(store, identifier)? else {
        println!("No dossier found.");
        return Ok(());
    };

    let photo = if clear {
        None
    } else if let Some(url) = url {
        let url = url.trim();
        if url.is_empty() {
            return Err(anyhow!("Photo URL cannot be empty."));
        }
        Some(url.to_string())
    } else if let Some(path) = image_path {
        Some(image_data_url(path)?)
    } else {
        // Show current photo status
        match dossier.photo.as_deref().filter(|p| !p.is_empty()) {
            Some(photo) => println!("{}: {}", dossier.full_name, photo_summary(photo)),
            None => println!("{}: no photo", dossier.full_name),
        }
        return Ok(());
    };

    let cleared = photo.is_none();
    dossier.photo = photo;
    dossier.updated_at = chrono::Utc::now();
    store.upsert(&dossier)?;

    if cleared {
        println!("Photo cleared for {}.", dossier.full_name);
    } else {
        println!("Photo set for {}.", dossier.full_name);
    }
    Ok(())
}

/// Read an image file, validate it and re-encode it as an inline JPEG data URL
pub fn image_data_url(source: &Path) -> Result<String> {
    if !source.exists() {
        return Err(anyhow!("Image file not found: {}", source.display()));
    }

    let img = image::open(source).map_err(|e| anyhow!("Invalid image file: {}", e))?;

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut bytes: Vec<u8> = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .map_err(|e| anyhow!("Failed to encode photo: {}", e))?;

    Ok(format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(&bytes)))
}
