//! Cover thumbnails for the inventory table.
//!
//! Each cover path is fetched and decoded once per visit to the tab on a
//! tokio task; the frame loop uploads finished images as textures. A cover
//! that fails to load is remembered so it is not fetched again every frame.

use std::collections::HashMap;

use eframe::egui;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::api::{ApiClient, ApiError};
use crate::task::{PollResult, poll_task};

/// Longest side of a decoded thumbnail, in pixels
pub const THUMBNAIL_SIZE: u32 = 64;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Cannot decode cover: {0}")]
    Decode(#[from] image::ImageError),
}

/// What the table can show for a cover right now
pub enum Cover<'a> {
    Loading,
    Ready(&'a egui::TextureHandle),
    Unavailable,
}

enum Slot {
    Pending(Option<JoinHandle<Result<egui::ColorImage, CoverError>>>),
    Ready(egui::TextureHandle),
    Failed,
}

/// Thumbnails keyed by cover path
#[derive(Default)]
pub struct CoverCache {
    slots: HashMap<String, Slot>,
}

impl CoverCache {
    /// Start loading `path` unless it is already known
    pub fn request(&mut self, client: &ApiClient, path: &str) {
        if self.slots.contains_key(path) {
            return;
        }
        let task = tokio::spawn(load(client.clone(), path.to_string()));
        self.slots.insert(path.to_string(), Slot::Pending(Some(task)));
    }

    pub fn get(&self, path: &str) -> Cover<'_> {
        match self.slots.get(path) {
            None | Some(Slot::Pending(_)) => Cover::Loading,
            Some(Slot::Ready(texture)) => Cover::Ready(texture),
            Some(Slot::Failed) => Cover::Unavailable,
        }
    }

    /// Upload finished thumbnails; returns how many are still loading
    pub fn poll(&mut self, ctx: &egui::Context) -> usize {
        let mut pending = 0;
        for (path, slot) in self.slots.iter_mut() {
            let Slot::Pending(task) = slot else { continue };
            match poll_task(task) {
                PollResult::Pending => pending += 1,
                PollResult::Complete(Ok(Ok(image))) => {
                    let texture = ctx.load_texture(path.as_str(), image, egui::TextureOptions::LINEAR);
                    *slot = Slot::Ready(texture);
                }
                PollResult::Complete(Ok(Err(e))) => {
                    tracing::debug!("Cover {} unavailable: {}", path, e);
                    *slot = Slot::Failed;
                }
                PollResult::Complete(Err(e)) => {
                    tracing::warn!("Cover task for {} failed: {}", path, e);
                    *slot = Slot::Failed;
                }
                PollResult::NoTask => *slot = Slot::Failed,
            }
        }
        pending
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Abort loads in flight and drop every texture
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            if let Slot::Pending(Some(task)) = slot {
                task.abort();
            }
        }
        self.slots.clear();
    }
}

async fn load(client: ApiClient, path: String) -> Result<egui::ColorImage, CoverError> {
    let bytes = client.cover(&path).await?;
    Ok(decode_thumbnail(&bytes)?)
}

/// Decode an image and shrink it to thumbnail size, keeping the aspect ratio
pub fn decode_thumbnail(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let image = image::load_from_memory(bytes)?
        .thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
        .into_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::from_pixel(width, height, image::Rgba([200, 120, 40, 255]))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_thumbnail_keeps_aspect_ratio() {
        let image = decode_thumbnail(&png(300, 150)).unwrap();
        assert_eq!(image.size, [64, 32]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(decode_thumbnail(b"<html>404</html>").is_err());
    }
}
