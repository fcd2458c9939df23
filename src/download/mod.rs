mod client;
mod image;
mod index;
mod pack;
pub mod progress;
pub mod utils;

pub use client::StickerClient;
pub use image::DownloadedFile;
pub use pack::{ErrorPolicy, PackOptions, PackReport, download_pack};
