//! Shared helpers for fragment integration tests
#![allow(dead_code)]

use std::io::Cursor;

use ::common::fragment::{Fragment, NewFragment};
use image::{ImageFormat, Rgba, RgbaImage};
use store::{DurableBackend, Store};
use tempfile::TempDir;

/// One store per backend; keep the `TempDir` alive for the local one.
pub async fn stores() -> (Vec<Store>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let stores = vec![
        Store::memory(),
        Store::new(DurableBackend::new_ephemeral().await.unwrap()),
        Store::new(DurableBackend::new_local(temp_dir.path()).await.unwrap()),
    ];
    (stores, temp_dir)
}

/// Create and save a fragment with `data`.
pub async fn saved_fragment(store: &Store, owner: &str, fragment_type: &str, data: &[u8]) -> Fragment {
    let mut fragment = Fragment::new(NewFragment::new(owner, fragment_type)).unwrap();
    fragment.save(store).await.unwrap();
    fragment.set_data(store, data.to_vec()).await.unwrap();
    fragment
}

/// A small opaque red PNG.
pub fn red_png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
