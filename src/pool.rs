// pool.rs: image pool discovery and background decoding
//
// The pool is listed synchronously so the tile layout can be built once at
// startup; pixels arrive later over a channel as each file decodes.

use dome_gallery::ImageRef;
use image::io::Reader as ImageReader;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

const EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Longest edge of an uploaded tile texture.
const MAX_TILE_EDGE: u32 = 512;

pub struct DecodedImage {
    pub src: String,
    pub rgba: image::RgbaImage,
}

/// Pick the image directory:
/// 1) `--images <dir>`
/// 2) `DOME_IMAGES`
/// 3) folder picker
pub fn resolve_images_dir() -> Option<PathBuf> {
    let mut it = std::env::args();
    while let Some(a) = it.next() {
        if a == "--images" {
            if let Some(v) = it.next() {
                return Some(PathBuf::from(v));
            }
        }
    }

    if let Ok(v) = std::env::var("DOME_IMAGES") {
        if !v.trim().is_empty() {
            return Some(PathBuf::from(v));
        }
    }

    rfd::FileDialog::new()
        .set_title(&crate::i18n::tr("dialog.pick_folder"))
        .pick_folder()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Image files directly under `dir`, sorted by file name.
pub fn discover_images(dir: &Path) -> std::io::Result<Vec<ImageRef>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image(p))
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|p| {
            let alt = p
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            ImageRef::new(p.to_string_lossy().into_owned()).with_alt(alt)
        })
        .collect())
}

/// Decode every pool entry on a worker thread, downscaled for tile use.
pub fn start_decoding(pool: Vec<ImageRef>, tx: Sender<DecodedImage>) {
    thread::spawn(move || {
        for image in pool {
            let Some(rgba) = decode(Path::new(&image.src)) else {
                continue;
            };
            if tx.send(DecodedImage { src: image.src, rgba }).is_err() {
                log::warn!("{}", crate::i18n::tr("error.send_to_main_failed"));
                return;
            }
        }
    });
}

fn decode(path: &Path) -> Option<image::RgbaImage> {
    log::info!(
        "{}",
        crate::i18n::tr_with("log.loading_image_bg", &[("path", format!("{:?}", path))])
    );

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::error!(
                "{}",
                crate::i18n::tr_with("error.open_file", &[("err", e.to_string())])
            );
            return None;
        }
    };

    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|mut r| {
            r.no_limits();
            r.decode()
        });

    match img {
        Ok(img) => Some(img.thumbnail(MAX_TILE_EDGE, MAX_TILE_EDGE).to_rgba8()),
        Err(e) => {
            log::error!(
                "{}",
                crate::i18n::tr_with("error.decode_image", &[("err", e.to_string())])
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(is_image(Path::new("a/Dome-9.JPG")));
        assert!(is_image(Path::new("Dome-11.PNG")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("no_extension")));
    }

    #[test]
    fn discovery_sorts_and_filters() {
        let dir = std::env::temp_dir().join(format!("dome_pool_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["b.png", "a.jpeg", "readme.md"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }

        let pool = discover_images(&dir).unwrap();
        let names: Vec<_> = pool.iter().map(|i| i.alt.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
