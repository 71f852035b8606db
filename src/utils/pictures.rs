use image::DynamicImage;
use rand::Rng;
use std::path::Path;
use thiserror::Error;

/// Profile pictures are shrunk to fit inside a square of this many pixels.
pub const THUMBNAIL_SIZE: u32 = 125;

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Error)]
pub enum PictureError {
    #[error("could not decode picture: {0}")]
    Image(#[from] image::ImageError),
    #[error("could not store picture: {0}")]
    Io(#[from] std::io::Error),
}

/// Lower-cased extension of an uploaded file name, if it is one we accept.
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

pub fn random_file_name(extension: &str) -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}.{}", hex, extension)
}

/// Fits the image inside THUMBNAIL_SIZE x THUMBNAIL_SIZE keeping its aspect ratio.
/// Images that already fit are left alone.
pub fn thumbnail(img: DynamicImage) -> DynamicImage {
    if img.width() <= THUMBNAIL_SIZE && img.height() <= THUMBNAIL_SIZE {
        img
    } else {
        img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
    }
}

/// Decodes the upload at `source`, thumbnails it and writes it into `dir`
/// under a fresh random name. Returns the stored file name.
///
/// Blocking; run it off the async workers.
pub fn save_picture(source: &Path, extension: &str, dir: &Path) -> Result<String, PictureError> {
    let img = image::io::Reader::open(source)?
        .with_guessed_format()?
        .decode()?;
    let mut img = thumbnail(img);
    if extension != "png" {
        // jpeg has no alpha channel
        img = DynamicImage::ImageRgb8(img.to_rgb8());
    }

    std::fs::create_dir_all(dir)?;
    let file_name = random_file_name(extension);
    img.save(dir.join(&file_name))?;

    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn write_png(path: &Path, width: u32, height: u32) {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        std::fs::write(path, buf).unwrap();
    }

    #[test]
    fn accepts_only_known_extensions() {
        assert_eq!(allowed_extension("me.PNG"), Some("png".to_string()));
        assert_eq!(allowed_extension("me.jpeg"), Some("jpeg".to_string()));
        assert_eq!(allowed_extension("me.gif"), None);
        assert_eq!(allowed_extension("noext"), None);
    }

    #[test]
    fn random_names_keep_extension() {
        let name = random_file_name("jpg");

        assert_eq!(name.len(), 16 + 4);
        assert!(name.ends_with(".jpg"));
        assert!(name[..16].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(name, random_file_name("jpg"));
    }

    #[test]
    fn large_images_shrink_to_fit() {
        let img = thumbnail(DynamicImage::ImageRgb8(RgbImage::new(500, 250)));

        assert_eq!(img.width(), THUMBNAIL_SIZE);
        assert!(img.height() <= THUMBNAIL_SIZE);
        assert!(img.height() >= 60 && img.height() <= 65);
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let img = thumbnail(DynamicImage::ImageRgb8(RgbImage::new(40, 30)));

        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn save_picture_writes_a_thumbnail() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = tmp.path().join("upload");
        write_png(&upload, 300, 600);
        let out_dir = tmp.path().join("profile_pics");

        let name = save_picture(&upload, "jpg", &out_dir).unwrap();

        let (width, height) = image::image_dimensions(out_dir.join(&name)).unwrap();
        assert_eq!(height, THUMBNAIL_SIZE);
        assert!(width <= THUMBNAIL_SIZE);
    }

    #[test]
    fn save_picture_rejects_non_images() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = tmp.path().join("upload");
        std::fs::write(&upload, b"definitely not a picture").unwrap();

        let result = save_picture(&upload, "png", tmp.path());

        assert!(matches!(result, Err(PictureError::Image(_))));
    }
}
