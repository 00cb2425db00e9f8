//! Image staging for the product dialogs

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use catalog_admin_products::{is_accepted_image_type, ImageFile, ACCEPTED_IMAGE_EXTENSIONS};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// An image shown in a dialog: already on the server, or picked locally
#[derive(Debug, Clone, PartialEq)]
pub enum StagedImage {
    Remote(String),
    Local(ImageFile),
}

/// What the dialog renders for one staged image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub label: String,
    pub src: String,
}

/// Encodes a local file as a `data:` URL so it can be shown without an upload
pub fn data_url(file: &ImageFile) -> String {
    format!("data:{};base64,{}", file.content_type, STANDARD.encode(&file.bytes))
}

/// Reads an image from disk
pub async fn load_image_file(path: &Path) -> Result<ImageFile> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| Error::validation(format!("{} is not a file", path.display())))?;

    let contents = tokio::fs::read(path).await?;
    debug!(file = %file_name, bytes = contents.len(), "loaded image");

    Ok(ImageFile::from_name(&file_name, contents)?)
}

/// Ordered list of images in a dialog, in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageStaging {
    images: Vec<StagedImage>,
}

impl ImageStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_remote<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: urls.into_iter().map(|url| StagedImage::Remote(url.into())).collect(),
        }
    }

    /// Stages a local file. Anything other than jpeg or png is refused.
    pub fn add_file(&mut self, file: ImageFile) -> Result<()> {
        if !is_accepted_image_type(&file.content_type) {
            return Err(Error::validation(format!(
                "{} has unsupported type {} (allowed formats: {})",
                file.file_name,
                file.content_type,
                ACCEPTED_IMAGE_EXTENSIONS.join(", ")
            )));
        }
        self.images.push(StagedImage::Local(file));
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<StagedImage> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedImage> {
        self.images.iter()
    }

    pub fn previews(&self) -> Vec<ImagePreview> {
        self.images
            .iter()
            .enumerate()
            .map(|(index, image)| match image {
                StagedImage::Remote(url) => ImagePreview {
                    label: format!("Uploaded {}", index),
                    src: url.clone(),
                },
                StagedImage::Local(file) => ImagePreview {
                    label: file.file_name.clone(),
                    src: data_url(file),
                },
            })
            .collect()
    }

    pub fn remote_urls(&self) -> Vec<String> {
        self.images
            .iter()
            .filter_map(|image| match image {
                StagedImage::Remote(url) => Some(url.clone()),
                StagedImage::Local(_) => None,
            })
            .collect()
    }

    pub fn local_files(&self) -> Vec<ImageFile> {
        self.images
            .iter()
            .filter_map(|image| match image {
                StagedImage::Local(file) => Some(file.clone()),
                StagedImage::Remote(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_preview() {
        let file = ImageFile::new("dot.png", mime::IMAGE_PNG, vec![1u8, 2, 3]);
        assert_eq!(data_url(&file), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_stage_and_remove() {
        let mut staging = ImageStaging::from_remote(["http://img/a.png"]);
        staging
            .add_file(ImageFile::new("b.jpg", mime::IMAGE_JPEG, vec![0xff]))
            .unwrap();
        staging
            .add_file(ImageFile::new("c.png", mime::IMAGE_PNG, vec![0x89]))
            .unwrap();

        let removed = staging.remove(1).unwrap();
        assert!(matches!(removed, StagedImage::Local(ref f) if f.file_name == "b.jpg"));
        assert!(staging.remove(5).is_none());

        let previews = staging.previews();
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].src, "http://img/a.png");
        assert!(previews[1].src.starts_with("data:image/png;base64,"));
        assert_eq!(staging.remote_urls(), vec!["http://img/a.png"]);
        assert_eq!(staging.local_files().len(), 1);
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let mut staging = ImageStaging::new();
        let result = staging.add_file(ImageFile::new("a.gif", mime::IMAGE_GIF, vec![0u8]));

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(staging.is_empty());
    }

    #[tokio::test]
    async fn test_load_image_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("shelf.jpeg");
        tokio::fs::write(&path, b"jpeg-bytes").await.unwrap();

        let file = load_image_file(&path).await.unwrap();
        assert_eq!(file.file_name, "shelf.jpeg");
        assert_eq!(file.content_type, mime::IMAGE_JPEG);
        assert_eq!(&file.bytes[..], b"jpeg-bytes");

        let text = temp_dir.path().join("notes.txt");
        tokio::fs::write(&text, b"hi").await.unwrap();
        assert!(matches!(
            load_image_file(&text).await,
            Err(Error::Products(_))
        ));

        assert!(matches!(
            load_image_file(&temp_dir.path().join("missing.png")).await,
            Err(Error::Io(_))
        ));
    }
}
