//! Uploaded Image

use std::fmt;

/// Image bytes received with a product, not yet stored
#[derive(Clone)]
pub struct ImageUpload {
    /// Client-supplied file name; sanitized before it touches storage
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Last path component of the client's name, restricted to
    /// `[A-Za-z0-9._-]`. Never empty and never a dot-only name.
    pub fn safe_file_name(&self) -> String {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();

        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .take(100)
            .collect();

        if cleaned.chars().all(|c| c == '.' || c == '_') {
            "image".to_string()
        } else {
            cleaned
        }
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> ImageUpload {
        ImageUpload::new(name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(named("photo.png").safe_file_name(), "photo.png");
        assert_eq!(named("../../etc/passwd").safe_file_name(), "passwd");
        assert_eq!(named("C:\\Users\\me\\cat pic.jpg").safe_file_name(), "cat_pic.jpg");
        assert_eq!(named("..").safe_file_name(), "image");
        assert_eq!(named("").safe_file_name(), "image");
        assert_eq!(named("dir/").safe_file_name(), "image");
    }

    #[test]
    fn test_debug_omits_bytes() {
        let debug = format!("{:?}", named("a.png"));
        assert!(debug.contains("len: 3"));
    }
}
