//! Application Configuration
//!
//! Configuration for the Shop application layer.

use kernel::hypermedia::BaseUrl;

use crate::domain::value_object::image::ImageUpload;
use crate::error::{ShopError, ShopResult};

/// 1280 * 1280 * 5 bytes
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 1280 * 1280 * 5;

/// Content types accepted for product images
pub const DEFAULT_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// Shop application configuration
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Public base URL for links
    pub base_url: BaseUrl,
    /// Upper bound for one uploaded image
    pub max_image_bytes: usize,
    /// Allowed image content types
    pub allowed_image_types: Vec<String>,
    /// Require a token on product mutations, not only on creation
    pub strict_auth: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            allowed_image_types: DEFAULT_IMAGE_TYPES.iter().map(|t| t.to_string()).collect(),
            strict_auth: true,
        }
    }
}

impl ShopConfig {
    /// Same as default. Kept for symmetry with `AuthConfig::development`.
    pub fn development() -> Self {
        Self::default()
    }

    /// Reject images with a disallowed type or over the size bound
    pub fn check_image(&self, image: &ImageUpload) -> ShopResult<()> {
        let content_type = image.content_type.to_ascii_lowercase();
        if !self.allowed_image_types.iter().any(|t| *t == content_type) {
            return Err(ShopError::validation(format!(
                "Unsupported image type '{}'; use jpeg or png",
                image.content_type
            )));
        }
        if image.len() > self.max_image_bytes {
            return Err(ShopError::validation(format!(
                "Image is larger than {} bytes",
                self.max_image_bytes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_image() {
        let config = ShopConfig {
            max_image_bytes: 4,
            ..ShopConfig::default()
        };

        assert!(config
            .check_image(&ImageUpload::new("a.png", "image/png", vec![0; 4]))
            .is_ok());
        assert!(config
            .check_image(&ImageUpload::new("a.jpg", "IMAGE/JPEG", vec![0; 1]))
            .is_ok());
        assert!(matches!(
            config.check_image(&ImageUpload::new("a.gif", "image/gif", vec![0; 1])),
            Err(ShopError::Validation(_))
        ));
        assert!(matches!(
            config.check_image(&ImageUpload::new("a.png", "image/png", vec![0; 5])),
            Err(ShopError::Validation(_))
        ));
    }
}
