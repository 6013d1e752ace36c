use crate::config::MAX_UPLOAD_BYTES;
use crate::utils::error::BreedError;
use crate::Result;
use axum::body::Bytes;
use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::Path;

pub struct ImageLoader;

impl ImageLoader {
    /// 从base64字符串加载图像
    pub fn from_base64(base64_data: &str) -> Result<DynamicImage> {
        // 检测并移除可能的数据URL前缀 (data:image/xxx;base64,)
        let base64_clean = if base64_data.starts_with("data:") {
            base64_data.split(',').nth(1).unwrap_or(base64_data)
        } else {
            base64_data
        };

        // 解码base64
        let image_bytes = base64::engine::general_purpose::STANDARD
            .decode(base64_clean)
            .map_err(BreedError::Base64)?;

        Self::from_bytes(Bytes::from(image_bytes))
    }

    /// 从字节流加载图像
    pub fn from_bytes(bytes: Bytes) -> Result<DynamicImage> {
        // 检查文件大小
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(BreedError::FileTooLarge(bytes.len(), MAX_UPLOAD_BYTES));
        }

        // 可识别但不在允许列表内的格式直接拒绝
        if let Some(format) = Self::detect_format(&bytes) {
            if !Self::is_supported_format(format) {
                return Err(BreedError::UnsupportedFormat(format!(
                    "{:?}, supported formats: JPG/JPEG/PNG",
                    format
                )));
            }
        }

        let image = image::load_from_memory(&bytes).map_err(BreedError::ImageDecode)?;

        Self::validate_dimensions(&image)?;

        Ok(image)
    }

    /// 从文件路径加载图像（命令行单次分类用）
    pub fn from_path(path: &Path) -> Result<DynamicImage> {
        let bytes = std::fs::read(path).map_err(BreedError::Io)?;
        Self::from_bytes(Bytes::from(bytes))
    }

    /// 检测图像格式
    pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
        image::guess_format(bytes).ok()
    }

    /// 验证图像格式是否支持
    pub fn is_supported_format(format: ImageFormat) -> bool {
        matches!(format, ImageFormat::Jpeg | ImageFormat::Png)
    }

    /// 验证图像尺寸；任何 >=1x1 的图像都可以分类
    pub fn validate_dimensions(image: &DynamicImage) -> Result<()> {
        let (width, height) = image.dimensions();

        if width > 8192 || height > 8192 {
            return Err(BreedError::InvalidInput(format!(
                "Image too large: {}x{}, maximum 8192x8192",
                width, height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let img = RgbImage::new(width, height);
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        Bytes::from(buf.into_inner())
    }

    #[test]
    fn decodes_png_payload() {
        let image = ImageLoader::from_bytes(png_bytes(4, 3)).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
    }

    #[test]
    fn rejects_oversized_payload() {
        let bytes = Bytes::from(vec![0u8; MAX_UPLOAD_BYTES + 1]);
        let err = ImageLoader::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, BreedError::FileTooLarge(_, _)));
    }

    #[test]
    fn rejects_format_outside_allowlist() {
        // GIF 魔数足以触发格式探测
        let bytes = Bytes::from_static(b"GIF89a\x01\x00\x01\x00\x00\x00\x00");
        let err = ImageLoader::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, BreedError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_undecodable_bytes() {
        let bytes = Bytes::from_static(b"definitely not an image");
        let err = ImageLoader::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, BreedError::ImageDecode(_)));
    }

    #[test]
    fn strips_data_url_prefix() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(2, 2));
        let data_url = format!("data:image/png;base64,{}", encoded);
        let image = ImageLoader::from_base64(&data_url).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = ImageLoader::from_base64("!!!not base64!!!").unwrap_err();
        assert!(matches!(err, BreedError::Base64(_)));
    }
}
