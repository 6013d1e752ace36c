use crate::Result;
use image::{imageops::FilterType, DynamicImage};
use ndarray::{Array3, Array4, Axis};

/// 模型输入边长
pub const IMAGE_SIZE: u32 = 224;

pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// 分类预处理流水线：任意尺寸/通道数的图像转为模型输入张量。
    /// 除以 255.0 是训练产物的绑定约定，不做均值方差归一化。
    pub fn preprocess(image: &DynamicImage) -> Result<Array4<f32>> {
        // 1. 等比缩放使短边吃满目标尺寸，长边居中裁剪（Lanczos重采样）
        let fitted = image.resize_to_fill(IMAGE_SIZE, IMAGE_SIZE, FilterType::Lanczos3);

        // 2. 统一为RGB：灰度图复制三通道，alpha通道丢弃
        let rgb = fitted.to_rgb8();

        // 3. 归一化到 [0,1] 并按 HWC 填充张量
        let array = Array3::from_shape_fn(
            (IMAGE_SIZE as usize, IMAGE_SIZE as usize, 3),
            |(y, x, c)| rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
        );

        // 4. 添加batch维度 -> (1, 224, 224, 3)
        Ok(array.insert_axis(Axis(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage, RgbaImage};

    fn assert_model_shape(tensor: &Array4<f32>) {
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn rgb_photo_becomes_unit_tensor() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(500, 300, Rgb([128, 64, 200])));
        let tensor = ImagePreprocessor::preprocess(&img).unwrap();
        assert_model_shape(&tensor);
    }

    #[test]
    fn grayscale_is_replicated_to_three_channels() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(50, 50, image::Luma([100])));
        let tensor = ImagePreprocessor::preprocess(&img).unwrap();
        assert_model_shape(&tensor);
        let (r, g, b) = (tensor[[0, 100, 100, 0]], tensor[[0, 100, 100, 1]], tensor[[0, 100, 100, 2]]);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 128, image::Rgba([10, 20, 30, 0])));
        let tensor = ImagePreprocessor::preprocess(&img).unwrap();
        assert_model_shape(&tensor);
    }

    #[test]
    fn one_pixel_image_is_upscaled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 0, 0])));
        let tensor = ImagePreprocessor::preprocess(&img).unwrap();
        assert_model_shape(&tensor);
        assert!(tensor[[0, 112, 112, 0]] > 0.9);
        assert!(tensor[[0, 112, 112, 1]] < 0.1);
    }

    #[test]
    fn landscape_image_is_center_cropped() {
        // 左半红右半蓝；裁剪保留中部，两端颜色应各自保留
        let mut img = RgbImage::new(400, 200);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = if x < 200 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) };
        }
        let tensor = ImagePreprocessor::preprocess(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_model_shape(&tensor);
        assert!(tensor[[0, 112, 20, 0]] > 0.8, "left side should stay red");
        assert!(tensor[[0, 112, 200, 2]] > 0.8, "right side should stay blue");
    }
}
