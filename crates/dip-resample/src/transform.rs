use dip_core::{Error, Image, Size};
use log::debug;

use crate::remap::gather;

/// Mirrors columns: destination `(x, y)` is source `(W - 1 - x, y)`.
pub fn flip_horizontal(img: &Image) -> Result<Image, Error> {
    debug!("flip_horizontal {}", img);
    let w = img.width();
    gather(img, img.size(), |x, y| (w - 1 - x, y))
}

/// Mirrors rows: destination `(x, y)` is source `(x, H - 1 - y)`.
pub fn flip_vertical(img: &Image) -> Result<Image, Error> {
    debug!("flip_vertical {}", img);
    let h = img.height();
    gather(img, img.size(), |x, y| (x, h - 1 - y))
}

/// Quarter turn. The result is `H x W`.
pub fn rotate90(img: &Image, clockwise: bool) -> Result<Image, Error> {
    debug!("rotate90 {} clockwise={clockwise}", img);
    let (w, h) = (img.width(), img.height());
    let size = Size::new(h, w);
    if clockwise {
        gather(img, size, |x, y| (y, h - 1 - x))
    } else {
        gather(img, size, |x, y| (w - 1 - y, x))
    }
}

#[cfg(test)]
mod tests {
    use super::{flip_horizontal, flip_vertical, rotate90};
    use dip_core::Image;

    // 3 wide, 2 tall:
    // 1 2 3
    // 4 5 6
    fn sample() -> Image {
        Image::from_vec(3, 2, 1, vec![1u8, 2, 3, 4, 5, 6]).expect("valid image")
    }

    fn values(img: &Image) -> Vec<u8> {
        img.view::<u8>().expect("u8").to_vec()
    }

    #[test]
    fn flips_mirror_one_axis() {
        let img = sample();
        assert_eq!(values(&flip_horizontal(&img).expect("flip")), vec![3, 2, 1, 6, 5, 4]);
        assert_eq!(values(&flip_vertical(&img).expect("flip")), vec![4, 5, 6, 1, 2, 3]);
        assert_eq!(
            flip_horizontal(&flip_horizontal(&img).expect("flip")).expect("flip"),
            img
        );
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let img = sample();

        let cw = rotate90(&img, true).expect("cw");
        assert_eq!((cw.width(), cw.height()), (2, 3));
        // 4 1
        // 5 2
        // 6 3
        assert_eq!(values(&cw), vec![4, 1, 5, 2, 6, 3]);

        let ccw = rotate90(&img, false).expect("ccw");
        // 3 6
        // 2 5
        // 1 4
        assert_eq!(values(&ccw), vec![3, 6, 2, 5, 1, 4]);

        assert_eq!(rotate90(&cw, false).expect("back"), img);
    }

    #[test]
    fn flips_keep_pixels_whole() {
        let img = Image::from_vec(2, 1, 2, vec![1.0f64, 2.0, 3.0, 4.0]).expect("valid");
        let out = flip_horizontal(&img).expect("flip");
        assert_eq!(out.view::<f64>().expect("f64").to_vec(), vec![3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_images_pass_through() {
        assert!(flip_vertical(&Image::default()).expect("flip").is_empty());
        assert!(rotate90(&Image::default(), true).expect("rotate").is_empty());
    }
}
