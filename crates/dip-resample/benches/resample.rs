use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dip_core::Image;
use dip_resample::{bilinear_zoom, nearest_zoom, rotate};

fn test_image(width: usize, height: usize) -> Image {
    let data: Vec<u8> = (0..width * height).map(|i| (i % 251) as u8).collect();
    Image::from_vec(width, height, 1, data).expect("valid image")
}

fn bench_zoom(c: &mut Criterion) {
    let img = test_image(640, 480);

    c.bench_function("nearest_zoom_u8_640x480_x2", |b| {
        b.iter(|| {
            let out = nearest_zoom(black_box(&img), 2.0).expect("zoom");
            black_box(out);
        });
    });

    c.bench_function("bilinear_zoom_u8_640x480_x2", |b| {
        b.iter(|| {
            let out = bilinear_zoom(black_box(&img), 2.0).expect("zoom");
            black_box(out);
        });
    });
}

fn bench_rotate(c: &mut Criterion) {
    let img = test_image(640, 480);

    c.bench_function("rotate_u8_640x480_30deg", |b| {
        b.iter(|| {
            let out = rotate(black_box(&img), 30f64.to_radians()).expect("rotate");
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_zoom, bench_rotate);
criterion_main!(benches);
