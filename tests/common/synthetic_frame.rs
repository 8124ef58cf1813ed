/// Dark single-channel road frame.
pub fn blank_gray(width: usize, height: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    vec![20u8; width * height]
}

/// Paint a bright lane marking from `top` to `bottom` (pixel coordinates),
/// `half_width` pixels either side of the centre line on every row.
pub fn draw_lane(
    img: &mut [u8],
    width: usize,
    top: (f32, f32),
    bottom: (f32, f32),
    half_width: i32,
) {
    let height = img.len() / width;
    let (y0, y1) = (top.1.round() as i32, bottom.1.round() as i32);
    assert!(y1 > y0, "lane must span at least one row");
    for y in y0..=y1 {
        if y < 0 || y as usize >= height {
            continue;
        }
        let t = (y as f32 - top.1) / (bottom.1 - top.1);
        let xc = (top.0 + t * (bottom.0 - top.0)).round() as i32;
        for x in (xc - half_width)..=(xc + half_width) {
            if x >= 0 && (x as usize) < width {
                img[y as usize * width + x as usize] = 235;
            }
        }
    }
}

/// 800×600 frame with two lane markings converging towards the top.
///
/// Left marking: `y = 780 − 2x`; right marking: `y = 2.5x − 1050`. The
/// intercept magnitudes differ by more than the 20% band, so the markings
/// land in separate clusters.
pub fn two_lane_road() -> Vec<u8> {
    let (w, h) = (800usize, 600usize);
    let mut img = blank_gray(w, h);
    draw_lane(&mut img, w, (240.0, 300.0), (100.0, 580.0), 3);
    draw_lane(&mut img, w, (540.0, 300.0), (652.0, 580.0), 3);
    img
}

/// Mirror-image road: `y = 780 − 2x` and `y = 2x − 820`.
///
/// Slope and intercept magnitudes both fall inside the band, so the two
/// markings collapse into one cluster.
pub fn mirrored_two_lane_road() -> Vec<u8> {
    let (w, h) = (800usize, 600usize);
    let mut img = blank_gray(w, h);
    draw_lane(&mut img, w, (240.0, 300.0), (100.0, 580.0), 3);
    draw_lane(&mut img, w, (560.0, 300.0), (700.0, 580.0), 3);
    img
}

/// Replicate a gray buffer into packed RGB.
pub fn gray_to_rgb(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&v| [v, v, v]).collect()
}
