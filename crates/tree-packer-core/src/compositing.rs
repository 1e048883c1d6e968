use image::RgbaImage;

/// Blit all of `src` into `canvas` with its top-left at (dx, dy).
///
/// Pixels falling outside the canvas are dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        let ty = dy + yy;
        if ty >= ch {
            break;
        }
        for xx in 0..sw {
            let tx = dx + xx;
            if tx >= cw {
                break;
            }
            canvas.put_pixel(tx, ty, *src.get_pixel(xx, yy));
        }
    }
}
