//! Diagnostic PNG rendering of the current tracks, one file per frame.

use std::path::Path;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::Text,
};
use image::{Rgb, RgbImage};

use crate::error::Error;
use crate::tracker::Track;

const CANVAS_WIDTH: u32 = 800;
const CANVAS_HEIGHT: u32 = 600;
const BACKGROUND: [u8; 3] = [30, 30, 30];
const BOX_COLOR: [u8; 3] = [0, 255, 0];
const LABEL_COLOR: [u8; 3] = [255, 255, 0];

/// Render every current track as a hollow rectangle with its id and write
/// `frame_<iiii>.png` into `dir`. Normalized rectangles are scaled by the
/// canvas size. Output is diagnostic only.
pub fn render_frame(dir: &Path, frame_index: usize, tracks: &[Track]) -> Result<(), Error> {
    let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgb(BACKGROUND));

    for track in tracks {
        let x = (track.rect.x * CANVAS_WIDTH as f64) as i32;
        let y = (track.rect.y * CANVAS_HEIGHT as f64) as i32;
        let w = (track.rect.width * CANVAS_WIDTH as f64) as i32;
        let h = (track.rect.height * CANVAS_HEIGHT as f64) as i32;

        draw_rect(&mut canvas, x, y, w, h, BOX_COLOR);
        draw_text(
            &mut canvas,
            &track.id.to_string(),
            (x, (y - 5).max(8)),
            LABEL_COLOR,
        );
    }

    let path = dir.join(format!("frame_{frame_index:04}.png"));
    canvas.save(path)?;
    Ok(())
}

fn draw_rect(canvas: &mut RgbImage, x: i32, y: i32, w: i32, h: i32, color: [u8; 3]) {
    let x2 = x + w.max(0);
    let y2 = y + h.max(0);
    for px in x..=x2 {
        set_pixel_safe(canvas, px, y, color);
        set_pixel_safe(canvas, px, y2, color);
    }
    for py in y..=y2 {
        set_pixel_safe(canvas, x, py, color);
        set_pixel_safe(canvas, x2, py, color);
    }
}

fn set_pixel_safe(canvas: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && x < canvas.width() as i32 && y < canvas.height() as i32 {
        canvas.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn draw_text(canvas: &mut RgbImage, text: &str, pos: (i32, i32), color: [u8; 3]) {
    let style = MonoTextStyle::new(&FONT_6X10, Rgb888::new(color[0], color[1], color[2]));
    let mut target = CanvasDrawTarget::new(canvas);
    let _ = Text::new(text, Point::new(pos.0, pos.1), style).draw(&mut target);
}

/// embedded-graphics draw target backed by the PNG canvas.
struct CanvasDrawTarget<'a> {
    canvas: &'a mut RgbImage,
}

impl<'a> CanvasDrawTarget<'a> {
    fn new(canvas: &'a mut RgbImage) -> Self {
        Self { canvas }
    }
}

impl OriginDimensions for CanvasDrawTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }
}

impl DrawTarget for CanvasDrawTarget<'_> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let width = self.canvas.width() as i32;
        let height = self.canvas.height() as i32;
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 || coord.x >= width || coord.y >= height {
                continue;
            }
            let pixel = self.canvas.get_pixel_mut(coord.x as u32, coord.y as u32);
            *pixel = Rgb([color.r(), color.g(), color.b()]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Detection, KalmanFilter};

    #[test]
    fn test_render_writes_zero_padded_file() {
        let dir = tempfile::tempdir().unwrap();
        let kf = KalmanFilter::new();
        let track = crate::tracker::Track::from_detection(
            3,
            &kf,
            &Detection::new(0.25, 0.25, 0.2, 0.2),
            0.0,
        );

        render_frame(dir.path(), 7, &[track]).unwrap();
        assert!(dir.path().join("frame_0007.png").is_file());
    }
}
