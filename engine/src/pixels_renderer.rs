use pixels::Pixels;

use crate::graphics::{CpuRenderer, Renderer2d, SurfaceSize};

/// Presents CPU-rendered frames through `pixels`.
///
/// The game only ever draws via `Renderer2d`; this type owns the pixel buffer
/// and the surface it is flushed to.
pub struct PixelsPresenter {
    pixels: Pixels,
    size: SurfaceSize,
}

impl PixelsPresenter {
    pub fn new(mut pixels: Pixels, size: SurfaceSize) -> Result<Self, pixels::TextureError> {
        pixels.resize_buffer(size.width.max(1), size.height.max(1))?;
        Ok(Self { pixels, size })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn resize(&mut self, size: SurfaceSize) -> Result<(), pixels::TextureError> {
        if size.is_empty() {
            return Ok(());
        }
        self.size = size;
        self.pixels.resize_surface(size.width, size.height)?;
        self.pixels.resize_buffer(size.width, size.height)
    }

    pub fn draw_frame<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn Renderer2d) -> R,
    {
        let mut cpu = CpuRenderer::new(self.pixels.frame_mut(), self.size);
        cpu.begin_frame(self.size);
        f(&mut cpu)
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }
}
