//! SDL2 window used by the demo binary.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::error::{Error, Result};
use crate::surface::Surface;

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
    Resize(u32, u32),
}

/// Movement keys currently held down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub look_up: bool,
    pub look_down: bool,
}

impl InputState {
    fn set(&mut self, key: Keycode, down: bool) {
        let flag = match key {
            Keycode::W => &mut self.forward,
            Keycode::S => &mut self.back,
            Keycode::A => &mut self.left,
            Keycode::D => &mut self.right,
            Keycode::Left => &mut self.turn_left,
            Keycode::Right => &mut self.turn_right,
            Keycode::Up => &mut self.look_up,
            Keycode::Down => &mut self.look_down,
            _ => return,
        };
        *flag = down;
    }

    /// -1, 0 or 1 along the forward axis.
    pub fn forward_axis(&self) -> f32 {
        axis(self.forward, self.back)
    }

    pub fn strafe_axis(&self) -> f32 {
        axis(self.right, self.left)
    }

    pub fn yaw_axis(&self) -> f32 {
        axis(self.turn_right, self.turn_left)
    }

    pub fn pitch_axis(&self) -> f32 {
        axis(self.look_down, self.look_up)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    positive as i32 as f32 - negative as i32 as f32
}

fn sdl_error(err: impl ToString) -> Error {
    Error::Present(err.to_string())
}

pub struct Window {
    // Field order matters: the texture must drop before its creator.
    texture: sdl2::render::Texture<'static>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    texture_size: (u32, u32),
    event_pump: sdl2::EventPump,
    input: InputState,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(sdl_error)?;
        let video_subsystem = sdl_context.video().map_err(sdl_error)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(sdl_error)?;

        let canvas = window.into_canvas().build().map_err(sdl_error)?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump().map_err(sdl_error)?;

        let texture = Self::streaming_texture(&texture_creator, width, height)?;

        Ok(Self {
            canvas,
            texture_creator,
            texture,
            texture_size: (width, height),
            event_pump,
            input: InputState::default(),
            width,
            height,
        })
    }

    fn streaming_texture(
        texture_creator: &sdl2::render::TextureCreator<sdl2::video::WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<sdl2::render::Texture<'static>> {
        // SAFETY: texture_creator is heap-allocated and lives as long as Window,
        // which drops its texture first.
        let texture_creator: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator as *const _) };
        texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(sdl_error)
    }

    /// Drain pending events, updating [`Window::input`].
    pub fn poll_events(&mut self) -> WindowEvent {
        let mut result = WindowEvent::None;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return WindowEvent::Quit,
                Event::KeyDown {
                    keycode: Some(key),
                    ..
                } => self.input.set(key, true),
                Event::KeyUp {
                    keycode: Some(key),
                    ..
                } => self.input.set(key, false),
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => {
                    self.width = w.max(1) as u32;
                    self.height = h.max(1) as u32;
                    result = WindowEvent::Resize(self.width, self.height);
                }
                _ => {}
            }
        }
        result
    }

    pub fn input(&self) -> InputState {
        self.input
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Surface for Window {
    /// Upload the frame and stretch it over the whole window.
    fn present(&mut self, pixels: &[u32], width: u32, height: u32) -> Result<()> {
        if self.texture_size != (width, height) {
            self.texture = Self::streaming_texture(&self.texture_creator, width, height)?;
            self.texture_size = (width, height);
        }

        // SAFETY: u32 has no padding and a stricter alignment than u8.
        let bytes = unsafe {
            std::slice::from_raw_parts(pixels.as_ptr() as *const u8, std::mem::size_of_val(pixels))
        };
        self.texture
            .update(None, bytes, (width * 4) as usize)
            .map_err(sdl_error)?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))
            .map_err(sdl_error)?;
        self.canvas.present();
        Ok(())
    }
}
