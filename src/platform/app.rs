/// Window application: connects the winit window, wgpu renderer and session.

use crate::config::Config;
use crate::core::{BlinkTimer, RenderAction, ViewLine};
use crate::dispatch::{Notifier, ShellDispatcher};
use crate::error::TermError;
use crate::keymap;
use crate::renderer::atlas::{load_font_data, GlyphAtlas};
use crate::renderer::pipeline::RenderState;
use crate::renderer::scroll::ScrollState;
use crate::session::Session;
use crate::theme::Theme;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoopProxy};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

/// Events posted to the loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    /// A background command finished and its result is waiting in the session.
    DispatchFinished,
}

pub struct App {
    config: Config,
    theme: Theme,
    session: Session,
    window: Option<Arc<Window>>,
    render: Option<RenderState>,
    atlas: Option<GlyphAtlas>,
    blink: BlinkTimer,
    scroll: ScrollState,
    modifiers: ModifiersState,
    error: Option<TermError>,
}

impl App {
    pub fn new(config: Config, proxy: EventLoopProxy<UserEvent>) -> Result<Self, TermError> {
        let working_dir = initial_working_dir()?;
        log::info!("starting in {}", working_dir.display());

        let dispatcher = Arc::new(ShellDispatcher::from_config(&config.shell));
        let session = Session::new(dispatcher, working_dir, config.session_options())
            .with_notifier(wake_on_finish(proxy));

        Ok(Self {
            theme: Theme::from_config(&config.colors),
            blink: BlinkTimer::new(config.caret.blink_interval(), Instant::now()),
            config,
            session,
            window: None,
            render: None,
            atlas: None,
            scroll: ScrollState::new(),
            modifiers: ModifiersState::empty(),
            error: None,
        })
    }

    /// A fatal error that stopped the loop, if any.
    pub fn take_error(&mut self) -> Option<TermError> {
        self.error.take()
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), TermError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let (font_path, font_data) = load_font_data(self.config.font.path.as_deref())?;
        log::info!("using font {}", font_path.display());
        let mut atlas = GlyphAtlas::new(&font_data, self.config.font.size)?;

        // Printable ASCII up front so the first frames need no atlas upload.
        for ch in '!'..='~' {
            atlas.get_glyph(ch);
        }

        let render = RenderState::new(window.clone(), &atlas)?;
        // `RenderState::new` has already uploaded the atlas.
        atlas.dirty = false;

        self.render = Some(render);
        self.atlas = Some(atlas);
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: TermError) {
        log::error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Text grid (cols, rows) for the current window size.
    fn grid_size(&self) -> Option<(usize, usize)> {
        let render = self.render.as_ref()?;
        let atlas = self.atlas.as_ref()?;
        let (width, height) = render.size();
        Some(atlas.grid_size(width, height, self.config.window.padding))
    }

    fn max_scroll(&self) -> usize {
        self.grid_size().map_or(0, |(cols, rows)| {
            self.session
                .transcript()
                .wrapped_row_count(cols)
                .saturating_sub(rows)
        })
    }

    fn visible_lines(&self) -> Vec<ViewLine> {
        match self.grid_size() {
            Some((cols, rows)) => self.session.transcript().viewport(cols, rows, self.scroll.offset()),
            None => Vec::new(),
        }
    }

    fn render_frame(&mut self) {
        let lines = self.visible_lines();
        let padding = self.config.window.padding as f32;
        if let (Some(render), Some(atlas)) = (&mut self.render, &mut self.atlas) {
            render.draw(&lines, atlas, &self.theme, padding);
        }
    }

    fn handle_key_input(&mut self, event: &winit::event::KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let mut changed = false;
        for key in keymap::classify(&event.logical_key, self.modifiers) {
            let action = self.session.handle_key(key);
            changed |= action != RenderAction::None;
        }
        if changed {
            self.blink.reset(Instant::now());
            self.scroll.reset(); // snap to bottom on input
            self.request_redraw();
        }
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        self.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render {
                    render.resize(size.width, size.height);
                }
                self.request_redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key_input(&event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let max = self.max_scroll();
                let before = self.scroll.offset();
                match delta {
                    MouseScrollDelta::LineDelta(_, y) => self.scroll.scroll(y, max),
                    MouseScrollDelta::PixelDelta(pos) => {
                        let cell_height = self.atlas.as_ref().map_or(0.0, |a| a.cell_height);
                        self.scroll.scroll_pixels(pos.y as f32, cell_height, max);
                    }
                }
                if self.scroll.offset() != before {
                    self.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.render_frame(),

            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::DispatchFinished => {
                if self.session.poll() {
                    self.blink.reset(Instant::now());
                    self.scroll.reset();
                    self.request_redraw();
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.blink.poll(Instant::now()) && self.session.tick_caret() != RenderAction::None {
            self.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.blink.deadline()));
    }
}

/// Wake the event loop from the dispatch worker thread.
fn wake_on_finish(proxy: EventLoopProxy<UserEvent>) -> Notifier {
    let proxy = Mutex::new(proxy);
    Arc::new(move || {
        if let Ok(proxy) = proxy.lock() {
            if proxy.send_event(UserEvent::DispatchFinished).is_err() {
                log::debug!("event loop closed before dispatch finished");
            }
        }
    })
}

fn initial_working_dir() -> Result<PathBuf, TermError> {
    let dir = std::env::current_dir()?;
    Ok(dir.canonicalize().unwrap_or(dir))
}
