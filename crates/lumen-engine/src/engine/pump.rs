//! Non-blocking winit event pumping.
//!
//! The engine is driven by the client's own loop, so instead of handing the
//! event loop to `run_app` it is pumped once per frame.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::device::{GpuInit, VideoDriver};
use crate::input::platform::winit::translate_window_event;
use crate::input::EventReceiver;

/// Timeout of a single startup pump while waiting for `resumed`.
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Pumps `event_loop` until the platform allows window creation, then opens
/// the window and its video driver.
pub(super) fn open_window(
    event_loop: &mut EventLoop<()>,
    attrs: WindowAttributes,
    gpu: GpuInit,
    max_pumps: u32,
) -> Result<(Arc<Window>, VideoDriver)> {
    let mut startup = Startup {
        attrs: Some(attrs),
        gpu,
        result: None,
    };

    for _ in 0..max_pumps.max(1) {
        if let PumpStatus::Exit(code) =
            event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut startup)
        {
            anyhow::bail!("event loop exited during startup (code {code})");
        }
        if let Some(result) = startup.result.take() {
            return result;
        }
    }

    anyhow::bail!("platform did not resume the application after {max_pumps} event pumps")
}

struct Startup {
    attrs: Option<WindowAttributes>,
    gpu: GpuInit,
    result: Option<Result<(Arc<Window>, VideoDriver)>>,
}

impl ApplicationHandler for Startup {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.attrs.take() else {
            return;
        };
        self.result = Some(create_window_and_driver(event_loop, attrs, self.gpu.clone()));
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, _event: WindowEvent) {
        // Nothing is listening before the engine exists.
    }
}

fn create_window_and_driver(
    event_loop: &ActiveEventLoop,
    attrs: WindowAttributes,
    gpu: GpuInit,
) -> Result<(Arc<Window>, VideoDriver)> {
    let window = Arc::new(
        event_loop
            .create_window(attrs)
            .context("failed to create window")?,
    );
    let driver = pollster::block_on(VideoDriver::new(Arc::clone(&window), gpu))
        .context("video driver initialization failed")?;
    Ok((window, driver))
}

/// Per-frame handler: feeds input to the receiver and keeps the surface in
/// sync with the window.
pub(super) struct EventPump<'a> {
    window: &'a Window,
    driver: &'a RefCell<VideoDriver>,
    receiver: &'a RefCell<EventReceiver>,
    close_requested: bool,
}

impl<'a> EventPump<'a> {
    pub(super) fn new(
        window: &'a Window,
        driver: &'a RefCell<VideoDriver>,
        receiver: &'a RefCell<EventReceiver>,
    ) -> Self {
        Self {
            window,
            driver,
            receiver,
            close_requested: false,
        }
    }

    /// Dispatches pending events without blocking. Returns false once the
    /// window was asked to close or the loop exited.
    pub(super) fn pump(mut self, event_loop: &mut EventLoop<()>) -> bool {
        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self);
        !self.close_requested && matches!(status, PumpStatus::Continue)
    }
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if window_id != self.window.id() {
            return;
        }

        if let Some(ev) = translate_window_event(self.window.scale_factor(), &event) {
            match self.receiver.try_borrow_mut() {
                Ok(mut receiver) => receiver.on_event(&ev),
                Err(_) => log::warn!("event receiver busy; dropped {ev:?}"),
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(new_size) => {
                self.driver.borrow_mut().resize(new_size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                self.driver.borrow_mut().resize(self.window.inner_size());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
    }
}
