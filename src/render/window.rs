use std::sync::mpsc::Receiver;

use pixels::{Pixels, SurfaceTexture};
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::Key;
use winit::window::WindowBuilder;

use crate::foundation::error::{PenError, PenResult};
use crate::render::cpu::CpuRenderer;
use crate::render::run::{LocalControl, LocalInput};
use crate::render::ticker::FrameTicker;

/// Key binding for local input: `C` clear, `Q` quit, `T` self-test.
fn key_input(key: &Key) -> Option<LocalInput> {
    match key {
        Key::Character(s) => LocalInput::parse(s.as_str()),
        _ => None,
    }
}

/// Open a window and render the scene into it until quit or close.
///
/// `extra_input` carries actions from outside the window (stdin).
pub fn run_window(
    control: &LocalControl,
    renderer: &mut CpuRenderer,
    extra_input: &Receiver<LocalInput>,
) -> PenResult<()> {
    let canvas = renderer.canvas();
    let event_loop = EventLoop::new().map_err(|e| PenError::render(format!("event loop: {e}")))?;
    let window = WindowBuilder::new()
        .with_title("penbot")
        .with_inner_size(LogicalSize::new(
            f64::from(canvas.width),
            f64::from(canvas.height),
        ))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|e| PenError::render(format!("window: {e}")))?;

    let mut pixels = {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, &window);
        Pixels::new(canvas.width, canvas.height, surface)
            .map_err(|e| PenError::render(format!("pixels surface: {e}")))?
    };

    let mut ticker = FrameTicker::new(control.fps());
    let mut failure: Option<PenError> = None;

    event_loop
        .run(|event, target| {
            target.set_control_flow(ControlFlow::Poll);
            let mut input = None;
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => input = Some(LocalInput::Quit),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key,
                                state: ElementState::Pressed,
                                repeat: false,
                                ..
                            },
                        ..
                    } => input = key_input(&logical_key),
                    WindowEvent::Resized(size) => {
                        if let Err(e) = pixels.resize_surface(size.width, size.height) {
                            warn!(error = %e, "surface resize failed");
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let drawn = renderer
                            .render(&control.scene().snapshot())
                            .and_then(|frame| {
                                pixels.frame_mut().copy_from_slice(&frame.data);
                                pixels
                                    .render()
                                    .map_err(|e| PenError::render(format!("present: {e}")))
                            });
                        if let Err(e) = drawn {
                            failure = Some(e);
                            target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if let Ok(cmd) = extra_input.try_recv() {
                        input = Some(cmd);
                    }
                    if control.stopped() {
                        target.exit();
                        return;
                    }
                    ticker.wait();
                    window.request_redraw();
                }
                _ => {}
            }

            if let Some(cmd) = input
                && !control.apply(cmd)
            {
                target.exit();
            }
        })
        .map_err(|e| PenError::render(format!("event loop: {e}")))?;

    info!("window closed");
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
