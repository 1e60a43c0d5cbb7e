pub mod modules;
use modules::state::State;
use winit::{
    event::*,
    event_loop::{EventLoop, ControlFlow},
    keyboard::{PhysicalKey, KeyCode},
    window::WindowBuilder,
};
use log::{error, info, warn};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if let Err(e) = console_log::init_with_level(log::Level::Info) {
                web_sys::console::error_1(&format!("unable to initialize logger: {e}").into());
            }
        } else {
            env_logger::init();
        }
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("unable to create event loop: {e}");
            return;
        }
    };
    let window = match WindowBuilder::new().with_title("Sundial").build(&event_loop) {
        Ok(window) => window,
        Err(e) => {
            error!("unable to create window: {e}");
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        // winit prevents sizing with CSS
        use winit::dpi::PhysicalSize;
        let _ = window.request_inner_size(PhysicalSize::new(450, 400));

        use winit::platform::web::WindowExtWebSys;
        let appended = web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("render")?;
                let canvas = web_sys::Element::from(window.canvas()?);
                dst.append_child(&canvas).ok()?;
                Some(())
            });
        if appended.is_none() {
            error!("unable to append canvas to #render");
            return;
        }
    }

    let mut state = match State::new(&window).await {
        Ok(state) => state,
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    let mut last_render_time = instant::Instant::now();
    let mut surface_configured = false;

    let result = event_loop.run(move |event, control_flow| {
        control_flow.set_control_flow(ControlFlow::Poll);
        match event {
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => if state.mouse_pressed {
                state.orbit_controller.process_mouse(delta.0, delta.1)
            },
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == state.window().id() && !state.input(event) => {
                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                ..
                            },
                        ..
                    } => control_flow.exit(),
                    WindowEvent::Resized(physical_size) => {
                        surface_configured = true;
                        state.resize(*physical_size);
                    },
                    WindowEvent::Focused(focused) => {
                        info!("window is focused : {focused}");
                    },
                    WindowEvent::RedrawRequested => {
                        state.window().request_redraw();

                        #[cfg(target_arch = "wasm32")]
                        {
                            use winit::dpi::LogicalSize;

                            web_sys::window().and_then(|win| {
                                let _ = state.window.request_inner_size(LogicalSize::new(
                                    win.inner_width().ok()?.as_f64()?,
                                    win.inner_height().ok()?.as_f64()?,
                                ));
                                Some(())
                            });
                        }

                        if !surface_configured {
                            return;
                        }

                        let now = instant::Instant::now();
                        let dt = now - last_render_time;
                        last_render_time = now;
                        state.update(dt);
                        match state.render() {
                            Ok(_) => {}
                            Err(
                                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                            ) => state.resize(state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("OutOfMemory");
                                control_flow.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                warn!("Surface timeout")
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    });
    if let Err(e) = result {
        error!("event loop stopped: {e}");
    }
}
