// main.rs: dome gallery window, input mapping and UI

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod i18n;
mod input;
mod pool;
mod projection;
mod renderer;

use anyhow::Context as _;
use dome_gallery::config::resolve_config_path;
use dome_gallery::{
    build_tiles, FrameScheduler, GalleryConfig, LatchedSink, Phase, PointerPos, RotationController,
    TilePlacement,
};
use input::PointerRouter;
use pool::DecodedImage;
use renderer::Renderer;

use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Instant;

type Controller = RotationController<FrameScheduler, LatchedSink>;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut current_lang = i18n::resolve_lang_from_args();
    i18n::init(current_lang.clone());

    let cfg_path = resolve_config_path(std::env::args());
    let cfg = GalleryConfig::load(&cfg_path).unwrap_or_else(|e| {
        log::error!("{}", i18n::tr_with("error.config", &[("err", e.to_string())]));
        GalleryConfig::default()
    });

    let images = match pool::resolve_images_dir() {
        Some(dir) => pool::discover_images(&dir)
            .with_context(|| format!("read image directory {}", dir.display()))?,
        None => Vec::new(),
    };
    log::info!(
        "{}",
        i18n::tr_with("log.pool_size", &[("count", images.len().to_string())])
    );

    let image_count = images.len();
    let tiles = build_tiles(&images, cfg.segments);
    let (tx, rx) = channel();
    pool::start_decoding(images, tx);

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)
            .context("create window")?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
    let mut controller = RotationController::new(cfg, FrameScheduler::new(), LatchedSink::default());
    resize_controller(&mut controller, &window);

    let clock = Instant::now();
    let mut textures: HashMap<String, egui::TextureHandle> = HashMap::new();
    let mut pointer = PointerRouter::default();

    // FPS
    let mut last_fps_sample = Instant::now();
    let mut frame_count = 0;
    let mut fps = 0.0;
    let mut show_fps = false;
    let mut show_status = true;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => {
                // Pointer events egui consumed still end a running drag.
                let consumed = renderer
                    .egui_state
                    .on_event(&renderer.egui_ctx, &event)
                    .consumed;

                match event {
                    WindowEvent::CloseRequested => {
                        controller.teardown();
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        resize_controller(&mut controller, &window);
                    }

                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size);
                        resize_controller(&mut controller, &window);
                    }

                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => {
                        let pressed = state == ElementState::Pressed;
                        pointer.button(&mut controller, pressed, consumed);
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        pointer.cursor_moved(&mut controller, logical(position, &window), consumed);
                    }

                    WindowEvent::CursorLeft { .. } => {
                        pointer.cursor_left(&mut controller, consumed);
                    }

                    WindowEvent::Touch(touch) => {
                        let pos = logical(touch.location, &window);
                        pointer.touch(&mut controller, touch.id, touch.phase, pos, consumed);
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                frame_count += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(last_fps_sample).as_secs_f32();
                if elapsed >= 1.0 {
                    fps = frame_count as f32 / elapsed;
                    frame_count = 0;
                    last_fps_sample = now;
                }

                controller.advance_frame(clock.elapsed());

                let render_result = renderer.render_with_ui(&window, |ctx| {
                    upload_decoded(ctx, &rx, &mut textures);
                    draw_ui(
                        ctx,
                        &controller,
                        &tiles,
                        image_count,
                        &textures,
                        &mut show_fps,
                        &mut show_status,
                        fps,
                        &window,
                        &mut current_lang,
                        control_flow,
                    );
                });

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        controller.teardown();
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            // Exit from the menu skips CloseRequested.
            Event::LoopDestroyed => controller.teardown(),

            _ => {}
        }
    });
}

fn logical(position: PhysicalPosition<f64>, window: &Window) -> PointerPos {
    let p = position.to_logical::<f64>(window.scale_factor());
    PointerPos::new(p.x, p.y)
}

fn resize_controller(controller: &mut Controller, window: &Window) {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    controller.resize(size.width, size.height);
}

fn upload_decoded(
    ctx: &egui::Context,
    rx: &Receiver<DecodedImage>,
    textures: &mut HashMap<String, egui::TextureHandle>,
) {
    while let Ok(decoded) = rx.try_recv() {
        let size = [decoded.rgba.width() as usize, decoded.rgba.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, decoded.rgba.as_raw());
        let handle = ctx.load_texture(&decoded.src, color, egui::TextureOptions::LINEAR);
        textures.insert(decoded.src, handle);
    }
}

/// Status bar warning when the pool came up empty and every tile is a
/// placeholder.
fn missing_images_notice(image_count: usize) -> Option<String> {
    (image_count == 0).then(|| i18n::tr("status.no_images"))
}

fn phase_label(phase: Phase) -> String {
    let key = match phase {
        Phase::Idle => "status.phase.idle",
        Phase::Dragging => "status.phase.dragging",
        Phase::Coasting => "status.phase.coasting",
        Phase::AutoRotating => "status.phase.auto_rotating",
    };
    i18n::tr(key)
}

#[allow(clippy::too_many_arguments)]
fn draw_ui(
    ctx: &egui::Context,
    controller: &Controller,
    tiles: &[TilePlacement],
    image_count: usize,
    textures: &HashMap<String, egui::TextureHandle>,
    show_fps: &mut bool,
    show_status: &mut bool,
    fps: f32,
    window: &Window,
    current_lang: &mut String,
    control_flow: &mut ControlFlow,
) {
    let sink = controller.sink();

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(i18n::tr("menu.file"), |ui| {
                if ui.button(i18n::tr("menu.exit")).clicked() {
                    ui.close_menu();
                    *control_flow = ControlFlow::Exit;
                }
            });

            ui.menu_button(i18n::tr("menu.view"), |ui| {
                if ui.checkbox(show_fps, i18n::tr("view.show_fps")).clicked() {
                    ui.close_menu();
                }
                if ui.checkbox(show_status, i18n::tr("view.show_status_bar")).clicked() {
                    ui.close_menu();
                }
            });

            ui.menu_button(i18n::tr("menu.language"), |ui| {
                let langs: [(&str, &str); 2] = [("en", "English"), ("zh-Hans", "简体中文")];
                for (code, name) in langs {
                    if ui.radio_value(current_lang, code.to_string(), name).clicked() {
                        i18n::init(current_lang.clone());
                        window.set_title(&i18n::tr("app.title"));
                        ui.close_menu();
                    }
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show_animated(ctx, *show_status, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!(
                "{} {}",
                i18n::tr("status.phase_prefix"),
                phase_label(controller.phase())
            ));
            ui.label("|");
            ui.label(format!("Yaw: {:.1}°", sink.orientation.yaw));
            if let Some(m) = sink.metrics {
                ui.label("|");
                ui.label(format!("{} {:.0}px", i18n::tr("status.radius_prefix"), m.radius));
                ui.label("|");
                ui.label(format!(
                    "{} {:.0}px",
                    i18n::tr("status.padding_prefix"),
                    m.viewer_padding
                ));
            }
            if let Some(notice) = missing_images_notice(image_count) {
                ui.label("|");
                ui.label(egui::RichText::new(notice).color(egui::Color32::YELLOW));
            }
            if *show_fps {
                ui.label("|");
                ui.label(egui::RichText::new(format!("FPS: {:.1}", fps)).color(egui::Color32::GREEN));
            }
        });
    });

    // Tiles go on the background layer so the panels stay on top.
    let painter = ctx.layer_painter(egui::LayerId::background());
    if let Some(metrics) = sink.metrics {
        let rect = ctx.screen_rect();
        let centre = rect.center();
        let visible = projection::project_tiles(
            tiles,
            controller.config().segments,
            sink.orientation.yaw,
            metrics.radius as f32,
            [centre.x, centre.y],
        );
        renderer::paint_dome(&painter, tiles, &visible, textures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_follows_the_pool_not_the_tiles() {
        // an empty pool still lays out a full grid of placeholders
        let tiles = build_tiles(&[], GalleryConfig::default().segments);
        assert!(!tiles.is_empty());
        assert!(missing_images_notice(0).is_some());
        assert!(missing_images_notice(3).is_none());
    }
}
