// renderer.rs: backdrop pass (wgpu) + tiles and UI (egui)

use crate::projection::ProjectedTile;
use anyhow::{anyhow, Context as _};
use dome_gallery::TilePlacement;
use egui::epaint::{Vertex, WHITE_UV};
use egui::{Color32, Mesh, Pos2, TextureHandle};
use std::collections::HashMap;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Overlay colour of the dome (#060010).
pub const OVERLAY_RGB: [u8; 3] = [6, 0, 16];

/// Height of the top/bottom fades as a fraction of the screen height.
const EDGE_FADE: f32 = 0.18;

fn setup_egui_ui_fonts(ctx: &egui::Context) {
    // Prefer a system font with wide script coverage so translated menus
    // render; ab_glyph rejects files egui could not use either.
    fn try_load_font_from_path(path: &std::path::Path) -> Option<Vec<u8>> {
        let bytes = std::fs::read(path).ok()?;
        ab_glyph::FontRef::try_from_slice(&bytes).ok()?;
        Some(bytes)
    }

    let mut candidates: Vec<std::path::PathBuf> = Vec::new();

    if cfg!(windows) {
        let win_fonts = std::path::PathBuf::from(r"C:\Windows\Fonts");
        for f in ["msyh.ttf", "simhei.ttf", "malgun.ttf", "segoeui.ttf", "arial.ttf"] {
            candidates.push(win_fonts.join(f));
        }
    } else if cfg!(target_os = "macos") {
        for p in [
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ] {
            candidates.push(std::path::PathBuf::from(p));
        }
    } else if cfg!(unix) {
        for p in [
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        ] {
            candidates.push(std::path::PathBuf::from(p));
        }
    }

    for f in ["NotoSansCJK-Regular.ttc", "NotoSans-Regular.ttf"] {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("assets").join(f));
            }
        }
        candidates.push(std::path::PathBuf::from("assets").join(f));
    }

    let Some((font_path, font_bytes)) = candidates
        .into_iter()
        .find_map(|p| try_load_font_from_path(&p).map(|b| (p, b)))
    else {
        log::warn!("{}", crate::i18n::tr("font.not_found"));
        return;
    };

    log::info!(
        "{}",
        crate::i18n::tr_with("font.using", &[("path", font_path.display().to_string())])
    );

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("ui".to_owned(), egui::FontData::from_owned(font_bytes));
    if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
        family.insert(0, "ui".to_owned());
    }
    ctx.set_fonts(fonts);
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BackdropUniform {
    color: [f32; 4],
    resolution: [f32; 2],
    glow: f32,
    pad: f32,
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    backdrop_bind_group: wgpu::BindGroup,
    backdrop_uniform: BackdropUniform,
    backdrop_buffer: wgpu::Buffer,

    // UI
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: std::sync::Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = unsafe { instance.create_surface(window.as_ref()) }
            .context("create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    label: None,
                },
                None,
            )
            .await
            .context("request device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        // --- Backdrop uniform ---
        let [r, g, b] = OVERLAY_RGB;
        let backdrop_uniform = BackdropUniform {
            color: [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0],
            resolution: [config.width as f32, config.height as f32],
            glow: 0.06,
            pad: 0.0,
        };

        let backdrop_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Buffer"),
            contents: bytemuck::cast_slice(&[backdrop_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("backdrop_bind_group_layout"),
        });

        let backdrop_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: backdrop_buffer.as_entire_binding(),
            }],
            label: Some("backdrop_bind_group"),
        });

        // --- Pipeline ---
        let shader = device.create_shader_module(wgpu::include_wgsl!("shader_dome.wgsl"));
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Backdrop Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Backdrop Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        // --- Egui ---
        let egui_ctx = egui::Context::default();
        setup_egui_ui_fonts(&egui_ctx);

        let mut egui_state = egui_winit::State::new(window.as_ref());
        egui_state.set_pixels_per_point(window.scale_factor() as f32);

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            backdrop_bind_group,
            backdrop_uniform,
            backdrop_buffer,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.backdrop_uniform.resolution = [new_size.width as f32, new_size.height as f32];
            self.queue.write_buffer(
                &self.backdrop_buffer,
                0,
                bytemuck::cast_slice(&[self.backdrop_uniform]),
            );
        }
    }

    pub fn render_with_ui(
        &mut self,
        window: &Window,
        run_ui: impl FnOnce(&egui::Context),
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 1. Backdrop
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.backdrop_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        // 2. Tiles + UI
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state
            .handle_platform_output(window, &self.egui_ctx, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.egui_renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn quad(mesh: &mut Mesh, corners: [[f32; 2]; 4], uvs: [Pos2; 4], color: Color32) {
    let base = mesh.vertices.len() as u32;
    for (c, uv) in corners.iter().zip(uvs) {
        mesh.vertices.push(Vertex {
            pos: Pos2::new(c[0], c[1]),
            uv,
            color,
        });
    }
    mesh.add_triangle(base, base + 1, base + 2);
    mesh.add_triangle(base, base + 2, base + 3);
}

/// Paint the visible tiles back to front, then the top and bottom fades.
pub fn paint_dome(
    painter: &egui::Painter,
    tiles: &[TilePlacement],
    visible: &[ProjectedTile],
    textures: &HashMap<String, TextureHandle>,
) {
    let full_uv = [
        Pos2::new(0.0, 0.0),
        Pos2::new(1.0, 0.0),
        Pos2::new(1.0, 1.0),
        Pos2::new(0.0, 1.0),
    ];

    for p in visible {
        let shade = (0.45 + 0.55 * p.facing.clamp(0.0, 1.0)) * 255.0;
        let tile = &tiles[p.index];
        let mesh = match textures.get(&tile.image.src) {
            Some(tex) => {
                let mut mesh = Mesh::with_texture(tex.id());
                quad(&mut mesh, p.corners, full_uv, Color32::from_gray(shade as u8));
                mesh
            }
            None => {
                let mut mesh = Mesh::default();
                let [r, g, b] = OVERLAY_RGB;
                let lift = (shade / 8.0) as u8;
                quad(
                    &mut mesh,
                    p.corners,
                    [WHITE_UV; 4],
                    Color32::from_rgb(r + lift, g + lift, b + lift + 8),
                );
                mesh
            }
        };
        painter.add(egui::Shape::mesh(mesh));
    }

    let rect = painter.clip_rect();
    let fade_h = rect.height() * EDGE_FADE;
    let [r, g, b] = OVERLAY_RGB;
    let solid = Color32::from_rgb(r, g, b);
    let mut fades = Mesh::default();
    let top = [
        [rect.left(), rect.top()],
        [rect.right(), rect.top()],
        [rect.right(), rect.top() + fade_h],
        [rect.left(), rect.top() + fade_h],
    ];
    let bottom = [
        [rect.left(), rect.bottom() - fade_h],
        [rect.right(), rect.bottom() - fade_h],
        [rect.right(), rect.bottom()],
        [rect.left(), rect.bottom()],
    ];
    for (corners, colors) in [
        (top, [solid, solid, Color32::TRANSPARENT, Color32::TRANSPARENT]),
        (bottom, [Color32::TRANSPARENT, Color32::TRANSPARENT, solid, solid]),
    ] {
        let base = fades.vertices.len() as u32;
        for (c, color) in corners.iter().zip(colors) {
            fades.vertices.push(Vertex {
                pos: Pos2::new(c[0], c[1]),
                uv: WHITE_UV,
                color,
            });
        }
        fades.add_triangle(base, base + 1, base + 2);
        fades.add_triangle(base, base + 2, base + 3);
    }
    painter.add(egui::Shape::mesh(fades));
}
