//! ---------------------------------------------------------------------------
//! Segment rasterizer
//!
//! Projects one wall segment into screen space and draws its face as
//! textured vertical stripes and its ceiling/floor surfaces as
//! horizontal stripes with exact inverse perspective mapping.
//!
//! Occlusion is per-column clip windows instead of a depth buffer: the
//! BSP feeds segments front-to-back, every drawn surface tightens the
//! window of its columns, and the frame is over once every window is
//! closed (`saturated`).
//! ---------------------------------------------------------------------------

use crate::fixed;
use crate::graphics::{HorizontalStripe, Plotter, Stripe, Texture, VerticalStripe};
use crate::world::{Camera, TextureBank, TextureId};

use super::segment::Segment;

/// Distance shading strength: shade amount per unit of view depth.
const SHADING_FACTOR: f32 = 0.2;

pub struct Renderer {
    plotter: Plotter,

    width: i32,
    height: i32,
    /// Focal length; equals half the screen height.
    near: i32,
    min_x: i32,
    max_x: i32,
    min_y: i32,

    open_clip_count: i32,
    /// Per screen row: column (inclusive) from which the pending
    /// horizontal stripe accumulation started.
    fill_left_screen_x: Vec<i32>,
    /// Per column: first row (inclusive) that may still be drawn.
    top_clip_screen_y: Vec<i32>,
    /// Per column: last row (inclusive) that may still be drawn.
    bottom_clip_screen_y: Vec<i32>,
}

impl Renderer {
    pub fn new(plotter: Plotter) -> Self {
        let width = plotter.width() as i32;
        let height = plotter.height() as i32;
        let half_width = width / 2;
        let half_height = height / 2;

        Self {
            plotter,

            width,
            height,
            near: half_height,
            min_x: -half_width,
            max_x: half_width - 1,
            min_y: -half_height,

            open_clip_count: 0,
            fill_left_screen_x: vec![0; height as usize],
            top_clip_screen_y: vec![0; width as usize],
            bottom_clip_screen_y: vec![0; width as usize],
        }
    }

    /// Hand the finished frame to the display surface.
    pub fn present<F>(&self, submit: F)
    where
        F: FnOnce(&[u8], usize, usize),
    {
        self.plotter.present(submit);
    }

    /// Reopen every column clip window. Call once per frame.
    pub fn clear(&mut self) {
        for x in 0..self.width as usize {
            self.top_clip_screen_y[x] = 0;
            self.bottom_clip_screen_y[x] = self.height - 1;
        }
        self.open_clip_count = self.width;
    }

    /// True once every column is fully occluded; nothing further can
    /// contribute pixels this frame.
    pub fn saturated(&self) -> bool {
        self.open_clip_count == 0
    }

    pub fn render_segment(&mut self, mut segment: Segment, camera: &Camera, bank: &TextureBank) {
        // World space to view space.
        segment.translate(-camera.x(), -camera.y(), -camera.z());
        segment.rotate(camera.angle_cos(), -camera.angle_sin());

        if segment.left_z <= 0.0 && segment.right_z <= 0.0 {
            // Segment is behind the camera.
            return;
        }

        let eq_cross = segment.left_x * segment.right_z - segment.right_x * segment.left_z;
        if eq_cross >= 0.0 {
            // We are seeing the back of the segment.
            return;
        }

        let near = self.near as f32;

        // Project the left edge. An edge behind the camera clips to the
        // screen border on its own side; the back-facing case is already
        // excluded above, so the side is unambiguous.
        let left_proj_x = if segment.left_z > 0.0 {
            ((near * (segment.left_x / segment.left_z)).floor() as i32).max(self.min_x)
        } else {
            self.min_x
        };
        let right_proj_x = if segment.right_z > 0.0 {
            ((near * (segment.right_x / segment.right_z)).floor() as i32).min(self.max_x)
        } else {
            self.max_x
        };

        if left_proj_x > self.max_x || right_proj_x < self.min_x {
            // Projected outside the camera bounds.
            return;
        }

        // Affine edge-equation terms along projected X. `eq_bottom /
        // eq_cross` is the per-column depth proxy, `eq_top / eq_bottom`
        // the face U coordinate.
        let dx = segment.right_x - segment.left_x;
        let dz = segment.right_z - segment.left_z;
        let eq_top = segment.length * (segment.left_x * near - left_proj_x as f32 * segment.left_z);
        let eq_top_delta = -segment.length * segment.left_z;
        let eq_bottom = left_proj_x as f32 * dz - near * dx;
        let eq_bottom_delta = dz;

        let top_proj_y =
            fixed::Value::from_f32(segment.top * (eq_bottom / eq_cross) + camera.skew() * near);
        let bottom_proj_y =
            fixed::Value::from_f32(segment.bottom * (eq_bottom / eq_cross) + camera.skew() * near);
        let top_proj_y_delta = fixed::Value::from_f32(segment.top * (dz / eq_cross));
        let bottom_proj_y_delta = fixed::Value::from_f32(segment.bottom * (dz / eq_cross));

        let min_y_fixed = fixed::Value::from_int(self.min_y);

        if let Some(texture) = self.resolve(bank, segment.ceiling_texture) {
            self.render_ceiling(
                camera,
                CeilingSurface {
                    left_screen_x: left_proj_x - self.min_x,
                    right_screen_x: right_proj_x - self.min_x,
                    bottom_screen_y: top_proj_y - min_y_fixed,
                    bottom_screen_y_delta: top_proj_y_delta,
                    view_y: segment.top,
                    texture,
                },
            );
        }

        if let Some(texture) = self.resolve(bank, segment.floor_texture) {
            self.render_floor(
                camera,
                FloorSurface {
                    left_screen_x: left_proj_x - self.min_x,
                    right_screen_x: right_proj_x - self.min_x,
                    top_screen_y: bottom_proj_y - min_y_fixed,
                    top_screen_y_delta: bottom_proj_y_delta,
                    view_y: segment.bottom,
                    texture,
                },
            );
        }

        if let Some(texture) = self.resolve(bank, segment.face_texture) {
            self.render_face(
                camera,
                FaceSurface {
                    left_screen_x: left_proj_x - self.min_x,
                    right_screen_x: right_proj_x - self.min_x,
                    top_screen_y: top_proj_y - min_y_fixed,
                    top_screen_y_delta: top_proj_y_delta,
                    bottom_screen_y: bottom_proj_y - min_y_fixed,
                    bottom_screen_y_delta: bottom_proj_y_delta,
                    eq_top,
                    eq_top_delta,
                    eq_bottom,
                    eq_bottom_delta,
                    eq_cross,
                    texture,
                    affects_top_clip: segment.has_ceiling(),
                    affects_bottom_clip: segment.has_floor(),
                },
            );
        }
    }

    fn resolve<'a>(&self, bank: &'a TextureBank, id: Option<TextureId>) -> Option<&'a Texture> {
        id.and_then(|id| bank.texture(id).ok())
    }

    fn render_face(&mut self, camera: &Camera, face: FaceSurface) {
        let mut top_screen_y = face.top_screen_y;
        let mut bottom_screen_y = face.bottom_screen_y;
        let mut eq_top = face.eq_top;
        let mut eq_bottom = face.eq_bottom;
        let eq_cross = face.eq_cross;
        let near = self.near as f32;

        for x in face.left_screen_x..=face.right_screen_x {
            let col = x as usize;
            if self.top_clip_screen_y[col] <= self.bottom_clip_screen_y[col] {
                let current_top_screen_y = top_screen_y.floor().max(self.top_clip_screen_y[col]);
                let current_bottom_screen_y =
                    bottom_screen_y.floor().min(self.bottom_clip_screen_y[col]);

                if current_top_screen_y <= current_bottom_screen_y {
                    let current_top_proj_y = current_top_screen_y + self.min_y;
                    self.plotter.plot(Stripe::Vertical(VerticalStripe {
                        x,
                        top: current_top_screen_y,
                        bottom: current_bottom_screen_y,
                        top_u: (eq_top / eq_bottom).floor() as i32,
                        top_v: fixed::Value::from_f32(
                            (current_top_proj_y as f32 - near * camera.skew())
                                * (eq_cross / eq_bottom)
                                + camera.y(),
                        ),
                        delta_v: fixed::Value::from_f32(eq_cross / eq_bottom),
                        texture: face.texture,
                        shade_amount: ((SHADING_FACTOR * near * eq_cross / eq_bottom) as i32)
                            .clamp(0, 255),
                    }));
                }

                if face.affects_top_clip
                    && current_bottom_screen_y >= self.top_clip_screen_y[col]
                {
                    self.top_clip_screen_y[col] = current_bottom_screen_y + 1;
                }
                if face.affects_bottom_clip
                    && current_top_screen_y <= self.bottom_clip_screen_y[col]
                {
                    self.bottom_clip_screen_y[col] = current_top_screen_y - 1;
                }
                if self.top_clip_screen_y[col] > self.bottom_clip_screen_y[col] {
                    self.open_clip_count -= 1;
                }
            }

            top_screen_y += face.top_screen_y_delta;
            bottom_screen_y += face.bottom_screen_y_delta;
            eq_top += face.eq_top_delta;
            eq_bottom += face.eq_bottom_delta;
        }
    }

    /// Floodfill the ceiling surface above a segment: rows accumulate a
    /// left edge while columns keep contributing and flush into one
    /// horizontal stripe the moment they stop.
    fn render_ceiling(&mut self, camera: &Camera, ceiling: CeilingSurface) {
        let mut bottom_screen_y = ceiling.bottom_screen_y;
        let bottom_screen_y_delta = ceiling.bottom_screen_y_delta;

        // Entirely above the screen: nothing to render, and the clips
        // must stay untouched or the saturation early-out would lie.
        let delta_screen_x = ceiling.right_screen_x - ceiling.left_screen_x;
        let bottom_left_screen_y = bottom_screen_y.floor();
        let bottom_right_screen_y =
            bottom_screen_y.floor() + bottom_screen_y_delta.times(delta_screen_x).floor();
        if bottom_left_screen_y < 0 && bottom_right_screen_y < 0 {
            return;
        }

        let mut previous_was_clipped = true;
        let mut previous_top_screen_y = self.height - 1;
        let mut previous_bottom_screen_y = 0;

        for x in ceiling.left_screen_x..=ceiling.right_screen_x {
            let col = x as usize;
            let current_top_screen_y = self.top_clip_screen_y[col];
            let current_bottom_screen_y = bottom_screen_y
                .floor()
                .min(self.bottom_clip_screen_y[col]);
            let current_is_clipped = current_top_screen_y > current_bottom_screen_y;

            if current_is_clipped {
                // Fully clipped column: flush any pending stripes.
                if !previous_was_clipped {
                    for y in previous_top_screen_y..=previous_bottom_screen_y {
                        self.render_surface_stripe(
                            camera,
                            SurfaceStripe {
                                screen_y: y,
                                left_screen_x: self.fill_left_screen_x[y as usize],
                                right_screen_x: x - 1,
                                view_y: ceiling.view_y,
                                texture: ceiling.texture,
                            },
                        );
                    }
                }
            } else {
                if previous_was_clipped {
                    // Start accumulations across the whole range.
                    for y in current_top_screen_y..=current_bottom_screen_y {
                        self.fill_left_screen_x[y as usize] = x;
                    }
                } else {
                    // Start new top accumulations where the top ascended.
                    let mut y = current_top_screen_y;
                    while y < previous_top_screen_y && y <= current_bottom_screen_y {
                        self.fill_left_screen_x[y as usize] = x;
                        y += 1;
                    }

                    // Flush top rows the current interval no longer reaches.
                    let mut y = previous_top_screen_y;
                    while y < current_top_screen_y && y <= previous_bottom_screen_y {
                        self.render_surface_stripe(
                            camera,
                            SurfaceStripe {
                                screen_y: y,
                                left_screen_x: self.fill_left_screen_x[y as usize],
                                right_screen_x: x - 1,
                                view_y: ceiling.view_y,
                                texture: ceiling.texture,
                            },
                        );
                        y += 1;
                    }

                    // Start new bottom accumulations where the bottom descended.
                    let mut y = current_bottom_screen_y;
                    while y > previous_bottom_screen_y && y >= current_top_screen_y {
                        self.fill_left_screen_x[y as usize] = x;
                        y -= 1;
                    }

                    // Flush bottom rows the current interval no longer reaches.
                    let mut y = previous_bottom_screen_y;
                    while y > current_bottom_screen_y && y >= previous_top_screen_y {
                        self.render_surface_stripe(
                            camera,
                            SurfaceStripe {
                                screen_y: y,
                                left_screen_x: self.fill_left_screen_x[y as usize],
                                right_screen_x: x - 1,
                                view_y: ceiling.view_y,
                                texture: ceiling.texture,
                            },
                        );
                        y -= 1;
                    }
                }

                self.top_clip_screen_y[col] = current_bottom_screen_y + 1;
                if self.top_clip_screen_y[col] > self.bottom_clip_screen_y[col] {
                    self.open_clip_count -= 1;
                }
            }

            previous_was_clipped = current_is_clipped;
            previous_top_screen_y = current_top_screen_y;
            previous_bottom_screen_y = current_bottom_screen_y;
            bottom_screen_y += bottom_screen_y_delta;
        }

        // The right edge terminates whatever is still accumulating.
        if !previous_was_clipped {
            for y in previous_top_screen_y..=previous_bottom_screen_y {
                self.render_surface_stripe(
                    camera,
                    SurfaceStripe {
                        screen_y: y,
                        left_screen_x: self.fill_left_screen_x[y as usize],
                        right_screen_x: ceiling.right_screen_x,
                        view_y: ceiling.view_y,
                        texture: ceiling.texture,
                    },
                );
            }
        }
    }

    /// Mirror of [`render_ceiling`] for the surface below a segment,
    /// accumulating from the segment's bottom edge down to the bottom
    /// clip.
    fn render_floor(&mut self, camera: &Camera, floor: FloorSurface) {
        let mut top_screen_y = floor.top_screen_y;
        let top_screen_y_delta = floor.top_screen_y_delta;

        // Entirely below the screen: see the note in render_ceiling.
        let delta_screen_x = floor.right_screen_x - floor.left_screen_x;
        let top_left_screen_y = top_screen_y.floor();
        let top_right_screen_y =
            top_screen_y.floor() + top_screen_y_delta.times(delta_screen_x).floor();
        if top_left_screen_y >= self.height && top_right_screen_y >= self.height {
            return;
        }

        let mut previous_was_clipped = true;
        let mut previous_top_screen_y = self.height - 1;
        let mut previous_bottom_screen_y = 0;

        for x in floor.left_screen_x..=floor.right_screen_x {
            let col = x as usize;
            let current_top_screen_y = top_screen_y.floor().max(self.top_clip_screen_y[col]);
            let current_bottom_screen_y = self.bottom_clip_screen_y[col];
            let current_is_clipped = current_top_screen_y > current_bottom_screen_y;

            if current_is_clipped {
                if !previous_was_clipped {
                    for y in previous_top_screen_y..=previous_bottom_screen_y {
                        self.render_surface_stripe(
                            camera,
                            SurfaceStripe {
                                screen_y: y,
                                left_screen_x: self.fill_left_screen_x[y as usize],
                                right_screen_x: x - 1,
                                view_y: floor.view_y,
                                texture: floor.texture,
                            },
                        );
                    }
                }
            } else {
                if previous_was_clipped {
                    for y in current_top_screen_y..=current_bottom_screen_y {
                        self.fill_left_screen_x[y as usize] = x;
                    }
                } else {
                    let mut y = current_top_screen_y;
                    while y < previous_top_screen_y && y <= current_bottom_screen_y {
                        self.fill_left_screen_x[y as usize] = x;
                        y += 1;
                    }

                    let mut y = previous_top_screen_y;
                    while y < current_top_screen_y && y <= previous_bottom_screen_y {
                        self.render_surface_stripe(
                            camera,
                            SurfaceStripe {
                                screen_y: y,
                                left_screen_x: self.fill_left_screen_x[y as usize],
                                right_screen_x: x - 1,
                                view_y: floor.view_y,
                                texture: floor.texture,
                            },
                        );
                        y += 1;
                    }

                    let mut y = current_bottom_screen_y;
                    while y > previous_bottom_screen_y && y >= current_top_screen_y {
                        self.fill_left_screen_x[y as usize] = x;
                        y -= 1;
                    }

                    let mut y = previous_bottom_screen_y;
                    while y > current_bottom_screen_y && y >= previous_top_screen_y {
                        self.render_surface_stripe(
                            camera,
                            SurfaceStripe {
                                screen_y: y,
                                left_screen_x: self.fill_left_screen_x[y as usize],
                                right_screen_x: x - 1,
                                view_y: floor.view_y,
                                texture: floor.texture,
                            },
                        );
                        y -= 1;
                    }
                }

                self.bottom_clip_screen_y[col] = current_top_screen_y - 1;
                if self.top_clip_screen_y[col] > self.bottom_clip_screen_y[col] {
                    self.open_clip_count -= 1;
                }
            }

            previous_was_clipped = current_is_clipped;
            previous_top_screen_y = current_top_screen_y;
            previous_bottom_screen_y = current_bottom_screen_y;
            top_screen_y += top_screen_y_delta;
        }

        if !previous_was_clipped {
            for y in previous_top_screen_y..=previous_bottom_screen_y {
                self.render_surface_stripe(
                    camera,
                    SurfaceStripe {
                        screen_y: y,
                        left_screen_x: self.fill_left_screen_x[y as usize],
                        right_screen_x: floor.right_screen_x,
                        view_y: floor.view_y,
                        texture: floor.texture,
                    },
                );
            }
        }
    }

    /// Plot one horizontal run of a ceiling/floor surface. The viewing
    /// ray of the row meets the surface at a fixed view-space distance
    /// ratio, which turns into world-space U/V and their per-column
    /// first derivatives under the inverse camera rotation.
    fn render_surface_stripe(&mut self, camera: &Camera, stripe: SurfaceStripe) {
        if stripe.right_screen_x < stripe.left_screen_x {
            return;
        }

        let near = self.near as f32;
        let proj_y = stripe.screen_y + self.min_y;
        let left_proj_x = stripe.left_screen_x + self.min_x;

        let ratio = stripe.view_y / (proj_y as f32 - near * camera.skew());
        let surface_view_z = near * ratio;
        let surface_view_x = left_proj_x as f32 * ratio;
        let surface_world_z =
            surface_view_x * camera.angle_sin() + surface_view_z * camera.angle_cos() + camera.z();
        let surface_world_x =
            surface_view_x * camera.angle_cos() - surface_view_z * camera.angle_sin() + camera.x();
        let surface_world_z_delta = camera.angle_sin() * ratio;
        let surface_world_x_delta = camera.angle_cos() * ratio;

        self.plotter.plot(Stripe::Horizontal(HorizontalStripe {
            y: proj_y - self.min_y,
            left: stripe.left_screen_x,
            right: stripe.right_screen_x,
            left_u: fixed::Value::from_f32(surface_world_x),
            left_v: fixed::Value::from_f32(surface_world_z),
            delta_u: fixed::Value::from_f32(surface_world_x_delta),
            delta_v: fixed::Value::from_f32(surface_world_z_delta),
            texture: stripe.texture,
            shade_amount: ((SHADING_FACTOR * surface_view_z) as i32).clamp(0, 255),
        }));
    }
}

/*──────────────────────── surface parameters ─────────────────────────*/

struct FaceSurface<'a> {
    left_screen_x: i32,
    right_screen_x: i32,

    top_screen_y: fixed::Value,
    top_screen_y_delta: fixed::Value,
    bottom_screen_y: fixed::Value,
    bottom_screen_y_delta: fixed::Value,

    eq_top: f32,
    eq_top_delta: f32,
    eq_bottom: f32,
    eq_bottom_delta: f32,
    eq_cross: f32,
    texture: &'a Texture,

    affects_top_clip: bool,
    affects_bottom_clip: bool,
}

struct CeilingSurface<'a> {
    left_screen_x: i32,
    right_screen_x: i32,
    bottom_screen_y: fixed::Value,
    bottom_screen_y_delta: fixed::Value,
    view_y: f32,
    texture: &'a Texture,
}

struct FloorSurface<'a> {
    left_screen_x: i32,
    right_screen_x: i32,
    top_screen_y: fixed::Value,
    top_screen_y_delta: fixed::Value,
    view_y: f32,
    texture: &'a Texture,
}

struct SurfaceStripe<'a> {
    screen_y: i32,
    left_screen_x: i32,
    right_screen_x: i32,
    view_y: f32,
    texture: &'a Texture,
}

/*────────────────────────────────── Tests ─────────────────────────────*/
