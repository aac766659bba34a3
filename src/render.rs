//! Drawing a bipartite graph to PNG or SVG.
//!
//! The layout is two horizontal bands: row vertices on top, column vertices
//! below. With groups present, columns are ordered by group so each cluster
//! is drawn side by side.

use crate::bipartite::{BipartiteGraph, Shape};
use crate::error::{Error, Result};
use crate::palette::INK;
use log::{debug, info};
use std::path::Path;

/// 5x8 bitmap glyphs for the digits 0-9.
const DIGITS_5X8: [[u8; 8]; 10] = [
    [0x70, 0x88, 0x98, 0xA8, 0xC8, 0x88, 0x70, 0x00],
    [0x20, 0x60, 0x20, 0x20, 0x20, 0x20, 0x70, 0x00],
    [0x70, 0x88, 0x08, 0x30, 0x40, 0x80, 0xF8, 0x00],
    [0xF8, 0x10, 0x20, 0x10, 0x08, 0x88, 0x70, 0x00],
    [0x10, 0x30, 0x50, 0x90, 0xF8, 0x10, 0x10, 0x00],
    [0xF8, 0x80, 0xF0, 0x08, 0x08, 0x88, 0x70, 0x00],
    [0x30, 0x40, 0x80, 0xF0, 0x88, 0x88, 0x70, 0x00],
    [0xF8, 0x08, 0x10, 0x20, 0x40, 0x40, 0x40, 0x00],
    [0x70, 0x88, 0x88, 0x70, 0x88, 0x88, 0x70, 0x00],
    [0x70, 0x88, 0x88, 0x78, 0x08, 0x10, 0x60, 0x00],
];

const EDGE_COLOR: (u8, u8, u8) = (96, 96, 96);
const EDGE_PEN: u32 = 3;
const MARGIN: f64 = 30.0;
const MAX_RADIUS: f64 = 14.0;

/// Vertex centres and the common vertex radius.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub radius: f64,
    pub positions: Vec<(f64, f64)>,
}

fn spread(count: usize, width: f64) -> (Vec<f64>, f64) {
    let usable = (width - 2.0 * MARGIN).max(1.0);
    let step = usable / count.max(1) as f64;
    let xs = (0..count).map(|k| MARGIN + step * (k as f64 + 0.5)).collect();
    (xs, step)
}

/// Place rows on the upper band and columns on the lower band.
pub fn layered_layout(graph: &BipartiteGraph, width: u32, height: u32) -> Layout {
    let (w, h) = (width as f64, height as f64);
    let (row_xs, row_step) = spread(graph.height(), w);
    let (col_xs, col_step) = spread(graph.width(), w);
    let radius = (row_step.min(col_step) / 2.5).clamp(2.0, MAX_RADIUS);

    let mut column_order: Vec<usize> = (0..graph.width()).collect();
    if let Some(groups) = graph.groups() {
        column_order.sort_by_key(|&j| groups[j]);
    }

    let mut positions = vec![(0.0, 0.0); graph.vertex_count()];
    let top = MARGIN + radius;
    let bottom = (h - MARGIN - radius).max(top);
    for (i, &x) in row_xs.iter().enumerate() {
        positions[graph.row_vertex(i)] = (x, top);
    }
    for (slot, &j) in column_order.iter().enumerate() {
        positions[graph.column_vertex(j)] = (col_xs[slot], bottom);
    }

    debug!("Layout: {}x{} px, vertex radius {:.1}", width, height, radius);
    Layout {
        width,
        height,
        radius,
        positions,
    }
}

/// RGB pixel buffer with clipping writes.
struct Canvas {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or(Error::ImageBuffer { width, height })?;
        Ok(Canvas {
            width,
            height,
            buffer: vec![255; len],
        })
    }

    fn set(&mut self, x: i64, y: i64, (r, g, b): (u8, u8, u8)) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.buffer[idx] = r;
        self.buffer[idx + 1] = g;
        self.buffer[idx + 2] = b;
    }

    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, rgb: (u8, u8, u8)) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, rgb);
            }
        }
    }

    /// Bresenham line stamped with a square pen.
    fn line(&mut self, from: (f64, f64), to: (f64, f64), pen: u32, rgb: (u8, u8, u8)) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = pen as i64 / 2;
        loop {
            self.fill_rect(x0 - half, y0 - half, x0 + half, y0 + half, rgb);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn disc(&mut self, cx: f64, cy: f64, radius: f64, rgb: (u8, u8, u8)) {
        let r = radius.ceil() as i64;
        let (ix, iy) = (cx.round() as i64, cy.round() as i64);
        for dy in -r..=r {
            for dx in -r..=r {
                if ((dx * dx + dy * dy) as f64) <= radius * radius {
                    self.set(ix + dx, iy + dy, rgb);
                }
            }
        }
    }

    fn digit(&mut self, x: i64, y: i64, glyph: &[u8; 8], scale: i64, rgb: (u8, u8, u8)) {
        for (j, bits) in glyph.iter().enumerate() {
            for z in 0..8i64 {
                if (*bits >> (7 - z)) & 1 == 1 {
                    let px = x + z * scale;
                    let py = y + j as i64 * scale;
                    self.fill_rect(px, py, px + scale - 1, py + scale - 1, rgb);
                }
            }
        }
    }

    /// Draw a decimal label centred on `(cx, cy)`.
    fn label(&mut self, cx: f64, cy: f64, text: &str, scale: i64, rgb: (u8, u8, u8)) {
        let advance = 6 * scale;
        let total = advance * text.len() as i64;
        let mut x = cx.round() as i64 - total / 2;
        let y = cy.round() as i64 - 4 * scale;
        for ch in text.chars() {
            if let Some(d) = ch.to_digit(10) {
                self.digit(x, y, &DIGITS_5X8[d as usize], scale, rgb);
            }
            x += advance;
        }
    }
}

/// Rasterize the graph into an RGB image.
pub fn render_png(graph: &BipartiteGraph, layout: &Layout) -> Result<image::RgbImage> {
    let mut canvas = Canvas::new(layout.width, layout.height)?;
    let pos = &layout.positions;
    let r = layout.radius;

    for &(a, b) in graph.edges() {
        canvas.line(pos[a], pos[b], EDGE_PEN, EDGE_COLOR);
    }

    let label_scale = if r >= 10.0 { 2 } else { 1 };
    for (v, vertex) in graph.vertices().iter().enumerate() {
        let (x, y) = pos[v];
        match vertex.shape {
            Shape::Square => {
                let (x0, y0) = ((x - r).round() as i64, (y - r).round() as i64);
                let (x1, y1) = ((x + r).round() as i64, (y + r).round() as i64);
                canvas.fill_rect(x0, y0, x1, y1, INK.rgb);
                canvas.fill_rect(x0 + 1, y0 + 1, x1 - 1, y1 - 1, vertex.color.rgb);
            }
            Shape::Circle => {
                canvas.disc(x, y, r, INK.rgb);
                canvas.disc(x, y, r - 1.2, vertex.color.rgb);
            }
        }
        canvas.label(x, y, &vertex.label, label_scale, INK.rgb);
    }

    let (width, height) = (canvas.width, canvas.height);
    image::RgbImage::from_raw(width, height, canvas.buffer)
        .ok_or(Error::ImageBuffer { width, height })
}

/// Render the graph as an SVG document.
pub fn render_svg(graph: &BipartiteGraph, layout: &Layout) -> String {
    let pos = &layout.positions;
    let r = layout.radius;
    let font_size = (r * 1.1).max(6.0);

    let mut svg = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<style>
  .label {{ font-family: 'DejaVu Sans Mono', 'Courier New', monospace; font-size: {fs:.1}px; }}
</style>
<rect width="100%" height="100%" fill="white"/>
"#,
        w = layout.width,
        h = layout.height,
        fs = font_size
    );

    let (er, eg, eb) = EDGE_COLOR;
    for &(a, b) in graph.edges() {
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="rgb({},{},{})" stroke-width="{}"/>"#,
            pos[a].0, pos[a].1, pos[b].0, pos[b].1, er, eg, eb, EDGE_PEN
        ));
        svg.push('\n');
    }

    for (v, vertex) in graph.vertices().iter().enumerate() {
        let (x, y) = pos[v];
        let fill = vertex.color.name;
        match vertex.shape {
            Shape::Square => svg.push_str(&format!(
                r#"<rect class="{}" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="black" stroke-width="1.2"/>"#,
                vertex.shape.tag(), x - r, y - r, 2.0 * r, 2.0 * r, fill
            )),
            Shape::Circle => svg.push_str(&format!(
                r#"<circle class="{}" cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" stroke="black" stroke-width="1.2"/>"#,
                vertex.shape.tag(), x, y, r, fill
            )),
        }
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text class="label" x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
            x, y, vertex.label
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

/// Lay out and write the graph; the extension of `out` picks SVG or PNG.
pub fn write_graph(graph: &BipartiteGraph, out: &Path, width: u32, height: u32) -> Result<()> {
    let layout = layered_layout(graph, width, height);
    let is_svg = out
        .extension()
        .map(|ext| ext.to_ascii_lowercase() == "svg")
        .unwrap_or(false);

    if is_svg {
        info!("Rendering SVG...");
        let svg = render_svg(graph, &layout);
        info!("Saving to {:?}...", out);
        std::fs::write(out, svg)?;
    } else {
        info!("Rendering image...");
        let img = render_png(graph, &layout)?;
        info!("Saving to {:?}...", out);
        img.save(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bipartite::build_bipartite;
    use crate::mapping::Mapping;
    use crate::matrix::Matrix;

    fn graph(mapping: Option<Vec<i64>>) -> BipartiteGraph {
        let m = Matrix::from_rows(vec![vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]]).unwrap();
        let mapping = mapping.map(Mapping::new);
        build_bipartite(&m, mapping.as_ref()).unwrap()
    }

    #[test]
    fn test_rows_above_columns() {
        let g = graph(None);
        let layout = layered_layout(&g, 400, 300);
        assert_eq!(layout.positions.len(), 5);
        let row_y = layout.positions[0].1;
        let col_y = layout.positions[g.column_vertex(0)].1;
        assert!(row_y < col_y);
        assert!(layout.positions[0].0 < layout.positions[1].0);
    }

    #[test]
    fn test_columns_grouped_by_cluster() {
        let g = graph(Some(vec![2, 1, 2]));
        let layout = layered_layout(&g, 400, 300);
        let x = |j: usize| layout.positions[g.column_vertex(j)].0;
        // Cluster 1 first, then both cluster-2 columns in column order.
        assert!(x(1) < x(0));
        assert!(x(0) < x(2));
    }

    #[test]
    fn test_png_has_requested_size_and_ink() {
        let g = graph(Some(vec![0, 1, 2]));
        let layout = layered_layout(&g, 200, 120);
        let img = render_png(&g, &layout).unwrap();
        assert_eq!(img.dimensions(), (200, 120));
        assert!(img.pixels().any(|p| p.0 == [255, 0, 0]));
        assert!(img.pixels().any(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_canvas_size_overflow_is_an_error() {
        assert!(matches!(
            Canvas::new(u32::MAX, u32::MAX),
            Err(Error::ImageBuffer { width: u32::MAX, height: u32::MAX })
        ));
        let canvas = Canvas::new(70_000, 1).unwrap();
        assert_eq!(canvas.buffer.len(), 210_000);
    }

    #[test]
    fn test_svg_contains_every_element() {
        let g = graph(Some(vec![0, 1, 2]));
        let svg = render_svg(&g, &layered_layout(&g, 400, 300));
        assert_eq!(svg.matches("<line ").count(), g.edge_count());
        assert_eq!(svg.matches("<rect class=\"square\"").count(), 2);
        assert_eq!(svg.matches("<circle ").count(), 3);
        assert!(svg.contains(r#"fill="blue""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
