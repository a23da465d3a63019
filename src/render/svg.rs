//! Minimal SVG drawing surface.

use std::fmt::Write as _;
use std::path::Path;

/// Space reserved around the plot area, in pixels.
const MARGIN: f64 = 30.0;
/// Height of one title line, in pixels.
const TITLE_LINE_HEIGHT: f64 = 18.0;

/// An SVG canvas that accumulates shapes until it is serialised.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: u32,
    height: u32,
    title: Vec<String>,
    elements: Vec<String>,
}

impl SvgCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Replace the title; embedded newlines become separate lines.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.lines().map(str::to_string).collect();
    }

    pub fn title(&self) -> String {
        self.title.join("\n")
    }

    /// Map a layout coordinate in `[-1, 1]²` to pixel space, below the title.
    pub fn project(&self, p: [f64; 2]) -> (f64, f64) {
        let top = MARGIN + TITLE_LINE_HEIGHT * self.title.len() as f64;
        let plot_w = (self.width as f64 - 2.0 * MARGIN).max(1.0);
        let plot_h = (self.height as f64 - top - MARGIN).max(1.0);
        let x = MARGIN + (p[0] + 1.0) / 2.0 * plot_w;
        // SVG y grows downwards
        let y = top + (1.0 - (p[1] + 1.0) / 2.0) * plot_h;
        (x, y)
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &str) {
        self.elements.push(format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1" />"#,
            from.0, from.1, to.0, to.1, stroke
        ));
    }

    pub fn circle(&mut self, center: (f64, f64), radius: f64, fill: &str, stroke: &str) {
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="1" />"#,
            center.0, center.1, radius, fill, stroke
        ));
    }

    pub fn label(&mut self, at: (f64, f64), text: &str, color: &str) {
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-family="sans-serif" font-size="12" text-anchor="middle" dominant-baseline="central">{}</text>"#,
            at.0,
            at.1,
            color,
            escape(text)
        ));
    }

    /// Serialise the whole canvas as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white" />"#);
        for (i, line) in self.title.iter().enumerate() {
            let _ = writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="14" text-anchor="middle">{}</text>"#,
                self.width as f64 / 2.0,
                MARGIN / 2.0 + TITLE_LINE_HEIGHT * (i as f64 + 0.5),
                escape(line)
            );
        }
        for element in &self.elements {
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_svg())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
