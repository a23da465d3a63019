//! Graph rendering
//!
//! Presentation only: lays a [`Graph`] out with a spring layout and draws it
//! onto an [`SvgCanvas`], titled with its Wagner score.

mod layout;
mod svg;

pub use layout::spring_layout;
pub use svg::SvgCanvas;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::GraphError;
use crate::graph::Graph;

const NODE_RADIUS: f64 = 11.0;
const NODE_FILL: &str = "lightyellow";
const NODE_STROKE: &str = "black";
const EDGE_STROKE: &str = "black";
const LABEL_COLOR: &str = "black";

/// Canvas size and layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Spring layout iterations
    pub iterations: usize,
    /// Layout seed
    pub seed: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 480,
            height: 480,
            iterations: 50,
            seed: 42,
        }
    }
}

impl Graph {
    /// Title shown above the drawing: optional prefix, then the score line.
    pub fn render_title(&self, title: Option<&str>) -> Result<String, GraphError> {
        let score_line = format!("wagner1 score = {}", self.wagner_score()?);
        Ok(match title {
            Some(prefix) => format!("{}\n{}", prefix, score_line),
            None => score_line,
        })
    }

    /// Draw onto a caller-supplied canvas and return.
    ///
    /// # Errors
    /// - `DomainError` on the empty graph, whose score is undefined
    pub fn draw(
        &self,
        title: Option<&str>,
        canvas: &mut SvgCanvas,
        options: &RenderOptions,
    ) -> Result<(), GraphError> {
        canvas.set_title(&self.render_title(title)?);

        let pos = spring_layout(self, options.iterations, options.seed);
        let points: Vec<(f64, f64)> = pos.iter().map(|&p| canvas.project(p)).collect();

        for (i, j) in self.edges() {
            canvas.line(points[i], points[j], EDGE_STROKE);
        }
        for (node, &point) in points.iter().enumerate() {
            canvas.circle(point, NODE_RADIUS, NODE_FILL, NODE_STROKE);
            canvas.label(point, &node.to_string(), LABEL_COLOR);
        }

        debug!(
            node_count = self.node_count(),
            edge_count = self.edge_count(),
            "drew graph"
        );
        Ok(())
    }

    /// Draw onto a fresh canvas sized by `options` and hand it back.
    pub fn render(&self, title: Option<&str>, options: &RenderOptions) -> Result<SvgCanvas, GraphError> {
        let mut canvas = SvgCanvas::new(options.width, options.height);
        self.draw(title, &mut canvas, options)?;
        Ok(canvas)
    }
}
