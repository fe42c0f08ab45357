//! PNG and SVG diagrams drawn with plotters, no Graphviz required.
//!
//! [`Layout`] places the root on top, direct dependencies on the rows below
//! it and indirect dependencies underneath, wrapping every tier at
//! [`MAX_COLUMNS`]. Drawing only reads the layout.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use super::dot::{label_lines, NodeFill, LEGEND};
use crate::graph::{EnhancedDependencyGraph, EnhancedNode};

pub const MAX_COLUMNS: usize = 5;
const BOX_WIDTH: i32 = 280;
const BOX_HEIGHT: i32 = 80;
const H_GAP: i32 = 24;
const V_GAP: i32 = 56;
const MARGIN: i32 = 30;
const LINE_HEIGHT: i32 = 14;
const LEGEND_SPACING: i32 = 170;
const LEGEND_SWATCH: i32 = 14;
const MAX_LABEL_CHARS: usize = 38;
const FONT: &str = "sans-serif";

#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub x: i32,
    pub y: i32,
    pub fill: NodeFill,
    pub lines: Vec<String>,
}

impl NodeBox {
    fn bottom_center(&self) -> (i32, i32) {
        (self.x + BOX_WIDTH / 2, self.y + BOX_HEIGHT)
    }

    fn top_center(&self) -> (i32, i32) {
        (self.x + BOX_WIDTH / 2, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// `boxes[0]` is the root.
    pub boxes: Vec<NodeBox>,
    /// Indices into `boxes`.
    pub edges: Vec<(usize, usize)>,
    legend_y: i32,
}

impl Layout {
    pub fn compute(graph: &EnhancedDependencyGraph) -> Self {
        let root = &graph.graph.root;
        let root_box = NodeBox {
            x: 0,
            y: 0,
            fill: NodeFill::Root,
            lines: vec![truncate(&root.name), format!("({})", root.version)],
        };

        let (direct, indirect): (Vec<_>, Vec<_>) =
            graph.enhanced_nodes.values().partition(|n| n.is_direct());
        let to_box = |node: &&EnhancedNode| NodeBox {
            x: 0,
            y: 0,
            fill: NodeFill::of(node),
            lines: label_lines(node).iter().map(|l| truncate(l)).collect(),
        };

        let mut rows: Vec<Vec<NodeBox>> = vec![vec![root_box]];
        for tier in [&direct, &indirect] {
            let boxes: Vec<NodeBox> = tier.iter().map(to_box).collect();
            rows.extend(boxes.chunks(MAX_COLUMNS).map(|c| c.to_vec()));
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(1) as i32;
        let grid_width = 2 * MARGIN + columns * BOX_WIDTH + (columns - 1) * H_GAP;
        let legend_width = 2 * MARGIN + LEGEND.len() as i32 * LEGEND_SPACING;
        let width = grid_width.max(legend_width);

        let mut boxes = Vec::new();
        for (r, row) in rows.into_iter().enumerate() {
            let n = row.len() as i32;
            let row_width = n * BOX_WIDTH + (n - 1) * H_GAP;
            let x0 = (width - row_width) / 2;
            let y = MARGIN + r as i32 * (BOX_HEIGHT + V_GAP);
            for (c, mut b) in row.into_iter().enumerate() {
                b.x = x0 + c as i32 * (BOX_WIDTH + H_GAP);
                b.y = y;
                boxes.push(b);
            }
        }

        let edges = (1..=direct.len()).map(|i| (0, i)).collect();
        let last_bottom = boxes.iter().map(|b| b.y + BOX_HEIGHT).max().unwrap_or(MARGIN);
        let legend_y = last_bottom + V_GAP / 2;
        let height = legend_y + LEGEND_SWATCH + MARGIN;

        Self {
            width: width as u32,
            height: height as u32,
            boxes,
            edges,
            legend_y,
        }
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_LABEL_CHARS {
        return s.to_string();
    }
    let mut short: String = s.chars().take(MAX_LABEL_CHARS - 1).collect();
    short.push('…');
    short
}

fn rgb(fill: NodeFill) -> RGBColor {
    let (r, g, b) = fill.rgb();
    RGBColor(r, g, b)
}

fn draw<DB: DrawingBackend>(area: DrawingArea<DB, Shift>, layout: &Layout) -> Result<()>
where
    DB::ErrorType: 'static,
{
    area.fill(&WHITE)?;

    for &(from, to) in &layout.edges {
        let (Some(parent), Some(child)) = (layout.boxes.get(from), layout.boxes.get(to)) else {
            continue;
        };
        let start = parent.bottom_center();
        let (cx, cy) = child.top_center();
        area.draw(&PathElement::new(vec![start, (cx, cy)], BLACK.stroke_width(1)))?;
        area.draw(&Polygon::new(
            vec![(cx, cy), (cx - 5, cy - 9), (cx + 5, cy - 9)],
            BLACK.filled(),
        ))?;
    }

    for b in &layout.boxes {
        let corners = [(b.x, b.y), (b.x + BOX_WIDTH, b.y + BOX_HEIGHT)];
        area.draw(&Rectangle::new(corners, rgb(b.fill).filled()))?;
        area.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))?;
        for (i, line) in b.lines.iter().enumerate() {
            let pos = (b.x + 8, b.y + 6 + i as i32 * LINE_HEIGHT);
            area.draw(&Text::new(line.clone(), pos, (FONT, 12).into_font()))?;
        }
    }

    for (i, (label, fill)) in LEGEND.iter().enumerate() {
        let x = MARGIN + i as i32 * LEGEND_SPACING;
        let y = layout.legend_y;
        let swatch = [(x, y), (x + LEGEND_SWATCH, y + LEGEND_SWATCH)];
        area.draw(&Rectangle::new(swatch, rgb(*fill).filled()))?;
        area.draw(&Rectangle::new(swatch, BLACK.stroke_width(1)))?;
        area.draw(&Text::new(
            label.to_string(),
            (x + LEGEND_SWATCH + 6, y + 1),
            (FONT, 12).into_font(),
        ))?;
    }

    area.present()?;
    Ok(())
}

/// Render the graph to a PNG file.
pub fn write_png(graph: &EnhancedDependencyGraph, path: &Path) -> Result<()> {
    let layout = Layout::compute(graph);
    let (w, h) = (layout.width, layout.height);
    let mut buf = vec![0u8; (w * h * 3) as usize];
    {
        let backend = BitMapBackend::with_buffer(&mut buf, (w, h));
        draw(backend.into_drawing_area(), &layout)?;
    }
    image::save_buffer_with_format(path, &buf, w, h, image::ColorType::Rgb8, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(width = w, height = h, nodes = layout.boxes.len(), "rendered PNG");
    Ok(())
}

/// Render the graph to an SVG file.
pub fn write_svg(graph: &EnhancedDependencyGraph, path: &Path) -> Result<()> {
    let layout = Layout::compute(graph);
    {
        let backend = SVGBackend::new(path, (layout.width, layout.height));
        draw(backend.into_drawing_area(), &layout)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    debug!(nodes = layout.boxes.len(), "rendered SVG");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testutil::modfile;
    use crate::graph::DependencyGraph;
    use crate::parser::LockEntries;
    use crate::report::testutil::analyzed;

    fn graph_with(direct: usize, indirect: usize) -> EnhancedDependencyGraph {
        let names: Vec<(String, bool)> = (0..direct)
            .map(|i| (format!("example.com/direct{:02}", i), false))
            .chain((0..indirect).map(|i| (format!("example.com/indirect{:02}", i), true)))
            .collect();
        let requires: Vec<(&str, &str, bool)> = names
            .iter()
            .map(|(n, ind)| (n.as_str(), "v1.0.0", *ind))
            .collect();
        let base = DependencyGraph::from_modfile(&modfile(&requires));
        EnhancedDependencyGraph::build(base, LockEntries::new())
    }

    #[test]
    fn test_root_only() {
        let layout = Layout::compute(&graph_with(0, 0));
        assert_eq!(layout.boxes.len(), 1);
        assert!(layout.edges.is_empty());
        assert_eq!(layout.boxes[0].fill, NodeFill::Root);
        assert_eq!(layout.boxes[0].lines, vec!["example.com/app", "(main)"]);
        assert!(layout.width >= (2 * MARGIN + BOX_WIDTH) as u32);
    }

    #[test]
    fn test_tiers_and_wrapping() {
        let layout = Layout::compute(&graph_with(7, 2));
        assert_eq!(layout.boxes.len(), 10);
        assert_eq!(layout.edges.len(), 7);
        assert!(layout.edges.iter().all(|(from, _)| *from == 0));

        let rows: Vec<i32> = {
            let mut ys: Vec<i32> = layout.boxes.iter().map(|b| b.y).collect();
            ys.dedup();
            ys
        };
        // root, 5 direct, 2 direct, 2 indirect
        assert_eq!(rows.len(), 4);
        assert_eq!(layout.boxes[1].y, layout.boxes[5].y);
        assert!(layout.boxes[6].y > layout.boxes[5].y);
        assert_eq!(layout.boxes[8].fill, NodeFill::Indirect);
        assert_eq!(
            layout.width,
            (2 * MARGIN + 5 * BOX_WIDTH + 4 * H_GAP) as u32
        );
    }

    #[test]
    fn test_boxes_stay_inside_canvas() {
        let layout = Layout::compute(&graph_with(12, 9));
        for b in &layout.boxes {
            assert!(b.x >= 0 && b.y >= 0);
            assert!(b.x + BOX_WIDTH <= layout.width as i32);
            assert!(b.y + BOX_HEIGHT <= layout.height as i32);
        }
    }

    #[test]
    fn test_annotated_labels_and_fills() {
        let layout = Layout::compute(&analyzed());
        let gin = layout
            .boxes
            .iter()
            .find(|b| b.lines[0] == "github.com/gin-gonic/gin")
            .unwrap();
        assert_eq!(gin.fill, NodeFill::DirectWithIssues);
        assert!(gin.lines.contains(&"⚠ Security Issues".to_string()));
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let long = "github.com/some-very-long-organization-name/with-a-long-repository";
        let short = truncate(long);
        assert_eq!(short.chars().count(), MAX_LABEL_CHARS);
        assert!(short.ends_with('…'));
        assert_eq!(truncate("short"), "short");
    }
}
