// ********* Radar charts ***********

use std::f64::consts::PI;
use std::fmt::Write as _;

use crate::config::ScoreMap;

const CANVAS_WIDTH: f64 = 640.0;
const CANVAS_HEIGHT: f64 = 560.0;
const CENTER_X: f64 = 320.0;
const CENTER_Y: f64 = 300.0;
const RADIUS: f64 = 190.0;
// The first axis points up, the others follow counterclockwise.
const ROTATION_DEG: f64 = 90.0;
const GRID_STEPS: usize = 5;
const FONT: &str = "Helvetica, Arial, sans-serif";

/// One axis of a radar chart.
#[derive(PartialEq, Debug, Clone)]
pub struct RadarAxis {
    pub label: String,
    pub value: f64,
    /// The label displayed next to the vertex.
    pub text: String,
}

/// A radar (spider) chart, ready to be displayed.
///
/// Building the chart does not display anything: the caller decides where the
/// chart goes, for instance by writing the output of [RadarChart::to_svg] to a file.
#[derive(PartialEq, Debug, Clone)]
pub struct RadarChart {
    pub title: String,
    pub axes: Vec<RadarAxis>,
    pub radial_range: (f64, f64),
    pub fill: bool,
}

/// Builds the radar chart of the scores of one group.
///
/// The chart has one axis per band, in the order of the scores, a radial axis from 0 to 1
/// and the value of each vertex written with two decimals.
pub fn plot_spider_chart(scores: &ScoreMap, lead_name: &str) -> RadarChart {
    let axes = scores
        .scores
        .iter()
        .map(|s| RadarAxis {
            label: s.name.clone(),
            value: s.ratio,
            text: format!("{:.2}", s.ratio),
        })
        .collect();
    RadarChart {
        title: lead_name.to_string(),
        axes,
        radial_range: (0.0, 1.0),
        fill: true,
    }
}

impl RadarChart {
    /// The coordinates of each vertex of the value polygon, in the SVG frame.
    pub fn vertices(&self) -> Vec<(f64, f64)> {
        (0..self.axes.len())
            .map(|idx| self.point(idx, self.normalized(self.axes[idx].value)))
            .collect()
    }

    /// Renders the chart as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{:.0}' height='{:.0}' viewBox='0 0 {:.0} {:.0}' role='img'>",
            CANVAS_WIDTH, CANVAS_HEIGHT, CANVAS_WIDTH, CANVAS_HEIGHT
        );
        let _ = writeln!(
            svg,
            "  <title>{}</title>",
            escape_text(&self.title)
        );
        let _ = writeln!(
            svg,
            "  <rect width='{:.0}' height='{:.0}' fill='#ffffff'/>",
            CANVAS_WIDTH, CANVAS_HEIGHT
        );
        let _ = writeln!(
            svg,
            "  <text x='32' y='44' fill='#2a3f5f' font-family='{}' font-size='22'>{}</text>",
            FONT,
            escape_text(&self.title)
        );

        let n = self.axes.len();
        if n > 0 {
            self.write_grid(&mut svg);
            self.write_values(&mut svg);
        }

        let _ = writeln!(svg, "</svg>");
        svg
    }

    fn write_grid(&self, svg: &mut String) {
        let n = self.axes.len();
        let (r_min, r_max) = self.radial_range;
        let _ = writeln!(svg, "  <g class='grid' fill='none' stroke='#d5dbe5'>");
        for step in 1..=GRID_STEPS {
            let level = step as f64 / GRID_STEPS as f64;
            let points: Vec<(f64, f64)> = (0..n).map(|idx| self.point(idx, level)).collect();
            let _ = writeln!(svg, "    <polygon points='{}'/>", format_points(&points));
        }
        for idx in 0..n {
            let (x, y) = self.point(idx, 1.0);
            let _ = writeln!(
                svg,
                "    <line x1='{:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}'/>",
                CENTER_X, CENTER_Y, x, y
            );
        }
        let _ = writeln!(svg, "  </g>");

        // Tick labels of the radial axis, along the first axis.
        let _ = writeln!(
            svg,
            "  <g class='radial-axis' fill='#000000' font-family='{}' font-size='11'>",
            FONT
        );
        for step in 0..=GRID_STEPS {
            let level = step as f64 / GRID_STEPS as f64;
            let (x, y) = self.point(0, level);
            let _ = writeln!(
                svg,
                "    <text x='{:.1}' y='{:.1}'>{}</text>",
                x + 4.0,
                y + 4.0,
                format_tick(r_min + level * (r_max - r_min))
            );
        }
        let _ = writeln!(svg, "  </g>");

        let _ = writeln!(
            svg,
            "  <g class='angular-axis' fill='#2a3f5f' font-family='{}' font-size='14'>",
            FONT
        );
        for (idx, axis) in self.axes.iter().enumerate() {
            let (x, y) = self.point(idx, 1.12);
            let anchor = if (x - CENTER_X).abs() < 1.0 {
                "middle"
            } else if x > CENTER_X {
                "start"
            } else {
                "end"
            };
            let _ = writeln!(
                svg,
                "    <text x='{:.1}' y='{:.1}' text-anchor='{}'>{}</text>",
                x,
                y + 5.0,
                anchor,
                escape_text(&axis.label)
            );
        }
        let _ = writeln!(svg, "  </g>");
    }

    fn write_values(&self, svg: &mut String) {
        let vertices = self.vertices();
        let fill = if self.fill {
            "rgba(99,110,250,0.5)"
        } else {
            "none"
        };
        let _ = writeln!(
            svg,
            "  <polygon class='trace' points='{}' fill='{}' stroke='#636efa' stroke-width='2'/>",
            format_points(&vertices),
            fill
        );
        let _ = writeln!(
            svg,
            "  <g class='points' fill='#636efa' font-family='{}' font-size='12'>",
            FONT
        );
        for ((x, y), axis) in vertices.iter().zip(self.axes.iter()) {
            let _ = writeln!(svg, "    <circle cx='{:.1}' cy='{:.1}' r='4'/>", x, y);
            let _ = writeln!(
                svg,
                "    <text x='{:.1}' y='{:.1}' fill='#000000'>{}</text>",
                x + 6.0,
                y - 6.0,
                escape_text(&axis.text)
            );
        }
        let _ = writeln!(svg, "  </g>");
    }

    // Position of the value along its range, clamped to the drawing area.
    fn normalized(&self, value: f64) -> f64 {
        let (r_min, r_max) = self.radial_range;
        if r_max <= r_min {
            return 0.0;
        }
        ((value - r_min) / (r_max - r_min)).clamp(0.0, 1.0)
    }

    fn point(&self, idx: usize, level: f64) -> (f64, f64) {
        let n = self.axes.len().max(1) as f64;
        let angle = (ROTATION_DEG + 360.0 * idx as f64 / n) * PI / 180.0;
        (
            CENTER_X + RADIUS * level * angle.cos(),
            CENTER_Y - RADIUS * level * angle.sin(),
        )
    }
}

fn format_points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<String>>()
        .join(" ")
}

fn format_tick(v: f64) -> String {
    let s = format!("{:.1}", v);
    match s.as_str() {
        "0.0" => "0".to_string(),
        "1.0" => "1".to_string(),
        _ => s,
    }
}

/// Escapes the characters that cannot appear as such in SVG or HTML text.
pub fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BandScore;

    fn scores(values: &[(&str, f64)]) -> ScoreMap {
        ScoreMap {
            responses: 1,
            scores: values
                .iter()
                .map(|(name, ratio)| BandScore {
                    name: name.to_string(),
                    hits: 0,
                    cells: 5,
                    ratio: *ratio,
                })
                .collect(),
        }
    }

    #[test]
    fn chart_follows_the_scores() {
        let chart = plot_spider_chart(
            &scores(&[("Resilience", 0.5), ("Culture", 1.0 / 3.0)]),
            "Alice",
        );
        assert_eq!(chart.title, "Alice");
        assert_eq!(chart.radial_range, (0.0, 1.0));
        assert!(chart.fill);
        let labels: Vec<&str> = chart.axes.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Resilience", "Culture"]);
        let texts: Vec<&str> = chart.axes.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["0.50", "0.33"]);
    }

    #[test]
    fn vertices_on_the_axes() {
        let chart = plot_spider_chart(
            &scores(&[
                ("A", 1.0),
                ("B", 0.5),
                ("C", 0.0),
                ("D", 2.0),
            ]),
            "Bob",
        );
        let v = chart.vertices();
        // First axis points up.
        assert!((v[0].0 - CENTER_X).abs() < 1e-9);
        assert!((v[0].1 - (CENTER_Y - RADIUS)).abs() < 1e-9);
        // Second axis points left, halfway.
        assert!((v[1].0 - (CENTER_X - RADIUS / 2.0)).abs() < 1e-9);
        // Zero is the center.
        assert!((v[2].0 - CENTER_X).abs() < 1e-9);
        assert!((v[2].1 - CENTER_Y).abs() < 1e-9);
        // Out of range values stay on the outer ring.
        assert!((v[3].0 - (CENTER_X + RADIUS)).abs() < 1e-9);
    }

    #[test]
    fn svg_document() {
        let chart = plot_spider_chart(&scores(&[("Resilience", 0.5), ("Culture", 0.25)]), "O'Neil & co");
        let svg = chart.to_svg();
        assert!(svg.starts_with("<svg xmlns='http://www.w3.org/2000/svg'"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("O&apos;Neil &amp; co"));
        assert!(svg.contains(">Resilience</text>"));
        assert!(svg.contains(">0.50</text>"));
        assert!(svg.contains(">0.25</text>"));
        assert!(svg.contains("fill='rgba(99,110,250,0.5)'"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn empty_chart_has_a_title() {
        let chart = plot_spider_chart(&scores(&[]), "Nobody");
        let svg = chart.to_svg();
        assert!(svg.contains(">Nobody</text>"));
        assert!(!svg.contains("<polygon"));
    }
}
