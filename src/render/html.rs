use crate::model::{AggregatedRow, FitLine};
use serde::Serialize;

#[derive(Serialize)]
struct ChartData<'a> {
    title: &'static str,
    x_label: &'static str,
    y_label: &'static str,
    y2_label: &'static str,
    rows: &'a [AggregatedRow],
    fit: FitView,
}

#[derive(Serialize)]
struct FitView {
    slope: f64,
    intercept: f64,
    label: String,
}

/// Render a self-contained HTML chart (data embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from
/// JS template literals (e.g., `${x}`), which would conflict with Rust
/// formatting.
pub fn render_html_chart(rows: &[AggregatedRow], fit: &FitLine) -> anyhow::Result<String> {
    let data = ChartData {
        title: "Latency and Size vs. Object Count",
        x_label: "Object Count",
        y_label: "Latency (ms)",
        y2_label: "Size (KB)",
        rows,
        fit: FitView {
            slope: fit.slope,
            intercept: fit.intercept,
            label: fit.label(),
        },
    };
    let json = serde_json::to_string(&data)?; // embedded as JS object literal

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>netphys latency chart</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; padding: 16px; }
  h1 { font-size: 18px; margin: 0 0 8px 0; }
  .legend { display: flex; justify-content: flex-end; gap: 16px; font-size: 13px; margin-bottom: 4px; }
  .legend .item { display: flex; align-items: center; gap: 6px; }
  .legend .swatch { width: 18px; height: 3px; display: inline-block; }
  .readout { font-size: 13px; color: #333; height: 18px; margin-top: 6px; font-variant-numeric: tabular-nums; }
  svg { display: block; width: 100%; height: auto; }
  .axis line, .axis path { stroke: #888; }
  .axis text { font-size: 11px; fill: #444; }
  .grid line { stroke: #eee; }
</style>
</head>
<body>
<h1 id="title"></h1>
<div class="legend" id="legend"></div>
<svg id="chart" viewBox="0 0 960 480"></svg>
<div class="readout" id="readout"></div>

<script>
// Embedded chart data (JSON object literal)
const DATA = __DATA__;

const COLOURS = { latency: "#aa0000", fit: "#888888", size: "#0000ff" };

const W = 960, H = 480;
const M = { top: 16, right: 64, bottom: 44, left: 64 };
const IW = W - M.left - M.right;
const IH = H - M.top - M.bottom;

const xs = DATA.rows.map(r => r.object_count);
const fitYs = xs.map(x => DATA.fit.slope * x + DATA.fit.intercept);

const xMin = Math.min(...xs), xMax = Math.max(...xs);
const yMax = Math.max(...DATA.rows.map(r => r.latency_ms), ...fitYs, 0) * 1.05 || 1;
const y2Max = Math.max(...DATA.rows.map(r => r.size_kb), 0) * 1.05 || 1;

function sx(x) { return M.left + (xMax === xMin ? IW / 2 : (x - xMin) / (xMax - xMin) * IW); }
function sy(y) { return M.top + IH - y / yMax * IH; }
function sy2(y) { return M.top + IH - y / y2Max * IH; }

function ticks(max, n) {
  const step = max / n;
  const out = [];
  for (let i = 0; i <= n; i++) out.push(step * i);
  return out;
}

function el(name, attrs, text) {
  const node = document.createElementNS("http://www.w3.org/2000/svg", name);
  for (const [k, v] of Object.entries(attrs)) node.setAttribute(k, v);
  if (text !== undefined) node.textContent = text;
  return node;
}

function fmt(x) {
  return (Math.round(x * 1000) / 1000).toFixed(3);
}

function polyline(points, colour, dashed) {
  const attrs = {
    points: points.map(([x, y]) => x + "," + y).join(" "),
    fill: "none",
    stroke: colour,
    "stroke-width": 2
  };
  if (dashed) attrs["stroke-dasharray"] = "6 4";
  return el("polyline", attrs);
}

function render() {
  document.getElementById("title").textContent = DATA.title;

  const legend = document.getElementById("legend");
  for (const [label, colour] of [
    [DATA.y_label, COLOURS.latency],
    [DATA.fit.label, COLOURS.fit],
    [DATA.y2_label, COLOURS.size]
  ]) {
    const item = document.createElement("div");
    item.className = "item";
    const swatch = document.createElement("span");
    swatch.className = "swatch";
    swatch.style.background = colour;
    item.appendChild(swatch);
    item.appendChild(document.createTextNode(label));
    legend.appendChild(item);
  }

  const svg = document.getElementById("chart");

  // Primary-axis gridlines only; the secondary axis gets none.
  const grid = el("g", { class: "grid" });
  for (const t of ticks(yMax, 5)) {
    grid.appendChild(el("line", { x1: M.left, y1: sy(t), x2: M.left + IW, y2: sy(t) }));
  }
  svg.appendChild(grid);

  const axes = el("g", { class: "axis" });
  axes.appendChild(el("line", { x1: M.left, y1: M.top + IH, x2: M.left + IW, y2: M.top + IH }));
  axes.appendChild(el("line", { x1: M.left, y1: M.top, x2: M.left, y2: M.top + IH }));
  axes.appendChild(el("line", { x1: M.left + IW, y1: M.top, x2: M.left + IW, y2: M.top + IH }));

  for (const t of ticks(yMax, 5)) {
    axes.appendChild(el("text", { x: M.left - 8, y: sy(t) + 4, "text-anchor": "end" }, fmt(t)));
  }
  for (const t of ticks(y2Max, 5)) {
    axes.appendChild(el("text", { x: M.left + IW + 8, y: sy2(t) + 4 }, fmt(t)));
  }
  const xTickCount = Math.min(8, Math.max(xs.length - 1, 1));
  for (let i = 0; i <= xTickCount; i++) {
    const x = xMin + (xMax - xMin) * i / xTickCount;
    axes.appendChild(el("text", { x: sx(x), y: M.top + IH + 18, "text-anchor": "middle" }, String(Math.round(x))));
  }
  axes.appendChild(el("text", { x: M.left + IW / 2, y: H - 8, "text-anchor": "middle" }, DATA.x_label));
  axes.appendChild(el("text", {
    x: 14, y: M.top + IH / 2, "text-anchor": "middle",
    transform: "rotate(-90 14 " + (M.top + IH / 2) + ")"
  }, DATA.y_label));
  axes.appendChild(el("text", {
    x: W - 14, y: M.top + IH / 2, "text-anchor": "middle",
    transform: "rotate(90 " + (W - 14) + " " + (M.top + IH / 2) + ")"
  }, DATA.y2_label));
  svg.appendChild(axes);

  svg.appendChild(polyline(DATA.rows.map(r => [sx(r.object_count), sy(r.latency_ms)]), COLOURS.latency, false));
  svg.appendChild(polyline(xs.map((x, i) => [sx(x), sy(fitYs[i])]), COLOURS.fit, true));
  svg.appendChild(polyline(DATA.rows.map(r => [sx(r.object_count), sy2(r.size_kb)]), COLOURS.size, false));

  for (const r of DATA.rows) {
    svg.appendChild(el("circle", { cx: sx(r.object_count), cy: sy(r.latency_ms), r: 3, fill: COLOURS.latency }));
    svg.appendChild(el("circle", { cx: sx(r.object_count), cy: sy2(r.size_kb), r: 3, fill: COLOURS.size }));
  }

  const guide = el("line", { y1: M.top, y2: M.top + IH, stroke: "#bbb", "stroke-width": 1, visibility: "hidden" });
  svg.appendChild(guide);

  svg.addEventListener("mousemove", evt => {
    const rect = svg.getBoundingClientRect();
    const px = (evt.clientX - rect.left) / rect.width * W;
    let best = null, bestDist = Infinity;
    for (const r of DATA.rows) {
      const d = Math.abs(sx(r.object_count) - px);
      if (d < bestDist) { bestDist = d; best = r; }
    }
    if (!best) return;
    guide.setAttribute("x1", sx(best.object_count));
    guide.setAttribute("x2", sx(best.object_count));
    guide.setAttribute("visibility", "visible");
    document.getElementById("readout").textContent =
      `${DATA.x_label}: ${best.object_count}   ` +
      `${DATA.y_label}: ${fmt(best.latency_ms)}   ` +
      `${DATA.y2_label}: ${fmt(best.size_kb)}`;
  });
  svg.addEventListener("mouseleave", () => {
    guide.setAttribute("visibility", "hidden");
    document.getElementById("readout").textContent = "";
  });
}

render();
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> Vec<AggregatedRow> {
        vec![
            AggregatedRow {
                object_count: 10,
                latency_ms: 10.0,
                size_kb: 3.0,
            },
            AggregatedRow {
                object_count: 20,
                latency_ms: 14.0,
                size_kb: 5.5,
            },
        ]
    }

    #[test]
    fn test_embeds_rows_and_fit() {
        let fit = FitLine {
            slope: 0.4,
            intercept: 6.0,
        };
        let html = render_html_chart(&table(), &fit).unwrap();

        assert!(html.contains(r#""object_count":10"#));
        assert!(html.contains(r#""object_count":20"#));
        assert!(html.contains("Line of Best Fit (y = 0.40000x + 6.00000)"));
        assert!(html.contains("Latency and Size vs. Object Count"));
        assert!(!html.contains("__DATA__"));
    }

    #[test]
    fn test_is_a_complete_document() {
        let fit = FitLine {
            slope: 1.0,
            intercept: 0.0,
        };
        let html = render_html_chart(&table(), &fit).unwrap();

        assert_eq!(&html[..15], "<!doctype html>");
        assert!(html.trim_end().ends_with("</html>"));
    }
}
