use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

/// A Plotly figure, as handed to `Plotly.newPlot(el, data, layout)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    pub fn new(layout: Value) -> Self {
        Self {
            data: Vec::new(),
            layout,
        }
    }

    pub fn trace(mut self, trace: Value) -> Self {
        self.data.push(trace);
        self
    }

    /// Names of the traces, in drawing order. Unnamed traces are skipped.
    pub fn trace_names(&self) -> Vec<&str> {
        self.data
            .iter()
            .filter_map(|trace| trace.get("name")?.as_str())
            .collect()
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub(crate) fn line<T: Serialize>(name: &str, x: &[NaiveDate], y: &[T]) -> Value {
    json!({
        "type": "scatter",
        "mode": "lines",
        "name": name,
        "x": x,
        "y": y,
    })
}

/// Horizontal dashed guide across the whole x range.
pub(crate) fn guide(name: &str, x: &[NaiveDate], level: f64, color: &str) -> Value {
    let ends = match (x.first(), x.last()) {
        (Some(first), Some(last)) => vec![*first, *last],
        _ => Vec::new(),
    };
    json!({
        "type": "scatter",
        "mode": "lines",
        "name": name,
        "x": ends,
        "y": vec![level; ends.len()],
        "line": { "dash": "dash", "color": color, "width": 1 },
    })
}

pub(crate) fn layout(title: String, height: u32) -> Value {
    json!({
        "title": { "text": title },
        "height": height,
        "template": "plotly_white",
        "margin": { "l": 40, "r": 20, "t": 50, "b": 30 },
        "legend": { "orientation": "h", "y": 1.02, "x": 0 },
    })
}

pub(crate) fn with_range_slider(mut layout: Value) -> Value {
    layout["xaxis"] = json!({ "rangeslider": { "visible": true } });
    layout
}
