//! Text and HTML rendering of the form and of a prediction.

use aquaforge_schemas::{
    feature::Feature,
    target::PredictionResult,
};
use std::collections::HashMap;

/// One `label: value` line per target, values rounded to two decimals.
pub fn result_lines(result: &PredictionResult) -> Vec<String> {
    result
        .iter()
        .map(|(target, value)| format!("{}: {:.2}", target.label(), value))
        .collect()
}

/// What the page shows under the form.
#[derive(Debug, Clone)]
pub enum Outcome {
    AwaitingInput,
    Displayed {
        result: PredictionResult,
        chart_svg: Option<String>,
        predicted_at: String,
    },
    InvalidInput(String),
    PredictionFailed(String),
}

pub struct PageView {
    /// Field values exactly as they should appear in the inputs.
    pub fields: HashMap<Feature, String>,
    pub outcome: Outcome,
}

impl PageView {
    pub fn awaiting_input() -> Self {
        let fields = Feature::ALL
            .into_iter()
            .map(|f| (f, f.bounds().default.to_string()))
            .collect();
        Self {
            fields,
            outcome: Outcome::AwaitingInput,
        }
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:760px;margin:2em auto;background:#f0f8ff}\
h1{color:#0077b6}label{display:block;margin-top:.5em}\
button{background:#0077b6;color:#fff;font-weight:bold;border:0;border-radius:8px;padding:.5em 1em;margin-top:1em}\
.ok{color:#1b7f3b}.err{color:#b00020}";

pub fn page(view: &PageView) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Water Quality Predictor</title>");
    html.push_str(&format!("<style>{}</style></head><body>", STYLE));
    html.push_str("<h1>Water Quality Predictor</h1>");
    html.push_str("<h4>Predict O₂, BSK5, and Suspended solids using water chemistry data</h4>");

    html.push_str("<form method=\"post\" action=\"/predict\"><fieldset><legend>Enter Water Sample Measurements</legend>");
    for feature in Feature::ALL {
        let bounds = feature.bounds();
        let value = view
            .fields
            .get(&feature)
            .map(String::as_str)
            .unwrap_or_default();
        html.push_str(&format!(
            "<label for=\"{key}\">{label}</label>\
             <input type=\"number\" id=\"{key}\" name=\"{key}\" min=\"{min}\" max=\"{max}\" step=\"any\" value=\"{value}\" required>",
            key = feature.key(),
            label = feature.label(),
            min = bounds.min,
            max = bounds.max,
            value = escape(value),
        ));
    }
    html.push_str("<button type=\"submit\">Predict Water Quality</button></fieldset></form>");

    match &view.outcome {
        Outcome::AwaitingInput => {}
        Outcome::Displayed {
            result,
            chart_svg,
            predicted_at,
        } => {
            html.push_str("<p class=\"ok\">Prediction Complete!</p>");
            html.push_str("<h3>Predicted Pollutant Levels:</h3>");
            if let Some(svg) = chart_svg {
                html.push_str(&format!("<div class=\"chart\">{}</div>", svg));
            }
            html.push_str("<ul>");
            for line in result_lines(result) {
                html.push_str(&format!("<li><code>{}</code></li>", escape(&line)));
            }
            html.push_str(&format!("</ul><p><small>Predicted at {}</small></p>", escape(predicted_at)));
        }
        Outcome::InvalidInput(message) => {
            html.push_str(&format!("<p class=\"err\">Invalid input: {}</p>", escape(message)));
        }
        Outcome::PredictionFailed(message) => {
            html.push_str(&format!("<p class=\"err\">Prediction failed: {}</p>", escape(message)));
        }
    }

    html.push_str("</body></html>");
    html
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_contains;

    #[test]
    fn lines_use_two_decimals_in_target_order() {
        let result = PredictionResult::new([7.4213, 3.0, 11.276]);
        assert_eq!(
            result_lines(&result),
            [
                "O₂ (mg/L): 7.42",
                "BSK5 (mg/L): 3.00",
                "Suspended Solids (mg/L): 11.28",
            ]
        );
    }

    #[test]
    fn awaiting_page_shows_defaults_and_no_result() {
        let html = page(&PageView::awaiting_input());
        assert!(html.contains("name=\"nh4\" min=\"0\" max=\"100\" step=\"any\" value=\"1\""));
        assert!(html.contains("Predict Water Quality"));
        assert!(!html.contains("Prediction Complete"));
    }

    #[test]
    fn displayed_page_lists_every_line() {
        let mut view = PageView::awaiting_input();
        view.outcome = Outcome::Displayed {
            result: PredictionResult::new([7.42, 3.1, 12.0]),
            chart_svg: Some("<svg></svg>".into()),
            predicted_at: "2025-01-01T00:00:00+00:00".into(),
        };
        let html = page(&view);
        assert_contains!(html, "Prediction Complete!");
        assert_contains!(html, "<code>O₂ (mg/L): 7.42</code>");
        assert!(html.contains("<code>Suspended Solids (mg/L): 12.00</code>"));
        assert!(html.contains("<div class=\"chart\"><svg></svg></div>"));
    }

    #[test]
    fn invalid_input_page_is_a_complete_document() {
        let mut view = PageView::awaiting_input();
        view.outcome = Outcome::InvalidInput("CL (mg/L) must be between 0 and 100, got 120".into());
        let html = page(&view);
        assert!(html.starts_with("<!DOCTYPE html><html><head><meta charset=\"utf-8\">"));
        assert_contains!(html, &format!("<style>{}</style>", STYLE));
        assert_eq!(html.matches("<input type=\"number\"").count(), Feature::ALL.len());
        assert_contains!(html, "<p class=\"err\">Invalid input: CL (mg/L) must be between 0 and 100, got 120</p>");
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn failure_messages_are_escaped() {
        let mut view = PageView::awaiting_input();
        view.fields.insert(Feature::Cl, "\"><script>".into());
        view.outcome = Outcome::PredictionFailed("<bad>".into());
        let html = page(&view);
        assert!(html.contains("Prediction failed: &lt;bad&gt;"));
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(!html.contains("<script>"));
    }
}
