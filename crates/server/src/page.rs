//! HTML form page

use risk_lib::models::{InputPayload, PredictionResult, RiskLabel};

const STYLE: &str = r#"
    body{font-family:Arial, sans-serif; max-width:820px; margin:36px auto}
    .card{border:1px solid #e5e7eb; border-radius:14px; padding:20px; box-shadow:0 1px 6px rgba(0,0,0,.06)}
    .row{margin-bottom:14px}
    label{font-weight:600}
    textarea{width:100%; height:110px}
    input[type=range]{width:100%}
    button{background:#111;color:#fff;border:none;padding:10px 16px;border-radius:8px;cursor:pointer}
    .score{font-size:22px; font-weight:700}
    .low{color:#2e7d32}.med{color:#f9a825}.high{color:#c62828}
    small{color:#6b7280}
"#;

/// CSS class for a label in the result card
pub fn label_class(label: RiskLabel) -> &'static str {
    match label {
        RiskLabel::Low => "low",
        RiskLabel::Moderate => "med",
        RiskLabel::High => "high",
    }
}

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn slider(label: &str, name: &str, id: &str, min: u8, max: u8, value: f64) -> String {
    format!(
        r#"      <div class="row">
        <label>{label}</label>
        <input type="range" min="{min}" max="{max}" value="{value}" name="{name}" oninput="{id}.value=this.value"><output id="{id}">{value}</output>
      </div>
"#
    )
}

fn result_card(result: &PredictionResult) -> String {
    let probability = match result.probability() {
        Some(p) => format!("Model probability: {:.2}", p),
        None => "<em>Probability unavailable (rule-based fallback or model without probabilities).</em>".to_string(),
    };
    let fallback = if result.used_fallback() {
        "\n      <br><small>Fallback rules used (trained model missing or incompatible).</small>"
    } else {
        ""
    };
    format!(
        r#"  <div class="card" style="margin-top:18px">
    <div class="score {class}">Risk Score: {score} / 100 &mdash; {label}</div>
    <p>
      {probability}{fallback}
    </p>
  </div>
"#,
        class = label_class(result.label()),
        score = result.score(),
        label = result.label(),
    )
}

/// Render the form, pre-filled from `payload`, with an optional result card
pub fn render(model_path: &str, payload: &InputPayload, result: Option<&PredictionResult>) -> String {
    let s = payload.signals();
    let mut html = String::new();
    html.push_str(&format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Early Burnout Prediction</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>Early Burnout Prediction</h1>
  <p><small>Model path: <code>{model_path}</code>. If unavailable, a rule-based fallback is used.</small></p>

  <div class="card">
    <form method="post" action="/">
      <div class="row">
        <label for="free_text">How are you feeling lately?</label><br/>
        <textarea id="free_text" name="free_text" placeholder="e.g., I'm exhausted, sleeping poorly, deadlines piling up...">{free_text}</textarea>
      </div>
"#,
        model_path = escape_html(model_path),
        free_text = escape_html(&payload.free_text),
    ));
    html.push_str(&slider("Weekly hours (30&ndash;80):", "hours", "h", 30, 80, s.hours));
    html.push_str(&slider("Perceived workload (1&ndash;10):", "workload", "w", 1, 10, s.workload));
    html.push_str(&slider("Sleep quality (1=poor, 10=great):", "sleep", "s", 1, 10, s.sleep));
    html.push_str(&slider("Stress level (1&ndash;10):", "stress", "t", 1, 10, s.stress));
    html.push_str(
        r#"      <button type="submit">Predict</button>
    </form>
  </div>
"#,
    );
    if let Some(result) = result {
        html.push_str(&result_card(result));
    }
    html.push_str("</body>\n</html>\n");
    html
}
