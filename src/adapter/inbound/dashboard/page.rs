//! HTML rendering for the dashboard page.

use std::fmt::Write as _;

use crate::domain::{HistorySnapshot, SourceId};

const LINE_COLORS: [&str; 6] = [
    "#60a5fa", "#f472b6", "#fbbf24", "#a78bfa", "#34d399", "#f87171",
];

const STYLE: &str = r#"
      body { background: #0b0f1a; color: #e2e8f0; font-family: 'Segoe UI', sans-serif; margin: 0; padding: 30px; }
      .nav { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 30px; }
      .profit-container { position: relative; display: inline-block; cursor: pointer; z-index: 100; }
      .profit-badge { background: linear-gradient(135deg, #10b981 0%, #059669 100%); padding: 12px 24px; border-radius: 50px; font-weight: bold; box-shadow: 0 0 20px rgba(16,185,129,0.3); }
      .dropdown { display: none; position: absolute; right: 0; top: 55px; background: #1e293b; min-width: 380px; border-radius: 12px; border: 1px solid #334155; box-shadow: 0 10px 25px rgba(0,0,0,0.5); padding: 10px; }
      .profit-container:hover .dropdown { display: block; }
      .profit-item { padding: 8px; border-bottom: 1px solid #334155; font-size: 0.8rem; color: #10b981; }
      .chart-box { background: #161e2e; padding: 25px; border-radius: 16px; border: 1px solid #1f2937; }
      h1 { margin: 0; color: #60a5fa; }
"#;

/// Render the full dashboard page for one history snapshot.
pub fn render_page(
    instrument: &str,
    sources: &[SourceId],
    snapshot: &HistorySnapshot,
    refresh_ms: u64,
) -> String {
    let profit_items = if snapshot.opportunities.is_empty() {
        r#"<div class="profit-item">Scanning for spreads...</div>"#.to_string()
    } else {
        snapshot
            .opportunities
            .iter()
            .fold(String::new(), |mut out, event| {
                let _ = write!(
                    out,
                    r#"<div class="profit-item">{}</div>"#,
                    escape_html(&event.display_line())
                );
                out
            })
    };

    let samples = script_json(&snapshot.samples);
    let source_names = script_json(&sources);
    let colors = script_json(&LINE_COLORS);

    format!(
        r##"<!DOCTYPE html>
<html>
  <head>
    <title>Tracker</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>{STYLE}</style>
  </head>
  <body>
    <div class="nav">
      <div><h1>Arbitrage-Tracker</h1><p style="color:#64748b">Real-time Analysis for {instrument}</p></div>
      <div class="profit-container">
        <div class="profit-badge">Total Profits Found: {count}</div>
        <div class="dropdown">{profit_items}</div>
      </div>
    </div>
    <div class="chart-box"><canvas id="stockChart"></canvas></div>
    <script>
      const data = {samples};
      const sources = {source_names};
      const colors = {colors};
      const ctx = document.getElementById('stockChart').getContext('2d');
      new Chart(ctx, {{
        type: 'line',
        data: {{
          labels: data.map(d => d.time),
          datasets: sources.map((src, i) => ({{
            label: src,
            data: data.map(d => d.prices[src]),
            borderColor: colors[i % colors.length],
            borderWidth: 2, tension: 0.2, pointRadius: 4, hoverRadius: 8
          }}))
        }},
        options: {{
          responsive: true, animation: false,
          plugins: {{
            tooltip: {{ enabled: true, mode: 'index', intersect: false }},
            legend: {{ labels: {{ color: '#f8fafc' }} }}
          }},
          scales: {{
            y: {{ grid: {{ color: '#1f2937' }}, ticks: {{ color: '#94a3b8' }} }},
            x: {{ grid: {{ display: false }} }}
          }}
        }}
      }});
      setTimeout(() => location.reload(), {refresh_ms});
    </script>
  </body>
</html>
"##,
        instrument = escape_html(instrument),
        count = snapshot.opportunity_count(),
    )
}

fn escape_html(raw: &str) -> String {
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

/// JSON safe to inline inside a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".into())
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OpportunityEvent, Quote, Sample};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sources() -> Vec<SourceId> {
        vec![SourceId::new("NYSE"), SourceId::new("NASDAQ")]
    }

    #[test]
    fn empty_history_shows_scanning_placeholder() {
        let snapshot = HistorySnapshot {
            samples: vec![],
            opportunities: vec![],
        };

        let html = render_page("NVDA (NVIDIA Corp)", &sources(), &snapshot, 1_000);
        assert!(html.contains("Scanning for spreads..."));
        assert!(html.contains("Total Profits Found: 0"));
        assert!(html.contains("Real-time Analysis for NVDA (NVIDIA Corp)"));
        assert!(html.contains("location.reload(), 1000"));
    }

    #[test]
    fn opportunities_and_samples_are_rendered() {
        let snapshot = HistorySnapshot {
            samples: vec![Sample::from_quotes(
                Utc::now(),
                &[Quote::new("NYSE", dec!(140.1)), Quote::new("NASDAQ", dec!(140.3))],
            )],
            opportunities: vec![OpportunityEvent::new(
                Utc::now(),
                SourceId::new("NASDAQ"),
                SourceId::new("NYSE"),
                dec!(0.142),
            )],
        };

        let html = render_page("NVDA", &sources(), &snapshot, 1_000);
        assert!(html.contains("Total Profits Found: 1"));
        assert!(html.contains("[PROFIT] NASDAQ vs NYSE | Spread: 0.142%"));
        assert!(html.contains(r#"const sources = ["NYSE","NASDAQ"];"#));
        assert!(html.contains("\"NASDAQ\":140.3"));
        assert!(!html.contains("Scanning for spreads..."));
    }

    #[test]
    fn instrument_label_is_escaped() {
        let snapshot = HistorySnapshot {
            samples: vec![],
            opportunities: vec![],
        };

        let html = render_page("<b>X & Y</b>", &sources(), &snapshot, 500);
        assert!(html.contains("&lt;b&gt;X &amp; Y&lt;/b&gt;"));
    }

    #[test]
    fn script_json_cannot_close_script_tag() {
        assert_eq!(script_json("</script>"), r#""<\/script>""#);
    }
}
