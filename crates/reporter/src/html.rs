use crate::document::{ReportDocument, ReportSection};
use html_escape::encode_text;

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;padding:20px;color:#111} \
.wrap{max-width:800px;margin:0 auto} h1{color:#0b74de} \
.card{background:#fff;padding:14px;border-radius:8px;box-shadow:0 2px 8px rgba(16,24,40,0.06);margin-bottom:12px} \
table{width:100%;border-collapse:collapse} th{text-align:left;padding:6px;color:#444;width:40%} \
td{padding:6px;color:#000} .big{font-size:1.4rem;font-weight:700;color:#0b5} .muted{color:#666}";

impl ReportDocument {
    /// The printable, self-contained HTML page for this report.
    pub fn to_html(&self) -> String {
        let mut lines = vec![
            r#"<!doctype html><html><head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">"#.to_string(),
            "<title>ROI Report</title>".to_string(),
            format!("<style>{STYLE}</style>"),
            r#"</head><body><div class="wrap">"#.to_string(),
            format!("<h1>{}</h1>", encode_text(&self.title)),
            format!(r#"<p class="muted">{}</p>"#, encode_text(&self.summary)),
        ];

        for section in &self.sections {
            push_section(&mut lines, section);
        }

        lines.push(format!(r#"<p class="muted">{}</p>"#, encode_text(&self.notes)));
        lines.push("</div></body></html>".to_string());
        lines.join("\n")
    }
}

fn push_section(lines: &mut Vec<String>, section: &ReportSection) {
    lines.push(format!(
        r#"<div class="card"><h3>{}</h3><table>"#,
        encode_text(&section.heading)
    ));
    for row in &section.rows {
        let class = if row.emphasis { r#" class="big""# } else { "" };
        lines.push(format!(
            "<tr><th{class}>{}</th><td{class}>{}</td></tr>",
            encode_text(&row.label),
            encode_text(&row.value)
        ));
    }
    lines.push("</table></div>".to_string());
}
