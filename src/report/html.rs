//! HTML report generation
//!
//! The page is self-contained: inline CSS, the SVG snapshot inline, and the
//! JSON payload in a `<script type="application/json">` block for tooling.

use super::{escape, json, svg, ReportSurface};
use crate::analysis::{FeedbackKind, InterviewAnalysis};
use crate::resume::ResumeAnalysis;
use std::io::{self, Write};

const STYLE: &str = r#"
        :root {
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --positive: #22c55e;
            --improvement: #f59e0b;
            --tip: #3b82f6;
            --accent: #9b87f5;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }
        .container { max-width: 960px; margin: 0 auto; padding: 2rem; }
        .header {
            display: flex;
            align-items: baseline;
            gap: 1rem;
            margin-bottom: 2rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }
        .logo {
            font-size: 2rem;
            font-weight: 800;
            background: linear-gradient(135deg, var(--tip), var(--accent));
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
        }
        .subtitle { color: var(--dim); }
        .stats {
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            gap: 1rem;
            margin-bottom: 2rem;
        }
        .stat {
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.25rem;
            text-align: center;
        }
        .stat-value { font-size: 2.25rem; font-weight: 700; line-height: 1; }
        .stat-label { color: var(--dim); font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.05em; margin-top: 0.5rem; }
        .card {
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
            margin-bottom: 1.5rem;
        }
        .card h2 { font-size: 1.1rem; margin-bottom: 1rem; }
        .snapshot svg { width: 100%; height: auto; border-radius: 8px; }
        ul.feedback { list-style: none; }
        ul.feedback li { padding: 0.6rem 0.9rem; margin-bottom: 0.5rem; border-left: 4px solid var(--border); background: var(--bg); border-radius: 4px; }
        ul.feedback li.positive { border-color: var(--positive); }
        ul.feedback li.improvement { border-color: var(--improvement); }
        ul.feedback li.tip { border-color: var(--tip); }
        ul.plain { padding-left: 1.25rem; }
        .empty { text-align: center; color: var(--dim); padding: 4rem 0; }
        .note { color: var(--dim); font-size: 0.8rem; }
"#;

pub fn write<W: Write>(writer: &mut W, surface: &ReportSurface) -> io::Result<()> {
    let title = surface.title();
    open(writer, &title)?;

    match surface {
        ReportSurface::Interview { analysis, report } => {
            header(writer, &title, &report.timestamp)?;
            interview_body(writer, analysis)?;
        }
        ReportSurface::Resume(r) => {
            header(writer, "Resume Analysis", &r.filename)?;
            resume_body(writer, r)?;
        }
    }

    writeln!(writer, r#"    <div class="card snapshot">{}</div>"#, svg::render(surface))?;

    let payload = json::to_string(surface).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(
        writer,
        r#"    <script type="application/json" id="report-data">{}</script>"#,
        payload.replace("</", "<\\/")
    )?;

    close(writer)
}

/// Results page when nothing has been analysed yet
pub fn write_empty<W: Write>(writer: &mut W) -> io::Result<()> {
    open(writer, "Interview Results")?;
    header(writer, "Interview Results", "")?;
    writeln!(
        writer,
        r#"    <div class="card empty">No interview results yet. Record or upload an interview and run the analysis first.</div>"#
    )?;
    close(writer)
}

fn open<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>HRbotics | {}</title>
    <style>{}</style>
</head>
<body>
<div class="container">
"#,
        escape(title),
        STYLE
    )
}

fn close<W: Write>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "</div>\n</body>\n</html>")
}

fn header<W: Write>(writer: &mut W, title: &str, subtitle: &str) -> io::Result<()> {
    writeln!(
        writer,
        r#"    <div class="header"><span class="logo">HRbotics</span><span>{}</span><span class="subtitle">{}</span></div>"#,
        escape(title),
        escape(subtitle)
    )
}

fn stat<W: Write>(writer: &mut W, value: &str, label: &str) -> io::Result<()> {
    writeln!(
        writer,
        r#"        <div class="stat"><div class="stat-value">{}</div><div class="stat-label">{}</div></div>"#,
        escape(value),
        escape(label)
    )
}

fn interview_body<W: Write>(writer: &mut W, a: &InterviewAnalysis) -> io::Result<()> {
    let m = &a.metrics;
    writeln!(writer, r#"    <div class="stats">"#)?;
    stat(writer, &format!("{}", m.overall_score), "Overall score")?;
    stat(writer, &format!("{}%", m.confidence), "Confidence")?;
    stat(writer, &format!("{}%", m.positive_expressions), "Positive expressions")?;
    let clarity_label = if m.voice_clarity_measured { "Voice clarity" } else { "Voice clarity (estimate)" };
    stat(writer, &format!("{}%", m.voice_clarity), clarity_label)?;
    writeln!(writer, "    </div>")?;

    writeln!(writer, r#"    <div class="card"><h2>Feedback</h2><ul class="feedback">"#)?;
    for item in &a.feedback {
        let class = match item.kind {
            FeedbackKind::Positive => "positive",
            FeedbackKind::Improvement => "improvement",
            FeedbackKind::Tip => "tip",
        };
        writeln!(writer, r#"        <li class="{}">{}</li>"#, class, escape(&item.text))?;
    }
    writeln!(writer, "    </ul>")?;
    writeln!(
        writer,
        r#"    <p class="note">Based on {} sample(s). Voice clarity is not measured by the current analysis.</p></div>"#,
        a.sample_count
    )
}

fn resume_body<W: Write>(writer: &mut W, r: &ResumeAnalysis) -> io::Result<()> {
    for (heading, items) in [
        ("Skills", &r.skills),
        ("Strengths", &r.strengths),
        ("Improvements", &r.improvements),
    ] {
        writeln!(writer, r#"    <div class="card"><h2>{}</h2><ul class="plain">"#, heading)?;
        for item in items.iter() {
            writeln!(writer, "        <li>{}</li>", escape(item))?;
        }
        writeln!(writer, "    </ul></div>")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::InterviewMode;
    use crate::report::tests::{mock_surface, resume_surface};

    fn render(surface: &ReportSurface) -> String {
        let mut buf = Vec::new();
        write(&mut buf, surface).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_interview_page() {
        let html = render(&mock_surface(InterviewMode::Technical));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Technical Interview Report"));
        assert!(html.contains("<svg"));
        assert!(html.contains(r#"id="report-data""#));
        assert!(html.contains("Voice clarity (estimate)"));
        assert!(html.contains(r#"<li class="tip">"#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_resume_page() {
        let html = render(&resume_surface());
        assert!(html.contains("jordan-cv.pdf"));
        assert!(html.contains("<li>Strong Technical Skills</li>"));
    }

    #[test]
    fn test_empty_page() {
        let mut buf = Vec::new();
        write_empty(&mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();
        assert!(html.contains("No interview results yet"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_payload_cannot_close_script() {
        let mut analysis = crate::resume::analyze("cv.pdf", None).unwrap();
        analysis.skills.push("</script><b>".to_string());
        let html = render(&ReportSurface::resume(analysis));
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
