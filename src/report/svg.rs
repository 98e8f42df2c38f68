//! SVG snapshot of a report surface

use super::{escape, ReportSurface};
use crate::analysis::{EmotionCount, InterviewAnalysis, TimelinePoint};
use crate::resume::ResumeAnalysis;
use std::fmt::Write;

const WIDTH: u32 = 800;
const CHART_LEFT: f64 = 60.0;
const CHART_WIDTH: f64 = 700.0;
const CHART_TOP: f64 = 110.0;
const CHART_HEIGHT: f64 = 220.0;
const MAX_SCORE: f64 = 5.0;
const BAR_ROW: u32 = 28;
const BAR_MAX_WIDTH: f64 = 500.0;

const FACE_STROKE: &str = "#9b87f5";
const VOICE_STROKE: &str = "#3b82f6";

const BG: &str = "#0d1117";
const TEXT: &str = "#e6edf3";
const DIM: &str = "#7d8590";
const GRID: &str = "#30363d";

pub fn render(surface: &ReportSurface) -> String {
    match surface {
        ReportSurface::Interview { analysis, report } => interview(analysis, &report.timestamp),
        ReportSurface::Resume(r) => resume(r),
    }
}

fn open(out: &mut String, height: u32) {
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Helvetica, Arial, sans-serif">"#,
        w = WIDTH,
        h = height
    );
    let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="{}"/>"#, BG);
}

fn text(out: &mut String, x: f64, y: f64, size: u32, fill: &str, body: &str) {
    let _ = writeln!(
        out,
        r#"<text x="{:.1}" y="{:.1}" font-size="{}" fill="{}">{}</text>"#,
        x,
        y,
        size,
        fill,
        escape(body)
    );
}

fn interview(a: &InterviewAnalysis, timestamp: &str) -> String {
    let bars_top = CHART_TOP as u32 + CHART_HEIGHT as u32 + 60;
    let height = bars_top + BAR_ROW * a.distribution.len().max(1) as u32 + 30;

    let mut out = String::new();
    open(&mut out, height);

    text(&mut out, 30.0, 40.0, 22, TEXT, &format!("{} Report", a.mode_name));
    text(&mut out, 30.0, 64.0, 13, DIM, timestamp);
    text(
        &mut out,
        WIDTH as f64 - 230.0,
        48.0,
        18,
        TEXT,
        &format!("Overall score: {}/100", a.metrics.overall_score),
    );

    timeline_chart(&mut out, &a.timeline);

    text(&mut out, 30.0, bars_top as f64 - 16.0, 15, TEXT, "Emotion distribution");
    distribution_bars(&mut out, &a.distribution, bars_top);

    out.push_str("</svg>\n");
    out
}

fn timeline_chart(out: &mut String, timeline: &[TimelinePoint]) {
    let bottom = CHART_TOP + CHART_HEIGHT;

    for score in 0..=MAX_SCORE as u32 {
        let y = bottom - score as f64 / MAX_SCORE * CHART_HEIGHT;
        let _ = writeln!(
            out,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
            CHART_LEFT,
            y,
            CHART_LEFT + CHART_WIDTH,
            y,
            GRID
        );
        text(out, CHART_LEFT - 20.0, y + 4.0, 11, DIM, &score.to_string());
    }

    text(out, CHART_LEFT + CHART_WIDTH - 150.0, CHART_TOP - 12.0, 12, FACE_STROKE, "Facial expression");
    text(out, CHART_LEFT + CHART_WIDTH - 40.0, CHART_TOP - 12.0, 12, VOICE_STROKE, "Voice");

    if timeline.is_empty() {
        text(out, CHART_LEFT + CHART_WIDTH / 2.0 - 60.0, CHART_TOP + CHART_HEIGHT / 2.0, 14, DIM, "No samples");
        return;
    }

    let max_time = timeline.iter().map(|p| p.time).max().unwrap_or(0);
    let n = timeline.len();
    let x_at = |i: usize, t: u64| -> f64 {
        if max_time > 0 {
            CHART_LEFT + t as f64 / max_time as f64 * CHART_WIDTH
        } else if n > 1 {
            CHART_LEFT + i as f64 / (n - 1) as f64 * CHART_WIDTH
        } else {
            CHART_LEFT + CHART_WIDTH / 2.0
        }
    };
    let y_at = |score: u32| bottom - score as f64 / MAX_SCORE * CHART_HEIGHT;

    for (i, p) in timeline.iter().enumerate() {
        if max_time == 0 && i > 0 {
            continue;
        }
        text(out, x_at(i, p.time) - 8.0, bottom + 18.0, 11, DIM, &format!("{}s", p.time));
    }

    let series: [(&str, fn(&TimelinePoint) -> u32); 2] =
        [(FACE_STROKE, face_score), (VOICE_STROKE, voice_score)];
    for (stroke, score_of) in series {
        let points: Vec<String> = timeline
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:.1},{:.1}", x_at(i, p.time), y_at(score_of(p))))
            .collect();
        let _ = writeln!(
            out,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2.5"/>"#,
            points.join(" "),
            stroke
        );
        for (i, p) in timeline.iter().enumerate() {
            let _ = writeln!(
                out,
                r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
                x_at(i, p.time),
                y_at(score_of(p)),
                stroke
            );
        }
    }
}

fn face_score(p: &TimelinePoint) -> u32 {
    p.face_score
}

fn voice_score(p: &TimelinePoint) -> u32 {
    p.voice_score
}

fn distribution_bars(out: &mut String, distribution: &[EmotionCount], top: u32) {
    let max = distribution.iter().map(|e| e.count).max().unwrap_or(0);
    if max == 0 {
        text(out, CHART_LEFT, top as f64 + 18.0, 13, DIM, "No emotions recorded");
        return;
    }

    for (i, entry) in distribution.iter().enumerate() {
        let y = top + BAR_ROW * i as u32;
        let width = entry.count as f64 / max as f64 * BAR_MAX_WIDTH;
        text(out, 30.0, y as f64 + 15.0, 13, TEXT, entry.label.as_str());
        let _ = writeln!(
            out,
            r#"<rect x="{:.1}" y="{}" width="{:.1}" height="18" rx="3" fill="{}"/>"#,
            CHART_LEFT + 70.0,
            y + 2,
            width,
            entry.color
        );
        text(out, CHART_LEFT + 80.0 + width, y as f64 + 15.0, 12, DIM, &entry.count.to_string());
    }
}

fn resume(r: &ResumeAnalysis) -> String {
    let sections = [
        ("Skills", &r.skills),
        ("Strengths", &r.strengths),
        ("Improvements", &r.improvements),
    ];
    let lines: usize = sections.iter().map(|(_, items)| items.len() + 2).sum();
    let height = 100 + 22 * lines as u32;

    let mut out = String::new();
    open(&mut out, height);
    text(&mut out, 30.0, 40.0, 22, TEXT, "Resume Analysis");
    text(&mut out, 30.0, 64.0, 13, DIM, &r.filename);

    let mut y = 100.0;
    for (heading, items) in sections {
        text(&mut out, 30.0, y, 15, TEXT, heading);
        y += 22.0;
        for item in items.iter() {
            text(&mut out, 50.0, y, 13, DIM, &format!("• {}", item));
            y += 22.0;
        }
        y += 22.0;
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{EmotionSample, SampleSet};
    use crate::mode::InterviewMode;
    use crate::report::tests::{at, mock_surface, resume_surface};

    #[test]
    fn test_interview_svg_has_both_lines_and_bars() {
        let svg = render(&mock_surface(InterviewMode::General));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 10);
        // happy, neutral, thinking, confident, hesitant
        assert_eq!(svg.matches("rx=\"3\"").count(), 5);
        assert!(svg.contains("Overall score: 74/100"));
    }

    #[test]
    fn test_empty_interview_svg() {
        let surface = ReportSurface::interview(
            InterviewAnalysis::new(&SampleSet::new(), InterviewMode::Technical),
            at(),
        );
        let svg = render(&surface);
        assert!(svg.contains("No samples"));
        assert!(svg.contains("No emotions recorded"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut samples = SampleSet::new();
        samples.insert("timestamp_0".into(), EmotionSample::new("<script>", "calm & collected"));
        let svg = render(&ReportSurface::interview(InterviewAnalysis::new(&samples, InterviewMode::General), at()));
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("calm &amp; collected"));
    }

    #[test]
    fn test_resume_svg_lists_sections() {
        let svg = render(&resume_surface());
        assert!(svg.contains("jordan-cv.pdf"));
        assert!(svg.contains("Add more quantifiable achievements"));
    }
}
