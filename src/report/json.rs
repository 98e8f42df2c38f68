//! JSON report payload

use super::ReportSurface;
use std::io::Write;

pub fn write<W: Write>(writer: &mut W, surface: &ReportSurface) -> serde_json::Result<()> {
    match surface {
        ReportSurface::Interview { report, .. } => serde_json::to_writer_pretty(writer, report),
        ReportSurface::Resume(r) => serde_json::to_writer_pretty(writer, r),
    }
}

pub fn to_string(surface: &ReportSurface) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    write(&mut buf, surface)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::InterviewMode;
    use crate::report::tests::{mock_surface, resume_surface};

    #[test]
    fn test_interview_payload_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&to_string(&mock_surface(InterviewMode::Leadership)).unwrap()).unwrap();
        assert_eq!(value["interviewMode"], "Leadership Interview");
        assert_eq!(value["emotionData"][0]["faceEmotion"], "happy");
        assert_eq!(value["emotionData"][4]["time"], 40);
        assert_eq!(value["feedback"][0]["type"], "positive");
    }

    #[test]
    fn test_resume_payload_shape() {
        let value: serde_json::Value = serde_json::from_str(&to_string(&resume_surface()).unwrap()).unwrap();
        assert_eq!(value["filename"], "jordan-cv.pdf");
        assert_eq!(value["skills"].as_array().unwrap().len(), 3);
    }
}
