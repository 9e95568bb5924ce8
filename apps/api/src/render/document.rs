//! Document Renderer — deterministic mapping from a [`ResumeRecord`] (plus
//! an optional photo) to a self-contained HTML page. No network, no
//! randomness.
//!
//! SECURITY INVARIANT: every user-controlled value is escaped before
//! insertion. AI-generated text is user-controlled too — it is derived from
//! an untrusted prompt and an untrusted external capability.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::models::resume::{Photo, ResumeRecord};

const NO_EXPERIENCE: &str = "No experience provided";
const NO_EDUCATION: &str = "No education provided";
const NO_SKILLS: &str = "No skills provided";

/// Escapes the five markup metacharacters. Applied to every user-controlled
/// string without exception.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Restricts a declared media type to characters that cannot break out of a
/// `data:` URL attribute. Empty input falls back to JPEG.
fn sanitize_media_type(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '+' | '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        "image/jpeg".to_string()
    } else {
        cleaned
    }
}

/// Embeds the photo as a self-contained inline data URL — no external file
/// reference, so the artifact stays portable.
fn photo_data_url(photo: &Photo) -> String {
    format!(
        "data:{};base64,{}",
        sanitize_media_type(&photo.media_type),
        BASE64.encode(&photo.bytes)
    )
}

/// Builds the full HTML document. Section order is fixed: header (photo,
/// name, contact, summary), experience, education, skills. Sequence order
/// within sections is preserved exactly as received.
pub fn build_document(record: &ResumeRecord, photo: Option<&Photo>) -> String {
    let name = escape_html(&record.name);
    let email = escape_html(&record.email);

    let mut meta = email;
    if !record.phone.is_empty() {
        meta.push_str(" | ");
        meta.push_str(&escape_html(&record.phone));
    }
    if !record.location.is_empty() {
        meta.push_str(" | ");
        meta.push_str(&escape_html(&record.location));
    }

    // The photo block renders whether or not a photo is present, so layout
    // never shifts between the two cases.
    let photo_html = photo
        .map(|p| format!(r#"<img src="{}" alt="photo"/>"#, photo_data_url(p)))
        .unwrap_or_default();

    let mut experience = String::new();
    for entry in &record.experience {
        let mut bullets = String::new();
        for bullet in &entry.bullets {
            bullets.push_str(&format!("<li>{}</li>", escape_html(bullet)));
        }
        experience.push_str(&format!(
            r#"<div class="exp-item">
      <div class="exp-header">
        <strong>{}</strong> &mdash; {}
        <span class="dates">{}</span>
      </div>
      <ul>{}</ul>
    </div>
"#,
            escape_html(&entry.role),
            escape_html(&entry.company),
            escape_html(&entry.dates),
            bullets
        ));
    }
    if experience.is_empty() {
        experience = format!("<div>{NO_EXPERIENCE}</div>");
    }

    let mut education = String::new();
    for entry in &record.education {
        education.push_str(&format!(
            r#"<div class="edu-item"><strong>{}</strong>, {} <span class="dates">{}</span></div>
"#,
            escape_html(&entry.degree),
            escape_html(&entry.school),
            escape_html(&entry.dates)
        ));
    }
    if education.is_empty() {
        education = format!("<div>{NO_EDUCATION}</div>");
    }

    let skills = if record.skills.is_empty() {
        NO_SKILLS.to_string()
    } else {
        record
            .skills
            .iter()
            .map(|s| format!(r#"<span class="skill">{}</span>"#, escape_html(s)))
            .collect::<Vec<_>>()
            .join(" ")
    };

    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8" />
  <title>CV - {name}</title>
  <style>
    body {{ font-family: Arial, sans-serif; color: #222; padding: 28px; }}
    .header {{ display:flex; align-items:center; gap:20px; margin-bottom:18px; }}
    .photo {{ width:120px; height:120px; border-radius:8px; overflow:hidden; background:#eee; }}
    .photo img {{ width:100%; height:100%; object-fit:cover; }}
    .heading {{ flex:1; }}
    .name {{ font-size:28px; font-weight:700; margin-bottom:6px; }}
    .meta {{ color:#555; font-size:14px; }}
    .summary {{ margin-top:8px; color:#444; }}
    .section {{ margin-top:18px; }}
    .section h3 {{ border-bottom:2px solid #eee; padding-bottom:6px; margin-bottom:10px; color:#111; }}
    .exp-header {{ display:flex; justify-content:space-between; }}
    .dates {{ color:#666; font-size:12px; }}
    ul {{ margin:6px 0 0 18px; }}
    .skill {{ display:inline-block; background:#f1f3f5; padding:6px 8px; margin:4px; border-radius:6px; font-size:13px; }}
  </style>
</head>
<body>
  <div class="header">
    <div class="photo">{photo_html}</div>
    <div class="heading">
      <div class="name">{name}</div>
      <div class="meta">{meta}</div>
      <div class="summary">{summary}</div>
    </div>
  </div>

  <div class="section">
    <h3>Experience</h3>
    {experience}
  </div>

  <div class="section">
    <h3>Education</h3>
    {education}
  </div>

  <div class="section">
    <h3>Skills</h3>
    <div>{skills}</div>
  </div>
</body>
</html>
"#,
        summary = escape_html(&record.summary),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry};
    use bytes::Bytes;

    fn record_with_markup() -> ResumeRecord {
        ResumeRecord {
            name: "Jane <script>alert(1)</script>".to_string(),
            email: "jane@example.com".to_string(),
            phone: "\"555\" & more".to_string(),
            location: "O'Fallon".to_string(),
            summary: "Ships <b>fast</b>".to_string(),
            experience: vec![ExperienceEntry {
                role: "CTO & founder".to_string(),
                company: "<Acme>".to_string(),
                dates: "2020 - Present".to_string(),
                bullets: vec!["Cut costs by >40%".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "BSc \"CS\"".to_string(),
                school: "State <University>".to_string(),
                dates: "2012".to_string(),
            }],
            skills: vec!["C&C++".to_string()],
        }
    }

    #[test]
    fn test_escape_covers_all_five_metacharacters() {
        assert_eq!(
            escape_html(r#"&<>"'"#),
            "&amp;&lt;&gt;&quot;&#39;"
        );
    }

    #[test]
    fn test_no_raw_markup_survives_rendering() {
        let html = build_document(&record_with_markup(), None);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<Acme>"));
        assert!(!html.contains("<University>"));
        assert!(!html.contains("<b>fast</b>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&quot;555&quot; &amp; more"));
        assert!(html.contains("O&#39;Fallon"));
        assert!(html.contains("C&amp;C++"));
    }

    #[test]
    fn test_empty_sections_render_placeholders() {
        let html = build_document(&ResumeRecord::default(), None);
        assert!(html.contains(NO_EXPERIENCE));
        assert!(html.contains(NO_EDUCATION));
        assert!(html.contains(NO_SKILLS));
    }

    #[test]
    fn test_populated_sections_omit_placeholders() {
        let html = build_document(&record_with_markup(), None);
        assert!(!html.contains(NO_EXPERIENCE));
        assert!(!html.contains(NO_EDUCATION));
        assert!(!html.contains(NO_SKILLS));
    }

    #[test]
    fn test_section_order_is_fixed() {
        let html = build_document(&record_with_markup(), None);
        let name = html.find("class=\"name\"").unwrap();
        let experience = html.find("<h3>Experience</h3>").unwrap();
        let education = html.find("<h3>Education</h3>").unwrap();
        let skills = html.find("<h3>Skills</h3>").unwrap();
        assert!(name < experience);
        assert!(experience < education);
        assert!(education < skills);
    }

    #[test]
    fn test_experience_order_preserved() {
        let mut record = ResumeRecord::default();
        record.experience = vec![
            ExperienceEntry {
                role: "Second listed".to_string(),
                ..Default::default()
            },
            ExperienceEntry {
                role: "First listed".to_string(),
                ..Default::default()
            },
        ];
        let html = build_document(&record, None);
        assert!(html.find("Second listed").unwrap() < html.find("First listed").unwrap());
    }

    #[test]
    fn test_photo_embeds_as_data_url() {
        let photo = Photo {
            bytes: Bytes::from_static(&[0xFF, 0xD8, 0xFF]),
            media_type: "image/png".to_string(),
        };
        let html = build_document(&ResumeRecord::default(), Some(&photo));
        assert!(html.contains("data:image/png;base64,"));
        // No external reference of any kind.
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
    }

    #[test]
    fn test_photo_block_present_with_and_without_photo() {
        let with = build_document(
            &ResumeRecord::default(),
            Some(&Photo {
                bytes: Bytes::from_static(b"img"),
                media_type: "image/jpeg".to_string(),
            }),
        );
        let without = build_document(&ResumeRecord::default(), None);
        assert!(with.contains(r#"<div class="photo">"#));
        assert!(without.contains(r#"<div class="photo">"#));
    }

    #[test]
    fn test_media_type_cannot_break_out_of_attribute() {
        let photo = Photo {
            bytes: Bytes::from_static(b"img"),
            media_type: "image/png\"/><script>".to_string(),
        };
        let html = build_document(&ResumeRecord::default(), Some(&photo));
        assert!(!html.contains("<script>"));
        assert!(html.contains("data:image/png"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let record = record_with_markup();
        assert_eq!(
            build_document(&record, None),
            build_document(&record, None)
        );
    }
}
