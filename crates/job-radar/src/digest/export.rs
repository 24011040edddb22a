use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{DailyDigest, DigestEntry};

pub const DIGEST_SUBJECT: &str = "My 9AM Job Digest";

const HEADING: &str = "Top 10 Jobs For You — 9AM Digest";
const FOOTER_NOTE: &str = "This digest was generated based on your preferences.";
const SIGNATURE: &str = "Job Notification Tracker";
const EMPTY_NOTE: &str = "No matching roles today.";
const RULE_WIDTH: usize = 50;

/// Characters left unescaped by a browser's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Numbered plain-text digest for clipboard and email bodies.
pub fn render_plain_text(digest: &DailyDigest) -> String {
    let mut text = String::new();
    writeln!(text, "{HEADING}").expect("write heading");
    writeln!(text, "{}", long_date(digest)).expect("write date");
    writeln!(text, "{}", "=".repeat(RULE_WIDTH)).expect("write rule");
    text.push('\n');

    if digest.is_empty() {
        writeln!(text, "{EMPTY_NOTE}").expect("write empty note");
        text.push('\n');
    }

    for (index, entry) in digest.jobs.iter().enumerate() {
        let job = &entry.job;
        writeln!(text, "{}. {}", index + 1, job.title).expect("write title");
        writeln!(text, "   Company: {}", job.company).expect("write company");
        writeln!(text, "   Location: {} ({})", job.location, job.mode).expect("write location");
        writeln!(text, "   Experience: {}", experience_label(entry)).expect("write experience");
        writeln!(text, "   Salary: {}", job.salary_range).expect("write salary");
        writeln!(text, "   Match Score: {}%", entry.match_score).expect("write score");
        writeln!(text, "   Apply: {}", job.apply_url).expect("write apply link");
        text.push('\n');
    }

    text.push_str("---\n");
    writeln!(text, "{FOOTER_NOTE}").expect("write footer");
    text.push_str(SIGNATURE);
    text
}

/// HTML fragment carrying the same information as [`render_plain_text`].
pub fn render_html(digest: &DailyDigest) -> String {
    let mut html = String::new();
    writeln!(html, "<h2>{}</h2>", escape_html(HEADING)).expect("write heading");
    writeln!(html, "<p><strong>{}</strong></p>", long_date(digest)).expect("write date");
    html.push_str("<hr style=\"margin: 20px 0;\" />\n");

    if digest.is_empty() {
        writeln!(html, "<p>{EMPTY_NOTE}</p>").expect("write empty note");
    }

    for (index, entry) in digest.jobs.iter().enumerate() {
        let job = &entry.job;
        html.push_str("<div style=\"margin-bottom: 20px;\">\n");
        writeln!(html, "<h3>{}. {}</h3>", index + 1, escape_html(&job.title))
            .expect("write job title");
        writeln!(
            html,
            "<p><strong>Company:</strong> {}<br />",
            escape_html(&job.company)
        )
        .expect("write company");
        writeln!(
            html,
            "<strong>Location:</strong> {} ({})<br />",
            escape_html(&job.location),
            job.mode
        )
        .expect("write location");
        writeln!(
            html,
            "<strong>Experience:</strong> {}<br />",
            escape_html(&experience_label(entry))
        )
        .expect("write experience");
        writeln!(
            html,
            "<strong>Salary:</strong> {}<br />",
            escape_html(&job.salary_range)
        )
        .expect("write salary");
        writeln!(
            html,
            "<strong>Match Score:</strong> {}%</p>",
            entry.match_score
        )
        .expect("write score");
        writeln!(
            html,
            "<p><a href=\"{}\">Apply Now</a></p>",
            escape_html(&job.apply_url)
        )
        .expect("write apply link");
        html.push_str("</div>\n");
    }

    html.push_str("<hr style=\"margin: 20px 0;\" />\n");
    writeln!(html, "<p><em>{FOOTER_NOTE}</em></p>").expect("write footer");
    write!(html, "<p>{SIGNATURE}</p>").expect("write signature");
    html
}

/// `mailto:` link with the digest subject and the plain-text rendering as body.
pub fn email_draft_link(digest: &DailyDigest) -> String {
    let body = render_plain_text(digest);
    format!(
        "mailto:?subject={}&body={}",
        utf8_percent_encode(DIGEST_SUBJECT, URI_COMPONENT),
        utf8_percent_encode(&body, URI_COMPONENT)
    )
}

fn long_date(digest: &DailyDigest) -> String {
    digest.date.format("%A, %B %-d, %Y").to_string()
}

/// Numeric bands read as years (`1-3 years`); named bands such as `Fresher` stay as-is.
fn experience_label(entry: &DigestEntry) -> String {
    let band = entry.job.experience.trim();
    if band.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{band} years")
    } else {
        band.to_string()
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
