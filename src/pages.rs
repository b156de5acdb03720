//! HTML pages for the web UI, rendered with plain `format!` templates.

use crate::sentiment::SentimentLabel;

const PAGE_STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }
        header {
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 30px;
        }
        h1 { font-size: 26px; color: #4a9eff; }
        nav a { color: #888; margin-right: 15px; text-decoration: none; }
        nav a:hover { color: #4a9eff; }
        .content { padding: 0 20px 40px; max-width: 720px; }
        .card {
            background: #2a2a2a;
            border: 1px solid #3a3a3a;
            border-radius: 6px;
            padding: 20px;
            margin-bottom: 20px;
        }
        .label { font-size: 22px; }
        .emoji { font-size: 40px; }
        textarea, input[type=file] { width: 100%; margin: 10px 0; color: #e0e0e0; }
        textarea { background: #1a1a1a; border: 1px solid #3a3a3a; padding: 8px; height: 120px; }
        button {
            padding: 10px 20px;
            background: #4a9eff;
            color: white;
            border: none;
            border-radius: 4px;
            font-weight: 600;
            cursor: pointer;
        }
        button:hover { background: #3a8eef; }
        img.mood { max-width: 240px; border-radius: 6px; margin-top: 10px; }
"#;

/// Minimal HTML escaping for user-submitted text interpolated into pages.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{PAGE_STYLE}</style>
</head>
<body>
    <header>
        <h1>Mood Scribe</h1>
        <nav>
            <a href="/">Audio</a>
            <a href="/text.html">Text</a>
            <a href="/about.html">About</a>
        </nav>
    </header>
    <div class="content">
{body}
    </div>
</body>
</html>"#
    )
}

/// Audio upload page. All three result fields are optional; the same page
/// serves the bare GET form and every POST outcome, including the
/// unintelligible-audio case where all fields stay empty.
pub fn index_page(
    transcript: Option<&str>,
    compound: Option<f64>,
    label: Option<SentimentLabel>,
) -> String {
    let mut body = String::from(
        r#"        <div class="card">
            <h2>Analyze speech</h2>
            <p>Upload a .mp3 or .wav recording to transcribe it and score its mood.</p>
            <form method="post" action="/" enctype="multipart/form-data">
                <input type="file" name="audio" accept=".mp3,.wav">
                <button type="submit">Analyze</button>
            </form>
        </div>
"#,
    );

    if transcript.is_some() || compound.is_some() || label.is_some() {
        let transcript = escape_html(transcript.unwrap_or("(nothing recognized)"));
        let compound = compound
            .map(|c| format!("{c:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let (label_text, emoji) = label
            .map(|l| (l.as_str(), l.emoji()))
            .unwrap_or(("-", ""));
        body.push_str(&format!(
            r#"        <div class="card">
            <h2>Result</h2>
            <p>Transcript: {transcript}</p>
            <p>Compound score: {compound}</p>
            <p class="label">Mood: {label_text} <span class="emoji">{emoji}</span></p>
        </div>
"#
        ));
    }

    page("Mood Scribe - Audio", &body)
}

/// Empty text analysis form.
pub fn text_page() -> String {
    page(
        "Mood Scribe - Text",
        r#"        <div class="card">
            <h2>Analyze text</h2>
            <p>Paste a review and we will score it sentence by sentence.</p>
            <form method="post" action="/text.html">
                <textarea name="review-text" placeholder="Type your review here..."></textarea>
                <button type="submit">Analyze</button>
            </form>
        </div>
"#,
    )
}

/// Result page for the text flow.
pub fn output_page(sentence: &str, label: SentimentLabel) -> String {
    let body = format!(
        r#"        <div class="card">
            <h2>Your text</h2>
            <p>{sentence}</p>
        </div>
        <div class="card">
            <p class="label">Mood: {label} <span class="emoji">{emoji}</span></p>
            <img class="mood" src="{image}" alt="{label}">
            <p><a href="/text.html" style="color: #4a9eff">Analyze another</a></p>
        </div>
"#,
        sentence = escape_html(sentence),
        label = label.as_str(),
        emoji = label.emoji(),
        image = label.image_url(),
    );

    page("Mood Scribe - Result", &body)
}

pub fn about_page() -> String {
    page(
        "Mood Scribe - About",
        r#"        <div class="card">
            <h2>About</h2>
            <p>Mood Scribe transcribes speech with whisper.cpp and scores
            sentiment with the VADER lexicon, then maps the compound score to
            Happy, Sad, or Neutral.</p>
            <p>Uploads are written to a transient file that is deleted as soon
            as the request completes; nothing is stored.</p>
        </div>
"#,
    )
}
