use std::sync::Arc;

use actix_cors::Cors;
use actix_multipart::{Field, Multipart};
use actix_web::http::header::ContentType;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web};
use futures_util::TryStreamExt;
use log::{debug, error, info, warn};

use crate::dto::AnalysisDto;
use crate::pages;
use crate::sentiment::{SentimentAnalyzer, SentimentLabel};
use crate::speech::config::SpeechConfig;
use crate::speech::transcriber::{TranscriptionEngine, WhisperEngine};
use crate::upload::{TransientAudio, accepted_extension};

pub struct AppState {
    pub engine: Arc<dyn TranscriptionEngine>,
    pub analyzer: SentimentAnalyzer,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Outcome of one audio upload. Every field empty is a valid outcome: the
/// page renders the bare form again, mirroring the unintelligible case.
struct AudioOutcome {
    transcript: Option<String>,
    compound: Option<f64>,
    label: Option<SentimentLabel>,
}

impl AudioOutcome {
    fn empty() -> Self {
        Self {
            transcript: None,
            compound: None,
            label: None,
        }
    }
}

/// Save the upload, transcribe, score. The transient artifact is dropped on
/// every path out of this function, success and failure alike.
fn analyze_audio_upload(state: &AppState, filename: &str, bytes: &[u8]) -> AudioOutcome {
    let Some(extension) = accepted_extension(filename) else {
        warn!("Upload {filename:?} is not .mp3/.wav, rendering empty result");
        return AudioOutcome::empty();
    };

    let artifact = match TransientAudio::save(bytes, extension) {
        Ok(artifact) => artifact,
        Err(e) => {
            error!("Failed to save transient audio artifact: {e:#}");
            return AudioOutcome::empty();
        }
    };

    match state.engine.transcribe_file(artifact.path()) {
        Ok(Some(transcript)) => {
            let scores = state.analyzer.score(&transcript);
            debug!(
                "Score set: neg={:.3}, neu={:.3}, pos={:.3}, compound={:.4}",
                scores.negative, scores.neutral, scores.positive, scores.compound
            );
            let compound = scores.compound;
            let label = SentimentLabel::from_compound(compound);
            info!(
                "Transcribed {} bytes into {} characters: compound={compound:.4}, label={label}",
                bytes.len(),
                transcript.len()
            );
            AudioOutcome {
                transcript: Some(transcript),
                compound: Some(compound),
                label: Some(label),
            }
        }
        Ok(None) => {
            info!("Speech unintelligible, rendering empty result");
            AudioOutcome::empty()
        }
        Err(e) => {
            error!("Transcription failed: {e:#}");
            AudioOutcome::empty()
        }
    }
}

async fn read_field_data(mut field: Field) -> Result<Vec<u8>, actix_web::Error> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        data.extend_from_slice(&chunk);
    }
    debug!("Read field data: {} bytes", data.len());
    Ok(data)
}

/// Pull the `audio` field out of a multipart payload. `Ok(None)` means the
/// field was missing entirely.
async fn read_audio_upload(
    payload: &mut Multipart,
) -> Result<Option<(String, Vec<u8>)>, actix_web::Error> {
    let mut audio: Option<(String, Vec<u8>)> = None;

    while let Some(field) = payload.try_next().await.unwrap_or(None) {
        match field.name() {
            Some("audio") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let bytes = read_field_data(field).await?;
                debug!("Audio data received: {} bytes ({filename:?})", bytes.len());
                audio = Some((filename, bytes));
            }
            _ => continue,
        }
    }

    Ok(audio)
}

fn missing_audio_response() -> HttpResponse {
    warn!("No audio file provided in analysis request");
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "No audio file provided"
    }))
}

#[get("/")]
async fn index_form() -> impl Responder {
    html(pages::index_page(None, None, None))
}

#[post("/")]
async fn index_upload(data: web::Data<AppState>, mut payload: Multipart) -> HttpResponse {
    debug!("Audio analysis request received");

    let upload = match read_audio_upload(&mut payload).await {
        Ok(upload) => upload,
        Err(e) => {
            error!("Failed to read audio data: {e}");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Failed to read audio data"
            }));
        }
    };

    let Some((filename, bytes)) = upload else {
        return missing_audio_response();
    };

    let outcome = analyze_audio_upload(&data, &filename, &bytes);
    html(pages::index_page(
        outcome.transcript.as_deref(),
        outcome.compound,
        outcome.label,
    ))
}

#[derive(serde::Deserialize)]
struct ReviewForm {
    #[serde(rename = "review-text")]
    review_text: String,
}

#[get("/text.html")]
async fn text_form() -> impl Responder {
    html(pages::text_page())
}

#[post("/text.html")]
async fn text_submit(data: web::Data<AppState>, form: web::Form<ReviewForm>) -> HttpResponse {
    if form.review_text.is_empty() {
        return html(pages::text_page());
    }

    match data.analyzer.analyze_review(&form.review_text) {
        Some(analysis) => {
            info!(
                "Scored review: {} segments, mean compound={:.4}, label={}",
                analysis.segment_count, analysis.mean_compound, analysis.label
            );
            html(pages::output_page(&form.review_text, analysis.label))
        }
        None => {
            // Only dots and whitespace: treated like an empty submission
            debug!("Review contained no scoreable segments");
            html(pages::text_page())
        }
    }
}

#[get("/about.html")]
async fn about() -> impl Responder {
    html(pages::about_page())
}

#[get("/api/v1/health")]
async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Mood Scribe analysis service is running"
    }))
}

/// JSON twin of the audio flow, used by the CLI client.
#[post("/api/v1/analyze")]
async fn analyze_api(data: web::Data<AppState>, mut payload: Multipart) -> HttpResponse {
    debug!("API analysis request received");

    let upload = match read_audio_upload(&mut payload).await {
        Ok(upload) => upload,
        Err(e) => {
            error!("Failed to read audio data: {e}");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Failed to read audio data"
            }));
        }
    };

    let Some((filename, bytes)) = upload else {
        return missing_audio_response();
    };

    let outcome = analyze_audio_upload(&data, &filename, &bytes);
    HttpResponse::Ok().json(AnalysisDto {
        transcript: outcome.transcript,
        compound: outcome.compound,
        label: outcome.label.map(|l| l.as_str().to_string()),
    })
}

pub async fn run_server(host: String, port: u16) -> std::io::Result<()> {
    info!("Starting Mood Scribe analysis service");
    info!("Initializing speech transcriber...");

    let config = SpeechConfig::default();
    info!(
        "Using configuration: model_path={:?}, use_gpu={}, language={}, num_threads={}",
        config.model_path, config.use_gpu, config.language, config.num_threads
    );

    let engine = match WhisperEngine::new(config) {
        Ok(engine) => {
            info!("Speech transcriber initialized successfully");
            engine
        }
        Err(e) => {
            error!("Failed to initialize transcriber: {e}");
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState {
        engine: Arc::new(engine),
        analyzer: SentimentAnalyzer::new(),
    });

    info!("Starting HTTP server on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(
                actix_multipart::form::MultipartFormConfig::default()
                    .total_limit(100 * 1024 * 1024), // 100MB
            )
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(index_form)
            .service(index_upload)
            .service(text_form)
            .service(text_submit)
            .service(about)
            .service(health_check)
            .service(analyze_api)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Engine stub that returns a fixed transcript and records the artifact
    /// path it was handed, so tests can assert the cleanup invariant.
    struct FixedTranscript {
        transcript: Option<String>,
        seen: Mutex<Option<PathBuf>>,
    }

    impl FixedTranscript {
        fn new(transcript: Option<&str>) -> Self {
            Self {
                transcript: transcript.map(String::from),
                seen: Mutex::new(None),
            }
        }

        fn seen_path(&self) -> Option<PathBuf> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl TranscriptionEngine for FixedTranscript {
        fn transcribe_file(&self, path: &Path) -> Result<Option<String>> {
            assert!(path.exists(), "artifact must exist while transcribing");
            *self.seen.lock().unwrap() = Some(path.to_path_buf());
            Ok(self.transcript.clone())
        }
    }

    fn state_with(engine: Arc<dyn TranscriptionEngine>) -> web::Data<AppState> {
        web::Data::new(AppState {
            engine,
            analyzer: SentimentAnalyzer::new(),
        })
    }

    fn multipart_body(field: &str, filename: Option<&str>, bytes: &[u8]) -> (String, Vec<u8>) {
        let boundary = "----mood-scribe-test";
        let disposition = match filename {
            Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
            None => format!("form-data; name=\"{field}\""),
        };
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state)
                    .service(index_form)
                    .service(index_upload)
                    .service(text_form)
                    .service(text_submit)
                    .service(about)
                    .service(health_check)
                    .service(analyze_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn index_get_renders_upload_form() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("<form"));
        assert!(body.contains("name=\"audio\""));
    }

    #[actix_web::test]
    async fn missing_audio_field_yields_error_payload() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let (content_type, body) = multipart_body("note", None, b"hello");
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/")
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "No audio file provided");
    }

    #[actix_web::test]
    async fn wrong_extension_never_reaches_the_engine() {
        let engine = Arc::new(FixedTranscript::new(Some("should not appear")));
        let app = test_app!(state_with(engine.clone()));
        let (content_type, body) = multipart_body("audio", Some("notes.txt"), b"text bytes");
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/")
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(!page.contains("should not appear"));
        assert!(engine.seen_path().is_none());
    }

    #[actix_web::test]
    async fn accepted_upload_is_transcribed_scored_and_cleaned_up() {
        let engine = Arc::new(FixedTranscript::new(Some("I love this product")));
        let app = test_app!(state_with(engine.clone()));
        let (content_type, body) = multipart_body("audio", Some("voice.wav"), b"fake wav bytes");
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/")
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(page.contains("I love this product"));
        assert!(page.contains("Happy"));

        let artifact = engine.seen_path().expect("engine saw the artifact");
        assert!(
            !artifact.exists(),
            "transient artifact must be gone after the response"
        );
    }

    #[actix_web::test]
    async fn unintelligible_audio_renders_empty_result() {
        let engine = Arc::new(FixedTranscript::new(None));
        let app = test_app!(state_with(engine.clone()));
        let (content_type, body) = multipart_body("audio", Some("mumble.mp3"), b"fake mp3 bytes");
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/")
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(!page.contains("Mood:"));

        let artifact = engine.seen_path().expect("engine saw the artifact");
        assert!(!artifact.exists());
    }

    #[actix_web::test]
    async fn text_get_renders_input_form() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/text.html").to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("review-text"));
    }

    #[actix_web::test]
    async fn empty_text_rerenders_the_form() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/text.html")
                .set_form(serde_json::json!({"review-text": ""}))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("review-text"));
        assert!(!body.contains("Mood:"));
    }

    #[actix_web::test]
    async fn dots_only_text_is_treated_like_empty() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/text.html")
                .set_form(serde_json::json!({"review-text": "..."}))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("review-text"));
        assert!(!body.contains("Mood:"));
    }

    #[actix_web::test]
    async fn submitted_text_is_scored_and_labeled() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let review = "I love this. I hate that.";

        let expected = SentimentAnalyzer::new()
            .analyze_review(review)
            .unwrap()
            .label;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/text.html")
                .set_form(serde_json::json!({"review-text": review}))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("I love this. I hate that."));
        assert!(body.contains(expected.as_str()));
        assert!(body.contains(expected.emoji()));
        assert!(body.contains(expected.image_url()));
    }

    #[actix_web::test]
    async fn about_page_is_served() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/about.html").to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("About"));
    }

    #[actix_web::test]
    async fn health_endpoint_reports_ok() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/health").to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "ok");
    }

    #[actix_web::test]
    async fn api_analyze_returns_json_result() {
        let engine = Arc::new(FixedTranscript::new(Some("what a wonderful day")));
        let app = test_app!(state_with(engine));
        let (content_type, body) = multipart_body("audio", Some("voice.wav"), b"fake wav bytes");
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/analyze")
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["transcript"], "what a wonderful day");
        assert_eq!(json["label"], "Happy");
        assert!(json["compound"].as_f64().unwrap() >= 0.05);
    }

    #[actix_web::test]
    async fn api_analyze_requires_audio_field() {
        let app = test_app!(state_with(Arc::new(FixedTranscript::new(None))));
        let (content_type, body) = multipart_body("note", None, b"hi");
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/analyze")
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "No audio file provided");
    }
}
