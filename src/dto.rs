#[derive(serde::Serialize)]
pub struct AnalysisDto {
    pub transcript: Option<String>,
    pub compound: Option<f64>,
    pub label: Option<String>,
}
