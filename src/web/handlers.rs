use crate::intake::{check_extension, decode};
use crate::llm::models::{AnalysisRequest, AnalysisResult};
use crate::web::page::{render, ImagePreview, Notice, PageView};
use crate::web::types::AppState;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

// server status handler
pub async fn health_handler() -> Json<Value> {
    Json(json!({"status": "running"}))
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render(&PageView::new(state.default_prompt.as_str())))
}

pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let span = info_span!("analyze", request_id = %Uuid::new_v4());
    let (status, view) = handle_upload(&state, multipart).instrument(span).await;
    (status, Html(render(&view)))
}

#[derive(Default)]
struct UploadForm {
    file_name: String,
    file: Option<Vec<u8>>,
    prompt: Option<String>,
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, MultipartError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                // browsers send an empty, unnamed part when no file was chosen
                if !data.is_empty() || !file_name.is_empty() {
                    form.file_name = file_name;
                    form.file = Some(data.to_vec());
                }
            }
            Some("prompt") => form.prompt = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn handle_upload(state: &AppState, mut multipart: Multipart) -> (StatusCode, PageView) {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "Malformed upload form");
            let view = PageView::new(state.default_prompt.as_str())
                .with_notice(Notice::error(format!("Could not read the upload: {}", e)));
            return (StatusCode::BAD_REQUEST, view);
        }
    };

    let prompt = form.prompt.unwrap_or_else(|| state.default_prompt.clone());
    let mut view = PageView::new(prompt.as_str());

    let Some(bytes) = form.file else {
        let notice = Notice::info("Upload a JPG or PNG image of the wall to analyze.");
        return (StatusCode::BAD_REQUEST, view.with_notice(notice));
    };

    let image = match check_extension(&form.file_name).and_then(|_| decode(bytes)) {
        Ok(image) => image,
        Err(e) => {
            warn!(file_name = %form.file_name, error = %e, "Rejected upload");
            let notice = Notice::error(format!("Could not read the uploaded image: {}", e));
            return (StatusCode::BAD_REQUEST, view.with_notice(notice));
        }
    };
    info!(file_name = %form.file_name, width = image.width(), height = image.height(), "Accepted upload");
    view.image = Some(ImagePreview::from(&image));

    let request = match AnalysisRequest::new(&image, prompt) {
        Ok(request) => request,
        Err(_) => {
            let notice = Notice::warning("Please enter a prompt before analyzing the image.");
            return (StatusCode::BAD_REQUEST, view.with_notice(notice));
        }
    };

    let result = state.analyzer.analyze(&request).await;
    let status = match result {
        AnalysisResult::TransportError { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };

    (status, view.with_result(&result))
}
