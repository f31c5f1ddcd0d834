//! Wire format of the `analyze-message` route.

use std::str::FromStr;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use visa_core::analysis::{AnalysisReply, AnalysisStatus, AnalyzeResult};
use visa_core::conversation::Attachment;
use visa_core::error::{Result, VisaError};

/// Form field carrying the user's text.
pub const MESSAGE_FIELD: &str = "message";
/// Form field carrying the uploaded document.
pub const IMAGE_FIELD: &str = "image";

/// JSON body sent when no file is attached.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub message: &'a str,
}

/// Builds the multipart body used when a file is attached.
pub fn multipart_form(content: &str, file: &Attachment) -> Result<Form> {
    let part = Part::bytes(file.data().to_vec())
        .file_name(file.file_name().to_string())
        .mime_str(file.content_type())
        .map_err(|err| VisaError::attachment(file.file_name(), err.to_string()))?;

    Ok(Form::new()
        .text(MESSAGE_FIELD, content.to_string())
        .part(IMAGE_FIELD, part))
}

/// Returns true when a `Content-Type` header value announces JSON.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.contains("application/json")
}

/// Parses a JSON body into a result.
///
/// Applies the same defaults whatever the HTTP status was: a missing or
/// unknown `status` becomes `error`, and a missing `message` becomes the
/// serialized body. Each field falls back on its own, so one mistyped hint
/// does not discard the rest of the reply.
pub fn decode_json_body(body: &str) -> Result<AnalyzeResult> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| VisaError::decode(err.to_string()))?;
    Ok(decode_value(value))
}

fn decode_value(value: Value) -> AnalyzeResult {
    let status = match string_field(&value, "status") {
        Some(raw) => AnalysisStatus::from_str(&raw).unwrap_or_else(|_| {
            tracing::warn!("Unrecognised analyzer status '{}', treating as error", raw);
            AnalysisStatus::Error
        }),
        None => AnalysisStatus::Error,
    };

    let message = string_field(&value, "message").unwrap_or_else(|| value.to_string());

    AnalyzeResult::from_parts(
        status,
        AnalysisReply {
            message,
            passport_country: string_field(&value, "passportCountry"),
            destination_country: string_field(&value, "destinationCountry"),
            detected_passport: string_field(&value, "detected_passport"),
            detected_destination: string_field(&value, "detected_destination"),
        },
    )
}

/// Reads one string field; absent, null or non-string values yield `None`.
fn string_field(value: &Value, key: &str) -> Option<String> {
    let field = value.get(key)?;
    match field.as_str() {
        Some(text) => Some(text.to_string()),
        None => {
            if !field.is_null() {
                tracing::debug!("Ignoring non-string analyzer field '{}': {}", key, field);
            }
            None
        }
    }
}
