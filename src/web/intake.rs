use std::panic::{catch_unwind, AssertUnwindSafe};

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use thiserror::Error;

pub const TEXT_FIELD: &str = "email_text";
pub const FILE_FIELD: &str = "email_file";

#[derive(Debug, Error)]
pub enum UserInputError {
    #[error("Nenhum conteúdo fornecido.")]
    NoContent,
    #[error("Nenhum arquivo selecionado.")]
    NoFileSelected,
    #[error("Formato não suportado. Envie .txt ou .pdf.")]
    UnsupportedFormat,
    #[error("Conteúdo do email não fornecido.")]
    EmptyJsonContent,
    #[error("Não foi possível ler o envio: {0}")]
    Upload(String),
    #[error("Arquivo muito grande. Máx: {}", human_size(.0))]
    TooLarge(usize),
    #[error("Erro ao extrair texto do PDF: {0}")]
    Pdf(String),
}

struct UploadedFile {
    filename: Option<String>,
    bytes: Vec<u8>,
}

pub async fn read_email_from_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<String, UserInputError> {
    let mut text: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| upload_error(err, max_bytes))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(TEXT_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| upload_error(err, max_bytes))?;
                text = Some(value);
            }
            Some(FILE_FIELD) => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| upload_error(err, max_bytes))?;
                file = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    if let Some(text) = text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        tracing::info!(target: "http", chars = text.len(), "processing typed email");
        return Ok(text);
    }

    let Some(file) = file else {
        return Err(UserInputError::NoContent);
    };
    let filename = file
        .filename
        .filter(|name| !name.trim().is_empty())
        .ok_or(UserInputError::NoFileSelected)?;

    tracing::info!(target: "http", file = %filename, bytes = file.bytes.len(), "processing uploaded email");
    decode_upload(&filename, file.bytes).await
}

fn upload_error(err: MultipartError, max_bytes: usize) -> UserInputError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UserInputError::TooLarge(max_bytes)
    } else {
        UserInputError::Upload(err.body_text())
    }
}

fn human_size(bytes: &usize) -> String {
    const MIB: usize = 1024 * 1024;
    if *bytes >= MIB {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{}KB", bytes.div_ceil(1024))
    }
}

pub async fn decode_upload(filename: &str, bytes: Vec<u8>) -> Result<String, UserInputError> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".txt") {
        return Ok(String::from_utf8_lossy(&bytes).trim().to_string());
    }
    if lower.ends_with(".pdf") {
        let text = tokio::task::spawn_blocking(move || extract_pdf(&bytes))
            .await
            .map_err(|err| UserInputError::Pdf(err.to_string()))??;
        return Ok(text.trim().to_string());
    }
    Err(UserInputError::UnsupportedFormat)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, UserInputError> {
    // pdf-extract panics on some malformed documents
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(err)) => Err(UserInputError::Pdf(err.to_string())),
        Err(_) => Err(UserInputError::Pdf("documento malformado".into())),
    }
}

pub fn read_email_from_json(email_content: Option<&str>) -> Result<String, UserInputError> {
    email_content
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .ok_or(UserInputError::EmptyJsonContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn txt_upload_tolerates_invalid_utf8() {
        let bytes = b"Segue o relat\xffrio do m\xc3\xaas\n".to_vec();
        let text = decode_upload("Email.TXT", bytes).await.unwrap();
        assert!(text.starts_with("Segue o relat"));
        assert!(text.ends_with("do mês"));
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let err = decode_upload("email.docx", b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, UserInputError::UnsupportedFormat));
        assert_eq!(err.to_string(), "Formato não suportado. Envie .txt ou .pdf.");
    }

    #[tokio::test]
    async fn garbage_pdf_is_a_user_error() {
        let err = decode_upload("email.pdf", b"not a pdf".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, UserInputError::Pdf(_)));
    }

    #[test]
    fn too_large_message_names_the_limit() {
        assert_eq!(
            UserInputError::TooLarge(16 * 1024 * 1024).to_string(),
            "Arquivo muito grande. Máx: 16MB"
        );
        assert_eq!(
            UserInputError::TooLarge(1024).to_string(),
            "Arquivo muito grande. Máx: 1KB"
        );
    }

    #[test]
    fn json_content_must_not_be_blank() {
        assert!(matches!(
            read_email_from_json(Some("   ")),
            Err(UserInputError::EmptyJsonContent)
        ));
        assert!(matches!(
            read_email_from_json(None),
            Err(UserInputError::EmptyJsonContent)
        ));
        assert_eq!(read_email_from_json(Some(" oi ")).unwrap(), "oi");
    }
}
