use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::ApiError;

pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
pub const PRESIGN_TTL_SECS: u64 = 30 * 60;

pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Multipart body drained into memory: file parts keyed by field name plus
/// plain text fields.
pub struct MultipartForm {
    files: Vec<(String, UploadedFile)>,
    fields: HashMap<String, String>,
}

impl MultipartForm {
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, file)| file)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

pub async fn collect_multipart(mut multipart: Multipart) -> Result<MultipartForm, ApiError> {
    let mut files = Vec::new();
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("Invalid multipart payload."))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(filename) = field.file_name() {
            let filename = filename.to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let body = field
                .bytes()
                .await
                .map_err(|_| ApiError::validation("Could not read uploaded file."))?;
            files.push((
                name,
                UploadedFile {
                    filename,
                    content_type,
                    body,
                },
            ));
        } else {
            let value = field
                .text()
                .await
                .map_err(|_| ApiError::validation("Invalid multipart payload."))?;
            fields.insert(name, value);
        }
    }

    Ok(MultipartForm { files, fields })
}

/// Resumes must be PDF and at most 5MB.
pub fn validate_resume(file: &UploadedFile) -> Result<(), ApiError> {
    if file.body.is_empty() {
        return Err(ApiError::validation("Resume is required."));
    }
    if file.body.len() > MAX_FILE_BYTES {
        return Err(ApiError::validation("Resume file size must be under 5MB."));
    }
    if !file.filename.to_lowercase().ends_with(".pdf") {
        return Err(ApiError::validation(
            "Only PDF files are accepted for resumes.",
        ));
    }
    Ok(())
}

/// Logos must be a known raster format and at most 5MB. Returns the file
/// extension for the storage key.
pub fn validate_logo(file: &UploadedFile) -> Result<&'static str, ApiError> {
    if file.body.is_empty() {
        return Err(ApiError::validation("Logo is required."));
    }
    if file.body.len() > MAX_FILE_BYTES {
        return Err(ApiError::validation("Logo file size must be under 5MB."));
    }
    logo_ext_from_mime(&file.content_type)
        .ok_or_else(|| ApiError::validation("Logo must be a JPEG, PNG or WebP image."))
}

fn logo_ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

pub fn resume_key(user_id: Uuid) -> String {
    format!("resumes/{}/{}.pdf", user_id, Uuid::new_v4())
}

pub fn application_resume_key(user_id: Uuid) -> String {
    format!("application_resumes/{}/{}.pdf", user_id, Uuid::new_v4())
}

pub fn logo_key(company_id: Uuid, ext: &str) -> String {
    format!("company_logos/{}/{}.{}", company_id, Uuid::new_v4(), ext)
}

#[cfg(test)]
mod upload_tests {
    use super::*;

    fn pdf(name: &str, len: usize) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            content_type: "application/pdf".to_string(),
            body: Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn test_validate_resume_accepts_small_pdf() {
        assert!(validate_resume(&pdf("cv.pdf", 1024)).is_ok());
        assert!(validate_resume(&pdf("CV.PDF", 1024)).is_ok());
    }

    #[test]
    fn test_validate_resume_rejects_oversize() {
        let err = validate_resume(&pdf("cv.pdf", MAX_FILE_BYTES + 1)).unwrap_err();
        assert!(err.to_string().contains("under 5MB"));
    }

    #[test]
    fn test_validate_resume_rejects_non_pdf() {
        let err = validate_resume(&pdf("cv.docx", 1024)).unwrap_err();
        assert!(err.to_string().contains("PDF"));
    }

    #[test]
    fn test_validate_resume_rejects_empty() {
        assert!(validate_resume(&pdf("cv.pdf", 0)).is_err());
    }

    #[test]
    fn test_logo_ext_from_mime() {
        assert_eq!(logo_ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(logo_ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(logo_ext_from_mime("image/png"), Some("png"));
        assert_eq!(logo_ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(logo_ext_from_mime("image/gif"), None);
        assert_eq!(logo_ext_from_mime("application/pdf"), None);
    }

    #[test]
    fn test_validate_logo_returns_extension() {
        let logo = UploadedFile {
            filename: "logo.png".to_string(),
            content_type: "image/png".to_string(),
            body: Bytes::from_static(b"img"),
        };
        assert_eq!(validate_logo(&logo).unwrap(), "png");
    }

    #[test]
    fn test_storage_keys_are_namespaced() {
        let user = Uuid::new_v4();
        let company = Uuid::new_v4();
        assert!(resume_key(user).starts_with(&format!("resumes/{}/", user)));
        assert!(application_resume_key(user).starts_with(&format!("application_resumes/{}/", user)));
        let key = logo_key(company, "png");
        assert!(key.starts_with(&format!("company_logos/{}/", company)));
        assert!(key.ends_with(".png"));
    }
}
