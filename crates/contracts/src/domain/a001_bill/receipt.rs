//! Receipt file rules shared by the upload form and the upload endpoint.

/// Extensions accepted for a receipt, lowercase
pub const ALLOWED_RECEIPT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Message shown when a file with another extension is picked
pub const RECEIPT_FORMAT_MESSAGE: &str =
    "Seuls les fichiers au format jpg, jpeg ou png sont acceptés";

/// Lowercased extension of `file_name`, if it has one
pub fn receipt_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn is_allowed_receipt(file_name: &str) -> bool {
    receipt_extension(file_name)
        .map(|ext| ALLOWED_RECEIPT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// MIME type for an accepted receipt extension
pub fn receipt_content_type(file_name: &str) -> Option<&'static str> {
    match receipt_extension(file_name)?.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed_receipt("image.png"));
        assert!(is_allowed_receipt("scan.JPG"));
        assert!(is_allowed_receipt("ticket.restaurant.jpeg"));
    }

    #[test]
    fn test_rejected_extensions() {
        assert!(!is_allowed_receipt("image.pdf"));
        assert!(!is_allowed_receipt("png"));
        assert!(!is_allowed_receipt(".png"));
        assert!(!is_allowed_receipt("image."));
        assert!(!is_allowed_receipt("image.png.exe"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(receipt_content_type("a.jpeg"), Some("image/jpeg"));
        assert_eq!(receipt_content_type("a.PNG"), Some("image/png"));
        assert_eq!(receipt_content_type("a.gif"), None);
    }
}
