use tracing::warn;

use crate::cv::CvError;

/// Text layer of a PDF résumé.
pub fn extract_text(bytes: &[u8]) -> Result<String, CvError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        warn!(error = %e, "PDF text extraction failed");
        CvError::Pdf(e.to_string())
    })
}

/// Plain-text uploads must be UTF-8; anything else is rejected before
/// extraction.
pub fn decode_text(bytes: &[u8]) -> Result<String, CvError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| CvError::NotUtf8)
}
