use bytes::Bytes;

/// A file received with a form submission, fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as sent by the client.
    pub file_name: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lowercased extension of the client file name.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// MIME type sniffed from the file contents. The client's declared type
    /// and file name play no part.
    pub fn mime_type(&self) -> Option<&'static str> {
        infer::get(&self.data).map(|kind| kind.mime_type())
    }

    /// Extensions registered for the sniffed MIME type.
    pub fn content_extensions(&self) -> &'static [&'static str] {
        self.mime_type()
            .and_then(mime_guess::get_mime_extensions_str)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_extension_is_lowercased() {
        let file = UploadedFile::new("photo.JPG", Bytes::from_static(JPEG_MAGIC));
        assert_eq!(file.extension().as_deref(), Some("jpg"));
        assert_eq!(UploadedFile::new("README", Bytes::new()).extension(), None);
    }

    #[test]
    fn test_mime_type_comes_from_contents() {
        let file = UploadedFile::new("photo.png", Bytes::from_static(JPEG_MAGIC));
        assert_eq!(file.mime_type(), Some("image/jpeg"));
        assert!(file.content_extensions().contains(&"jpg"));
    }

    #[test]
    fn test_unrecognised_contents_have_no_mime_type() {
        let file = UploadedFile::new("photo.jpg", Bytes::from_static(b"plain text"));
        assert_eq!(file.mime_type(), None);
        assert!(file.content_extensions().is_empty());
    }
}
