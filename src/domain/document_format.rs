use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Png,
    Jpeg,
    Webp,
}

impl DocumentFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if mime.contains("pdf") {
            Some(Self::Pdf)
        } else if mime.contains("png") {
            Some(Self::Png)
        } else if mime.contains("jpeg") || mime.contains("jpg") {
            Some(Self::Jpeg)
        } else if mime.contains("webp") {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn from_url_suffix(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let file_name = path.rsplit('/').next().unwrap_or_default();
        let (_, extension) = file_name.rsplit_once('.')?;

        match extension.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Content type wins, then the URL suffix, then JPEG.
    pub fn detect(content_type: Option<&str>, url: &str) -> Self {
        content_type
            .and_then(Self::from_content_type)
            .or_else(|| Self::from_url_suffix(url))
            .unwrap_or(Self::Jpeg)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Png => ".png",
            Self::Jpeg => ".jpg",
            Self::Webp => ".webp",
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn is_multi_page(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}
