use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Image,
    Html,
    Pdf,
    Excel,
    Word,
    Text,
    Stylesheet,
    Javascript,
    Data,
    Archive,
    Other,
}

impl Category {
    /// categorize by extension, without the `.`
    ///
    /// ```
    /// # use tree::Category;
    /// assert_eq!(Category::from_extension("GIF"), Category::Image);
    /// assert_eq!(Category::from_extension("htm"), Category::Html);
    /// assert_eq!(Category::from_extension("mp3"), Category::Other);
    /// ```
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "gif" | "jpg" | "jpeg" | "png" | "bmp" | "webp" | "svg" | "ico" => Category::Image,
            "htm" | "html" => Category::Html,
            "pdf" => Category::Pdf,
            "xls" | "xlsx" => Category::Excel,
            "doc" | "docx" => Category::Word,
            "txt" | "csv" => Category::Text,
            "css" => Category::Stylesheet,
            "js" => Category::Javascript,
            "json" | "xml" => Category::Data,
            "zip" => Category::Archive,
            _ => Category::Other,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Html => "html",
            Category::Pdf => "pdf",
            Category::Excel => "excel",
            Category::Word => "word",
            Category::Text => "text",
            Category::Stylesheet => "stylesheet",
            Category::Javascript => "javascript",
            Category::Data => "data",
            Category::Archive => "archive",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}
