use std::string::FromUtf8Error;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding used for the settings file.
///
/// Windows editors historically expect a byte order mark on UTF-8 files, so
/// the bootstrap picks [`TextEncoding::for_host`] once and hands the result to
/// the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf8Bom,
}

impl TextEncoding {
    pub fn for_host() -> Self {
        if cfg!(windows) {
            TextEncoding::Utf8Bom
        } else {
            TextEncoding::Utf8
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf8Bom => "UTF-8-SIG",
        }
    }

    /// Encode UTF-8 text for writing.
    pub fn encode(self, text: &[u8]) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.to_vec(),
            TextEncoding::Utf8Bom => {
                let mut out = Vec::with_capacity(BOM.len() + text.len());
                out.extend_from_slice(BOM);
                out.extend_from_slice(text);
                out
            }
        }
    }

    /// Decode file content. A leading BOM is dropped whichever variant is
    /// configured, so files edited on another platform still load.
    pub fn decode(self, mut bytes: Vec<u8>) -> Result<String, FromUtf8Error> {
        if bytes.starts_with(BOM) {
            bytes.drain(..BOM.len());
        }
        String::from_utf8(bytes)
    }
}
