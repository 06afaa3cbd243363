use custom_error::custom_error;

pub type Result<T> = std::result::Result<T, Error>;

custom_error! {pub Error
    Io{source: std::io::Error} = "I/O error",
    Zip{source: zip::result::ZipError} = "ZIP error",
    Json{source: serde_json::Error} = "JSON error",
    NoDatFile = "No .DAT member found in archive"
}
