use std::path::{Path, PathBuf};

/// String from FourCC bytes.
/// Maps 0-255 to `char`, exceeding ascii,
/// since some vendors use ISO8859-1 FourCC:s.
pub(crate) fn fourcc_string(bytes: &[u8; 4]) -> String {
    bytes.iter()
        .map(|b| *b as char)
        .collect()
}

/// Path with the extension removed, e.g. `dir/IMG_01.jpg` -> `dir/IMG_01`.
pub(crate) fn base_path(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Appends `suffix` to the file name of `base`,
/// e.g. `dir/IMG_01` + `.mp4` -> `dir/IMG_01.mp4`.
pub(crate) fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
