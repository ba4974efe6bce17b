use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Transfer buffer used when copying descriptors
pub const BUFFER_SIZE: usize = 128 * 1024;

/// Extension shared by every descriptor file
pub const DESCRIPTOR_EXTENSION: &str = ".json";

/// Check if a file name ends with the given extension
/// Pure function
pub fn matches_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(extension))
        .unwrap_or(false)
}

/// Strip the descriptor extension from a file name, leaving other names untouched
pub fn descriptor_name<P: AsRef<Path>>(path: P) -> String {
    let name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match name.strip_suffix(DESCRIPTOR_EXTENSION) {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// True when both paths name the same existing file
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy a single file byte-for-byte through a fixed-size buffer.
///
/// The loop runs until the source size recorded at open time has been
/// transferred. Both handles are dropped on every exit path. Copying a file
/// onto itself leaves it untouched. Returns the number of bytes written.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> io::Result<u64> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();
    let mut input = File::open(src_path)?;
    let size = input.metadata()?.len();

    if is_same_file(src_path, dest_path) {
        return Ok(size);
    }

    let mut output = File::create(dest_path)?;
    let mut buffer = vec![0; BUFFER_SIZE];
    let mut position: u64 = 0;

    while position < size {
        let bytes_read = match input.read(&mut buffer) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "transferred {} of {} bytes from {}",
                        position,
                        size,
                        src_path.display()
                    ),
                ));
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        output.write_all(&buffer[..bytes_read])?;
        position += bytes_read as u64;
    }

    output.flush()?;
    Ok(position)
}

/// List descriptor base names in a directory, sorted lexicographically.
/// Only the name is inspected; entries whose name is just the extension are skipped.
pub fn list_descriptor_names<P: AsRef<Path>>(directory: P, extension: &str) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(directory.as_ref())?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| name.strip_suffix(extension).map(str::to_string))
        .filter(|name| !name.is_empty())
        .collect();

    names.sort();
    Ok(names)
}

/// Write one name per line, truncating whatever the file held before
pub fn write_index_file<P: AsRef<Path>>(path: P, names: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    for name in names {
        writer.write_all(name.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
