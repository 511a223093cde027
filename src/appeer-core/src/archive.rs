use crate::Error;
use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::Path,
};
use zip::{write::FileOptions, ZipArchive, ZipWriter};

/// Recursively zip every file under `directory` into `archive_path`,
/// storing paths relative to `directory`.
///
/// # Errors
///
/// Returns [`Error::Io`] if `directory` cannot be walked, or
/// [`Error::Archive`] if the zip file cannot be written.
pub fn archive_directory(directory: &Path, archive_path: &Path) -> Result<(), Error> {
    let mut files = Vec::new();
    collect_files(directory, &mut files)?;
    archive_list_of_files(&files, directory, archive_path)
}

/// Zip the given `files` (absolute paths) into `archive_path`, storing each
/// entry's path relative to `base`.
///
/// # Errors
///
/// Returns [`Error::Io`] if a file cannot be read, or [`Error::Archive`] if
/// the zip file cannot be written.
pub fn archive_list_of_files(
    files: &[std::path::PathBuf],
    base: &Path,
    archive_path: &Path,
) -> Result<(), Error> {
    let file = File::create(archive_path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for path in files {
        let name = path
            .strip_prefix(base)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        writer.start_file(name, options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}

/// Extract every entry of `archive_path` into `destination`, recreating the
/// directory structure stored in the archive.
///
/// # Errors
///
/// Returns [`Error::Io`] if `destination` cannot be written to, or
/// [`Error::Archive`] if the archive is malformed.
pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<(), Error> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let out_path = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => continue,
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out_file = File::create(&out_path)?;
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;
        out_file.write_all(&buf)?;
    }

    Ok(())
}

fn collect_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> Result<(), Error> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}
