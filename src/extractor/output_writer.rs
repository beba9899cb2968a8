use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const BANNER: &str = "\
// AUTOGENERATED FILE -- DO NOT EDIT -- SEE Makefile
//
// WebGL IDL definitions scraped from the Khronos specification:
// https://www.khronos.org/registry/webgl/specs/latest/
";

pub struct IdlWriter {
    atomic: bool,
}

impl IdlWriter {
    pub fn new() -> Self {
        Self { atomic: false }
    }

    /// Write through a temporary sibling file and rename it over the target.
    pub fn with_atomic_write(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn render(idl: &str) -> String {
        let mut document = String::with_capacity(BANNER.len() + idl.len());
        document.push_str(BANNER);
        document.push_str(idl);
        document
    }

    /// Replaces whatever is at `path`. Returns the number of bytes written.
    pub fn write(&self, path: &Path, idl: &str) -> Result<u64> {
        let document = Self::render(idl);
        let bytes = document.as_bytes();

        if self.atomic {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let mut temp = NamedTempFile::new_in(dir)?;
            temp.write_all(bytes)?;
            temp.as_file().sync_all()?;
            temp.persist(path).map_err(|e| e.error)?;
        } else {
            fs::write(path, bytes)?;
        }

        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            atomic = self.atomic,
            "wrote IDL"
        );
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_banner_is_exact() {
        assert_eq!(
            BANNER,
            "// AUTOGENERATED FILE -- DO NOT EDIT -- SEE Makefile\n\
             //\n\
             // WebGL IDL definitions scraped from the Khronos specification:\n\
             // https://www.khronos.org/registry/webgl/specs/latest/\n"
        );
    }

    #[test]
    fn test_render_prepends_banner() {
        let idl = "interface WebGL2RenderingContext { };\n";
        assert_eq!(IdlWriter::render(idl), format!("{}{}", BANNER, idl));
        assert_eq!(IdlWriter::render(""), BANNER);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("webgl.idl");
        fs::write(&path, "stale contents that are much longer than the new ones").unwrap();

        let written = IdlWriter::new().write(&path, "typedef long GLint;\n").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, format!("{}typedef long GLint;\n", BANNER));
        assert_eq!(written, contents.len() as u64);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("webgl2.idl");
        fs::write(&path, "old").unwrap();

        IdlWriter::new()
            .with_atomic_write(true)
            .write(&path, "interface A { };\n")
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}interface A {{ }};\n", BANNER)
        );
        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("webgl.idl");
        let writer = IdlWriter::new();

        writer.write(&path, "interface A { };\n").unwrap();
        let first = fs::read(&path).unwrap();
        writer.write(&path, "interface A { };\n").unwrap();
        assert_eq!(first, fs::read(&path).unwrap());
    }
}
