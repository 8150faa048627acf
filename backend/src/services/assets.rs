//! # Embedded frontend bundle
//!
//! `build.rs` copies `frontend/dist` into `static/dist`, which is compiled
//! into the binary. Requests for files that exist get the file with a MIME
//! type guessed from the extension; anything else gets `index.html` so the
//! SPA's hash routes and deep links keep working.

use actix_web::{HttpRequest, HttpResponse};
use include_dir::{include_dir, Dir};
use log::debug;
use mime_guess::from_path;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Looks `path` up in `dir`, falling back to `index.html`.
///
/// # Returns
/// `(content_type, bytes)`, or `None` when neither exists.
pub fn resolve<'a>(dir: &'a Dir<'a>, path: &str) -> Option<(String, &'a [u8])> {
    let path = path.trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match dir.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            Some((mime.as_ref().to_string(), file.contents()))
        }
        None => dir
            .get_file("index.html")
            .map(|index| ("text/html; charset=utf-8".to_string(), index.contents())),
    }
}

pub async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    match resolve(&STATIC_DIR, req.path()) {
        Some((content_type, body)) => HttpResponse::Ok()
            .content_type(content_type)
            .body(body.to_vec()),
        None => {
            debug!("No embedded asset for {}", req.path());
            HttpResponse::NotFound().body("Not Found")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use include_dir::{DirEntry, File};

    static ENTRIES: [DirEntry; 2] = [
        DirEntry::File(File::new("index.html", b"<html>dooform</html>")),
        DirEntry::File(File::new("app.js", b"console.log(1)")),
    ];
    static FIXTURE: Dir = Dir::new("", &ENTRIES);
    static EMPTY: Dir = Dir::new("", &[]);

    #[test]
    fn existing_files_get_their_mime_type() {
        let (mime, body) = resolve(&FIXTURE, "/app.js").unwrap();
        assert!(mime.contains("javascript"));
        assert_eq!(body, b"console.log(1)");
    }

    #[test]
    fn unknown_paths_fall_back_to_index() {
        let (mime, body) = resolve(&FIXTURE, "/templates/abc").unwrap();
        assert_eq!(mime, "text/html; charset=utf-8");
        assert_eq!(body, b"<html>dooform</html>");
        let (_, root) = resolve(&FIXTURE, "/").unwrap();
        assert_eq!(root, b"<html>dooform</html>");
    }

    #[test]
    fn empty_bundle_resolves_nothing() {
        assert!(resolve(&EMPTY, "/").is_none());
    }
}
