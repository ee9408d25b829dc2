//! Minimal HTML rendering for the listing page.

use crate::store::StoredFile;

/// Render the index page: every stored file, with result document contents
/// inlined and a playback/download link for audio.
pub fn index_page(files: &[StoredFile]) -> String {
    let mut body = String::new();

    body.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Voice Notes</title>\n</head>\n<body>\n<h1>Voice Notes</h1>\n\
         <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"audio_data\" accept=\".wav\">\n\
         <button type=\"submit\">Upload recording</button>\n</form>\n\
         <form action=\"/upload_text\" method=\"post\">\n\
         <input type=\"text\" name=\"text\" placeholder=\"Text to speak\">\n\
         <button type=\"submit\">Synthesize</button>\n</form>\n<ul>\n",
    );

    for file in files {
        let name = escape(&file.name);
        match &file.contents {
            Some(text) => {
                body.push_str(&format!(
                    "<li><a href=\"/uploads/{name}\">{name}</a><pre>{}</pre></li>\n",
                    escape(text)
                ));
            }
            None => {
                body.push_str(&format!(
                    "<li><a href=\"/uploads/{name}\">{name}</a> \
                     <audio controls src=\"/uploads/{name}\"></audio></li>\n"
                ));
            }
        }
    }

    body.push_str("</ul>\n</body>\n</html>\n");
    body
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_contents() {
        let files = vec![StoredFile {
            name: "20240101-120000-ab12.wav.txt".to_string(),
            contents: Some("<script>alert(1)</script>".to_string()),
        }];
        let page = index_page(&files);
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>alert"));
    }

    #[test]
    fn audio_entries_get_player_markup() {
        let files = vec![StoredFile {
            name: "20240101-120000-ab12.wav".to_string(),
            contents: None,
        }];
        let page = index_page(&files);
        assert!(page.contains("<audio controls src=\"/uploads/20240101-120000-ab12.wav\">"));
    }
}
