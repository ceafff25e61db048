use axum::http::{header::HOST, HeaderMap};
use axum::response::Html;

/// Serve the HTML upload form.
pub async fn home(headers: HeaderMap) -> Html<String> {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");

    Html(format!(
        r#"
        <!doctype html>
        <html>
            <head>
                <title>Upload a photo</title>
            </head>
            <body>
                <h1>Upload a photo to {}</h1>
                <form action="/upload" method="post" enctype="multipart/form-data">
                    <div>
                        <label>
                            Photo (JPEG, PNG or GIF):
                            <input type="file" name="photo" accept="image/jpeg,image/png,image/gif">
                        </label>
                    </div>
                    <div>
                        <label>
                            Name (optional):
                            <input type="text" name="filename">
                        </label>
                    </div>
                    <div>
                        <input type="submit" value="Upload photo">
                    </div>
                </form>
            </body>
        </html>
        "#,
        escape_html(host)
    ))
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
