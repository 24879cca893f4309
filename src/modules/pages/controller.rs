use axum::response::Html;

// Placeholder copy; the real legal text is maintained outside this repo.

pub async fn privacy() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Privacy Policy — Shifted</title></head>
<body>
<main>
  <h1>Privacy Policy</h1>
  <p>Questions? <a href="mailto:support@shifteddating.com">support@shifteddating.com</a></p>
</main>
</body>
</html>"#,
    )
}

pub async fn terms() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Terms of Service — Shifted</title></head>
<body>
<main>
  <h1>Terms of Service</h1>
  <p>Questions? <a href="mailto:support@shifteddating.com">support@shifteddating.com</a></p>
</main>
</body>
</html>"#,
    )
}
