//! Minimal browser-facing pages for the auth bridge. Content only; the
//! site's real styling is out of scope here.

/// Promotes a fragment-carried auth payload into the query string with a
/// single reload, so the server-side relay logic stays the one authority.
/// Appending the fragment after the query preserves fragment precedence.
const FRAGMENT_PROMOTE_SCRIPT: &str = r#"<script>
(function () {
  var h = window.location.hash.replace(/^#/, "");
  if (!h) return;
  if (h.indexOf("access_token=") === -1 && h.indexOf("code=") === -1 && h.indexOf("error") === -1) return;
  var q = window.location.search.replace(/^\?/, "");
  window.location.replace(window.location.pathname + "?" + (q ? q + "&" + h : h));
})();
</script>"#;

pub fn manual_page(universal_url: &str, fallback_url: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Shifted</title></head>
<body>
{script}
<main>
  <h1>Shifted</h1>
  <p>This page is normally opened from your confirmation email link.</p>
  <p><a href="{universal}">Open Shifted</a></p>
  <p>If the app did not open, <a href="{fallback}">tap here</a>.</p>
</main>
</body>
</html>"#,
        script = FRAGMENT_PROMOTE_SCRIPT,
        universal = escape_html(universal_url),
        fallback = escape_html(fallback_url),
    )
}

pub fn error_page(description: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Shifted</title></head>
<body>
<main>
  <h1>Shifted</h1>
  <p>{description}</p>
  <p>Please request a new sign-in link from the app and try again.</p>
</main>
</body>
</html>"#,
        description = escape_html(description),
    )
}

/// Drives the password-reset form: the reset email's link lands here with
/// a recovery session in the URL, which the auth provider's browser client
/// picks up itself. No tokens ever reach this server.
const RESET_PASSWORD_SCRIPT: &str = r#"<script>
(async function () {
  var cfg = window.RESET_CONFIG;
  var status = document.getElementById("status");
  var form = document.getElementById("reset-form");
  var client = supabase.createClient(cfg.url, cfg.anonKey, {
    auth: { persistSession: false, autoRefreshToken: false, detectSessionInUrl: true }
  });
  var session = (await client.auth.getSession()).data.session;
  if (!session) {
    status.textContent = "Reset link is missing a valid session. Please request a new reset email and open it in your browser.";
    return;
  }
  status.textContent = "Choose a new password";
  form.hidden = false;
  form.addEventListener("submit", async function (event) {
    event.preventDefault();
    var password = document.getElementById("password").value.trim();
    var confirm = document.getElementById("confirm").value.trim();
    if (password.length < 8) { status.textContent = "Use at least 8 characters."; return; }
    if (password !== confirm) { status.textContent = "Passwords do not match."; return; }
    status.textContent = "Saving your new password";
    var result = await client.auth.updateUser({ password: password });
    if (result.error) { status.textContent = result.error.message; return; }
    status.textContent = "Password updated";
    setTimeout(function () { window.location.href = cfg.openUrl; }, 600);
  });
})();
</script>"#;

pub fn reset_password_page(supabase_url: &str, anon_key: &str, open_url: &str) -> String {
    let boot = serde_json::json!({
        "url": supabase_url,
        "anonKey": anon_key,
        "openUrl": open_url,
    });

    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Reset password — Shifted</title></head>
<body>
<main>
  <h1>Shifted</h1>
  <p id="status">Preparing secure reset</p>
  <form id="reset-form" hidden>
    <input id="password" type="password" autocomplete="new-password" placeholder="New password">
    <input id="confirm" type="password" autocomplete="new-password" placeholder="Confirm password">
    <button type="submit">Save new password</button>
  </form>
</main>
<script src="https://cdn.jsdelivr.net/npm/@supabase/supabase-js@2"></script>
<script>window.RESET_CONFIG = {boot};</script>
{script}
</body>
</html>"#,
        boot = boot,
        script = RESET_PASSWORD_SCRIPT,
    )
}

pub fn reset_password_unconfigured() -> String {
    r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Reset password — Shifted</title></head>
<body>
<main>
  <h1>Shifted</h1>
  <p>Password reset is not available right now. Please try again later or contact
  <a href="mailto:support@shifteddating.com">support@shifteddating.com</a>.</p>
</main>
</body>
</html>"#
        .to_string()
}

pub fn open_fallback_page(deep_link: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Shifted</title></head>
<body>
<main>
  <h1>Shifted</h1>
  <p>Tap below if Shifted did not open automatically.</p>
  <p><a href="{link}">Open Shifted</a></p>
</main>
</body>
</html>"#,
        link = escape_html(deep_link),
    )
}

/// Provider error descriptions and link parameters come from the URL, so
/// everything interpolated into markup gets escaped.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
