pub mod mailer;
pub mod rate_limit;
pub mod security;
pub mod supabase;
