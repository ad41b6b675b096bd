//! Structural input checks. No network or DNS lookups happen here.

use validator::ValidateEmail;

/// Structural email check.
///
/// Runs the HTML5 email rule from `validator` and additionally requires a
/// dotted domain, so `user@localhost` is rejected.
///
/// The `validator` rule is stricter than a bare shape check:
/// - the local part must be ASCII (`ü@b.com` is rejected)
/// - the local part is capped at 64 characters and the domain at 255
pub fn is_email_valid(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }

    match email.rsplit_once('@') {
        Some((_, domain)) => domain.contains('.'),
        None => false,
    }
}
