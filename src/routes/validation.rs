use crate::constants::{ERR_INVALID_EMAIL, MAX_PAGE_SIZE};
use crate::error::{AppError, Result};

/// Normalize and shape-check an email address
///
/// Trims, lowercases, and requires a non-empty local part and a dotted
/// domain. Deliverability is the mail provider's problem.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_ascii_lowercase();
    let valid = email
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        })
        .unwrap_or(false);

    if !valid {
        return Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string()));
    }

    Ok(email)
}

/// Clamp client-supplied pagination to sane bounds
///
/// Pages are 1-indexed; limits are capped so a single request cannot demand
/// the whole table.
pub fn clamp_pagination(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_accepts_and_lowercases() {
        assert_eq!(
            normalize_email("  Reader@Example.COM ").unwrap(),
            "reader@example.com"
        );
    }

    #[test]
    fn test_normalize_email_rejects_malformed() {
        for bad in ["", "no-at-sign", "@example.com", "a@", "a@nodot", "a@.com", "a@com."] {
            assert!(
                matches!(normalize_email(bad), Err(AppError::InvalidInput(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_clamp_pagination() {
        assert_eq!(clamp_pagination(None, None, 16), (1, 16));
        assert_eq!(clamp_pagination(Some(0), Some(0), 16), (1, 1));
        assert_eq!(clamp_pagination(Some(3), Some(500), 16), (3, MAX_PAGE_SIZE));
        assert_eq!(clamp_pagination(Some(2), Some(8), 16), (2, 8));
    }
}
