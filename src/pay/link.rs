//! Payment link recognition.

use url::Url;

/// Host serving payment links.
pub const PAY_HOST: &str = "pay.walletconnect.com";

/// Whether `url` looks like a payment link.
///
/// Recognised forms are URLs on [`PAY_HOST`] (with or without scheme), `wc:pay-` deep links and
/// bare `pay_<id>` payment ids.
pub fn is_payment_link(url: &str) -> bool {
    url.contains(PAY_HOST) || url.starts_with("wc:pay-") || is_payment_id(url)
}

/// Normalises a payment link into a full HTTPS URL.
///
/// Returns `None` for inputs that cannot be turned into an HTTPS link on [`PAY_HOST`].
pub fn extract_payment_link(url: &str) -> Option<Url> {
    let bare = format!("{PAY_HOST}/");

    if url.starts_with(&format!("https://{bare}")) {
        return Url::parse(url).ok();
    }
    if url.starts_with(&bare) {
        return Url::parse(&format!("https://{url}")).ok();
    }
    if is_payment_id(url) {
        return Url::parse(&format!("https://{bare}{url}")).ok();
    }
    if url.contains(PAY_HOST) && url.contains("pid=") {
        return Url::parse(url).ok();
    }

    None
}

/// Whether `s` matches `pay_[a-zA-Z0-9]+`.
fn is_payment_id(s: &str) -> bool {
    s.strip_prefix("pay_")
        .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_links() {
        for link in [
            "https://pay.walletconnect.com/pay_abc123",
            "pay.walletconnect.com/pay_abc123",
            "https://pay.walletconnect.com/?pid=pay_abc123",
            "wc:pay-abc123",
            "pay_abc123",
        ] {
            assert!(is_payment_link(link), "{link}");
        }

        for link in ["", "pay_", "pay_abc-123", "https://example.com/pay_abc", "wc:abc@2"] {
            assert!(!is_payment_link(link), "{link}");
        }
    }

    #[test]
    fn normalises_links() {
        let expected = "https://pay.walletconnect.com/pay_abc123";
        assert_eq!(extract_payment_link(expected).unwrap().as_str(), expected);
        assert_eq!(
            extract_payment_link("pay.walletconnect.com/pay_abc123").unwrap().as_str(),
            expected
        );
        assert_eq!(extract_payment_link("pay_abc123").unwrap().as_str(), expected);

        let pid = "https://pay.walletconnect.com?pid=pay_abc123";
        assert_eq!(
            extract_payment_link(pid).unwrap().query_pairs().next().unwrap().1,
            "pay_abc123"
        );

        assert_eq!(extract_payment_link("wc:pay-abc123"), None);
        assert_eq!(extract_payment_link("https://example.com/?pid=pay_abc"), None);
    }
}
