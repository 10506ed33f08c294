use crate::domain::model::OrderDetails;
use crate::utils::error::{ProofError, Result};

pub const KEY_EXTENSION: &str = ".svg";

/// Leaves room under the common 255-byte file name limit for the `.json` sidecar.
pub const MAX_KEY_LEN: usize = 200;

/// Trims, collapses whitespace runs to `_` and drops anything outside `[A-Za-z0-9_-]`.
pub fn sanitize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// `{order}_{name}[_{company}].svg`, company omitted when blank.
pub fn derive_key(order_number: &str, customer_name: &str, company: &str) -> Result<String> {
    let order = sanitize(order_number);
    if order.is_empty() {
        return Err(ProofError::MissingField {
            field: "order number".to_string(),
        });
    }

    let name = sanitize(customer_name);
    if name.is_empty() {
        return Err(ProofError::MissingField {
            field: "customer name".to_string(),
        });
    }

    let mut parts = vec![order, name];
    let company = sanitize(company);
    if !company.is_empty() {
        parts.push(company);
    }

    let key = format!("{}{}", parts.join("_"), KEY_EXTENSION);
    check_key(&key)?;
    Ok(key)
}

pub fn key_for(order: &OrderDetails) -> Result<String> {
    derive_key(&order.order_number, &order.customer_name, &order.company)
}

/// Rejects keys a backend must never address: empty, hidden, too long, or containing separators.
pub fn check_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "missing object key"
    } else if key.len() > MAX_KEY_LEN {
        "object key is too long"
    } else if key.starts_with('.') {
        "object key must not start with '.'"
    } else if key.contains(['/', '\\', '\0']) {
        "object key must not contain path separators"
    } else {
        return Ok(());
    };

    Err(ProofError::BadRequest {
        message: reason.to_string(),
    })
}
