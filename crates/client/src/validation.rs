//! Shape and range checks mirrored from the server contract.
//!
//! They only catch what the server would reject anyway; passing them does
//! not mean the server will accept the request.

use api_types::{
    auth::{LoginRequest, RegisterRequest},
    category::CategoryCreate,
    transaction::TransactionUpsert,
};

use crate::error::ValidationError;

const PASSWORD_MIN_CHARS: usize = 8;
const PASSWORD_MAX: usize = 72;
const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 120;
const CATEGORY_NAME_MAX_CHARS: usize = 80;
const COLOR_MIN_CHARS: usize = 4;
const COLOR_MAX_CHARS: usize = 20;
const AMOUNT_MAX_DIGITS: usize = 12;
const NOTE_MAX_CHARS: usize = 1000;

pub fn login(request: &LoginRequest) -> Result<(), ValidationError> {
    email(&request.email)?;
    password(&request.password)
}

pub fn register(request: &RegisterRequest) -> Result<(), ValidationError> {
    let name = request.name.trim().chars().count();
    if name < NAME_MIN_CHARS {
        return Err(ValidationError::new(
            "name",
            "Name must be at least 2 characters.",
        ));
    }
    if name > NAME_MAX_CHARS {
        return Err(ValidationError::new("name", "Name is too long."));
    }
    email(&request.email)?;
    password(&request.password)
}

pub fn category(request: &CategoryCreate) -> Result<(), ValidationError> {
    let name = request.name.trim().chars().count();
    if name == 0 {
        return Err(ValidationError::new("name", "Name is required."));
    }
    if name > CATEGORY_NAME_MAX_CHARS {
        return Err(ValidationError::new(
            "name",
            "Name must be 80 characters or fewer.",
        ));
    }
    let color = request.color.trim().chars().count();
    if !(COLOR_MIN_CHARS..=COLOR_MAX_CHARS).contains(&color) {
        return Err(ValidationError::new(
            "color",
            "Color must be between 4 and 20 characters.",
        ));
    }
    Ok(())
}

pub fn transaction(request: &TransactionUpsert) -> Result<(), ValidationError> {
    if !request.amount.is_positive() {
        return Err(ValidationError::new(
            "amount",
            "Amount must be greater than 0.",
        ));
    }
    if request.amount.digits() > AMOUNT_MAX_DIGITS {
        return Err(ValidationError::new("amount", "Amount is too large."));
    }
    if request.category_id < 1 {
        return Err(ValidationError::new("category_id", "Select a category."));
    }
    if let Some(note) = &request.note
        && note.chars().count() > NOTE_MAX_CHARS
    {
        return Err(ValidationError::new(
            "note",
            "Note must be 1000 characters or fewer.",
        ));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("email", "Enter a valid email address.");
    let (local, domain) = value.trim().split_once('@').ok_or_else(invalid)?;
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !value.chars().any(char::is_whitespace);
    if well_formed { Ok(()) } else { Err(invalid()) }
}

/// Password length rules shared by sign-in and registration.
pub fn password(value: &str) -> Result<(), ValidationError> {
    let chars = value.chars().count();
    if chars < PASSWORD_MIN_CHARS {
        return Err(ValidationError::new(
            "password",
            "Password must be at least 8 characters.",
        ));
    }
    if chars > PASSWORD_MAX {
        return Err(ValidationError::new(
            "password",
            "Password must be 72 characters or fewer.",
        ));
    }
    if value.len() > PASSWORD_MAX {
        return Err(ValidationError::new(
            "password",
            "Password must be 72 bytes or fewer.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use api_types::{Amount, TransactionType};
    use chrono::NaiveDate;

    use super::*;

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn upsert(cents: i64) -> TransactionUpsert {
        TransactionUpsert {
            category_id: 1,
            amount: Amount::new(cents),
            kind: TransactionType::Expense,
            note: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn accepts_regular_login() {
        assert!(login(&login_request("demo@x.com", "password1")).is_ok());
    }

    #[test]
    fn rejects_bad_emails() {
        for email in ["", "demo", "demo@", "@x.com", "demo@x", "de mo@x.com", "a@b@c.com"] {
            let err = login(&login_request(email, "password1")).unwrap_err();
            assert_eq!(err.field, "email", "accepted {email:?}");
        }
    }

    #[test]
    fn password_limits_count_chars_and_bytes() {
        assert_eq!(
            login(&login_request("a@b.co", "short")).unwrap_err().field,
            "password"
        );
        assert!(login(&login_request("a@b.co", &"x".repeat(72))).is_ok());
        assert!(login(&login_request("a@b.co", &"x".repeat(73))).is_err());

        // 40 chars but 80 bytes.
        let err = login(&login_request("a@b.co", &"é".repeat(40))).unwrap_err();
        assert_eq!(err.message, "Password must be 72 bytes or fewer.");
    }

    #[test]
    fn register_checks_trimmed_name() {
        let request = RegisterRequest {
            name: "  a ".to_string(),
            email: "a@b.co".to_string(),
            password: "password1".to_string(),
        };
        assert_eq!(register(&request).unwrap_err().field, "name");
    }

    #[test]
    fn category_checks_name_and_color() {
        let mut request = CategoryCreate {
            name: "Food".to_string(),
            kind: TransactionType::Expense,
            color: "#22c55e".to_string(),
        };
        assert!(category(&request).is_ok());

        request.color = "#fff".to_string();
        assert!(category(&request).is_ok());
        request.color = "red".to_string();
        assert_eq!(category(&request).unwrap_err().field, "color");

        request.color = "#22c55e".to_string();
        request.name = "   ".to_string();
        assert_eq!(category(&request).unwrap_err().field, "name");
    }

    #[test]
    fn transaction_amount_must_be_positive_and_bounded() {
        assert!(transaction(&upsert(1)).is_ok());
        assert_eq!(transaction(&upsert(0)).unwrap_err().field, "amount");
        assert_eq!(transaction(&upsert(-100)).unwrap_err().field, "amount");
        assert!(transaction(&upsert(9_999_999_999_99)).is_ok());
        assert!(transaction(&upsert(10_000_000_000_00)).is_err());
    }

    #[test]
    fn transaction_note_is_bounded() {
        let mut request = upsert(100);
        request.note = Some("n".repeat(1000));
        assert!(transaction(&request).is_ok());
        request.note = Some("n".repeat(1001));
        assert_eq!(transaction(&request).unwrap_err().field, "note");
    }
}
