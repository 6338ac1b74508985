use roster_types::{DraftRecord, UserRecord};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Duplicate name")]
    DuplicateName,
    #[error("Duplicate email")]
    DuplicateEmail,
    #[error("Duplicate phone")]
    DuplicatePhone,
}

/// Checks a draft against the loaded list.
///
/// Checks run in a fixed order and stop at the first failure: missing
/// fields, then name, email, phone. Comparisons ignore case. When the draft
/// is editing a record, that record is left out of the duplicate checks.
pub fn validate_draft(draft: &DraftRecord, users: &[UserRecord]) -> Result<(), ValidationError> {
    if !draft.fields.is_complete() {
        return Err(ValidationError::MissingFields);
    }

    let others: Vec<&UserRecord> = users
        .iter()
        .filter(|u| !draft.is_editing() || u.id != draft.id)
        .collect();

    let fields = &draft.fields;
    if others.iter().any(|u| {
        eq_ignore_case(&u.data.first_name, &fields.first_name)
            && eq_ignore_case(&u.data.last_name, &fields.last_name)
    }) {
        return Err(ValidationError::DuplicateName);
    }
    if others.iter().any(|u| eq_ignore_case(&u.data.email, &fields.email)) {
        return Err(ValidationError::DuplicateEmail);
    }
    if others.iter().any(|u| eq_ignore_case(&u.data.phone, &fields.phone)) {
        return Err(ValidationError::DuplicatePhone);
    }
    Ok(())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_types::{Field, UserFields};

    fn users() -> Vec<UserRecord> {
        vec![
            UserRecord::new("1", UserFields::new("Ann", "Lee", "a@x.com", "111")),
            UserRecord::new("2", UserFields::new("Bob", "Ray", "b@x.com", "222")),
        ]
    }

    fn draft(first: &str, last: &str, email: &str, phone: &str) -> DraftRecord {
        DraftRecord {
            id: String::new(),
            fields: UserFields::new(first, last, email, phone),
        }
    }

    #[test]
    fn test_any_empty_field_is_missing() {
        for field in Field::ALL {
            let mut d = draft("Cy", "Orr", "c@x.com", "333");
            d.set(field, "");
            assert_eq!(validate_draft(&d, &users()), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn test_missing_fields_wins_over_duplicates() {
        let d = draft("Ann", "Lee", "a@x.com", "");
        assert_eq!(validate_draft(&d, &users()), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_duplicate_name_ignores_case() {
        let d = draft("ann", "LEE", "new@x.com", "999");
        assert_eq!(validate_draft(&d, &users()), Err(ValidationError::DuplicateName));
    }

    #[test]
    fn test_same_first_name_alone_is_not_duplicate() {
        let d = draft("Ann", "Orr", "new@x.com", "999");
        assert_eq!(validate_draft(&d, &users()), Ok(()));
    }

    #[test]
    fn test_check_order() {
        // Name, email and phone all collide; only the name is reported.
        let d = draft("Bob", "Ray", "A@X.COM", "111");
        assert_eq!(validate_draft(&d, &users()), Err(ValidationError::DuplicateName));

        let d = draft("Cy", "Orr", "A@X.COM", "222");
        assert_eq!(validate_draft(&d, &users()), Err(ValidationError::DuplicateEmail));

        let d = draft("Cy", "Orr", "c@x.com", "222");
        assert_eq!(validate_draft(&d, &users()), Err(ValidationError::DuplicatePhone));
    }

    #[test]
    fn test_editing_skips_own_record() {
        let mut d = DraftRecord::from_record(&users()[0]);
        assert_eq!(validate_draft(&d, &users()), Ok(()));

        d.set(Field::Email, "b@x.com");
        assert_eq!(validate_draft(&d, &users()), Err(ValidationError::DuplicateEmail));
    }

    #[test]
    fn test_whitespace_is_not_empty() {
        let d = draft(" ", "Orr", "c@x.com", "333");
        assert_eq!(validate_draft(&d, &users()), Ok(()));
    }
}
