//! Validation utilities.

use std::collections::HashSet;

use serde_json::Value;

use crate::types::{ChatError, ChatResult};

pub const MAX_CHAT_NAME_CHARS: usize = 255;

pub struct Validator;

impl Validator {
    /// Trimmed chat name, rejecting blank or overlong input.
    pub fn chat_name(name: Option<&str>) -> ChatResult<String> {
        let name = name.map(str::trim).unwrap_or_default();

        if name.is_empty() {
            return Err(ChatError::validation("name required"));
        }

        if name.chars().count() > MAX_CHAT_NAME_CHARS {
            return Err(ChatError::validation("name too long"));
        }

        Ok(name.to_owned())
    }

    /// Parse the string-encoded JSON array of account ids.
    ///
    /// Elements may be JSON integers or strings holding a base-10 integer;
    /// ids must be positive. Order is kept, duplicates are left for
    /// [`Validator::member_set`] to drop.
    ///
    /// ```
    /// use huddle_chats::utils::Validator;
    ///
    /// assert_eq!(Validator::member_ids(Some(r#"[2, "3"]"#)).unwrap(), vec![2, 3]);
    /// assert!(Validator::member_ids(Some("[2.5]")).is_err());
    /// assert!(Validator::member_ids(None).is_err());
    /// ```
    pub fn member_ids(members_list: Option<&str>) -> ChatResult<Vec<i64>> {
        let Some(raw) = members_list else {
            return Err(ChatError::validation("memberIds required"));
        };

        let malformed = || ChatError::validation("memberIds malformed");

        let Value::Array(items) = serde_json::from_str::<Value>(raw).map_err(|_| malformed())?
        else {
            return Err(malformed());
        };

        items
            .iter()
            .map(|item| {
                let id = match item {
                    Value::Number(number) => number.as_i64(),
                    Value::String(text) => text.trim().parse::<i64>().ok(),
                    _ => None,
                };
                id.filter(|id| *id > 0).ok_or_else(malformed)
            })
            .collect()
    }

    /// Members other than the admin, first occurrence wins.
    pub fn member_set(admin_id: i64, member_ids: &[i64]) -> Vec<i64> {
        let mut seen = HashSet::from([admin_id]);
        member_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
