//! Chat entity definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Chat {
    pub id: i64,
    pub name: String,
    pub admin_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Everything needed to write a chat and its roster in one go.
///
/// `member_ids` holds the non-admin members; the admin row is always
/// written first from `admin_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChat {
    pub name: String,
    pub admin_id: i64,
    pub member_ids: Vec<i64>,
}

impl NewChat {
    /// Admin first, then members in the order given, skipping repeats.
    ///
    /// ```
    /// use huddle_database::{MemberRole, NewChat};
    ///
    /// let chat = NewChat { name: "Team".into(), admin_id: 1, member_ids: vec![2, 1, 2, 3] };
    /// let roster: Vec<_> = chat.roster().collect();
    /// assert_eq!(
    ///     roster,
    ///     vec![(1, MemberRole::Admin), (2, MemberRole::Member), (3, MemberRole::Member)]
    /// );
    /// ```
    pub fn roster(&self) -> impl Iterator<Item = (i64, super::MemberRole)> + '_ {
        let mut seen = std::collections::HashSet::from([self.admin_id]);
        std::iter::once((self.admin_id, super::MemberRole::Admin)).chain(
            self.member_ids
                .iter()
                .copied()
                .filter(move |id| seen.insert(*id))
                .map(|id| (id, super::MemberRole::Member)),
        )
    }
}
