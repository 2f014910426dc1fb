use serde::Deserialize;

use crate::user::models::User;

/// Filter value meaning "no constraint". The directory UI sends it for the
/// category dropdowns; it is never a stored data value.
pub const FILTER_ALL: &str = "All";

/// Raw listing parameters as they arrive from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub medium: Option<String>,
    pub experience: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// Normalized query predicate over the user collection.
///
/// An unordered set of optional clauses combined with AND semantics; absent
/// clauses impose no constraint. `search` expands to a case-insensitive
/// substring disjunction over name, username, and bio. `matches` is the
/// reference evaluation; store adapters must evaluate the same semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub medium: Option<String>,
    pub experience: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

impl UserQuery {
    /// Build a predicate from raw filter parameters.
    ///
    /// Total: any input combination yields a valid predicate. The `"All"`
    /// sentinel and empty strings normalize to "no constraint"; a
    /// non-positive limit means unbounded.
    pub fn build(filter: UserFilter) -> Self {
        Self {
            medium: normalize_category(filter.medium),
            experience: normalize_category(filter.experience),
            search: filter.search.filter(|s| !s.is_empty()),
            limit: filter.limit.filter(|limit| *limit > 0),
        }
    }

    /// Evaluate the predicate against a single user record.
    ///
    /// `limit` is a result bound, not a per-record clause, so it plays no
    /// part here.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(medium) = &self.medium {
            if user.medium != *medium {
                return false;
            }
        }

        if let Some(experience) = &self.experience {
            if user.experience != *experience {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = user.name.to_lowercase().contains(&needle)
                || user.username.as_str().to_lowercase().contains(&needle)
                || user.bio.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        true
    }

    /// True when every record matches and no bound applies.
    pub fn is_unconstrained(&self) -> bool {
        self.medium.is_none()
            && self.experience.is_none()
            && self.search.is_none()
            && self.limit.is_none()
    }
}

fn normalize_category(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != FILTER_ALL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::models::EmailAddress;
    use crate::user::models::NewUser;
    use crate::user::models::UserId;
    use crate::user::models::Username;

    fn user(name: &str, username: &str, bio: &str, medium: &str, experience: &str) -> User {
        let mut user = NewUser::with_default_profile(
            name.to_string(),
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(format!("{username}@flowart.demo")).unwrap(),
            "$argon2id$test_hash".to_string(),
        )
        .into_user(UserId::new());
        user.bio = bio.to_string();
        user.medium = medium.to_string();
        user.experience = experience.to_string();
        user
    }

    #[test]
    fn test_build_all_absent_is_unconstrained() {
        let query = UserQuery::build(UserFilter::default());
        assert!(query.is_unconstrained());
    }

    #[test]
    fn test_build_all_sentinel_imposes_no_constraint() {
        let query = UserQuery::build(UserFilter {
            medium: Some("All".to_string()),
            experience: Some("All".to_string()),
            ..UserFilter::default()
        });
        assert!(query.is_unconstrained());

        let anyone = user("Elena Rodriguez", "elena_creates", "", "Digital", "Professional");
        assert!(query.matches(&anyone));
    }

    #[test]
    fn test_build_drops_empty_strings_and_zero_limit() {
        let query = UserQuery::build(UserFilter {
            medium: Some(String::new()),
            experience: Some(String::new()),
            search: Some(String::new()),
            limit: Some(0),
        });
        assert!(query.is_unconstrained());
    }

    #[test]
    fn test_build_keeps_real_filters() {
        let query = UserQuery::build(UserFilter {
            medium: Some("Sculpture".to_string()),
            experience: Some("Professional".to_string()),
            search: Some("berlin".to_string()),
            limit: Some(10),
        });

        assert_eq!(query.medium.as_deref(), Some("Sculpture"));
        assert_eq!(query.experience.as_deref(), Some("Professional"));
        assert_eq!(query.search.as_deref(), Some("berlin"));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_matches_category_exactly() {
        let query = UserQuery::build(UserFilter {
            medium: Some("Digital".to_string()),
            ..UserFilter::default()
        });

        assert!(query.matches(&user("Elena", "elena_creates", "", "Digital", "Emerging")));
        assert!(!query.matches(&user("Marcus", "marcus_sculptor", "", "Sculpture", "Emerging")));
    }

    #[test]
    fn test_matches_search_case_insensitive() {
        let query = UserQuery::build(UserFilter {
            search: Some("ELENA".to_string()),
            ..UserFilter::default()
        });

        assert!(query.matches(&user(
            "elena rodriguez",
            "digital_painter",
            "",
            "Digital",
            "Emerging"
        )));
    }

    #[test]
    fn test_matches_search_spans_name_username_and_bio() {
        let query = UserQuery::build(UserFilter {
            search: Some("sculpt".to_string()),
            ..UserFilter::default()
        });

        assert!(query.matches(&user("Marcus", "marcus_sculptor", "", "Sculpture", "Emerging")));
        assert!(query.matches(&user(
            "Aisha",
            "aisha_canvas",
            "Sculpting with light",
            "Canvas",
            "Emerging"
        )));
        assert!(!query.matches(&user("Sophie", "sophie_digital", "", "Digital", "Emerging")));
    }

    #[test]
    fn test_matches_ands_search_with_filters() {
        let query = UserQuery::build(UserFilter {
            medium: Some("Digital".to_string()),
            search: Some("elena".to_string()),
            ..UserFilter::default()
        });

        assert!(query.matches(&user("Elena", "elena_creates", "", "Digital", "Emerging")));
        // Search hits but the category clause fails
        assert!(!query.matches(&user("Elena", "elena_creates", "", "Sculpture", "Emerging")));
    }
}
