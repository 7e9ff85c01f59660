use crate::models::{Preference, PreferredGender};

/// Bind value for the rendered candidate query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
}

/// Candidate query derived from a viewer's stored preferences
///
/// Normalization happens at construction: gender `both`/unset drops the
/// gender predicate, age bounds of 0 drop the corresponding bound. The
/// viewer and soft-deleted users are always excluded.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    viewer_id: i64,
    gender: Option<PreferredGender>,
    min_age: Option<i32>,
    max_age: Option<i32>,
}

impl CandidateFilter {
    pub fn from_preferences(viewer_id: i64, preferences: &Preference) -> Self {
        let gender = match preferences.preferred_gender {
            PreferredGender::Male => Some(PreferredGender::Male),
            PreferredGender::Female => Some(PreferredGender::Female),
            PreferredGender::Both | PreferredGender::Unset => None,
        };

        Self {
            viewer_id,
            gender,
            min_age: (preferences.min_age > 0).then_some(preferences.min_age),
            max_age: (preferences.max_age > 0).then_some(preferences.max_age),
        }
    }

    pub fn viewer_id(&self) -> i64 {
        self.viewer_id
    }

    /// Render the parameterized SQL text and its bind list
    ///
    /// Candidates come back ordered by user id ascending so repeated calls
    /// see the same order.
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from(
            "SELECT u.id AS user_id, u.verified, p.name, p.age, p.bio, p.photo_url \
             FROM users u \
             JOIN profiles p ON u.id = p.user_id \
             WHERE u.is_deleted = FALSE AND u.id <> $1",
        );
        let mut params = vec![SqlValue::Int(self.viewer_id)];

        if let Some(gender) = self.gender {
            params.push(SqlValue::Text(gender.as_str().to_string()));
            sql.push_str(&format!(" AND p.gender = ${}", params.len()));
        }

        if let Some(min_age) = self.min_age {
            params.push(SqlValue::Int(min_age as i64));
            sql.push_str(&format!(" AND p.age >= ${}", params.len()));
        }

        if let Some(max_age) = self.max_age {
            params.push(SqlValue::Int(max_age as i64));
            sql.push_str(&format!(" AND p.age <= ${}", params.len()));
        }

        sql.push_str(" ORDER BY u.id ASC");

        (sql, params)
    }

    /// In-memory mirror of the SQL predicate
    ///
    /// Age bounds are inclusive at both ends, matching the `>=`/`<=` in
    /// `to_sql`.
    pub fn matches(&self, user_id: i64, gender: &str, age: i32, is_deleted: bool) -> bool {
        if is_deleted || user_id == self.viewer_id {
            return false;
        }

        if let Some(preferred) = self.gender {
            if gender != preferred.as_str() {
                return false;
            }
        }

        if let Some(min_age) = self.min_age {
            if age < min_age {
                return false;
            }
        }

        if let Some(max_age) = self.max_age {
            if age > max_age {
                return false;
            }
        }

        true
    }
}
