use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Account record. Never hard-deleted; `is_deleted` is the soft-delete flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub phone_number: String,
    pub is_premium: bool,
    pub verified: bool,
    pub is_deleted: bool,
    pub signup_at: Option<DateTime<Utc>>,
    pub login_at: Option<DateTime<Utc>>,
    pub logout_at: Option<DateTime<Utc>>,
}

/// Public-facing profile, one-to-one with a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub bio: String,
    pub photo_url: String,
}

/// Gender filter stored in a user's preferences
///
/// `Both` and `Unset` behave identically in the candidate query (no gender
/// predicate); they are kept distinct because the client renders them
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredGender {
    Male,
    Female,
    Both,
    #[serde(rename = "")]
    Unset,
}

impl PreferredGender {
    /// Parse the TEXT column value; empty or unknown means no filter
    pub fn from_column(value: &str) -> Self {
        match value {
            "male" => PreferredGender::Male,
            "female" => PreferredGender::Female,
            "both" => PreferredGender::Both,
            _ => PreferredGender::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredGender::Male => "male",
            PreferredGender::Female => "female",
            PreferredGender::Both => "both",
            PreferredGender::Unset => "",
        }
    }
}

/// Dating preferences, one-to-one with a user
///
/// `min_age`/`max_age` of 0 mean unbounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preference {
    pub id: i64,
    pub user_id: i64,
    pub date_mode: bool,
    pub bff_mode: bool,
    pub preferred_gender: PreferredGender,
    pub min_age: i32,
    pub max_age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Preference {
    /// Preferences for a user who has never stored any: filter nothing.
    pub fn unset(user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id,
            date_mode: true,
            bff_mode: false,
            preferred_gender: PreferredGender::Unset,
            min_age: 0,
            max_age: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A like/pass decision by one user on another's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Like,
    Pass,
}

impl SwipeDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(SwipeDirection::Like),
            "pass" => Some(SwipeDirection::Pass),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Like => "like",
            SwipeDirection::Pass => "pass",
        }
    }
}

/// Persisted swipe row. Append-only; at most one per
/// (swiper, profile, calendar day).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
    pub id: i64,
    pub swiper_id: i64,
    pub profile_id: i64,
    pub direction: SwipeDirection,
    pub swiped_at: DateTime<Utc>,
    pub swipe_day: NaiveDate,
}

/// A profile surfaced to a viewer in the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub user_id: i64,
    pub verified: bool,
    pub name: String,
    pub age: i32,
    pub bio: String,
    pub photo_url: String,
}

/// Premium package catalog entry, soft-deleted only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub feature: String,
    pub price: f64,
    pub currency: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Purchase ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i64,
    pub user_id: i64,
    pub package_id: i64,
    pub purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
