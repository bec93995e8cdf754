//! Fixed choice sets stored as TEXT columns.
//!
//! Every enum serializes to the exact database literal (`"IN_PROGRESS"`,
//! `"student"`, ...), parses from it for query filters, and binds to and
//! decodes from a `TEXT` column.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Returned when a string is not one of the literals of a choice set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {}", self.value, self.kind)
    }
}

impl std::error::Error for ParseChoiceError {}

macro_rules! define_choice {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseChoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(ParseChoiceError {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(s.parse::<$name>()?)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <String as PgHasArrayType>::array_type_info()
            }
        }
    };
}

define_choice!(
    /// Account role. Only `admin` may manage users.
    UserRole {
        Admin => "admin",
        Staff => "staff",
        Faculty => "faculty",
        Student => "student",
    }
);

define_choice!(SemesterName {
    Fall => "FALL",
    Spring => "SPRING",
    Summer => "SUMMER",
});

define_choice!(GrantStatus {
    Open => "OPEN",
    Closed => "CLOSED",
    UnderReview => "UNDER_REVIEW",
    Awarded => "AWARDED",
});

define_choice!(ProjectStatus {
    Planning => "PLANNING",
    InProgress => "IN_PROGRESS",
    Completed => "COMPLETED",
    OnHold => "ON_HOLD",
});

define_choice!(ResourceType {
    Book => "BOOK",
    Ebook => "EBOOK",
    Journal => "JOURNAL",
    Article => "ARTICLE",
    Multimedia => "MULTIMEDIA",
});

define_choice!(
    /// Shared by housing rooms and housing applications.
    RoomType {
        Single => "SINGLE",
        Double => "DOUBLE",
        Suite => "SUITE",
    }
);

define_choice!(ApplicationStatus {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

define_choice!(SessionType {
    InPerson => "IN_PERSON",
    Virtual => "VIRTUAL",
});

define_choice!(ReportStatus {
    Draft => "DRAFT",
    UnderReview => "UNDER_REVIEW",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

define_choice!(AuditStatus {
    Planned => "PLANNED",
    InProgress => "IN_PROGRESS",
    Completed => "COMPLETED",
});

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_to_database_literal() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            r#""IN_PROGRESS""#
        );
        assert_eq!(
            serde_json::to_string(&UserRole::Faculty).unwrap(),
            r#""faculty""#
        );
        assert_eq!(SessionType::InPerson.to_string(), "IN_PERSON");
    }

    #[test]
    fn test_parse_round_trips_every_literal() {
        for status in ReportStatus::ALL {
            assert_eq!(status.as_str().parse::<ReportStatus>().unwrap(), *status);
        }
        for kind in ResourceType::ALL {
            assert_eq!(kind.as_str().parse::<ResourceType>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "in_progress".parse::<AuditStatus>().unwrap_err();
        assert_eq!(err.kind, "AuditStatus");
        assert_eq!(err.to_string(), "'in_progress' is not a valid AuditStatus");
        assert!("Admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_literal() {
        assert!(serde_json::from_str::<RoomType>(r#""PENTHOUSE""#).is_err());
        assert_eq!(
            serde_json::from_str::<RoomType>(r#""SUITE""#).unwrap(),
            RoomType::Suite
        );
    }

    #[test]
    fn test_application_status_defaults_to_pending() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Pending);
    }
}
