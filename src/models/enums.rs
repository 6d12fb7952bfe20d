use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(StudentStatus {
    Active => "active",
    Interrupted => "interrupted",
    Graduated => "graduated",
});

str_enum!(DocumentFormat {
    Pdf => "pdf",
    Latex => "latex",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn student_status_roundtrip() {
        for s in ["active", "interrupted", "graduated"] {
            assert_eq!(StudentStatus::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn document_format_roundtrip() {
        for s in ["pdf", "latex"] {
            assert_eq!(DocumentFormat::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn unknown_value_is_invalid_enum() {
        let err = StudentStatus::from_str("expelled").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }
}
