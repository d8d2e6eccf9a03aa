// Output file names for extracted cards

use chrono::{DateTime, Local};

use crate::chara::{Record, Sex};
use crate::common::path_security::sanitize_filename;

/// Local time as `YYYYMMDDhhmmssmmm`
pub fn timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d%H%M%S%3f").to_string()
}

fn sex_infix(sex: Sex, male: &'static str, female: &'static str, other: &'static str) -> &'static str {
    match sex {
        Sex::Male => male,
        Sex::Female => female,
        Sex::Unknown(_) => other,
    }
}

/// File stem for a record, without extension.
///
/// PlayHome characters are named after their display name when they have
/// one; every other card gets a game prefix, a sex tag and the timestamp.
pub fn file_stem(record: &Record, stamp: &str) -> String {
    match record {
        Record::Ais(card) => format!(
            "{}{}{stamp}",
            card.flavor.prefix(),
            sex_infix(card.sex, "ChaM_", "ChaF_", "Cha_")
        ),
        Record::Koikatu(card) => format!(
            "{}{stamp}",
            sex_infix(card.sex, "Koikatu_M_", "Koikatu_F_", "Koikatu_")
        ),
        Record::HoneySelect(card) => format!(
            "{}{stamp}",
            sex_infix(card.sex, "charaM_", "charaF_", "chara_")
        ),
        Record::PlayHome(card) => {
            let name = sanitize_filename(&card.name);
            if name.is_empty() {
                stamp.to_string()
            } else {
                name
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(timestamp(at), "20240309070501042");
    }

    #[test]
    fn test_sex_infix() {
        assert_eq!(sex_infix(Sex::Male, "M", "F", "X"), "M");
        assert_eq!(sex_infix(Sex::Female, "M", "F", "X"), "F");
        assert_eq!(sex_infix(Sex::Unknown(9), "M", "F", "X"), "X");
    }
}
