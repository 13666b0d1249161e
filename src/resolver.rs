//! Default academic-year selection.
//!
//! Picks the record that best fits the current date: the cycle that started
//! this calendar year and has already begun, else the cycle that started
//! last calendar year and has not yet rolled over. Only one calendar year of
//! look-back is considered.

use crate::{AcademicYearRecord, Month, Today, prelude::*};

/// Which candidate pool produced a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Resolution {
    /// Start year is the current year and the start month has been reached.
    #[display(fmt = "current-cycle")]
    CurrentCycle,
    /// Start year is last year and this year's start month is still ahead.
    #[display(fmt = "previous-cycle")]
    PreviousCycle,
}

/// Resolves the default record and reports which pool it came from.
///
/// Records without a usable label or start month are skipped. Ties on start
/// month keep the first record seen.
pub fn resolve_with_reason(
    records: &[AcademicYearRecord],
    today: Today,
) -> Option<(&AcademicYearRecord, Resolution)> {
    let previous_year = today.previous_year();

    let mut current: Option<(&AcademicYearRecord, Month)> = None;
    let mut previous: Option<(&AcademicYearRecord, Month)> = None;

    for record in records {
        let Some((start_year, start_month)) = record.candidate() else {
            continue;
        };

        if start_year == today.year && today.month >= start_month {
            if current.is_none_or(|(_, best)| start_month > best) {
                current = Some((record, start_month));
            }
        } else if Some(start_year) == previous_year
            && today.month < start_month
            && previous.is_none_or(|(_, best)| start_month < best)
        {
            previous = Some((record, start_month));
        }
    }

    current
        .map(|(record, _)| (record, Resolution::CurrentCycle))
        .or_else(|| previous.map(|(record, _)| (record, Resolution::PreviousCycle)))
}

/// Resolves the default record, `None` meaning "leave the selection alone".
pub fn resolve_default(
    records: &[AcademicYearRecord],
    today: Today,
) -> Option<&AcademicYearRecord> {
    resolve_with_reason(records, today).map(|(record, _)| record)
}

/// Resolves the identifier of the default record.
pub fn resolve_default_id(records: &[AcademicYearRecord], today: Today) -> Option<&str> {
    resolve_default(records, today).map(|record| record.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{record, today};

    #[test]
    fn test_empty_records_never_decide() {
        for month in 1..=12 {
            assert_eq!(resolve_default_id(&[], today(2025, month)), None);
        }
    }

    #[test]
    fn test_unparsable_records_never_decide() {
        let records = [
            record("a", "2025", 1),
            record("b", "twenty-twentysix", 1),
            AcademicYearRecord::new("c", "2025-2026", None),
        ];
        assert_eq!(resolve_default_id(&records, today(2025, 6)), None);
    }

    #[test]
    fn test_current_cycle_beats_previous_cycle() {
        let records = [record("prev", "2024-2025", 9), record("cur", "2025-2026", 1)];

        let (chosen, reason) = resolve_with_reason(&records, today(2025, 3)).unwrap();
        assert_eq!(chosen.id, "cur");
        assert_eq!(reason, Resolution::CurrentCycle);
    }

    #[test]
    fn test_current_cycle_prefers_latest_start() {
        let records = [
            record("april", "2025-2026", 4),
            record("june", "2025-2026", 6),
        ];
        assert_eq!(resolve_default_id(&records, today(2025, 7)), Some("june"));

        let reversed = [
            record("june", "2025-2026", 6),
            record("april", "2025-2026", 4),
        ];
        assert_eq!(resolve_default_id(&reversed, today(2025, 7)), Some("june"));
    }

    #[test]
    fn test_current_cycle_ignores_future_start() {
        let records = [
            record("april", "2025-2026", 4),
            record("august", "2025-2026", 8),
        ];
        assert_eq!(resolve_default_id(&records, today(2025, 7)), Some("april"));
    }

    #[test]
    fn test_current_cycle_start_month_is_inclusive() {
        let records = [record("june", "2025-2026", 6)];
        assert_eq!(resolve_default_id(&records, today(2025, 6)), Some("june"));
    }

    #[test]
    fn test_previous_cycle_prefers_earliest_start() {
        let records = [
            record("nov", "2024-2025", 11),
            record("sep", "2024-2025", 9),
        ];

        let (chosen, reason) = resolve_with_reason(&records, today(2025, 3)).unwrap();
        assert_eq!(chosen.id, "sep");
        assert_eq!(reason, Resolution::PreviousCycle);
    }

    #[test]
    fn test_previous_cycle_requires_start_month_ahead() {
        let records = [record("prev", "2024-2025", 4)];
        assert_eq!(resolve_default_id(&records, today(2025, 4)), None);
        assert_eq!(resolve_default_id(&records, today(2025, 3)), Some("prev"));
    }

    #[test]
    fn test_two_years_back_is_never_selected() {
        for start_month in 1..=12 {
            for current_month in 1..=12 {
                let records = [record("old", "2023-2024", start_month)];
                assert_eq!(
                    resolve_default_id(&records, today(2025, current_month)),
                    None,
                    "start {start_month}, now {current_month}"
                );
            }
        }
    }

    #[test]
    fn test_future_years_are_never_selected() {
        let records = [record("next", "2026-2027", 1)];
        assert_eq!(resolve_default_id(&records, today(2025, 12)), None);
    }

    #[test]
    fn test_identical_candidates_keep_first() {
        let records = [
            record("first", "2025-2026", 4),
            record("second", "2025-2026", 4),
        ];
        assert_eq!(resolve_default_id(&records, today(2025, 5)), Some("first"));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let records = [
            record("a", "2025-2026", 6),
            record("b", "2024-2025", 6),
            record("c", "2024-2025", 8),
        ];
        let now = today(2025, 5);
        assert_eq!(
            resolve_default_id(&records, now),
            resolve_default_id(&records, now)
        );
    }

    #[test]
    fn test_may_before_june_start_falls_back_to_last_year() {
        let records = [record("a", "2025-2026", 6), record("b", "2024-2025", 6)];
        assert_eq!(resolve_default_id(&records, today(2025, 5)), Some("b"));
    }

    #[test]
    fn test_year_one_has_no_previous_cycle() {
        let records = [record("a", "1-2", 6)];
        assert_eq!(resolve_default_id(&records, today(1, 5)), None);
        assert_eq!(resolve_default_id(&records, today(1, 6)), Some("a"));
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::CurrentCycle.to_string(), "current-cycle");
        assert_eq!(Resolution::PreviousCycle.to_string(), "previous-cycle");
    }
}
