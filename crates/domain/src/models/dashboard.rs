//! Read-only rollups for the admin and employee dashboards.

use serde::Serialize;
use std::collections::BTreeMap;

use super::employee::EmployeeStatus;

/// Number of employees shown in the "recent" card.
pub const RECENT_EMPLOYEES_LIMIT: i64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_employees: i64,
    pub pending_leaves: i64,
    pub active_staff: i64,
    pub total_notifications: i64,
    pub unread_notifications: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeBreakdown {
    pub by_status: BTreeMap<String, i64>,
    pub by_department: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeDashboardStats {
    pub pending_leaves: i64,
    pub approved_leaves: i64,
    pub position: Option<String>,
    pub department: Option<String>,
    pub status: EmployeeStatus,
    pub employee_code: Option<String>,
    pub total_notifications: i64,
    pub unread_notifications: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaveBreakdown {
    pub by_status: BTreeMap<String, i64>,
    pub by_type: BTreeMap<String, i64>,
}

/// Collects `(key, count)` rows into a map, naming empty keys explicitly.
pub fn count_map<I>(rows: I, empty_label: &str) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = (Option<String>, i64)>,
{
    let mut map = BTreeMap::new();
    for (key, count) in rows {
        let key = key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| empty_label.to_string());
        *map.entry(key).or_insert(0) += count;
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_map_merges_blank_keys() {
        let map = count_map(
            vec![
                (Some("R&D".to_string()), 3),
                (None, 1),
                (Some("  ".to_string()), 2),
            ],
            "unassigned",
        );
        assert_eq!(map.get("R&D"), Some(&3));
        assert_eq!(map.get("unassigned"), Some(&3));
    }

    #[test]
    fn test_breakdown_serializes_as_objects() {
        let breakdown = LeaveBreakdown {
            by_status: count_map(vec![(Some("pending".into()), 2)], "unknown"),
            by_type: BTreeMap::new(),
        };
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["by_status"]["pending"], 2);
        assert!(json["by_type"].as_object().unwrap().is_empty());
    }
}
