//! Tests for the status projection, drift diagnosis and vehicle conflict
//! checks. These exercise the pure decision logic without a database.

use chrono::{NaiveDate, Utc};

use depot_server::models::{
    assignment::AssignmentWithBooking,
    booking::Booking,
    enums::{BookingStatus, ItemStatus},
    issue::IssueKind,
    item::{project_status, ItemSnapshot},
};
use depot_server::services::{allocator::check_vehicle_conflicts, reconciler::diagnose};
use depot_server::AppError;

fn snapshot(
    available: i32,
    total: i32,
    status: ItemStatus,
    has_outstanding_checkout: bool,
    has_pending_checkin: bool,
) -> ItemSnapshot {
    ItemSnapshot {
        id: 1,
        name: "Tent 4p".to_string(),
        quantity_total: total,
        quantity_available: available,
        status: i16::from(status),
        has_outstanding_checkout,
        has_pending_checkin,
    }
}

fn booking(id: i32, status: BookingStatus, date: &str, slot: &str) -> Booking {
    Booking {
        id,
        requester_id: 42,
        date_of_use: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time_slot: slot.to_string(),
        purpose: None,
        status: i16::from(status),
        crea_date: Utc::now(),
        decision_date: None,
    }
}

fn assignment(
    booking_id: i32,
    vehicle_id: i32,
    status: BookingStatus,
    date: &str,
    slot: &str,
) -> AssignmentWithBooking {
    AssignmentWithBooking {
        booking_id,
        vehicle_id,
        booking_status: i16::from(status),
        date_of_use: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time_slot: slot.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Status projection
// ---------------------------------------------------------------------------

#[test]
fn full_pool_projects_available() {
    assert_eq!(project_status(5, 5, false), ItemStatus::Available);
}

#[test]
fn partial_pool_projects_partially_available() {
    assert_eq!(project_status(2, 5, false), ItemStatus::PartiallyAvailable);
    assert_eq!(project_status(4, 5, false), ItemStatus::PartiallyAvailable);
}

#[test]
fn empty_pool_projects_checked_out() {
    assert_eq!(project_status(0, 5, false), ItemStatus::CheckedOut);
    // even with a pending check-in, nothing is in the pool yet
    assert_eq!(project_status(0, 5, true), ItemStatus::CheckedOut);
}

#[test]
fn pending_checkin_overrides_available() {
    assert_eq!(project_status(5, 5, true), ItemStatus::PendingCheckIn);
}

#[test]
fn zero_total_pool_is_available() {
    assert_eq!(project_status(0, 0, false), ItemStatus::Available);
}

// ---------------------------------------------------------------------------
// Drift diagnosis
// ---------------------------------------------------------------------------

#[test]
fn consistent_item_yields_no_issue() {
    assert!(diagnose(&snapshot(5, 5, ItemStatus::Available, false, false)).is_none());
    assert!(diagnose(&snapshot(2, 5, ItemStatus::PartiallyAvailable, true, false)).is_none());
    assert!(diagnose(&snapshot(0, 5, ItemStatus::CheckedOut, true, false)).is_none());
    assert!(diagnose(&snapshot(5, 5, ItemStatus::PendingCheckIn, true, true)).is_none());
}

#[test]
fn stale_partially_available_label_is_corrected_to_available() {
    let issue = diagnose(&snapshot(5, 5, ItemStatus::PartiallyAvailable, false, false))
        .expect("drift should be detected");
    assert_eq!(issue.expected_status, Some(ItemStatus::Available));
    assert!(issue.is_correctable());
}

#[test]
fn checked_out_label_without_open_checkout_is_orphan() {
    let issue = diagnose(&snapshot(5, 5, ItemStatus::CheckedOut, false, false))
        .expect("drift should be detected");
    assert_eq!(issue.expected_status, Some(ItemStatus::Available));
    assert_eq!(issue.kind, IssueKind::OrphanCheckedOut);
}

#[test]
fn pending_checkin_label_without_pending_return_is_orphan() {
    let issue = diagnose(&snapshot(2, 5, ItemStatus::PendingCheckIn, true, false))
        .expect("drift should be detected");
    assert_eq!(issue.expected_status, Some(ItemStatus::PartiallyAvailable));
    assert_eq!(issue.kind, IssueKind::OrphanPendingCheckIn);
}

#[test]
fn counters_above_total_flag_manual_review() {
    let issue = diagnose(&snapshot(7, 5, ItemStatus::Available, false, false))
        .expect("corruption should be flagged");
    assert_eq!(issue.expected_status, None);
    assert!(!issue.is_correctable());
}

#[test]
fn negative_counters_flag_manual_review() {
    let issue = diagnose(&snapshot(-1, 5, ItemStatus::CheckedOut, true, false))
        .expect("corruption should be flagged");
    assert!(!issue.is_correctable());
}

#[test]
fn administrative_states_are_left_alone() {
    assert!(diagnose(&snapshot(5, 5, ItemStatus::UnderRepair, false, false)).is_none());
    assert!(diagnose(&snapshot(0, 5, ItemStatus::Retired, false, false)).is_none());
}

#[test]
fn repairing_an_issue_makes_diagnosis_clean() {
    let drifted = snapshot(5, 5, ItemStatus::PartiallyAvailable, false, false);
    let issue = diagnose(&drifted).expect("drift should be detected");
    let target = issue.expected_status.expect("issue should be correctable");

    // Applying the repair leaves nothing further to fix
    let repaired = snapshot(5, 5, target, false, false);
    assert!(diagnose(&repaired).is_none());
}

// ---------------------------------------------------------------------------
// Vehicle conflict checks
// ---------------------------------------------------------------------------

#[test]
fn free_vehicle_accepts_assignment() {
    let target = booking(10, BookingStatus::Approved, "2024-06-01", "09:00-12:00");
    assert!(check_vehicle_conflicts(&target, &[]).is_ok());
}

#[test]
fn same_date_and_slot_is_a_slot_conflict() {
    let target = booking(11, BookingStatus::Approved, "2024-06-01", "09:00-12:00");
    let existing = vec![assignment(
        10,
        7,
        BookingStatus::Approved,
        "2024-06-01",
        "09:00-12:00",
    )];

    match check_vehicle_conflicts(&target, &existing) {
        Err(AppError::SlotConflict {
            vehicle_id,
            booking_id,
            ..
        }) => {
            assert_eq!(vehicle_id, 7);
            assert_eq!(booking_id, 10);
        }
        other => panic!("expected SlotConflict, got {:?}", other.err()),
    }
}

#[test]
fn different_date_still_locks_the_vehicle() {
    // The holder keeps custody until its booking completes, regardless of
    // dates.
    let target = booking(12, BookingStatus::Approved, "2024-06-08", "09:00-12:00");
    let existing = vec![assignment(
        10,
        7,
        BookingStatus::Approved,
        "2024-06-01",
        "09:00-12:00",
    )];

    match check_vehicle_conflicts(&target, &existing) {
        Err(AppError::VehicleLocked {
            vehicle_id,
            booking_id,
        }) => {
            assert_eq!(vehicle_id, 7);
            assert_eq!(booking_id, 10);
        }
        other => panic!("expected VehicleLocked, got {:?}", other.err()),
    }
}

#[test]
fn different_slot_same_date_locks_the_vehicle() {
    let target = booking(12, BookingStatus::Approved, "2024-06-01", "14:00-18:00");
    let existing = vec![assignment(
        10,
        7,
        BookingStatus::Approved,
        "2024-06-01",
        "09:00-12:00",
    )];

    assert!(matches!(
        check_vehicle_conflicts(&target, &existing),
        Err(AppError::VehicleLocked { .. })
    ));
}

#[test]
fn non_approved_holders_do_not_block() {
    let target = booking(12, BookingStatus::Approved, "2024-06-01", "09:00-12:00");
    let existing = vec![
        assignment(10, 7, BookingStatus::Completed, "2024-06-01", "09:00-12:00"),
        assignment(11, 7, BookingStatus::Cancelled, "2024-06-01", "09:00-12:00"),
        assignment(13, 7, BookingStatus::Pending, "2024-06-01", "09:00-12:00"),
    ];

    assert!(check_vehicle_conflicts(&target, &existing).is_ok());
}

#[test]
fn own_assignment_does_not_conflict_with_itself() {
    // Reassigning the same booking to the same vehicle is a no-op upsert
    let target = booking(10, BookingStatus::Approved, "2024-06-01", "09:00-12:00");
    let existing = vec![assignment(
        10,
        7,
        BookingStatus::Approved,
        "2024-06-01",
        "09:00-12:00",
    )];

    assert!(check_vehicle_conflicts(&target, &existing).is_ok());
}

#[test]
fn slot_conflict_wins_over_vehicle_lock() {
    // Two holders: one on another date, one on the exact slot. The harder
    // conflict is the one reported.
    let target = booking(20, BookingStatus::Approved, "2024-06-01", "09:00-12:00");
    let existing = vec![
        assignment(10, 7, BookingStatus::Approved, "2024-05-28", "09:00-12:00"),
        assignment(11, 7, BookingStatus::Approved, "2024-06-01", "09:00-12:00"),
    ];

    assert!(matches!(
        check_vehicle_conflicts(&target, &existing),
        Err(AppError::SlotConflict { booking_id: 11, .. })
    ));
}
