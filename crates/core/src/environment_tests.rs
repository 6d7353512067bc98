// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    exists      = { ImageStatus::Exists, true, false },
    in_progress = { ImageStatus::BuildInProgress, false, true },
    queued      = { ImageStatus::BuildQueued, false, false },
    failed      = { ImageStatus::BuildFailed, false, false },
    absent      = { ImageStatus::DoesNotExist, false, false },
    stale       = { ImageStatus::Stale, false, false },
)]
fn image_status_predicates(status: ImageStatus, ready: bool, building: bool) {
    assert_eq!(status.is_ready(), ready);
    assert_eq!(status.is_building(), building);
}

#[test]
fn image_status_wire_casing() {
    assert_eq!(serde_json::to_string(&ImageStatus::BuildInProgress).unwrap(), "\"BUILD_IN_PROGRESS\"");
    let parsed: ImageStatus = serde_json::from_str("\"EXISTS\"").unwrap();
    assert_eq!(parsed, ImageStatus::Exists);
}

#[test]
fn container_status_wire_casing() {
    assert_eq!(serde_json::to_string(&ContainerStatus::NotRunning).unwrap(), "\"NOT_RUNNING\"");
    let parsed: ContainerStatus = serde_json::from_str("\"RUNNING\"").unwrap();
    assert_eq!(parsed, ContainerStatus::Running);
}

#[test]
fn empty_snapshot_is_not_materialized() {
    let snapshot = RepositorySnapshot { size_bytes: 0, environment: EnvironmentState::default() };
    assert!(!snapshot.is_materialized());
}

#[test]
fn sized_snapshot_is_materialized() {
    let snapshot = RepositorySnapshot {
        size_bytes: 4096,
        environment: EnvironmentState {
            image_status: Some(ImageStatus::Exists),
            container_status: Some(ContainerStatus::NotRunning),
        },
    };
    assert!(snapshot.is_materialized());
}
