// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gantry_core::JobStatus;

#[test]
fn job_status_prints_without_error_in_both_formats() {
    let descriptor = gantry_core::JobDescriptor::builder()
        .key("rq:job:x")
        .status(JobStatus::Finished)
        .progress("Step 2/2", Some("build_image"))
        .build();
    print_job_status(&descriptor, OutputFormat::Text).unwrap();
    print_job_status(&descriptor, OutputFormat::Json).unwrap();
}

#[test]
fn json_output_round_trips_the_descriptor() {
    let descriptor = gantry_core::JobDescriptor::builder()
        .key("rq:job:x")
        .status(JobStatus::Failed)
        .failure_message("Dockerfile syntax error")
        .build();
    let json = serde_json::to_string(&descriptor).unwrap();
    let parsed: gantry_core::JobDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, descriptor);
}
